use sqlx::{Sqlite, SqlitePool};

use crate::{errors::RequestError, models::User};

mod category_helpers;
mod comment_helpers;
mod location_helpers;
mod post_helpers;
mod user_helpers;

pub use category_helpers::*;
pub use comment_helpers::*;
pub use location_helpers::*;
pub use post_helpers::*;
pub use user_helpers::*;

/// Builds a dynamic SET clause from optional fields, numbering the
/// placeholders as parameters accumulate. Fields left as None are skipped.
struct QueryBuilder {
    query: String,
    params: Vec<String>,
    separator: Option<&'static str>,
}

impl QueryBuilder {
    fn new(initial: String, separator: Option<&'static str>) -> Self {
        Self {
            query: initial,
            params: Vec::new(),
            separator,
        }
    }

    fn add_param(mut self, column: &str, param: Option<String>) -> Self {
        if let Some(value) = param {
            self.query
                .push_str(&format!("{} = ${}", column, self.params.len() + 1));
            if let Some(separator) = self.separator {
                self.query.push_str(separator);
            }
            self.params.push(value);
        }
        self
    }

    fn build(mut self) -> (String, Vec<String>) {
        if let Some(separator) = self.separator {
            self.query = self.query.trim_end_matches(separator).to_string();
        }
        if self.params.is_empty() {
            self.query = String::new();
        }
        (self.query, self.params)
    }
}

// ----------------- Shared user lookups -----------------

const USER_SELECT: &str =
    "SELECT id, username, email, password, first_name, last_name, created_at FROM users";

pub async fn get_user_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<User>, RequestError> {
    let mut tx = pool.begin().await?;
    let query = format!("{USER_SELECT} WHERE username = $1");
    let result = sqlx::query_as::<Sqlite, User>(&query)
        .bind(username)
        .fetch_optional(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(result)
}

pub async fn get_user_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<User>, RequestError> {
    let mut tx = pool.begin().await?;
    let query = format!("{USER_SELECT} WHERE email = $1");
    let result = sqlx::query_as::<Sqlite, User>(&query)
        .bind(email)
        .fetch_optional(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(result)
}

pub async fn get_user_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, RequestError> {
    let mut tx = pool.begin().await?;
    let query = format!("{USER_SELECT} WHERE id = $1");
    let result = sqlx::query_as::<Sqlite, User>(&query)
        .bind(id)
        .fetch_optional(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::QueryBuilder;

    #[test]
    fn builder_numbers_present_fields_and_skips_absent_ones() {
        let (query, params) = QueryBuilder::new(String::from("SET "), Some(", "))
            .add_param("username", Some("reader".to_string()))
            .add_param("email", None)
            .add_param("first_name", Some("Ann".to_string()))
            .build();
        assert_eq!(query, "SET username = $1, first_name = $2");
        assert_eq!(params, vec!["reader".to_string(), "Ann".to_string()]);
    }

    #[test]
    fn builder_with_no_fields_yields_empty_query() {
        let (query, params) = QueryBuilder::new(String::from("SET "), Some(", "))
            .add_param("username", None)
            .build();
        assert!(query.is_empty());
        assert!(params.is_empty());
    }
}
