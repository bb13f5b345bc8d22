use sqlx::SqlitePool;

use crate::{
    data_formats::{RegisterRequest, UpdateProfileRequest},
    errors::RequestError,
    models::User,
};

use super::{get_user_by_id, QueryBuilder};

/// Inserts a new account. `user.password` must already be hashed.
pub async fn insert_user(pool: &SqlitePool, user: &RegisterRequest) -> Result<User, RequestError> {
    let mut tx = pool.begin().await?;
    let result = sqlx::query(
        r#"
        INSERT INTO users (email, username, password)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(&user.email)
    .bind(&user.username)
    .bind(&user.password)
    .execute(&mut tx)
    .await?;

    let user_id = result.last_insert_rowid();
    tx.commit().await?;

    get_user_by_id(pool, user_id)
        .await?
        .ok_or(RequestError::ServerError)
}

pub async fn update_profile_in_db(
    pool: &SqlitePool,
    id: i64,
    UpdateProfileRequest {
        username,
        email,
        first_name,
        last_name,
    }: UpdateProfileRequest,
) -> Result<User, RequestError> {
    let (set_clause, params) = QueryBuilder::new(String::from("SET "), Some(", "))
        .add_param("username", username)
        .add_param("email", email)
        .add_param("first_name", first_name)
        .add_param("last_name", last_name)
        .build();

    if !set_clause.is_empty() {
        let mut tx = pool.begin().await?;
        let query = format!("UPDATE users {} WHERE id = ${}", set_clause, params.len() + 1);
        let mut query = sqlx::query(&query);
        for param in params {
            query = query.bind(param);
        }
        query.bind(id).execute(&mut tx).await?;
        tx.commit().await?;
    }

    get_user_by_id(pool, id).await?.ok_or(RequestError::NotFound)
}

pub async fn update_password_in_db(
    pool: &SqlitePool,
    id: i64,
    password_hash: &str,
) -> Result<(), RequestError> {
    let mut tx = pool.begin().await?;
    let result = sqlx::query("UPDATE users SET password = $1 WHERE id = $2")
        .bind(password_hash)
        .bind(id)
        .execute(&mut tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RequestError::NotFound);
    }

    tx.commit().await?;
    Ok(())
}
