use sqlx::{Sqlite, SqlitePool};

use crate::errors::RequestError;
use crate::models::Category;

const CATEGORY_SELECT: &str =
    "SELECT id, title, description, slug, is_published, created_at FROM categories";

/// Category-scoped listings are addressed by slug.
pub async fn get_category_by_slug_in_db(
    pool: &SqlitePool,
    slug: &str,
) -> Result<Option<Category>, RequestError> {
    let mut tx = pool.begin().await?;
    let query = format!("{CATEGORY_SELECT} WHERE slug = $1");
    let result = sqlx::query_as::<Sqlite, Category>(&query)
        .bind(slug)
        .fetch_optional(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(result)
}

pub async fn get_category_by_id_in_db(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<Category>, RequestError> {
    let mut tx = pool.begin().await?;
    let query = format!("{CATEGORY_SELECT} WHERE id = $1");
    let result = sqlx::query_as::<Sqlite, Category>(&query)
        .bind(id)
        .fetch_optional(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(result)
}
