use sqlx::{Sqlite, SqlitePool};

use crate::errors::RequestError;
use crate::models::Location;

pub async fn get_location_by_id_in_db(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<Location>, RequestError> {
    let mut tx = pool.begin().await?;
    let result = sqlx::query_as::<Sqlite, Location>(
        "SELECT id, name, is_published, created_at FROM locations WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&mut tx)
    .await?;
    tx.commit().await?;
    Ok(result)
}
