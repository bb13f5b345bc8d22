use sqlx::{Sqlite, SqlitePool};

use crate::errors::RequestError;
use crate::models::Comment;

const COMMENT_SELECT: &str = r#"
            SELECT comments.id         AS "id",
                   comments.post_id    AS "post_id",
                   comments.author_id  AS "author_id",
                   comments.text       AS "text",
                   comments.created_at AS "created_at",
                   users.username      AS "author_username"
            FROM   comments
                JOIN users
                    ON comments.author_id = users.id
     "#;

pub async fn add_comment_to_post_in_db(
    pool: &SqlitePool,
    author_id: i64,
    post_id: i64,
    text: &str,
) -> Result<Comment, RequestError> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        INSERT INTO comments (post_id, author_id, text)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(post_id)
    .bind(author_id)
    .bind(text)
    .execute(&mut tx)
    .await?;

    let comment_id = result.last_insert_rowid();
    tx.commit().await?;

    get_comment_by_id_in_db(pool, comment_id)
        .await?
        .ok_or(RequestError::ServerError)
}

async fn get_comment_by_id_in_db(
    pool: &SqlitePool,
    comment_id: i64,
) -> Result<Option<Comment>, RequestError> {
    let mut tx = pool.begin().await?;
    let query = format!("{COMMENT_SELECT} WHERE comments.id = $1");
    let result = sqlx::query_as::<Sqlite, Comment>(&query)
        .bind(comment_id)
        .fetch_optional(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(result)
}

/// Looks the comment up under its post, so a comment id paired with the
/// wrong post id is a NotFound rather than a leak across posts.
pub async fn get_comment_for_post_in_db(
    pool: &SqlitePool,
    post_id: i64,
    comment_id: i64,
) -> Result<Option<Comment>, RequestError> {
    let mut tx = pool.begin().await?;
    let query = format!("{COMMENT_SELECT} WHERE comments.id = $1 AND comments.post_id = $2");
    let result = sqlx::query_as::<Sqlite, Comment>(&query)
        .bind(comment_id)
        .bind(post_id)
        .fetch_optional(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(result)
}

pub async fn list_comments_for_post_in_db(
    pool: &SqlitePool,
    post_id: i64,
) -> Result<Vec<Comment>, RequestError> {
    let mut tx = pool.begin().await?;
    let query = format!(
        "{COMMENT_SELECT} WHERE comments.post_id = $1 ORDER BY comments.created_at ASC, comments.id ASC"
    );
    let result = sqlx::query_as::<Sqlite, Comment>(&query)
        .bind(post_id)
        .fetch_all(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(result)
}

pub async fn update_comment_in_db(
    pool: &SqlitePool,
    comment_id: i64,
    text: &str,
) -> Result<Comment, RequestError> {
    let mut tx = pool.begin().await?;

    sqlx::query("UPDATE comments SET text = $1 WHERE id = $2")
        .bind(text)
        .bind(comment_id)
        .execute(&mut tx)
        .await?;

    tx.commit().await?;

    get_comment_by_id_in_db(pool, comment_id)
        .await?
        .ok_or(RequestError::NotFound)
}

pub async fn delete_comment_in_db(pool: &SqlitePool, comment_id: i64) -> Result<(), RequestError> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(comment_id)
        .execute(&mut tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RequestError::NotFound);
    }

    tx.commit().await?;
    Ok(())
}
