use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool};

use crate::data_formats::{CreatePostRequest, UpdatePostRequest};
use crate::errors::RequestError;
use crate::models::Post;

const POST_SELECT: &str = r#"
            SELECT posts.id                  AS "id",
                   posts.title               AS "title",
                   posts.text                AS "text",
                   posts.pub_date            AS "pub_date",
                   posts.author_id           AS "author_id",
                   posts.category_id         AS "category_id",
                   posts.location_id         AS "location_id",
                   posts.image               AS "image",
                   posts.is_published        AS "is_published",
                   posts.created_at          AS "created_at",
                   users.username            AS "author_username",
                   categories.title          AS "category_title",
                   categories.slug           AS "category_slug",
                   categories.is_published   AS "category_is_published",
                   locations.name            AS "location_name",
                   (SELECT Count(*)
                    FROM   comments
                    WHERE  comments.post_id = posts.id) AS "comment_count"
            FROM   posts
                JOIN users
                    ON posts.author_id = users.id
                LEFT JOIN categories
                        ON posts.category_id = categories.id
                LEFT JOIN locations
                        ON posts.location_id = locations.id
     "#;

const POST_COUNT: &str = r#"
            SELECT Count(*)
            FROM   posts
                LEFT JOIN categories
                        ON posts.category_id = categories.id
     "#;

// The one visibility predicate every public listing shares. $1 is always
// the caller-supplied "now" so tests and queries agree on the clock.
const VISIBLE: &str = "posts.is_published = TRUE \
    AND posts.pub_date <= $1 \
    AND (posts.category_id IS NULL OR categories.is_published = TRUE)";

const FEED_ORDER: &str = "ORDER BY posts.pub_date DESC, posts.id DESC";

pub async fn list_home_feed_in_db(
    pool: &SqlitePool,
    now: DateTime<Utc>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Post>, RequestError> {
    let mut tx = pool.begin().await?;
    let query = format!("{POST_SELECT} WHERE {VISIBLE} {FEED_ORDER} LIMIT $2 OFFSET $3");
    let posts = sqlx::query_as::<Sqlite, Post>(&query)
        .bind(now)
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(posts)
}

pub async fn count_home_feed_in_db(
    pool: &SqlitePool,
    now: DateTime<Utc>,
) -> Result<i64, RequestError> {
    let mut tx = pool.begin().await?;
    let query = format!("{POST_COUNT} WHERE {VISIBLE}");
    let count = sqlx::query_scalar::<Sqlite, i64>(&query)
        .bind(now)
        .fetch_one(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(count)
}

pub async fn list_category_feed_in_db(
    pool: &SqlitePool,
    category_id: i64,
    now: DateTime<Utc>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Post>, RequestError> {
    let mut tx = pool.begin().await?;
    let query = format!(
        "{POST_SELECT} WHERE {VISIBLE} AND posts.category_id = $2 {FEED_ORDER} LIMIT $3 OFFSET $4"
    );
    let posts = sqlx::query_as::<Sqlite, Post>(&query)
        .bind(now)
        .bind(category_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(posts)
}

pub async fn count_category_feed_in_db(
    pool: &SqlitePool,
    category_id: i64,
    now: DateTime<Utc>,
) -> Result<i64, RequestError> {
    let mut tx = pool.begin().await?;
    let query = format!("{POST_COUNT} WHERE {VISIBLE} AND posts.category_id = $2");
    let count = sqlx::query_scalar::<Sqlite, i64>(&query)
        .bind(now)
        .bind(category_id)
        .fetch_one(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(count)
}

/// `public_now` carries the viewing rule: `Some(now)` applies the public
/// visibility filter, `None` means the profile owner is looking at their own
/// feed and sees everything, unpublished and future-dated posts included.
pub async fn list_profile_feed_in_db(
    pool: &SqlitePool,
    author_id: i64,
    public_now: Option<DateTime<Utc>>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Post>, RequestError> {
    let mut tx = pool.begin().await?;
    let posts = match public_now {
        Some(now) => {
            let query = format!(
                "{POST_SELECT} WHERE {VISIBLE} AND posts.author_id = $2 {FEED_ORDER} LIMIT $3 OFFSET $4"
            );
            sqlx::query_as::<Sqlite, Post>(&query)
                .bind(now)
                .bind(author_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(&mut tx)
                .await?
        }
        None => {
            let query =
                format!("{POST_SELECT} WHERE posts.author_id = $1 {FEED_ORDER} LIMIT $2 OFFSET $3");
            sqlx::query_as::<Sqlite, Post>(&query)
                .bind(author_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(&mut tx)
                .await?
        }
    };
    tx.commit().await?;
    Ok(posts)
}

pub async fn count_profile_feed_in_db(
    pool: &SqlitePool,
    author_id: i64,
    public_now: Option<DateTime<Utc>>,
) -> Result<i64, RequestError> {
    let mut tx = pool.begin().await?;
    let count = match public_now {
        Some(now) => {
            let query = format!("{POST_COUNT} WHERE {VISIBLE} AND posts.author_id = $2");
            sqlx::query_scalar::<Sqlite, i64>(&query)
                .bind(now)
                .bind(author_id)
                .fetch_one(&mut tx)
                .await?
        }
        None => {
            let query = format!("{POST_COUNT} WHERE posts.author_id = $1");
            sqlx::query_scalar::<Sqlite, i64>(&query)
                .bind(author_id)
                .fetch_one(&mut tx)
                .await?
        }
    };
    tx.commit().await?;
    Ok(count)
}

pub async fn get_post_by_id_in_db(
    pool: &SqlitePool,
    post_id: i64,
) -> Result<Option<Post>, RequestError> {
    let mut tx = pool.begin().await?;
    let query = format!("{POST_SELECT} WHERE posts.id = $1");
    let result = sqlx::query_as::<Sqlite, Post>(&query)
        .bind(post_id)
        .fetch_optional(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(result)
}

pub async fn create_post_in_db(
    pool: &SqlitePool,
    author_id: i64,
    CreatePostRequest {
        title,
        text,
        pub_date,
        category_id,
        location_id,
        image,
    }: CreatePostRequest,
) -> Result<Post, RequestError> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        INSERT INTO posts (title, text, pub_date, author_id, category_id, location_id, image)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(title)
    .bind(text)
    .bind(pub_date)
    .bind(author_id)
    .bind(category_id)
    .bind(location_id)
    .bind(image)
    .execute(&mut tx)
    .await?;

    let post_id = result.last_insert_rowid();
    tx.commit().await?;

    get_post_by_id_in_db(pool, post_id)
        .await?
        .ok_or(RequestError::ServerError)
}

pub async fn update_post_in_db(
    pool: &SqlitePool,
    post_id: i64,
    UpdatePostRequest {
        title,
        text,
        pub_date,
        category_id,
        location_id,
        image,
    }: UpdatePostRequest,
) -> Result<Post, RequestError> {
    let mut tx = pool.begin().await?;

    // Nullable columns take a (touched, value) pair so an explicit null
    // clears the column while an absent field leaves it alone.
    sqlx::query(
        r#"
        UPDATE posts
        SET title       = Coalesce($1, title),
            text        = Coalesce($2, text),
            pub_date    = Coalesce($3, pub_date),
            category_id = CASE WHEN $4 THEN $5 ELSE category_id END,
            location_id = CASE WHEN $6 THEN $7 ELSE location_id END,
            image       = CASE WHEN $8 THEN $9 ELSE image END
        WHERE id = $10
        "#,
    )
    .bind(title)
    .bind(text)
    .bind(pub_date)
    .bind(category_id.is_some())
    .bind(category_id.flatten())
    .bind(location_id.is_some())
    .bind(location_id.flatten())
    .bind(image.is_some())
    .bind(image.flatten())
    .bind(post_id)
    .execute(&mut tx)
    .await?;

    tx.commit().await?;

    get_post_by_id_in_db(pool, post_id)
        .await?
        .ok_or(RequestError::NotFound)
}

pub async fn delete_post_in_db(pool: &SqlitePool, post_id: i64) -> Result<(), RequestError> {
    let mut tx = pool.begin().await?;

    // Comments go with the post via ON DELETE CASCADE.
    let result = sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(post_id)
        .execute(&mut tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RequestError::NotFound);
    }

    tx.commit().await?;
    Ok(())
}
