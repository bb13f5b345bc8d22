mod authentication;
mod data_formats;
mod db_helpers;
mod errors;
mod handlers;
mod models;
mod pagination;

use anyhow::Context;
pub use anyhow::Result;
use axum::http::StatusCode;
use axum::{routing::*, Extension, Json, Router};
pub use data_formats::*;
use handlers::*;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::{
    net::{SocketAddr, TcpListener},
    sync::Arc,
};

pub type JsonResponse<T> = (StatusCode, Json<T>);

pub async fn run_app(app: Router, address: SocketAddr, pool: SqlitePool) -> Result<()> {
    let app = app.layer(Extension(Arc::new(pool)));
    axum::Server::bind(&address)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}

pub async fn init_db(db_url: &str) -> Result<SqlitePool> {
    if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
        tracing::info!("Creating database {}", db_url);
        Sqlite::create_database(db_url)
            .await
            .context("Failed to create database")?;
    }
    let pool = SqlitePool::connect(db_url).await?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations completed");
    Ok(pool)
}

pub fn get_random_free_port() -> (u16, SocketAddr) {
    let listener = TcpListener::bind("localhost:0").unwrap();
    match listener.local_addr() {
        Ok(addr) => (addr.port(), addr),
        Err(_) => panic!("Could not get a free port"),
    }
}

pub fn make_router() -> Router {
    Router::new()
        .route("/check_health", get(alive))
        .route("/auth/register/", post(register_user))
        .route("/auth/login/", post(login_user))
        .route("/", get(home_feed))
        .route("/posts/create/", post(create_post))
        .route("/posts/:post_id/", get(post_detail))
        .route("/posts/:post_id/edit/", post(update_post))
        .route("/posts/:post_id/delete/", post(delete_post))
        .route("/posts/:post_id/comment/", post(add_comment))
        .route("/posts/:post_id/comment/:comment_id/edit/", post(update_comment))
        .route(
            "/posts/:post_id/comment/:comment_id/delete/",
            post(delete_comment),
        )
        .route("/category/:slug/", get(category_feed))
        .route("/profile/update/", post(update_profile))
        .route("/profile/change_password/", post(change_password))
        .route("/profile/:username/", get(profile_feed))
        .fallback(not_found)
}
