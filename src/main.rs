use std::net::SocketAddr;

use anyhow::Context;
use blogicum::{init_db, make_router, run_app};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let db_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = init_db(&db_url).await?;

    let addr = SocketAddr::from(([127, 0, 0, 1], 3001));
    let router = make_router();
    tracing::info!("Server started on {}", addr);
    run_app(router, addr, pool).await
}
