//! `migration up | down | fresh | status` against `DATABASE_URL`.
//!
//! `up` creates the schema and seeds the four supported platforms.

use sea_orm_migration::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .compact()
        .init();

    cli::run_cli(migration::Migrator).await;
}
