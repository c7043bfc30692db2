//! Schema migration command

use anyhow::{Context, Result};
use clap::Parser;

use stockroom_server::db::{migrations, PoolSettings};

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,
}

/// Apply the schema and exit
pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let pool = PoolSettings::default()
        .connect(&args.database_url)
        .await
        .context("Failed to create database pool")?;

    let result = migrations::run(&pool).await.context("Migration failed");
    pool.close().await;
    result
}
