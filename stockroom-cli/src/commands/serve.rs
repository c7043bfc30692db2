//! HTTP server command
//!
//! Connects the storage backend, serves until SIGTERM/Ctrl+C, then closes
//! the backend before returning.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use stockroom_server::db::pool::DEFAULT_MAX_CONNECTIONS;
use stockroom_server::{run_server, MemoryStorage, PgStorage, ServerConfig, Storage};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Interface to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, short = 'p', env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", required_unless_present = "memory")]
    pub database_url: Option<String>,

    /// Maximum connections in the database pool
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Keep all data in memory instead of PostgreSQL (lost on exit)
    #[arg(long)]
    pub memory: bool,

    /// Directory holding the static marketing page
    #[arg(long, env = "STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,
}

async fn connect(args: &ServeArgs) -> Result<Arc<dyn Storage>> {
    if args.memory {
        tracing::warn!("Using in-memory storage; data will not survive a restart");
        return Ok(Arc::new(MemoryStorage::new()));
    }

    let database_url = args
        .database_url
        .as_deref()
        .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or .env")?;

    let storage = PgStorage::connect(database_url, args.max_connections)
        .await
        .context("Failed to connect to database")?;
    Ok(Arc::new(storage))
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let storage = connect(&args).await?;

    let config = ServerConfig {
        bind_addr: SocketAddr::new(args.host, args.port),
        cors_permissive: args.cors_permissive,
        static_dir: args.static_dir,
    };

    tracing::info!("Starting stockroom server on {}", config.bind_addr);

    // Run server (blocks until shutdown; closes storage on the way out)
    run_server(storage, config).await.context("Server error")?;

    Ok(())
}
