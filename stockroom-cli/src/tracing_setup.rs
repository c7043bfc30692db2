//! Tracing setup for the stockroom binary
//!
//! Usage:
//!   stockroom --debug serve             # Debug logging to console
//!   RUST_LOG=stockroom_server=debug ... # Fine-grained log control
//!
//! Environment variables:
//!   RUST_LOG                            # Log filter, overrides --debug
//!                                       # (default: info,sqlx=warn)

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Log at debug level when RUST_LOG is unset. Never touches the
    /// environment; a RUST_LOG value always wins.
    pub debug: bool,
}

impl TracingConfig {
    /// Directives used when RUST_LOG is absent or unparsable
    fn fallback_directives(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info,tower_http=info,sqlx=warn"
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.fallback_directives()))
    }
}

/// Initialize console tracing
pub fn init(config: &TracingConfig) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(config.filter())
        .with_target(config.debug) // Show targets in debug mode
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
