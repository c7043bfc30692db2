//! Connection pool settings for the PostgreSQL backend

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Kept low; every request is a single short statement or two.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// How long a request waits for a free connection before failing.
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Sizing and timeouts for the sqlx pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        }
    }
}

impl PoolSettings {
    /// Default settings with a custom pool size. A size of zero is raised
    /// to one; the pool could never serve a query otherwise.
    pub fn with_max_connections(max_connections: u32) -> Self {
        Self {
            max_connections: max_connections.max(1),
            ..Self::default()
        }
    }

    fn options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout)
    }

    /// Open the pool. Fails if the first connection cannot be established.
    pub async fn connect(&self, database_url: &str) -> Result<PgPool, sqlx::Error> {
        self.options().connect(database_url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings() {
        let settings = PoolSettings::default();
        assert_eq!(settings.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(settings.acquire_timeout, DEFAULT_ACQUIRE_TIMEOUT);
    }

    #[test]
    fn zero_sized_pool_is_raised_to_one() {
        assert_eq!(PoolSettings::with_max_connections(0).max_connections, 1);
        assert_eq!(PoolSettings::with_max_connections(12).max_connections, 12);
    }

    #[test]
    fn settings_reach_pool_options() {
        let options = PoolSettings::with_max_connections(3).options();
        assert_eq!(options.get_max_connections(), 3);
        assert_eq!(options.get_acquire_timeout(), DEFAULT_ACQUIRE_TIMEOUT);
    }

    // Run with: DATABASE_URL=postgres://... cargo test -p stockroom-server -- --ignored
    #[tokio::test]
    #[ignore = "requires database"]
    async fn pool_acquires_connection() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = PoolSettings::default()
            .connect(&url)
            .await
            .expect("pool creation failed");

        let result: (i32,) = sqlx::query_as("SELECT 1")
            .fetch_one(&pool)
            .await
            .expect("query failed");

        assert_eq!(result.0, 1);
        pool.close().await;
    }
}
