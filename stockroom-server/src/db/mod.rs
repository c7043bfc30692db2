//! Database layer - storage abstraction and backends
//!
//! # Design Principles
//!
//! - Handlers only see `dyn Storage`; backends are chosen at startup
//! - Errors come back as tagged `DbError` variants, not driver codes
//! - Rely on DB constraints, handle conflicts - pre-checks are advisory
//! - No transactions spanning several writes

pub mod error;
pub mod memory;
pub mod migrations;
pub mod pool;
pub mod postgres;
pub mod records;
pub mod storage;

pub use error::DbError;
pub use memory::MemoryStorage;
pub use pool::PoolSettings;
pub use postgres::PgStorage;
pub use records::*;
pub use storage::Storage;
