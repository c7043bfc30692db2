//! stockroom-server: HTTP API over users, stores and products
//!
//! Users own at most one store; stores own any number of products.
//! Input is validated in [`models`] before any call into [`db`], and
//! storage failures are translated to JSON errors in [`http`].

pub mod db;
pub mod http;
pub mod models;

pub use db::{DbError, MemoryStorage, PgStorage, Storage};
pub use http::{build_router, run_server, AppState, ServerConfig, ServerError};
