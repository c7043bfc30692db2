//! Request input models with validation at construction
//!
//! Untyped JSON is converted into typed field sets here, before any
//! storage access. Invalid input returns ValidationError, not panic.

pub mod id;
pub mod price;
pub mod product;
pub mod store;
pub mod text;
pub mod user;
pub mod validation;

pub use id::EntityId;
pub use price::Price;
pub use product::{NewProduct, ProductChanges};
pub use store::{NewStore, StoreChanges};
pub use text::RequiredText;
pub use user::{NewUser, UserChanges};
pub use validation::ValidationError;
