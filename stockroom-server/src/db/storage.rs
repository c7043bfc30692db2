//! Persistence abstraction handed to the HTTP layer
//!
//! Every method is a single atomic call against the backend. Nothing here
//! spans several writes; uniqueness and foreign keys are enforced by the
//! backend itself.

use async_trait::async_trait;

use super::error::DbError;
use super::records::{
    Product, ProductDetail, Store, StoreDetail, User, UserDetail, UserWithStore,
};
use crate::models::{EntityId, NewProduct, NewStore, NewUser, ProductChanges, StoreChanges, UserChanges};

#[async_trait]
pub trait Storage: Send + Sync {
    async fn create_user(&self, input: NewUser) -> Result<User, DbError>;

    /// All users ordered by id ascending, each with its store (no products).
    async fn list_users(&self) -> Result<Vec<UserWithStore>, DbError>;

    async fn get_user(&self, id: EntityId) -> Result<UserDetail, DbError>;

    async fn update_user(&self, id: EntityId, changes: UserChanges) -> Result<User, DbError>;

    /// Delete a user together with its store and the store's products.
    async fn delete_user(&self, id: EntityId) -> Result<(), DbError>;

    async fn user_exists(&self, id: EntityId) -> Result<bool, DbError>;

    async fn create_store(&self, input: NewStore) -> Result<Store, DbError>;

    async fn get_store(&self, id: EntityId) -> Result<StoreDetail, DbError>;

    async fn update_store(&self, id: EntityId, changes: StoreChanges) -> Result<Store, DbError>;

    /// Delete a store together with its products.
    async fn delete_store(&self, id: EntityId) -> Result<(), DbError>;

    async fn store_exists(&self, id: EntityId) -> Result<bool, DbError>;

    async fn create_product(&self, input: NewProduct) -> Result<Product, DbError>;

    /// All products ordered by id descending, each with store and owner.
    async fn list_products(&self) -> Result<Vec<ProductDetail>, DbError>;

    async fn get_product(&self, id: EntityId) -> Result<ProductDetail, DbError>;

    async fn update_product(&self, id: EntityId, changes: ProductChanges)
        -> Result<Product, DbError>;

    async fn delete_product(&self, id: EntityId) -> Result<(), DbError>;

    /// Release backend resources. Called once on shutdown.
    async fn close(&self);
}
