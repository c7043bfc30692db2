//! In-process backend
//!
//! Holds the three tables in ordered maps behind a single lock and applies
//! the same rules the SQL schema does: unique email, one store per user,
//! parent rows must exist, deletes cascade. Each call holds the lock for
//! its whole duration, so every operation is atomic.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::error::DbError;
use super::records::{
    Product, ProductDetail, Store, StoreDetail, StoreWithProducts, StoreWithUser, User,
    UserDetail, UserWithStore,
};
use super::storage::Storage;
use crate::models::{
    EntityId, NewProduct, NewStore, NewUser, ProductChanges, StoreChanges, UserChanges,
};

#[derive(Default)]
struct Tables {
    users: BTreeMap<EntityId, User>,
    stores: BTreeMap<EntityId, Store>,
    products: BTreeMap<EntityId, Product>,
    last_user_id: i32,
    last_store_id: i32,
    last_product_id: i32,
}

/// Sequence values are never reused, matching `SERIAL`.
fn next_id(last: &mut i32) -> Result<EntityId, DbError> {
    *last = last
        .checked_add(1)
        .ok_or_else(|| DbError::Other("identifier sequence exhausted".into()))?;
    Ok(EntityId::from_db(*last))
}

impl Tables {
    fn email_taken(&self, email: &str, except: Option<EntityId>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }

    fn store_of(&self, user_id: EntityId) -> Option<&Store> {
        self.stores.values().find(|s| s.user_id == user_id)
    }

    fn products_of(&self, store_id: EntityId) -> Vec<Product> {
        self.products
            .values()
            .filter(|p| p.store_id == store_id)
            .cloned()
            .collect()
    }

    fn remove_store_cascade(&mut self, store_id: EntityId) {
        self.products.retain(|_, p| p.store_id != store_id);
        self.stores.remove(&store_id);
    }

    fn product_detail(&self, product: &Product) -> Result<ProductDetail, DbError> {
        let store = self
            .stores
            .get(&product.store_id)
            .ok_or_else(|| DbError::Other(format!("product {} has no store", product.id)))?;
        let user = self
            .users
            .get(&store.user_id)
            .ok_or_else(|| DbError::Other(format!("store {} has no owner", store.id)))?;

        Ok(ProductDetail {
            product: product.clone(),
            store: StoreWithUser {
                store: store.clone(),
                user: user.clone(),
            },
        })
    }
}

/// Storage kept entirely in memory; contents are lost on exit
#[derive(Default)]
pub struct MemoryStorage {
    tables: RwLock<Tables>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn create_user(&self, input: NewUser) -> Result<User, DbError> {
        let mut t = self.tables.write().await;
        if t.email_taken(input.email.as_str(), None) {
            return Err(DbError::UniqueViolation { field: "email" });
        }

        let id = next_id(&mut t.last_user_id)?;
        let user = User {
            id,
            email: input.email.into_string(),
            name: input.name,
        };
        t.users.insert(id, user.clone());
        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<UserWithStore>, DbError> {
        let t = self.tables.read().await;
        Ok(t.users
            .values()
            .map(|u| UserWithStore {
                user: u.clone(),
                store: t.store_of(u.id).cloned(),
            })
            .collect())
    }

    async fn get_user(&self, id: EntityId) -> Result<UserDetail, DbError> {
        let t = self.tables.read().await;
        let user = t
            .users
            .get(&id)
            .ok_or_else(|| DbError::not_found("user", id))?;
        let store = t.store_of(id).map(|s| StoreWithProducts {
            store: s.clone(),
            products: t.products_of(s.id),
        });

        Ok(UserDetail {
            user: user.clone(),
            store,
        })
    }

    async fn update_user(&self, id: EntityId, changes: UserChanges) -> Result<User, DbError> {
        let mut t = self.tables.write().await;
        if !t.users.contains_key(&id) {
            return Err(DbError::not_found("user", id));
        }
        if let Some(email) = &changes.email {
            if t.email_taken(email.as_str(), Some(id)) {
                return Err(DbError::UniqueViolation { field: "email" });
            }
        }

        let user = t
            .users
            .get_mut(&id)
            .ok_or_else(|| DbError::not_found("user", id))?;
        if let Some(email) = changes.email {
            user.email = email.into_string();
        }
        if let Some(name) = changes.name {
            user.name = name;
        }
        Ok(user.clone())
    }

    async fn delete_user(&self, id: EntityId) -> Result<(), DbError> {
        let mut t = self.tables.write().await;
        if t.users.remove(&id).is_none() {
            return Err(DbError::not_found("user", id));
        }
        let owned_store = t.store_of(id).map(|s| s.id);
        if let Some(store_id) = owned_store {
            t.remove_store_cascade(store_id);
        }
        Ok(())
    }

    async fn user_exists(&self, id: EntityId) -> Result<bool, DbError> {
        Ok(self.tables.read().await.users.contains_key(&id))
    }

    async fn create_store(&self, input: NewStore) -> Result<Store, DbError> {
        let mut t = self.tables.write().await;
        if !t.users.contains_key(&input.user_id) {
            return Err(DbError::not_found("user", input.user_id));
        }
        if t.store_of(input.user_id).is_some() {
            return Err(DbError::UniqueViolation { field: "userId" });
        }

        let id = next_id(&mut t.last_store_id)?;
        let store = Store {
            id,
            name: input.name.into_string(),
            user_id: input.user_id,
        };
        t.stores.insert(id, store.clone());
        Ok(store)
    }

    async fn get_store(&self, id: EntityId) -> Result<StoreDetail, DbError> {
        let t = self.tables.read().await;
        let store = t
            .stores
            .get(&id)
            .ok_or_else(|| DbError::not_found("store", id))?;
        let user = t
            .users
            .get(&store.user_id)
            .ok_or_else(|| DbError::Other(format!("store {} has no owner", id)))?;

        Ok(StoreDetail {
            store: store.clone(),
            user: user.clone(),
            products: t.products_of(id),
        })
    }

    async fn update_store(&self, id: EntityId, changes: StoreChanges) -> Result<Store, DbError> {
        let mut t = self.tables.write().await;
        let store = t
            .stores
            .get_mut(&id)
            .ok_or_else(|| DbError::not_found("store", id))?;
        store.name = changes.name.into_string();
        Ok(store.clone())
    }

    async fn delete_store(&self, id: EntityId) -> Result<(), DbError> {
        let mut t = self.tables.write().await;
        if !t.stores.contains_key(&id) {
            return Err(DbError::not_found("store", id));
        }
        t.remove_store_cascade(id);
        Ok(())
    }

    async fn store_exists(&self, id: EntityId) -> Result<bool, DbError> {
        Ok(self.tables.read().await.stores.contains_key(&id))
    }

    async fn create_product(&self, input: NewProduct) -> Result<Product, DbError> {
        let mut t = self.tables.write().await;
        if !t.stores.contains_key(&input.store_id) {
            return Err(DbError::not_found("store", input.store_id));
        }

        let id = next_id(&mut t.last_product_id)?;
        let product = Product {
            id,
            name: input.name.into_string(),
            price: input.price.get(),
            store_id: input.store_id,
        };
        t.products.insert(id, product.clone());
        Ok(product)
    }

    async fn list_products(&self) -> Result<Vec<ProductDetail>, DbError> {
        let t = self.tables.read().await;
        t.products
            .values()
            .rev()
            .map(|p| t.product_detail(p))
            .collect()
    }

    async fn get_product(&self, id: EntityId) -> Result<ProductDetail, DbError> {
        let t = self.tables.read().await;
        let product = t
            .products
            .get(&id)
            .ok_or_else(|| DbError::not_found("product", id))?;
        t.product_detail(product)
    }

    async fn update_product(
        &self,
        id: EntityId,
        changes: ProductChanges,
    ) -> Result<Product, DbError> {
        let mut t = self.tables.write().await;
        let product = t
            .products
            .get_mut(&id)
            .ok_or_else(|| DbError::not_found("product", id))?;
        if let Some(name) = changes.name {
            product.name = name.into_string();
        }
        if let Some(price) = changes.price {
            product.price = price.get();
        }
        Ok(product.clone())
    }

    async fn delete_product(&self, id: EntityId) -> Result<(), DbError> {
        let mut t = self.tables.write().await;
        t.products
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DbError::not_found("product", id))
    }

    async fn close(&self) {
        tracing::debug!("In-memory storage closed");
    }
}
