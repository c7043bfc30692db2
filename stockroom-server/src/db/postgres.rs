//! PostgreSQL backend
//!
//! - Lists use JOINs (no N+1)
//! - Uniqueness and parent existence are left to the constraints; failures
//!   are classified, never pre-empted with locks

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::error::{classify_write, DbError};
use super::records::{
    Product, ProductDetail, Store, StoreDetail, StoreWithProducts, StoreWithUser, User,
    UserDetail, UserWithStore,
};
use super::migrations;
use super::pool::PoolSettings;
use super::storage::Storage;
use crate::models::{
    EntityId, NewProduct, NewStore, NewUser, ProductChanges, StoreChanges, UserChanges,
};

const PRODUCT_DETAIL_SELECT: &str = r#"
    SELECT
        p.id, p.name, p.price, p.store_id,
        s.name AS store_name, s.user_id,
        u.email AS user_email, u.name AS user_name
    FROM products p
    JOIN stores s ON s.id = p.store_id
    JOIN users u ON u.id = s.user_id
"#;

/// Storage backed by a sqlx connection pool
#[derive(Clone)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    /// Connect and bring the schema up to date.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, DbError> {
        let pool = PoolSettings::with_max_connections(max_connections)
            .connect(database_url)
            .await?;
        migrations::run(&pool).await?;
        tracing::info!(max_connections, "Database pool ready");
        Ok(Self { pool })
    }

    async fn products_for_store(&self, store_id: EntityId) -> Result<Vec<Product>, DbError> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price, store_id
            FROM products
            WHERE store_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }
}

fn product_detail_from_row(r: &PgRow) -> Result<ProductDetail, sqlx::Error> {
    let store_id: EntityId = r.try_get("store_id")?;
    let user_id: EntityId = r.try_get("user_id")?;

    Ok(ProductDetail {
        product: Product {
            id: r.try_get("id")?,
            name: r.try_get("name")?,
            price: r.try_get("price")?,
            store_id,
        },
        store: StoreWithUser {
            store: Store {
                id: store_id,
                name: r.try_get("store_name")?,
                user_id,
            },
            user: User {
                id: user_id,
                email: r.try_get("user_email")?,
                name: r.try_get("user_name")?,
            },
        },
    })
}

/// Map a `users LEFT JOIN stores` row.
fn user_with_store_from_row(r: &PgRow) -> Result<UserWithStore, sqlx::Error> {
    let user = User {
        id: r.try_get("id")?,
        email: r.try_get("email")?,
        name: r.try_get("name")?,
    };
    let store_id: Option<EntityId> = r.try_get("store_id")?;
    let store = match store_id {
        Some(id) => Some(Store {
            id,
            name: r.try_get("store_name")?,
            user_id: user.id,
        }),
        None => None,
    };
    Ok(UserWithStore { user, store })
}

async fn delete_by_id(
    pool: &PgPool,
    statement: &'static str,
    resource: &'static str,
    id: EntityId,
) -> Result<(), DbError> {
    let result = sqlx::query(statement).bind(id).execute(pool).await?;
    if result.rows_affected() == 0 {
        return Err(DbError::not_found(resource, id));
    }
    Ok(())
}

async fn exists(pool: &PgPool, statement: &'static str, id: EntityId) -> Result<bool, DbError> {
    let found: (bool,) = sqlx::query_as(statement).bind(id).fetch_one(pool).await?;
    Ok(found.0)
}

#[async_trait]
impl Storage for PgStorage {
    async fn create_user(&self, input: NewUser) -> Result<User, DbError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name)
            VALUES ($1, $2)
            RETURNING id, email, name
            "#,
        )
        .bind(input.email.as_str())
        .bind(input.name.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify_write(e, Some("email"), None))
    }

    async fn list_users(&self) -> Result<Vec<UserWithStore>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT u.id, u.email, u.name, s.id AS store_id, s.name AS store_name
            FROM users u
            LEFT JOIN stores s ON s.user_id = u.id
            ORDER BY u.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let users = rows
            .iter()
            .map(user_with_store_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    async fn get_user(&self, id: EntityId) -> Result<UserDetail, DbError> {
        let row = sqlx::query(
            r#"
            SELECT u.id, u.email, u.name, s.id AS store_id, s.name AS store_name
            FROM users u
            LEFT JOIN stores s ON s.user_id = u.id
            WHERE u.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("user", id))?;

        let UserWithStore { user, store } = user_with_store_from_row(&row)?;
        let store = match store {
            Some(store) => {
                let products = self.products_for_store(store.id).await?;
                Some(StoreWithProducts { store, products })
            }
            None => None,
        };

        Ok(UserDetail { user, store })
    }

    async fn update_user(&self, id: EntityId, changes: UserChanges) -> Result<User, DbError> {
        let (set_name, name) = match changes.name {
            Some(name) => (true, name),
            None => (false, None),
        };

        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET email = COALESCE($2, email),
                name = CASE WHEN $3 THEN $4 ELSE name END
            WHERE id = $1
            RETURNING id, email, name
            "#,
        )
        .bind(id)
        .bind(changes.email.as_ref().map(|e| e.as_str()))
        .bind(set_name)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| classify_write(e, Some("email"), None))?
        .ok_or_else(|| DbError::not_found("user", id))
    }

    async fn delete_user(&self, id: EntityId) -> Result<(), DbError> {
        // stores and products go with it via ON DELETE CASCADE
        delete_by_id(&self.pool, "DELETE FROM users WHERE id = $1", "user", id).await
    }

    async fn user_exists(&self, id: EntityId) -> Result<bool, DbError> {
        exists(
            &self.pool,
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)",
            id,
        )
        .await
    }

    async fn create_store(&self, input: NewStore) -> Result<Store, DbError> {
        sqlx::query_as::<_, Store>(
            r#"
            INSERT INTO stores (name, user_id)
            VALUES ($1, $2)
            RETURNING id, name, user_id
            "#,
        )
        .bind(input.name.as_str())
        .bind(input.user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify_write(e, Some("userId"), Some(("user", input.user_id.get()))))
    }

    async fn get_store(&self, id: EntityId) -> Result<StoreDetail, DbError> {
        let row = sqlx::query(
            r#"
            SELECT s.id, s.name, s.user_id, u.email AS user_email, u.name AS user_name
            FROM stores s
            JOIN users u ON u.id = s.user_id
            WHERE s.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("store", id))?;

        let user_id: EntityId = row.try_get("user_id")?;
        let store = Store {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            user_id,
        };
        let user = User {
            id: user_id,
            email: row.try_get("user_email")?,
            name: row.try_get("user_name")?,
        };
        let products = self.products_for_store(store.id).await?;

        Ok(StoreDetail {
            store,
            user,
            products,
        })
    }

    async fn update_store(&self, id: EntityId, changes: StoreChanges) -> Result<Store, DbError> {
        sqlx::query_as::<_, Store>(
            r#"
            UPDATE stores
            SET name = $2
            WHERE id = $1
            RETURNING id, name, user_id
            "#,
        )
        .bind(id)
        .bind(changes.name.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("store", id))
    }

    async fn delete_store(&self, id: EntityId) -> Result<(), DbError> {
        delete_by_id(&self.pool, "DELETE FROM stores WHERE id = $1", "store", id).await
    }

    async fn store_exists(&self, id: EntityId) -> Result<bool, DbError> {
        exists(
            &self.pool,
            "SELECT EXISTS(SELECT 1 FROM stores WHERE id = $1)",
            id,
        )
        .await
    }

    async fn create_product(&self, input: NewProduct) -> Result<Product, DbError> {
        sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, price, store_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, price, store_id
            "#,
        )
        .bind(input.name.as_str())
        .bind(input.price.get())
        .bind(input.store_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify_write(e, None, Some(("store", input.store_id.get()))))
    }

    async fn list_products(&self) -> Result<Vec<ProductDetail>, DbError> {
        let sql = format!("{PRODUCT_DETAIL_SELECT} ORDER BY p.id DESC");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        let products = rows
            .iter()
            .map(product_detail_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(products)
    }

    async fn get_product(&self, id: EntityId) -> Result<ProductDetail, DbError> {
        let sql = format!("{PRODUCT_DETAIL_SELECT} WHERE p.id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("product", id))?;

        Ok(product_detail_from_row(&row)?)
    }

    async fn update_product(
        &self,
        id: EntityId,
        changes: ProductChanges,
    ) -> Result<Product, DbError> {
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = COALESCE($2, name),
                price = COALESCE($3, price)
            WHERE id = $1
            RETURNING id, name, price, store_id
            "#,
        )
        .bind(id)
        .bind(changes.name.as_ref().map(|n| n.as_str()))
        .bind(changes.price.map(|p| p.get()))
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("product", id))
    }

    async fn delete_product(&self, id: EntityId) -> Result<(), DbError> {
        delete_by_id(&self.pool, "DELETE FROM products WHERE id = $1", "product", id).await
    }

    async fn close(&self) {
        tracing::info!("Closing database pool");
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // Each test works on its own rows; run against a scratch database:
    // DATABASE_URL=postgres://... cargo test -p stockroom-server -- --ignored

    async fn storage() -> PgStorage {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        PgStorage::connect(&url, 2).await.expect("connect failed")
    }

    fn unique_email(tag: &str) -> String {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        format!("{tag}-{nanos}@example.com")
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn duplicate_email_is_unique_violation() {
        let db = storage().await;
        let email = unique_email("dup");
        let input = NewUser::from_json(&json!({ "email": email })).unwrap();

        db.create_user(input.clone()).await.unwrap();
        let err = db.create_user(input).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { field: "email" }));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn second_store_for_user_is_unique_violation() {
        let db = storage().await;
        let user = db
            .create_user(NewUser::from_json(&json!({ "email": unique_email("owner") })).unwrap())
            .await
            .unwrap();

        let body = json!({ "name": "S", "userId": user.id.get() });
        db.create_store(NewStore::from_json(&body).unwrap()).await.unwrap();
        let err = db
            .create_store(NewStore::from_json(&body).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { field: "userId" }));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn product_for_missing_store_is_not_found() {
        let db = storage().await;
        let body = json!({ "name": "P", "price": 1, "storeId": i32::MAX });
        let err = db
            .create_product(NewProduct::from_json(&body).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { resource: "store", .. }));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn deleting_user_cascades() {
        let db = storage().await;
        let user = db
            .create_user(NewUser::from_json(&json!({ "email": unique_email("cascade") })).unwrap())
            .await
            .unwrap();
        let store = db
            .create_store(
                NewStore::from_json(&json!({ "name": "S", "userId": user.id.get() })).unwrap(),
            )
            .await
            .unwrap();
        let mut product_ids = Vec::new();
        for n in 0..3 {
            let body = json!({ "name": format!("P{n}"), "price": n, "storeId": store.id.get() });
            let product = db
                .create_product(NewProduct::from_json(&body).unwrap())
                .await
                .unwrap();
            product_ids.push(product.id);
        }

        db.delete_user(user.id).await.unwrap();

        assert!(!db.user_exists(user.id).await.unwrap());
        assert!(!db.store_exists(store.id).await.unwrap());
        for id in product_ids {
            assert!(matches!(
                db.get_product(id).await.unwrap_err(),
                DbError::NotFound { .. }
            ));
        }
    }
}
