//! Stored entities and the nested views returned by relation-aware reads

use serde::Serialize;
use sqlx::FromRow;

use crate::models::EntityId;

/// User record from database
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: EntityId,
    pub email: String,
    pub name: Option<String>,
}

/// Store record from database
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: EntityId,
    pub name: String,
    pub user_id: EntityId,
}

/// Product record from database
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: EntityId,
    pub name: String,
    pub price: f64,
    pub store_id: EntityId,
}

/// User with its store, for `GET /users`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserWithStore {
    #[serde(flatten)]
    pub user: User,
    pub store: Option<Store>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreWithProducts {
    #[serde(flatten)]
    pub store: Store,
    pub products: Vec<Product>,
}

/// User with store and the store's products, for `GET /users/:id`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: User,
    pub store: Option<StoreWithProducts>,
}

/// Store with owner and products, for `GET /stores/:id`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreDetail {
    #[serde(flatten)]
    pub store: Store,
    pub user: User,
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreWithUser {
    #[serde(flatten)]
    pub store: Store,
    pub user: User,
}

/// Product with store and owner, for the product reads
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub store: StoreWithUser,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_views_serialize_camel_case() {
        let user = User {
            id: EntityId::from_db(1),
            email: "a@x.com".into(),
            name: None,
        };
        let store = Store {
            id: EntityId::from_db(2),
            name: "S".into(),
            user_id: user.id,
        };
        let detail = ProductDetail {
            product: Product {
                id: EntityId::from_db(3),
                name: "P".into(),
                price: 10.5,
                store_id: store.id,
            },
            store: StoreWithUser { store, user },
        };

        assert_eq!(
            serde_json::to_value(&detail).unwrap(),
            json!({
                "id": 3,
                "name": "P",
                "price": 10.5,
                "storeId": 2,
                "store": {
                    "id": 2,
                    "name": "S",
                    "userId": 1,
                    "user": {"id": 1, "email": "a@x.com", "name": null}
                }
            })
        );
    }
}
