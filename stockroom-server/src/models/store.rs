//! Store input validation

use serde_json::Value;

use super::text::as_object;
use super::{EntityId, RequiredText, ValidationError};

/// Validated `POST /stores` body
#[derive(Debug, Clone, PartialEq)]
pub struct NewStore {
    pub name: RequiredText,
    pub user_id: EntityId,
}

impl NewStore {
    pub fn from_json(body: &Value) -> Result<Self, ValidationError> {
        let obj = as_object(body)?;
        Ok(Self {
            name: RequiredText::from_json(obj.get("name"), "name")?,
            user_id: EntityId::from_json(obj.get("userId"), "userId")?,
        })
    }
}

/// Validated `PUT /stores/:id` body
#[derive(Debug, Clone, PartialEq)]
pub struct StoreChanges {
    pub name: RequiredText,
}

impl StoreChanges {
    pub fn from_json(body: &Value) -> Result<Self, ValidationError> {
        let obj = as_object(body)?;
        Ok(Self {
            name: RequiredText::from_json(obj.get("name"), "name")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_store() {
        let store = NewStore::from_json(&json!({"name": "S", "userId": 1})).unwrap();
        assert_eq!(store.name.as_str(), "S");
        assert_eq!(store.user_id.get(), 1);
    }

    #[test]
    fn create_store_rejects_bad_owner() {
        assert_eq!(
            NewStore::from_json(&json!({"name": "S"})).unwrap_err(),
            ValidationError::Missing { field: "userId" }
        );
        assert_eq!(
            NewStore::from_json(&json!({"name": "S", "userId": "abc"})).unwrap_err(),
            ValidationError::InvalidId { field: "userId" }
        );
    }

    #[test]
    fn update_requires_name() {
        assert_eq!(
            StoreChanges::from_json(&json!({})).unwrap_err(),
            ValidationError::Missing { field: "name" }
        );
        assert_eq!(
            StoreChanges::from_json(&json!({"name": ""})).unwrap_err(),
            ValidationError::Empty { field: "name" }
        );
    }
}
