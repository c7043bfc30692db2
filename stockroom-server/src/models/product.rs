//! Product input validation

use serde_json::Value;

use super::text::as_object;
use super::{EntityId, Price, RequiredText, ValidationError};

const UPDATABLE: &[&str] = &["name", "price"];

/// Validated `POST /products` body
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: RequiredText,
    pub price: Price,
    pub store_id: EntityId,
}

impl NewProduct {
    pub fn from_json(body: &Value) -> Result<Self, ValidationError> {
        let obj = as_object(body)?;
        Ok(Self {
            name: RequiredText::from_json(obj.get("name"), "name")?,
            price: Price::from_json(obj.get("price"), "price")?,
            store_id: EntityId::from_json(obj.get("storeId"), "storeId")?,
        })
    }
}

/// Validated `PUT /products/:id` body
#[derive(Debug, Clone, PartialEq)]
pub struct ProductChanges {
    pub name: Option<RequiredText>,
    pub price: Option<Price>,
}

impl ProductChanges {
    pub fn from_json(body: &Value) -> Result<Self, ValidationError> {
        let obj = as_object(body)?;
        let name_raw = obj.get("name");
        let price_raw = obj.get("price");

        if name_raw.is_none() && price_raw.is_none() {
            return Err(ValidationError::NoUpdatableFields { allowed: UPDATABLE });
        }

        let name = match name_raw {
            Some(Value::Null) => return Err(ValidationError::NotAString { field: "name" }),
            Some(v) => Some(RequiredText::from_json(Some(v), "name")?),
            None => None,
        };
        let price = match price_raw {
            Some(Value::Null) => return Err(ValidationError::InvalidNumber { field: "price" }),
            Some(v) => Some(Price::from_json(Some(v), "price")?),
            None => None,
        };

        Ok(Self { name, price })
    }
}
