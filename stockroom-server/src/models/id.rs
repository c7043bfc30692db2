//! Entity identifier parsing
//!
//! Identifiers arrive as decimal strings in paths and as numbers (or numeric
//! strings) in bodies. Both go through the same rule: a finite, integral
//! value greater than zero that fits the `SERIAL` column.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::ValidationError;

/// Validated primary key
///
/// Only constructed through the parsers below, never by deserializing:
///
/// ```compile_fail
/// use stockroom_server::models::EntityId;
///
/// let _: EntityId = serde_json::from_str("0").unwrap();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct EntityId(i32);

impl EntityId {
    /// Parse an identifier from a path segment or string field.
    ///
    /// # Example
    /// ```
    /// use stockroom_server::models::EntityId;
    ///
    /// assert_eq!(EntityId::parse_str("42", "id").unwrap().get(), 42);
    /// assert!(EntityId::parse_str("0", "id").is_err());
    /// assert!(EntityId::parse_str("abc", "id").is_err());
    /// assert!(EntityId::parse_str("1.5", "id").is_err());
    /// ```
    pub fn parse_str(s: &str, field: &'static str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::InvalidId { field });
        }

        let value: f64 = trimmed
            .parse()
            .map_err(|_| ValidationError::InvalidId { field })?;
        Self::from_f64(value, field)
    }

    /// Parse an identifier from an optional JSON body field.
    pub fn from_json(value: Option<&Value>, field: &'static str) -> Result<Self, ValidationError> {
        match value {
            None | Some(Value::Null) => Err(ValidationError::Missing { field }),
            Some(Value::Number(n)) => {
                if let Some(i) = n.as_i64() {
                    return Self::from_i64(i, field);
                }
                let f = n.as_f64().ok_or(ValidationError::InvalidId { field })?;
                Self::from_f64(f, field)
            }
            Some(Value::String(s)) => Self::parse_str(s, field),
            Some(_) => Err(ValidationError::InvalidId { field }),
        }
    }

    fn from_f64(value: f64, field: &'static str) -> Result<Self, ValidationError> {
        if !value.is_finite() || value.fract() != 0.0 || value <= 0.0 || value > i32::MAX as f64 {
            return Err(ValidationError::InvalidId { field });
        }
        Ok(Self(value as i32))
    }

    fn from_i64(value: i64, field: &'static str) -> Result<Self, ValidationError> {
        match i32::try_from(value) {
            Ok(v) if v > 0 => Ok(Self(v)),
            _ => Err(ValidationError::InvalidId { field }),
        }
    }

    /// Wrap a key read back from storage.
    pub(crate) const fn from_db(id: i32) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
