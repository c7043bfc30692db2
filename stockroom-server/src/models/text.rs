//! String field validation

use serde_json::{Map, Value};

use super::ValidationError;

/// Non-empty string, trimmed at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredText(String);

impl RequiredText {
    /// Create from a raw string.
    ///
    /// # Example
    /// ```
    /// use stockroom_server::models::RequiredText;
    ///
    /// assert_eq!(RequiredText::new(" Shop ", "name").unwrap().as_str(), "Shop");
    /// assert!(RequiredText::new("   ", "name").is_err());
    /// ```
    pub fn new(s: &str, field: &'static str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Read a required string field from a JSON object.
    pub fn from_json(value: Option<&Value>, field: &'static str) -> Result<Self, ValidationError> {
        match value {
            None | Some(Value::Null) => Err(ValidationError::Missing { field }),
            Some(Value::String(s)) => Self::new(s, field),
            Some(_) => Err(ValidationError::NotAString { field }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Read a nullable string field.
///
/// `null` and whitespace-only strings both map to `None`; a non-string value
/// is rejected.
pub(crate) fn nullable_text(
    value: &Value,
    field: &'static str,
) -> Result<Option<String>, ValidationError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => {
            let trimmed = s.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_owned()))
        }
        _ => Err(ValidationError::NotAString { field }),
    }
}

/// Borrow the body as a JSON object.
pub(crate) fn as_object(body: &Value) -> Result<&Map<String, Value>, ValidationError> {
    body.as_object().ok_or(ValidationError::NotAnObject)
}
