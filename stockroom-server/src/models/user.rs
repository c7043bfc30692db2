//! User input validation

use serde_json::Value;

use super::text::{as_object, nullable_text};
use super::{RequiredText, ValidationError};

const UPDATABLE: &[&str] = &["email", "name"];

/// Validated `POST /users` body
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: RequiredText,
    pub name: Option<String>,
}

impl NewUser {
    pub fn from_json(body: &Value) -> Result<Self, ValidationError> {
        let obj = as_object(body)?;
        let email = RequiredText::from_json(obj.get("email"), "email")?;
        let name = match obj.get("name") {
            Some(v) => nullable_text(v, "name")?,
            None => None,
        };
        Ok(Self { email, name })
    }
}

/// Validated `PUT /users/:id` body
///
/// `name: Some(None)` clears the name; `None` leaves it untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct UserChanges {
    pub email: Option<RequiredText>,
    pub name: Option<Option<String>>,
}

impl UserChanges {
    pub fn from_json(body: &Value) -> Result<Self, ValidationError> {
        let obj = as_object(body)?;
        let email_raw = obj.get("email");
        let name_raw = obj.get("name");

        if email_raw.is_none() && name_raw.is_none() {
            return Err(ValidationError::NoUpdatableFields { allowed: UPDATABLE });
        }

        let email = match email_raw {
            Some(Value::Null) => return Err(ValidationError::NotAString { field: "email" }),
            Some(v) => Some(RequiredText::from_json(Some(v), "email")?),
            None => None,
        };
        let name = name_raw.map(|v| nullable_text(v, "name")).transpose()?;

        Ok(Self { email, name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_requires_email() {
        assert_eq!(
            NewUser::from_json(&json!({"name": "Ada"})).unwrap_err(),
            ValidationError::Missing { field: "email" }
        );
        assert_eq!(
            NewUser::from_json(&json!({"email": 5})).unwrap_err(),
            ValidationError::NotAString { field: "email" }
        );
    }

    #[test]
    fn create_name_is_optional() {
        let user = NewUser::from_json(&json!({"email": "a@x.com"})).unwrap();
        assert_eq!(user.email.as_str(), "a@x.com");
        assert_eq!(user.name, None);

        let user = NewUser::from_json(&json!({"email": "a@x.com", "name": "Ada"})).unwrap();
        assert_eq!(user.name.as_deref(), Some("Ada"));
    }

    #[test]
    fn create_rejects_non_object() {
        assert_eq!(
            NewUser::from_json(&json!(["a@x.com"])).unwrap_err(),
            ValidationError::NotAnObject
        );
    }

    #[test]
    fn update_requires_a_known_field() {
        let err = UserChanges::from_json(&json!({})).unwrap_err();
        assert!(matches!(err, ValidationError::NoUpdatableFields { .. }));

        let err = UserChanges::from_json(&json!({"nickname": "x"})).unwrap_err();
        assert!(matches!(err, ValidationError::NoUpdatableFields { .. }));
    }

    #[test]
    fn update_partial_fields() {
        let changes = UserChanges::from_json(&json!({"name": "Grace"})).unwrap();
        assert_eq!(changes.email, None);
        assert_eq!(changes.name, Some(Some("Grace".to_owned())));

        let changes = UserChanges::from_json(&json!({"name": null})).unwrap();
        assert_eq!(changes.name, Some(None));

        let changes = UserChanges::from_json(&json!({"email": "b@x.com"})).unwrap();
        assert_eq!(changes.email.unwrap().as_str(), "b@x.com");
        assert_eq!(changes.name, None);
    }

    #[test]
    fn update_rejects_blank_email() {
        assert_eq!(
            UserChanges::from_json(&json!({"email": " "})).unwrap_err(),
            ValidationError::Empty { field: "email" }
        );
        assert_eq!(
            UserChanges::from_json(&json!({"email": null})).unwrap_err(),
            ValidationError::NotAString { field: "email" }
        );
    }
}
