//! Storage error type
//!
//! Backends classify their failures into these variants so that callers
//! never branch on driver-specific error codes.

use std::fmt::Display;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A unique constraint rejected the write
    #[error("duplicate value for unique field '{field}'")]
    UniqueViolation { field: &'static str },

    /// The target row (or the parent row it references) does not exist
    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    /// Anything else the storage layer reported
    #[error("database error: {0}")]
    Other(String),
}

impl DbError {
    pub fn not_found(resource: &'static str, id: impl Display) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        Self::Other(e.to_string())
    }
}

/// Classify a failed write.
///
/// `unique` names the field guarded by the unique constraint the statement
/// can trip; `parent` names the row a foreign key points at. A foreign-key
/// violation means the parent vanished, so it surfaces as not-found.
pub(crate) fn classify_write(
    err: sqlx::Error,
    unique: Option<&'static str>,
    parent: Option<(&'static str, i32)>,
) -> DbError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            if let Some(field) = unique {
                return DbError::UniqueViolation { field };
            }
        }
        if db_err.is_foreign_key_violation() {
            if let Some((resource, id)) = parent {
                return DbError::not_found(resource, id);
            }
        }
    }
    DbError::from(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            DbError::UniqueViolation { field: "email" }.to_string(),
            "duplicate value for unique field 'email'"
        );
        assert_eq!(
            DbError::not_found("user", 7).to_string(),
            "not found: user '7'"
        );
    }

    #[test]
    fn row_not_found_is_uncategorised() {
        let err = classify_write(sqlx::Error::RowNotFound, Some("email"), None);
        assert!(matches!(err, DbError::Other(_)));
    }
}
