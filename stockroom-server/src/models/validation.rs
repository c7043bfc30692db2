//! Validation error types

use std::fmt;

/// Validation error for request input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field is absent (or `null`)
    Missing { field: &'static str },

    /// Field is empty after trimming
    Empty { field: &'static str },

    /// Field is present but not a string
    NotAString { field: &'static str },

    /// Field is not a positive integer identifier
    InvalidId { field: &'static str },

    /// Field does not parse to a finite number
    InvalidNumber { field: &'static str },

    /// Request body is not a JSON object
    NotAnObject,

    /// Update body carries none of the updatable fields
    NoUpdatableFields { allowed: &'static [&'static str] },

    /// Request body could not be decoded as JSON
    MalformedBody { reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { field } => write!(f, "{} is required", field),
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::NotAString { field } => write!(f, "{} must be a string", field),
            Self::InvalidId { field } => write!(f, "{} must be a positive integer", field),
            Self::InvalidNumber { field } => write!(f, "{} must be a finite number", field),
            Self::NotAnObject => write!(f, "request body must be a JSON object"),
            Self::NoUpdatableFields { allowed } => {
                write!(f, "provide at least one of: {}", allowed.join(", "))
            }
            Self::MalformedBody { reason } => write!(f, "invalid JSON body: {}", reason),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::InvalidId { field: "userId" };
        assert_eq!(err.to_string(), "userId must be a positive integer");

        let err = ValidationError::NoUpdatableFields {
            allowed: &["email", "name"],
        };
        assert_eq!(err.to_string(), "provide at least one of: email, name");
    }
}
