//! Price validation

use serde_json::Value;

use super::ValidationError;

/// Finite price value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Price(f64);

impl Price {
    /// Accepts a JSON number or a string that parses to a finite number.
    pub fn from_json(value: Option<&Value>, field: &'static str) -> Result<Self, ValidationError> {
        let raw = match value {
            None | Some(Value::Null) => return Err(ValidationError::Missing { field }),
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            Some(_) => None,
        };

        match raw {
            Some(v) if v.is_finite() => Ok(Self(v)),
            _ => Err(ValidationError::InvalidNumber { field }),
        }
    }

    pub const fn get(self) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_numbers_and_numeric_strings() {
        assert_eq!(Price::from_json(Some(&json!(10)), "price").unwrap().get(), 10.0);
        assert_eq!(Price::from_json(Some(&json!(9.99)), "price").unwrap().get(), 9.99);
        assert_eq!(Price::from_json(Some(&json!("4.5")), "price").unwrap().get(), 4.5);
        assert_eq!(Price::from_json(Some(&json!(-1)), "price").unwrap().get(), -1.0);
    }

    #[test]
    fn rejects_non_finite_and_non_numeric() {
        for v in [json!("abc"), json!("NaN"), json!("inf"), json!(""), json!(true), json!([1])] {
            assert_eq!(
                Price::from_json(Some(&v), "price").unwrap_err(),
                ValidationError::InvalidNumber { field: "price" },
                "input {v}"
            );
        }
        assert_eq!(
            Price::from_json(None, "price").unwrap_err(),
            ValidationError::Missing { field: "price" }
        );
    }
}
