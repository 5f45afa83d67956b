//! Person Name Value Object
//!
//! Used for first and last names. Trims surrounding whitespace and
//! enforces a sane length range.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

const NAME_MIN_LENGTH: usize = 2;
const NAME_MAX_LENGTH: usize = 64;

/// A single name component (first or last name)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName(String);

impl PersonName {
    /// Create a new name with validation
    pub fn new(name: impl Into<String>) -> AppResult<Self> {
        let name = name.into().trim().to_string();

        let chars = name.chars().count();
        if chars < NAME_MIN_LENGTH {
            return Err(AppError::bad_request(format!(
                "Name must be at least {NAME_MIN_LENGTH} characters"
            )));
        }
        if chars > NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Name must be at most {NAME_MAX_LENGTH} characters"
            )));
        }
        if name.chars().any(char::is_control) {
            return Err(AppError::bad_request("Name contains invalid characters"));
        }

        Ok(Self(name))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_db(self) -> String {
        self.0
    }
}

impl std::fmt::Display for PersonName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_valid() {
        assert!(PersonName::new("Asha").is_ok());
        assert!(PersonName::new("  De Souza  ").is_ok());
        // Multibyte names count by characters, not bytes
        assert!(PersonName::new("李明").is_ok());
    }

    #[test]
    fn test_name_invalid() {
        assert!(PersonName::new("").is_err());
        assert!(PersonName::new("A").is_err());
        assert!(PersonName::new("a\u{0}b").is_err());
        assert!(PersonName::new("x".repeat(65)).is_err());
    }

    #[test]
    fn test_name_trimmed() {
        let name = PersonName::new("  Ravi ").unwrap();
        assert_eq!(name.as_str(), "Ravi");
    }
}
