//! Password Hashing and Verification
//!
//! NIST SP 800-63B compliant password handling:
//! - Argon2id hashing (memory-hard, recommended by OWASP)
//! - Zeroization of the cleartext on drop
//! - Constant-time verification
//! - Optional application-wide pepper

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Minimum password length (NIST: SHALL be at least 8)
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length (NIST: SHOULD permit at least 64)
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    #[error("Password contains invalid control characters")]
    InvalidCharacter,

    #[error("Password is too common or follows a predictable pattern")]
    CommonPattern,
}

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

/// Cleartext password with automatic memory zeroization
///
/// Does not implement `Clone`; Debug output is redacted.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct RawPassword(String);

impl RawPassword {
    /// Create a new cleartext password with policy validation
    ///
    /// Unicode is normalized using NFKC before validation; length is
    /// counted in code points, not bytes.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let normalized: String = raw.nfkc().collect();

        if normalized.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        let char_count = normalized.chars().count();

        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        // Control characters (except space, tab, newline) are rejected
        for ch in normalized.chars() {
            if ch.is_control() && ch != ' ' && ch != '\t' && ch != '\n' {
                return Err(PasswordPolicyError::InvalidCharacter);
            }
        }

        if is_common_pattern(&normalized) {
            return Err(PasswordPolicyError::CommonPattern);
        }

        Ok(Self(normalized))
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Hash the password using Argon2id
    ///
    /// ## Arguments
    /// * `pepper` - Optional application-wide secret appended before hashing
    pub fn hash(&self, pepper: Option<&[u8]>) -> Result<StoredPassword, PasswordHashError> {
        let password_bytes = self.peppered(pepper);

        let salt = SaltString::generate(OsRng);

        // Argon2 crate defaults match the OWASP recommended Argon2id
        // parameters: m=19456 (19 MiB), t=2, p=1
        let argon2 = Argon2::default();

        let hash = argon2
            .hash_password(&password_bytes, &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(StoredPassword {
            hash: hash.to_string(),
        })
    }

    fn peppered(&self, pepper: Option<&[u8]>) -> Vec<u8> {
        match pepper {
            Some(p) => {
                let mut combined = self.as_bytes().to_vec();
                combined.extend_from_slice(p);
                combined
            }
            None => self.as_bytes().to_vec(),
        }
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

/// Hashed password in PHC string format (safe to store)
#[derive(Clone, PartialEq, Eq)]
pub struct StoredPassword {
    hash: String,
}

impl StoredPassword {
    /// Create from PHC string (e.g., from database)
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();

        PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;

        Ok(Self { hash })
    }

    /// Get the PHC string for storage
    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    /// Verify a password against this hash
    ///
    /// Argon2 uses constant-time comparison internally.
    ///
    /// ## Arguments
    /// * `password` - The cleartext password to verify
    /// * `pepper` - Must match the pepper used during hashing
    pub fn verify(&self, password: &RawPassword, pepper: Option<&[u8]>) -> bool {
        let password_bytes = password.peppered(pepper);

        let parsed_hash = match PasswordHash::new(&self.hash) {
            Ok(h) => h,
            Err(_) => return false,
        };

        Argon2::default()
            .verify_password(&password_bytes, &parsed_hash)
            .is_ok()
    }
}

impl fmt::Debug for StoredPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

/// Check for trivially weak patterns (all-same characters, straight runs)
fn is_common_pattern(password: &str) -> bool {
    let lower = password.to_lowercase();
    let chars: Vec<char> = lower.chars().collect();

    if chars.iter().all(|&c| c == chars[0]) {
        return true;
    }

    // Ascending or descending runs over the whole password ("12345678",
    // "abcdefgh")
    let ascending = chars
        .windows(2)
        .all(|w| (w[1] as u32).wrapping_sub(w[0] as u32) == 1);
    let descending = chars
        .windows(2)
        .all(|w| (w[0] as u32).wrapping_sub(w[1] as u32) == 1);

    ascending || descending
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_length() {
        assert!(matches!(
            RawPassword::new("short".to_string()),
            Err(PasswordPolicyError::TooShort { .. })
        ));
        assert!(matches!(
            RawPassword::new("x".repeat(200)),
            Err(PasswordPolicyError::TooLong { .. })
        ));
        assert!(RawPassword::new("correct horse battery".to_string()).is_ok());
    }

    #[test]
    fn test_policy_whitespace_and_control() {
        assert!(matches!(
            RawPassword::new("        ".to_string()),
            Err(PasswordPolicyError::EmptyOrWhitespace)
        ));
        assert!(matches!(
            RawPassword::new("pass\u{0007}word123".to_string()),
            Err(PasswordPolicyError::InvalidCharacter)
        ));
    }

    #[test]
    fn test_policy_common_patterns() {
        assert!(matches!(
            RawPassword::new("aaaaaaaa".to_string()),
            Err(PasswordPolicyError::CommonPattern)
        ));
        assert!(matches!(
            RawPassword::new("12345678".to_string()),
            Err(PasswordPolicyError::CommonPattern)
        ));
        assert!(matches!(
            RawPassword::new("hgfedcba".to_string()),
            Err(PasswordPolicyError::CommonPattern)
        ));
    }

    #[test]
    fn test_hash_and_verify() {
        let password = RawPassword::new("correct horse battery".to_string()).unwrap();
        let stored = password.hash(None).unwrap();

        assert!(stored.verify(&password, None));

        let wrong = RawPassword::new("wrong horse battery".to_string()).unwrap();
        assert!(!stored.verify(&wrong, None));
    }

    #[test]
    fn test_pepper_must_match() {
        let password = RawPassword::new("correct horse battery".to_string()).unwrap();
        let stored = password.hash(Some(b"pepper")).unwrap();

        assert!(stored.verify(&password, Some(b"pepper")));
        assert!(!stored.verify(&password, None));
        assert!(!stored.verify(&password, Some(b"other")));
    }

    #[test]
    fn test_phc_roundtrip() {
        let password = RawPassword::new("correct horse battery".to_string()).unwrap();
        let stored = password.hash(None).unwrap();

        let restored = StoredPassword::from_phc_string(stored.as_phc_string()).unwrap();
        assert!(restored.verify(&password, None));

        assert!(StoredPassword::from_phc_string("not-a-phc-string").is_err());
    }

    #[test]
    fn test_debug_is_redacted() {
        let password = RawPassword::new("correct horse battery".to_string()).unwrap();
        assert!(!format!("{:?}", password).contains("horse"));
    }
}
