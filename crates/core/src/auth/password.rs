//! Password hashing with bcrypt.

use crate::error::{HmsError, HmsResult};

/// Hashes a plaintext password.
pub fn hash(plain: &str) -> HmsResult<String> {
    bcrypt::hash(plain, bcrypt::DEFAULT_COST)
        .map_err(|e| HmsError::Internal(format!("password hashing failed: {e}")))
}

/// Verifies a plaintext password against a stored hash.
///
/// An unparseable stored hash counts as a mismatch rather than an error, so
/// a corrupted record can never be logged into.
pub fn verify(plain: &str, stored: &str) -> bool {
    bcrypt::verify(plain, stored).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trip() {
        let hashed = hash("s3cret-pw").expect("hashing should succeed");
        assert!(verify("s3cret-pw", &hashed));
        assert!(!verify("wrong-pw", &hashed));
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash("same-password").expect("hashing should succeed");
        let b = hash("same-password").expect("hashing should succeed");
        assert_ne!(a, b, "two hashes of one password must differ by salt");
    }

    #[test]
    fn verify_rejects_garbage_stored_hash() {
        assert!(!verify("anything", "not-a-bcrypt-string"));
    }
}
