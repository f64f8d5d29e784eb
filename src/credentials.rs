//! Password storage for `user_details.password_hash`. Values are stored as
//! `salt$digest`, both hex encoded, where the digest is SHA-256 over the salt
//! bytes followed by the UTF-8 password.

use rand::RngCore;
use sha2::{Digest, Sha256};

const SALT_LEN: usize = 16;

/// Hash a password with a freshly generated salt.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    hash_with_salt(password, &salt)
}

/// Check a candidate password against a stored `salt$digest` value. Malformed
/// stored values never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_hex, _)) = stored.split_once('$') else {
        return false;
    };
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };
    hash_with_salt(password, &salt) == stored
}

fn hash_with_salt(password: &str, salt: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    let digest = hasher.finalize();
    format!("{}${}", hex::encode(salt), hex::encode(digest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashed_password_verifies_and_hides_plaintext() {
        let stored = hash_password("admin123");

        assert!(!stored.contains("admin123"));
        assert!(verify_password("admin123", &stored));
        assert!(!verify_password("admin124", &stored));
    }

    #[test]
    fn same_password_gets_different_salts() {
        assert_ne!(hash_password("demo123"), hash_password("demo123"));
    }

    #[test]
    fn malformed_stored_values_never_verify() {
        assert!(!verify_password("demo123", "demo123"));
        assert!(!verify_password("demo123", "zz$abcd"));
        assert!(!verify_password("", ""));
    }
}
