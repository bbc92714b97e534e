//! Salted password hashing.
//!
//! Stored form is `hex(salt):hex(sha256(salt || password))`.

use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Length of the random salt in bytes.
pub const SALT_LEN: usize = 16;

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    let digest = digest(&salt, password);
    format!("{}:{}", hex::encode(salt), hex::encode(digest))
}

/// Check a plaintext candidate against a stored `salt:digest` string.
///
/// Malformed stored values never match.
pub fn verify_password(candidate: &str, stored: &str) -> bool {
    let Some((salt, expected)) = decode(stored) else {
        return false;
    };

    let actual = digest(&salt, candidate);
    actual.as_slice().ct_eq(expected.as_slice()).into()
}

/// Whether `stored` has the `hex(salt):hex(digest)` shape `hash_password`
/// produces.
pub fn is_well_formed(stored: &str) -> bool {
    matches!(decode(stored), Some((salt, digest)) if salt.len() == SALT_LEN && digest.len() == 32)
}

fn decode(stored: &str) -> Option<(Vec<u8>, Vec<u8>)> {
    let parts: Vec<&str> = stored.split(':').collect();
    let [salt_hex, digest_hex] = parts.as_slice() else {
        return None;
    };
    match (hex::decode(salt_hex), hex::decode(digest_hex)) {
        (Ok(salt), Ok(digest)) => Some((salt, digest)),
        _ => None,
    }
}

fn digest(salt: &[u8], password: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}
