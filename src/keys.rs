// API key generation and verification
//
// This module implements the API key scheme for the audio API.
// Keys are random URL-safe strings with a fixed prefix; only a bcrypt hash
// of a key is kept in configuration, never the key itself.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

/// Prefix prepended to every generated key for recognizability
pub const KEY_PREFIX: &str = "fw_";

/// Number of random bytes in a key (256 bits of entropy)
const KEY_BYTES: usize = 32;

/// Generate a new random API key
///
/// The secret part is read from the operating system RNG and encoded as
/// URL-safe base64 without padding, giving 43 characters after the prefix.
pub fn generate_api_key() -> String {
    let mut bytes = [0u8; KEY_BYTES];
    OsRng.fill_bytes(&mut bytes);
    format!("{}{}", KEY_PREFIX, URL_SAFE_NO_PAD.encode(bytes))
}

/// Hash an API key with bcrypt
///
/// Each call draws a fresh salt, so hashing the same key twice yields two
/// different strings. The cost parameter controls the bcrypt work factor.
pub fn hash_api_key(key: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(key, cost)
}

/// Verify an API key against a stored bcrypt hash
///
/// Returns false for a wrong key, a malformed hash, or any internal bcrypt
/// error. This function never panics and never propagates an error.
pub fn verify_api_key(key: &str, hash: &str) -> bool {
    bcrypt::verify(key, hash).unwrap_or(false)
}
