use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 digest of the plaintext password. The cloud API
/// authenticates against this digest, so the plaintext never leaves the
/// process and never lands in the config file.
pub fn passhash(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}
