//! One-way password hashing

use fleetdesk_types::Error;

/// Hashes and verifies passwords
pub trait PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, Error>;

    /// `Ok(false)` for a wrong password; `Err` only if the hash is unreadable
    fn verify(&self, password: &str, hash: &str) -> Result<bool, Error>;
}
