//! User directory record

use serde::{Deserialize, Serialize};

/// A registered operator
///
/// CSV header: `username,name,email,password`. The `password` column holds the
/// bcrypt hash, never the plain password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub name: String,
    pub email: String,
    #[serde(rename = "password")]
    pub password_hash: String,
}

impl UserRecord {
    pub fn new(
        username: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
        }
    }

    /// Email comparison ignores ASCII case
    pub fn has_email(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim())
    }
}
