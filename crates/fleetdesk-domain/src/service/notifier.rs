//! Outbound email

use fleetdesk_types::Error;

/// Delivers temporary passwords to users
pub trait Mailer {
    /// Fails with `EmailDelivery` carrying the underlying cause
    fn send_temporary_password(
        &self,
        to_email: &str,
        username: &str,
        temp_password: &str,
    ) -> Result<(), Error>;
}

/// Message body sent for a password reset
pub fn temporary_password_body(username: &str, temp_password: &str) -> String {
    format!("Hi {}, your temporary password is: {}", username, temp_password)
}

pub const TEMPORARY_PASSWORD_SUBJECT: &str = "Temporary Password";
