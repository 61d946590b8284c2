//! Login, self-registration and password reset

use fleetdesk_domain::model::UserRecord;
use fleetdesk_domain::repository::UserRepository;
use fleetdesk_domain::service::{Mailer, PasswordHasher};
use fleetdesk_types::{Error, Result};
use uuid::Uuid;

const TEMPORARY_PASSWORD_LEN: usize = 10;

/// Registration form
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Account operations over a user directory
pub struct AuthService<'a, U, H> {
    users: &'a U,
    hasher: &'a H,
}

impl<'a, U: UserRepository, H: PasswordHasher> AuthService<'a, U, H> {
    pub fn new(users: &'a U, hasher: &'a H) -> Self {
        Self { users, hasher }
    }

    /// Check credentials; unknown user and wrong password are reported alike
    pub fn login(&self, username: &str, password: &str) -> Result<UserRecord> {
        let invalid = || Error::Mismatch("Invalid username or password.".to_string());

        let user = self.users.find_by_username(username)?.ok_or_else(invalid)?;
        if !self.hasher.verify(password, &user.password_hash)? {
            return Err(invalid());
        }
        tracing::info!(%username, "login");
        Ok(user)
    }

    pub fn register(&self, form: NewUser) -> Result<UserRecord> {
        let NewUser {
            username,
            name,
            email,
            password,
        } = form;
        let username = username.trim().to_string();
        let email = email.trim().to_string();

        for (field, value) in [("username", &username), ("email", &email), ("password", &password)] {
            if value.is_empty() {
                return Err(Error::InvalidInput(format!("{} must not be empty", field)));
            }
        }

        let record = UserRecord::new(username, name.trim(), email, self.hasher.hash(&password)?);
        self.users.insert(record.clone())?;
        Ok(record)
    }

    /// Mail a temporary password, then store its hash
    ///
    /// The hash is only replaced once delivery succeeds, so a mail failure
    /// leaves the old password working.
    pub fn reset_password(&self, username: &str, email: &str, mailer: &dyn Mailer) -> Result<()> {
        let user = self
            .users
            .find_by_username(username)?
            .filter(|u| u.has_email(email))
            .ok_or_else(|| Error::Mismatch("Username and email do not match.".to_string()))?;

        let temp_password = generate_temporary_password();
        let new_hash = self.hasher.hash(&temp_password)?;

        mailer.send_temporary_password(&user.email, &user.username, &temp_password)?;
        self.users.update_password(&user.username, &new_hash)?;
        Ok(())
    }
}

/// Random alphanumeric password for reset mails
pub fn generate_temporary_password() -> String {
    Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(TEMPORARY_PASSWORD_LEN)
        .collect()
}
