//! SMTP delivery of temporary passwords

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use serde::{Deserialize, Serialize};

use fleetdesk_domain::service::notifier::{temporary_password_body, TEMPORARY_PASSWORD_SUBJECT};
use fleetdesk_domain::service::Mailer;
use fleetdesk_types::{Error, Result};

/// SMTP submission settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmtpSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Sender address, also the login name
    #[serde(default = "default_sender")]
    pub sender: String,

    #[serde(default)]
    pub password: Option<String>,
}

fn default_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_port() -> u16 {
    587
}

fn default_sender() -> String {
    "yourcompany@example.com".to_string()
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            sender: default_sender(),
            password: None,
        }
    }
}

/// Sends mail through a STARTTLS relay with password login
pub struct SmtpMailer {
    settings: SmtpSettings,
}

impl SmtpMailer {
    pub fn new(settings: SmtpSettings) -> Self {
        Self { settings }
    }

    fn build_message(&self, to_email: &str, username: &str, temp_password: &str) -> Result<Message> {
        let from = self
            .settings
            .sender
            .parse::<Mailbox>()
            .map_err(|e| Error::EmailDelivery(format!("invalid sender address: {}", e)))?;
        let to = to_email
            .parse::<Mailbox>()
            .map_err(|e| Error::EmailDelivery(format!("invalid recipient address: {}", e)))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(TEMPORARY_PASSWORD_SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(temporary_password_body(username, temp_password))
            .map_err(|e| Error::EmailDelivery(e.to_string()))
    }
}

impl Mailer for SmtpMailer {
    fn send_temporary_password(
        &self,
        to_email: &str,
        username: &str,
        temp_password: &str,
    ) -> Result<()> {
        let password = self
            .settings
            .password
            .clone()
            .ok_or_else(|| Error::EmailDelivery("SMTP password is not configured".to_string()))?;
        let message = self.build_message(to_email, username, temp_password)?;

        let transport = SmtpTransport::starttls_relay(&self.settings.host)
            .map_err(|e| Error::EmailDelivery(e.to_string()))?
            .port(self.settings.port)
            .credentials(Credentials::new(self.settings.sender.clone(), password))
            .build();

        transport.send(&message).map_err(|e| {
            tracing::warn!(error = %e, host = %self.settings.host, "mail delivery failed");
            Error::EmailDelivery(e.to_string())
        })?;

        tracing::info!(%username, "temporary password sent");
        Ok(())
    }
}
