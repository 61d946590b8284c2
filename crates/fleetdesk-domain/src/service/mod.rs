//! Service capabilities the application layer depends on

pub mod credentials;
pub mod notifier;

pub use credentials::PasswordHasher;
pub use notifier::Mailer;
