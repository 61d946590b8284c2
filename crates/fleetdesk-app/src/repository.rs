//! Repository adapters for persistence layer

use fleetdesk_infra::mail::SmtpMailer;
use fleetdesk_infra::password::BcryptHasher;
use fleetdesk_infra::persistence::{FileUserDirectory, FileVehicleStore};
use fleetdesk_types::Result;

use crate::config::Config;

/// Open the user directory, creating an empty one if needed
pub fn open_user_directory(config: &Config) -> Result<FileUserDirectory> {
    FileUserDirectory::open(config.user_csv_path()?)
}

/// Open the vehicle table store
pub fn open_vehicle_store(config: &Config) -> Result<FileVehicleStore> {
    Ok(FileVehicleStore::new(config.vehicle_csv_path()?))
}

/// Password hasher at the configured cost
pub fn password_hasher(config: &Config) -> BcryptHasher {
    BcryptHasher::new(config.bcrypt_cost)
}

/// SMTP mailer from the configured settings
pub fn smtp_mailer(config: &Config) -> SmtpMailer {
    SmtpMailer::new(config.effective_smtp())
}
