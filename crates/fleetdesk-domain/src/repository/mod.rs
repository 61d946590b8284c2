//! Repository trait definitions for data persistence

use std::io::Read;

use crate::model::{UploadReport, UserRecord, VehicleTable};
use fleetdesk_types::Error;

/// Directory of registered operators
pub trait UserRepository {
    /// Find a user by exact username
    fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, Error>;

    /// Find a user by email address
    fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, Error>;

    /// Add a user; fails with `DuplicateKey` if the username or email is taken
    fn insert(&self, record: UserRecord) -> Result<(), Error>;

    /// Replace a user's password hash
    fn update_password(&self, username: &str, new_hash: &str) -> Result<(), Error>;
}

/// Backing store of the vehicle table
pub trait VehicleRecordRepository {
    /// Read the whole table; fails with `MissingFile` if it does not exist
    fn reload(&self) -> Result<VehicleTable, Error>;

    /// Rewrite the whole table
    fn save(&self, table: &VehicleTable) -> Result<(), Error>;

    /// Validate a replacement table and overwrite the stored one with it
    fn replace_from_reader(
        &self,
        reader: &mut dyn Read,
    ) -> Result<(VehicleTable, UploadReport), Error>;
}
