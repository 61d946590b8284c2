//! Persistence implementations
//!
//! File-based implementations of the repository traits. Every mutation
//! rewrites the whole file; there is no locking, so the last writer wins.

mod file_user_directory;
mod file_vehicle_store;

pub use file_user_directory::FileUserDirectory;
pub use file_vehicle_store::FileVehicleStore;
