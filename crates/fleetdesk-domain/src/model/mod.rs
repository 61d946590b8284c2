//! Domain model types

pub mod user;
pub mod vehicle;
pub mod vehicle_table;

pub use user::UserRecord;
pub use vehicle::{VehicleColumn, VehicleRecord};
pub use vehicle_table::{
    MergeReport, Snapshot, UploadReport, VehicleTable, VehicleView, ViewRow,
};
