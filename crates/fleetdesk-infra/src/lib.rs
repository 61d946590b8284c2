//! Infrastructure layer - persistence implementations, export, external capabilities

pub mod excel;
pub mod mail;
pub mod password;
pub mod persistence;
pub mod vehicle_csv;
