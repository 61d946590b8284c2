//! Domain layer - records, table operations, repository and service traits

pub mod model;
pub mod repository;
pub mod service;
