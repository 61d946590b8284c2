//! Application use cases

pub mod auth_service;
pub mod session;

pub use auth_service::{generate_temporary_password, AuthService, NewUser};
pub use session::{Page, Session};
