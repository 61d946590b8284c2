//! fleetdesk - vehicle record lookup and editing
//!
//! Command-line front end: one-shot account commands plus an interactive
//! shell holding the operator's session.

pub mod cli;
pub mod commands;
pub mod output;
pub mod shell;
