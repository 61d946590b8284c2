//! CLI definition using clap

use clap::{Parser, Subcommand};
use fleetdesk_types::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fleetdesk")]
#[command(version)]
#[command(about = "Look up and edit vehicle records")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding users.csv and the vehicle table (overrides config)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new user account
    Register {
        #[arg(long, short = 'u')]
        username: String,

        /// Display name
        #[arg(long, short = 'n', default_value = "")]
        name: String,

        #[arg(long, short = 'e')]
        email: String,

        #[arg(long, short = 'p')]
        password: String,
    },

    /// Email a temporary password to a user
    ResetPassword {
        #[arg(long, short = 'u')]
        username: String,

        /// Must match the registered address
        #[arg(long, short = 'e')]
        email: String,
    },

    /// Start an interactive session (login, lookup, edit, export)
    Shell,

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set data directory
        #[arg(long)]
        set_data_dir: Option<PathBuf>,

        /// Set default output format
        #[arg(long)]
        set_format: Option<OutputFormat>,

        /// Set SMTP server host
        #[arg(long)]
        set_smtp_host: Option<String>,

        /// Set SMTP server port
        #[arg(long)]
        set_smtp_port: Option<u16>,

        /// Set SMTP sender address
        #[arg(long)]
        set_smtp_sender: Option<String>,

        /// Set SMTP password (FLEETDESK_SMTP_PASSWORD takes precedence)
        #[arg(long)]
        set_smtp_password: Option<String>,

        /// Set bcrypt cost for new password hashes
        #[arg(long)]
        set_bcrypt_cost: Option<u32>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}
