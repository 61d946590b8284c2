//! Command handlers

use std::io;
use std::path::PathBuf;

use crate::cli::{Cli, Commands};
use crate::shell::Shell;
use fleetdesk_app::app::{AuthService, NewUser, Session};
use fleetdesk_app::config::Config;
use fleetdesk_app::repository::{
    open_user_directory, open_vehicle_store, password_hasher, smtp_mailer,
};
use fleetdesk_types::{OutputFormat, Result};

/// Execute CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;

    // Override from CLI args
    if let Some(ref dir) = cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    let output_format = cli.format.unwrap_or(config.output_format);

    match cli.command {
        Commands::Register {
            username,
            name,
            email,
            password,
        } => cmd_register(
            &config,
            NewUser {
                username,
                name,
                email,
                password,
            },
        ),

        Commands::ResetPassword { username, email } => {
            cmd_reset_password(&config, &username, &email)
        }

        Commands::Shell => cmd_shell(&config, output_format),

        Commands::Config {
            show,
            set_data_dir,
            set_format,
            set_smtp_host,
            set_smtp_port,
            set_smtp_sender,
            set_smtp_password,
            set_bcrypt_cost,
            reset,
        } => cmd_config(
            show,
            set_data_dir,
            set_format,
            set_smtp_host,
            set_smtp_port,
            set_smtp_sender,
            set_smtp_password,
            set_bcrypt_cost,
            reset,
        ),
    }
}

fn cmd_register(config: &Config, form: NewUser) -> Result<()> {
    let users = open_user_directory(config)?;
    let hasher = password_hasher(config);
    let auth = AuthService::new(&users, &hasher);

    let record = auth.register(form)?;
    println!("Registered user '{}' <{}>.", record.username, record.email);
    Ok(())
}

fn cmd_reset_password(config: &Config, username: &str, email: &str) -> Result<()> {
    let users = open_user_directory(config)?;
    let hasher = password_hasher(config);
    let auth = AuthService::new(&users, &hasher);
    let mailer = smtp_mailer(config);

    auth.reset_password(username, email, &mailer)?;
    println!("Temporary password sent to {}.", email);
    Ok(())
}

fn cmd_shell(config: &Config, output_format: OutputFormat) -> Result<()> {
    let users = open_user_directory(config)?;
    let hasher = password_hasher(config);
    let store = open_vehicle_store(config)?;
    tracing::info!(path = %store.csv_path().display(), "starting shell");

    let auth = AuthService::new(&users, &hasher);
    let session = Session::new(&store);
    let mut shell = Shell::new(session, auth, output_format);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    shell.run(stdin.lock(), &mut stdout)
}

#[allow(clippy::too_many_arguments)]
fn cmd_config(
    show: bool,
    set_data_dir: Option<PathBuf>,
    set_format: Option<OutputFormat>,
    set_smtp_host: Option<String>,
    set_smtp_port: Option<u16>,
    set_smtp_sender: Option<String>,
    set_smtp_password: Option<String>,
    set_bcrypt_cost: Option<u32>,
    reset: bool,
) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(dir) = set_data_dir {
        config.data_dir = Some(dir);
        modified = true;
    }

    if let Some(format) = set_format {
        config.output_format = format;
        modified = true;
    }

    if let Some(host) = set_smtp_host {
        config.smtp.host = host;
        modified = true;
    }

    if let Some(port) = set_smtp_port {
        config.smtp.port = port;
        modified = true;
    }

    if let Some(sender) = set_smtp_sender {
        config.smtp.sender = sender;
        modified = true;
    }

    if let Some(password) = set_smtp_password {
        config.smtp.password = Some(password);
        modified = true;
    }

    if let Some(cost) = set_bcrypt_cost {
        config.bcrypt_cost = cost;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}
