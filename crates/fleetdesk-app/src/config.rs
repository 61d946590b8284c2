//! Configuration management for fleetdesk
//!
//! Config stored at: ~/.config/fleetdesk/config.json

use fleetdesk_infra::mail::SmtpSettings;
use fleetdesk_types::{ConfigError, OutputFormat, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable that overrides the stored SMTP password
pub const SMTP_PASSWORD_ENV: &str = "FLEETDESK_SMTP_PASSWORD";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding both CSV tables. Defaults to the platform data dir.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// User directory file name
    #[serde(default = "default_user_file")]
    pub user_file: String,

    /// Vehicle table file name
    #[serde(default = "default_vehicle_file")]
    pub vehicle_file: String,

    /// Default output format (json, table)
    #[serde(default)]
    pub output_format: OutputFormat,

    /// bcrypt work factor for new hashes
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,

    #[serde(default)]
    pub smtp: SmtpSettings,
}

fn default_user_file() -> String {
    "users.csv".to_string()
}

fn default_vehicle_file() -> String {
    "vehicle_trip_data_synced.csv".to_string()
}

fn default_bcrypt_cost() -> u32 {
    12
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            user_file: default_user_file(),
            vehicle_file: default_vehicle_file(),
            output_format: OutputFormat::default(),
            bcrypt_cost: default_bcrypt_cost(),
            smtp: SmtpSettings::default(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("fleetdesk");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Directory holding the CSV tables
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }

        let data_dir = dirs::data_dir()
            .ok_or(ConfigError::NotFound)?
            .join("fleetdesk");
        Ok(data_dir)
    }

    pub fn user_csv_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(&self.user_file))
    }

    pub fn vehicle_csv_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(&self.vehicle_file))
    }

    /// SMTP settings with the environment password applied
    pub fn effective_smtp(&self) -> SmtpSettings {
        let mut smtp = self.smtp.clone();
        if let Ok(password) = std::env::var(SMTP_PASSWORD_ENV) {
            if !password.is_empty() {
                smtp.password = Some(password);
            }
        }
        smtp
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        Ok(())
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "fleetdesk Configuration")?;
        writeln!(f, "=======================")?;
        writeln!(f)?;
        writeln!(
            f,
            "Data dir:       {}",
            self.data_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;
        writeln!(f, "User file:      {}", self.user_file)?;
        writeln!(f, "Vehicle file:   {}", self.vehicle_file)?;
        writeln!(f, "Output format:  {}", self.output_format)?;
        writeln!(f, "bcrypt cost:    {}", self.bcrypt_cost)?;
        writeln!(f, "SMTP server:    {}:{}", self.smtp.host, self.smtp.port)?;
        writeln!(f, "SMTP sender:    {}", self.smtp.sender)?;
        writeln!(
            f,
            "SMTP password:  {}",
            if self.effective_smtp().password.is_some() {
                "(set)"
            } else {
                "(not set)"
            }
        )?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:    {}", path.display())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"data_dir": "/srv/fleet"}"#).unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/srv/fleet")));
        assert_eq!(config.user_file, "users.csv");
        assert_eq!(config.vehicle_file, "vehicle_trip_data_synced.csv");
        assert_eq!(config.smtp.port, 587);
        assert_eq!(config.output_format, OutputFormat::Table);
    }

    #[test]
    fn test_paths_join_data_dir() {
        let config = Config {
            data_dir: Some(PathBuf::from("/srv/fleet")),
            ..Default::default()
        };
        assert_eq!(
            config.vehicle_csv_path().unwrap(),
            PathBuf::from("/srv/fleet/vehicle_trip_data_synced.csv")
        );
        assert_eq!(
            config.user_csv_path().unwrap(),
            PathBuf::from("/srv/fleet/users.csv")
        );
    }
}
