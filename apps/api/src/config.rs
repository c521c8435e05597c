//! # API Configuration
//!
//! Settings are layered, later sources winning:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Defaults (this file)                                               │
//! │  2. TOML file named by PREQUOTE_CONFIG (optional)                      │
//! │  3. PREQUOTE_* environment variables                                   │
//! │        PREQUOTE_PORT=9000  →  port = 9000                              │
//! │        PREQUOTE_DB_PATH=/srv/prequote.db  →  db_path                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Without `db_path` the database lives in the platform data directory,
//! e.g. `~/.local/share/prequote/prequote.db` on Linux.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::NaiveDate;
use config::{Config, Environment, File};
use directories::ProjectDirs;
use prequote_core::export::ExportOptions;
use prequote_pdf::FontSet;
use serde::Deserialize;

use crate::state::DEFAULT_BODY_LIMIT;

/// Environment variable naming the TOML file.
pub const CONFIG_FILE_VAR: &str = "PREQUOTE_CONFIG";

const ENV_PREFIX: &str = "PREQUOTE";
const DB_FILE_NAME: &str = "prequote.db";

/// API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Interface to listen on.
    pub bind_addr: String,

    pub port: u16,

    /// SQLite file; platform data directory when unset.
    #[serde(default)]
    pub db_path: Option<PathBuf>,

    pub db_max_connections: u32,

    /// Printed as the document title.
    pub company_name: String,

    /// First segment of export file names.
    pub file_prefix: String,

    /// Address on the last footer line of exports.
    pub contact_email: String,

    /// TTF used for regular text (built-in Helvetica when unset).
    #[serde(default)]
    pub font_regular: Option<PathBuf>,

    /// TTF used for headings and totals (built-in Helvetica-Bold when unset).
    #[serde(default)]
    pub font_bold: Option<PathBuf>,

    /// Change events buffered per subscriber before it is told to resync.
    pub change_feed_capacity: usize,

    /// Largest accepted request body. Article images arrive inline as base64.
    pub max_body_bytes: usize,
}

impl AppConfig {
    /// Loads configuration from the file named by `PREQUOTE_CONFIG` (if set)
    /// and `PREQUOTE_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let file = env::var(CONFIG_FILE_VAR).ok().map(PathBuf::from);
        Self::from_sources(
            file,
            Environment::with_prefix(ENV_PREFIX).try_parsing(true),
        )
    }

    fn from_sources(file: Option<PathBuf>, environment: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("bind_addr", "127.0.0.1")?
            .set_default("port", 8080_i64)?
            .set_default("db_max_connections", 5_i64)?
            .set_default("company_name", "Lomartex, Lda")?
            .set_default("file_prefix", "Lomartex")?
            .set_default("contact_email", "info@lomartex.pt")?
            .set_default("change_feed_capacity", 256_i64)?
            .set_default("max_body_bytes", DEFAULT_BODY_LIMIT as i64)?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config: AppConfig = builder.add_source(environment).build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                field: "db_max_connections".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.file_prefix.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "file_prefix".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Socket address the server binds.
    pub fn bind_address(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                field: "bind_addr".to_string(),
                reason: format!("'{}' is not an IP address", self.bind_addr),
            })
    }

    /// Database file path, falling back to the platform data directory.
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.db_path {
            return Ok(path.clone());
        }
        ProjectDirs::from("pt", "Lomartex", "prequote")
            .map(|dirs| dirs.data_dir().join(DB_FILE_NAME))
            .ok_or(ConfigError::NoDataDirectory)
    }

    /// Export settings shared by every request.
    pub fn export_settings(&self) -> ExportSettings {
        ExportSettings {
            company_name: self.company_name.clone(),
            file_prefix: self.file_prefix.clone(),
            contact_email: self.contact_email.clone(),
            fonts: FontSet::from_files(self.font_regular.clone(), self.font_bold.clone()),
        }
    }
}

/// Organisation details and fonts used by the export endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSettings {
    pub company_name: String,
    pub file_prefix: String,
    pub contact_email: String,
    pub fonts: FontSet,
}

impl ExportSettings {
    /// Options for one export generated on `today`.
    pub fn options(&self, today: NaiveDate) -> ExportOptions {
        ExportOptions::new(
            self.company_name.as_str(),
            self.file_prefix.as_str(),
            self.contact_email.as_str(),
            today,
        )
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        ExportSettings {
            company_name: "Lomartex, Lda".to_string(),
            file_prefix: "Lomartex".to_string(),
            contact_email: "info@lomartex.pt".to_string(),
            fonts: FontSet::builtin(),
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Source(#[from] config::ConfigError),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("No platform data directory; set PREQUOTE_DB_PATH")]
    NoDataDirectory,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .source(Some(map))
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_sources(None, env(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.file_prefix, "Lomartex");
        assert_eq!(config.change_feed_capacity, 256);
        assert!(config.font_regular.is_none());
        assert_eq!(
            config.bind_address().unwrap(),
            "127.0.0.1:8080".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_environment_overrides() {
        let config = AppConfig::from_sources(
            None,
            env(&[
                ("PREQUOTE_PORT", "9000"),
                ("PREQUOTE_DB_PATH", "/srv/prequote/data.db"),
                ("PREQUOTE_COMPANY_NAME", "Acme Têxteis"),
            ]),
        )
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(
            config.database_path().unwrap(),
            PathBuf::from("/srv/prequote/data.db")
        );
        assert_eq!(config.export_settings().company_name, "Acme Têxteis");
    }

    #[test]
    fn test_file_layer_is_overridden_by_environment() {
        let path = env::temp_dir().join(format!("prequote-config-{}.toml", std::process::id()));
        std::fs::write(&path, "port = 7000\nfile_prefix = \"LMX\"\n").unwrap();

        let config =
            AppConfig::from_sources(Some(path.clone()), env(&[("PREQUOTE_PORT", "7100")])).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.port, 7100);
        assert_eq!(config.file_prefix, "LMX");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = AppConfig::from_sources(None, env(&[("PREQUOTE_DB_MAX_CONNECTIONS", "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let config = AppConfig::from_sources(None, env(&[("PREQUOTE_BIND_ADDR", "localhost")]))
            .unwrap();
        assert!(config.bind_address().is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = AppConfig::from_sources(
            Some(PathBuf::from("/nonexistent/prequote.toml")),
            env(&[]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Source(_)));
    }
}
