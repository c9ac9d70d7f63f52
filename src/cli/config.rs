//! Configuration file
//!
//! ```json
//! {
//!   "database_path": "./fleetdesk.db",
//!   "http": { "host": "0.0.0.0", "port": 8080, "cors_origins": [] },
//!   "session_ttl_minutes": 720,
//!   "search_limit_max": 100,
//!   "log_level": "INFO"
//! }
//! ```

use std::fs;
use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::auth::SessionConfig;
use crate::http_server::HttpServerConfig;
use crate::observability::{log_event_with_fields, Event, Logger, Severity};
use crate::storage::Database;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// SQLite file, or `:memory:` for a throwaway database (required)
    pub database_path: String,

    #[serde(default)]
    pub http: HttpServerConfig,

    #[serde(default = "default_session_ttl_minutes")]
    pub session_ttl_minutes: u32,

    /// Upper bound for person search page size
    #[serde(default = "default_search_limit_max")]
    pub search_limit_max: u32,

    /// TRACE, INFO, WARN, ERROR or FATAL; INFO when absent
    #[serde(default)]
    pub log_level: Option<String>,
}

fn default_session_ttl_minutes() -> u32 {
    720
}

fn default_search_limit_max() -> u32 {
    100
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        let source = path.display().to_string();
        log_event_with_fields(
            Event::ConfigLoaded,
            &[("path", source.as_str()), ("database", config.database_path.as_str())],
        );

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.database_path.trim().is_empty() {
            return Err(CliError::config_error("database_path must not be empty"));
        }
        if self.session_ttl_minutes == 0 {
            return Err(CliError::config_error("session_ttl_minutes must be > 0"));
        }
        if self.search_limit_max == 0 {
            return Err(CliError::config_error("search_limit_max must be > 0"));
        }
        self.severity()?;
        Ok(())
    }

    pub fn severity(&self) -> CliResult<Severity> {
        match &self.log_level {
            Some(level) => level.parse().map_err(CliError::config_error),
            None => Ok(Severity::Info),
        }
    }

    /// Set the process-wide log threshold
    pub fn apply_log_level(&self) -> CliResult<()> {
        Logger::set_min_severity(self.severity()?);
        Ok(())
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            ttl: Duration::minutes(i64::from(self.session_ttl_minutes)),
        }
    }

    /// Open the configured database, creating the schema if needed
    pub fn open_database(&self) -> CliResult<Database> {
        Ok(Database::open(&self.database_path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, value: serde_json::Value) -> std::path::PathBuf {
        let path = dir.path().join("fleetdesk.json");
        fs::write(&path, value.to_string()).unwrap();
        path
    }

    #[test]
    fn test_config_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, json!({ "database_path": ":memory:" }));

        let config = Config::load(&path).unwrap();
        assert_eq!(config.session_ttl_minutes, 720);
        assert_eq!(config.search_limit_max, 100);
        assert_eq!(config.http, HttpServerConfig::default());
        assert_eq!(config.severity().unwrap(), Severity::Info);
        assert_eq!(config.session_config().ttl, Duration::hours(12));
    }

    #[test]
    fn test_config_requires_database_path() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, json!({ "http": { "port": 9000 } }));
        assert!(Config::load(&path).is_err());

        let path = write_config(&dir, json!({ "database_path": "  " }));
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_config_rejects_bad_values() {
        let dir = TempDir::new().unwrap();
        for bad in [
            json!({ "database_path": "x.db", "session_ttl_minutes": 0 }),
            json!({ "database_path": "x.db", "search_limit_max": 0 }),
            json!({ "database_path": "x.db", "log_level": "LOUD" }),
        ] {
            let path = write_config(&dir, bad);
            assert!(Config::load(&path).is_err());
        }
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(&dir.path().join("absent.json")).unwrap_err();
        assert_eq!(err.code_str(), "FLEET_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_http_section_overrides() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            json!({
                "database_path": ":memory:",
                "http": { "host": "0.0.0.0", "port": 9000, "cors_origins": [] },
                "log_level": "warn"
            }),
        );
        let config = Config::load(&path).unwrap();
        assert_eq!(config.http.socket_addr(), "0.0.0.0:9000");
        assert!(config.http.cors_origins.is_empty());
        assert_eq!(config.severity().unwrap(), Severity::Warn);
    }
}
