//! Configuration loading from TOML files
//!
//! Config file is selected via:
//! 1. --config <path> command line argument
//! 2. CONFIG_FILE environment variable
//! 3. Default: config/dev.toml
//!
//! Store connection settings come from the environment (`MONGO_URI`,
//! `MONGO_DB`) when set, overriding the file. Credentials never live
//! in the file or in code.

use crate::domain::types::ClassMultipliers;
use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Path to the static dashboard page served at /
    #[serde(default = "default_page_path")]
    pub page_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: default_port(), page_path: default_page_path() }
    }
}

fn default_port() -> u16 {
    5000
}

fn default_page_path() -> String {
    "static/index.html".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Connection string; overridden by MONGO_URI. The file default is
    /// credential-free.
    #[serde(default = "default_store_uri")]
    pub uri: String,
    /// Database name; overridden by MONGO_DB
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_people_collection")]
    pub people_collection: String,
    #[serde(default = "default_vip_collection")]
    pub vip_collection: String,
    #[serde(default = "default_front_collection")]
    pub front_collection: String,
    /// Well-known id of the people singleton document
    #[serde(default = "default_people_doc_id")]
    pub people_doc_id: String,
    /// Well-known id of each vehicle singleton document
    #[serde(default = "default_vehicle_doc_id")]
    pub vehicle_doc_id: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: default_store_uri(),
            database: default_database(),
            people_collection: default_people_collection(),
            vip_collection: default_vip_collection(),
            front_collection: default_front_collection(),
            people_doc_id: default_people_doc_id(),
            vehicle_doc_id: default_vehicle_doc_id(),
        }
    }
}

fn default_store_uri() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_database() -> String {
    "occupancy".to_string()
}

fn default_people_collection() -> String {
    "people_counting_data".to_string()
}

fn default_vip_collection() -> String {
    "vehicle_counting_VIP".to_string()
}

fn default_front_collection() -> String {
    "vehicle_counting_front".to_string()
}

fn default_people_doc_id() -> String {
    "full_dashboard_data".to_string()
}

fn default_vehicle_doc_id() -> String {
    "vehicle_count_data".to_string()
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct PeopleConfig {
    /// Stream whose last_updated is reported in the summary
    #[serde(default = "default_designated_stream")]
    pub designated_stream: String,
}

fn default_designated_stream() -> String {
    "stream_0".to_string()
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub people: PeopleConfig,
    #[serde(default)]
    pub vehicles: ClassMultipliers,
}

/// Main configuration struct used throughout the application
#[derive(Debug, Clone)]
pub struct Config {
    port: u16,
    page_path: String,
    store: StoreConfig,
    designated_stream: String,
    multipliers: ClassMultipliers,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default(), "default")
    }
}

impl Config {
    /// Determine config file path from the CLI argument or environment
    pub fn resolve_config_path(cli_path: Option<&str>) -> String {
        if let Some(path) = cli_path {
            return path.to_string();
        }

        // Check CONFIG_FILE environment variable
        if let Ok(path) = env::var("CONFIG_FILE") {
            return path;
        }

        // Default to dev.toml
        "config/dev.toml".to_string()
    }

    fn from_toml(toml_config: TomlConfig, config_file: &str) -> Self {
        let mut store = toml_config.store;
        if let Ok(uri) = env::var("MONGO_URI") {
            store.uri = uri;
        }
        if let Ok(database) = env::var("MONGO_DB") {
            store.database = database;
        }

        let designated_stream = if toml_config.people.designated_stream.is_empty() {
            default_designated_stream()
        } else {
            toml_config.people.designated_stream
        };

        Self {
            port: toml_config.server.port,
            page_path: toml_config.server.page_path,
            store,
            designated_stream,
            multipliers: toml_config.vehicles,
            config_file: config_file.to_string(),
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let toml_config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(Self::from_toml(toml_config, &path.display().to_string()))
    }

    /// Load configuration - tries the TOML file first, falls back to
    /// defaults (env overrides apply either way)
    pub fn load_from_path(path: &str) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: {}. Using defaults.", e);
                Self::default()
            }
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn page_path(&self) -> &str {
        &self.page_path
    }

    pub fn store(&self) -> &StoreConfig {
        &self.store
    }

    pub fn designated_stream(&self) -> &str {
        &self.designated_stream
    }

    pub fn multipliers(&self) -> &ClassMultipliers {
        &self.multipliers
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port(), 5000);
        assert_eq!(config.page_path(), "static/index.html");
        assert_eq!(config.designated_stream(), "stream_0");
        assert_eq!(config.store().database, "occupancy");
        assert_eq!(config.store().people_doc_id, "full_dashboard_data");
        assert_eq!(config.store().vehicle_doc_id, "vehicle_count_data");
        assert_eq!(config.multipliers().car, 4);
        assert_eq!(config.multipliers().bus, 20);
    }

    #[test]
    fn test_default_store_uri_has_no_credentials() {
        let config = Config::default();
        assert!(!config.store().uri.contains('@'));
    }

    // Single test for all three resolution steps: CONFIG_FILE is
    // process-global, so splitting this up would race under the
    // parallel test runner.
    #[test]
    fn test_resolve_config_path() {
        env::remove_var("CONFIG_FILE");
        assert_eq!(Config::resolve_config_path(None), "config/dev.toml");

        env::set_var("CONFIG_FILE", "config/site.toml");
        assert_eq!(Config::resolve_config_path(None), "config/site.toml");

        // CLI argument wins over the environment
        assert_eq!(
            Config::resolve_config_path(Some("config/other.toml")),
            "config/other.toml"
        );

        env::remove_var("CONFIG_FILE");
    }
}
