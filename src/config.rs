//! TOML configuration: monitored solar sites and controllable cars.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Top-level configuration file contents.
///
/// ```toml
/// [[sites]]
/// name = "home"
/// site_id = 117
/// api_key = "SE-KEY"
/// latitude = 59.12
/// longitude = 10.34
/// start_charge_threshold = 5000.0
/// stop_charge_threshold = 2000.0
///
/// [[cars]]
/// name = "nikola"
/// vehicle_id = 42
/// access_token = "owner-api-token"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sites: Vec<SiteConfig>,
    #[serde(default)]
    pub cars: Vec<CarConfig>,
}

/// One SolarEdge site and its charging thresholds in watts.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    pub name: String,
    pub site_id: u64,
    pub api_key: String,
    pub latitude: f64,
    pub longitude: f64,
    pub start_charge_threshold: f64,
    pub stop_charge_threshold: f64,
}

/// One Tesla vehicle and the access token that controls it.
#[derive(Debug, Clone, Deserialize)]
pub struct CarConfig {
    pub name: String,
    pub vehicle_id: i64,
    pub access_token: String,
}

impl Config {
    /// Load from an explicit path, or from the default user config dir.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => default_config_path()?,
        };
        let raw = fs::read_to_string(&path).map_err(|err| {
            Error::Configuration(format!("cannot read {}: {err}", path.display()))
        })?;
        Ok(toml::from_str(&raw)?)
    }
}

fn default_config_path() -> Result<PathBuf> {
    directories::ProjectDirs::from("", "", "solarcharge")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .ok_or_else(|| Error::Configuration("cannot determine config directory".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"
        [[sites]]
        name = "home"
        site_id = 117
        api_key = "SE-KEY"
        latitude = 59.12
        longitude = 10.34
        start_charge_threshold = 5000.0
        stop_charge_threshold = 2000.0

        [[cars]]
        name = "nikola"
        vehicle_id = 42
        access_token = "owner-api-token"
    "#;

    #[test]
    fn parses_sites_and_cars() {
        let config: Config = toml::from_str(SAMPLE).expect("sample config");
        assert_eq!(config.sites.len(), 1);
        assert_eq!(config.cars.len(), 1);
        assert_eq!(config.sites[0].name, "home");
        assert_eq!(config.sites[0].site_id, 117);
        assert_eq!(config.sites[0].start_charge_threshold, 5000.0);
        assert_eq!(config.cars[0].vehicle_id, 42);
    }

    #[test]
    fn empty_file_yields_empty_lists() {
        let config: Config = toml::from_str("").expect("empty config");
        assert!(config.sites.is_empty());
        assert!(config.cars.is_empty());
    }

    #[test]
    fn missing_file_is_a_configuration_error() {
        let err = Config::load(Some(Path::new("/nonexistent/config.toml"))).expect_err("missing");
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn malformed_toml_is_a_configuration_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "sites = 3").expect("write");
        let err = Config::load(Some(&path)).expect_err("malformed");
        assert!(matches!(err, Error::Configuration(_)));
    }
}
