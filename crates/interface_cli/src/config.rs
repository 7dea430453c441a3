//! Application configuration
//!
//! Settings come from `WATER_`-prefixed environment variables (optionally
//! from a `.env` file); command line flags override them.

use std::time::Duration;

use serde::Deserialize;

use core_kernel::CoreError;
use domain_billing::{ReferenceNumber, UpdateOptions};
use infra_portal::PortalConfig;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Log filter used when `RUST_LOG` is not set
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
    /// Read fresh meter readings before billing
    pub update_readings: bool,
    /// Log the run parameters at info level
    pub verbose: bool,
    /// Consumption portal scheme and host
    pub portal_base_url: String,
    pub portal_plant_id: String,
    pub portal_sector_id: String,
    pub portal_language: String,
    /// Timeout of each portal request in seconds
    pub http_timeout_secs: u64,
    /// Reference number to continue from when the ledger has none
    pub reference_seed: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let portal = PortalConfig::default();
        Self {
            log_level: "info".to_string(),
            log_json: false,
            update_readings: true,
            verbose: false,
            portal_base_url: portal.base_url,
            portal_plant_id: portal.plant_id,
            portal_sector_id: portal.sector_id,
            portal_language: portal.language,
            http_timeout_secs: portal.timeout.as_secs(),
            reference_seed: None,
        }
    }
}

impl AppConfig {
    /// Loads configuration from `WATER_*` environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::load(config::Environment::with_prefix("WATER"))
    }

    /// Loads configuration from an environment source
    pub fn load(environment: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(environment)
            .build()?
            .try_deserialize()
    }

    /// Checks values the type system cannot
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(self.portal_base_url.starts_with("http://") || self.portal_base_url.starts_with("https://")) {
            return Err(CoreError::configuration(format!(
                "portal base URL must start with http:// or https://, got '{}'",
                self.portal_base_url
            )));
        }
        if self.http_timeout_secs == 0 {
            return Err(CoreError::configuration("HTTP timeout must be at least one second"));
        }
        self.reference_seed()?;
        Ok(())
    }

    /// The configured reference seed, parsed
    pub fn reference_seed(&self) -> Result<Option<ReferenceNumber>, CoreError> {
        self.reference_seed
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                ReferenceNumber::parse(s).map_err(|e| CoreError::validation(format!("reference seed: {e}")))
            })
            .transpose()
    }

    pub fn portal_config(&self) -> PortalConfig {
        PortalConfig {
            base_url: self.portal_base_url.clone(),
            plant_id: self.portal_plant_id.clone(),
            sector_id: self.portal_sector_id.clone(),
            language: self.portal_language.clone(),
            timeout: Duration::from_secs(self.http_timeout_secs),
            ..PortalConfig::default()
        }
    }

    pub fn update_options(&self) -> Result<UpdateOptions, CoreError> {
        Ok(UpdateOptions {
            update_readings: self.update_readings,
            verbose: self.verbose,
            reference_seed: self.reference_seed()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn environment(vars: &[(&str, &str)]) -> config::Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::with_prefix("WATER").source(Some(map))
    }

    #[test]
    fn test_empty_environment_gives_defaults() {
        let config = AppConfig::load(environment(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_environment_overrides() {
        let config = AppConfig::load(environment(&[
            ("WATER_VERBOSE", "true"),
            ("WATER_UPDATE_READINGS", "false"),
            ("WATER_HTTP_TIMEOUT_SECS", "5"),
            ("WATER_REFERENCE_SEED", "123443"),
        ]))
        .unwrap();

        assert!(config.verbose);
        assert!(!config.update_readings);
        assert_eq!(config.http_timeout_secs, 5);
        assert_eq!(config.reference_seed().unwrap().unwrap().as_str(), "123443");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_url = AppConfig {
            portal_base_url: "ftp://example.com".to_string(),
            ..AppConfig::default()
        };
        let zero_timeout = AppConfig {
            http_timeout_secs: 0,
            ..AppConfig::default()
        };
        let bad_seed = AppConfig {
            reference_seed: Some("12a4".to_string()),
            ..AppConfig::default()
        };

        assert!(matches!(bad_url.validate(), Err(CoreError::Configuration(_))));
        assert!(matches!(zero_timeout.validate(), Err(CoreError::Configuration(_))));
        assert!(matches!(bad_seed.validate(), Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_blank_seed_is_no_seed() {
        let config = AppConfig {
            reference_seed: Some("  ".to_string()),
            ..AppConfig::default()
        };
        assert!(config.reference_seed().unwrap().is_none());
    }

    #[test]
    fn test_portal_config_from_settings() {
        let config = AppConfig {
            portal_base_url: "http://localhost:8080".to_string(),
            http_timeout_secs: 7,
            ..AppConfig::default()
        };
        let portal = config.portal_config();

        assert_eq!(portal.base_url, "http://localhost:8080");
        assert_eq!(portal.timeout, Duration::from_secs(7));
        assert_eq!(portal.login_page_path, PortalConfig::default().login_page_path);
    }
}
