use std::fs;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::country::{CountryConfig, CountryLookup, CountryRegistry, RegistryError};
use crate::session::{
    DEFAULT_TRANSACTION_PREFIX, SessionDefaults, SetupError, Stage, TransferCoordinator,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config yaml {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid country registry: {0}")]
    Registry(#[from] RegistryError),

    #[error("Invalid session settings: {0}")]
    Session(#[from] SetupError),
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    /// Emit per-call session snapshots (`SENDMONEY::SESSION` target)
    #[serde(default)]
    pub enable_tracing: bool,
    #[serde(default)]
    pub session: SessionConfig,
    /// Overrides the builtin country registry when present
    #[serde(default)]
    pub countries: Option<Vec<CountryConfig>>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionConfig {
    /// Country pre-populated into fresh sessions (`null` for none)
    pub default_country: Option<String>,
    pub initial_stage: Stage,
    pub transaction_id_prefix: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let defaults = SessionDefaults::default();
        Self {
            default_country: defaults.default_country,
            initial_stage: defaults.initial_stage,
            transaction_id_prefix: DEFAULT_TRANSACTION_PREFIX.to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: "./logs".to_string(),
            log_file: "send_money.log".to_string(),
            use_json: false,
            rotation: "daily".to_string(),
            enable_tracing: false,
            session: SessionConfig::default(),
            countries: None,
        }
    }
}

impl AppConfig {
    /// Load `config/<env>.yaml`
    pub fn load(env: &str) -> Result<Self, ConfigError> {
        Self::load_from(&format!("config/{}.yaml", env))
    }

    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Country registry: configured entries, or the builtin corridors
    pub fn country_registry(&self) -> Result<CountryRegistry, ConfigError> {
        match &self.countries {
            Some(countries) => Ok(CountryRegistry::from_configs(countries.clone())?),
            None => Ok(CountryRegistry::builtin()),
        }
    }

    /// Build a coordinator wired to this configuration
    pub fn coordinator(&self) -> Result<TransferCoordinator, ConfigError> {
        let lookup: Arc<dyn CountryLookup> = Arc::new(self.country_registry()?);
        let defaults = SessionDefaults {
            default_country: self.session.default_country.clone(),
            initial_stage: self.session.initial_stage,
        };
        Ok(TransferCoordinator::with_defaults(
            lookup,
            defaults,
            &self.session.transaction_id_prefix,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    const MINIMAL: &str = r#"
log_level: debug
log_dir: ./logs
log_file: send_money.log
use_json: false
rotation: never
"#;

    #[test]
    fn test_minimal_yaml_uses_defaults() {
        let config = AppConfig::from_yaml(MINIMAL).unwrap();
        assert_eq!(config.log_level, "debug");
        assert!(!config.enable_tracing);
        assert_eq!(config.session.default_country.as_deref(), Some("Brazil"));
        assert_eq!(config.session.initial_stage, Stage::Initial);
        assert_eq!(config.session.transaction_id_prefix, "TXN-");
        assert!(config.countries.is_none());

        let session = config.coordinator().unwrap().new_session();
        assert_eq!(session.destination_country(), Some("Brazil"));
    }

    #[test]
    fn test_session_and_country_overrides() {
        let yaml = format!(
            "{MINIMAL}{}",
            r#"
session:
  default_country: null
  initial_stage: collecting
  transaction_id_prefix: "REM-"
countries:
  - name: Colombia
    currency_code: COP
    usd_exchange_rate: "3900.25"
    delivery_methods: ["Bank Transfer", "Nequi"]
"#
        );
        let config = AppConfig::from_yaml(&yaml).unwrap();
        let registry = config.country_registry().unwrap();
        let colombia = registry.lookup_country("colombia").unwrap();
        assert_eq!(colombia.usd_exchange_rate, Decimal::new(390_025, 2));
        assert!(registry.lookup_country("Brazil").is_none());

        let session = config.coordinator().unwrap().new_session();
        assert_eq!(session.stage(), Stage::Collecting);
        assert!(session.destination_country().is_none());
    }

    #[test]
    fn test_default_country_must_exist() {
        let yaml = format!(
            "{MINIMAL}{}",
            r#"
session:
  default_country: Brazil
  initial_stage: initial
  transaction_id_prefix: "TXN-"
countries:
  - name: Colombia
    currency_code: COP
    usd_exchange_rate: "3900.25"
    delivery_methods: ["Nequi"]
"#
        );
        let config = AppConfig::from_yaml(&yaml).unwrap();
        assert!(matches!(
            config.coordinator(),
            Err(ConfigError::Session(SetupError::UnknownDefaultCountry(_)))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = AppConfig::load_from("config/does-not-exist.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
