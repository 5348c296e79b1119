//! Country Reference Data
//!
//! Read-only lookup of supported destination corridors: currency, USD
//! exchange rate and the delivery methods offered in each country.
//!
//! The session core only ever consumes [`CountryLookup`]; [`CountryRegistry`]
//! is the static in-memory implementation used by the host binary and tests.

use rust_decimal::Decimal;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors raised while building a registry from configuration
#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("Country registry must contain at least one country")]
    Empty,

    #[error("Country name must not be blank")]
    BlankName,

    #[error("Currency code must not be blank for {0}")]
    BlankCurrency(String),

    #[error("Duplicate country: {0}")]
    DuplicateCountry(String),

    #[error("Exchange rate must be positive for {country}: got {rate}")]
    NonPositiveRate { country: String, rate: Decimal },

    #[error("{0} must offer at least one delivery method")]
    NoDeliveryMethods(String),

    #[error("Duplicate delivery method '{method}' for {country}")]
    DuplicateMethod { country: String, method: String },
}

// ============================================================================
// CountryConfig
// ============================================================================

/// One supported destination corridor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryConfig {
    /// Canonical display name (e.g., "Brazil")
    pub name: String,
    /// ISO currency code paid out in this country (e.g., "BRL")
    pub currency_code: String,
    /// Destination-currency units per 1 USD
    pub usd_exchange_rate: Decimal,
    /// Ordered, unique delivery methods
    pub delivery_methods: Vec<String>,
}

impl CountryConfig {
    pub fn new(
        name: &str,
        currency_code: &str,
        usd_exchange_rate: Decimal,
        delivery_methods: &[&str],
    ) -> Self {
        Self {
            name: name.to_string(),
            currency_code: currency_code.to_string(),
            usd_exchange_rate,
            delivery_methods: delivery_methods.iter().map(|m| m.to_string()).collect(),
        }
    }

    /// Check whether `method` is offered here (exact match)
    #[inline]
    pub fn offers(&self, method: &str) -> bool {
        self.delivery_methods.iter().any(|m| m == method)
    }

    fn validate(&self) -> Result<(), RegistryError> {
        if self.name.trim().is_empty() {
            return Err(RegistryError::BlankName);
        }
        if self.currency_code.trim().is_empty() {
            return Err(RegistryError::BlankCurrency(self.name.clone()));
        }
        if self.usd_exchange_rate <= Decimal::ZERO {
            return Err(RegistryError::NonPositiveRate {
                country: self.name.clone(),
                rate: self.usd_exchange_rate,
            });
        }
        if self.delivery_methods.is_empty() {
            return Err(RegistryError::NoDeliveryMethods(self.name.clone()));
        }
        let mut seen = FxHashSet::default();
        for method in &self.delivery_methods {
            if !seen.insert(method.as_str()) {
                return Err(RegistryError::DuplicateMethod {
                    country: self.name.clone(),
                    method: method.clone(),
                });
            }
        }
        Ok(())
    }
}

// ============================================================================
// Lookup Trait
// ============================================================================

/// Reference data service consumed by the session core.
///
/// Implementations must be side-effect free: the same name always resolves
/// to the same config for the lifetime of the lookup.
pub trait CountryLookup: Send + Sync {
    /// Resolve a country by name (case-insensitive, surrounding whitespace ignored)
    fn lookup_country(&self, name: &str) -> Option<CountryConfig>;

    /// Names of every supported country, in registry order
    fn supported_country_names(&self) -> Vec<String>;
}

// ============================================================================
// CountryRegistry
// ============================================================================

/// Static registry of supported countries
#[derive(Debug, Clone)]
pub struct CountryRegistry {
    countries: Vec<CountryConfig>,
    by_name: FxHashMap<String, usize>,
}

impl CountryRegistry {
    /// Registry with the builtin Brazil / Mexico / Argentina corridors
    pub fn builtin() -> Self {
        let countries = vec![
            CountryConfig::new("Brazil", "BRL", Decimal::new(536, 2), &["Pix", "Bank Transfer"]),
            CountryConfig::new(
                "Mexico",
                "MXN",
                Decimal::new(1715, 2),
                &["SPEI", "Cash Pickup", "Bank Transfer"],
            ),
            CountryConfig::new(
                "Argentina",
                "ARS",
                Decimal::new(105_550, 2),
                &["Bank Transfer", "Cash Pickup"],
            ),
        ];
        let by_name = Self::index(&countries);
        Self { countries, by_name }
    }

    /// Build a registry from configured entries, validating every entry
    pub fn from_configs(countries: Vec<CountryConfig>) -> Result<Self, RegistryError> {
        if countries.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut seen = FxHashSet::default();
        for country in &countries {
            country.validate()?;
            if !seen.insert(normalize(&country.name)) {
                return Err(RegistryError::DuplicateCountry(country.name.clone()));
            }
        }

        let by_name = Self::index(&countries);
        Ok(Self { countries, by_name })
    }

    fn index(countries: &[CountryConfig]) -> FxHashMap<String, usize> {
        countries
            .iter()
            .enumerate()
            .map(|(idx, c)| (normalize(&c.name), idx))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    pub fn countries(&self) -> &[CountryConfig] {
        &self.countries
    }
}

impl Default for CountryRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CountryLookup for CountryRegistry {
    fn lookup_country(&self, name: &str) -> Option<CountryConfig> {
        self.by_name
            .get(&normalize(name))
            .map(|&idx| self.countries[idx].clone())
    }

    fn supported_country_names(&self) -> Vec<String> {
        self.countries.iter().map(|c| c.name.clone()).collect()
    }
}

#[inline]
fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup_case_insensitive() {
        let registry = CountryRegistry::builtin();

        let brazil = registry.lookup_country("brazil").unwrap();
        assert_eq!(brazil.name, "Brazil");
        assert_eq!(brazil.currency_code, "BRL");
        assert_eq!(brazil.usd_exchange_rate, Decimal::new(536, 2));
        assert_eq!(brazil.delivery_methods, vec!["Pix", "Bank Transfer"]);

        assert_eq!(registry.lookup_country("MEXICO").unwrap().currency_code, "MXN");
        assert_eq!(
            registry.lookup_country("  Argentina ").unwrap().usd_exchange_rate,
            Decimal::new(105_550, 2)
        );
    }

    #[test]
    fn test_lookup_unknown() {
        let registry = CountryRegistry::builtin();
        assert!(registry.lookup_country("Canada").is_none());
        assert!(registry.lookup_country("").is_none());
        // Exact match only, no prefix matching
        assert!(registry.lookup_country("Braz").is_none());
    }

    #[test]
    fn test_supported_names_keep_order() {
        let registry = CountryRegistry::builtin();
        assert_eq!(
            registry.supported_country_names(),
            vec!["Brazil", "Mexico", "Argentina"]
        );
    }

    #[test]
    fn test_offers() {
        let mexico = CountryRegistry::builtin().lookup_country("Mexico").unwrap();
        assert!(mexico.offers("SPEI"));
        assert!(!mexico.offers("Pix"));
        assert!(!mexico.offers("spei"));
    }

    #[test]
    fn test_from_configs_rejects_invalid() {
        assert_eq!(
            CountryRegistry::from_configs(vec![]).unwrap_err(),
            RegistryError::Empty
        );

        let zero_rate = CountryConfig::new("Chile", "CLP", Decimal::ZERO, &["Bank Transfer"]);
        assert!(matches!(
            CountryRegistry::from_configs(vec![zero_rate]),
            Err(RegistryError::NonPositiveRate { .. })
        ));

        let no_methods = CountryConfig::new("Chile", "CLP", Decimal::ONE, &[]);
        assert_eq!(
            CountryRegistry::from_configs(vec![no_methods]).unwrap_err(),
            RegistryError::NoDeliveryMethods("Chile".into())
        );

        let dup_method = CountryConfig::new("Chile", "CLP", Decimal::ONE, &["Cash", "Cash"]);
        assert!(matches!(
            CountryRegistry::from_configs(vec![dup_method]),
            Err(RegistryError::DuplicateMethod { .. })
        ));

        let a = CountryConfig::new("Chile", "CLP", Decimal::ONE, &["Cash"]);
        let b = CountryConfig::new("CHILE", "CLP", Decimal::ONE, &["Cash"]);
        assert_eq!(
            CountryRegistry::from_configs(vec![a, b]).unwrap_err(),
            RegistryError::DuplicateCountry("CHILE".into())
        );
    }

    #[test]
    fn test_from_configs_valid() {
        let chile = CountryConfig::new("Chile", "CLP", Decimal::new(9_400, 1), &["Bank Transfer"]);
        let registry = CountryRegistry::from_configs(vec![chile.clone()]).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup_country("chile"), Some(chile));
        assert!(registry.lookup_country("Brazil").is_none());
    }
}
