//! Transfer Operation Error Types
//!
//! Every failed operation maps to one variant here. `code()` is the stable
//! `error_kind` tag the orchestrating caller branches on; `Display` is the
//! human-readable message that also lands in `validation_errors`.

use rust_decimal::Decimal;
use serde_json::{Map, Value, json};
use thiserror::Error;

use crate::validation::AmountError;

/// Transfer operation failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransferError {
    #[error("Country '{country}' not supported. Supported countries: {}", .supported.join(", "))]
    CountryNotSupported {
        country: String,
        supported: Vec<String>,
    },

    #[error("{0}")]
    InvalidAmount(AmountError),

    #[error("A destination country must be set before converting a target amount")]
    NoDestinationSet,

    #[error("Target amount must be greater than 0")]
    InvalidTargetAmount { target: Decimal },

    #[error(
        "Receiving {target} {currency_code} requires {usd_amount} USD: {reason}"
    )]
    CalculatedAmountInvalid {
        target: Decimal,
        currency_code: String,
        usd_amount: Decimal,
        reason: AmountError,
    },

    #[error("Method '{method}' not available for {country}. Available methods: {}", .available.join(", "))]
    InvalidMethodForCountry {
        method: String,
        country: String,
        available: Vec<String>,
    },

    #[error("Cannot confirm the transfer while validation errors exist: {errors}")]
    CannotConfirmWithErrors { errors: String },
}

impl TransferError {
    /// Get the `error_kind` tag for tool responses
    pub fn code(&self) -> &'static str {
        match self {
            TransferError::CountryNotSupported { .. } => "country_not_supported",
            TransferError::InvalidAmount(_) => "invalid_amount",
            TransferError::NoDestinationSet => "no_destination_set",
            TransferError::InvalidTargetAmount { .. } => "invalid_target_amount",
            TransferError::CalculatedAmountInvalid { .. } => "calculated_amount_invalid",
            TransferError::InvalidMethodForCountry { .. } => "invalid_method_for_country",
            TransferError::CannotConfirmWithErrors { .. } => "cannot_confirm_with_errors",
        }
    }

    /// Check if this failure leaves a blocking error on the session
    pub fn blocks_session(&self) -> bool {
        !matches!(
            self,
            TransferError::NoDestinationSet | TransferError::CannotConfirmWithErrors { .. }
        )
    }

    /// Structured extras for the caller (supported options, computed figures)
    pub fn details(&self) -> Map<String, Value> {
        let mut details = Map::new();
        match self {
            TransferError::CountryNotSupported { supported, .. } => {
                details.insert("supported_countries".into(), json!(supported));
            }
            TransferError::CalculatedAmountInvalid { usd_amount, .. } => {
                details.insert("usd_amount".into(), json!(usd_amount));
            }
            TransferError::InvalidMethodForCountry { available, .. } => {
                details.insert("available_methods".into(), json!(available));
            }
            _ => {}
        }
        details
    }
}

impl From<AmountError> for TransferError {
    fn from(e: AmountError) -> Self {
        TransferError::InvalidAmount(e)
    }
}
