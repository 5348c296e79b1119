//! Transfer Coordinator
//!
//! Implements the six transfer operations. Each one takes the session by
//! exclusive reference, consults reference data and validation rules, and
//! either applies its change or records a typed failure.
//!
//! Stage advancement is NOT done here: the caller runs
//! [`advance`](super::policy::advance) after every operation.

use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::error::TransferError;
use super::record::Session;
use super::state::{Stage, TransferField};
use super::types::{
    AmountSet, Confirmation, DestinationSet, DetailsSet, SessionReset, TargetConverted,
};
use crate::country::CountryLookup;
use crate::money;
use crate::validation::{check_beneficiary, validate_amount};

/// Default prefix of generated transaction ids
pub const DEFAULT_TRANSACTION_PREFIX: &str = "TXN-";

/// Errors building a coordinator from configuration
#[derive(Debug, Error, PartialEq)]
pub enum SetupError {
    #[error("Default country '{0}' is not in the country registry")]
    UnknownDefaultCountry(String),

    #[error("Sessions must start in 'initial' or 'collecting', got '{0}'")]
    InvalidInitialStage(Stage),
}

/// Creation defaults for new (and cancelled) sessions
#[derive(Debug, Clone, PartialEq)]
pub struct SessionDefaults {
    /// Country pre-populated into every fresh session
    pub default_country: Option<String>,
    /// Stage of a fresh session
    pub initial_stage: Stage,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            default_country: Some("Brazil".to_string()),
            initial_stage: Stage::Initial,
        }
    }
}

/// Transaction id generator: fixed prefix + 8 uppercase hex characters
#[derive(Debug, Clone)]
struct TransactionIdGenerator {
    prefix: String,
}

impl TransactionIdGenerator {
    fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn generate(&self) -> String {
        let suffix: u32 = rand::random();
        format!("{}{:08X}", self.prefix, suffix)
    }
}

/// Transfer Coordinator - applies operations to a session
pub struct TransferCoordinator {
    lookup: Arc<dyn CountryLookup>,
    template: Session,
    id_gen: TransactionIdGenerator,
}

impl TransferCoordinator {
    /// Create a coordinator with default session settings (Brazil, `initial`)
    pub fn new(lookup: Arc<dyn CountryLookup>) -> Result<Self, SetupError> {
        Self::with_defaults(lookup, SessionDefaults::default(), DEFAULT_TRANSACTION_PREFIX)
    }

    /// Create a coordinator with explicit creation defaults
    pub fn with_defaults(
        lookup: Arc<dyn CountryLookup>,
        defaults: SessionDefaults,
        transaction_prefix: &str,
    ) -> Result<Self, SetupError> {
        if !matches!(defaults.initial_stage, Stage::Initial | Stage::Collecting) {
            return Err(SetupError::InvalidInitialStage(defaults.initial_stage));
        }

        let template = match defaults.default_country.as_deref() {
            Some(name) => {
                let country = lookup
                    .lookup_country(name)
                    .ok_or_else(|| SetupError::UnknownDefaultCountry(name.to_string()))?;
                Session::with_destination(&country, defaults.initial_stage)
            }
            None => Session {
                stage: defaults.initial_stage,
                ..Session::default()
            },
        };

        Ok(Self {
            lookup,
            template,
            id_gen: TransactionIdGenerator::new(transaction_prefix),
        })
    }

    /// A fresh session in its creation-default state
    pub fn new_session(&self) -> Session {
        self.template.clone()
    }

    /// Reference data backing this coordinator
    pub fn lookup(&self) -> &dyn CountryLookup {
        self.lookup.as_ref()
    }

    /// Record a failure on the session (when it blocks) and hand it back
    fn fail<T>(&self, session: &mut Session, err: TransferError) -> Result<T, TransferError> {
        if err.blocks_session() {
            session.block(err.to_string());
        }
        warn!(error_kind = err.code(), "Transfer operation rejected: {}", err);
        Err(err)
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Resolve and apply a destination country
    pub fn set_destination(
        &self,
        session: &mut Session,
        country: &str,
    ) -> Result<DestinationSet, TransferError> {
        session.begin_operation();

        let Some(config) = self.lookup.lookup_country(country) else {
            let err = TransferError::CountryNotSupported {
                country: country.to_string(),
                supported: self.lookup.supported_country_names(),
            };
            return self.fail(session, err);
        };

        session.apply_country(&config);
        info!(
            country = %config.name,
            currency = %config.currency_code,
            rate = %config.usd_exchange_rate,
            "Destination set"
        );

        Ok(DestinationSet {
            country: config.name,
            currency_code: config.currency_code,
            exchange_rate: config.usd_exchange_rate,
            available_methods: config.delivery_methods,
            receive_amount: session.receive_amount(),
        })
    }

    /// Set the USD amount to send
    pub fn set_amount(
        &self,
        session: &mut Session,
        amount: Decimal,
    ) -> Result<AmountSet, TransferError> {
        session.begin_operation();

        if let Err(e) = validate_amount(amount) {
            return self.fail(session, e.into());
        }

        session.set_send_amount(amount);
        info!(send_amount = %amount, receive_amount = ?session.receive_amount(), "Send amount set");

        Ok(AmountSet {
            send_amount: amount,
            receive_amount: session.receive_amount(),
            currency_code: session
                .receive_amount()
                .and(session.destination_currency_code().map(str::to_string)),
        })
    }

    /// Derive the USD send amount from what the beneficiary should receive
    ///
    /// The stored receive amount is `target_amount` exactly, not re-quoted
    /// from the rounded USD figure.
    pub fn calculate_usd_from_target(
        &self,
        session: &mut Session,
        target_amount: Decimal,
    ) -> Result<TargetConverted, TransferError> {
        session.begin_operation();

        let (Some(rate), Some(currency_code)) = (
            session.exchange_rate(),
            session.destination_currency_code().map(str::to_string),
        ) else {
            return self.fail(session, TransferError::NoDestinationSet);
        };

        if target_amount <= Decimal::ZERO {
            let err = TransferError::InvalidTargetAmount {
                target: target_amount,
            };
            return self.fail(session, err);
        }

        // An overflowing quotient is far past the limit; report it saturated
        let usd_amount = money::usd_from_target(target_amount, rate).unwrap_or(Decimal::MAX);
        if let Err(reason) = validate_amount(usd_amount) {
            let err = TransferError::CalculatedAmountInvalid {
                target: target_amount,
                currency_code,
                usd_amount,
                reason,
            };
            return self.fail(session, err);
        }

        session.set_amounts_exact(usd_amount, target_amount);
        info!(
            target = %target_amount,
            currency = %currency_code,
            usd_amount = %usd_amount,
            "Send amount derived from target"
        );

        Ok(TargetConverted {
            target_amount,
            currency_code,
            exchange_rate: rate,
            usd_amount,
        })
    }

    /// Set beneficiary and/or delivery method.
    ///
    /// Each argument is applied independently. A beneficiary supplied together
    /// with an unavailable method is still stored even though the call fails.
    pub fn set_transfer_details(
        &self,
        session: &mut Session,
        beneficiary: Option<&str>,
        delivery_method: Option<&str>,
    ) -> Result<DetailsSet, TransferError> {
        session.begin_operation();
        let mut details = DetailsSet::default();

        if let Some(name) = beneficiary {
            session.beneficiary = Some(name.to_string());
            if let Some(reason) = check_beneficiary(name) {
                session.clarification_needed = Some(TransferField::Beneficiary);
                session.clarification_reason = Some(reason);
                debug!(beneficiary = %name, reason = %reason, "Beneficiary needs clarification");
            }
            details.beneficiary = Some(name.to_string());
            details.clarification_reason = session.clarification_reason();
        }

        if let Some(method) = delivery_method {
            let available = session.available_methods();
            if !available.is_empty() && !available.iter().any(|m| m == method) {
                let err = TransferError::InvalidMethodForCountry {
                    method: method.to_string(),
                    country: session
                        .destination_country()
                        .unwrap_or("this destination")
                        .to_string(),
                    available: available.to_vec(),
                };
                return self.fail(session, err);
            }
            session.delivery_method = Some(method.to_string());
            details.delivery_method = Some(method.to_string());
        }

        info!(
            beneficiary = ?details.beneficiary,
            delivery_method = ?details.delivery_method,
            "Transfer details set"
        );
        Ok(details)
    }

    /// Finalize (`true`) or reopen (`false`) the transfer
    pub fn confirm_transfer(
        &self,
        session: &mut Session,
        confirmed: bool,
    ) -> Result<Confirmation, TransferError> {
        if !confirmed {
            session.begin_operation();
            session.stage = Stage::Collecting;
            session.transaction_id = None;
            info!("Transfer reopened for changes");
            return Ok(Confirmation::Reopened);
        }

        if let Some(errors) = session.validation_errors() {
            let err = TransferError::CannotConfirmWithErrors {
                errors: errors.to_string(),
            };
            return self.fail(session, err);
        }

        let transaction_id = self.id_gen.generate();
        session.transaction_id = Some(transaction_id.clone());
        session.stage = Stage::Completed;
        session.validation_errors = None;
        session.clear_clarification();
        info!(transaction_id = %transaction_id, "Transfer confirmed");

        Ok(Confirmation::Completed { transaction_id })
    }

    /// Reset the session to its creation defaults
    pub fn cancel_transfer_session(&self, session: &mut Session) -> SessionReset {
        *session = self.new_session();
        info!("Transfer session cancelled");
        SessionReset
    }
}
