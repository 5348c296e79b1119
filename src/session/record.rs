//! Transfer Session Record
//!
//! The single mutable entity of a conversation. Fields are private: reads go
//! through accessors, writes only through [`TransferCoordinator`] operations
//! and the stage policy, which keep the derived fields consistent.
//!
//! [`TransferCoordinator`]: super::coordinator::TransferCoordinator

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Value, json};

use super::state::{Stage, TransferField};
use crate::country::CountryConfig;
use crate::money;
use crate::validation::ClarificationReason;

/// State of one in-progress transfer conversation
///
/// # Invariants
/// - `receive_amount` is set iff `send_amount` and `exchange_rate` are both set
/// - `delivery_method` is a member of `available_methods` whenever both are non-empty
/// - `transaction_id` is set iff `stage == Completed`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Session {
    pub(crate) destination_country: Option<String>,
    pub(crate) destination_currency_code: Option<String>,
    pub(crate) exchange_rate: Option<Decimal>,
    pub(crate) available_methods: Vec<String>,
    pub(crate) send_amount: Option<Decimal>,
    pub(crate) receive_amount: Option<Decimal>,
    pub(crate) beneficiary: Option<String>,
    pub(crate) delivery_method: Option<String>,
    pub(crate) transaction_id: Option<String>,
    pub(crate) stage: Stage,
    pub(crate) validation_errors: Option<String>,
    pub(crate) clarification_needed: Option<TransferField>,
    pub(crate) clarification_reason: Option<ClarificationReason>,
}

impl Session {
    /// Blank session: every optional field empty, stage `Initial`
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_destination(country: &CountryConfig, stage: Stage) -> Self {
        let mut session = Self {
            stage,
            ..Self::default()
        };
        session.apply_country(country);
        session
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn destination_country(&self) -> Option<&str> {
        self.destination_country.as_deref()
    }

    pub fn destination_currency_code(&self) -> Option<&str> {
        self.destination_currency_code.as_deref()
    }

    pub fn exchange_rate(&self) -> Option<Decimal> {
        self.exchange_rate
    }

    pub fn available_methods(&self) -> &[String] {
        &self.available_methods
    }

    pub fn send_amount(&self) -> Option<Decimal> {
        self.send_amount
    }

    pub fn receive_amount(&self) -> Option<Decimal> {
        self.receive_amount
    }

    pub fn beneficiary(&self) -> Option<&str> {
        self.beneficiary.as_deref()
    }

    pub fn delivery_method(&self) -> Option<&str> {
        self.delivery_method.as_deref()
    }

    pub fn transaction_id(&self) -> Option<&str> {
        self.transaction_id.as_deref()
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn validation_errors(&self) -> Option<&str> {
        self.validation_errors.as_deref()
    }

    pub fn clarification_needed(&self) -> Option<TransferField> {
        self.clarification_needed
    }

    pub fn clarification_reason(&self) -> Option<ClarificationReason> {
        self.clarification_reason
    }

    /// Check if a blocking validation error is pending
    #[inline]
    pub fn is_blocked(&self) -> bool {
        self.validation_errors.is_some()
    }

    /// Check whether a required field holds a usable value
    pub fn has_field(&self, field: TransferField) -> bool {
        match field {
            TransferField::DestinationCountry => self.destination_country.is_some(),
            TransferField::SendAmount => self.send_amount.is_some(),
            TransferField::Beneficiary => self
                .beneficiary
                .as_deref()
                .is_some_and(|name| !name.trim().is_empty()),
            TransferField::DeliveryMethod => self.delivery_method.is_some(),
        }
    }

    /// Flat key-value view of the session for the orchestrating caller.
    ///
    /// Every key is always present; unset fields are `null`. Money values are
    /// rendered as decimal strings.
    pub fn snapshot(&self) -> Value {
        json!({
            "destination_country": self.destination_country,
            "destination_currency_code": self.destination_currency_code,
            "exchange_rate": self.exchange_rate,
            "available_methods": self.available_methods,
            "send_amount": self.send_amount,
            "receive_amount": self.receive_amount,
            "beneficiary": self.beneficiary,
            "delivery_method": self.delivery_method,
            "transaction_id": self.transaction_id,
            "stage": self.stage,
            "validation_errors": self.validation_errors,
            "clarification_needed": self.clarification_needed,
            "clarification_reason": self.clarification_reason,
        })
    }

    // ========================================================================
    // Mutations (crate-internal)
    // ========================================================================

    /// Clean-slate start of an operation: drop the previous call's error and
    /// clarification, and mark the session engaged on the first fact.
    pub(crate) fn begin_operation(&mut self) {
        self.validation_errors = None;
        self.clear_clarification();
        if self.stage == Stage::Initial {
            self.stage = Stage::Collecting;
        }
    }

    pub(crate) fn block(&mut self, message: impl Into<String>) {
        self.validation_errors = Some(message.into());
    }

    pub(crate) fn clear_clarification(&mut self) {
        self.clarification_needed = None;
        self.clarification_reason = None;
    }

    /// Overwrite the destination fields from a resolved country.
    ///
    /// A delivery method the new country does not offer is dropped, and the
    /// receive amount is re-quoted at the new rate.
    pub(crate) fn apply_country(&mut self, country: &CountryConfig) {
        self.destination_country = Some(country.name.clone());
        self.destination_currency_code = Some(country.currency_code.clone());
        self.exchange_rate = Some(country.usd_exchange_rate);
        self.available_methods = country.delivery_methods.clone();

        if let Some(method) = self.delivery_method.as_deref()
            && !country.offers(method)
        {
            self.delivery_method = None;
        }

        self.requote();
    }

    pub(crate) fn set_send_amount(&mut self, amount: Decimal) {
        self.send_amount = Some(amount);
        self.requote();
    }

    /// Store an amount pair computed from a target receive figure, keeping the
    /// receive side exactly as requested.
    pub(crate) fn set_amounts_exact(&mut self, send: Decimal, receive: Decimal) {
        self.send_amount = Some(send);
        self.receive_amount = Some(receive);
    }

    fn requote(&mut self) {
        self.receive_amount = match (self.send_amount, self.exchange_rate) {
            (Some(send), Some(rate)) => money::receive_amount(send, rate),
            _ => None,
        };
    }
}
