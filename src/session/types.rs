//! Operation Result Types
//!
//! Success records returned by the transfer operations. Each one serializes
//! into the data part of a tool response.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::money::format_money;
use crate::validation::ClarificationReason;

/// Destination resolved and applied
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DestinationSet {
    pub country: String,
    pub currency_code: String,
    pub exchange_rate: Decimal,
    pub available_methods: Vec<String>,
    /// Re-quoted receive amount, if a send amount was already set
    pub receive_amount: Option<Decimal>,
}

impl DestinationSet {
    pub fn message(&self) -> String {
        format!(
            "Sending to {} ({}): 1 USD = {} {}",
            self.country, self.currency_code, self.exchange_rate, self.currency_code
        )
    }
}

/// USD send amount accepted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmountSet {
    pub send_amount: Decimal,
    /// `None` until a destination is chosen
    pub receive_amount: Option<Decimal>,
    pub currency_code: Option<String>,
}

impl AmountSet {
    pub fn message(&self) -> String {
        match (self.receive_amount, &self.currency_code) {
            (Some(receive), Some(code)) => format!(
                "{} USD = {} {}",
                format_money(self.send_amount),
                format_money(receive),
                code
            ),
            _ => format!("Send amount set to {} USD", format_money(self.send_amount)),
        }
    }
}

/// Send amount derived from the amount the beneficiary should receive
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetConverted {
    pub target_amount: Decimal,
    pub currency_code: String,
    pub exchange_rate: Decimal,
    pub usd_amount: Decimal,
}

impl TargetConverted {
    pub fn message(&self) -> String {
        format!(
            "To receive {} {}, send {} USD",
            self.target_amount,
            self.currency_code,
            format_money(self.usd_amount)
        )
    }
}

/// Beneficiary and/or delivery method stored
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DetailsSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beneficiary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_method: Option<String>,
    /// Advisory flag raised on the beneficiary name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clarification_reason: Option<ClarificationReason>,
}

impl DetailsSet {
    pub fn message(&self) -> String {
        match (&self.beneficiary, &self.delivery_method) {
            (Some(b), Some(m)) => format!("Beneficiary set to {} via {}", b, m),
            (Some(b), None) => format!("Beneficiary set to {}", b),
            (None, Some(m)) => format!("Delivery method set to {}", m),
            (None, None) => "No transfer details provided".to_string(),
        }
    }
}

/// Outcome of a confirmation decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Confirmation {
    /// Transfer finalized with a fresh transaction id
    Completed { transaction_id: String },
    /// User wants to change something; back to collecting
    Reopened,
}

impl Confirmation {
    pub fn message(&self) -> String {
        match self {
            Confirmation::Completed { transaction_id } => {
                format!("Transfer confirmed! Transaction ID: {}", transaction_id)
            }
            Confirmation::Reopened => "Transfer reopened for changes".to_string(),
        }
    }
}

/// Session wiped back to its creation defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionReset;

impl SessionReset {
    pub fn message(&self) -> String {
        "Transfer session cancelled".to_string()
    }
}
