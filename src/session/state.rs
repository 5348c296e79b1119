//! Session Stage Definitions
//!
//! Stage names match the keys the orchestrating model sees in the state snapshot.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Coarse workflow phase of a transfer session
///
/// ```text
/// INITIAL → COLLECTING ⇄ CONFIRMING → COMPLETED
///              ↑                          │
///              └──── confirm(false) ──────┘
/// ```
/// `cancel_transfer_session` returns any stage to `INITIAL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Fresh session, user has not provided anything yet
    #[default]
    Initial,

    /// Gathering the required fields
    Collecting,

    /// All required fields present, waiting for the user's go-ahead
    Confirming,

    /// Transfer confirmed, transaction id issued
    Completed,
}

impl Stage {
    /// Check if the transfer has been finalized
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Completed)
    }

    /// Get the snapshot name of this stage
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Initial => "initial",
            Stage::Collecting => "collecting",
            Stage::Confirming => "confirming",
            Stage::Completed => "completed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "initial" => Ok(Stage::Initial),
            "collecting" => Ok(Stage::Collecting),
            "confirming" => Ok(Stage::Confirming),
            "completed" => Ok(Stage::Completed),
            _ => Err(format!("Invalid stage: {}", s)),
        }
    }
}

/// Fields the user must supply before a transfer can be confirmed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferField {
    DestinationCountry,
    SendAmount,
    Beneficiary,
    DeliveryMethod,
}

impl TransferField {
    /// All required fields, in the order they are usually collected
    pub const REQUIRED: [TransferField; 4] = [
        TransferField::DestinationCountry,
        TransferField::SendAmount,
        TransferField::Beneficiary,
        TransferField::DeliveryMethod,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransferField::DestinationCountry => "destination_country",
            TransferField::SendAmount => "send_amount",
            TransferField::Beneficiary => "beneficiary",
            TransferField::DeliveryMethod => "delivery_method",
        }
    }
}

impl fmt::Display for TransferField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
