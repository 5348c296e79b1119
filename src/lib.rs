//! Send Money - Transfer Session Core
//!
//! State machine behind a conversational money-transfer assistant: it tracks
//! one user's transfer session, validates each field as it arrives, and
//! decides when the transfer is ready for confirmation.
//!
//! # Modules
//!
//! - [`money`] - Decimal amount/rate arithmetic and rounding
//! - [`country`] - Country reference data (currency, rate, delivery methods)
//! - [`validation`] - Amount limits and beneficiary name checks
//! - [`session`] - Session record, transfer operations, stage policy
//! - [`tools`] - Tool-call boundary for the language-model orchestrator
//! - [`config`] - YAML application configuration
//! - [`logging`] - tracing subscriber setup

pub mod config;
pub mod country;
pub mod logging;
pub mod money;
pub mod session;
pub mod tools;
pub mod validation;

// Convenient re-exports at crate root
pub use country::{CountryConfig, CountryLookup, CountryRegistry};
pub use session::{
    Confirmation, Session, SessionDefaults, Stage, TransferCoordinator, TransferError,
    TransferField, advance, all_fields_complete, missing_fields,
};
pub use tools::{ToolCall, ToolResponse, TransferAgent};
pub use validation::{AmountError, ClarificationReason, check_beneficiary, validate_amount};
