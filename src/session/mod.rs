//! Transfer Session State Machine
//!
//! Tracks one user's progress through a money-transfer conversation.
//!
//! # Flow
//!
//! ```text
//! caller ──▶ TransferCoordinator::<operation>(&mut Session, args)
//!               │  consults CountryLookup + validation rules
//!               ▼
//!            Session mutated, Result<_, TransferError> returned
//!               │
//!               ▼
//!            policy::advance(Session)  (collecting → confirming)
//! ```
//!
//! # Invariants
//!
//! 1. **Derived quote**: `receive_amount` tracks `send_amount × exchange_rate`
//!    (rounded to cents), except right after a target-amount conversion,
//!    which keeps the requested receive figure exactly
//! 2. **Blocking errors**: a pending `validation_errors` keeps the session out
//!    of `confirming` and refuses confirmation
//! 3. **Advisory clarifications**: never block anything
//! 4. **Transaction id**: present iff the stage is `completed`

pub mod coordinator;
pub mod error;
pub mod policy;
pub mod record;
pub mod state;
pub mod types;

#[cfg(test)]
mod proptests;

pub use coordinator::{
    DEFAULT_TRANSACTION_PREFIX, SessionDefaults, SetupError, TransferCoordinator,
};
pub use error::TransferError;
pub use policy::{advance, all_fields_complete, missing_fields};
pub use record::Session;
pub use state::{Stage, TransferField};
pub use types::{
    AmountSet, Confirmation, DestinationSet, DetailsSet, SessionReset, TargetConverted,
};
