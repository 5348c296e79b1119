//! Stage Advancement Policy
//!
//! Run after every operation, whatever its outcome. This is the only way a
//! session moves from `collecting` to `confirming`.

use super::record::Session;
use super::state::{Stage, TransferField};

/// True when every required field is present and no blocking error is pending
pub fn all_fields_complete(session: &Session) -> bool {
    !session.is_blocked()
        && TransferField::REQUIRED
            .iter()
            .all(|field| session.has_field(*field))
}

/// Required fields that are still missing, in collection order
pub fn missing_fields(session: &Session) -> Vec<TransferField> {
    TransferField::REQUIRED
        .into_iter()
        .filter(|field| !session.has_field(*field))
        .collect()
}

/// Re-evaluate the stage of a session.
///
/// Only `collecting` sessions move, and only to `confirming`. Nothing but the
/// stage field is ever touched.
pub fn advance(mut session: Session) -> Session {
    if session.stage == Stage::Collecting && all_fields_complete(&session) {
        session.stage = Stage::Confirming;
    }
    session
}
