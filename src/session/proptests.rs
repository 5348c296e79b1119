//! Property-based tests for the session state machine
//!
//! These tests drive random operation sequences through the coordinator and
//! the stage policy and check the session invariants after every step.

use std::sync::Arc;

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::*;
use crate::country::{CountryLookup, CountryRegistry};
use crate::money;

// ============================================================================
// Test Helpers
// ============================================================================

fn coordinator() -> TransferCoordinator {
    TransferCoordinator::new(Arc::new(CountryRegistry::builtin())).unwrap()
}

fn rate_of(country: &str) -> Decimal {
    CountryRegistry::builtin()
        .lookup_country(country)
        .unwrap()
        .usd_exchange_rate
}

#[derive(Debug, Clone)]
enum Op {
    Destination(String),
    Amount(Decimal),
    Target(Decimal),
    Details(Option<String>, Option<String>),
    Confirm(bool),
    Cancel,
}

fn apply(coord: &TransferCoordinator, session: &mut Session, op: &Op) {
    // Outcomes are irrelevant here; only the resulting session is checked
    let _ = match op {
        Op::Destination(c) => coord.set_destination(session, c).map(|_| ()),
        Op::Amount(a) => coord.set_amount(session, *a).map(|_| ()),
        Op::Target(t) => coord.calculate_usd_from_target(session, *t).map(|_| ()),
        Op::Details(b, m) => coord
            .set_transfer_details(session, b.as_deref(), m.as_deref())
            .map(|_| ()),
        Op::Confirm(c) => coord.confirm_transfer(session, *c).map(|_| ()),
        Op::Cancel => {
            coord.cancel_transfer_session(session);
            Ok(())
        }
    };
    *session = advance(std::mem::take(session));
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_country() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Brazil".to_string()),
        Just("Mexico".to_string()),
        Just("argentina".to_string()),
        Just("Canada".to_string()),
    ]
}

/// Valid USD amounts: 0.01 ..= 10000.00
fn arb_valid_amount() -> impl Strategy<Value = Decimal> {
    (1i64..=1_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Amounts straddling both limits
fn arb_any_amount() -> impl Strategy<Value = Decimal> {
    (-10_000i64..=2_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn arb_method() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Pix".to_string()),
        Just("Bank Transfer".to_string()),
        Just("SPEI".to_string()),
        Just("Cash Pickup".to_string()),
    ]
}

fn arb_beneficiary() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Maria Gonzalez".to_string()),
        Just("Juan".to_string()),
        Just("me".to_string()),
        "[A-Z][a-z]{1,8} [A-Z][a-z]{1,8}",
    ]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        arb_country().prop_map(Op::Destination),
        arb_any_amount().prop_map(Op::Amount),
        arb_any_amount().prop_map(|a| Op::Target(a * Decimal::from(20))),
        (
            proptest::option::of(arb_beneficiary()),
            proptest::option::of(arb_method())
        )
            .prop_map(|(b, m)| Op::Details(b, m)),
        any::<bool>().prop_map(Op::Confirm),
        Just(Op::Cancel),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_receive_amount_independent_of_order(
        amount in arb_valid_amount(),
        country in prop_oneof![Just("Brazil"), Just("Mexico"), Just("Argentina")],
    ) {
        let coord = coordinator();
        let expected = money::receive_amount(amount, rate_of(country));
        prop_assert!(expected.is_some());

        let mut amount_first = coord.new_session();
        coord.set_amount(&mut amount_first, amount).unwrap();
        coord.set_destination(&mut amount_first, country).unwrap();

        let mut country_first = coord.new_session();
        coord.set_destination(&mut country_first, country).unwrap();
        coord.set_amount(&mut country_first, amount).unwrap();

        prop_assert_eq!(amount_first.receive_amount(), expected);
        prop_assert_eq!(country_first.receive_amount(), expected);
    }

    #[test]
    fn prop_target_receive_amount_is_exact(
        target_cents in 1i64..=5_000_000,
        country in prop_oneof![Just("Brazil"), Just("Mexico"), Just("Argentina")],
    ) {
        let coord = coordinator();
        let mut session = coord.new_session();
        coord.set_destination(&mut session, country).unwrap();

        let target = Decimal::new(target_cents, 2);
        let usd = money::usd_from_target(target, rate_of(country)).unwrap();
        let result = coord.calculate_usd_from_target(&mut session, target);

        if crate::validation::validate_amount(usd).is_ok() {
            prop_assert!(result.is_ok());
            prop_assert_eq!(session.receive_amount(), Some(target));
            prop_assert_eq!(session.send_amount(), Some(usd));
        } else {
            prop_assert_eq!(result.unwrap_err().code(), "calculated_amount_invalid");
            prop_assert!(session.send_amount().is_none());
            prop_assert!(session.receive_amount().is_none());
        }
    }

    #[test]
    fn prop_invariants_hold_after_every_step(ops in prop::collection::vec(arb_op(), 1..30)) {
        let coord = coordinator();
        let mut session = coord.new_session();

        for op in &ops {
            let before = session.stage();
            apply(&coord, &mut session, op);

            // receive_amount present iff both inputs present
            prop_assert_eq!(
                session.receive_amount().is_some(),
                session.send_amount().is_some() && session.exchange_rate().is_some()
            );

            // delivery method always offered by the current destination
            if let Some(method) = session.delivery_method()
                && !session.available_methods().is_empty()
            {
                prop_assert!(session.available_methods().iter().any(|m| m == method));
            }

            // transaction id iff completed
            prop_assert_eq!(
                session.transaction_id().is_some(),
                session.stage() == Stage::Completed
            );

            // a blocked session never sits in confirming after an operation
            // that started in collecting
            if before != Stage::Confirming && session.is_blocked() {
                prop_assert_ne!(session.stage(), Stage::Confirming);
            }

            // the policy leaves no complete session in collecting
            if session.stage() == Stage::Collecting {
                prop_assert!(!all_fields_complete(&session));
            }
        }
    }

    #[test]
    fn prop_cancel_restores_fresh_session(ops in prop::collection::vec(arb_op(), 0..20)) {
        let coord = coordinator();
        let mut session = coord.new_session();
        for op in &ops {
            apply(&coord, &mut session, op);
        }

        apply(&coord, &mut session, &Op::Cancel);
        prop_assert_eq!(session, coord.new_session());
    }
}
