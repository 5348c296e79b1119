//! Money Arithmetic Module
//!
//! All amount and exchange-rate math for a transfer session goes through here.
//!
//! ## Design Principles
//! 1. Decimal only: amounts and rates are `rust_decimal::Decimal`, never `f64`
//! 2. One rounding rule: every displayed figure is rounded to cents with
//!    banker's rounding (midpoint to even)
//! 3. Rates are quoted as destination-currency units per 1 USD
//!
//! ## Usage
//! ```rust
//! use rust_decimal::Decimal;
//! use send_money::money::{receive_amount, usd_from_target};
//!
//! let rate = Decimal::new(536, 2); // 5.36 BRL per USD
//! assert_eq!(receive_amount(Decimal::from(100), rate), Some(Decimal::from(536)));
//! assert_eq!(usd_from_target(Decimal::from(500), rate), Some(Decimal::new(9328, 2)));
//! ```

use rust_decimal::prelude::*;

/// Number of decimal places kept on every money figure
pub const MONEY_DECIMALS: u32 = 2;

/// Round a money value to cents.
///
/// Midpoints round to the nearest even cent (`0.125 -> 0.12`, `0.135 -> 0.14`).
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DECIMALS, RoundingStrategy::MidpointNearestEven)
}

/// Destination-currency amount the beneficiary receives for `send_usd`.
///
/// Formula: `round(send_usd * rate, 2)`. `None` if the product overflows.
#[inline]
pub fn receive_amount(send_usd: Decimal, rate: Decimal) -> Option<Decimal> {
    send_usd.checked_mul(rate).map(round_money)
}

/// USD amount required for the beneficiary to receive `target`.
///
/// Formula: `round(target / rate, 2)`. `None` if the quotient overflows
/// (a huge target over a sub-1 rate) or `rate` is zero.
#[inline]
pub fn usd_from_target(target: Decimal, rate: Decimal) -> Option<Decimal> {
    target.checked_div(rate).map(round_money)
}

/// Render a money value with exactly two decimals (e.g. `536.00`)
pub fn format_money(value: Decimal) -> String {
    format!("{:.prec$}", value, prec = MONEY_DECIMALS as usize)
}
