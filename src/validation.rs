//! Input validation for transfer fields
//!
//! Two kinds of checks live here:
//! - **Blocking**: [`validate_amount`] rejects amounts outside the per-transfer limits.
//! - **Advisory**: [`check_beneficiary`] flags names that look incomplete but never rejects them.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum USD amount accepted for a single transfer
pub const MAX_SEND_AMOUNT_USD: u32 = 10_000;

/// Beneficiary names that refer to nobody in particular (compared lower-cased)
pub const PLACEHOLDER_NAMES: [&str; 8] = [
    "me", "myself", "test", "friend", "self", "user", "nobody", "someone",
];

// ============================================================================
// Amount Validation
// ============================================================================

/// Amount validation failure
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("Amount must be greater than 0")]
    BelowMinimum,

    #[error("Amount exceeds the maximum of {max} USD per transfer")]
    AboveMaximum { max: u32 },
}

/// Validate a USD send amount against the transfer limits
///
/// # Errors
/// * `BelowMinimum` - amount is zero or negative
/// * `AboveMaximum` - amount is above [`MAX_SEND_AMOUNT_USD`]
pub fn validate_amount(amount: Decimal) -> Result<(), AmountError> {
    if amount <= Decimal::ZERO {
        return Err(AmountError::BelowMinimum);
    }
    if amount > Decimal::from(MAX_SEND_AMOUNT_USD) {
        return Err(AmountError::AboveMaximum {
            max: MAX_SEND_AMOUNT_USD,
        });
    }
    Ok(())
}

// ============================================================================
// Beneficiary Sanity Check
// ============================================================================

/// Why a beneficiary name needs a soft confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClarificationReason {
    /// Only one name token was given
    NeedsFullName,
    /// The name is a stand-in such as "me" or "friend"
    IsPlaceholder,
}

impl ClarificationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClarificationReason::NeedsFullName => "needs_full_name",
            ClarificationReason::IsPlaceholder => "is_placeholder",
        }
    }
}

impl fmt::Display for ClarificationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ClarificationReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "needs_full_name" => Ok(ClarificationReason::NeedsFullName),
            "is_placeholder" => Ok(ClarificationReason::IsPlaceholder),
            _ => Err(format!("Invalid clarification reason: {}", s)),
        }
    }
}

/// Check whether a beneficiary name looks like a full legal name.
///
/// Returns `None` when no clarification is needed. Placeholders take
/// precedence over the token count, so "me" is `IsPlaceholder`, not
/// `NeedsFullName`.
pub fn check_beneficiary(name: &str) -> Option<ClarificationReason> {
    let trimmed = name.trim();
    let normalized = trimmed.to_lowercase();

    if PLACEHOLDER_NAMES.contains(&normalized.as_str()) {
        return Some(ClarificationReason::IsPlaceholder);
    }
    if trimmed.split_whitespace().count() < 2 {
        return Some(ClarificationReason::NeedsFullName);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_amount_bounds() {
        assert_eq!(validate_amount(Decimal::ZERO), Err(AmountError::BelowMinimum));
        assert_eq!(validate_amount(Decimal::from(-5)), Err(AmountError::BelowMinimum));
        assert_eq!(validate_amount(Decimal::new(1, 2)), Ok(()));
        assert_eq!(validate_amount(Decimal::from(100)), Ok(()));
        // Maximum is inclusive
        assert_eq!(validate_amount(Decimal::from(10_000)), Ok(()));
        assert_eq!(
            validate_amount(Decimal::new(1_000_001, 2)),
            Err(AmountError::AboveMaximum { max: 10_000 })
        );
        assert_eq!(
            validate_amount(Decimal::from(20_000)),
            Err(AmountError::AboveMaximum { max: 10_000 })
        );
    }

    #[test]
    fn test_amount_error_messages() {
        assert_eq!(
            AmountError::BelowMinimum.to_string(),
            "Amount must be greater than 0"
        );
        assert_eq!(
            AmountError::AboveMaximum { max: 10_000 }.to_string(),
            "Amount exceeds the maximum of 10000 USD per transfer"
        );
    }

    #[test]
    fn test_check_beneficiary_full_name() {
        assert_eq!(check_beneficiary("Maria Gonzalez"), None);
        assert_eq!(check_beneficiary("  Maria   Gonzalez dos Santos "), None);
    }

    #[test]
    fn test_check_beneficiary_single_token() {
        assert_eq!(
            check_beneficiary("Maria"),
            Some(ClarificationReason::NeedsFullName)
        );
        assert_eq!(
            check_beneficiary("   "),
            Some(ClarificationReason::NeedsFullName)
        );
    }

    #[test]
    fn test_check_beneficiary_placeholders() {
        for name in ["me", "Myself", " TEST ", "friend", "self", "User", "nobody", "someone"] {
            assert_eq!(
                check_beneficiary(name),
                Some(ClarificationReason::IsPlaceholder),
                "{name} should be a placeholder"
            );
        }
        // Placeholder words inside a longer name are fine
        assert_eq!(check_beneficiary("Test Person"), None);
    }

    #[test]
    fn test_clarification_reason_roundtrip_str() {
        assert_eq!(ClarificationReason::NeedsFullName.to_string(), "needs_full_name");
        assert_eq!(
            "is_placeholder".parse::<ClarificationReason>(),
            Ok(ClarificationReason::IsPlaceholder)
        );
        assert!("other".parse::<ClarificationReason>().is_err());
    }
}
