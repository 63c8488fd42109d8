//! Money and Currency
//!
//! The ledger holds two independent currencies per account. Amounts are
//! `rust_decimal::Decimal` end to end (DB columns are NUMERIC), never
//! binary floats. All amount validation goes through this module.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// The two currencies carried by every account
///
/// Numeric IDs are the PostgreSQL SMALLINT encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum Currency {
    Primary = 1,
    Secondary = 2,
}

impl Currency {
    /// Get numeric ID for PostgreSQL storage
    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    /// Convert from PostgreSQL ID
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(Currency::Primary),
            2 => Some(Currency::Secondary),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Primary => "primary",
            Currency::Secondary => "secondary",
        }
    }

    /// Maximum fractional digits accepted for this currency
    pub fn max_scale(&self) -> u32 {
        match self {
            Currency::Primary => 2,
            Currency::Secondary => 2,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "primary" | "1" => Ok(Currency::Primary),
            "secondary" | "2" => Ok(Currency::Secondary),
            _ => Err(format!("Invalid currency: {}", s)),
        }
    }
}

impl TryFrom<i16> for Currency {
    type Error = ();

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        Currency::from_id(value).ok_or(())
    }
}

/// Validate a transfer amount for the given currency
///
/// Rejects zero and negative amounts, and amounts carrying more fractional
/// digits than the currency supports (no silent truncation).
pub fn validate_amount(amount: Decimal, currency: Currency) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount);
    }

    if amount.normalize().scale() > currency.max_scale() {
        return Err(LedgerError::PrecisionOverflow);
    }

    Ok(())
}

/// Format a balance for display at the currency's full scale
///
/// e.g. Decimal 100 at scale 2 -> "100.00"
pub fn format_balance(amount: Decimal, currency: Currency) -> String {
    format!("{:.prec$}", amount, prec = currency.max_scale() as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_currency_id_roundtrip() {
        assert_eq!(Currency::from_id(1), Some(Currency::Primary));
        assert_eq!(Currency::from_id(2), Some(Currency::Secondary));
        assert_eq!(Currency::from_id(0), None);
        assert_eq!(Currency::from_id(3), None);
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!("primary".parse::<Currency>(), Ok(Currency::Primary));
        assert_eq!("SECONDARY".parse::<Currency>(), Ok(Currency::Secondary));
        assert!("points".parse::<Currency>().is_err());
    }

    #[test]
    fn test_validate_amount_positive() {
        assert!(validate_amount(dec("40.00"), Currency::Primary).is_ok());
        assert!(validate_amount(dec("0.01"), Currency::Primary).is_ok());
    }

    #[test]
    fn test_validate_amount_rejects_zero_and_negative() {
        assert!(matches!(
            validate_amount(Decimal::ZERO, Currency::Primary),
            Err(LedgerError::InvalidAmount)
        ));
        assert!(matches!(
            validate_amount(dec("-5"), Currency::Primary),
            Err(LedgerError::InvalidAmount)
        ));
    }

    #[test]
    fn test_validate_amount_rejects_over_scaled() {
        assert!(matches!(
            validate_amount(dec("1.001"), Currency::Primary),
            Err(LedgerError::PrecisionOverflow)
        ));
        // Trailing zeros beyond the scale are fine after normalize
        assert!(validate_amount(dec("1.0100"), Currency::Primary).is_ok());
    }

    #[test]
    fn test_format_balance() {
        assert_eq!(format_balance(dec("100"), Currency::Primary), "100.00");
        assert_eq!(format_balance(dec("60.5"), Currency::Primary), "60.50");
    }
}
