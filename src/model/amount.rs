//! Amount type for monetary values entered by the user or returned by the API.
//!
//! This module provides the `Amount` type which wraps `Decimal`. User input is parsed from text
//! such as `"150.50"`, while the API exchanges amounts as JSON numbers.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Represents a monetary amount.
///
/// The sign carries no meaning for transactions: whether money comes in or goes out is given by
/// the transaction type, and the form only accepts amounts greater than zero.
///
/// # Examples
///
/// ```
/// # use budget_client::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("150.50").unwrap();
/// assert!(amount.is_positive());
/// assert_eq!(amount.to_string(), "150.50");
/// ```
///
/// Text that is not a number is rejected:
/// ```
/// # use budget_client::model::Amount;
/// # use std::str::FromStr;
/// assert!(Amount::from_str("abc").is_err());
/// assert!(Amount::from_str("").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// Creates a new Amount from a Decimal value.
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.value().is_zero()
    }

    /// Returns true if the amount is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.value().is_sign_positive()
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.value().is_sign_negative()
    }

    /// The absolute value rounded to two decimal places, as shown in lists.
    pub fn abs_2dp(&self) -> String {
        format!("{:.2}", self.value().abs().round_dp(2))
    }
}

/// An error that can occur when parsing strings into `Amount` values.
pub struct AmountError(AmountErrorKind);

enum AmountErrorKind {
    Empty,
    Decimal(rust_decimal::Error),
    Float(f64),
}

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.0 {
            AmountErrorKind::Empty => write!(f, "an empty string is not an amount"),
            AmountErrorKind::Decimal(e) => Display::fmt(e, f),
            AmountErrorKind::Float(v) => write!(f, "{v} cannot be represented as an amount"),
        }
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.0 {
            AmountErrorKind::Decimal(e) => Some(e),
            _ => None,
        }
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError(AmountErrorKind::Empty));
        }
        // Scientific notation ("1e3") is accepted by number inputs, so accept it here too.
        let value = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|e| AmountError(AmountErrorKind::Decimal(e)))?;
        Ok(Amount(value))
    }
}

impl TryFrom<f64> for Amount {
    type Error = AmountError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Decimal::from_f64(value)
            .map(|d| Amount(d.normalize()))
            .ok_or(AmountError(AmountErrorKind::Float(value)))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.value().round_dp(2))
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // The API speaks plain JSON numbers.
        match self.value().to_f64() {
            Some(v) => serializer.serialize_f64(v),
            None => serializer.serialize_str(&self.value().to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(v) => Amount::try_from(v).map_err(serde::de::Error::custom),
            Raw::Text(s) => Amount::from_str(&s).map_err(serde::de::Error::custom),
        }
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal() {
        let amount = Amount::from_str("150.50").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("150.50").unwrap());
    }

    #[test]
    fn test_parse_whitespace() {
        let amount = Amount::from_str("  42  ").unwrap();
        assert_eq!(amount.value(), Decimal::from(42));
    }

    #[test]
    fn test_parse_negative() {
        let amount = Amount::from_str("-5").unwrap();
        assert!(amount.is_negative());
        assert!(!amount.is_positive());
    }

    #[test]
    fn test_parse_scientific() {
        let amount = Amount::from_str("1e3").unwrap();
        assert_eq!(amount.value(), Decimal::from(1000));
    }

    #[test]
    fn test_parse_empty_string_fails() {
        assert!(Amount::from_str("").is_err());
        assert!(Amount::from_str("   ").is_err());
    }

    #[test]
    fn test_parse_garbage_fails() {
        let err = Amount::from_str("12abc").unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn test_zero_is_not_positive_or_negative() {
        let zero = Amount::from_str("0").unwrap();
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());
        assert!(zero.is_zero());
    }

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Amount::from_str("150.5").unwrap().to_string(), "150.50");
        assert_eq!(Amount::from_str("7").unwrap().to_string(), "7.00");
        assert_eq!(Amount::from_str("-12.346").unwrap().to_string(), "-12.35");
    }

    #[test]
    fn test_abs_2dp() {
        assert_eq!(Amount::from_str("-12").unwrap().abs_2dp(), "12.00");
    }

    #[test]
    fn test_serialize_as_number() {
        let amount = Amount::from_str("150.5").unwrap();
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "150.5");
    }

    #[test]
    fn test_deserialize_number() {
        let amount: Amount = serde_json::from_str("87.43").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("87.43").unwrap());
    }

    #[test]
    fn test_deserialize_string() {
        let amount: Amount = serde_json::from_str("\"87.43\"").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("87.43").unwrap());
    }

    #[test]
    fn test_ordering() {
        let a1 = Amount::from_str("30").unwrap();
        let a2 = Amount::from_str("50").unwrap();
        assert!(a1 < a2);
    }
}
