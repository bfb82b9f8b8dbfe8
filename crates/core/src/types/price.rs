//! Money amounts in Brazilian reais using decimal arithmetic.
//!
//! The backend exchanges prices as JSON floats. Deserialisation goes through
//! `Decimal`, which accepts numbers and numeric strings; serialisation writes a
//! JSON number again so request bodies keep the shape the backend expects.

use std::iter::Sum;
use std::ops::{Add, Mul};

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize, Serializer};

/// A price or total in reais.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// The zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from an amount in centavos.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Format for display, e.g. `R$ 30.00`.
    #[must_use]
    pub fn display(&self) -> String {
        format!("R$ {}", self.plain())
    }

    /// The amount with two decimal places and no currency symbol, e.g. `30.00`.
    #[must_use]
    pub fn plain(&self) -> String {
        format!("{:.2}", self.0.round_dp(2))
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

impl std::str::FromStr for Price {
    type Err = rust_decimal::Error;

    /// Parse a user-entered amount. Accepts a comma as decimal separator.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace(',', ".");
        normalized.parse::<Decimal>().map(Self)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0.to_f64().unwrap_or_default())
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

// Amounts come from backend data, so arithmetic saturates at `Decimal::MAX`
// instead of panicking.
impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(rhs)))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Price {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_formats_two_places() {
        assert_eq!(Price::from_cents(3000).display(), "R$ 30.00");
        assert_eq!(Price::from_cents(1250).to_string(), "R$ 12.50");
        assert_eq!(Price::ZERO.display(), "R$ 0.00");
    }

    #[test]
    fn test_deserializes_numbers_and_strings() {
        let from_float: Price = serde_json::from_str("10.5").unwrap();
        let from_int: Price = serde_json::from_str("10").unwrap();
        let from_str: Price = serde_json::from_str("\"10.50\"").unwrap();

        assert_eq!(from_float.plain(), "10.50");
        assert_eq!(from_int.plain(), "10.00");
        assert_eq!(from_str, from_float);
    }

    #[test]
    fn test_serializes_as_json_number() {
        let value = serde_json::to_value(Price::from_cents(1999)).unwrap();
        assert!(value.is_number());
        assert!((value.as_f64().unwrap() - 19.99).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sum_and_multiply() {
        let prices = [Price::from_cents(1000), Price::from_cents(250)];
        assert_eq!(prices.iter().sum::<Price>(), Price::from_cents(1250));
        assert_eq!(Price::from_cents(1000) * 3, Price::from_cents(3000));
    }

    #[test]
    fn test_extreme_quantity_saturates() {
        let huge: Price = "100000000000000000000".parse().unwrap();
        assert_eq!((huge * 4_000_000_000).amount(), Decimal::MAX);
        assert_eq!((huge * 2).plain(), "200000000000000000000.00");
    }

    #[test]
    fn test_large_sum_saturates() {
        let near_max = Price::new(Decimal::MAX);
        let total: Price = [near_max, near_max, Price::from_cents(100)].iter().sum();
        assert_eq!(total.amount(), Decimal::MAX);
        assert!(!total.display().is_empty());
    }

    #[test]
    fn test_parse_accepts_comma() {
        let price: Price = "12,90".parse().unwrap();
        assert_eq!(price, Price::from_cents(1290));
        assert!("doze".parse::<Price>().is_err());
        assert!("-1".parse::<Price>().unwrap().is_negative());
    }
}
