//! # Quantity Module
//!
//! Quantities in milli-units (1000 = 1.0), the quantity counterpart of
//! [`Money`]'s integer cents.
//!
//! Weight items are sold by the kilogram with gram-level precision
//! (0.125 kg of raisins), so three fractional digits are kept exactly.
//! Piece items simply use whole multiples of 1000.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

use crate::money::{div_round_half_away, parse_scaled, Money};

/// A product quantity in milli-units.
///
/// Stored as `i64` like [`Money`]; negative quantities never occur in a
/// cart but the representation does not forbid them (stock on hand can
/// legitimately be driven negative by a checkout).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Quantity(i64);

impl Quantity {
    /// One whole unit (one piece).
    pub const ONE: Quantity = Quantity(1000);

    /// The default increment when tapping a weight product: 0.1 kg.
    pub const TENTH: Quantity = Quantity(100);

    #[inline]
    pub const fn from_milli(milli: i64) -> Self {
        Quantity(milli)
    }

    #[inline]
    pub const fn milli(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Quantity(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Parses cashier-typed text into a quantity, rounded to 3 decimal
    /// places (half away from zero). `None` for non-numeric input.
    ///
    /// ## Example
    /// ```rust
    /// use mato_core::quantity::Quantity;
    ///
    /// assert_eq!(Quantity::parse("2"), Some(Quantity::from_milli(2000)));
    /// assert_eq!(Quantity::parse("0.125"), Some(Quantity::from_milli(125)));
    /// assert_eq!(Quantity::parse("0.0005"), Some(Quantity::from_milli(1)));
    /// assert_eq!(Quantity::parse("x"), None);
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        parse_scaled(raw, 3).map(Quantity)
    }

    /// Quantity derived from a line total: `total / unit_price`, rounded
    /// to 3 decimal places. `None` when the unit price is zero.
    pub fn from_total(total: Money, unit_price: Money) -> Option<Self> {
        if unit_price.is_zero() {
            return None;
        }
        Some(Quantity(div_round_half_away(
            i128::from(total.cents()) * 1000,
            i128::from(unit_price.cents()),
        )))
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::zero()
    }
}

impl Add for Quantity {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Quantity(self.0 + other.0)
    }
}

impl AddAssign for Quantity {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Prints up to three decimals with trailing zeros trimmed: "2", "0.1",
/// "0.125".
impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let whole = (self.0 / 1000).abs();
        let frac = (self.0 % 1000).abs();
        if frac == 0 {
            write!(f, "{}{}", sign, whole)
        } else {
            let s = format!("{:03}", frac);
            write!(f, "{}{}.{}", sign, whole, s.trim_end_matches('0'))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(Quantity::parse("1"), Some(Quantity::from_milli(1000)));
        assert_eq!(Quantity::parse("0.1"), Some(Quantity::from_milli(100)));
        assert_eq!(Quantity::parse("0.125"), Some(Quantity::from_milli(125)));
        assert_eq!(Quantity::parse("2."), Some(Quantity::from_milli(2000)));
        assert_eq!(Quantity::parse(""), None);
        assert_eq!(Quantity::parse("kg"), None);
    }

    #[test]
    fn test_parse_rounds_fourth_decimal() {
        assert_eq!(Quantity::parse("0.0005"), Some(Quantity::from_milli(1)));
        assert_eq!(Quantity::parse("0.0004"), Some(Quantity::from_milli(0)));
    }

    #[test]
    fn test_from_total() {
        // $5.00 at $2.50/kg = 2.000 kg
        let qty = Quantity::from_total(Money::from_cents(500), Money::from_cents(250));
        assert_eq!(qty, Some(Quantity::from_milli(2000)));

        // $1.00 at $3.00/kg = 0.333 kg
        let qty = Quantity::from_total(Money::from_cents(100), Money::from_cents(300));
        assert_eq!(qty, Some(Quantity::from_milli(333)));

        // Zero unit price cannot be divided by
        assert_eq!(Quantity::from_total(Money::from_cents(100), Money::zero()), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Quantity::from_milli(2000).to_string(), "2");
        assert_eq!(Quantity::from_milli(100).to_string(), "0.1");
        assert_eq!(Quantity::from_milli(125).to_string(), "0.125");
        assert_eq!(Quantity::from_milli(0).to_string(), "0");
        assert_eq!(Quantity::from_milli(-1500).to_string(), "-1.5");
    }
}
