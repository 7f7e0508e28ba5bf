//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                         │
//! │                                                                     │
//! │  In JavaScript/floating point:                                      │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                       │
//! │                                                                     │
//! │  OUR SOLUTION: Integer Cents                                        │
//! │    $10.99 is stored as 1099. Every total, profit figure and         │
//! │    credit balance in the system is exact integer arithmetic.        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use mato_core::money::Money;
//!
//! // Create from cents (preferred)
//! let price = Money::from_cents(1099); // $10.99
//!
//! // Or parse cashier input (rounds to 2 decimal places)
//! let typed = Money::parse("10.99").unwrap();
//! assert_eq!(price, typed);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use crate::quantity::Quantity;

// =============================================================================
// Decimal Input Parsing
// =============================================================================

/// Parses a raw decimal string into a scaled integer, rounding half away
/// from zero at `scale` fractional digits.
///
/// Accepts what an HTML number field hands over: optional sign, optional
/// integer part, optional fraction, a trailing dot ("12." parses as 12).
/// Anything else - including a bare "." or an empty string - is `None`.
pub(crate) fn parse_scaled(raw: &str, scale: u32) -> Option<i64> {
    let s = raw.trim();
    let (negative, s) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, f),
        None => (s, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if !frac_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // Out of any realistic monetary or weight range.
    if int_part.len() > 15 || frac_part.len() > 12 {
        return None;
    }

    let mut value: i128 = 0;
    for b in int_part.bytes() {
        value = value * 10 + i128::from(b - b'0');
    }
    let mut frac = frac_part.bytes();
    for _ in 0..scale {
        let digit = frac.next().map_or(0, |b| i128::from(b - b'0'));
        value = value * 10 + digit;
    }
    // Round half away from zero on the first dropped digit.
    if let Some(b) = frac.next() {
        if b >= b'5' {
            value += 1;
        }
    }

    let value = if negative { -value } else { value };
    i64::try_from(value).ok()
}

/// Integer division rounding half away from zero.
///
/// Used wherever one reconciled field is re-derived from another
/// (unit price from a line total, quantity from a line total).
pub(crate) fn div_round_half_away(numer: i128, denom: i128) -> i64 {
    debug_assert!(denom != 0);
    let negative = (numer < 0) != (denom < 0);
    let n = numer.unsigned_abs();
    let d = denom.unsigned_abs();
    let q = (2 * n + d) / (2 * d);
    let q = i64::try_from(q).unwrap_or(i64::MAX);
    if negative {
        -q
    } else {
        q
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: credit balances can go negative (overpayment)
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Serde transparent**: serializes as a plain number in JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
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

    /// Parses cashier-typed text into money, rounded to 2 decimal places
    /// (half away from zero). Returns `None` for non-numeric input.
    ///
    /// ## Example
    /// ```rust
    /// use mato_core::money::Money;
    ///
    /// assert_eq!(Money::parse("2.5"), Some(Money::from_cents(250)));
    /// assert_eq!(Money::parse("12."), Some(Money::from_cents(1200)));
    /// assert_eq!(Money::parse("1.005"), Some(Money::from_cents(101)));
    /// assert_eq!(Money::parse("abc"), None);
    /// assert_eq!(Money::parse(""), None);
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        parse_scaled(raw, 2).map(Money)
    }

    /// Line total: unit price × quantity, rounded to whole cents
    /// (half away from zero).
    pub fn mul_quantity(&self, qty: Quantity) -> Money {
        Money(div_round_half_away(
            i128::from(self.0) * i128::from(qty.milli()),
            1000,
        ))
    }

    /// Unit price derived from a line total: `self / qty`, rounded to
    /// whole cents. `None` when the quantity is zero.
    pub fn div_quantity(&self, qty: Quantity) -> Option<Money> {
        if qty.is_zero() {
            return None;
        }
        Some(Money(div_round_half_away(
            i128::from(self.0) * 1000,
            i128::from(qty.milli()),
        )))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly dollar formatting. UI display formatting is the
/// frontend's concern.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, (self.0 / 100).abs(), (self.0 % 100).abs())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
