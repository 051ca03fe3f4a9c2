//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A booking total re-displayed after a page refresh must be identical   │
//! │  to the one shown in the confirmation popup.                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Every amount is an i64 count of minor units. Sums are exact.        │
//! │    The only rounding step is an explicit, documented prorate().        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use innkeep_core::money::Money;
//!
//! // Create from cents (preferred)
//! let rate = Money::from_cents(3_000_000); // 30000.00 per night
//!
//! // Arithmetic is checked; an overflowing price is None, never a wrap
//! let five_nights = rate.checked_mul(5).unwrap();
//! assert_eq!(five_nights.to_string(), "150000.00");
//! assert_eq!(rate.checked_mul(i64::MAX), None);
//!
//! // Parse what a price input field delivers
//! let price: Money = "12.50".parse().unwrap();
//! assert_eq!(price.cents(), 1250);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: a price field can hold a negative value until the
///   validators reject it, so the type must be able to represent it
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support, serialized as integer cents
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  RateCard.*_cents ──► PriceCalculator ──► CostComponent.amount          │
/// │                                                 │                       │
/// │  LineItem.unit_price × quantity ────────────────┤                       │
/// │                                                 ▼                       │
/// │                               PricingBreakdown.total (exact sum)        │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use innkeep_core::money::Money;
    ///
    /// let fee = Money::from_cents(35_000_000); // 350000.00
    /// assert_eq!(fee.cents(), 35_000_000);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole major units.
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * 100)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub const fn checked_add(self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Multiplies by a count (nights, rooms, adults, quantity), `None` on
    /// overflow.
    ///
    /// ## Example
    /// ```rust
    /// use innkeep_core::money::Money;
    ///
    /// let unit_price = Money::from_major(8);
    /// assert_eq!(unit_price.checked_mul(2), Some(Money::from_major(16)));
    /// assert_eq!(unit_price.checked_mul(i64::MAX), None);
    /// ```
    #[inline]
    pub const fn checked_mul(self, count: i64) -> Option<Money> {
        match self.0.checked_mul(count) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Sums amounts, `None` as soon as the running total overflows.
    pub fn checked_sum<I>(amounts: I) -> Option<Money>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::zero(), |total, amount| total.checked_add(amount))
    }

    /// Scales a rate by `units / per`, rounding half away from zero to the
    /// nearest cent.
    ///
    /// This is the single rounding step in pricing: a per-guest-hour rate
    /// applied to guest-minutes is `rate.prorate(guests * minutes, 60)`.
    /// `per` must be positive; a non-positive divisor yields zero. `None`
    /// when the result does not fit in i64 cents.
    ///
    /// ## Example
    /// ```rust
    /// use innkeep_core::money::Money;
    ///
    /// let per_hour = Money::from_cents(100); // 1.00 per hour
    /// assert_eq!(per_hour.prorate(90, 60).unwrap().cents(), 150); // 1.5 hours
    /// assert_eq!(per_hour.prorate(1, 60).unwrap().cents(), 2);    // 1.666 → 2
    /// ```
    pub fn prorate(&self, units: i64, per: i64) -> Option<Money> {
        if per <= 0 {
            return Some(Money::zero());
        }
        // i128 so that rate × guests × minutes cannot overflow
        let scaled = self.0 as i128 * units as i128;
        let per = per as i128;
        let half = per / 2;
        let rounded = if scaled >= 0 {
            (scaled + half) / per
        } else {
            (scaled - half) / per
        };
        i64::try_from(rounded).ok().map(Money)
    }

    /// Formats the amount behind a currency symbol, e.g. `Rs 390000.00`.
    pub fn display_with(&self, symbol: &str) -> String {
        if symbol.is_empty() {
            self.to_string()
        } else {
            format!("{} {}", symbol, self)
        }
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Failure to read a decimal amount from text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseMoneyError {
    #[error("amount is empty")]
    Empty,

    #[error("'{0}' is not a decimal amount")]
    Invalid(String),

    #[error("'{0}' has more than two decimal places")]
    TooPrecise(String),
}

/// Parses decimal text as typed into a price input: `10`, `12.5`, `-10`,
/// `+3.25`. Surrounding whitespace is ignored.
impl FromStr for Money {
    type Err = ParseMoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Err(ParseMoneyError::Empty);
        }

        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };

        let (major, minor) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if (major.is_empty() && minor.is_empty()) || !all_digits(major) || !all_digits(minor) {
            return Err(ParseMoneyError::Invalid(text.to_string()));
        }
        if minor.len() > 2 {
            return Err(ParseMoneyError::TooPrecise(text.to_string()));
        }

        let invalid = || ParseMoneyError::Invalid(text.to_string());
        let major_value: i64 = if major.is_empty() {
            0
        } else {
            major.parse().map_err(|_| invalid())?
        };
        let minor_value: i64 = match minor.len() {
            0 => 0,
            1 => minor.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => minor.parse().map_err(|_| invalid())?,
        };

        let cents = major_value
            .checked_mul(100)
            .and_then(|v| v.checked_add(minor_value))
            .ok_or_else(invalid)?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain two-decimal rendering without a currency symbol: `390000.00`.
///
/// The presentation edge adds the symbol with [`Money::display_with`].
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor_part(), 99);
    }

    #[test]
    fn test_from_major() {
        assert_eq!(Money::from_major(390_000).cents(), 39_000_000);
        assert_eq!(Money::from_major(-5).cents(), -500);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(39_000_000).to_string(), "390000.00");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_display_with_symbol() {
        let total = Money::from_major(382_000);
        assert_eq!(total.display_with("Rs"), "Rs 382000.00");
        assert_eq!(total.display_with(""), "382000.00");
    }

    #[test]
    fn test_checked_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!(a.checked_add(b), Some(Money::from_cents(1500)));
        assert_eq!(a.checked_mul(3), Some(Money::from_cents(3000)));
        assert_eq!(Money::from_cents(i64::MAX).checked_add(b), None);
        assert_eq!(Money::from_major(30_000).checked_mul(1_000_000_000_000_000), None);
    }

    #[test]
    fn test_checked_sum() {
        let amounts = [Money::from_major(10), Money::from_major(12), Money::from_major(36)];
        assert_eq!(Money::checked_sum(amounts), Some(Money::from_major(58)));
        assert_eq!(Money::checked_sum(Vec::new()), Some(Money::zero()));

        let huge = [Money::from_cents(i64::MAX - 1), Money::from_cents(2)];
        assert_eq!(Money::checked_sum(huge), None);
    }

    #[test]
    fn test_prorate_rounds_half_away_from_zero() {
        let rate = Money::from_cents(16_000); // 160.00 per guest-hour
        // 50 guests × 300 minutes
        assert_eq!(rate.prorate(50 * 300, 60), Some(Money::from_major(40_000)));
        // 1 cent per hour over 30 minutes is exactly half a cent
        assert_eq!(Money::from_cents(1).prorate(30, 60), Some(Money::from_cents(1)));
        assert_eq!(Money::from_cents(-1).prorate(30, 60), Some(Money::from_cents(-1)));
        assert_eq!(Money::from_cents(100).prorate(10, 0), Some(Money::zero()));
    }

    #[test]
    fn test_prorate_overflow_is_none() {
        assert_eq!(Money::from_cents(i64::MAX).prorate(120, 60), None);
        assert_eq!(
            Money::from_cents(i64::MAX).prorate(60, 60),
            Some(Money::from_cents(i64::MAX))
        );
    }

    #[test]
    fn test_parse_decimal_text() {
        assert_eq!("10".parse::<Money>().unwrap().cents(), 1000);
        assert_eq!("12.5".parse::<Money>().unwrap().cents(), 1250);
        assert_eq!(" 12.05 ".parse::<Money>().unwrap().cents(), 1205);
        assert_eq!("-10".parse::<Money>().unwrap().cents(), -1000);
        assert_eq!("+3.25".parse::<Money>().unwrap().cents(), 325);
        assert_eq!(".5".parse::<Money>().unwrap().cents(), 50);
        assert_eq!("7.".parse::<Money>().unwrap().cents(), 700);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!("".parse::<Money>(), Err(ParseMoneyError::Empty));
        assert!(matches!("abc".parse::<Money>(), Err(ParseMoneyError::Invalid(_))));
        assert!(matches!("1.2.3".parse::<Money>(), Err(ParseMoneyError::Invalid(_))));
        assert!(matches!(".".parse::<Money>(), Err(ParseMoneyError::Invalid(_))));
        assert!(matches!("1.234".parse::<Money>(), Err(ParseMoneyError::TooPrecise(_))));
    }

    #[test]
    fn test_zero_and_checks() {
        assert_eq!(Money::zero().cents(), 0);
        assert!(!Money::zero().is_negative());
        assert!(Money::from_cents(-100).is_negative());
    }
}
