//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Whole Units
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  RUPIAH HAS NO USABLE MINOR UNIT                                        │
//! │                                                                         │
//! │  Receipts print "Rp50.000" - the dot is a thousands separator.          │
//! │  Every amount in the system is a whole number of currency units.        │
//! │                                                                         │
//! │  Divisions (unit price, proportional shares, even splits) round half   │
//! │  away from zero to the nearest unit:                                    │
//! │    Rp10.000 / 3 = Rp3.333 (×3 = Rp9.999)                               │
//! │  The lost unit is expected and never redistributed.                     │
//! │                                                                         │
//! │  Arithmetic saturates at the i64 bounds instead of overflowing, and    │
//! │  inputs read from text are capped at MAX_INPUT_UNITS (2^53 - 1).       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use splitbill_core::money::Money;
//!
//! let total = Money::from_units(50_000);
//! let unit_price = total.divide_by_quantity(2);
//! assert_eq!(unit_price.units(), 25_000);
//! assert_eq!(total.to_string(), "Rp50.000");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole currency units.
///
/// ## Design Decisions
/// - **i64 (signed)**: discount lines on a receipt are negative
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Serialises as a bare number**: `{"totalPrice": 50000}`
///
/// ## Where Money is Used
/// ```text
/// LineItem.total_price ──► LineItem.unit_price ──► claim value (unit × qty)
///                                                        │
/// Charges.discount / service_fee ── proportion_of ───────┤
/// Charges.delivery_fee ──────────── split_evenly ────────┘──► person total
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Largest amount or quantity accepted from receipt text or form input.
    ///
    /// Matches the exact-integer range of an IEEE double, so every accepted
    /// value survives a round trip through JSON consumers unchanged.
    pub const MAX_INPUT_UNITS: i64 = 9_007_199_254_740_991;

    /// Creates a Money value from whole currency units.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units)
    }

    /// Returns the value in whole currency units.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    ///
    /// ## Example
    /// ```rust
    /// use splitbill_core::money::Money;
    ///
    /// let voucher = Money::from_units(-40_000);
    /// assert_eq!(voucher.abs().units(), 40_000);
    /// ```
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.saturating_abs())
    }

    /// Clamps negative values to zero.
    #[inline]
    pub const fn non_negative(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            Money(self.0)
        }
    }

    /// Multiplies money by a quantity, saturating at the i64 bounds.
    ///
    /// ## Example
    /// ```rust
    /// use splitbill_core::money::Money;
    ///
    /// let unit_price = Money::from_units(18_000);
    /// assert_eq!(unit_price.multiply_quantity(3).units(), 54_000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Divides a line total by its quantity to get the unit price.
    ///
    /// A quantity of zero (or less) divides by one instead, so a
    /// degenerate line never produces a division by zero.
    ///
    /// ## Example
    /// ```rust
    /// use splitbill_core::money::Money;
    ///
    /// let total = Money::from_units(10_000);
    /// assert_eq!(total.divide_by_quantity(3).units(), 3_333);
    /// assert_eq!(total.divide_by_quantity(0).units(), 10_000);
    /// ```
    pub fn divide_by_quantity(&self, qty: i64) -> Money {
        let divisor = if qty > 0 { qty } else { 1 };
        Money(div_round(self.0 as i128, divisor as i128))
    }

    /// Returns `self × part / whole`, rounded to the nearest unit.
    ///
    /// Used to hand out a shared cost in proportion to a share of value.
    /// Returns zero when `whole` is not positive.
    ///
    /// ## Example
    /// ```rust
    /// use splitbill_core::money::Money;
    ///
    /// let discount = Money::from_units(10_000);
    /// let share = discount.proportion_of(Money::from_units(25_000), Money::from_units(100_000));
    /// assert_eq!(share.units(), 2_500);
    ///
    /// assert!(discount.proportion_of(Money::from_units(1), Money::zero()).is_zero());
    /// ```
    pub fn proportion_of(&self, part: Money, whole: Money) -> Money {
        if whole.0 <= 0 {
            return Money::zero();
        }
        // i128 so that large amounts times large parts cannot overflow
        Money(div_round(self.0 as i128 * part.0 as i128, whole.0 as i128))
    }

    /// Splits the value evenly between `ways` participants.
    ///
    /// Returns zero when there is nobody to split between.
    ///
    /// ## Example
    /// ```rust
    /// use splitbill_core::money::Money;
    ///
    /// let delivery = Money::from_units(5_000);
    /// assert_eq!(delivery.split_evenly(2).units(), 2_500);
    /// assert!(delivery.split_evenly(0).is_zero());
    /// ```
    pub fn split_evenly(&self, ways: usize) -> Money {
        if ways == 0 {
            return Money::zero();
        }
        Money(div_round(self.0 as i128, ways as i128))
    }
}

/// Integer division rounding half away from zero. `d` must be positive.
/// The quotient saturates at the i64 bounds.
fn div_round(n: i128, d: i128) -> i64 {
    let half = d / 2;
    let q = if n >= 0 { (n + half) / d } else { (n - half) / d };
    q.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders the amount the way the receipts print it: `Rp61.000`.
///
/// ## Note
/// This is for debugging and logs. The CLI formats through its
/// configuration so the symbol and separator can be changed.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}Rp{}", sign, group_thousands(self.0.unsigned_abs(), '.'))
    }
}

/// Formats a magnitude with a thousands separator (`61000` → `61.000`).
pub fn group_thousands(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
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
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(self.0.saturating_neg())
    }
}

/// Multiplication by a quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Money::from_units(61_000).to_string(), "Rp61.000");
        assert_eq!(Money::from_units(-40_000).to_string(), "-Rp40.000");
        assert_eq!(Money::from_units(0).to_string(), "Rp0");
        assert_eq!(Money::from_units(1_234_567).to_string(), "Rp1.234.567");
        assert_eq!(Money::from_units(999).to_string(), "Rp999");
    }

    #[test]
    fn test_group_thousands_custom_separator() {
        assert_eq!(group_thousands(1_000_000, ','), "1,000,000");
        assert_eq!(group_thousands(100, ','), "100");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_units(1000);
        let b = Money::from_units(500);

        assert_eq!((a + b).units(), 1500);
        assert_eq!((a - b).units(), 500);
        assert_eq!((a * 3).units(), 3000);
        assert_eq!((-b).units(), -500);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.units(), 2000);
    }

    #[test]
    fn test_divide_by_quantity_rounds_half_up() {
        assert_eq!(Money::from_units(50_000).divide_by_quantity(2).units(), 25_000);
        assert_eq!(Money::from_units(5).divide_by_quantity(2).units(), 3);
        assert_eq!(Money::from_units(20_000).divide_by_quantity(3).units(), 6_667);
    }

    #[test]
    fn test_divide_by_zero_quantity_uses_one() {
        assert_eq!(Money::from_units(7_000).divide_by_quantity(0).units(), 7_000);
        assert_eq!(Money::from_units(7_000).divide_by_quantity(-4).units(), 7_000);
    }

    #[test]
    fn test_proportion_of() {
        let fee = Money::from_units(2_000);
        assert_eq!(
            fee.proportion_of(Money::from_units(1), Money::from_units(3)).units(),
            667
        );
        assert_eq!(
            fee.proportion_of(Money::from_units(50), Money::from_units(50)).units(),
            2_000
        );
        assert!(fee.proportion_of(Money::from_units(50), Money::zero()).is_zero());
        assert!(fee
            .proportion_of(Money::from_units(50), Money::from_units(-1))
            .is_zero());
    }

    #[test]
    fn test_rounding_negative_values() {
        assert_eq!(Money::from_units(-5).divide_by_quantity(2).units(), -3);
        assert_eq!(Money::from_units(-4).divide_by_quantity(3).units(), -1);
    }

    #[test]
    fn test_split_evenly() {
        assert_eq!(Money::from_units(5_000).split_evenly(3).units(), 1_667);
        assert!(Money::from_units(5_000).split_evenly(0).is_zero());
    }

    #[test]
    fn test_non_negative() {
        assert_eq!(Money::from_units(-10).non_negative(), Money::zero());
        assert_eq!(Money::from_units(10).non_negative().units(), 10);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let huge = Money::from_units(i64::MAX - 10);

        assert_eq!((huge + Money::from_units(100)).units(), i64::MAX);
        assert_eq!((-huge - Money::from_units(100)).units(), i64::MIN);
        assert_eq!((huge * 3).units(), i64::MAX);
        assert_eq!(huge.multiply_quantity(-2).units(), i64::MIN);
        assert_eq!(Money::from_units(i64::MIN).abs().units(), i64::MAX);
        assert_eq!((-Money::from_units(i64::MIN)).units(), i64::MAX);

        let mut acc = huge;
        acc += huge;
        assert_eq!(acc.units(), i64::MAX);

        let total: Money = vec![huge, huge, huge].into_iter().sum();
        assert_eq!(total.units(), i64::MAX);
    }

    #[test]
    fn test_proportion_saturates() {
        let huge = Money::from_units(i64::MAX);
        assert_eq!(huge.proportion_of(huge, Money::from_units(1)).units(), i64::MAX);
    }

    /// Splitting Rp10.000 three ways loses one unit and that is expected.
    #[test]
    fn test_division_precision_loss_documented() {
        let total = Money::from_units(10_000);
        let third = total.split_evenly(3);
        let reconstructed = third * 3;

        assert_eq!(reconstructed.units(), 9_999);
        assert_eq!((total - reconstructed).units(), 1);
    }
}
