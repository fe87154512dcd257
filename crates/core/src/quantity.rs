//! Stock quantity value object.
//!
//! Quantities are real numbers because units of measure may be fractional
//! (kilograms, litres). The engine never rounds or clamps them; sign checks
//! happen where the business rules need them (item lines, counted stock,
//! delivery sufficiency).

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// A finite amount of stock in the product's unit of measure.
#[derive(Debug, Copy, Clone, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(f64);

impl ValueObject for Quantity {}

impl Quantity {
    pub const ZERO: Quantity = Quantity(0.0);

    /// Build a quantity, rejecting NaN and infinities.
    pub fn new(value: f64) -> DomainResult<Self> {
        if value.is_finite() {
            Ok(Self(value))
        } else {
            Err(DomainError::validation(format!(
                "quantity must be a finite number (got {value})"
            )))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0.0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0.0
    }

    /// Sum that must stay finite.
    pub fn checked_add(self, rhs: Self) -> DomainResult<Self> {
        Self::new(self.0 + rhs.0).map_err(|_| overflow(self, "+", rhs))
    }

    /// Difference that must stay finite.
    pub fn checked_sub(self, rhs: Self) -> DomainResult<Self> {
        Self::new(self.0 - rhs.0).map_err(|_| overflow(self, "-", rhs))
    }
}

fn overflow(lhs: Quantity, op: &str, rhs: Quantity) -> DomainError {
    DomainError::validation(format!("quantity out of range: {lhs} {op} {rhs}"))
}

impl TryFrom<f64> for Quantity {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<u32> for Quantity {
    fn from(value: u32) -> Self {
        Self(f64::from(value))
    }
}

impl From<Quantity> for f64 {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Add for Quantity {
    type Output = Quantity;

    fn add(self, rhs: Self) -> Self::Output {
        Quantity(self.0 + rhs.0)
    }
}

impl AddAssign for Quantity {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Quantity {
    type Output = Quantity;

    fn sub(self, rhs: Self) -> Self::Output {
        Quantity(self.0 - rhs.0)
    }
}

impl SubAssign for Quantity {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Quantity {
    type Output = Quantity;

    fn neg(self) -> Self::Output {
        Quantity(-self.0)
    }
}

impl Sum for Quantity {
    fn sum<I: Iterator<Item = Quantity>>(iter: I) -> Self {
        iter.fold(Quantity::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Quantity> for Quantity {
    fn sum<I: Iterator<Item = &'a Quantity>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rejects_non_finite_values() {
        assert!(Quantity::new(f64::NAN).is_err());
        assert!(Quantity::new(f64::INFINITY).is_err());
        assert!(Quantity::new(-2.5).is_ok());
    }

    #[test]
    fn fractional_quantities_are_kept_as_is() {
        let q = Quantity::new(1.25).unwrap() + Quantity::new(0.5).unwrap();
        assert_eq!(q.value(), 1.75);
    }

    #[test]
    fn sign_helpers() {
        assert!(Quantity::ZERO.is_zero());
        assert!(Quantity::from(3).is_positive());
        assert!((-Quantity::from(3)).is_negative());
    }

    #[test]
    fn serializes_as_plain_number() {
        let json = serde_json::to_string(&Quantity::new(12.5).unwrap()).unwrap();
        assert_eq!(json, "12.5");
    }

    #[test]
    fn checked_arithmetic_rejects_overflow() {
        let max = Quantity::new(f64::MAX).unwrap();
        assert!(matches!(max.checked_add(max), Err(DomainError::Validation(_))));
        assert!(matches!((-max).checked_sub(max), Err(DomainError::Validation(_))));
        assert_eq!(Quantity::from(2).checked_add(Quantity::from(3)), Ok(Quantity::from(5)));
        assert_eq!(Quantity::from(2).checked_sub(Quantity::from(3)), Ok(-Quantity::from(1)));
    }

    proptest! {
        #[test]
        fn add_then_sub_restores_integral_values(a in 0u32..1_000_000, b in 0u32..1_000_000) {
            let start = Quantity::from(a);
            let delta = Quantity::from(b);
            prop_assert_eq!(start + delta - delta, start);
        }
    }
}
