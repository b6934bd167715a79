//! Type-safe price representation using decimal arithmetic.
//!
//! All catalog prices are Indian rupee amounts. Arithmetic stays in
//! [`Decimal`] so cart totals never pick up floating-point drift; display
//! formatting follows the storefront's `en-IN` convention (whole rupees,
//! lakh/crore digit grouping).

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul, Sub};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A rupee amount.
///
/// Serializes transparently as the decimal amount. Deserialization accepts
/// JSON numbers (the REST backend sends floats) as well as decimal strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero rupees.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of rupees.
    #[must_use]
    pub fn rupees(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Format for display, e.g. `₹1,24,999`.
    ///
    /// Rounds half away from zero to whole rupees.
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        let whole = rounded.to_i128().unwrap_or_default();
        let digits = whole.unsigned_abs().to_string();
        let sign = if whole < 0 { "-" } else { "" };
        format!("{sign}₹{}", group_indian(&digits))
    }
}

/// Insert `en-IN` grouping separators: the last three digits, then pairs.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_owned();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut out = String::with_capacity(digits.len() + digits.len() / 2);
    let lead = head.len() % 2;
    for (i, c) in head.chars().enumerate() {
        if i > 0 && (i + 2 - lead) % 2 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out.push(',');
    out.push_str(tail);
    out
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

// Arithmetic saturates at the `Decimal` bounds instead of panicking on overflow.

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

/// Serde adapter writing a [`Price`] as a JSON number.
///
/// The order endpoint takes float amounts. Reading accepts the same inputs
/// as [`Price`]'s own `Deserialize`.
///
/// ```
/// # use serde::Serialize;
/// # use slayk_core::Price;
/// #[derive(Serialize)]
/// struct Line {
///     #[serde(with = "slayk_core::price::as_number")]
///     price: Price,
/// }
///
/// let json = serde_json::to_string(&Line { price: Price::rupees(2499) }).unwrap();
/// assert_eq!(json, r#"{"price":2499.0}"#);
/// ```
pub mod as_number {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Price;

    /// # Errors
    ///
    /// Returns the serializer's error, or an error if the amount has no
    /// `f64` representation.
    pub fn serialize<S: Serializer>(price: &Price, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&price.0, serializer)
    }

    /// # Errors
    ///
    /// Returns the deserializer's error for non-numeric input.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Price, D::Error> {
        Price::deserialize(deserializer)
    }
}
