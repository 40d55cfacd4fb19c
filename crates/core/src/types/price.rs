//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are always non-negative. The shop trades in a single currency, so a
//! price is just an amount; formatting adds the dollar sign.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),

    /// The amount is above [`Price::MAX`].
    #[error("price cannot exceed 1000000 (got {0})")]
    TooLarge(Decimal),
}

/// A non-negative unit price, at most [`Price::MAX`].
///
/// Deserialization goes through [`Price::new`], so a gateway row carrying a
/// negative or absurd price fails to decode instead of reaching the cart.
///
/// ```
/// use rust_decimal::Decimal;
/// use sweet_dreams_core::Price;
///
/// let price = Price::from_cents(2499).unwrap();
/// assert_eq!(price.amount(), Decimal::new(2499, 2));
/// assert_eq!(price.display(), "$24.99");
/// assert!(Price::from_cents(-1).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// The largest accepted price, one million dollars.
    pub const MAX: Self = Self(Decimal::from_parts(1_000_000, 0, 0, false, 0));

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if the amount is below zero, or
    /// [`PriceError::TooLarge`] if it is above [`Price::MAX`].
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        if amount > Self::MAX.0 {
            return Err(PriceError::TooLarge(amount));
        }
        Ok(Self(amount.normalize()))
    }

    /// Create a price from an amount in cents.
    ///
    /// # Errors
    ///
    /// Returns a [`PriceError`] if `cents` is below zero or the amount is
    /// above [`Price::MAX`].
    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        Self::new(Decimal::new(cents, 2))
    }

    /// Create a price from an unsigned amount in cents, capped at
    /// [`Price::MAX`].
    #[must_use]
    pub fn from_whole_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), 2).min(Self::MAX.0))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The amount multiplied by a quantity. Saturates at `Decimal::MAX`.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Decimal {
        self.0.saturating_mul(Decimal::from(quantity))
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format_amount(self.0)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.display())
    }
}

/// Format any decimal amount as dollars with exactly two decimals.
///
/// Rounds half away from zero, so `$0.005` shows as `$0.01`.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    format!("${rounded}")
}
