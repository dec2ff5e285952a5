//! Unit price using decimal arithmetic.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when constructing a [`UnitPrice`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitPriceError {
    /// Price is below zero.
    #[error("unit price cannot be negative")]
    Negative,
    /// Price does not fit `NUMERIC(10, 2)`.
    #[error("unit price must be less than {max}")]
    TooLarge {
        /// Exclusive upper bound.
        max: Decimal,
    },
}

/// Price of one unit of an inventory item.
///
/// Stored as `NUMERIC(10, 2)`: rounded to two decimal places and bounded
/// below 10^8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct UnitPrice(Decimal);

impl UnitPrice {
    /// Create a unit price, rounding half away from zero to cents as
    /// `NUMERIC` does.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is negative or too large for the column.
    pub fn new(amount: Decimal) -> Result<Self, UnitPriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(UnitPriceError::Negative);
        }
        let max = Decimal::new(100_000_000, 0);
        let rounded =
            amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        if rounded >= max {
            return Err(UnitPriceError::TooLarge { max });
        }
        Ok(Self(rounded))
    }

    /// The amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for UnitPrice {
    type Error = UnitPriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UnitPrice> for Decimal {
    fn from(price: UnitPrice) -> Self {
        price.0
    }
}
