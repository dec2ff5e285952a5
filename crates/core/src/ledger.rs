//! Stock ledger arithmetic.
//!
//! Every change to an item's `stock_quantity` is the effect of exactly one
//! ledger entry. This module validates the requested quantity and computes
//! the resulting stock; the caller persists entry and quantity atomically
//! while holding a lock on the item row.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::MovementType;

/// Errors raised by ledger arithmetic.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerError {
    /// Movement quantity was zero or negative.
    #[error("quantity must be greater than zero (got {0})")]
    NonPositiveQuantity(i32),
    /// An outbound movement would take stock below zero.
    #[error("insufficient stock: {available} available, {requested} requested")]
    InsufficientStock {
        /// Stock on hand before the movement.
        available: i32,
        /// Quantity requested out.
        requested: i32,
    },
    /// An inbound movement would overflow the stock column.
    #[error("stock quantity would overflow")]
    Overflow,
}

/// A strictly positive movement quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct MovementQuantity(i32);

impl MovementQuantity {
    /// Validate a movement quantity.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NonPositiveQuantity`] for values `<= 0`.
    pub const fn new(quantity: i32) -> Result<Self, LedgerError> {
        if quantity <= 0 {
            return Err(LedgerError::NonPositiveQuantity(quantity));
        }
        Ok(Self(quantity))
    }

    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for MovementQuantity {
    type Error = LedgerError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MovementQuantity> for i32 {
    fn from(q: MovementQuantity) -> Self {
        q.0
    }
}

/// Stock after applying one movement to `stock`.
///
/// # Errors
///
/// Returns [`LedgerError::InsufficientStock`] when an `out` movement exceeds
/// the stock on hand, and [`LedgerError::Overflow`] when an `in` movement
/// would not fit the column.
pub const fn apply(
    stock: i32,
    movement_type: MovementType,
    quantity: MovementQuantity,
) -> Result<i32, LedgerError> {
    match movement_type {
        MovementType::In => match stock.checked_add(quantity.get()) {
            Some(next) => Ok(next),
            None => Err(LedgerError::Overflow),
        },
        MovementType::Out => {
            if stock < quantity.get() {
                return Err(LedgerError::InsufficientStock {
                    available: stock,
                    requested: quantity.get(),
                });
            }
            Ok(stock - quantity.get())
        }
    }
}

/// Net stock implied by a sequence of ledger entries, starting from zero.
///
/// Returns `None` if the sequence ever overdraws or overflows.
#[must_use]
pub fn replay<I>(entries: I) -> Option<i32>
where
    I: IntoIterator<Item = (MovementType, MovementQuantity)>,
{
    entries
        .into_iter()
        .try_fold(0, |stock, (kind, qty)| apply(stock, kind, qty).ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn qty(n: i32) -> MovementQuantity {
        MovementQuantity::new(n).unwrap()
    }

    #[test]
    fn test_in_adds() {
        assert_eq!(apply(100, MovementType::In, qty(25)), Ok(125));
    }

    #[test]
    fn test_out_within_stock_subtracts() {
        assert_eq!(apply(100, MovementType::Out, qty(100)), Ok(0));
        assert_eq!(apply(100, MovementType::Out, qty(40)), Ok(60));
    }

    #[test]
    fn test_out_beyond_stock_is_rejected() {
        assert_eq!(
            apply(100, MovementType::Out, qty(150)),
            Err(LedgerError::InsufficientStock {
                available: 100,
                requested: 150
            })
        );
    }

    #[test]
    fn test_second_of_two_concurrent_outs_fails_once_serialized() {
        let after_first = apply(100, MovementType::Out, qty(60)).unwrap();
        assert_eq!(after_first, 40);
        assert!(apply(after_first, MovementType::Out, qty(60)).is_err());
    }

    #[test]
    fn test_non_positive_quantity() {
        assert_eq!(
            MovementQuantity::new(0),
            Err(LedgerError::NonPositiveQuantity(0))
        );
        assert!(MovementQuantity::new(-5).is_err());
        let parsed: Result<MovementQuantity, _> = serde_json::from_str("0");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_overflow() {
        assert_eq!(
            apply(i32::MAX, MovementType::In, qty(1)),
            Err(LedgerError::Overflow)
        );
    }

    #[test]
    fn test_replay() {
        let entries = [
            (MovementType::In, qty(100)),
            (MovementType::Out, qty(30)),
            (MovementType::In, qty(5)),
        ];
        assert_eq!(replay(entries), Some(75));
        assert_eq!(replay([(MovementType::Out, qty(1))]), None);
    }
}
