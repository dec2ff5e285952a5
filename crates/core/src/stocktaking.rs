//! Physical count reconciliation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when validating a count.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StocktakingError {
    #[error("theoretical stock cannot be negative (got {0})")]
    NegativeTheoretical(i32),
    #[error("actual stock cannot be negative (got {0})")]
    NegativeActual(i32),
}

/// Classification of a count result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscrepancyKind {
    Match,
    Shortage,
    Surplus,
}

/// The gap between what the system believed and what was counted.
///
/// `difference = actual − theoretical`: negative is a shortage, positive a
/// surplus. It is always derived here, never taken from the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discrepancy {
    pub theoretical_stock: i32,
    pub actual_stock: i32,
    pub difference: i32,
}

impl Discrepancy {
    /// Compute the discrepancy for a count.
    ///
    /// # Errors
    ///
    /// Returns an error if either figure is negative.
    pub const fn between(theoretical_stock: i32, actual_stock: i32) -> Result<Self, StocktakingError> {
        if theoretical_stock < 0 {
            return Err(StocktakingError::NegativeTheoretical(theoretical_stock));
        }
        if actual_stock < 0 {
            return Err(StocktakingError::NegativeActual(actual_stock));
        }
        Ok(Self {
            theoretical_stock,
            actual_stock,
            // both operands are non-negative i32, so this cannot overflow
            difference: actual_stock - theoretical_stock,
        })
    }

    #[must_use]
    pub const fn kind(&self) -> DiscrepancyKind {
        match self.difference {
            0 => DiscrepancyKind::Match,
            d if d < 0 => DiscrepancyKind::Shortage,
            _ => DiscrepancyKind::Surplus,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shortage() {
        let d = Discrepancy::between(50, 42).unwrap();
        assert_eq!(d.difference, -8);
        assert_eq!(d.kind(), DiscrepancyKind::Shortage);
    }

    #[test]
    fn test_surplus_and_match() {
        assert_eq!(Discrepancy::between(10, 12).unwrap().kind(), DiscrepancyKind::Surplus);
        assert_eq!(Discrepancy::between(7, 7).unwrap().kind(), DiscrepancyKind::Match);
    }

    #[test]
    fn test_extremes_do_not_overflow() {
        assert_eq!(Discrepancy::between(i32::MAX, 0).unwrap().difference, -i32::MAX);
        assert_eq!(Discrepancy::between(0, i32::MAX).unwrap().difference, i32::MAX);
    }

    #[test]
    fn test_negative_rejected() {
        assert_eq!(
            Discrepancy::between(-1, 0),
            Err(StocktakingError::NegativeTheoretical(-1))
        );
        assert_eq!(
            Discrepancy::between(0, -3),
            Err(StocktakingError::NegativeActual(-3))
        );
    }
}
