//! Error types for pool construction and swap pricing
//!
//! Every fallible engine operation returns [`AmmError`]. Failures are local
//! and synchronous: nothing is retried and no value is silently clamped.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by the AMM engine and pool constructors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AmmError {
    /// Swap amount is non-positive, NaN, infinite or not a number at all
    #[error("Invalid input amount: {reason}")]
    InvalidInput { reason: String },

    /// A reserve is zero or negative, so prices are undefined
    ///
    /// Reserves are reported in the order the failing operation saw them:
    /// `[x, y]` for pool and snapshot checks, `[in, out]` for swap math.
    #[error("Degenerate reserves: {reserves:?}")]
    DegenerateReserve { reserves: [Decimal; 2] },

    /// Pool fee outside of [0, 1)
    #[error("Invalid fee {fee}: must be in [0, 1)")]
    InvalidFee { fee: Decimal },

    /// Token reference price below zero
    #[error("Invalid USD price {price} for token {symbol}")]
    InvalidPrice { symbol: String, price: Decimal },

    /// Both sides of the pool reference the same token
    #[error("Pool sides must be distinct tokens, got '{id}' twice")]
    DuplicateToken { id: String },

    /// Quote was priced against reserves that are no longer current
    #[error("Stale quote: priced against ({quoted_x}, {quoted_y}), pool is at ({current_x}, {current_y})")]
    StaleQuote {
        quoted_x: Decimal,
        quoted_y: Decimal,
        current_x: Decimal,
        current_y: Decimal,
    },

    /// Intermediate value exceeds the decimal range
    #[error("Arithmetic overflow in {operation}")]
    Overflow { operation: &'static str },
}

impl AmmError {
    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AmmError>;
