//! Aggregate pool statistics

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Derived view of a pool against its initial snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityStats {
    /// Total value locked in USD
    pub tvl: Decimal,
    /// Units of Y per unit of X
    pub price_x: Decimal,
    /// Units of X per unit of Y
    pub price_y: Decimal,
    /// Percentage versus holding the snapshot reserves, <= 0
    pub impermanent_loss: Decimal,
}
