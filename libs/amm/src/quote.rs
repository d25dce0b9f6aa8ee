//! Swap quotes produced by the engine

use crate::cpmm_math::CpmmMath;
use crate::error::Result;
use crate::pool::SwapDirection;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Price impact above which a swap is flagged as high impact (percent)
pub const DEFAULT_HIGH_IMPACT_THRESHOLD_PCT: Decimal = dec!(5);

/// Result of pricing a swap against a pool, without committing it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapQuote {
    pub direction: SwapDirection,
    /// Amount paid, fee included
    pub input_amount: Decimal,
    pub output_amount: Decimal,
    /// Signed percentage; positive means worse than spot
    pub price_impact: Decimal,
    /// Output units received per input unit
    pub execution_price: Decimal,
    /// Fee in input-token units
    pub fee_paid: Decimal,
    /// `(reserve_x, reserve_y)` the quote was priced against
    pub quoted_reserves: (Decimal, Decimal),
}

impl SwapQuote {
    /// Whether the price impact exceeds `threshold_pct`
    pub fn is_high_impact(&self, threshold_pct: Decimal) -> bool {
        self.price_impact > threshold_pct
    }

    /// Spot price the quote was measured against (output per input)
    pub fn spot_price(&self) -> Result<Decimal> {
        let (reserve_x, reserve_y) = self.quoted_reserves;
        match self.direction {
            SwapDirection::XToY => CpmmMath::checked_ratio(reserve_y, reserve_x, "spot price"),
            SwapDirection::YToX => CpmmMath::checked_ratio(reserve_x, reserve_y, "spot price"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AmmError;

    fn quote_with_impact(price_impact: Decimal) -> SwapQuote {
        SwapQuote {
            direction: SwapDirection::XToY,
            input_amount: dec!(1),
            output_amount: dec!(1),
            price_impact,
            execution_price: dec!(1),
            fee_paid: dec!(0),
            quoted_reserves: (dec!(100), dec!(400)),
        }
    }

    #[test]
    fn test_high_impact_threshold_is_exclusive() {
        assert!(!quote_with_impact(dec!(5)).is_high_impact(DEFAULT_HIGH_IMPACT_THRESHOLD_PCT));
        assert!(quote_with_impact(dec!(5.01)).is_high_impact(DEFAULT_HIGH_IMPACT_THRESHOLD_PCT));
        assert!(!quote_with_impact(dec!(0.3)).is_high_impact(DEFAULT_HIGH_IMPACT_THRESHOLD_PCT));
    }

    #[test]
    fn test_spot_price_follows_direction() {
        let mut quote = quote_with_impact(dec!(0));
        assert_eq!(quote.spot_price().unwrap(), dec!(4));

        quote.direction = SwapDirection::YToX;
        assert_eq!(quote.spot_price().unwrap(), dec!(0.25));
    }

    #[test]
    fn test_spot_price_reports_overflow() {
        let mut quote = quote_with_impact(dec!(0));
        quote.quoted_reserves = (Decimal::new(1, 10), dec!(100000000000000000000));

        assert!(matches!(quote.spot_price(), Err(AmmError::Overflow { .. })));
        // Zero reserves from a hand-built quote do not panic either
        quote.quoted_reserves = (Decimal::ZERO, dec!(1));
        assert!(quote.spot_price().is_err());
    }
}
