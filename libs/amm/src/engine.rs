//! Stateless pricing engine over [`Pool`] values
//!
//! Every operation takes an immutable pool and returns new values, so the
//! engine can be called from any number of threads against independent
//! pools. Callers sharing one live pool must serialise commits themselves;
//! [`AmmEngine::apply_quote`] reports quotes that went stale in between.

use crate::cpmm_math::CpmmMath;
use crate::curve::CurveSampler;
use crate::error::{AmmError, Result};
use crate::pool::{InitialSnapshot, Pool, SwapDirection};
use crate::quote::SwapQuote;
use crate::stats::LiquidityStats;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

/// Constant-product pricing engine
pub struct AmmEngine;

impl AmmEngine {
    /// Price a swap without committing it
    ///
    /// # Errors
    /// * `InvalidInput` if `input_amount` is not strictly positive
    /// * `DegenerateReserve` if the pool has a non-positive reserve
    /// * `Overflow` if a price leaves the decimal range
    pub fn quote_swap(
        pool: &Pool,
        input_amount: Decimal,
        direction: SwapDirection,
    ) -> Result<SwapQuote> {
        if input_amount <= Decimal::ZERO {
            return Err(AmmError::invalid_input(format!(
                "amount must be positive, got {}",
                input_amount
            )));
        }
        pool.ensure_healthy()?;

        let (reserve_in, reserve_out) = pool.reserves_for(direction);
        let output_amount =
            CpmmMath::calculate_output_amount(input_amount, reserve_in, reserve_out, pool.fee())?;
        let price_impact =
            CpmmMath::calculate_price_impact(input_amount, output_amount, reserve_in, reserve_out)?;

        let execution_price =
            output_amount
                .checked_div(input_amount)
                .ok_or(AmmError::Overflow {
                    operation: "execution price",
                })?;

        let quote = SwapQuote {
            direction,
            input_amount,
            output_amount,
            price_impact,
            execution_price,
            fee_paid: input_amount * pool.fee(),
            quoted_reserves: (pool.reserve_x(), pool.reserve_y()),
        };

        debug!(
            %direction,
            input = %quote.input_amount,
            output = %quote.output_amount,
            impact_pct = %quote.price_impact,
            "Quoted swap"
        );

        Ok(quote)
    }

    /// [`AmmEngine::quote_swap`] for floating-point input, rejecting NaN and infinities
    pub fn quote_swap_f64(
        pool: &Pool,
        input_amount: f64,
        direction: SwapDirection,
    ) -> Result<SwapQuote> {
        Self::quote_swap(pool, amount_from_f64(input_amount)?, direction)
    }

    /// Quote and commit a swap, returning the next pool state
    ///
    /// The input reserve grows by the full input (fee included), the
    /// output reserve shrinks by the quoted output. `pool` is untouched.
    pub fn execute_swap(
        pool: &Pool,
        input_amount: Decimal,
        direction: SwapDirection,
    ) -> Result<Pool> {
        let quote = Self::quote_swap(pool, input_amount, direction)?;
        Self::apply_quote(pool, &quote)
    }

    /// Commit a previously computed quote
    ///
    /// # Errors
    /// * `StaleQuote` if the pool moved since the quote was priced
    pub fn apply_quote(pool: &Pool, quote: &SwapQuote) -> Result<Pool> {
        let (quoted_x, quoted_y) = quote.quoted_reserves;
        if quoted_x != pool.reserve_x() || quoted_y != pool.reserve_y() {
            return Err(AmmError::StaleQuote {
                quoted_x,
                quoted_y,
                current_x: pool.reserve_x(),
                current_y: pool.reserve_y(),
            });
        }

        let (reserve_in, reserve_out) = pool.reserves_for(quote.direction);
        let new_reserve_in =
            reserve_in
                .checked_add(quote.input_amount)
                .ok_or(AmmError::Overflow {
                    operation: "reserve update",
                })?;
        let new_reserve_out = reserve_out - quote.output_amount;

        let next = match quote.direction {
            SwapDirection::XToY => pool.with_reserves(new_reserve_in, new_reserve_out)?,
            SwapDirection::YToX => pool.with_reserves(new_reserve_out, new_reserve_in)?,
        };

        debug!(
            direction = %quote.direction,
            reserve_x = %next.reserve_x(),
            reserve_y = %next.reserve_y(),
            "Executed swap"
        );

        Ok(next)
    }

    /// TVL, prices and impermanent loss against `snapshot`
    ///
    /// Reserve ratios too extreme for a decimal price yield `Overflow`.
    pub fn compute_stats(pool: &Pool, snapshot: &InitialSnapshot) -> Result<LiquidityStats> {
        let price_x = pool.spot_price(SwapDirection::XToY)?;
        let price_y = Decimal::ONE
            .checked_div(price_x)
            .ok_or(AmmError::Overflow {
                operation: "reciprocal price",
            })?;

        let value_x = pool
            .reserve_x()
            .checked_mul(pool.token_x().price_usd())
            .ok_or(AmmError::Overflow { operation: "tvl" })?;
        let value_y = pool
            .reserve_y()
            .checked_mul(pool.token_y().price_usd())
            .ok_or(AmmError::Overflow { operation: "tvl" })?;
        let tvl = value_x
            .checked_add(value_y)
            .ok_or(AmmError::Overflow { operation: "tvl" })?;

        let initial_price_x = snapshot.price_x()?;
        let price_ratio = price_x
            .checked_div(initial_price_x)
            .ok_or(AmmError::Overflow {
                operation: "price ratio",
            })?;
        let impermanent_loss = CpmmMath::impermanent_loss(price_ratio)?;

        Ok(LiquidityStats {
            tvl,
            price_x,
            price_y,
            impermanent_loss,
        })
    }

    /// Lazily sample `point_count` points of the pool's curve
    pub fn sample_curve(pool: &Pool, point_count: usize) -> Result<CurveSampler> {
        CurveSampler::new(pool, point_count)
    }
}

/// Convert a float amount, rejecting NaN, infinities and non-positive values
pub fn amount_from_f64(value: f64) -> Result<Decimal> {
    if !value.is_finite() {
        return Err(AmmError::invalid_input(format!(
            "amount must be finite, got {}",
            value
        )));
    }
    if value <= 0.0 {
        return Err(AmmError::invalid_input(format!(
            "amount must be positive, got {}",
            value
        )));
    }
    Decimal::from_f64(value).ok_or_else(|| {
        AmmError::invalid_input(format!("amount {} is outside the decimal range", value))
    })
}

/// Parse a user-entered amount such as `"10"`, `"0.25"` or `"1e3"`
pub fn parse_amount(text: &str) -> Result<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AmmError::invalid_input("amount is empty"));
    }

    let amount = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| AmmError::invalid_input(format!("'{}' is not a number", trimmed)))?;

    if amount <= Decimal::ZERO {
        return Err(AmmError::invalid_input(format!(
            "amount must be positive, got {}",
            amount
        )));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Token;
    use rust_decimal_macros::dec;

    fn eth_usdc_pool(fee: Decimal) -> Pool {
        Pool::new(
            Token::shared("eth", "ETH", "Ethereum", dec!(2500)).unwrap(),
            Token::shared("usdc", "USDC", "USD Coin", dec!(1)).unwrap(),
            dec!(1000),
            dec!(2500000),
            fee,
        )
        .unwrap()
    }

    #[test]
    fn test_reference_quote() {
        let pool = eth_usdc_pool(dec!(0.003));
        let quote = AmmEngine::quote_swap(&pool, dec!(10), SwapDirection::XToY).unwrap();

        let dx_effective = CpmmMath::effective_input(dec!(10), pool.fee()).unwrap();
        assert_eq!(dx_effective, dec!(9.97));

        let expected = dec!(2500000) * dec!(9.97) / dec!(1009.97);
        assert!((quote.output_amount - expected).abs() < dec!(0.0000000001));
        assert!(quote.output_amount > dec!(24678.95) && quote.output_amount < dec!(24678.96));
        assert_eq!(quote.fee_paid, dec!(0.03));
        // 0.3% fee plus ~0.99% curve slippage
        assert!(quote.price_impact > dec!(1.2841));
        assert!(quote.price_impact < dec!(1.2842));
        assert_eq!(quote.execution_price, quote.output_amount / dec!(10));
        assert_eq!(quote.quoted_reserves, (dec!(1000), dec!(2500000)));
    }

    #[test]
    fn test_reverse_direction_mirrors() {
        let pool = eth_usdc_pool(dec!(0.003));
        let quote = AmmEngine::quote_swap(&pool, dec!(25000), SwapDirection::YToX).unwrap();

        let expected = dec!(1000) * dec!(24925) / dec!(2524925);
        assert!((quote.output_amount - expected).abs() < dec!(0.0000000001));
        assert_eq!(quote.fee_paid, dec!(75));
        assert!(quote.output_amount < dec!(25000) * quote.spot_price().unwrap());
    }

    #[test]
    fn test_rejects_invalid_amounts() {
        let pool = eth_usdc_pool(dec!(0.003));

        assert!(matches!(
            AmmEngine::quote_swap(&pool, dec!(-5), SwapDirection::XToY),
            Err(AmmError::InvalidInput { .. })
        ));
        assert!(matches!(
            AmmEngine::quote_swap(&pool, Decimal::ZERO, SwapDirection::XToY),
            Err(AmmError::InvalidInput { .. })
        ));
        assert!(matches!(
            AmmEngine::quote_swap_f64(&pool, f64::NAN, SwapDirection::XToY),
            Err(AmmError::InvalidInput { .. })
        ));
        assert!(matches!(
            AmmEngine::quote_swap_f64(&pool, f64::INFINITY, SwapDirection::XToY),
            Err(AmmError::InvalidInput { .. })
        ));
        assert!(matches!(
            AmmEngine::execute_swap(&pool, dec!(-5), SwapDirection::YToX),
            Err(AmmError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_execute_moves_reserves() {
        let pool = eth_usdc_pool(dec!(0.003));
        let quote = AmmEngine::quote_swap(&pool, dec!(10), SwapDirection::XToY).unwrap();
        let next = AmmEngine::execute_swap(&pool, dec!(10), SwapDirection::XToY).unwrap();

        assert_eq!(next.reserve_x(), dec!(1010));
        assert_eq!(next.reserve_y(), dec!(2500000) - quote.output_amount);
        assert!(next.k().unwrap() > pool.k().unwrap());
        // Original value untouched
        assert_eq!(pool.reserve_x(), dec!(1000));
    }

    #[test]
    fn test_zero_fee_preserves_k() {
        let pool = eth_usdc_pool(Decimal::ZERO);
        let next = AmmEngine::execute_swap(&pool, dec!(123.456), SwapDirection::YToX).unwrap();

        let k_before = pool.k().unwrap();
        let relative = (next.k().unwrap() - k_before).abs() / k_before;
        assert!(relative < dec!(0.000000001));
    }

    #[test]
    fn test_stale_quote_rejected() {
        let pool = eth_usdc_pool(dec!(0.003));
        let first = AmmEngine::quote_swap(&pool, dec!(5), SwapDirection::XToY).unwrap();
        let second = AmmEngine::quote_swap(&pool, dec!(7), SwapDirection::XToY).unwrap();

        let next = AmmEngine::apply_quote(&pool, &first).unwrap();
        assert!(matches!(
            AmmEngine::apply_quote(&next, &second),
            Err(AmmError::StaleQuote { .. })
        ));
    }

    #[test]
    fn test_stats_for_fresh_pool() {
        let pool = eth_usdc_pool(dec!(0.003));
        let stats = AmmEngine::compute_stats(&pool, &pool.snapshot()).unwrap();

        assert_eq!(stats.tvl, dec!(5000000));
        assert_eq!(stats.price_x, dec!(2500));
        assert_eq!(stats.price_y, dec!(0.0004));
        assert_eq!(stats.impermanent_loss, Decimal::ZERO);
    }

    #[test]
    fn test_price_doubling_impermanent_loss() {
        let pool = eth_usdc_pool(dec!(0.003));
        let snapshot = pool.snapshot();
        let doubled = pool.with_reserves(dec!(1000), dec!(5000000)).unwrap();

        let stats = AmmEngine::compute_stats(&doubled, &snapshot).unwrap();
        // (2 * sqrt(2) / 3 - 1) * 100
        assert!((stats.impermanent_loss - dec!(-5.719095841793)).abs() < dec!(0.000001));
    }

    #[test]
    fn test_stats_reject_degenerate_snapshot() {
        let pool = eth_usdc_pool(dec!(0.003));
        let snapshot = InitialSnapshot::new(Decimal::ZERO, dec!(10));

        assert!(matches!(
            AmmEngine::compute_stats(&pool, &snapshot),
            Err(AmmError::DegenerateReserve { .. })
        ));
    }

    #[test]
    fn test_extreme_reserve_ratio_reports_overflow() {
        let skewed = Pool::new(
            Token::shared("dust", "DUST", "Dust", dec!(1)).unwrap(),
            Token::shared("usdc", "USDC", "USD Coin", dec!(1)).unwrap(),
            Decimal::new(1, 10),
            dec!(100000000000000000000),
            dec!(0.003),
        )
        .unwrap();

        assert!(matches!(
            AmmEngine::compute_stats(&skewed, &skewed.snapshot()),
            Err(AmmError::Overflow { .. })
        ));
        assert!(matches!(
            AmmEngine::quote_swap(&skewed, dec!(1), SwapDirection::XToY),
            Err(AmmError::Overflow { .. })
        ));
        assert!(matches!(
            skewed.spot_price(SwapDirection::XToY),
            Err(AmmError::Overflow { .. })
        ));
    }

    #[test]
    fn test_stats_against_extreme_snapshot() {
        let pool = eth_usdc_pool(dec!(0.003));
        let snapshot = InitialSnapshot::new(Decimal::new(1, 10), dec!(100000000000000000000));

        assert!(matches!(
            AmmEngine::compute_stats(&pool, &snapshot),
            Err(AmmError::Overflow { .. })
        ));
    }

    #[test]
    fn test_curve_for_dust_reserve_is_rejected() {
        let dust = Pool::new(
            Token::shared("dust", "DUST", "Dust", dec!(1)).unwrap(),
            Token::shared("usdc", "USDC", "USD Coin", dec!(1)).unwrap(),
            Decimal::new(1, 28),
            dec!(1),
            dec!(0.003),
        )
        .unwrap();

        assert!(AmmEngine::sample_curve(&dust, 3).is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" 10 ").unwrap(), dec!(10));
        assert_eq!(parse_amount("0.25").unwrap(), dec!(0.25));
        assert_eq!(parse_amount("1e3").unwrap(), dec!(1000));
        assert!(parse_amount("").is_err());
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("-1").is_err());
        assert!(parse_amount("0").is_err());
    }

    #[test]
    fn test_amount_from_f64() {
        assert_eq!(amount_from_f64(2.5).unwrap(), dec!(2.5));
        assert!(amount_from_f64(f64::NEG_INFINITY).is_err());
        assert!(amount_from_f64(-0.1).is_err());
        assert!(amount_from_f64(0.0).is_err());
    }
}
