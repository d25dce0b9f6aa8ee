//! Constant-product AMM math with exact decimal calculations
//!
//! Implements the fee-on-input `x * y = k` model. Fees are kept in the pool
//! rather than reinjected into the invariant, so `k` grows with every
//! swap when the fee is non-zero.

use crate::error::{AmmError, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Constant-product math functions, direction agnostic
///
/// All functions take `(reserve_in, reserve_out)`; callers map pool sides
/// onto them.
pub struct CpmmMath;

impl CpmmMath {
    /// Input remaining after the fee is deducted: `amount_in * (1 - fee)`
    pub fn effective_input(amount_in: Decimal, fee: Decimal) -> Result<Decimal> {
        amount_in
            .checked_mul(Decimal::ONE - fee)
            .ok_or(AmmError::Overflow {
                operation: "fee deduction",
            })
    }

    /// Calculate exact output amount using the x*y=k formula
    ///
    /// # Arguments
    /// * `amount_in` - Input token amount, fee included
    /// * `reserve_in` - Input token reserve
    /// * `reserve_out` - Output token reserve
    /// * `fee` - Proportional fee (0.003 = 0.3%)
    ///
    /// # Returns
    /// Output amount after fee and slippage, always below `reserve_out`
    pub fn calculate_output_amount(
        amount_in: Decimal,
        reserve_in: Decimal,
        reserve_out: Decimal,
        fee: Decimal,
    ) -> Result<Decimal> {
        if amount_in <= Decimal::ZERO {
            return Err(AmmError::invalid_input(format!(
                "amount must be positive, got {}",
                amount_in
            )));
        }
        if reserve_in <= Decimal::ZERO || reserve_out <= Decimal::ZERO {
            return Err(AmmError::DegenerateReserve {
                reserves: [reserve_in, reserve_out],
            });
        }

        let amount_in_after_fee = Self::effective_input(amount_in, fee)?;

        // (x + dx) * (y - dy) = x * y  =>  dy = y * dx / (x + dx)
        // Evaluated as y * (dx / (x + dx)) so the share stays in [0, 1)
        // and huge inputs never overflow the numerator.
        let denominator = reserve_in
            .checked_add(amount_in_after_fee)
            .ok_or(AmmError::Overflow {
                operation: "reserve plus input",
            })?;
        let share = amount_in_after_fee / denominator;
        let amount_out = reserve_out * share;

        if amount_out >= reserve_out {
            return Err(AmmError::invalid_input(format!(
                "amount {} too large to price against reserve {}",
                amount_in, reserve_in
            )));
        }

        Ok(amount_out)
    }

    /// Price impact of a trade as a signed percentage
    ///
    /// `(1 - execution_price / spot_price) * 100`; positive means the
    /// trader got a worse rate than spot.
    pub fn calculate_price_impact(
        amount_in: Decimal,
        amount_out: Decimal,
        reserve_in: Decimal,
        reserve_out: Decimal,
    ) -> Result<Decimal> {
        if amount_in <= Decimal::ZERO || reserve_in <= Decimal::ZERO || reserve_out <= Decimal::ZERO
        {
            return Err(AmmError::invalid_input(
                "invalid inputs for price impact calculation",
            ));
        }

        let spot_price = Self::checked_ratio(reserve_out, reserve_in, "spot price")?;
        let execution_price = Self::checked_ratio(amount_out, amount_in, "execution price")?;
        let relative = Self::checked_ratio(execution_price, spot_price, "price impact")?;

        (Decimal::ONE - relative)
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or(AmmError::Overflow {
                operation: "price impact",
            })
    }

    /// Impermanent loss as a percentage for a price ratio `current / initial`
    ///
    /// `(2 * sqrt(r) / (1 + r) - 1) * 100`, zero at `r == 1`, negative
    /// otherwise.
    pub fn impermanent_loss(price_ratio: Decimal) -> Result<Decimal> {
        if price_ratio <= Decimal::ZERO {
            return Err(AmmError::invalid_input(format!(
                "price ratio must be positive, got {}",
                price_ratio
            )));
        }

        let sqrt_ratio = Self::decimal_sqrt(price_ratio)?;
        let denominator = Decimal::ONE
            .checked_add(price_ratio)
            .ok_or(AmmError::Overflow {
                operation: "impermanent loss",
            })?;
        let il = dec!(2) * sqrt_ratio / denominator - Decimal::ONE;

        Ok(il * Decimal::ONE_HUNDRED)
    }

    /// Square root by Newton iteration, stopping at a relative step of 1e-21
    pub fn decimal_sqrt(value: Decimal) -> Result<Decimal> {
        if value < Decimal::ZERO {
            return Err(AmmError::invalid_input(
                "cannot calculate square root of negative number",
            ));
        }
        if value == Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }

        // Start from a value >= sqrt(value) so iterates decrease monotonically
        let mut x = value.max(Decimal::ONE);
        let epsilon = dec!(0.000000000000000000001); // Relative precision threshold

        let max_iterations = 200;
        for _ in 0..max_iterations {
            // Halves summed separately; `value / x <= x` keeps both in range
            let next_x = x / dec!(2) + value / x / dec!(2);

            if (next_x - x).abs() <= epsilon * next_x {
                return Ok(next_x);
            }

            x = next_x;
        }

        // Return best approximation if not fully converged
        Ok(x)
    }

    /// `numerator / denominator`, or `Overflow` outside the decimal range
    pub(crate) fn checked_ratio(
        numerator: Decimal,
        denominator: Decimal,
        operation: &'static str,
    ) -> Result<Decimal> {
        numerator
            .checked_div(denominator)
            .ok_or(AmmError::Overflow { operation })
    }
}
