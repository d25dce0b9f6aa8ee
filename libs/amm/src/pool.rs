//! Two-token pool state and reserve snapshots
//!
//! A [`Pool`] is only ever built through validating constructors, so the
//! engine can rely on strictly positive reserves and a fee in `[0, 1)`.
//! Swaps never mutate a pool in place; they produce a new value.

use crate::cpmm_math::CpmmMath;
use crate::error::{AmmError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::Token;

/// Which side of the pool the trader pays in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SwapDirection {
    /// Pay token X, receive token Y
    XToY,
    /// Pay token Y, receive token X
    YToX,
}

impl SwapDirection {
    pub fn reverse(self) -> Self {
        match self {
            SwapDirection::XToY => SwapDirection::YToX,
            SwapDirection::YToX => SwapDirection::XToY,
        }
    }
}

impl fmt::Display for SwapDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwapDirection::XToY => f.write_str("x-to-y"),
            SwapDirection::YToX => f.write_str("y-to-x"),
        }
    }
}

impl FromStr for SwapDirection {
    type Err = AmmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x-to-y" | "xtoy" | "x2y" => Ok(SwapDirection::XToY),
            "y-to-x" | "ytox" | "y2x" => Ok(SwapDirection::YToX),
            other => Err(AmmError::invalid_input(format!(
                "unknown swap direction '{}'",
                other
            ))),
        }
    }
}

/// Reserves captured once as the impermanent-loss baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialSnapshot {
    pub reserve_x: Decimal,
    pub reserve_y: Decimal,
}

impl InitialSnapshot {
    pub fn new(reserve_x: Decimal, reserve_y: Decimal) -> Self {
        Self {
            reserve_x,
            reserve_y,
        }
    }

    /// Price of X in Y units at snapshot time
    pub fn price_x(&self) -> Result<Decimal> {
        ensure_positive_reserves(self.reserve_x, self.reserve_y)?;
        CpmmMath::checked_ratio(self.reserve_y, self.reserve_x, "snapshot price")
    }
}

/// Constant-product pool over two distinct tokens
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pool {
    token_x: Arc<Token>,
    token_y: Arc<Token>,
    reserve_x: Decimal,
    reserve_y: Decimal,
    fee: Decimal,
}

impl Pool {
    /// Build a pool
    ///
    /// # Errors
    /// * `DuplicateToken` if both sides share an id
    /// * `DegenerateReserve` if either reserve is not strictly positive
    /// * `InvalidFee` if `fee` is outside `[0, 1)`
    pub fn new(
        token_x: Arc<Token>,
        token_y: Arc<Token>,
        reserve_x: Decimal,
        reserve_y: Decimal,
        fee: Decimal,
    ) -> Result<Self> {
        if token_x.id() == token_y.id() {
            return Err(AmmError::DuplicateToken {
                id: token_x.id().to_string(),
            });
        }
        if fee < Decimal::ZERO || fee >= Decimal::ONE {
            return Err(AmmError::InvalidFee { fee });
        }
        ensure_positive_reserves(reserve_x, reserve_y)?;

        Ok(Self {
            token_x,
            token_y,
            reserve_x,
            reserve_y,
            fee,
        })
    }

    /// Build a pool with the fee given in basis points (30 = 0.3%)
    pub fn with_fee_bps(
        token_x: Arc<Token>,
        token_y: Arc<Token>,
        reserve_x: Decimal,
        reserve_y: Decimal,
        fee_bps: u32,
    ) -> Result<Self> {
        let fee = Decimal::from(fee_bps) / Decimal::from(10_000);
        Self::new(token_x, token_y, reserve_x, reserve_y, fee)
    }

    pub fn token_x(&self) -> &Arc<Token> {
        &self.token_x
    }

    pub fn token_y(&self) -> &Arc<Token> {
        &self.token_y
    }

    pub fn reserve_x(&self) -> Decimal {
        self.reserve_x
    }

    pub fn reserve_y(&self) -> Decimal {
        self.reserve_y
    }

    /// Proportional fee taken from the input side of each swap
    pub fn fee(&self) -> Decimal {
        self.fee
    }

    /// Constant product `reserve_x * reserve_y`
    pub fn k(&self) -> Result<Decimal> {
        self.reserve_x
            .checked_mul(self.reserve_y)
            .ok_or(AmmError::Overflow {
                operation: "constant product",
            })
    }

    /// `(reserve_in, reserve_out)` for a swap in `direction`
    pub fn reserves_for(&self, direction: SwapDirection) -> (Decimal, Decimal) {
        match direction {
            SwapDirection::XToY => (self.reserve_x, self.reserve_y),
            SwapDirection::YToX => (self.reserve_y, self.reserve_x),
        }
    }

    /// `(input token, output token)` for a swap in `direction`
    pub fn tokens_for(&self, direction: SwapDirection) -> (&Arc<Token>, &Arc<Token>) {
        match direction {
            SwapDirection::XToY => (&self.token_x, &self.token_y),
            SwapDirection::YToX => (&self.token_y, &self.token_x),
        }
    }

    /// Marginal rate before any trade: output units per input unit
    pub fn spot_price(&self, direction: SwapDirection) -> Result<Decimal> {
        self.ensure_healthy()?;
        let (reserve_in, reserve_out) = self.reserves_for(direction);
        CpmmMath::checked_ratio(reserve_out, reserve_in, "spot price")
    }

    /// Capture the current reserves as an impermanent-loss baseline
    pub fn snapshot(&self) -> InitialSnapshot {
        InitialSnapshot::new(self.reserve_x, self.reserve_y)
    }

    /// Same tokens and fee, reserves restored from `snapshot`
    pub fn reset_to(&self, snapshot: &InitialSnapshot) -> Result<Self> {
        self.with_reserves(snapshot.reserve_x, snapshot.reserve_y)
    }

    /// Refuse to price a pool whose reserves are not strictly positive
    pub fn ensure_healthy(&self) -> Result<()> {
        ensure_positive_reserves(self.reserve_x, self.reserve_y)
    }

    pub(crate) fn with_reserves(&self, reserve_x: Decimal, reserve_y: Decimal) -> Result<Self> {
        ensure_positive_reserves(reserve_x, reserve_y)?;
        Ok(Self {
            token_x: Arc::clone(&self.token_x),
            token_y: Arc::clone(&self.token_y),
            reserve_x,
            reserve_y,
            fee: self.fee,
        })
    }
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} [{} / {}, fee {}%]",
            self.token_x.symbol(),
            self.token_y.symbol(),
            self.reserve_x,
            self.reserve_y,
            (self.fee * Decimal::ONE_HUNDRED).normalize()
        )
    }
}

fn ensure_positive_reserves(reserve_x: Decimal, reserve_y: Decimal) -> Result<()> {
    if reserve_x <= Decimal::ZERO || reserve_y <= Decimal::ZERO {
        tracing::warn!(%reserve_x, %reserve_y, "Rejecting degenerate reserves");
        return Err(AmmError::DegenerateReserve {
            reserves: [reserve_x, reserve_y],
        });
    }
    Ok(())
}
