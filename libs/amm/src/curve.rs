//! Lazy sampling of the `x * y = k` curve around the current reserves
//!
//! Samples cover `[0.5 * reserve_x, 1.5 * reserve_x]` with even spacing.
//! The sampler holds no reference to the pool, so it can be cloned,
//! restarted and sent across threads freely.

use crate::error::{AmmError, Result};
use crate::pool::Pool;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Points drawn by default: 40 intervals across the window
pub const DEFAULT_CURVE_POINTS: usize = 41;

/// Upper bound on points per sampler
pub const MAX_CURVE_POINTS: usize = 10_000;

/// One `(x, y)` pair on the curve, `y = k / x`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub x: Decimal,
    pub y: Decimal,
}

/// Finite, restartable iterator over curve points
#[derive(Debug, Clone)]
pub struct CurveSampler {
    k: Decimal,
    reserve_x: Decimal,
    start: Decimal,
    width: Decimal,
    point_count: usize,
    index: usize,
}

impl CurveSampler {
    pub(crate) fn new(pool: &Pool, point_count: usize) -> Result<Self> {
        if point_count > MAX_CURVE_POINTS {
            return Err(AmmError::invalid_input(format!(
                "curve point count {} exceeds {}",
                point_count, MAX_CURVE_POINTS
            )));
        }
        pool.ensure_healthy()?;
        let k = pool.k()?;
        let reserve_x = pool.reserve_x();
        let start = reserve_x * dec!(0.5);

        // Dust reserves round the window start to zero
        if start <= Decimal::ZERO {
            return Err(AmmError::DegenerateReserve {
                reserves: [reserve_x, pool.reserve_y()],
            });
        }

        // Bounds every `width * i` and `start + width * i / last` computed while iterating
        let overflow = AmmError::Overflow {
            operation: "curve sampling",
        };
        reserve_x
            .checked_mul(Decimal::from(point_count))
            .ok_or_else(|| overflow.clone())?;
        start.checked_add(reserve_x).ok_or_else(|| overflow.clone())?;
        // y is largest at the window start
        k.checked_div(start).ok_or(overflow)?;

        Ok(Self {
            k,
            reserve_x,
            start,
            width: reserve_x,
            point_count,
            index: 0,
        })
    }

    /// Point at the current reserves, used as the chart marker
    pub fn current_point(&self) -> CurvePoint {
        CurvePoint {
            x: self.reserve_x,
            y: self.k / self.reserve_x,
        }
    }

    /// Rewind to the first point
    pub fn restart(&mut self) {
        self.index = 0;
    }

    pub fn point_count(&self) -> usize {
        self.point_count
    }

    fn point_at(&self, index: usize) -> CurvePoint {
        let last = self.point_count - 1;
        // Odd counts land exactly on the current reserves at the midpoint
        if last == 0 || index * 2 == last {
            return self.current_point();
        }

        let x = self.start + self.width * Decimal::from(index) / Decimal::from(last);
        CurvePoint { x, y: self.k / x }
    }
}

impl Iterator for CurveSampler {
    type Item = CurvePoint;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.point_count {
            return None;
        }
        let point = self.point_at(self.index);
        self.index += 1;
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.point_count.saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CurveSampler {}
