//! Simulation session: the live pool plus its reset baseline
//!
//! The session owns the only mutable pool state. Each committed swap
//! replaces the pool with the engine's result before the next quote is
//! taken, so swaps are applied strictly one after another.

use amm::{
    parse_amount, AmmEngine, CurvePoint, Decimal, InitialSnapshot, LiquidityStats, Pool,
    SwapDirection, SwapQuote,
};
use anyhow::{bail, Context, Result};
use config::{defaults, SimulatorConfig};
use serde::Serialize;
use tracing::{info, warn};

/// A quote together with its risk classification
#[derive(Debug, Clone, Serialize)]
pub struct QuoteView {
    pub pay_symbol: String,
    pub receive_symbol: String,
    pub quote: SwapQuote,
    pub high_impact: bool,
}

/// Outcome of a committed swap
#[derive(Debug, Clone, Serialize)]
pub struct SwapOutcome {
    pub executed: QuoteView,
    pub reserve_x: Decimal,
    pub reserve_y: Decimal,
}

/// Sampled curve with the current-reserve marker
#[derive(Debug, Clone, Serialize)]
pub struct CurveView {
    pub k: Decimal,
    pub current: CurvePoint,
    pub points: Vec<CurvePoint>,
}

#[derive(Debug, Clone)]
pub struct Session {
    pool: Pool,
    snapshot: InitialSnapshot,
    high_impact_threshold_pct: Decimal,
    curve_points: usize,
}

impl Session {
    pub fn new(pool: Pool, high_impact_threshold_pct: Decimal, curve_points: usize) -> Self {
        let snapshot = pool.snapshot();
        Self {
            pool,
            snapshot,
            high_impact_threshold_pct,
            curve_points,
        }
    }

    /// Build a session from the configured starting pool
    pub fn from_config(config: &SimulatorConfig) -> Result<Self> {
        let pool = config.build_pool()?;
        Ok(Self::new(
            pool,
            config.simulation.high_impact_threshold_pct,
            config.simulation.curve_points,
        ))
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn snapshot(&self) -> &InitialSnapshot {
        &self.snapshot
    }

    /// Price a user-entered amount without committing
    pub fn quote(&self, amount: &str, direction: SwapDirection) -> Result<QuoteView> {
        let amount = parse_amount(amount)?;
        let quote = AmmEngine::quote_swap(&self.pool, amount, direction)?;
        Ok(self.view(quote))
    }

    /// Quote and commit, advancing the live pool
    pub fn swap(&mut self, amount: &str, direction: SwapDirection) -> Result<SwapOutcome> {
        let view = self.quote(amount, direction)?;
        if view.high_impact {
            warn!(
                impact_pct = %view.quote.price_impact,
                threshold_pct = %self.high_impact_threshold_pct,
                "Executing high price impact swap"
            );
        }

        self.pool = AmmEngine::apply_quote(&self.pool, &view.quote)
            .with_context(|| format!("Failed to apply {} swap of {}", direction, amount))?;
        info!(pool = %self.pool, "Swap committed");

        Ok(SwapOutcome {
            executed: view,
            reserve_x: self.pool.reserve_x(),
            reserve_y: self.pool.reserve_y(),
        })
    }

    pub fn stats(&self) -> Result<LiquidityStats> {
        Ok(AmmEngine::compute_stats(&self.pool, &self.snapshot)?)
    }

    /// Sample the curve; `None` uses the configured point count
    pub fn curve(&self, points: Option<usize>) -> Result<CurveView> {
        let points = points.unwrap_or(self.curve_points);
        if points > defaults::simulation::MAX_CURVE_POINTS {
            bail!(
                "Curve point count must be at most {}, got {}",
                defaults::simulation::MAX_CURVE_POINTS,
                points
            );
        }
        let sampler = AmmEngine::sample_curve(&self.pool, points)
            .with_context(|| format!("Failed to sample {} curve points", points))?;
        Ok(CurveView {
            k: self.pool.k()?,
            current: sampler.current_point(),
            points: sampler.collect(),
        })
    }

    /// Restore the pool to the baseline reserves
    pub fn reset(&mut self) -> Result<()> {
        self.pool = self.pool.reset_to(&self.snapshot)?;
        info!(pool = %self.pool, "Simulation reset");
        Ok(())
    }

    fn view(&self, quote: SwapQuote) -> QuoteView {
        let (pay, receive) = self.pool.tokens_for(quote.direction);
        QuoteView {
            pay_symbol: pay.symbol().to_string(),
            receive_symbol: receive.symbol().to_string(),
            high_impact: quote.is_high_impact(self.high_impact_threshold_pct),
            quote,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn session() -> Session {
        Session::from_config(&SimulatorConfig::default()).unwrap()
    }

    #[test]
    fn test_quote_does_not_move_pool() {
        let session = session();
        let view = session.quote("10", SwapDirection::XToY).unwrap();

        assert_eq!(view.pay_symbol, "ETH");
        assert_eq!(view.receive_symbol, "USDC");
        assert!(!view.high_impact);
        assert_eq!(session.pool().reserve_x(), dec!(1000));
    }

    #[test]
    fn test_swaps_chain_and_reset() {
        let mut session = session();
        let first = session.swap("10", SwapDirection::XToY).unwrap();
        assert_eq!(first.reserve_x, dec!(1010));

        let second = session.swap("1000", SwapDirection::YToX).unwrap();
        assert_eq!(second.reserve_y, first.reserve_y + dec!(1000));
        assert!(session.stats().unwrap().impermanent_loss < Decimal::ZERO);

        session.reset().unwrap();
        assert_eq!(session.pool().reserve_x(), dec!(1000));
        assert_eq!(session.stats().unwrap().impermanent_loss, Decimal::ZERO);
    }

    #[test]
    fn test_large_swap_flagged() {
        let session = session();
        let view = session.quote("100", SwapDirection::XToY).unwrap();
        assert!(view.high_impact);
    }

    #[test]
    fn test_invalid_text_rejected() {
        let mut session = session();
        assert!(session.quote("", SwapDirection::XToY).is_err());
        assert!(session.swap("-3", SwapDirection::XToY).is_err());
        assert!(session.quote("ten", SwapDirection::YToX).is_err());
        assert_eq!(session.pool().reserve_x(), dec!(1000));
    }

    #[test]
    fn test_curve_uses_configured_density() {
        let session = session();
        let curve = session.curve(None).unwrap();
        assert_eq!(curve.points.len(), 41);
        assert_eq!(curve.points[20], curve.current);
        assert_eq!(curve.k, dec!(2500000000));

        assert_eq!(session.curve(Some(5)).unwrap().points.len(), 5);
    }

    #[test]
    fn test_curve_point_override_is_bounded() {
        let session = session();
        let err = session.curve(Some(usize::MAX)).unwrap_err();
        assert!(err.to_string().contains("at most 10000"));

        assert!(session.curve(Some(10_001)).is_err());
        assert_eq!(session.curve(Some(10_000)).unwrap().points.len(), 10_000);
    }

    #[test]
    fn test_reset_restores_snapshot() {
        let mut session = session();
        let baseline = *session.snapshot();
        session.swap("250", SwapDirection::XToY).unwrap();
        assert_ne!(session.pool().reserve_x(), baseline.reserve_x);

        session.reset().unwrap();
        assert_eq!(session.pool().reserve_x(), baseline.reserve_x);
        assert_eq!(session.pool().reserve_y(), baseline.reserve_y);
    }
}
