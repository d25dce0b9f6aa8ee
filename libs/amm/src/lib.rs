//! # Poolsim AMM Library - Constant-Product Pricing Engine
//!
//! ## Purpose
//!
//! Deterministic pricing for a single two-token constant-product pool
//! (`x * y = k`, fee on input). Quotes swaps, commits them into new pool
//! states, derives TVL, prices and impermanent loss against an initial
//! snapshot, and samples the invariant curve for charting.
//!
//! ## Integration Points
//!
//! - **Input Sources**: a validated [`Pool`] owned by the caller, user amounts
//!   parsed through [`parse_amount`] or [`amount_from_f64`]
//! - **Output Destinations**: presentation layers (the `poolsim` CLI),
//!   simulations replaying sequences of swaps
//! - **Precision**: `Decimal` throughout (28 significant digits, no NaN)
//!
//! ## Architecture Role
//!
//! ```text
//! caller ──quote_swap──▶ SwapQuote ──apply_quote──▶ Pool'
//!    │                                               │
//!    └──compute_stats(pool, snapshot)◀───────────────┘
//!    └──sample_curve(pool, n)──▶ CurveSampler (lazy)
//! ```
//!
//! The engine keeps no state between calls. Pools are values; every
//! committed swap produces a new one.
//!
//! ## Example
//!
//! ```rust
//! use poolsim_amm::{dec, AmmEngine, Pool, SwapDirection, Token};
//!
//! let eth = Token::shared("eth", "ETH", "Ethereum", dec!(2500)).unwrap();
//! let usdc = Token::shared("usdc", "USDC", "USD Coin", dec!(1)).unwrap();
//! let pool = Pool::new(eth, usdc, dec!(1000), dec!(2500000), dec!(0.003)).unwrap();
//! let snapshot = pool.snapshot();
//!
//! let quote = AmmEngine::quote_swap(&pool, dec!(10), SwapDirection::XToY).unwrap();
//! let next = AmmEngine::apply_quote(&pool, &quote).unwrap();
//! let stats = AmmEngine::compute_stats(&next, &snapshot).unwrap();
//!
//! assert!(next.k().unwrap() > pool.k().unwrap());
//! assert!(stats.impermanent_loss < dec!(0));
//! ```

pub mod cpmm_math;
pub mod curve;
pub mod engine;
pub mod error;
pub mod pool;
pub mod quote;
pub mod stats;
pub mod token;

pub use cpmm_math::CpmmMath;
pub use curve::{CurvePoint, CurveSampler, DEFAULT_CURVE_POINTS, MAX_CURVE_POINTS};
pub use engine::{amount_from_f64, parse_amount, AmmEngine};
pub use error::{AmmError, Result};
pub use pool::{InitialSnapshot, Pool, SwapDirection};
pub use quote::{SwapQuote, DEFAULT_HIGH_IMPACT_THRESHOLD_PCT};
pub use stats::LiquidityStats;
pub use token::Token;

/// Common types for AMM calculations
pub use rust_decimal::Decimal;
pub use rust_decimal_macros::dec;
