//! # Poolsim Simulator
//!
//! Command-line front end for the constant-product engine. Holds the live
//! pool for the duration of one invocation, renders quotes, swaps, pool
//! statistics and the sampled curve as text or JSON.

pub mod logging;
pub mod report;
pub mod session;

pub use session::{CurveView, QuoteView, Session, SwapOutcome};
