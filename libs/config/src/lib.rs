//! # Poolsim Configuration
//!
//! This crate provides configuration management and defaults for the
//! pool simulator.
//!
//! ## Features
//!
//! - **Token Catalog**: ETH, USDC, WBTC and SOL with USD reference prices
//! - **Starting Pool**: 1000 ETH / 2.5M USDC at a 0.3% fee
//! - **Simulation Settings**: curve sampling density, high-impact threshold
//!
//! ## Usage
//!
//! ```rust
//! use poolsim_config::SimulatorConfig;
//!
//! let config = SimulatorConfig::default();
//! let pool = config.build_pool().unwrap();
//! assert_eq!(pool.token_x().symbol(), "ETH");
//! ```

pub mod defaults;
pub mod simulator_config;

// Re-export commonly used types
pub use simulator_config::{
    load_config, resolve_config_path, LoggingConfig, PoolConfig, SimulationSettings,
    SimulatorConfig, TokenConfig,
};
