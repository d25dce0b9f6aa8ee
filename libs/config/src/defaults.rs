//! Built-in defaults for the simulator
//!
//! These values seed [`SimulatorConfig::default`](crate::SimulatorConfig)
//! before any file or environment override is applied.

/// Token catalog defaults
pub mod tokens {
    use crate::simulator_config::TokenConfig;
    use once_cell::sync::Lazy;
    use rust_decimal_macros::dec;

    /// Catalog shipped with the simulator
    pub static CATALOG: Lazy<Vec<TokenConfig>> = Lazy::new(|| {
        vec![
            TokenConfig::new("eth", "ETH", "Ethereum", dec!(2500)),
            TokenConfig::new("usdc", "USDC", "USD Coin", dec!(1)),
            TokenConfig::new("btc", "WBTC", "Wrapped Bitcoin", dec!(65000)),
            TokenConfig::new("sol", "SOL", "Solana", dec!(140)),
        ]
    });
}

/// Starting pool defaults
pub mod pool {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    pub const TOKEN_X: &str = "eth";
    pub const TOKEN_Y: &str = "usdc";

    /// 1000 ETH
    pub const RESERVE_X: Decimal = dec!(1000);

    /// 2.5M USDC
    pub const RESERVE_Y: Decimal = dec!(2500000);

    /// 0.3%
    pub const FEE: Decimal = dec!(0.003);
}

/// Simulation defaults
pub mod simulation {
    use rust_decimal::Decimal;

    pub const CURVE_POINTS: usize = amm::DEFAULT_CURVE_POINTS;

    /// Upper bound on sampled points per curve
    pub const MAX_CURVE_POINTS: usize = amm::MAX_CURVE_POINTS;

    pub const HIGH_IMPACT_THRESHOLD_PCT: Decimal = amm::DEFAULT_HIGH_IMPACT_THRESHOLD_PCT;
}

/// Logging defaults
pub mod logging {
    pub const LEVEL: &str = "info";
}

/// Environment variable prefix for overrides (`POOLSIM__POOL__FEE=0.01`)
pub const ENV_PREFIX: &str = "POOLSIM";

/// Separator between prefix and nested keys
pub const ENV_SEPARATOR: &str = "__";
