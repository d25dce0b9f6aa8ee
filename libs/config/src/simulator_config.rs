//! Simulator Configuration Module
//!
//! Provides configuration loading for the pool simulator.
//! Merges built-in defaults, an optional TOML file and `POOLSIM__`
//! environment variables, then resolves the starting pool.

use crate::defaults;
use amm::{Pool, Token};
use anyhow::{bail, Context, Result};
use config_crate::{Config, Environment, File};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Main simulator configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Logging settings
    pub logging: LoggingConfig,

    /// Token catalog the pool sides are resolved from
    pub tokens: Vec<TokenConfig>,

    /// Starting pool
    pub pool: PoolConfig,

    /// Simulation tunables
    pub simulation: SimulationSettings,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

/// Catalog entry for one token
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TokenConfig {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub price_usd: Decimal,
}

/// Starting pool, tokens referenced by catalog id
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct PoolConfig {
    pub token_x: String,
    pub token_y: String,
    pub reserve_x: Decimal,
    pub reserve_y: Decimal,
    pub fee: Decimal,
}

/// Simulation settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct SimulationSettings {
    pub curve_points: usize,
    pub high_impact_threshold_pct: Decimal,
}

impl TokenConfig {
    pub fn new(id: &str, symbol: &str, name: &str, price_usd: Decimal) -> Self {
        Self {
            id: id.to_string(),
            symbol: symbol.to_string(),
            name: name.to_string(),
            price_usd,
        }
    }

    /// Build the engine token
    pub fn to_token(&self) -> Result<Arc<Token>> {
        Token::shared(
            self.id.as_str(),
            self.symbol.as_str(),
            self.name.as_str(),
            self.price_usd,
        )
        .with_context(|| format!("Invalid token '{}'", self.id))
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            tokens: defaults::tokens::CATALOG.clone(),
            pool: PoolConfig::default(),
            simulation: SimulationSettings::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::logging::LEVEL.to_string(),
            json: false,
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            token_x: defaults::pool::TOKEN_X.to_string(),
            token_y: defaults::pool::TOKEN_Y.to_string(),
            reserve_x: defaults::pool::RESERVE_X,
            reserve_y: defaults::pool::RESERVE_Y,
            fee: defaults::pool::FEE,
        }
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            curve_points: defaults::simulation::CURVE_POINTS,
            high_impact_threshold_pct: defaults::simulation::HIGH_IMPACT_THRESHOLD_PCT,
        }
    }
}

impl SimulatorConfig {
    /// Load configuration from an optional file with environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            info!("Loading simulator config: {:?}", path);
            builder = builder.add_source(File::from(path).required(true));
        }

        // Override with environment variables (POOLSIM__ prefix)
        builder = builder.add_source(
            Environment::with_prefix(defaults::ENV_PREFIX)
                .prefix_separator(defaults::ENV_SEPARATOR)
                .separator(defaults::ENV_SEPARATOR)
                .try_parsing(true),
        );

        let config: Self = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        debug!(
            pool = %format!("{}/{}", config.pool.token_x, config.pool.token_y),
            tokens = config.tokens.len(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Check cross-field constraints that serde cannot express
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for token in &self.tokens {
            if !seen.insert(token.id.as_str()) {
                bail!("Duplicate token id '{}' in catalog", token.id);
            }
        }

        let points = self.simulation.curve_points;
        if points == 0 || points > defaults::simulation::MAX_CURVE_POINTS {
            bail!(
                "simulation.curve_points must be in 1..={}, got {}",
                defaults::simulation::MAX_CURVE_POINTS,
                points
            );
        }
        if self.simulation.high_impact_threshold_pct < Decimal::ZERO {
            bail!(
                "simulation.high_impact_threshold_pct must not be negative, got {}",
                self.simulation.high_impact_threshold_pct
            );
        }

        // Resolving the pool runs the engine's own validation
        self.build_pool().map(|_| ())
    }

    /// Look up a catalog entry by id
    pub fn token(&self, id: &str) -> Option<&TokenConfig> {
        self.tokens.iter().find(|token| token.id == id)
    }

    /// Build the configured starting pool
    pub fn build_pool(&self) -> Result<Pool> {
        let token_x = self
            .token(&self.pool.token_x)
            .with_context(|| format!("pool.token_x '{}' not in catalog", self.pool.token_x))?
            .to_token()?;
        let token_y = self
            .token(&self.pool.token_y)
            .with_context(|| format!("pool.token_y '{}' not in catalog", self.pool.token_y))?
            .to_token()?;

        Pool::new(
            token_x,
            token_y,
            self.pool.reserve_x,
            self.pool.reserve_y,
            self.pool.fee,
        )
        .context("Invalid pool configuration")
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

/// Expand `~` and environment variables in a user-supplied config path
pub fn resolve_config_path(raw: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(raw).context("Failed to expand config path")?;
    Ok(PathBuf::from(expanded.as_ref()))
}

/// Convenience function to load configuration from an optional raw path
pub fn load_config(raw_path: Option<&str>) -> Result<SimulatorConfig> {
    let path = raw_path.map(resolve_config_path).transpose()?;
    SimulatorConfig::load(path.as_deref())
}
