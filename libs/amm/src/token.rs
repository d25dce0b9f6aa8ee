//! Token metadata referenced by pools
//!
//! Tokens are immutable once built and are shared between pools through
//! `Arc<Token>`, so a catalog can hand the same instance to many pools.

use crate::error::{AmmError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Pooled asset with a USD reference price
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    id: String,
    symbol: String,
    name: String,
    price_usd: Decimal,
}

impl Token {
    /// Build a token, rejecting negative reference prices
    pub fn new(
        id: impl Into<String>,
        symbol: impl Into<String>,
        name: impl Into<String>,
        price_usd: Decimal,
    ) -> Result<Self> {
        let symbol = symbol.into();
        if price_usd < Decimal::ZERO {
            return Err(AmmError::InvalidPrice {
                symbol,
                price: price_usd,
            });
        }

        Ok(Self {
            id: id.into(),
            symbol,
            name: name.into(),
            price_usd,
        })
    }

    /// Same as [`Token::new`], wrapped for sharing between pools
    pub fn shared(
        id: impl Into<String>,
        symbol: impl Into<String>,
        name: impl Into<String>,
        price_usd: Decimal,
    ) -> Result<Arc<Self>> {
        Self::new(id, symbol, name, price_usd).map(Arc::new)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reference price in USD
    pub fn price_usd(&self) -> Decimal {
        self.price_usd
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.symbol, self.name)
    }
}
