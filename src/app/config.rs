// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use crate::domain::error::RouterError;
use crate::infrastructure::network::quoters::QuoterAddresses;
use crate::services::router::TradeConfig;
use alloy::primitives::Address;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct RouterSettings {
    #[serde(default = "default_max_hops")]
    pub max_hops: usize,
    #[serde(default = "default_max_splits")]
    pub max_splits: u32,
    #[serde(default = "default_distribution_percent")]
    pub distribution_percent: u32,
    #[serde(default = "default_quote_chunk_size")]
    pub quote_chunk_size: usize,
    /// Cap on concurrent outbound multicall batches.
    #[serde(default = "default_quote_concurrency")]
    pub quote_concurrency: usize,
    /// Per-batch timeout; 0 disables it.
    #[serde(default = "default_quote_timeout_ms")]
    pub quote_timeout_ms: u64,
    #[serde(default = "default_pool_cache_ttl_ms")]
    pub pool_cache_ttl_ms: u64,
    #[serde(default = "default_pool_cache_max_age_ms")]
    pub pool_cache_max_age_ms: u64,

    pub multicall_address: Option<Address>,
    pub v3_quoter_address: Option<Address>,
    pub cl_quoter_address: Option<Address>,
    pub bin_quoter_address: Option<Address>,
    pub mixed_quoter_address: Option<Address>,
}

fn default_max_hops() -> usize {
    3
}
fn default_max_splits() -> u32 {
    4
}
fn default_distribution_percent() -> u32 {
    5
}
fn default_quote_chunk_size() -> usize {
    10
}
fn default_quote_concurrency() -> usize {
    4
}
fn default_quote_timeout_ms() -> u64 {
    10_000
}
fn default_pool_cache_ttl_ms() -> u64 {
    15_000
}
fn default_pool_cache_max_age_ms() -> u64 {
    120_000
}

impl RouterSettings {
    /// Layered load: optional file first, then `ROUTER_`-prefixed
    /// environment variables on top.
    pub fn load(path: Option<&str>) -> Result<Self, RouterError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path));
        }
        let settings = builder
            .add_source(Environment::with_prefix("ROUTER"))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    pub fn trade_config(&self) -> TradeConfig {
        TradeConfig {
            max_hops: self.max_hops,
            max_splits: self.max_splits,
            distribution_percent: self.distribution_percent,
            quote_chunk_size: self.quote_chunk_size,
            quote_concurrency: self.quote_concurrency,
            quote_timeout: match self.quote_timeout_ms {
                0 => None,
                ms => Some(Duration::from_millis(ms)),
            },
            ..TradeConfig::default()
        }
    }

    pub fn pool_cache_ttl(&self) -> Duration {
        Duration::from_millis(self.pool_cache_ttl_ms)
    }

    pub fn pool_cache_max_age(&self) -> Duration {
        Duration::from_millis(self.pool_cache_max_age_ms)
    }

    pub fn quoter_addresses(&self) -> Result<QuoterAddresses, RouterError> {
        let require = |field: Option<Address>, name: &str| {
            field.ok_or_else(|| RouterError::Config(format!("{name} is not configured")))
        };
        Ok(QuoterAddresses {
            multicall: require(self.multicall_address, "multicall_address")?,
            v3_quoter: require(self.v3_quoter_address, "v3_quoter_address")?,
            cl_quoter: require(self.cl_quoter_address, "cl_quoter_address")?,
            bin_quoter: require(self.bin_quoter_address, "bin_quoter_address")?,
            mixed_quoter: require(self.mixed_quoter_address, "mixed_quoter_address")?,
        })
    }
}
