// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::currency::{Currency, CurrencyAmount};
use alloy::primitives::{Address, B256, U256};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolType {
    V2,
    V3,
    Stable,
    InfinityCl,
    InfinityBin,
}

#[derive(Debug, Clone, PartialEq)]
pub struct V2Pool {
    pub address: Address,
    pub reserve0: CurrencyAmount,
    pub reserve1: CurrencyAmount,
}

#[derive(Debug, Clone, PartialEq)]
pub struct V3Pool {
    pub address: Address,
    pub token0: Currency,
    pub token1: Currency,
    /// Fee tier in hundredths of a bip (e.g. 500, 3000, 10000).
    pub fee: u32,
    pub liquidity: u128,
    pub sqrt_price_x96: U256,
    pub tick: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StablePool {
    pub address: Address,
    /// Ordered balances, one per pooled currency; length >= 2.
    pub balances: Vec<CurrencyAmount>,
    pub amplifier: u64,
    /// Swap fee in parts per million.
    pub fee: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InfinityClPool {
    pub id: B256,
    pub currency0: Currency,
    pub currency1: Currency,
    pub fee: u32,
    pub protocol_fee: u32,
    pub hooks: Address,
    pub pool_manager: Address,
    pub tick_spacing: i32,
    pub liquidity: u128,
    pub sqrt_price_x96: U256,
    pub tick: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InfinityBinPool {
    pub id: B256,
    pub currency0: Currency,
    pub currency1: Currency,
    pub fee: u32,
    pub protocol_fee: u32,
    pub hooks: Address,
    pub pool_manager: Address,
    pub bin_step: u16,
    pub active_id: u32,
}

/// Immutable snapshot of one liquidity pool at a given block. Tagged union
/// over the five supported pool kinds; encoder and graph logic match on it
/// exhaustively instead of going through trait objects.
#[derive(Debug, Clone, PartialEq)]
pub enum Pool {
    V2(V2Pool),
    V3(V3Pool),
    Stable(StablePool),
    InfinityCl(InfinityClPool),
    InfinityBin(InfinityBinPool),
}

impl Pool {
    pub fn pool_type(&self) -> PoolType {
        match self {
            Pool::V2(_) => PoolType::V2,
            Pool::V3(_) => PoolType::V3,
            Pool::Stable(_) => PoolType::Stable,
            Pool::InfinityCl(_) => PoolType::InfinityCl,
            Pool::InfinityBin(_) => PoolType::InfinityBin,
        }
    }

    /// Stable identifier used for pool-disjointness checks across a split
    /// trade. Address-keyed pools are zero-extended into the 32-byte space
    /// Infinity pool ids live in.
    pub fn identifier(&self) -> B256 {
        match self {
            Pool::V2(p) => address_key(p.address),
            Pool::V3(p) => address_key(p.address),
            Pool::Stable(p) => address_key(p.address),
            Pool::InfinityCl(p) => p.id,
            Pool::InfinityBin(p) => p.id,
        }
    }

    /// Ordered trading currencies; exactly two except for Stable pools.
    pub fn trading_currencies(&self) -> Vec<&Currency> {
        match self {
            Pool::V2(p) => vec![p.reserve0.currency(), p.reserve1.currency()],
            Pool::V3(p) => vec![&p.token0, &p.token1],
            Pool::Stable(p) => p.balances.iter().map(|b| b.currency()).collect(),
            Pool::InfinityCl(p) => vec![&p.currency0, &p.currency1],
            Pool::InfinityBin(p) => vec![&p.currency0, &p.currency1],
        }
    }

    pub fn involves(&self, currency: &Currency) -> bool {
        self.trading_currencies().iter().any(|c| *c == currency)
    }

    /// Currencies reachable from `currency` through this pool.
    pub fn counter_currencies(&self, currency: &Currency) -> Vec<&Currency> {
        self.trading_currencies()
            .into_iter()
            .filter(|c| *c != currency)
            .collect()
    }
}

fn address_key(address: Address) -> B256 {
    B256::left_padding_from(address.as_slice())
}
