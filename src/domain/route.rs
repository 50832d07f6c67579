// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::currency::{Currency, CurrencyAmount};
use crate::domain::error::RouterError;
use crate::domain::pool::{Pool, PoolType};

/// Descriptive protocol tag for a route. Used by business-rule filters
/// (exact-output trades reject `Mixed`), not as a hard partition: a route
/// crossing only Infinity CL/Bin pools is tagged `InfinityMixed` rather
/// than `Mixed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteType {
    V2,
    V3,
    Stable,
    InfinityCl,
    InfinityBin,
    InfinityMixed,
    Mixed,
}

/// An ordered pool chain from an input to an output currency.
///
/// Invariant: `path.len() == pools.len() + 1` and each consecutive pool
/// pair shares the path vertex between them. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub pools: Vec<Pool>,
    pub path: Vec<Currency>,
    pub route_type: RouteType,
}

impl Route {
    /// Walks `pools` from `input`, resolving each pool's counter-currency
    /// relative to the running vertex. Where a pool offers several
    /// counterparts (multi-token stable pools), the one the next pool can
    /// continue on wins; the last hop prefers `output`.
    pub fn new(pools: Vec<Pool>, input: Currency, output: Currency) -> Result<Self, RouterError> {
        if pools.is_empty() {
            return Err(RouterError::InvalidRoute("empty pool list".into()));
        }

        let mut path = Vec::with_capacity(pools.len() + 1);
        path.push(input);

        for (i, pool) in pools.iter().enumerate() {
            let current = path.last().cloned().ok_or_else(|| {
                RouterError::InvalidRoute("route walk lost its running currency".into())
            })?;
            if !pool.involves(&current) {
                return Err(RouterError::InvalidRoute(format!(
                    "pool {} does not involve {}",
                    i,
                    current.symbol()
                )));
            }
            let candidates = pool.counter_currencies(&current);
            let next: Option<&Currency> = match pools.get(i + 1) {
                Some(next_pool) => candidates
                    .iter()
                    .copied()
                    .find(|c| next_pool.involves(c))
                    .or_else(|| candidates.first().copied()),
                None => candidates
                    .iter()
                    .copied()
                    .find(|c| **c == output)
                    .or_else(|| candidates.first().copied()),
            };
            let next = next.ok_or_else(|| {
                RouterError::InvalidRoute(format!("pool {} has no counter-currency", i))
            })?;
            path.push(next.clone());
        }

        if path.last() != Some(&output) {
            return Err(RouterError::InvalidRoute(format!(
                "route ends at {} instead of {}",
                path.last().map(|c| c.symbol()).unwrap_or("?"),
                output.symbol()
            )));
        }

        let route_type = classify(&pools);
        Ok(Self {
            pools,
            path,
            route_type,
        })
    }

    pub fn input(&self) -> &Currency {
        &self.path[0]
    }

    pub fn output(&self) -> &Currency {
        &self.path[self.path.len() - 1]
    }

    pub fn hops(&self) -> usize {
        self.pools.len()
    }
}

fn classify(pools: &[Pool]) -> RouteType {
    let mut kinds: Vec<PoolType> = pools.iter().map(|p| p.pool_type()).collect();
    kinds.dedup();
    if kinds.len() == 1 {
        return match kinds[0] {
            PoolType::V2 => RouteType::V2,
            PoolType::V3 => RouteType::V3,
            PoolType::Stable => RouteType::Stable,
            PoolType::InfinityCl => RouteType::InfinityCl,
            PoolType::InfinityBin => RouteType::InfinityBin,
        };
    }
    let all_infinity = pools.iter().all(|p| {
        matches!(
            p.pool_type(),
            PoolType::InfinityCl | PoolType::InfinityBin
        )
    });
    if all_infinity {
        RouteType::InfinityMixed
    } else {
        RouteType::Mixed
    }
}

/// A route plus the slice of the total trade assigned to it.
#[derive(Debug, Clone)]
pub struct RouteWithAmount {
    pub route: Route,
    pub amount: CurrencyAmount,
    pub percent: u32,
}

/// A quoted route: raw on-chain quote plus its gas-adjusted form used for
/// combination comparison.
#[derive(Debug, Clone)]
pub struct RouteWithQuote {
    pub route: Route,
    pub amount: CurrencyAmount,
    pub percent: u32,
    pub quote: CurrencyAmount,
    pub quote_adjusted_for_gas: CurrencyAmount,
    pub gas_estimate: u64,
    pub gas_cost_in_quote: CurrencyAmount,
    pub gas_cost_in_usd: CurrencyAmount,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pool::{StablePool, V2Pool, V3Pool};
    use alloy::primitives::{Address, U256};

    fn token(tag: u8, symbol: &str) -> Currency {
        Currency::token(1, Address::from([tag; 20]), 18, symbol)
    }

    fn v2(tag: u8, a: &Currency, b: &Currency) -> Pool {
        Pool::V2(V2Pool {
            address: Address::from([tag; 20]),
            reserve0: CurrencyAmount::new(a.clone(), U256::from(1_000_000u64)),
            reserve1: CurrencyAmount::new(b.clone(), U256::from(1_000_000u64)),
        })
    }

    fn v3(tag: u8, a: &Currency, b: &Currency) -> Pool {
        Pool::V3(V3Pool {
            address: Address::from([tag; 20]),
            token0: a.clone(),
            token1: b.clone(),
            fee: 3000,
            liquidity: 1_000_000,
            sqrt_price_x96: U256::from(1u64) << 96,
            tick: 0,
        })
    }

    #[test]
    fn path_tracks_pool_chain() {
        let usdc = token(1, "USDC");
        let weth = token(2, "WETH");
        let tkn = token(3, "TKN");
        let route = Route::new(
            vec![v3(10, &usdc, &weth), v3(11, &weth, &tkn)],
            usdc.clone(),
            tkn.clone(),
        )
        .unwrap();

        assert_eq!(route.path.len(), route.pools.len() + 1);
        assert_eq!(route.input(), &usdc);
        assert_eq!(route.output(), &tkn);
        assert_eq!(route.path[1], weth);
        assert_eq!(route.route_type, RouteType::V3);
    }

    #[test]
    fn v2_plus_v3_is_mixed_and_two_v3_is_not() {
        let usdc = token(1, "USDC");
        let weth = token(2, "WETH");
        let tkn = token(3, "TKN");

        let mixed = Route::new(
            vec![v2(10, &usdc, &weth), v3(11, &weth, &tkn)],
            usdc.clone(),
            tkn.clone(),
        )
        .unwrap();
        assert_eq!(mixed.route_type, RouteType::Mixed);

        let single = Route::new(
            vec![v3(12, &usdc, &weth), v3(13, &weth, &tkn)],
            usdc,
            tkn,
        )
        .unwrap();
        assert_eq!(single.route_type, RouteType::V3);
    }

    #[test]
    fn disconnected_pools_are_rejected() {
        let usdc = token(1, "USDC");
        let weth = token(2, "WETH");
        let tkn = token(3, "TKN");
        let other = token(4, "OTHER");

        let err = Route::new(
            vec![v2(10, &usdc, &weth), v2(11, &tkn, &other)],
            usdc,
            other,
        );
        assert!(matches!(err, Err(RouterError::InvalidRoute(_))));
    }

    #[test]
    fn stable_walk_prefers_continuable_counterpart() {
        let usdc = token(1, "USDC");
        let usdt = token(2, "USDT");
        let dai = token(3, "DAI");
        let tkn = token(4, "TKN");
        let three_pool = Pool::Stable(StablePool {
            address: Address::from([20; 20]),
            balances: vec![
                CurrencyAmount::new(usdc.clone(), U256::from(1u64)),
                CurrencyAmount::new(usdt.clone(), U256::from(1u64)),
                CurrencyAmount::new(dai.clone(), U256::from(1u64)),
            ],
            amplifier: 1000,
            fee: 100,
        });

        let route = Route::new(
            vec![three_pool, v2(21, &dai, &tkn)],
            usdc,
            tkn.clone(),
        )
        .unwrap();
        assert_eq!(route.path[1], dai);
        assert_eq!(route.output(), &tkn);
        assert_eq!(route.route_type, RouteType::Mixed);
    }
}
