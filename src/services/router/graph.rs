// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::currency::Currency;
use crate::domain::pool::Pool;
use crate::domain::route::Route;

/// Enumerate every simple path from `input` to `output` over the
/// undirected multigraph induced by the pool set, bounded by `max_hops`
/// edges. Stable pools contribute an edge for each pairwise currency
/// combination. No path is not an error: the caller treats an empty result
/// as missing liquidity.
///
/// Precondition: `input` and `output` must not wrap to the same currency;
/// the router filters that case before the graph is reached.
pub fn compute_all_routes(
    input: &Currency,
    output: &Currency,
    pools: &[Pool],
    max_hops: usize,
) -> Vec<Route> {
    let mut routes = Vec::new();
    if max_hops == 0 || pools.is_empty() {
        return routes;
    }

    let mut used = vec![false; pools.len()];
    let mut chain: Vec<usize> = Vec::new();
    let mut visited: Vec<Currency> = vec![input.clone()];

    search(
        input, output, pools, max_hops, &mut used, &mut chain, &mut visited, &mut routes,
    );
    routes
}

#[allow(clippy::too_many_arguments)]
fn search(
    current: &Currency,
    output: &Currency,
    pools: &[Pool],
    max_hops: usize,
    used: &mut [bool],
    chain: &mut Vec<usize>,
    visited: &mut Vec<Currency>,
    routes: &mut Vec<Route>,
) {
    if chain.len() >= max_hops {
        return;
    }

    for (i, pool) in pools.iter().enumerate() {
        if used[i] || !pool.involves(current) {
            continue;
        }
        for next in pool.counter_currencies(current) {
            if next == output {
                let mut selected: Vec<Pool> =
                    chain.iter().map(|&idx| pools[idx].clone()).collect();
                selected.push(pool.clone());
                let input = visited[0].clone();
                match Route::new(selected, input, output.clone()) {
                    Ok(route) => routes.push(route),
                    Err(e) => {
                        tracing::debug!(target: "router", error = %e, "discarding incoherent path")
                    }
                }
            } else if !visited.contains(next) {
                used[i] = true;
                chain.push(i);
                visited.push(next.clone());
                search(next, output, pools, max_hops, used, chain, visited, routes);
                visited.pop();
                chain.pop();
                used[i] = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::currency::CurrencyAmount;
    use crate::domain::pool::{StablePool, V2Pool, V3Pool};
    use crate::domain::route::RouteType;
    use alloy::primitives::{Address, U256};

    fn token(tag: u8, symbol: &str) -> Currency {
        Currency::token(1, Address::from([tag; 20]), 18, symbol)
    }

    fn v2(tag: u8, a: &Currency, b: &Currency) -> Pool {
        Pool::V2(V2Pool {
            address: Address::from([tag; 20]),
            reserve0: CurrencyAmount::new(a.clone(), U256::from(1_000u64)),
            reserve1: CurrencyAmount::new(b.clone(), U256::from(1_000u64)),
        })
    }

    fn v3(tag: u8, a: &Currency, b: &Currency) -> Pool {
        Pool::V3(V3Pool {
            address: Address::from([tag; 20]),
            token0: a.clone(),
            token1: b.clone(),
            fee: 500,
            liquidity: 1,
            sqrt_price_x96: U256::from(1u64) << 96,
            tick: 0,
        })
    }

    #[test]
    fn discovers_direct_and_two_hop_paths() {
        let usdc = token(1, "USDC");
        let weth = token(2, "WETH");
        let tkn = token(3, "TKN");
        let pools = vec![
            v3(10, &usdc, &weth),
            v3(11, &weth, &tkn),
            v2(12, &usdc, &tkn),
        ];

        let routes = compute_all_routes(&usdc, &tkn, &pools, 2);
        assert_eq!(routes.len(), 2);
        for route in &routes {
            assert_eq!(route.input(), &usdc);
            assert_eq!(route.output(), &tkn);
            assert!(route.hops() <= 2);
            // Each consecutive path pair is connected by the pool between them.
            for (i, pool) in route.pools.iter().enumerate() {
                assert!(pool.involves(&route.path[i]));
                assert!(pool.involves(&route.path[i + 1]));
            }
        }
        assert!(routes.iter().any(|r| r.route_type == RouteType::V2 && r.hops() == 1));
        assert!(routes.iter().any(|r| r.route_type == RouteType::V3 && r.hops() == 2));
    }

    #[test]
    fn hop_bound_prunes_longer_paths() {
        let a = token(1, "A");
        let b = token(2, "B");
        let c = token(3, "C");
        let d = token(4, "D");
        let pools = vec![v2(10, &a, &b), v2(11, &b, &c), v2(12, &c, &d)];

        assert!(compute_all_routes(&a, &d, &pools, 2).is_empty());
        let routes = compute_all_routes(&a, &d, &pools, 3);
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].hops(), 3);
    }

    #[test]
    fn no_liquidity_yields_empty_result() {
        let a = token(1, "A");
        let b = token(2, "B");
        let c = token(3, "C");
        let d = token(4, "D");
        let pools = vec![v2(10, &a, &b)];
        assert!(compute_all_routes(&c, &d, &pools, 3).is_empty());
    }

    #[test]
    fn currencies_are_not_revisited() {
        let a = token(1, "A");
        let b = token(2, "B");
        let c = token(3, "C");
        // Two parallel A/B pools plus B/C: the A->B->A->... loop must not appear.
        let pools = vec![v2(10, &a, &b), v2(11, &a, &b), v2(12, &b, &c)];
        let routes = compute_all_routes(&a, &c, &pools, 3);
        assert_eq!(routes.len(), 2, "one route per parallel A/B pool");
        for route in routes {
            assert_eq!(route.hops(), 2);
        }
    }

    #[test]
    fn stable_pool_bridges_pairwise() {
        let usdc = token(1, "USDC");
        let usdt = token(2, "USDT");
        let dai = token(3, "DAI");
        let tkn = token(4, "TKN");
        let pools = vec![
            Pool::Stable(StablePool {
                address: Address::from([20; 20]),
                balances: vec![
                    CurrencyAmount::new(usdc.clone(), U256::from(1u64)),
                    CurrencyAmount::new(usdt.clone(), U256::from(1u64)),
                    CurrencyAmount::new(dai.clone(), U256::from(1u64)),
                ],
                amplifier: 1000,
                fee: 100,
            }),
            v2(21, &dai, &tkn),
            v2(22, &usdt, &tkn),
        ];

        let routes = compute_all_routes(&usdc, &tkn, &pools, 2);
        // The stable pool reaches TKN through both of its counterpart legs.
        assert_eq!(routes.len(), 2);
    }
}
