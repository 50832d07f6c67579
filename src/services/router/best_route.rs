// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::route::RouteWithQuote;
use crate::domain::trade::TradeType;
use alloy::primitives::{B256, U256};
use std::collections::{BTreeMap, HashSet, VecDeque};

/// Pick the best pool-disjoint combination of quoted (route, percent)
/// pairs whose percents sum to 100, bounded by `max_splits`, comparing
/// gas-adjusted totals: exact-input maximizes adjusted output, exact-output
/// minimizes adjusted input. Returns `None` when no valid combination
/// exists or the best total is zero.
pub fn get_best_route_combination(
    quoted: Vec<RouteWithQuote>,
    trade_type: TradeType,
    max_splits: u32,
) -> Option<Vec<RouteWithQuote>> {
    let mut buckets: BTreeMap<u32, Vec<RouteWithQuote>> = BTreeMap::new();
    for quote in quoted {
        buckets.entry(quote.percent).or_default().push(quote);
    }
    for candidates in buckets.values_mut() {
        candidates.sort_by(|a, b| {
            let (qa, qb) = (
                a.quote_adjusted_for_gas.quotient(),
                b.quote_adjusted_for_gas.quotient(),
            );
            match trade_type {
                TradeType::ExactInput => qb.cmp(&qa),
                TradeType::ExactOutput => qa.cmp(&qb),
            }
        });
    }

    let mut best: Option<(U256, Vec<RouteWithQuote>)> = buckets
        .get(&100)
        .and_then(|candidates| candidates.first())
        .map(|route| (route.quote_adjusted_for_gas.quotient(), vec![route.clone()]))
        .filter(|(total, _)| !total.is_zero());

    if max_splits >= 2 {
        let mut queue: VecDeque<(Vec<RouteWithQuote>, u32)> = VecDeque::new();
        for (&percent, candidates) in buckets.iter() {
            if percent >= 100 {
                continue;
            }
            if let Some(first) = candidates.first() {
                queue.push_back((vec![first.clone()], 100 - percent));
            }
        }

        while let Some((combo, remaining)) = queue.pop_front() {
            // Percents are chosen non-increasing to avoid re-walking
            // permutations of the same split.
            let ceiling = combo
                .last()
                .map(|r| r.percent.min(remaining))
                .unwrap_or(remaining);
            for (&percent, candidates) in buckets.range(..=ceiling) {
                let Some(candidate) = candidates
                    .iter()
                    .find(|c| pools_disjoint(c, &combo))
                else {
                    continue;
                };
                let mut extended = combo.clone();
                extended.push(candidate.clone());
                if percent == remaining {
                    let total = combined_adjusted(&extended);
                    if !total.is_zero() && improves(&best, total, trade_type) {
                        best = Some((total, extended));
                    }
                } else if (extended.len() as u32) < max_splits {
                    queue.push_back((extended, remaining - percent));
                }
            }
        }
    }

    best.map(|(_, combo)| combo)
}

fn pools_disjoint(candidate: &RouteWithQuote, combo: &[RouteWithQuote]) -> bool {
    let used: HashSet<B256> = combo
        .iter()
        .flat_map(|r| r.route.pools.iter().map(|p| p.identifier()))
        .collect();
    candidate
        .route
        .pools
        .iter()
        .all(|p| !used.contains(&p.identifier()))
}

fn combined_adjusted(combo: &[RouteWithQuote]) -> U256 {
    combo
        .iter()
        .fold(U256::ZERO, |acc, r| {
            acc.saturating_add(r.quote_adjusted_for_gas.quotient())
        })
}

fn improves(
    best: &Option<(U256, Vec<RouteWithQuote>)>,
    total: U256,
    trade_type: TradeType,
) -> bool {
    match best {
        None => true,
        Some((current, _)) => match trade_type {
            TradeType::ExactInput => total > *current,
            TradeType::ExactOutput => total < *current,
        },
    }
}
