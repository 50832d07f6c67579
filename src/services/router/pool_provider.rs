// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::common::memo::{MemoOptions, TtlMemo};
use crate::domain::currency::Currency;
use crate::domain::error::RouterError;
use crate::domain::pool::{Pool, PoolType};
use alloy::primitives::Address;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct CandidatePoolRequest {
    pub currency_a: Currency,
    pub currency_b: Currency,
    pub block_number: Option<u64>,
    pub protocols: Vec<PoolType>,
    pub cancel: CancellationToken,
}

/// Source of candidate pools for a trading pair; implemented elsewhere
/// (subgraph, HTTP API, on-chain reads). The router only consumes this
/// contract.
#[async_trait]
pub trait PoolProvider: Send + Sync {
    async fn get_candidate_pools(
        &self,
        request: &CandidatePoolRequest,
    ) -> Result<Vec<Pool>, RouterError>;
}

/// Decorator that memoizes any provider behind a `TtlMemo`: repeated
/// requests for the same pair within the TTL window hit upstream once, and
/// stale pool sets are served while a refresh is in flight. Empty pool
/// lists are returned but never cached.
pub struct CachingPoolProvider {
    inner: Arc<dyn PoolProvider>,
    memo: TtlMemo<Vec<Pool>>,
}

impl CachingPoolProvider {
    pub fn new(inner: Arc<dyn PoolProvider>, ttl: Duration, max_age: Duration) -> Self {
        let opts = MemoOptions::new(ttl)
            .max_age(max_age)
            .using_stale_value()
            .is_valid(Arc::new(|pools: &Vec<Pool>| !pools.is_empty()));
        Self {
            inner,
            memo: TtlMemo::new(opts),
        }
    }

    fn cache_key(request: &CandidatePoolRequest) -> (u64, Address, Address, Vec<PoolType>) {
        let a = request.currency_a.wrapped();
        let b = request.currency_b.wrapped();
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        (request.currency_a.chain_id(), low, high, request.protocols.clone())
    }
}

#[async_trait]
impl PoolProvider for CachingPoolProvider {
    async fn get_candidate_pools(
        &self,
        request: &CandidatePoolRequest,
    ) -> Result<Vec<Pool>, RouterError> {
        let key = Self::cache_key(request);
        let inner = self.inner.clone();
        let request = request.clone();
        self.memo
            .get_or_fetch(&key, move || async move {
                inner.get_candidate_pools(&request).await
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::currency::CurrencyAmount;
    use crate::domain::pool::V2Pool;
    use alloy::primitives::U256;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PoolProvider for CountingProvider {
        async fn get_candidate_pools(
            &self,
            request: &CandidatePoolRequest,
        ) -> Result<Vec<Pool>, RouterError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![Pool::V2(V2Pool {
                address: Address::from([7; 20]),
                reserve0: CurrencyAmount::new(request.currency_a.clone(), U256::from(1u64)),
                reserve1: CurrencyAmount::new(request.currency_b.clone(), U256::from(1u64)),
            })])
        }
    }

    fn request(a: u8, b: u8) -> CandidatePoolRequest {
        CandidatePoolRequest {
            currency_a: Currency::token(1, Address::from([a; 20]), 18, "A"),
            currency_b: Currency::token(1, Address::from([b; 20]), 18, "B"),
            block_number: None,
            protocols: vec![PoolType::V2, PoolType::V3],
            cancel: CancellationToken::new(),
        }
    }

    #[tokio::test]
    async fn repeated_lookups_hit_upstream_once_per_ttl_window() {
        let inner = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
        });
        let caching = CachingPoolProvider::new(
            inner.clone(),
            Duration::from_secs(30),
            Duration::from_secs(60),
        );

        let req = request(1, 2);
        let first = caching.get_candidate_pools(&req).await.unwrap();
        let second = caching.get_candidate_pools(&req).await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn pair_order_does_not_split_the_cache() {
        let inner = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
        });
        let caching = CachingPoolProvider::new(
            inner.clone(),
            Duration::from_secs(30),
            Duration::from_secs(60),
        );

        caching.get_candidate_pools(&request(1, 2)).await.unwrap();
        caching.get_candidate_pools(&request(2, 1)).await.unwrap();
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }
}
