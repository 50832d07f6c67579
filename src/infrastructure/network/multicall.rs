// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::common::retry::retry_with_backoff;
use crate::domain::error::RouterError;
use crate::infrastructure::network::quoters::Multicall3;
use alloy::eips::BlockId;
use alloy::primitives::{Address, Bytes};
use alloy::providers::Provider;
use async_trait::async_trait;
use std::time::Duration;

/// One encoded contract call inside a batch.
#[derive(Debug, Clone)]
pub struct QuoteCall {
    pub target: Address,
    pub calldata: Bytes,
}

/// Per-call outcome of a batched multicall. A failed call never aborts its
/// siblings; it is reported positionally.
#[derive(Debug, Clone)]
pub enum CallOutcome {
    Success(Bytes),
    Failure(String),
}

/// The multicall-capable client the quote fetcher depends on. Implementors
/// submit all `calls` together and preserve ordering in the result.
#[async_trait]
pub trait MulticallProvider: Send + Sync {
    async fn multicall(
        &self,
        calls: &[QuoteCall],
        block_number: Option<u64>,
    ) -> Result<Vec<CallOutcome>, RouterError>;
}

/// Multicall3 `aggregate3` over an alloy provider, with transport-level
/// retry. Per-call reverts come back as `CallOutcome::Failure`.
pub struct OnchainMulticall<P> {
    provider: P,
    address: Address,
    attempts: usize,
}

impl<P: Provider + Clone + 'static> OnchainMulticall<P> {
    pub fn new(provider: P, address: Address) -> Self {
        Self {
            provider,
            address,
            attempts: 3,
        }
    }
}

#[async_trait]
impl<P: Provider + Clone + 'static> MulticallProvider for OnchainMulticall<P> {
    async fn multicall(
        &self,
        calls: &[QuoteCall],
        block_number: Option<u64>,
    ) -> Result<Vec<CallOutcome>, RouterError> {
        let batch: Vec<Multicall3::Call3> = calls
            .iter()
            .map(|call| Multicall3::Call3 {
                target: call.target,
                allowFailure: true,
                callData: call.calldata.clone(),
            })
            .collect();

        let provider = self.provider.clone();
        let address = self.address;
        let results = retry_with_backoff(
            move |_| {
                let provider = provider.clone();
                let batch = batch.clone();
                async move {
                    let contract = Multicall3::new(address, provider);
                    let mut builder = contract.aggregate3(batch);
                    if let Some(number) = block_number {
                        builder = builder.block(BlockId::number(number));
                    }
                    builder.call().await
                }
            },
            self.attempts,
            Duration::from_millis(100),
            Duration::from_millis(800),
        )
        .await
        .map_err(|e| RouterError::Connection(format!("multicall failed: {}", e)))?;

        Ok(results
            .into_iter()
            .map(|result| {
                if result.success {
                    CallOutcome::Success(result.returnData)
                } else {
                    CallOutcome::Failure("call reverted".into())
                }
            })
            .collect())
    }
}
