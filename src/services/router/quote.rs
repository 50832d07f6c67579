// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::common::promise::with_timeout;
use crate::domain::currency::{Currency, CurrencyAmount};
use crate::domain::error::RouterError;
use crate::domain::pool::Pool;
use crate::domain::route::{Route, RouteType, RouteWithAmount};
use crate::domain::trade::TradeType;
use crate::infrastructure::network::multicall::{CallOutcome, MulticallProvider, QuoteCall};
use crate::infrastructure::network::quoters::{
    bin_parameters, cl_parameters, InfinityBinQuoter, InfinityClQuoter, MixedQuoter, PathKey,
    PoolKey, QuoterAddresses, V3Quoter, ACTION_INFINITY_BIN, ACTION_INFINITY_CL, ACTION_STABLE_2,
    ACTION_STABLE_3, ACTION_V2, ACTION_V3,
};
use alloy::primitives::aliases::U24;
use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::{SolCall, SolValue};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

/// Decoded quoter result for one route.
#[derive(Debug, Clone, Copy)]
pub struct RouteQuote {
    /// Output amount for exact-input quotes, input amount for exact-output.
    pub raw: U256,
    pub gas_estimate: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteCallKind {
    V3ExactIn,
    V3ExactOut,
    ClExactIn,
    ClExactOut,
    BinExactIn,
    BinExactOut,
    MixedExactIn,
}

#[derive(Debug, Clone)]
pub struct EncodedQuote {
    pub call: QuoteCall,
    pub kind: QuoteCallKind,
}

/// Select the quoter matching a route's pool-type composition and encode
/// the call. Pure single-protocol routes go to their dedicated quoter;
/// everything else falls through to the mixed quoter, which only supports
/// exact input.
pub fn encode_route_quote(
    route: &Route,
    amount: &CurrencyAmount,
    trade_type: TradeType,
    addresses: &QuoterAddresses,
) -> Result<EncodedQuote, RouterError> {
    let exact_out = trade_type == TradeType::ExactOutput;
    match route.route_type {
        RouteType::V3 => encode_v3(route, amount, exact_out, addresses.v3_quoter),
        RouteType::InfinityCl => encode_infinity_cl(route, amount, exact_out, addresses.cl_quoter),
        RouteType::InfinityBin => {
            encode_infinity_bin(route, amount, exact_out, addresses.bin_quoter)
        }
        _ if exact_out => Err(RouterError::InvalidRoute(format!(
            "no exact-output quoter for {:?} routes",
            route.route_type
        ))),
        _ => encode_mixed(route, amount, addresses.mixed_quoter),
    }
}

fn encode_v3(
    route: &Route,
    amount: &CurrencyAmount,
    exact_out: bool,
    quoter: Address,
) -> Result<EncodedQuote, RouterError> {
    let mut tokens: Vec<Address> = route.path.iter().map(|c| c.wrapped()).collect();
    let mut fees = Vec::with_capacity(route.pools.len());
    for pool in &route.pools {
        match pool {
            Pool::V3(p) => fees.push(p.fee),
            other => {
                return Err(RouterError::InvalidPoolType(format!(
                    "{:?} pool on a V3 route",
                    other.pool_type()
                )))
            }
        }
    }
    if exact_out {
        tokens.reverse();
        fees.reverse();
    }
    let path = pack_v3_path(&tokens, &fees);

    let (calldata, kind) = if exact_out {
        (
            V3Quoter::quoteExactOutputCall {
                path: path.into(),
                amountOut: amount.quotient(),
            }
            .abi_encode(),
            QuoteCallKind::V3ExactOut,
        )
    } else {
        (
            V3Quoter::quoteExactInputCall {
                path: path.into(),
                amountIn: amount.quotient(),
            }
            .abi_encode(),
            QuoteCallKind::V3ExactIn,
        )
    };

    Ok(EncodedQuote {
        call: QuoteCall {
            target: quoter,
            calldata: calldata.into(),
        },
        kind,
    })
}

/// Tokens interleaved with 3-byte fee tiers, the V3 quoter path shape.
fn pack_v3_path(tokens: &[Address], fees: &[u32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(tokens.len() * 23);
    out.extend_from_slice(tokens[0].as_slice());
    for (i, fee) in fees.iter().enumerate() {
        out.extend_from_slice(&fee.to_be_bytes()[1..]);
        out.extend_from_slice(tokens[i + 1].as_slice());
    }
    out
}

fn encode_infinity_cl(
    route: &Route,
    amount: &CurrencyAmount,
    exact_out: bool,
    quoter: Address,
) -> Result<EncodedQuote, RouterError> {
    let (exact_currency, path) = infinity_path(route, exact_out)?;
    let params = InfinityClQuoter::QuoteExactParams {
        exactCurrency: exact_currency,
        path,
        exactAmount: clamped_u128(amount.quotient()),
    };
    let (calldata, kind) = if exact_out {
        (
            InfinityClQuoter::quoteExactOutputCall { params }.abi_encode(),
            QuoteCallKind::ClExactOut,
        )
    } else {
        (
            InfinityClQuoter::quoteExactInputCall { params }.abi_encode(),
            QuoteCallKind::ClExactIn,
        )
    };
    Ok(EncodedQuote {
        call: QuoteCall {
            target: quoter,
            calldata: calldata.into(),
        },
        kind,
    })
}

fn encode_infinity_bin(
    route: &Route,
    amount: &CurrencyAmount,
    exact_out: bool,
    quoter: Address,
) -> Result<EncodedQuote, RouterError> {
    let (exact_currency, path) = infinity_path(route, exact_out)?;
    let params = InfinityBinQuoter::QuoteExactParams {
        exactCurrency: exact_currency,
        path,
        exactAmount: clamped_u128(amount.quotient()),
    };
    let (calldata, kind) = if exact_out {
        (
            InfinityBinQuoter::quoteExactOutputCall { params }.abi_encode(),
            QuoteCallKind::BinExactOut,
        )
    } else {
        (
            InfinityBinQuoter::quoteExactInputCall { params }.abi_encode(),
            QuoteCallKind::BinExactIn,
        )
    };
    Ok(EncodedQuote {
        call: QuoteCall {
            target: quoter,
            calldata: calldata.into(),
        },
        kind,
    })
}

/// Path keys for a pure Infinity route. Exact-output paths are built from
/// the output end backward over the reversed pool list, then the keys are
/// reversed back before use.
fn infinity_path(route: &Route, exact_out: bool) -> Result<(Address, Vec<PathKey>), RouterError> {
    let build = |path: &[&Currency], pools: &[&Pool]| -> Result<Vec<PathKey>, RouterError> {
        pools
            .iter()
            .enumerate()
            .map(|(i, pool)| path_key(pool, path[i + 1]))
            .collect()
    };

    if exact_out {
        let rev_path: Vec<&Currency> = route.path.iter().rev().collect();
        let rev_pools: Vec<&Pool> = route.pools.iter().rev().collect();
        let mut keys = build(&rev_path, &rev_pools)?;
        keys.reverse();
        Ok((route.output().infinity_address(), keys))
    } else {
        let path: Vec<&Currency> = route.path.iter().collect();
        let pools: Vec<&Pool> = route.pools.iter().collect();
        let keys = build(&path, &pools)?;
        Ok((route.input().infinity_address(), keys))
    }
}

fn path_key(pool: &Pool, intermediate: &Currency) -> Result<PathKey, RouterError> {
    match pool {
        Pool::InfinityCl(p) => Ok(PathKey {
            intermediateCurrency: intermediate.infinity_address(),
            fee: U24::from(p.fee),
            hooks: p.hooks,
            poolManager: p.pool_manager,
            hookData: Bytes::new(),
            parameters: cl_parameters(p.tick_spacing),
        }),
        Pool::InfinityBin(p) => Ok(PathKey {
            intermediateCurrency: intermediate.infinity_address(),
            fee: U24::from(p.fee),
            hooks: p.hooks,
            poolManager: p.pool_manager,
            hookData: Bytes::new(),
            parameters: bin_parameters(p.bin_step),
        }),
        other => Err(RouterError::InvalidPoolType(format!(
            "{:?} pool on an Infinity path",
            other.pool_type()
        ))),
    }
}

fn encode_mixed(
    route: &Route,
    amount: &CurrencyAmount,
    quoter: Address,
) -> Result<EncodedQuote, RouterError> {
    let paths: Vec<Address> = route.path.iter().map(|c| c.wrapped()).collect();
    let mut actions = Vec::with_capacity(route.pools.len());
    let mut params: Vec<Bytes> = Vec::with_capacity(route.pools.len());

    for pool in &route.pools {
        match pool {
            Pool::V2(_) => {
                actions.push(ACTION_V2);
                params.push(Bytes::new());
            }
            Pool::Stable(p) => {
                let action = match p.balances.len() {
                    2 => ACTION_STABLE_2,
                    3 => ACTION_STABLE_3,
                    n => {
                        return Err(RouterError::InvalidPoolType(format!(
                            "stable pool with {n} currencies"
                        )))
                    }
                };
                actions.push(action);
                params.push(Bytes::new());
            }
            Pool::V3(p) => {
                actions.push(ACTION_V3);
                params.push(U24::from(p.fee).abi_encode().into());
            }
            Pool::InfinityCl(p) => {
                actions.push(ACTION_INFINITY_CL);
                let key = PoolKey {
                    currency0: p.currency0.infinity_address(),
                    currency1: p.currency1.infinity_address(),
                    hooks: p.hooks,
                    poolManager: p.pool_manager,
                    fee: U24::from(p.fee),
                    parameters: cl_parameters(p.tick_spacing),
                };
                params.push((key, Bytes::new()).abi_encode_params().into());
            }
            Pool::InfinityBin(p) => {
                actions.push(ACTION_INFINITY_BIN);
                let key = PoolKey {
                    currency0: p.currency0.infinity_address(),
                    currency1: p.currency1.infinity_address(),
                    hooks: p.hooks,
                    poolManager: p.pool_manager,
                    fee: U24::from(p.fee),
                    parameters: bin_parameters(p.bin_step),
                };
                params.push((key, Bytes::new()).abi_encode_params().into());
            }
        }
    }

    let calldata = MixedQuoter::quoteMixedExactInputCall {
        paths,
        actions: actions.into(),
        params,
        amountIn: amount.quotient(),
    }
    .abi_encode();

    Ok(EncodedQuote {
        call: QuoteCall {
            target: quoter,
            calldata: calldata.into(),
        },
        kind: QuoteCallKind::MixedExactIn,
    })
}

/// Decode one quoter response. V3 quoter results carry the legacy
/// four-element shape (quote first, gas estimate last); the Infinity and
/// mixed quoters return `[quote, gasEstimate]`.
pub fn decode_quote(kind: QuoteCallKind, data: &[u8]) -> Result<RouteQuote, RouterError> {
    let decode_err =
        |e: alloy::sol_types::Error| RouterError::Connection(format!("quote decode failed: {e}"));
    let (raw, gas) = match kind {
        QuoteCallKind::V3ExactIn => {
            let ret = V3Quoter::quoteExactInputCall::abi_decode_returns(data).map_err(decode_err)?;
            (ret.amountOut, ret.gasEstimate)
        }
        QuoteCallKind::V3ExactOut => {
            let ret =
                V3Quoter::quoteExactOutputCall::abi_decode_returns(data).map_err(decode_err)?;
            (ret.amountIn, ret.gasEstimate)
        }
        QuoteCallKind::ClExactIn => {
            let ret = InfinityClQuoter::quoteExactInputCall::abi_decode_returns(data)
                .map_err(decode_err)?;
            (ret.amountOut, ret.gasEstimate)
        }
        QuoteCallKind::ClExactOut => {
            let ret = InfinityClQuoter::quoteExactOutputCall::abi_decode_returns(data)
                .map_err(decode_err)?;
            (ret.amountIn, ret.gasEstimate)
        }
        QuoteCallKind::BinExactIn => {
            let ret = InfinityBinQuoter::quoteExactInputCall::abi_decode_returns(data)
                .map_err(decode_err)?;
            (ret.amountOut, ret.gasEstimate)
        }
        QuoteCallKind::BinExactOut => {
            let ret = InfinityBinQuoter::quoteExactOutputCall::abi_decode_returns(data)
                .map_err(decode_err)?;
            (ret.amountIn, ret.gasEstimate)
        }
        QuoteCallKind::MixedExactIn => {
            let ret = MixedQuoter::quoteMixedExactInputCall::abi_decode_returns(data)
                .map_err(decode_err)?;
            (ret.amountOut, ret.gasEstimate)
        }
    };
    Ok(RouteQuote {
        raw,
        gas_estimate: u64::try_from(gas).unwrap_or(u64::MAX),
    })
}

fn clamped_u128(value: U256) -> u128 {
    u128::try_from(value).unwrap_or(u128::MAX)
}

/// Batched quote fetching: all calls of a chunk go through one multicall,
/// chunks run concurrently under a semaphore cap, and any per-call failure
/// drops only its own route.
pub struct QuoteFetcher {
    multicall: Arc<dyn MulticallProvider>,
    addresses: QuoterAddresses,
    chunk_size: usize,
    permits: Arc<Semaphore>,
    call_timeout: Option<Duration>,
}

impl QuoteFetcher {
    pub fn new(
        multicall: Arc<dyn MulticallProvider>,
        addresses: QuoterAddresses,
        chunk_size: usize,
        concurrency: usize,
        call_timeout: Option<Duration>,
    ) -> Self {
        Self {
            multicall,
            addresses,
            chunk_size: chunk_size.max(1),
            permits: Arc::new(Semaphore::new(concurrency.max(1))),
            call_timeout,
        }
    }

    pub async fn fetch_quotes(
        &self,
        routes: &[RouteWithAmount],
        trade_type: TradeType,
        block_number: Option<u64>,
        cancel: &CancellationToken,
    ) -> Result<Vec<Option<RouteQuote>>, RouterError> {
        let mut results: Vec<Option<RouteQuote>> = vec![None; routes.len()];

        let mut encoded: Vec<(usize, EncodedQuote)> = Vec::with_capacity(routes.len());
        for (i, candidate) in routes.iter().enumerate() {
            match encode_route_quote(&candidate.route, &candidate.amount, trade_type, &self.addresses)
            {
                Ok(e) => encoded.push((i, e)),
                Err(e) => {
                    tracing::warn!(target: "router", error = %e, "route dropped at encode time")
                }
            }
        }

        let mut tasks = Vec::new();
        for chunk in encoded.chunks(self.chunk_size) {
            let chunk: Vec<(usize, EncodedQuote)> = chunk.to_vec();
            let calls: Vec<QuoteCall> = chunk.iter().map(|(_, e)| e.call.clone()).collect();
            let multicall = self.multicall.clone();
            let permits = self.permits.clone();
            let call_timeout = self.call_timeout;
            let cancel = cancel.clone();
            tasks.push(async move {
                if cancel.is_cancelled() {
                    return (chunk, Err(RouterError::Cancelled));
                }
                let _permit = match permits.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return (chunk, Err(RouterError::Connection("permit pool closed".into())))
                    }
                };
                let call = multicall.multicall(&calls, block_number);
                let outcome = match call_timeout {
                    Some(timeout) => with_timeout(call, timeout).await,
                    None => call.await,
                };
                (chunk, outcome)
            });
        }

        let batches = futures::future::join_all(tasks).await;
        if cancel.is_cancelled() {
            return Err(RouterError::Cancelled);
        }

        for (chunk, outcome) in batches {
            match outcome {
                Ok(call_results) => {
                    for ((index, enc), result) in chunk.iter().zip(call_results) {
                        match result {
                            CallOutcome::Success(data) => match decode_quote(enc.kind, &data) {
                                Ok(quote) => results[*index] = Some(quote),
                                Err(e) => {
                                    tracing::warn!(target: "router", error = %e, "quote dropped")
                                }
                            },
                            CallOutcome::Failure(reason) => {
                                tracing::warn!(target: "router", reason, "quote call failed")
                            }
                        }
                    }
                }
                Err(RouterError::Cancelled) => return Err(RouterError::Cancelled),
                Err(e) => {
                    tracing::warn!(target: "router", error = %e, "quote batch dropped")
                }
            }
        }

        Ok(results)
    }
}
