// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

pub mod best_route;
pub mod distribution;
pub mod gas;
pub mod graph;
pub mod pool_provider;
pub mod quote;

pub use best_route::get_best_route_combination;
pub use distribution::distribute_amount;
pub use gas::{GasModel, GasModelParams};
pub use graph::compute_all_routes;
pub use pool_provider::{CachingPoolProvider, CandidatePoolRequest, PoolProvider};
pub use quote::{QuoteFetcher, RouteQuote};

use crate::domain::currency::{Currency, CurrencyAmount};
use crate::domain::error::RouterError;
use crate::domain::pool::PoolType;
use crate::domain::route::{RouteType, RouteWithAmount};
use crate::domain::trade::{Trade, TradeType};
use crate::infrastructure::network::multicall::MulticallProvider;
use crate::infrastructure::network::quoters::QuoterAddresses;
use alloy::primitives::U256;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub struct TradeConfig {
    pub max_hops: usize,
    pub max_splits: u32,
    pub distribution_percent: u32,
    pub quote_chunk_size: usize,
    pub quote_concurrency: usize,
    pub quote_timeout: Option<Duration>,
    pub protocols: Vec<PoolType>,
}

impl Default for TradeConfig {
    fn default() -> Self {
        Self {
            max_hops: 3,
            max_splits: 4,
            distribution_percent: 5,
            quote_chunk_size: 10,
            quote_concurrency: 4,
            quote_timeout: None,
            protocols: vec![
                PoolType::V2,
                PoolType::V3,
                PoolType::Stable,
                PoolType::InfinityCl,
                PoolType::InfinityBin,
            ],
        }
    }
}

/// One routing request. `amount` is the exact side of the trade; `currency`
/// is the opposite side. Gas prices and USD oracles are supplied by the
/// caller per request.
#[derive(Clone)]
pub struct TradeRequest {
    pub amount: CurrencyAmount,
    pub currency: Currency,
    pub trade_type: TradeType,
    pub block_number: Option<u64>,
    pub gas_price_wei: U256,
    pub native_usd_price: f64,
    pub quote_usd_price: f64,
    pub cancel: CancellationToken,
}

/// The routing service: candidate pools in, best gas-adjusted trade out.
/// All collaborators are constructor-injected so concurrent routing
/// contexts never share ambient state.
pub struct TradeRouter {
    pool_provider: Arc<dyn PoolProvider>,
    fetcher: QuoteFetcher,
    config: TradeConfig,
    native_currency: Currency,
    usd_currency: Currency,
}

impl TradeRouter {
    pub fn new(
        pool_provider: Arc<dyn PoolProvider>,
        multicall: Arc<dyn MulticallProvider>,
        addresses: QuoterAddresses,
        config: TradeConfig,
        native_currency: Currency,
        usd_currency: Currency,
    ) -> Self {
        let fetcher = QuoteFetcher::new(
            multicall,
            addresses,
            config.quote_chunk_size,
            config.quote_concurrency,
            config.quote_timeout,
        );
        Self {
            pool_provider,
            fetcher,
            config,
            native_currency,
            usd_currency,
        }
    }

    pub async fn get_best_trade(&self, request: TradeRequest) -> Result<Trade, RouterError> {
        let (input, output) = match request.trade_type {
            TradeType::ExactInput => (
                request.amount.currency().clone(),
                request.currency.clone(),
            ),
            TradeType::ExactOutput => (
                request.currency.clone(),
                request.amount.currency().clone(),
            ),
        };
        if input == output {
            return Err(RouterError::InvalidTrade(
                "input and output wrap to the same currency".into(),
            ));
        }

        let pools = self
            .pool_provider
            .get_candidate_pools(&CandidatePoolRequest {
                currency_a: input.clone(),
                currency_b: output.clone(),
                block_number: request.block_number,
                protocols: self.config.protocols.clone(),
                cancel: request.cancel.clone(),
            })
            .await?;
        tracing::debug!(target: "router", pools = pools.len(), "candidate pools fetched");

        let mut routes = compute_all_routes(&input, &output, &pools, self.config.max_hops);
        if request.trade_type == TradeType::ExactOutput {
            routes.retain(|r| r.route_type != RouteType::Mixed);
        }
        if routes.is_empty() {
            return Err(RouterError::NoRouteFound);
        }
        tracing::debug!(target: "router", routes = routes.len(), "candidate routes built");

        let buckets = distribute_amount(
            &request.amount,
            self.config.distribution_percent,
            self.config.max_splits,
        );
        let candidates: Vec<RouteWithAmount> = routes
            .iter()
            .flat_map(|route| {
                buckets.iter().map(move |(percent, amount)| RouteWithAmount {
                    route: route.clone(),
                    amount: amount.clone(),
                    percent: *percent,
                })
            })
            .collect();

        let quotes = self
            .fetcher
            .fetch_quotes(
                &candidates,
                request.trade_type,
                request.block_number,
                &request.cancel,
            )
            .await?;

        let quote_currency = match request.trade_type {
            TradeType::ExactInput => output.clone(),
            TradeType::ExactOutput => input.clone(),
        };
        let gas_model = GasModel::new(GasModelParams {
            gas_price_wei: request.gas_price_wei,
            native_currency: self.native_currency.clone(),
            quote_currency,
            usd_currency: self.usd_currency.clone(),
            native_usd_price: request.native_usd_price,
            quote_usd_price: request.quote_usd_price,
        });

        let quoted: Vec<_> = candidates
            .iter()
            .zip(quotes)
            .filter_map(|(candidate, quote)| {
                quote.map(|q| gas_model.quote_route(candidate, &q, request.trade_type))
            })
            .collect();
        if quoted.is_empty() {
            return Err(RouterError::NoRouteFound);
        }

        let combination =
            get_best_route_combination(quoted, request.trade_type, self.config.max_splits)
                .ok_or(RouterError::NoRouteFound)?;

        let trade = Trade::from_routes(request.trade_type, combination, request.block_number)?;
        if trade.output_amount.is_zero() || trade.input_amount.is_zero() {
            return Err(RouterError::NoRouteFound);
        }
        tracing::info!(
            target: "router",
            splits = trade.routes.len(),
            gas = trade.gas_estimate,
            "best trade selected"
        );
        Ok(trade)
    }
}
