// SPDX-License-Identifier: MIT
// Exercises the full routing pipeline against in-memory collaborators: a
// canned pool provider and a multicall stub that answers quoter calls by
// decoding the calldata it receives. No live chain is required.

use alloy::primitives::aliases::U160;
use alloy::primitives::{Address, U256};
use alloy::sol_types::{SolCall, SolValue};
use async_trait::async_trait;
use oxidity_router::network::multicall::{CallOutcome, MulticallProvider, QuoteCall};
use oxidity_router::network::quoters::{MixedQuoter, QuoterAddresses, V3Quoter};
use oxidity_router::services::router::compute_all_routes;
use oxidity_router::{
    CandidatePoolRequest, Currency, CurrencyAmount, Pool, PoolProvider, RouteType, RouterError,
    TradeConfig, TradeRequest, TradeRouter, TradeType,
};
use oxidity_router::domain::pool::{V2Pool, V3Pool};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn usdc() -> Currency {
    Currency::token(1, Address::from([0x01; 20]), 6, "USDC")
}

fn weth() -> Currency {
    Currency::token(1, Address::from([0x02; 20]), 18, "WETH")
}

fn tkn() -> Currency {
    // Six decimals keeps the stubbed quote magnitudes aligned with the
    // USDC input side.
    Currency::token(1, Address::from([0x03; 20]), 6, "TKN")
}

fn candidate_pools() -> Vec<Pool> {
    vec![
        Pool::V3(V3Pool {
            address: Address::from([0x10; 20]),
            token0: usdc(),
            token1: weth(),
            fee: 500,
            liquidity: 1_000_000,
            sqrt_price_x96: U256::from(1u64) << 96,
            tick: 0,
        }),
        Pool::V3(V3Pool {
            address: Address::from([0x11; 20]),
            token0: weth(),
            token1: tkn(),
            fee: 3000,
            liquidity: 1_000_000,
            sqrt_price_x96: U256::from(1u64) << 96,
            tick: 0,
        }),
        Pool::V2(V2Pool {
            address: Address::from([0x12; 20]),
            reserve0: CurrencyAmount::new(usdc(), U256::from(5_000_000_000u64)),
            reserve1: CurrencyAmount::new(tkn(), U256::from(5_000_000_000u64)),
        }),
    ]
}

fn quoter_addresses() -> QuoterAddresses {
    QuoterAddresses {
        multicall: Address::from([0xa0; 20]),
        v3_quoter: Address::from([0xa1; 20]),
        cl_quoter: Address::from([0xa2; 20]),
        bin_quoter: Address::from([0xa3; 20]),
        mixed_quoter: Address::from([0xa4; 20]),
    }
}

struct CannedPools(Vec<Pool>);

#[async_trait]
impl PoolProvider for CannedPools {
    async fn get_candidate_pools(
        &self,
        _request: &CandidatePoolRequest,
    ) -> Result<Vec<Pool>, RouterError> {
        Ok(self.0.clone())
    }
}

/// Quotes 97% of the input through the V3 quoter and 99% through the mixed
/// quoter, so the direct V2 route should win. `fail_v3` turns every V3
/// quoter call into a reverted multicall slot.
struct StubMulticall {
    fail_v3: bool,
}

#[async_trait]
impl MulticallProvider for StubMulticall {
    async fn multicall(
        &self,
        calls: &[QuoteCall],
        _block_number: Option<u64>,
    ) -> Result<Vec<CallOutcome>, RouterError> {
        Ok(calls
            .iter()
            .map(|call| {
                if let Ok(decoded) = V3Quoter::quoteExactInputCall::abi_decode(&call.calldata) {
                    if self.fail_v3 {
                        return CallOutcome::Failure("reverted".into());
                    }
                    let amount_out =
                        decoded.amountIn.saturating_mul(U256::from(97u64)) / U256::from(100u64);
                    let body = (
                        amount_out,
                        Vec::<U160>::new(),
                        Vec::<u32>::new(),
                        U256::from(260_000u64),
                    )
                        .abi_encode_params();
                    return CallOutcome::Success(body.into());
                }
                if let Ok(decoded) =
                    MixedQuoter::quoteMixedExactInputCall::abi_decode(&call.calldata)
                {
                    let amount_out =
                        decoded.amountIn.saturating_mul(U256::from(99u64)) / U256::from(100u64);
                    let body = (amount_out, U256::from(130_000u64)).abi_encode_params();
                    return CallOutcome::Success(body.into());
                }
                CallOutcome::Failure("unexpected call".into())
            })
            .collect())
    }
}

fn router(fail_v3: bool, pools: Vec<Pool>) -> TradeRouter {
    TradeRouter::new(
        Arc::new(CannedPools(pools)),
        Arc::new(StubMulticall { fail_v3 }),
        quoter_addresses(),
        TradeConfig {
            max_hops: 2,
            ..TradeConfig::default()
        },
        Currency::native(1, 18, "ETH", weth().wrapped()),
        usdc(),
    )
}

fn request(amount_quotient: u64) -> TradeRequest {
    TradeRequest {
        amount: CurrencyAmount::new(usdc(), U256::from(amount_quotient)),
        currency: tkn(),
        trade_type: TradeType::ExactInput,
        block_number: Some(21_000_000),
        gas_price_wei: U256::from(1_000_000_000u64),
        native_usd_price: 2_000.0,
        quote_usd_price: 1.0,
        cancel: CancellationToken::new(),
    }
}

#[test]
fn both_candidate_paths_appear_before_quoting() {
    let routes = compute_all_routes(&usdc(), &tkn(), &candidate_pools(), 2);
    assert_eq!(routes.len(), 2);
    assert!(routes
        .iter()
        .any(|r| r.route_type == RouteType::V2 && r.hops() == 1));
    assert!(routes
        .iter()
        .any(|r| r.route_type == RouteType::V3 && r.hops() == 2));
    for route in &routes {
        assert_eq!(route.input(), &usdc());
        assert_eq!(route.output(), &tkn());
    }
}

#[tokio::test]
async fn best_trade_selects_the_direct_route_and_sums_to_hundred() {
    let trade = router(false, candidate_pools())
        .get_best_trade(request(1_000_000_000))
        .await
        .unwrap();

    let percent_total: u32 = trade.routes.iter().map(|r| r.percent).sum();
    assert_eq!(percent_total, 100);
    assert_eq!(trade.trade_type, TradeType::ExactInput);
    assert_eq!(trade.block_number, Some(21_000_000));
    assert_eq!(trade.input_amount.quotient(), U256::from(1_000_000_000u64));
    assert!(trade.output_amount.quotient() > U256::ZERO);

    // The 99%-payout direct route dominates the 97% two-hop path.
    assert!(trade
        .routes
        .iter()
        .all(|r| r.route.route_type == RouteType::V2));

    // Per-route accounting adds up to the trade totals.
    let mut input_sum = U256::ZERO;
    let mut output_sum = U256::ZERO;
    for route in &trade.routes {
        input_sum += route.amount.quotient();
        output_sum += route.quote.quotient();
    }
    assert_eq!(input_sum, trade.input_amount.quotient());
    assert_eq!(output_sum, trade.output_amount.quotient());
}

#[tokio::test]
async fn partial_quote_failure_falls_back_to_surviving_routes() {
    // Every V3 call reverts; the direct V2 route still produces a trade.
    let trade = router(true, candidate_pools())
        .get_best_trade(request(1_000_000_000))
        .await
        .unwrap();
    assert!(trade
        .routes
        .iter()
        .all(|r| r.route.route_type == RouteType::V2));
}

#[tokio::test]
async fn no_pools_surfaces_no_route_found() {
    let err = router(false, Vec::new())
        .get_best_trade(request(1_000))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Cannot find a valid swap route");
}

#[tokio::test]
async fn same_currency_pair_is_rejected_before_routing() {
    let mut req = request(1_000);
    req.currency = usdc();
    let err = router(false, candidate_pools())
        .get_best_trade(req)
        .await
        .unwrap_err();
    assert!(matches!(err, RouterError::InvalidTrade(_)));
}

#[tokio::test]
async fn exact_output_excludes_mixed_routes() {
    // Only a mixed (V2 + V3) path connects USDC to TKN here, so an
    // exact-output request has no candidates at all.
    let weth_tkn_v3 = Pool::V3(V3Pool {
        address: Address::from([0x11; 20]),
        token0: weth(),
        token1: tkn(),
        fee: 3000,
        liquidity: 1_000_000,
        sqrt_price_x96: U256::from(1u64) << 96,
        tick: 0,
    });
    let usdc_weth_v2 = Pool::V2(V2Pool {
        address: Address::from([0x13; 20]),
        reserve0: CurrencyAmount::new(usdc(), U256::from(5_000_000_000u64)),
        reserve1: CurrencyAmount::new(weth(), U256::from(5_000_000_000u64)),
    });

    let mut req = request(1_000_000);
    req.amount = CurrencyAmount::new(tkn(), U256::from(1_000_000u64));
    req.currency = usdc();
    req.trade_type = TradeType::ExactOutput;

    let err = router(false, vec![weth_tkn_v3, usdc_weth_v2])
        .get_best_trade(req)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Cannot find a valid swap route");
}
