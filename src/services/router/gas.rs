// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::currency::{Currency, CurrencyAmount};
use crate::domain::pool::PoolType;
use crate::domain::route::{Route, RouteWithAmount, RouteWithQuote};
use crate::domain::trade::TradeType;
use crate::services::router::quote::RouteQuote;
use alloy::primitives::U256;

// Heuristic per-hop swap costs by pool kind, used when the quoter returns
// no gas estimate of its own.
const BASE_SWAP_GAS: u64 = 30_000;
const V2_HOP_GAS: u64 = 135_000;
const V3_HOP_GAS: u64 = 160_000;
const STABLE_HOP_GAS: u64 = 180_000;
const INFINITY_CL_HOP_GAS: u64 = 145_000;
const INFINITY_BIN_HOP_GAS: u64 = 125_000;

const WEI_PER_NATIVE: f64 = 1e18;

#[derive(Debug, Clone)]
pub struct GasModelParams {
    pub gas_price_wei: U256,
    /// Currency gas is paid in (its wrapped form prices the wei cost).
    pub native_currency: Currency,
    /// Currency quotes are denominated in: the output currency for
    /// exact-input trades, the input currency for exact-output.
    pub quote_currency: Currency,
    /// Currency USD figures are denominated in (a stablecoin).
    pub usd_currency: Currency,
    pub native_usd_price: f64,
    pub quote_usd_price: f64,
}

#[derive(Debug, Clone)]
pub struct GasCost {
    pub gas_units: u64,
    pub wei: U256,
    pub in_quote: CurrencyAmount,
    pub in_usd: CurrencyAmount,
}

/// Converts per-route gas-unit estimates into quote-currency and USD terms
/// so raw quotes can be compared net of execution cost.
pub struct GasModel {
    params: GasModelParams,
}

impl GasModel {
    pub fn new(params: GasModelParams) -> Self {
        Self { params }
    }

    pub fn estimate_gas_units(route: &Route) -> u64 {
        route
            .pools
            .iter()
            .map(|pool| match pool.pool_type() {
                PoolType::V2 => V2_HOP_GAS,
                PoolType::V3 => V3_HOP_GAS,
                PoolType::Stable => STABLE_HOP_GAS,
                PoolType::InfinityCl => INFINITY_CL_HOP_GAS,
                PoolType::InfinityBin => INFINITY_BIN_HOP_GAS,
            })
            .fold(BASE_SWAP_GAS, u64::saturating_add)
    }

    pub fn cost(&self, route: &Route, quoted_gas_estimate: u64) -> GasCost {
        let gas_units = if quoted_gas_estimate > 0 {
            quoted_gas_estimate
        } else {
            Self::estimate_gas_units(route)
        };
        let wei = U256::from(gas_units).saturating_mul(self.params.gas_price_wei);

        let native_units = u256_to_f64(wei) / WEI_PER_NATIVE;
        let usd = native_units * self.params.native_usd_price;
        let quote_units = if self.params.quote_usd_price > 0.0 {
            usd / self.params.quote_usd_price
        } else {
            0.0
        };

        GasCost {
            gas_units,
            wei,
            in_quote: scaled_amount(&self.params.quote_currency, quote_units),
            in_usd: scaled_amount(&self.params.usd_currency, usd),
        }
    }

    /// Attach a decoded quote to its route, computing the gas-adjusted form
    /// used by the combination search. Exact-input quotes are discounted by
    /// the gas cost; exact-output quotes are inflated by it.
    pub fn quote_route(
        &self,
        with_amount: &RouteWithAmount,
        quote: &RouteQuote,
        trade_type: TradeType,
    ) -> RouteWithQuote {
        let cost = self.cost(&with_amount.route, quote.gas_estimate);
        let raw = CurrencyAmount::new(self.params.quote_currency.clone(), quote.raw);
        let adjusted_quotient = match trade_type {
            TradeType::ExactInput => quote.raw.saturating_sub(cost.in_quote.quotient()),
            TradeType::ExactOutput => quote.raw.saturating_add(cost.in_quote.quotient()),
        };

        RouteWithQuote {
            route: with_amount.route.clone(),
            amount: with_amount.amount.clone(),
            percent: with_amount.percent,
            quote: raw,
            quote_adjusted_for_gas: CurrencyAmount::new(
                self.params.quote_currency.clone(),
                adjusted_quotient,
            ),
            gas_estimate: cost.gas_units,
            gas_cost_in_quote: cost.in_quote,
            gas_cost_in_usd: cost.in_usd,
        }
    }
}

fn u256_to_f64(value: U256) -> f64 {
    u128::try_from(value).map(|v| v as f64).unwrap_or(f64::MAX)
}

fn scaled_amount(currency: &Currency, units: f64) -> CurrencyAmount {
    let scaled = units * 10f64.powi(currency.decimals() as i32);
    let quotient = if scaled.is_finite() && scaled > 0.0 {
        U256::from(scaled as u128)
    } else {
        U256::ZERO
    };
    CurrencyAmount::new(currency.clone(), quotient)
}
