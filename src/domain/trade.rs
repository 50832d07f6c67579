// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::currency::CurrencyAmount;
use crate::domain::error::RouterError;
use crate::domain::route::RouteWithQuote;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeType {
    ExactInput,
    ExactOutput,
}

/// The final product of one routing request: the selected route split with
/// aggregate amounts and gas estimates. Percents across `routes` sum to 100.
#[derive(Debug, Clone)]
pub struct Trade {
    pub trade_type: TradeType,
    pub routes: Vec<RouteWithQuote>,
    pub input_amount: CurrencyAmount,
    pub output_amount: CurrencyAmount,
    pub gas_estimate: u64,
    pub gas_estimate_in_usd: CurrencyAmount,
    pub block_number: Option<u64>,
}

impl Trade {
    /// Assembles a trade from a selected combination, summing per-route
    /// amounts and quotes. For exact-input trades the quotes are output
    /// amounts; for exact-output they are input amounts.
    pub fn from_routes(
        trade_type: TradeType,
        routes: Vec<RouteWithQuote>,
        block_number: Option<u64>,
    ) -> Result<Self, RouterError> {
        let first = routes
            .first()
            .ok_or_else(|| RouterError::InvalidTrade("no routes selected".into()))?;

        let percent_total: u32 = routes.iter().map(|r| r.percent).sum();
        if percent_total != 100 {
            return Err(RouterError::InvalidTrade(format!(
                "route percents sum to {percent_total}"
            )));
        }

        let mut amount_total = CurrencyAmount::zero(first.amount.currency().clone());
        let mut quote_total = CurrencyAmount::zero(first.quote.currency().clone());
        let mut usd_total = CurrencyAmount::zero(first.gas_cost_in_usd.currency().clone());
        let mut gas_estimate = 0u64;
        for route in &routes {
            amount_total = amount_total.checked_add(&route.amount)?;
            quote_total = quote_total.checked_add(&route.quote)?;
            usd_total = usd_total.checked_add(&route.gas_cost_in_usd)?;
            gas_estimate = gas_estimate.saturating_add(route.gas_estimate);
        }

        let (input_amount, output_amount) = match trade_type {
            TradeType::ExactInput => (amount_total, quote_total),
            TradeType::ExactOutput => (quote_total, amount_total),
        };

        Ok(Self {
            trade_type,
            routes,
            input_amount,
            output_amount,
            gas_estimate,
            gas_estimate_in_usd: usd_total,
            block_number,
        })
    }
}
