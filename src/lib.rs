// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

pub mod app;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod services;

pub use domain::{
    Currency, CurrencyAmount, Pool, PoolType, Route, RouteType, RouteWithAmount, RouteWithQuote,
    RouterError, Trade, TradeType,
};
pub use services::router::{
    CachingPoolProvider, CandidatePoolRequest, PoolProvider, TradeConfig, TradeRequest,
    TradeRouter,
};

// Convenience re-export for callers wiring the router by hand.
pub use infrastructure::network;
