// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RouterError {
    #[error("Cannot find a valid swap route")]
    NoRouteFound,

    #[error("Operation timed out after {0}ms")]
    Timeout(u64),

    #[error("Invalid pool type: {0}")]
    InvalidPoolType(String),

    #[error("Invalid route: {0}")]
    InvalidRoute(String),

    #[error("Invalid trade: {0}")]
    InvalidTrade(String),

    #[error("Currency mismatch: {0}")]
    CurrencyMismatch(String),

    #[error("All promises rejected: {0}")]
    AllRejected(String),

    #[error("Routing request cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Connection failed to endpoint: {0}")]
    Connection(String),

    #[error("Remote cache error: {0}")]
    RemoteCache(String),

    /// A failure resolved by a shared in-flight attempt; Display delegates
    /// to the original error so every waiter sees the underlying message.
    #[error("{0}")]
    Shared(Arc<RouterError>),

    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

impl From<config::ConfigError> for RouterError {
    fn from(err: config::ConfigError) -> Self {
        RouterError::Config(err.to_string())
    }
}
