// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@on1.no>

use crate::domain::error::RouterError;
use alloy::network::Ethereum;
use alloy::providers::RootProvider;
use url::Url;

pub type HttpProvider = RootProvider<Ethereum>;

pub struct ConnectionFactory;

impl ConnectionFactory {
    pub fn http(rpc_url: &str) -> Result<HttpProvider, RouterError> {
        let url = Url::parse(rpc_url)
            .map_err(|e| RouterError::Config(format!("Invalid RPC URL: {}", e)))?;
        Ok(RootProvider::new_http(url))
    }
}
