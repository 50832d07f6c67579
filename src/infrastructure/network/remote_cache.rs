// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::error::RouterError;
use async_trait::async_trait;
use url::Url;

/// Remote object cache the memoizer can persist resolved values into.
/// Keys follow `{dayBucket}/{name}/{version}/{contentHash}`.
#[async_trait]
pub trait RemoteCacheStore: Send + Sync {
    async fn exists(&self, key: &str) -> Result<bool, RouterError>;
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), RouterError>;
    async fn fetch(&self, key: &str) -> Result<Vec<u8>, RouterError>;
}

/// HTTP HEAD/POST/GET against a fixed object-cache endpoint.
pub struct HttpRemoteCache {
    base: Url,
    client: reqwest::Client,
}

impl HttpRemoteCache {
    pub fn new(base: Url) -> Self {
        Self {
            base,
            client: reqwest::Client::new(),
        }
    }

    fn object_url(&self, key: &str) -> Result<Url, RouterError> {
        self.base
            .join(key)
            .map_err(|e| RouterError::RemoteCache(format!("bad object key {key}: {e}")))
    }
}

#[async_trait]
impl RemoteCacheStore for HttpRemoteCache {
    async fn exists(&self, key: &str) -> Result<bool, RouterError> {
        let url = self.object_url(key)?;
        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|e| RouterError::RemoteCache(format!("HEAD {key} failed: {e}")))?;
        Ok(response.status().is_success())
    }

    async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), RouterError> {
        let url = self.object_url(key)?;
        let response = self
            .client
            .post(url)
            .body(body)
            .send()
            .await
            .map_err(|e| RouterError::RemoteCache(format!("POST {key} failed: {e}")))?;
        if !response.status().is_success() {
            return Err(RouterError::RemoteCache(format!(
                "POST {key} returned {}",
                response.status()
            )));
        }
        Ok(())
    }

    async fn fetch(&self, key: &str) -> Result<Vec<u8>, RouterError> {
        let url = self.object_url(key)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RouterError::RemoteCache(format!("GET {key} failed: {e}")))?;
        if !response.status().is_success() {
            return Err(RouterError::RemoteCache(format!(
                "GET {key} returned {}",
                response.status()
            )));
        }
        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| RouterError::RemoteCache(format!("GET {key} body failed: {e}")))
    }
}
