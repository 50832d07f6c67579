// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use crate::domain::error::RouterError;
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use std::future::Future;
use std::time::Duration;

/// Race a future against a timer. The timeout surfaces as
/// `Operation timed out after {ms}ms`.
pub async fn with_timeout<T, F>(fut: F, timeout: Duration) -> Result<T, RouterError>
where
    F: Future<Output = Result<T, RouterError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(res) => res,
        Err(_) => Err(RouterError::Timeout(timeout.as_millis() as u64)),
    }
}

/// Resolve with the first future that fulfills; the rest are dropped. When
/// every future rejects, the failures are aggregated into a single
/// `AllRejected` error listing each message.
pub async fn take_first_fulfilled<T>(
    futures: Vec<BoxFuture<'_, Result<T, RouterError>>>,
) -> Result<T, RouterError> {
    if futures.is_empty() {
        return Err(RouterError::AllRejected("no promises supplied".into()));
    }
    let mut pending: FuturesUnordered<_> = futures.into_iter().collect();
    let mut failures = Vec::new();
    while let Some(result) = pending.next().await {
        match result {
            Ok(value) => return Ok(value),
            Err(e) => failures.push(e.to_string()),
        }
    }
    Err(RouterError::AllRejected(failures.join("; ")))
}
