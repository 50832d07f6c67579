// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

pub mod lru;
pub mod memo;
pub mod promise;
pub mod retry;

pub use lru::Lru;
pub use memo::{MemoOptions, PersistLayer, TtlMemo};
pub use promise::{take_first_fulfilled, with_timeout};
pub use retry::retry_with_backoff;
