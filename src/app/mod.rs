// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

pub mod config;
pub mod logging;

pub use config::RouterSettings;
pub use logging::setup_logging;
