// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::currency::CurrencyAmount;

/// Partition a trade into equal percentage buckets of `distribution_percent`
/// each, always including the full 100% bucket. Splitting is disabled when
/// `max_splits` is 0 or 1: the whole trade is one bucket.
pub fn distribute_amount(
    amount: &CurrencyAmount,
    distribution_percent: u32,
    max_splits: u32,
) -> Vec<(u32, CurrencyAmount)> {
    if max_splits <= 1 {
        return vec![(100, amount.clone())];
    }

    let step = distribution_percent.clamp(1, 100);
    let mut buckets = Vec::with_capacity((100 / step + 1) as usize);
    let mut percent = step;
    while percent < 100 {
        buckets.push((percent, amount.percent_of(percent)));
        percent += step;
    }
    buckets.push((100, amount.clone()));
    buckets
}
