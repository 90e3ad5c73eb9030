//! Small reducers over per-date count maps.

use std::collections::BTreeMap;

pub type DateCounts = BTreeMap<String, u64>;

#[inline]
pub fn bump(counts: &mut DateCounts, date: &str) {
    if let Some(n) = counts.get_mut(date) {
        *n += 1;
    } else {
        counts.insert(date.to_string(), 1);
    }
}

/// Add `part` into `total` key by key. Summation, so merge order is irrelevant.
pub fn merge_counts(total: &mut DateCounts, part: DateCounts) {
    for (k, v) in part {
        *total.entry(k).or_insert(0) += v;
    }
}

pub fn sum_counts(counts: &DateCounts) -> u64 {
    counts.values().sum()
}
