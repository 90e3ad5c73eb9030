//! Community filter: the retention predicate applied to every raw record.

use crate::communities::CommunitySets;
use crate::json_utils::subreddit;
use serde_json::Value;

/// Retain a record iff its subreddit is in the supporting or the opposing set.
/// A missing, null or non-string `subreddit` simply fails the test.
pub fn keep(record: &Value, communities: &CommunitySets) -> bool {
    subreddit(record).is_some_and(|s| communities.contains(s))
}

/// Why a record was or was not retained; feeds the run report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Keep,
    Drop,
    MissingSubreddit,
    NotAnObject,
}

pub fn verdict(record: &Value, communities: &CommunitySets) -> Verdict {
    if !record.is_object() {
        return Verdict::NotAnObject;
    }
    match subreddit(record) {
        None => Verdict::MissingSubreddit,
        Some(s) if communities.contains(s) => Verdict::Keep,
        Some(_) => Verdict::Drop,
    }
}
