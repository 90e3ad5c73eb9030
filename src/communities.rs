//! Community sets (supporting / opposing) and stance classification.

use crate::error::ConfigError;
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stance of a record, decided only by the community it was posted in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stance {
    Supporting,
    Opposing,
    Neutral,
}

impl fmt::Display for Stance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stance::Supporting => "supporting",
            Stance::Opposing => "opposing",
            Stance::Neutral => "neutral",
        };
        f.write_str(s)
    }
}

/// Lowercase, trim, and drop a leading `r/`.
#[inline]
pub fn normalize_str(s: &str) -> String {
    let s = s.trim().to_lowercase();
    if let Some(rest) = s.strip_prefix("r/") { rest.to_string() } else { s }
}

/// The two configured community sets. Names are stored normalized, so
/// membership is case-insensitive and O(1).
///
/// A name may legitimately appear in both sets (e.g. a debate community).
/// Classification resolves that overlap in favour of `Supporting`.
#[derive(Clone, Debug)]
pub struct CommunitySets {
    supporting: AHashSet<String>,
    opposing: AHashSet<String>,
}

impl CommunitySets {
    pub fn new<I, J, S, T>(supporting: I, opposing: J) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let supporting: AHashSet<String> = supporting
            .into_iter()
            .map(|s| normalize_str(s.as_ref()))
            .filter(|s| !s.is_empty())
            .collect();
        let opposing: AHashSet<String> = opposing
            .into_iter()
            .map(|s| normalize_str(s.as_ref()))
            .filter(|s| !s.is_empty())
            .collect();

        if supporting.is_empty() {
            return Err(ConfigError::EmptyCommunitySet { set: "supporting" });
        }
        if opposing.is_empty() {
            return Err(ConfigError::EmptyCommunitySet { set: "opposing" });
        }

        let overlap = supporting.intersection(&opposing).count();
        if overlap > 0 {
            tracing::debug!(overlap, "community sets overlap; supporting takes precedence");
        }
        Ok(Self { supporting, opposing })
    }

    pub fn is_supporting(&self, subreddit: &str) -> bool {
        self.supporting.contains(&normalize_str(subreddit))
    }

    pub fn is_opposing(&self, subreddit: &str) -> bool {
        self.opposing.contains(&normalize_str(subreddit))
    }

    /// True if the community is in either set.
    pub fn contains(&self, subreddit: &str) -> bool {
        let s = normalize_str(subreddit);
        self.supporting.contains(&s) || self.opposing.contains(&s)
    }

    /// Supporting wins ties; a missing subreddit is neutral.
    pub fn classify(&self, subreddit: Option<&str>) -> Stance {
        let Some(sub) = subreddit else { return Stance::Neutral };
        let s = normalize_str(sub);
        if self.supporting.contains(&s) {
            Stance::Supporting
        } else if self.opposing.contains(&s) {
            Stance::Opposing
        } else {
            Stance::Neutral
        }
    }

    /// Names present in both sets, sorted.
    pub fn overlapping(&self) -> Vec<String> {
        let mut v: Vec<String> = self.supporting.intersection(&self.opposing).cloned().collect();
        v.sort();
        v
    }

    pub fn supporting_len(&self) -> usize { self.supporting.len() }
    pub fn opposing_len(&self) -> usize { self.opposing.len() }
}
