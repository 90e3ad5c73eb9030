//! Run summaries. Per-record and per-file problems never abort a run; they are
//! counted here and returned to the caller.

use crate::config::Corpus;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// File name has no `YYYY_MM` suffix (month bucketing only).
    NoDateInName,
    /// File could not be opened.
    Unreadable(String),
    /// File is not a well-formed JSON array.
    Malformed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoDateInName => f.write_str("no YYYY_MM date in file name"),
            SkipReason::Unreadable(e) => write!(f, "unreadable: {e}"),
            SkipReason::Malformed(e) => write!(f, "malformed: {e}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FileSkip {
    pub corpus: Corpus,
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Outcome of the filter pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FilterReport {
    pub files_written: u64,
    pub records_read: u64,
    pub records_kept: u64,
    pub records_dropped: u64,
    pub records_missing_subreddit: u64,
    pub records_not_object: u64,
    pub files_skipped: Vec<FileSkip>,
}

impl FilterReport {
    pub fn merge(&mut self, other: FilterReport) {
        self.files_written += other.files_written;
        self.records_read += other.records_read;
        self.records_kept += other.records_kept;
        self.records_dropped += other.records_dropped;
        self.records_missing_subreddit += other.records_missing_subreddit;
        self.records_not_object += other.records_not_object;
        self.files_skipped.extend(other.files_skipped);
    }

    pub fn records_skipped(&self) -> u64 {
        self.records_missing_subreddit + self.records_not_object
    }
}

/// Outcome of the aggregation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AggregateReport {
    pub files_read: u64,
    pub records_read: u64,
    /// Records that matched at least one topic.
    pub records_matched: u64,
    /// Records with neither subreddit nor text, or not JSON objects.
    pub records_malformed: u64,
    /// Records without a usable timestamp under day bucketing.
    pub records_undated: u64,
    pub files_skipped: Vec<FileSkip>,
}

impl AggregateReport {
    pub fn merge(&mut self, other: AggregateReport) {
        self.files_read += other.files_read;
        self.records_read += other.records_read;
        self.records_matched += other.records_matched;
        self.records_malformed += other.records_malformed;
        self.records_undated += other.records_undated;
        self.files_skipped.extend(other.files_skipped);
    }
}
