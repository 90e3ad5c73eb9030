mod config;
mod date;
mod error;
mod paths;

mod communities;
mod keywords;
mod filters;
mod json_utils;
mod json_array;

mod topic;
mod counting;
mod aggregate;
mod report;

mod progress;
mod concurrency;
mod util;
mod mem;
mod pipeline;

pub mod presets;

pub use crate::config::{AggregateInput, Corpus, DateBucketing, ETLOptions};
pub use crate::date::{day_key_from_epoch, extract_year_month, YearMonth};
pub use crate::error::ConfigError;
pub use crate::pipeline::{StanceETL, TopicRun};

pub use crate::communities::{normalize_str, CommunitySets, Stance};
pub use crate::keywords::{validate_topics, KeywordList, MatchMode, Topic};
pub use crate::filters::{keep, verdict, Verdict};
pub use crate::json_utils::{subreddit, text_lower, timestamp_secs};

pub use crate::topic::TopicSummary;
pub use crate::counting::DateCounts;
pub use crate::aggregate::{aggregate, bucket_for, Aggregator, Ingested, TopicTally};
pub use crate::report::{AggregateReport, FileSkip, FilterReport, SkipReason};

// Streaming JSON array access for application code.
pub use crate::json_array::{for_each_record, ArrayReadError, JsonArrayWriter};

pub use crate::paths::{discover_corpus, FileJob};
pub use crate::progress::set_global_multiprogress;
pub use crate::mem::available_memory_fraction;
pub use crate::util::init_tracing_once;
