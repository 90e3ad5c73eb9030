//! Topic aggregation: keyword match + stance classification, accumulated per
//! date bucket. `TopicTally` is the streaming, mergeable form used by the
//! pipeline; `aggregate` is the one-shot form over in-memory buckets.

use crate::communities::CommunitySets;
use crate::config::DateBucketing;
use crate::date::{day_key_from_epoch, YearMonth};
use crate::json_utils::{subreddit, text_lower, timestamp_secs};
use crate::keywords::Topic;
use crate::topic::TopicSummary;
use serde_json::Value;
use std::collections::BTreeMap;

/// Mergeable aggregation state. Partial states built on different workers are
/// combined with `merge`; combination must be order-independent.
pub trait Aggregator: Send {
    fn ingest(&mut self, bucket: &str, record: &Value);
    fn merge(&mut self, other: Self);
}

/// What ingesting one record did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ingested {
    /// Counted for this many topics (0 when no keyword matched).
    Matched(usize),
    /// Neither a subreddit nor any text; ignored.
    Malformed,
}

/// Running per-topic summaries for one configuration.
pub struct TopicTally<'a> {
    topics: &'a [Topic],
    communities: &'a CommunitySets,
    summaries: Vec<TopicSummary>,
    malformed: u64,
}

impl<'a> TopicTally<'a> {
    pub fn new(topics: &'a [Topic], communities: &'a CommunitySets) -> Self {
        let summaries = topics.iter().map(|t| TopicSummary::new(t.name.clone())).collect();
        Self { topics, communities, summaries, malformed: 0 }
    }

    pub fn ingest_record(&mut self, bucket: &str, record: &Value) -> Ingested {
        let sub = subreddit(record);
        let text = text_lower(record);
        if sub.is_none() && text.is_empty() {
            self.malformed += 1;
            return Ingested::Malformed;
        }
        if text.is_empty() {
            return Ingested::Matched(0);
        }

        let stance = self.communities.classify(sub);
        let mut hits = 0;
        for (topic, summary) in self.topics.iter().zip(self.summaries.iter_mut()) {
            if topic.keywords.matches_lower(&text) {
                summary.add_reference(bucket, stance);
                hits += 1;
            }
        }
        Ingested::Matched(hits)
    }

    pub fn malformed(&self) -> u64 { self.malformed }

    pub fn summaries(&self) -> &[TopicSummary] { &self.summaries }

    /// Summaries in topic order.
    pub fn finish(self) -> Vec<TopicSummary> { self.summaries }
}

impl Aggregator for TopicTally<'_> {
    fn ingest(&mut self, bucket: &str, record: &Value) {
        self.ingest_record(bucket, record);
    }

    fn merge(&mut self, other: Self) {
        for (mine, theirs) in self.summaries.iter_mut().zip(other.summaries) {
            mine.merge(theirs);
        }
        self.malformed += other.malformed;
    }
}

/// Date key for a record: the file's month in `FileMonth` mode, or the
/// record's own UTC day in `RecordDay` mode. `None` means the record (or the
/// whole file) has no usable date and must not be counted.
pub fn bucket_for(record: &Value, bucketing: DateBucketing, file_month: Option<YearMonth>) -> Option<String> {
    match bucketing {
        DateBucketing::FileMonth => file_month.map(|ym| ym.bucket_key()),
        DateBucketing::RecordDay => timestamp_secs(record).and_then(day_key_from_epoch),
    }
}

/// One pass over already-bucketed records. Returns one summary per topic, in
/// the order of `topics`. Malformed records are skipped.
pub fn aggregate(
    topics: &[Topic],
    records_by_date: &BTreeMap<String, Vec<Value>>,
    communities: &CommunitySets,
) -> Vec<TopicSummary> {
    let mut tally = TopicTally::new(topics, communities);
    for (date, records) in records_by_date {
        for record in records {
            tally.ingest(date, record);
        }
    }
    if tally.malformed() > 0 {
        tracing::warn!(skipped = tally.malformed(), "skipped malformed records during aggregation");
    }
    tally.finish()
}
