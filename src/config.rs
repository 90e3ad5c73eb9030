use crate::communities::CommunitySets;
use crate::keywords::Topic;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// One of the three monthly corpora.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Corpus {
    Comments,
    Conversations,
    Submissions,
}

impl Corpus {
    pub const ALL: [Corpus; 3] = [Corpus::Comments, Corpus::Conversations, Corpus::Submissions];

    /// Input directory name under the base dir.
    pub fn dir_name(self) -> &'static str {
        match self {
            Corpus::Comments => "comments",
            Corpus::Conversations => "conversations",
            Corpus::Submissions => "submissions",
        }
    }

    /// Output directory name under the out dir.
    pub fn filtered_dir_name(self) -> &'static str {
        match self {
            Corpus::Comments => "filtered_comments",
            Corpus::Conversations => "filtered_conversations",
            Corpus::Submissions => "filtered_submissions",
        }
    }
}

impl fmt::Display for Corpus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Which date key topic counts are bucketed under.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DateBucketing {
    /// `YYYY_MM` from the file name (one bucket per file).
    #[default]
    FileMonth,
    /// `YYYY-MM-DD` from each record's `timestamp` / `created_utc`.
    RecordDay,
}

/// Which corpus tree the aggregation pass reads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AggregateInput {
    /// The `filtered_*` directories written by the filter pass.
    #[default]
    Filtered,
    /// The raw input directories (neutral mentions are only visible here).
    Raw,
}

/// User-facing options with sensible defaults and builder chaining.
#[derive(Clone, Debug)]
pub struct ETLOptions {
    pub base_dir: PathBuf,            // holds comments/, conversations/, submissions/
    pub out_dir: PathBuf,             // receives filtered_* directories
    pub corpora: Vec<Corpus>,
    pub communities: Option<CommunitySets>,
    pub topics: Vec<Topic>,
    pub bucketing: DateBucketing,
    pub aggregate_input: AggregateInput,
    pub parallelism: Option<usize>,   // Some(N) to set rayon threads, None to use default
    pub file_concurrency: usize,      // monthly files in flight at once
    pub progress: bool,
    pub progress_label: Option<String>,
    pub low_memory_threshold: f64,    // available/total RAM below which workers back off

    // IO tuning
    pub read_buffer_bytes: usize,
    pub write_buffer_bytes: usize,
}

impl Default for ETLOptions {
    fn default() -> Self {
        let base = PathBuf::from(".");
        Self {
            out_dir: base.clone(),
            base_dir: base,
            corpora: Corpus::ALL.to_vec(),
            communities: None,
            topics: Vec::new(),
            bucketing: DateBucketing::FileMonth,
            aggregate_input: AggregateInput::Filtered,
            parallelism: None,
            file_concurrency: 1, // safe default: one month resident at a time
            progress: true,
            progress_label: None,
            low_memory_threshold: 0.05,

            read_buffer_bytes: 256 * 1024,
            write_buffer_bytes: 256 * 1024,
        }
    }
}

impl ETLOptions {
    pub fn with_base_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.base_dir = dir.as_ref().to_path_buf();
        self
    }
    pub fn with_out_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.out_dir = dir.as_ref().to_path_buf();
        self
    }
    pub fn with_corpora(mut self, corpora: &[Corpus]) -> Self {
        let mut v = corpora.to_vec();
        v.sort();
        v.dedup();
        self.corpora = v;
        self
    }
    pub fn with_communities(mut self, communities: CommunitySets) -> Self {
        self.communities = Some(communities);
        self
    }
    pub fn with_topics(mut self, topics: Vec<Topic>) -> Self {
        self.topics = topics;
        self
    }
    pub fn with_bucketing(mut self, bucketing: DateBucketing) -> Self {
        self.bucketing = bucketing;
        self
    }
    pub fn with_aggregate_input(mut self, input: AggregateInput) -> Self {
        self.aggregate_input = input;
        self
    }
    pub fn with_parallelism(mut self, threads: usize) -> Self {
        self.parallelism = Some(threads);
        self
    }
    pub fn with_file_concurrency(mut self, n: usize) -> Self {
        self.file_concurrency = n.max(1);
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
    pub fn with_progress_label(mut self, label: impl Into<String>) -> Self {
        self.progress_label = Some(label.into());
        self
    }
    pub fn with_low_memory_threshold(mut self, frac: f64) -> Self {
        self.low_memory_threshold = frac.clamp(0.0, 1.0);
        self
    }

    pub fn with_io_read_buffer(mut self, bytes: usize) -> Self {
        self.read_buffer_bytes = bytes.max(8 * 1024);
        self
    }
    pub fn with_io_write_buffer(mut self, bytes: usize) -> Self {
        self.write_buffer_bytes = bytes.max(8 * 1024);
        self
    }

    pub fn input_dir(&self, corpus: Corpus) -> PathBuf {
        self.base_dir.join(corpus.dir_name())
    }

    pub fn filtered_dir(&self, corpus: Corpus) -> PathBuf {
        self.out_dir.join(corpus.filtered_dir_name())
    }
}
