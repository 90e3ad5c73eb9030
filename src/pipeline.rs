use crate::aggregate::{bucket_for, Aggregator, Ingested, TopicTally};
use crate::communities::CommunitySets;
use crate::concurrency::fold_files_limited;
use crate::config::{AggregateInput, Corpus, DateBucketing, ETLOptions};
use crate::error::ConfigError;
use crate::filters::{verdict, Verdict};
use crate::json_array::{for_each_record, ArrayReadError, JsonArrayWriter};
use crate::keywords::{validate_topics, Topic};
use crate::paths::{plan_files, FileJob};
use crate::progress::maybe_progress;
use crate::report::{AggregateReport, FileSkip, FilterReport, SkipReason};
use crate::topic::TopicSummary;
use crate::util::{create_with_backoff, init_tracing_once, remove_with_backoff, replace_file_atomic_backoff};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Clone, Default)]
pub struct StanceETL {
    pub(crate) opts: ETLOptions,
}

/// Result of an aggregation pass: one summary per configured topic, in
/// configuration order, plus what was skipped along the way.
#[derive(Clone, Debug, Serialize)]
pub struct TopicRun {
    pub topics: Vec<TopicSummary>,
    pub report: AggregateReport,
}

impl TopicRun {
    pub fn topic(&self, name: &str) -> Option<&TopicSummary> {
        self.topics.iter().find(|t| t.name == name)
    }
}

impl StanceETL {
    pub fn new() -> Self {
        Self { opts: ETLOptions::default() }
    }

    // -------- Builder methods --------
    pub fn base_dir(mut self, dir: impl AsRef<Path>) -> Self { self.opts = self.opts.with_base_dir(dir); self }
    pub fn out_dir(mut self, dir: impl AsRef<Path>) -> Self { self.opts = self.opts.with_out_dir(dir); self }
    pub fn corpora(mut self, corpora: &[Corpus]) -> Self { self.opts = self.opts.with_corpora(corpora); self }
    pub fn communities(mut self, sets: CommunitySets) -> Self { self.opts = self.opts.with_communities(sets); self }
    pub fn topics(mut self, topics: Vec<Topic>) -> Self { self.opts = self.opts.with_topics(topics); self }
    pub fn bucketing(mut self, bucketing: DateBucketing) -> Self { self.opts = self.opts.with_bucketing(bucketing); self }
    pub fn aggregate_input(mut self, input: AggregateInput) -> Self { self.opts = self.opts.with_aggregate_input(input); self }
    pub fn parallelism(mut self, threads: usize) -> Self { self.opts = self.opts.with_parallelism(threads); self }
    pub fn file_concurrency(mut self, n: usize) -> Self { self.opts = self.opts.with_file_concurrency(n); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    pub fn progress_label(mut self, label: impl Into<String>) -> Self { self.opts = self.opts.with_progress_label(label); self }
    pub fn low_memory_threshold(mut self, frac: f64) -> Self { self.opts = self.opts.with_low_memory_threshold(frac); self }
    pub fn io_read_buffer(mut self, bytes: usize) -> Self { self.opts = self.opts.with_io_read_buffer(bytes); self }
    pub fn io_write_buffer(mut self, bytes: usize) -> Self { self.opts = self.opts.with_io_write_buffer(bytes); self }

    pub fn options(&self) -> &ETLOptions { &self.opts }

    // -------- Operations --------

    /// Copy every input file to its `filtered_*` counterpart (same file name),
    /// keeping only records whose subreddit is in a configured community set.
    ///
    /// Bad files are skipped and reported, and any output left from an earlier
    /// run under the same name is removed. Only an unusable output directory
    /// aborts the run.
    pub fn filter_corpora(&self) -> Result<FilterReport> {
        init_tracing_once();
        self.configure_threads();
        let communities = self.require_communities()?;
        self.require_corpora()?;

        let files = plan_files(&self.opts.corpora, |c| self.opts.input_dir(c))?;
        for &corpus in &self.opts.corpora {
            let dir = self.opts.filtered_dir(corpus);
            fs::create_dir_all(&dir).with_context(|| format!("create output dir {}", dir.display()))?;
        }
        tracing::info!(files = files.len(), "planned files for filtering");

        let label = self.opts.progress_label.as_deref().unwrap_or("Filter");
        let pb = maybe_progress(self.opts.progress, files.len() as u64, label);
        let (read_buf, write_buf) = (self.opts.read_buffer_bytes, self.opts.write_buffer_bytes);

        let report = fold_files_limited(
            &files,
            self.opts.file_concurrency,
            self.opts.low_memory_threshold,
            FilterReport::default(),
            |job| {
                let out_dir = self.opts.filtered_dir(job.corpus);
                let r = filter_file(job, &out_dir, communities, read_buf, write_buf);
                if let Some(pb) = &pb { pb.inc(1); }
                r
            },
            |report, part| report.merge(part),
        )?;
        if let Some(pb) = pb { pb.finish_with_message("filter done"); }
        tracing::info!(
            files = report.files_written,
            kept = report.records_kept,
            dropped = report.records_dropped,
            skipped_records = report.records_skipped(),
            skipped_files = report.files_skipped.len(),
            "filter pass finished"
        );
        Ok(report)
    }

    /// Count topic references by stance and date bucket across all selected
    /// corpora. Files are tallied independently (bounded parallel) and merged
    /// by summation.
    pub fn aggregate_topics(&self) -> Result<TopicRun> {
        init_tracing_once();
        self.configure_threads();
        let communities = self.require_communities()?;
        self.require_corpora()?;
        validate_topics(&self.opts.topics)?;
        let topics = self.opts.topics.as_slice();

        let files = match self.opts.aggregate_input {
            AggregateInput::Filtered => plan_files(&self.opts.corpora, |c| self.opts.filtered_dir(c))?,
            AggregateInput::Raw => plan_files(&self.opts.corpora, |c| self.opts.input_dir(c))?,
        };
        tracing::info!(files = files.len(), topics = topics.len(), "planned files for aggregation");

        let label = self.opts.progress_label.as_deref().unwrap_or("Aggregate");
        let pb = maybe_progress(self.opts.progress, files.len() as u64, label);
        let bucketing = self.opts.bucketing;
        let read_buf = self.opts.read_buffer_bytes;

        let (total, report) = fold_files_limited(
            &files,
            self.opts.file_concurrency,
            self.opts.low_memory_threshold,
            (TopicTally::new(topics, communities), AggregateReport::default()),
            |job| {
                let r = tally_file(job, topics, communities, bucketing, read_buf);
                if let Some(pb) = &pb { pb.inc(1); }
                r
            },
            |(total, report), (tally, rep)| {
                total.merge(tally);
                report.merge(rep);
            },
        )?;
        if let Some(pb) = pb { pb.finish_with_message("aggregate done"); }
        tracing::info!(
            files = report.files_read,
            records = report.records_read,
            matched = report.records_matched,
            malformed = report.records_malformed,
            undated = report.records_undated,
            skipped_files = report.files_skipped.len(),
            "aggregation finished"
        );
        Ok(TopicRun { topics: total.finish(), report })
    }

    /// `aggregate_topics`, then write the summaries to `out_path` as a JSON array.
    /// The file is written next to `out_path` first and moved into place whole.
    pub fn aggregate_topics_to_json(&self, out_path: &Path, pretty: bool) -> Result<TopicRun> {
        let run = self.aggregate_topics()?;
        let dir = match out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
                parent.to_path_buf()
            }
            None => PathBuf::from("."),
        };
        let name = out_path
            .file_name()
            .with_context(|| format!("{} has no file name", out_path.display()))?
            .to_string_lossy();
        let tmp_path = dir.join(format!(".{name}.part"));

        let written = write_summaries(&tmp_path, &run.topics, pretty, self.opts.write_buffer_bytes)
            .and_then(|()| replace_file_atomic_backoff(&tmp_path, out_path));
        if let Err(e) = written {
            remove_with_backoff(&tmp_path, 16, 50)?;
            return Err(e.context(format!("write {}", out_path.display())));
        }
        tracing::info!(path = %out_path.display(), topics = run.topics.len(), "wrote topic summaries");
        Ok(run)
    }

    fn configure_threads(&self) {
        if let Some(n) = self.opts.parallelism {
            if n > 0 { rayon::ThreadPoolBuilder::new().num_threads(n).build_global().ok(); }
        }
    }

    fn require_communities(&self) -> Result<&CommunitySets, ConfigError> {
        self.opts.communities.as_ref().ok_or(ConfigError::MissingCommunities)
    }

    fn require_corpora(&self) -> Result<(), ConfigError> {
        if self.opts.corpora.is_empty() { Err(ConfigError::NoCorpora) } else { Ok(()) }
    }
}

fn write_summaries(path: &Path, topics: &[TopicSummary], pretty: bool, write_buf: usize) -> Result<()> {
    let file = create_with_backoff(path, 16, 50).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::with_capacity(write_buf, file);
    if pretty {
        serde_json::to_writer_pretty(&mut w, topics)?;
    } else {
        serde_json::to_writer(&mut w, topics)?;
    }
    w.flush()?;
    Ok(())
}

fn skip_reason(e: &ArrayReadError) -> Option<SkipReason> {
    match e {
        ArrayReadError::Open { source, .. } => Some(SkipReason::Unreadable(source.to_string())),
        ArrayReadError::Malformed { source, .. } => Some(SkipReason::Malformed(source.to_string())),
        ArrayReadError::Sink(_) => None,
    }
}

fn file_skip(job: &FileJob, reason: SkipReason) -> FileSkip {
    tracing::warn!(path = %job.path.display(), corpus = %job.corpus, %reason, "skipping file");
    FileSkip { corpus: job.corpus, path: job.path.clone(), reason }
}

/// Filter one file into `out_dir`. The output is assembled on a temp path and
/// only promoted once the whole input parsed.
fn filter_file(
    job: &FileJob,
    out_dir: &Path,
    communities: &CommunitySets,
    read_buf: usize,
    write_buf: usize,
) -> Result<FilterReport> {
    let name = job.file_name();
    let out_path = out_dir.join(name);
    let tmp_path = out_dir.join(format!(".{name}.part"));
    let mut writer = JsonArrayWriter::create(&tmp_path, write_buf)
        .with_context(|| format!("create {}", tmp_path.display()))?;

    let mut rep = FilterReport::default();
    let res = for_each_record(&job.path, read_buf, |rec| {
        rep.records_read += 1;
        match verdict(&rec, communities) {
            Verdict::Keep => {
                writer.write_record(&rec)?;
                rep.records_kept += 1;
            }
            Verdict::Drop => rep.records_dropped += 1,
            Verdict::MissingSubreddit => rep.records_missing_subreddit += 1,
            Verdict::NotAnObject => rep.records_not_object += 1,
        }
        Ok(())
    });

    match res {
        Ok(_) => {
            writer
                .finish_atomic(&out_path)
                .with_context(|| format!("write {}", out_path.display()))?;
            if rep.records_skipped() > 0 {
                tracing::warn!(
                    path = %job.path.display(),
                    missing_subreddit = rep.records_missing_subreddit,
                    not_object = rep.records_not_object,
                    "skipped records without a usable subreddit"
                );
            }
            rep.files_written = 1;
            Ok(rep)
        }
        Err(e) => {
            writer.abandon()?;
            match skip_reason(&e) {
                Some(reason) => {
                    // no filtered output survives for a skipped month
                    if out_path.exists() {
                        remove_with_backoff(&out_path, 16, 50)?;
                        tracing::warn!(path = %out_path.display(), "removed stale filtered output");
                    }
                    Ok(FilterReport { files_skipped: vec![file_skip(job, reason)], ..Default::default() })
                }
                None => Err(anyhow::Error::new(e).context(format!("filtering {}", job.path.display()))),
            }
        }
    }
}

/// Tally one file. A file that cannot be read contributes nothing, not even
/// the records parsed before the error.
fn tally_file<'a>(
    job: &FileJob,
    topics: &'a [Topic],
    communities: &'a CommunitySets,
    bucketing: DateBucketing,
    read_buf: usize,
) -> Result<(TopicTally<'a>, AggregateReport)> {
    let skipped = |reason: SkipReason| {
        let rep = AggregateReport { files_skipped: vec![file_skip(job, reason)], ..Default::default() };
        (TopicTally::new(topics, communities), rep)
    };

    if bucketing == DateBucketing::FileMonth && job.ym.is_none() {
        return Ok(skipped(SkipReason::NoDateInName));
    }

    let mut tally = TopicTally::new(topics, communities);
    let mut rep = AggregateReport::default();
    let res = for_each_record(&job.path, read_buf, |rec| {
        rep.records_read += 1;
        if !rec.is_object() {
            rep.records_malformed += 1;
            return Ok(());
        }
        let Some(bucket) = bucket_for(&rec, bucketing, job.ym) else {
            rep.records_undated += 1;
            return Ok(());
        };
        match tally.ingest_record(&bucket, &rec) {
            Ingested::Malformed => rep.records_malformed += 1,
            Ingested::Matched(n) if n > 0 => rep.records_matched += 1,
            Ingested::Matched(_) => {}
        }
        Ok(())
    });

    match res {
        Ok(_) => {
            rep.files_read = 1;
            Ok((tally, rep))
        }
        Err(e) => match skip_reason(&e) {
            Some(reason) => Ok(skipped(reason)),
            None => Err(anyhow::Error::new(e).context(format!("aggregating {}", job.path.display()))),
        },
    }
}
