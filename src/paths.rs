use crate::config::Corpus;
use crate::date::{extract_year_month, YearMonth};
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One monthly JSON file of one corpus.
#[derive(Clone, Debug)]
pub struct FileJob {
    pub corpus: Corpus,
    /// `None` when the file name carries no `YYYY_MM` suffix.
    pub ym: Option<YearMonth>,
    pub path: PathBuf,
}

impl FileJob {
    pub fn file_name(&self) -> &str {
        self.path.file_name().and_then(|s| s.to_str()).unwrap_or("")
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()).is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

/// List `*.json` files directly inside `dir`, sorted by name.
/// A missing directory yields an empty list; an unreadable one is an error.
pub fn discover_corpus(dir: &Path, corpus: Corpus) -> Result<Vec<FileJob>> {
    let mut jobs = Vec::new();
    if !dir.exists() {
        return Ok(jobs);
    }
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let ent = entry.with_context(|| format!("reading {}", dir.display()))?;
        if !ent.file_type().is_file() || !is_json(ent.path()) {
            continue;
        }
        jobs.push(FileJob {
            corpus,
            ym: extract_year_month(ent.path()),
            path: ent.path().to_path_buf(),
        });
    }
    Ok(jobs)
}

/// Plan jobs for the selected corpora, in corpus order then file name order.
/// `dir_for` maps a corpus to its directory (raw or filtered tree).
/// Fails when none of the selected directories exists.
pub fn plan_files(corpora: &[Corpus], dir_for: impl Fn(Corpus) -> PathBuf) -> Result<Vec<FileJob>> {
    let mut jobs = Vec::new();
    let mut any_dir = false;
    for &corpus in corpora {
        let dir = dir_for(corpus);
        if dir.is_dir() {
            any_dir = true;
        } else {
            tracing::warn!(corpus = %corpus, dir = %dir.display(), "corpus directory not found; skipping");
        }
        jobs.extend(discover_corpus(&dir, corpus)?);
    }
    if !any_dir {
        bail!("none of the configured corpus directories exist");
    }
    Ok(jobs)
}
