//! Streaming access to corpus files, which are single JSON arrays of records.
//! The reader hands out one element at a time so a month never has to sit in
//! memory as a whole; the writer emits an array incrementally to a temp path and
//! promotes it atomically.

use crate::util::{create_with_backoff, open_with_backoff, remove_with_backoff, replace_file_atomic_backoff};
use serde::de::{self, Deserializer as _, SeqAccess, Visitor};
use serde_json::Value;
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArrayReadError {
    #[error("open {path}: {source}")]
    Open { path: PathBuf, source: io::Error },

    /// Not a JSON array, truncated, or otherwise unparseable.
    #[error("malformed JSON in {path}: {source}")]
    Malformed { path: PathBuf, source: serde_json::Error },

    /// The per-record callback failed; the file itself may be fine.
    #[error("{0}")]
    Sink(anyhow::Error),
}

struct RecordVisitor<'a, F> {
    on_record: &'a mut F,
    sink_err: &'a mut Option<anyhow::Error>,
}

impl<'de, F> Visitor<'de> for RecordVisitor<'_, F>
where
    F: FnMut(Value) -> anyhow::Result<()>,
{
    type Value = u64;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a JSON array of records")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<u64, A::Error> {
        let mut n = 0u64;
        while let Some(v) = seq.next_element::<Value>()? {
            n += 1;
            if let Err(e) = (self.on_record)(v) {
                *self.sink_err = Some(e);
                return Err(de::Error::custom("record sink failed"));
            }
        }
        Ok(n)
    }
}

/// Stream every element of the JSON array at `path` into `on_record`.
/// Returns the number of elements read.
pub fn for_each_record<F>(path: &Path, read_buf_bytes: usize, mut on_record: F) -> Result<u64, ArrayReadError>
where
    F: FnMut(Value) -> anyhow::Result<()>,
{
    let f = open_with_backoff(path, 16, 50)
        .map_err(|source| ArrayReadError::Open { path: path.to_path_buf(), source })?;
    let rdr = BufReader::with_capacity(read_buf_bytes.max(8 * 1024), f);
    let mut de = serde_json::Deserializer::from_reader(rdr);

    let mut sink_err = None;
    let res = (&mut de).deserialize_seq(RecordVisitor { on_record: &mut on_record, sink_err: &mut sink_err });
    if let Some(e) = sink_err {
        return Err(ArrayReadError::Sink(e));
    }
    let malformed = |source| ArrayReadError::Malformed { path: path.to_path_buf(), source };
    let n = res.map_err(malformed)?;
    de.end().map_err(malformed)?;
    Ok(n)
}

/// Incremental JSON array writer on a temp file.
pub struct JsonArrayWriter {
    tmp_path: PathBuf,
    w: Option<BufWriter<File>>,
    written: u64,
}

impl JsonArrayWriter {
    pub fn create(tmp_path: &Path, buf_bytes: usize) -> io::Result<Self> {
        let f = create_with_backoff(tmp_path, 16, 50)?;
        let mut w = BufWriter::with_capacity(buf_bytes.max(8 * 1024), f);
        w.write_all(b"[")?;
        Ok(Self { tmp_path: tmp_path.to_path_buf(), w: Some(w), written: 0 })
    }

    pub fn write_record(&mut self, v: &Value) -> anyhow::Result<()> {
        if let Some(w) = &mut self.w {
            if self.written > 0 {
                w.write_all(b",")?;
            }
            serde_json::to_writer(&mut *w, v)?;
            self.written += 1;
        }
        Ok(())
    }

    pub fn written(&self) -> u64 { self.written }

    /// Close the array, flush, and move the temp file onto `final_path`.
    pub fn finish_atomic(mut self, final_path: &Path) -> anyhow::Result<u64> {
        if let Some(mut w) = self.w.take() {
            w.write_all(b"]")?;
            w.flush()?;
        }
        replace_file_atomic_backoff(&self.tmp_path, final_path)?;
        Ok(self.written)
    }

    /// Drop the partial output.
    pub fn abandon(mut self) -> anyhow::Result<()> {
        drop(self.w.take());
        remove_with_backoff(&self.tmp_path, 16, 50)
    }
}
