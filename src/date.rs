//! Date bucket keys: the `YYYY_MM` month taken from a corpus file name, and the
//! `YYYY-MM-DD` day taken from a record timestamp.

use regex::Regex;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;
use time::OffsetDateTime;

/// Year-month bucket. Displays as `YYYY_MM`, the key used in topic summaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: u16,
    pub month: u8, // 1..=12
}

impl YearMonth {
    /// Returns `None` for a month outside 1..=12.
    pub fn new(year: u16, month: u8) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn bucket_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}_{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (y, m) = s
            .split_once(|c| c == '_' || c == '-')
            .ok_or_else(|| "expected YYYY_MM".to_string())?;
        if y.len() != 4 || m.len() != 2 {
            return Err("expected YYYY_MM".into());
        }
        let year: u16 = y.parse().map_err(|_| "invalid year")?;
        let month: u8 = m.parse().map_err(|_| "invalid month")?;
        YearMonth::new(year, month).ok_or_else(|| "month must be 01..12".into())
    }
}

fn file_month_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:^|_)(\d{4})_(\d{2})\.(?i:json)$").expect("static regex"))
}

/// Derive the month bucket from a corpus file name such as `RC_2024_03.json`
/// or `2024_03.json`. Only the final path component is inspected.
///
/// Returns `None` when the name carries no `YYYY_MM.json` suffix or the month is
/// out of range. Callers skip such files; there is no carried-over fallback.
pub fn extract_year_month(file: impl AsRef<Path>) -> Option<YearMonth> {
    let name = file.as_ref().file_name()?.to_str()?;
    let caps = file_month_re().captures(name)?;
    let year: u16 = caps[1].parse().ok()?;
    let month: u8 = caps[2].parse().ok()?;
    YearMonth::new(year, month)
}

/// Calendar day (`YYYY-MM-DD`, UTC) for a unix timestamp in seconds.
pub fn day_key_from_epoch(ts: i64) -> Option<String> {
    let dt = OffsetDateTime::from_unix_timestamp(ts).ok()?;
    let d = dt.date();
    Some(format!("{:04}-{:02}-{:02}", d.year(), d.month() as u8, d.day()))
}
