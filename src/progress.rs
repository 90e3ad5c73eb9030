//! Progress reporting: one count-style bar per pass, one tick per file.

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::{Arc, OnceLock};

/// Optional global MultiProgress that lets several bars render together.
/// If unset, bars draw to the default terminal target.
static GLOBAL_MP: OnceLock<Arc<MultiProgress>> = OnceLock::new();

/// Install the global MultiProgress. Only the first call has an effect.
pub fn set_global_multiprogress(mp: Arc<MultiProgress>) {
    let _ = GLOBAL_MP.set(mp);
}

/// Files processed out of total, with a label.
pub fn make_count_progress(total: u64, label: &str) -> ProgressBar {
    let pb = match GLOBAL_MP.get() {
        Some(mp) => mp.add(ProgressBar::new(total)),
        None => ProgressBar::new(total),
    };
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} {msg} {pos}/{len} [{bar:.cyan/blue}] {percent:>3}%  \
         elapsed: {elapsed_precise}  eta: {eta_precise}",
    ) {
        pb.set_style(style.progress_chars("█▉▊▋▌▍▎▏  "));
    }
    if !label.is_empty() {
        pb.set_message(label.to_string());
    }
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Bar when `enabled`, otherwise `None`.
pub fn maybe_progress(enabled: bool, total: u64, label: &str) -> Option<ProgressBar> {
    enabled.then(|| make_count_progress(total, label))
}
