//! Cooperative memory back-off between files. Each worker checks available RAM
//! before opening the next month and waits (bounded) while the machine is short.

use parking_lot::Mutex;
use std::sync::OnceLock;
use std::time::{Duration, Instant};
use sysinfo::{System, SystemExt};

struct MemState {
    sys: System,
    last_check: Instant,
    last_frac: f64, // available / total
}

static STATE: OnceLock<Mutex<MemState>> = OnceLock::new();
const REFRESH_EVERY: Duration = Duration::from_millis(500);
const BACKOFF_STEP: Duration = Duration::from_millis(100);
const BACKOFF_MAX: Duration = Duration::from_secs(10);

/// Recent estimate of available memory as a fraction of total (0.0..=1.0).
/// Refreshes at most every `REFRESH_EVERY`.
pub fn available_memory_fraction() -> f64 {
    let state = STATE.get_or_init(|| {
        let mut sys = System::new();
        sys.refresh_memory();
        Mutex::new(MemState { sys, last_check: Instant::now() - REFRESH_EVERY * 2, last_frac: 1.0 })
    });
    let mut st = state.lock();
    let now = Instant::now();
    if now.duration_since(st.last_check) >= REFRESH_EVERY {
        st.sys.refresh_memory();
        let total = st.sys.total_memory() as f64;
        let avail = st.sys.available_memory() as f64;
        st.last_frac = if total > 0.0 { (avail / total).clamp(0.0, 1.0) } else { 1.0 };
        st.last_check = now;
    }
    st.last_frac
}

/// Wait while available memory is below `threshold`, giving other workers
/// time to release their month. Gives up after `BACKOFF_MAX`.
pub fn wait_for_memory(threshold: f64) {
    if threshold <= 0.0 || available_memory_fraction() >= threshold {
        return;
    }
    let started = Instant::now();
    tracing::debug!(threshold, "low memory; delaying next file");
    while available_memory_fraction() < threshold {
        if started.elapsed() >= BACKOFF_MAX {
            tracing::warn!(threshold, "memory still low after back-off; continuing");
            return;
        }
        std::thread::sleep(BACKOFF_STEP);
    }
}
