use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::info;
use vhost_sieve_application::ports::ProgressSink;

const LOG_INTERVAL: Duration = Duration::from_secs(30);

struct State {
    total: usize,
    done: usize,
    started_at: Option<Instant>,
    last_logged_at: Option<Instant>,
}

/// Mutex-guarded completion counter shared into a stage's workers
/// (spec.md §4.2), explicitly owned rather than a process-wide singleton
/// (spec.md §9 Design Notes).
pub struct MutexProgressTracker {
    state: Mutex<State>,
}

impl MutexProgressTracker {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                total: 0,
                done: 0,
                started_at: None,
                last_logged_at: None,
            }),
        }
    }
}

impl Default for MutexProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for MutexProgressTracker {
    fn reset(&self, total: usize) {
        let mut state = self.state.lock().unwrap();
        state.total = total;
        state.done = 0;
        state.started_at = None;
        state.last_logged_at = None;
    }

    fn done(&self) {
        let mut state = self.state.lock().unwrap();
        let now = Instant::now();
        // Seeding `last_logged_at` alongside `started_at` on the very first
        // `done()` suppresses the first line until a full interval has
        // elapsed, matching the original's `_last_log_info_timestamp` reset
        // at counter 0 rather than logging a nonsensical 0-elapsed ETA.
        let first_done = state.started_at.is_none();
        let started_at = *state.started_at.get_or_insert(now);
        state.last_logged_at.get_or_insert(now);
        state.done += 1;
        if first_done {
            return;
        }

        let last_logged_at = state.last_logged_at.expect("seeded above on first done()");
        if now.duration_since(last_logged_at) < LOG_INTERVAL {
            return;
        }
        state.last_logged_at = Some(now);

        let elapsed = now.duration_since(started_at).as_secs_f64();
        let done = state.done;
        let total = state.total;
        let remaining_secs = if done == 0 {
            0.0
        } else {
            ((total as f64) * elapsed / (done as f64)) - elapsed
        }
        .max(0.0) as u64;

        info!(
            "Done {done} of {total} (Left time: {})",
            format_hms(remaining_secs)
        );
    }
}

fn format_hms(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours}:{minutes:02}:{seconds:02}")
}
