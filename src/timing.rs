//! Per-stage wall-clock timing, reported through `tracing`.

use std::time::{Duration, Instant};
use tracing::info;

/// Measures one pipeline stage (or the whole run) and logs it on finish.
pub struct Timer {
    stage: &'static str,
    start: Instant,
}

impl Timer {
    pub fn start(stage: &'static str) -> Self {
        Self {
            stage,
            start: Instant::now(),
        }
    }

    /// Log the elapsed time as structured fields and hand it back.
    pub fn finish(self) -> Duration {
        let elapsed = self.start.elapsed();
        info!(
            stage = self.stage,
            elapsed_ms = elapsed.as_millis() as u64,
            "stage finished"
        );
        elapsed
    }
}
