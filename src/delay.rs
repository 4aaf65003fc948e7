use std::time::Duration;

use colored::*;
use rand::Rng;
use tokio::time::sleep;
use tracing::debug;

/// Randomized pacing between external invocations. Purely a detection
/// avoidance measure; carries no retry or cancellation semantics.
#[derive(Debug, Clone, Copy)]
pub struct DelayScheduler {
    min_secs: u64,
    max_secs: u64,
}

impl DelayScheduler {
    /// Bounds are inclusive; `min == max` yields exactly that duration.
    /// Callers validate `min <= max` before construction.
    pub fn new(min_secs: u64, max_secs: u64) -> Self {
        Self { min_secs, max_secs }
    }

    /// Wider fixed range used between distinct targets in batch mode.
    pub fn between_targets() -> Self {
        Self::new(10, 20)
    }

    /// Uniform random duration within `[min, max]` seconds.
    pub fn pick(&self) -> Duration {
        let secs = rand::thread_rng().gen_range(self.min_secs as f64..=self.max_secs as f64);
        Duration::from_secs_f64(secs)
    }

    /// Blocks the sequence for one randomized interval.
    pub async fn pause(&self) {
        let duration = self.pick();
        println!(
            "{} waiting {:.1}s...",
            "[*]".truecolor(128, 128, 128),
            duration.as_secs_f64()
        );
        debug!(seconds = duration.as_secs_f64(), "pacing delay");
        sleep(duration).await;
    }
}
