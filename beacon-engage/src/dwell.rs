//! Time-on-page monitor

use std::sync::Arc;

use beacon_core::{Emitter, Event, EventKind};
use tokio::time::Instant;
use tracing::debug;

use crate::threshold::{ThresholdKind, ThresholdTracker};

/// Dwell thresholds reported by default, in seconds.
pub const DEFAULT_TIME_THRESHOLDS: [u32; 4] = [30, 60, 120, 300];

/// Emits `time_on_page` once per threshold and `page_exit` on unload.
pub struct DwellMonitor {
    tracker: ThresholdTracker,
    emitter: Arc<Emitter>,
    started: Instant,
}

impl DwellMonitor {
    /// Start timing now.
    pub fn new(emitter: Arc<Emitter>) -> Self {
        Self::with_thresholds(emitter, DEFAULT_TIME_THRESHOLDS)
    }

    pub fn with_thresholds(emitter: Arc<Emitter>, thresholds: impl IntoIterator<Item = u32>) -> Self {
        Self {
            tracker: ThresholdTracker::new(ThresholdKind::Time, thresholds),
            emitter,
            started: Instant::now(),
        }
    }

    /// Seconds since mount, rounded to the nearest second.
    pub fn elapsed_secs(&self) -> u64 {
        let millis = self.started.elapsed().as_millis();
        u64::try_from((millis + 500) / 1000).unwrap_or(u64::MAX)
    }

    /// Check the elapsed time against the thresholds.
    pub fn check(&mut self) -> Vec<u32> {
        let secs = self.elapsed_secs();
        self.check_elapsed(secs)
    }

    /// Check a given elapsed time against the thresholds.
    pub fn check_elapsed(&mut self, secs: u64) -> Vec<u32> {
        let metric = i64::try_from(secs).unwrap_or(i64::MAX);
        let fired = self.tracker.crossed(metric);
        for &threshold in &fired {
            debug!(threshold, elapsed = secs, "Dwell threshold reached");
            self.emitter.emit(Event::new(EventKind::TimeOnPage {
                time_seconds: u64::from(threshold),
            }));
        }
        fired
    }

    /// Emit `page_exit` with the total time spent, whatever has fired.
    pub fn exit(&self) -> u64 {
        let time_spent = self.elapsed_secs();
        self.exit_after(time_spent);
        time_spent
    }

    /// Emit `page_exit` for a given time spent.
    pub fn exit_after(&self, time_spent: u64) {
        self.emitter
            .emit(Event::new(EventKind::PageExit { time_spent }));
    }

    pub fn tracker(&self) -> &ThresholdTracker {
        &self.tracker
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_elapsed_fires_each_threshold_once() {
        let mut monitor = DwellMonitor::new(Arc::new(Emitter::default()));

        assert!(monitor.check_elapsed(10).is_empty());
        assert_eq!(monitor.check_elapsed(30), vec![30]);
        assert!(monitor.check_elapsed(40).is_empty());
        assert_eq!(monitor.check_elapsed(130), vec![60, 120]);
        assert_eq!(monitor.check_elapsed(600), vec![300]);
        assert!(monitor.tracker().is_exhausted());
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_rounds_to_nearest_second() {
        let monitor = DwellMonitor::new(Arc::new(Emitter::default()));
        tokio::time::advance(std::time::Duration::from_millis(29_600)).await;
        assert_eq!(monitor.elapsed_secs(), 30);
    }
}
