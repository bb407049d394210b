//! Scroll depth monitor

use std::sync::Arc;

use beacon_core::{Emitter, Event, EventKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::threshold::{ThresholdKind, ThresholdTracker};

/// Depth percentages reported by default.
pub const DEFAULT_SCROLL_THRESHOLDS: [u32; 5] = [25, 50, 75, 90, 100];

/// Viewport geometry sampled on a scroll signal, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub viewport_height: f64,
}

impl ScrollMetrics {
    pub fn new(scroll_top: f64, scroll_height: f64, viewport_height: f64) -> Self {
        Self {
            scroll_top,
            scroll_height,
            viewport_height,
        }
    }

    /// Rounded percentage of the scrollable distance covered.
    ///
    /// `None` when the page has no scrollable distance or the sample is not
    /// finite.
    pub fn percent(&self) -> Option<i64> {
        let scrollable = self.scroll_height - self.viewport_height;
        if !(scrollable > 0.0) || !self.scroll_top.is_finite() || !scrollable.is_finite() {
            return None;
        }
        Some((self.scroll_top / scrollable * 100.0).round() as i64)
    }
}

/// Emits `scroll_depth` once per threshold reached.
pub struct ScrollMonitor {
    tracker: ThresholdTracker,
    emitter: Arc<Emitter>,
}

impl ScrollMonitor {
    pub fn new(emitter: Arc<Emitter>) -> Self {
        Self::with_thresholds(emitter, DEFAULT_SCROLL_THRESHOLDS)
    }

    pub fn with_thresholds(emitter: Arc<Emitter>, thresholds: impl IntoIterator<Item = u32>) -> Self {
        Self {
            tracker: ThresholdTracker::new(ThresholdKind::Scroll, thresholds),
            emitter,
        }
    }

    /// Process one scroll sample; returns the depths that fired.
    pub fn observe(&mut self, metrics: ScrollMetrics) -> Vec<u32> {
        match metrics.percent() {
            Some(percent) => self.observe_percent(percent),
            None => Vec::new(),
        }
    }

    /// Process an already computed scroll percentage.
    pub fn observe_percent(&mut self, percent: i64) -> Vec<u32> {
        let fired = self.tracker.crossed(percent);
        for &depth in &fired {
            debug!(depth, percent, "Scroll depth reached");
            self.emitter.emit(Event::new(EventKind::ScrollDepth {
                depth_percentage: depth,
            }));
        }
        fired
    }

    pub fn tracker(&self) -> &ThresholdTracker {
        &self.tracker
    }
}
