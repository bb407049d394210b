//! Monitor configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::dwell::DEFAULT_TIME_THRESHOLDS;
use crate::scroll::DEFAULT_SCROLL_THRESHOLDS;

/// Thresholds and timing for the engagement monitors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Scroll depth percentages to report.
    #[serde(default = "default_scroll_thresholds")]
    pub scroll_thresholds: Vec<u32>,

    /// Dwell times to report, in seconds.
    #[serde(default = "default_time_thresholds")]
    pub time_thresholds: Vec<u32>,

    /// How often the dwell monitor checks elapsed time.
    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,

    /// Minimum spacing between processed scroll samples.
    #[serde(default = "default_scroll_throttle", with = "humantime_serde")]
    pub scroll_throttle: Duration,
}

fn default_scroll_thresholds() -> Vec<u32> {
    DEFAULT_SCROLL_THRESHOLDS.to_vec()
}

fn default_time_thresholds() -> Vec<u32> {
    DEFAULT_TIME_THRESHOLDS.to_vec()
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(10)
}

fn default_scroll_throttle() -> Duration {
    Duration::from_millis(100)
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            scroll_thresholds: default_scroll_thresholds(),
            time_thresholds: default_time_thresholds(),
            poll_interval: default_poll_interval(),
            scroll_throttle: default_scroll_throttle(),
        }
    }
}
