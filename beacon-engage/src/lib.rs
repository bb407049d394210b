//! Engagement monitors and tracked interactions for beacon.
//!
//! - [`ScrollMonitor`] and [`DwellMonitor`] report scroll depth and time on
//!   page once per threshold, per page lifetime
//! - [`spawn_scroll_listener`] and [`spawn_dwell_listener`] run them as tasks
//!   that stop when their handle is dropped
//! - [`TrackedCta`] and [`TrackedForm`] track clicks, submissions and field
//!   focus before handing off to user code

pub mod config;
pub mod dwell;
pub mod interact;
pub mod listener;
pub mod scroll;
pub mod threshold;

pub use config::MonitorConfig;
pub use dwell::{DEFAULT_TIME_THRESHOLDS, DwellMonitor};
pub use interact::{
    FieldElement, FieldFocus, FieldTag, FormSubmission, Navigation, TrackedCta, TrackedForm,
};
pub use listener::{DwellHandle, MonitorHandle, spawn_dwell_listener, spawn_scroll_listener};
pub use scroll::{DEFAULT_SCROLL_THRESHOLDS, ScrollMetrics, ScrollMonitor};
pub use threshold::{EngagementThreshold, ThresholdKind, ThresholdTracker};
