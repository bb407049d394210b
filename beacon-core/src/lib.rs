//! beacon-core: event tracking for the landing page
//!
//! - **Events** - [`Event`] and the closed [`EventKind`] schema
//! - **Emitter** - [`Emitter`] fans events out to sinks and never fails
//! - **Sinks** - [`Sink`] adapters per backend, resolved into a [`SinkRegistry`]
//! - **Hooks** - [`BackendHook`], the callable entry point of each backend
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use beacon_core::hooks::{CallLog, GTAG, RecordingHook};
//! use beacon_core::{AnalyticsConfig, Emitter, HookRegistry, SinkRegistry};
//!
//! let log = CallLog::new();
//! let hooks = HookRegistry::new().with(GTAG, Arc::new(RecordingHook::new(GTAG, log.clone())));
//! let emitter = Emitter::new(SinkRegistry::resolve(&hooks, &AnalyticsConfig::default()));
//!
//! emitter.cta_click("hero", "Get started");
//! assert_eq!(log.len(), 1);
//! ```

pub mod config;
pub mod emitter;
pub mod error;
pub mod events;
pub mod heatmaps;
pub mod hooks;
pub mod sinks;

pub use config::{AnalyticsConfig, ID_ENV_OVERRIDES, MeasurementProtocolConfig, env_override};
pub use emitter::{Emitter, PAGE_URL_KEY};
pub use error::{HookError, SinkError};
pub use events::{
    Conversion, ConversionGoal, ConversionSpec, Event, EventKind, Extras, FormAction,
    NavigationTiming, PageView, Scalar,
};
pub use heatmaps::{VisitorProfile, initialize_heatmaps};
pub use hooks::{BackendHook, HookRegistry};
pub use sinks::{GtagSink, LogSink, PixelSink, Sink, SinkRegistry};
