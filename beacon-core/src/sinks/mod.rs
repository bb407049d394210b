//! Sink adapters
//!
//! A sink translates normalized events into one backend's call shape. The
//! [`SinkRegistry`] is resolved once at startup from the hooks present, so
//! the emitter never has to probe for backends itself.

mod gtag;
mod log;
mod pixel;

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::config::AnalyticsConfig;
use crate::error::SinkError;
use crate::events::{Conversion, Event, PageView};
use crate::hooks::{FBQ, GTAG, HookRegistry};

pub use gtag::GtagSink;
pub use log::LogSink;
pub use pixel::PixelSink;

/// A destination that forwards events to one analytics backend.
///
/// Implementations must not mutate the event and must treat an unavailable
/// backend as a no-op rather than an error.
pub trait Sink: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Whether the backend can currently be called.
    fn is_available(&self) -> bool {
        true
    }

    /// Forward a generic event.
    fn send(&self, event: &Event) -> Result<(), SinkError>;

    /// Forward the purchase-shaped call of a conversion.
    fn send_conversion(&self, _conversion: &Conversion) -> Result<(), SinkError> {
        Ok(())
    }

    /// Forward the backend-specific page view call.
    fn send_page_view(&self, _view: &PageView) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Ordered set of sinks an emitter fans out to.
#[derive(Clone, Default)]
pub struct SinkRegistry {
    sinks: Vec<Arc<dyn Sink>>,
}

impl SinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry from the hooks present in this browsing context.
    ///
    /// The generic tag comes first, then the pixel, then the development
    /// logger when `debug` is set.
    pub fn resolve(hooks: &HookRegistry, config: &AnalyticsConfig) -> Self {
        let mut registry = Self::new();
        if let Some(hook) = hooks.available(GTAG) {
            registry.register(Arc::new(GtagSink::new(hook, config.ga4_id.clone())));
        }
        if let Some(hook) = hooks.available(FBQ) {
            registry.register(Arc::new(PixelSink::new(hook)));
        }
        if config.debug {
            registry.register(Arc::new(LogSink));
        }
        debug!(sinks = ?registry.names(), "Resolved analytics sinks");
        registry
    }

    /// Append a sink; sinks run in registration order.
    pub fn register(&mut self, sink: Arc<dyn Sink>) {
        self.sinks.push(sink);
    }

    #[must_use]
    pub fn with(mut self, sink: Arc<dyn Sink>) -> Self {
        self.register(sink);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Sink>> {
        self.sinks.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.sinks.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl fmt::Debug for SinkRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkRegistry")
            .field("sinks", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::{CallLog, RecordingHook};

    #[test]
    fn resolve_registers_present_backends_in_order() {
        let log = CallLog::new();
        let hooks = HookRegistry::new()
            .with(FBQ, Arc::new(RecordingHook::new(FBQ, log.clone())))
            .with(GTAG, Arc::new(RecordingHook::new(GTAG, log.clone())));
        let config = AnalyticsConfig {
            debug: true,
            ..AnalyticsConfig::default()
        };

        let registry = SinkRegistry::resolve(&hooks, &config);
        assert_eq!(registry.names(), vec!["gtag", "pixel", "log"]);
    }

    #[test]
    fn resolve_skips_absent_and_unready_backends() {
        let hooks = HookRegistry::new().with(
            GTAG,
            Arc::new(RecordingHook::not_ready(GTAG, CallLog::new())),
        );

        let registry = SinkRegistry::resolve(&hooks, &AnalyticsConfig::default());
        assert!(registry.is_empty());
    }
}
