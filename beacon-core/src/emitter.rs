//! Event emitter
//!
//! The emitter is the single entry point for tracking. It normalizes an
//! event, then hands it to every available sink synchronously and in
//! registration order. Nothing a sink does can reach the caller: errors are
//! logged and dropped, panics are caught.

use std::error::Error as StdError;
use std::panic::{self, AssertUnwindSafe};

use tracing::{trace, warn};

use crate::error::SinkError;
use crate::events::{
    Conversion, Event, EventKind, Extras, FormAction, NavigationTiming, PageView,
};
use crate::sinks::{Sink, SinkRegistry};

/// Extra key carrying the page URL on page-scoped events.
pub const PAGE_URL_KEY: &str = "page_url";

/// Fans normalized events out to the registered sinks.
#[derive(Debug, Clone, Default)]
pub struct Emitter {
    sinks: SinkRegistry,
    page_url: Option<String>,
}

impl Emitter {
    pub fn new(sinks: SinkRegistry) -> Self {
        Self {
            sinks,
            page_url: None,
        }
    }

    /// Stamp page-scoped events with this URL.
    #[must_use]
    pub fn with_page_url(mut self, url: impl Into<String>) -> Self {
        self.page_url = Some(url.into());
        self
    }

    pub fn sinks(&self) -> &SinkRegistry {
        &self.sinks
    }

    /// Emit an event to every available sink.
    pub fn emit(&self, event: Event) {
        let event = self.normalize(event);
        self.dispatch(event.name(), |sink| sink.send(&event));
    }

    /// Emit a free-form event by name with its parameters.
    pub fn track(&self, name: impl Into<String>, parameters: Extras) {
        self.emit(Event::new(EventKind::Custom { name: name.into() }).with_extras(parameters));
    }

    /// Emit a conversion: a generic `conversion` event followed by the
    /// purchase-shaped call of each backend.
    pub fn conversion(&self, conversion: Conversion) {
        self.emit(Event::at(conversion.to_kind(), conversion.timestamp));
        self.dispatch("purchase", |sink| sink.send_conversion(&conversion));
    }

    /// Record a page view with each backend, then emit `page_view`.
    pub fn page_view(&self, path: &str, query: Option<&str>, title: &str) {
        let view = PageView::new(path, query, title);
        self.dispatch("page_view_config", |sink| sink.send_page_view(&view));
        self.emit(Event::new(view.to_kind()));
    }

    pub fn cta_click(&self, location: &str, text: &str) {
        self.emit(Event::new(EventKind::CtaClick {
            cta_location: location.to_string(),
            cta_text: text.to_string(),
        }));
    }

    pub fn form_interaction(&self, form_name: &str, field_name: &str, action: FormAction) {
        self.emit(Event::new(EventKind::FormInteraction {
            form_name: form_name.to_string(),
            field_name: field_name.to_string(),
            action,
        }));
    }

    /// Emit navigation performance metrics.
    pub fn performance(&self, timing: NavigationTiming) {
        self.emit(Event::new(timing.to_kind()));
    }

    /// Emit a non-fatal exception with its source chain and optional context.
    pub fn exception(&self, error: &(dyn StdError + 'static), info: Option<&serde_json::Value>) {
        let mut chain = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            chain.push(cause.to_string());
            source = cause.source();
        }
        let error_stack = (!chain.is_empty()).then(|| chain.join("\ncaused by: "));
        let error_info = info.map(serde_json::Value::to_string);

        self.emit(Event::new(EventKind::Exception {
            description: error.to_string(),
            fatal: false,
            error_stack,
            error_info,
        }));
    }

    fn normalize(&self, event: Event) -> Event {
        match &self.page_url {
            Some(url)
                if event.kind().is_page_scoped() && !event.extras().contains_key(PAGE_URL_KEY) =>
            {
                event.with_extra(PAGE_URL_KEY, url.as_str())
            }
            _ => event,
        }
    }

    fn dispatch<F>(&self, what: &str, f: F)
    where
        F: Fn(&dyn Sink) -> Result<(), SinkError>,
    {
        for sink in self.sinks.iter() {
            if !sink.is_available() {
                trace!(sink = sink.name(), event = what, "Sink unavailable, skipping");
                continue;
            }
            match panic::catch_unwind(AssertUnwindSafe(|| f(sink.as_ref()))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    warn!(sink = sink.name(), event = what, error = %e, "Sink failed");
                }
                Err(_) => {
                    warn!(sink = sink.name(), event = what, "Sink panicked");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::hooks::{CallLog, FBQ, GTAG, RecordingHook};
    use crate::sinks::{GtagSink, PixelSink};

    fn emitter_with(log: &CallLog) -> Emitter {
        let gtag = Arc::new(RecordingHook::new(GTAG, log.clone()));
        let fbq = Arc::new(RecordingHook::new(FBQ, log.clone()));
        Emitter::new(
            SinkRegistry::new()
                .with(Arc::new(GtagSink::new(gtag, "G-TEST")))
                .with(Arc::new(PixelSink::new(fbq))),
        )
    }

    #[test]
    fn emit_calls_sinks_in_registration_order() {
        let log = CallLog::new();
        let emitter = emitter_with(&log);

        emitter.cta_click("hero", "Get started");

        let hooks: Vec<_> = log.calls().into_iter().map(|c| c.hook).collect();
        assert_eq!(hooks, vec!["gtag", "fbq"]);
    }

    #[test]
    fn emit_with_no_sinks_is_a_no_op() {
        Emitter::default().cta_click("hero", "Get started");
    }

    #[test]
    fn track_forwards_name_and_parameters() {
        let log = CallLog::new();
        let emitter = emitter_with(&log);
        let mut params = Extras::new();
        params.insert("section".into(), "faq".into());
        params.insert("label".into(), "pricing question".into());

        emitter.track("faq_open", params);

        let calls = log.calls();
        assert_eq!(calls[0].target(), Some("faq_open"));
        let gtag = calls[0].params().unwrap();
        assert_eq!(gtag["section"], json!("faq"));
        assert_eq!(gtag["event_label"], json!("pricing question"));
        assert_eq!(calls[1].args[0], json!("track"));
        assert_eq!(calls[1].args[1], json!("faq_open"));
    }

    #[test]
    fn page_scoped_events_get_page_url() {
        let log = CallLog::new();
        let emitter = emitter_with(&log).with_page_url("https://example.test/");

        emitter.form_interaction("contact", "email", FormAction::Focus);
        emitter.emit(Event::new(EventKind::AbTestAssignment {
            test_name: "t".into(),
            variant: "v".into(),
        }));

        let calls = log.calls();
        assert_eq!(
            calls[0].params().unwrap()["page_url"],
            json!("https://example.test/")
        );
        assert!(calls[2].params().unwrap().get("page_url").is_none());
    }

    #[test]
    fn caller_supplied_page_url_is_kept() {
        let log = CallLog::new();
        let emitter = emitter_with(&log).with_page_url("https://example.test/");

        emitter.emit(
            Event::new(EventKind::ScrollDepth {
                depth_percentage: 25,
            })
            .with_extra(PAGE_URL_KEY, "https://example.test/pricing"),
        );

        assert_eq!(
            log.calls()[0].params().unwrap()["page_url"],
            json!("https://example.test/pricing")
        );
    }

    #[test]
    fn conversion_emits_generic_event_then_purchase_calls() {
        let log = CallLog::new();
        let emitter = emitter_with(&log);

        emitter.conversion(Conversion::new("contact_form").with_value(75.0));

        let shape: Vec<_> = log
            .calls()
            .iter()
            .map(|c| format!("{}:{}", c.hook, c.target().unwrap_or_default()))
            .collect();
        assert_eq!(
            shape,
            vec![
                "gtag:conversion",
                "fbq:conversion",
                "gtag:purchase",
                "fbq:Purchase"
            ]
        );
        let params = log.calls()[0].params().cloned().unwrap();
        assert_eq!(params["conversion_type"], json!("contact_form"));
        assert!(params["timestamp"].is_string());
    }

    #[test]
    fn page_view_configures_backends_before_generic_event() {
        let log = CallLog::new();
        let emitter = emitter_with(&log);

        emitter.page_view("/", Some("ref=ad"), "Landing");

        let calls = log.calls();
        assert_eq!(calls[0].command(), Some("config"));
        assert_eq!(calls[1].args, vec![json!("track"), json!("PageView")]);
        assert_eq!(calls[2].target(), Some("page_view"));
        assert_eq!(calls[2].params().unwrap()["page_path"], json!("/?ref=ad"));
        assert_eq!(calls[2].params().unwrap()["page_title"], json!("Landing"));
    }

    #[derive(Debug, thiserror::Error)]
    #[error("outer failure")]
    struct Outer(#[source] std::io::Error);

    #[test]
    fn exception_reports_source_chain_and_info() {
        let log = CallLog::new();
        let emitter = emitter_with(&log);
        let error = Outer(std::io::Error::other("disk on fire"));

        emitter.exception(&error, Some(&json!({"component": "Hero"})));

        let calls = log.calls();
        assert_eq!(calls.len(), 1, "pixel does not receive diagnostics");
        let params = calls[0].params().unwrap();
        assert_eq!(params["description"], json!("outer failure"));
        assert_eq!(params["error_stack"], json!("disk on fire"));
        assert_eq!(params["error_info"], json!(r#"{"component":"Hero"}"#));
        assert_eq!(params["fatal"], json!(false));
    }

    #[test]
    fn performance_goes_to_generic_tag_only() {
        let log = CallLog::new();
        let emitter = emitter_with(&log);

        emitter.performance(NavigationTiming {
            fetch_start: 0.0,
            response_end: 80.0,
            dom_content_loaded_event_end: 300.0,
            load_event_end: 650.0,
        });

        let calls = log.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].target(), Some("page_performance"));
        assert_eq!(calls[0].params().unwrap()["page_load_time"], json!(650));
    }
}
