//! Pixel-style conversion tag adapter (`fbq` call shape)

use std::sync::Arc;

use serde_json::{Value, json};

use super::Sink;
use crate::error::SinkError;
use crate::events::{Conversion, Event, PageView};
use crate::hooks::BackendHook;

/// Sink for the Facebook pixel `fbq` hook.
///
/// The pixel only receives behavioral events; performance and error
/// diagnostics stay with the generic tag.
pub struct PixelSink {
    hook: Arc<dyn BackendHook>,
}

impl PixelSink {
    pub fn new(hook: Arc<dyn BackendHook>) -> Self {
        Self { hook }
    }
}

impl Sink for PixelSink {
    fn name(&self) -> &str {
        "pixel"
    }

    fn is_available(&self) -> bool {
        self.hook.is_ready()
    }

    fn send(&self, event: &Event) -> Result<(), SinkError> {
        if event.kind().is_diagnostic() {
            return Ok(());
        }
        let params = Value::Object(event.parameters_json());
        self.hook
            .call(&[json!("track"), json!(event.name()), params])?;
        Ok(())
    }

    fn send_conversion(&self, conversion: &Conversion) -> Result<(), SinkError> {
        self.hook.call(&[
            json!("track"),
            json!("Purchase"),
            json!({
                "value": conversion.value,
                "currency": conversion.currency,
                "content_type": conversion.conversion_type,
            }),
        ])?;
        Ok(())
    }

    fn send_page_view(&self, _view: &PageView) -> Result<(), SinkError> {
        self.hook.call(&[json!("track"), json!("PageView")])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use crate::hooks::{CallLog, RecordingHook};

    fn sink() -> (PixelSink, CallLog) {
        let log = CallLog::new();
        (
            PixelSink::new(Arc::new(RecordingHook::new("fbq", log.clone()))),
            log,
        )
    }

    #[test]
    fn tracks_events_with_plain_parameters() {
        let (sink, log) = sink();
        let event = Event::new(EventKind::CtaClick {
            cta_location: "hero".into(),
            cta_text: "Start".into(),
        });

        sink.send(&event).unwrap();

        let call = &log.calls()[0];
        assert_eq!(call.command(), Some("track"));
        assert_eq!(call.target(), Some("cta_click"));
        assert_eq!(
            call.params().unwrap(),
            &json!({"cta_location": "hero", "cta_text": "Start"})
        );
    }

    #[test]
    fn diagnostics_are_not_forwarded() {
        let (sink, log) = sink();
        let event = Event::new(EventKind::Exception {
            description: "boom".into(),
            fatal: false,
            error_stack: None,
            error_info: None,
        });

        sink.send(&event).unwrap();
        assert!(log.is_empty());
    }

    #[test]
    fn conversion_is_tracked_as_purchase() {
        let (sink, log) = sink();
        sink.send_conversion(&Conversion::new("email_signup").with_value(50.0))
            .unwrap();

        let call = &log.calls()[0];
        assert_eq!(call.target(), Some("Purchase"));
        assert_eq!(
            call.params().unwrap(),
            &json!({"value": 50.0, "currency": "USD", "content_type": "email_signup"})
        );
    }

    #[test]
    fn page_view_tracks_page_view() {
        let (sink, log) = sink();
        sink.send_page_view(&PageView::new("/", None, "Home")).unwrap();
        assert_eq!(log.calls()[0].args, vec![json!("track"), json!("PageView")]);
    }
}
