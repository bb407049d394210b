//! Generic analytics tag adapter (`gtag` call shape)

use std::sync::Arc;

use serde_json::{Map, Value, json};

use super::Sink;
use crate::error::SinkError;
use crate::events::{Conversion, Event, PageView};
use crate::hooks::BackendHook;

/// Category every generic event is filed under.
const EVENT_CATEGORY: &str = "engagement";

/// Sink for the GA4 `gtag` hook.
pub struct GtagSink {
    hook: Arc<dyn BackendHook>,
    measurement_id: String,
}

impl GtagSink {
    pub fn new(hook: Arc<dyn BackendHook>, measurement_id: impl Into<String>) -> Self {
        Self {
            hook,
            measurement_id: measurement_id.into(),
        }
    }

    /// Event parameters with the tag's category, label and value defaults.
    fn event_params(event: &Event) -> Map<String, Value> {
        let params = event.parameters_json();
        let mut shaped = Map::new();
        shaped.insert("event_category".into(), json!(EVENT_CATEGORY));
        shaped.insert(
            "event_label".into(),
            params
                .get("label")
                .filter(|v| v.is_string())
                .cloned()
                .unwrap_or_else(|| json!("")),
        );
        shaped.insert(
            "value".into(),
            params
                .get("value")
                .filter(|v| v.is_number())
                .cloned()
                .unwrap_or_else(|| json!(0)),
        );
        shaped.extend(params);
        shaped
    }
}

impl Sink for GtagSink {
    fn name(&self) -> &str {
        "gtag"
    }

    fn is_available(&self) -> bool {
        self.hook.is_ready()
    }

    fn send(&self, event: &Event) -> Result<(), SinkError> {
        let params = Self::event_params(event);
        self.hook
            .call(&[json!("event"), json!(event.name()), Value::Object(params)])?;
        Ok(())
    }

    fn send_conversion(&self, conversion: &Conversion) -> Result<(), SinkError> {
        let purchase = json!({
            "transaction_id": conversion.transaction_id(),
            "value": conversion.value,
            "currency": conversion.currency,
            "items": [{
                "item_id": conversion.conversion_type,
                "item_name": conversion.conversion_type,
                "category": "conversion",
                "quantity": 1,
                "price": conversion.value,
            }],
        });
        self.hook
            .call(&[json!("event"), json!("purchase"), purchase])?;
        Ok(())
    }

    fn send_page_view(&self, view: &PageView) -> Result<(), SinkError> {
        self.hook.call(&[
            json!("config"),
            json!(self.measurement_id),
            json!({ "page_path": view.page_path }),
        ])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use crate::hooks::{CallLog, RecordingHook};

    fn sink() -> (GtagSink, CallLog) {
        let log = CallLog::new();
        let hook = Arc::new(RecordingHook::new("gtag", log.clone()));
        (GtagSink::new(hook, "G-TEST"), log)
    }

    #[test]
    fn event_gets_category_label_and_value_defaults() {
        let (sink, log) = sink();
        let event = Event::new(EventKind::ScrollDepth {
            depth_percentage: 50,
        });

        sink.send(&event).unwrap();

        let call = &log.calls()[0];
        assert_eq!(call.command(), Some("event"));
        assert_eq!(call.target(), Some("scroll_depth"));
        let params = call.params().unwrap();
        assert_eq!(params["event_category"], json!("engagement"));
        assert_eq!(params["event_label"], json!(""));
        assert_eq!(params["value"], json!(0));
        assert_eq!(params["depth_percentage"], json!(50));
    }

    #[test]
    fn label_and_value_parameters_are_lifted() {
        let (sink, log) = sink();
        let event = Event::new(EventKind::Custom {
            name: "faq_open".into(),
        })
        .with_extra("label", "pricing")
        .with_extra("value", 3i64);

        sink.send(&event).unwrap();

        let params = log.calls()[0].params().cloned().unwrap();
        assert_eq!(params["event_label"], json!("pricing"));
        assert_eq!(params["value"], json!(3));
        assert_eq!(params["label"], json!("pricing"));
    }

    #[test]
    fn conversion_value_overrides_default_value() {
        let (sink, log) = sink();
        let conversion = Conversion::new("demo_request").with_value(300.0);
        let event = Event::new(conversion.to_kind());

        sink.send(&event).unwrap();

        let params = log.calls()[0].params().cloned().unwrap();
        assert_eq!(params["value"], json!(300.0));
        assert_eq!(params["currency"], json!("USD"));
    }

    #[test]
    fn conversion_is_sent_as_purchase() {
        let (sink, log) = sink();
        let conversion = Conversion::new("hero_signup").with_value(100.0);

        sink.send_conversion(&conversion).unwrap();

        let call = &log.calls()[0];
        assert_eq!(call.target(), Some("purchase"));
        let params = call.params().unwrap();
        assert_eq!(params["transaction_id"], json!(conversion.transaction_id()));
        assert_eq!(params["items"][0]["item_id"], json!("hero_signup"));
        assert_eq!(params["items"][0]["quantity"], json!(1));
        assert_eq!(params["items"][0]["price"], json!(100.0));
    }

    #[test]
    fn page_view_configures_measurement_id() {
        let (sink, log) = sink();
        sink.send_page_view(&PageView::new("/", Some("a=b"), "Home"))
            .unwrap();

        let call = &log.calls()[0];
        assert_eq!(call.command(), Some("config"));
        assert_eq!(call.target(), Some("G-TEST"));
        assert_eq!(call.params().unwrap()["page_path"], json!("/?a=b"));
    }
}
