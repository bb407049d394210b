//! GA4 Measurement Protocol hook
//!
//! Accepts gtag-shaped calls and forwards them to the Measurement Protocol
//! collection endpoint from a background worker. Calls never block: they are
//! queued on a bounded channel and dropped when the queue is full.

use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::BackendHook;
use crate::config::MeasurementProtocolConfig;
use crate::error::HookError;

/// One event in a Measurement Protocol request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MpEvent {
    pub name: String,
    pub params: Map<String, Value>,
}

/// Body of a Measurement Protocol request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MpPayload {
    pub client_id: String,
    pub events: Vec<MpEvent>,
}

/// Translate a gtag call into a Measurement Protocol event.
///
/// `event` calls map directly, `config` calls carrying a `page_path` become a
/// `page_view`, and bookkeeping commands (`js`, `set`) produce nothing.
pub fn translate(args: &[Value]) -> Result<Option<MpEvent>, HookError> {
    let command = args
        .first()
        .and_then(Value::as_str)
        .ok_or_else(|| HookError::CallShape("gtag expects a command string first".into()))?;
    let params = match args.get(2) {
        Some(Value::Object(map)) => map.clone(),
        Some(Value::Null) | None => Map::new(),
        Some(_) => {
            return Err(HookError::CallShape(
                "gtag parameters must be an object".into(),
            ));
        }
    };

    match command {
        "event" => {
            let name = args
                .get(1)
                .and_then(Value::as_str)
                .ok_or_else(|| HookError::CallShape("gtag event needs a name".into()))?;
            Ok(Some(MpEvent {
                name: name.to_string(),
                params,
            }))
        }
        "config" if params.contains_key("page_path") => Ok(Some(MpEvent {
            name: "page_view".to_string(),
            params,
        })),
        "config" | "js" | "set" => Ok(None),
        other => Err(HookError::CallShape(format!("unknown gtag command: {other}"))),
    }
}

/// Hook forwarding gtag calls to the Measurement Protocol.
pub struct MeasurementProtocolHook {
    tx: mpsc::Sender<MpEvent>,
}

impl MeasurementProtocolHook {
    /// Start the forwarding worker.
    ///
    /// The worker stops when `shutdown` is cancelled (after flushing what is
    /// already queued) or when the hook is dropped.
    pub fn spawn(
        config: MeasurementProtocolConfig,
        measurement_id: String,
        client_id: String,
        shutdown: CancellationToken,
    ) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));
        let worker = Worker {
            client: reqwest::Client::new(),
            config,
            measurement_id,
            client_id,
        };
        let handle = tokio::spawn(worker.run(rx, shutdown));
        (Self { tx }, handle)
    }
}

impl BackendHook for MeasurementProtocolHook {
    fn call(&self, args: &[Value]) -> Result<(), HookError> {
        let Some(event) = translate(args)? else {
            return Ok(());
        };
        self.tx.try_send(event).map_err(|e| match e {
            TrySendError::Full(_) => HookError::QueueFull,
            TrySendError::Closed(_) => HookError::Closed,
        })
    }

    fn is_ready(&self) -> bool {
        !self.tx.is_closed()
    }
}

struct Worker {
    client: reqwest::Client,
    config: MeasurementProtocolConfig,
    measurement_id: String,
    client_id: String,
}

impl Worker {
    async fn run(self, mut rx: mpsc::Receiver<MpEvent>, shutdown: CancellationToken) {
        info!(endpoint = %self.config.endpoint, "Measurement Protocol forwarder started");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    rx.close();
                    while let Some(event) = rx.recv().await {
                        self.send(event).await;
                    }
                    break;
                }
                next = rx.recv() => {
                    match next {
                        Some(event) => self.send(event).await,
                        None => break,
                    }
                }
            }
        }

        info!("Measurement Protocol forwarder stopped");
    }

    async fn send(&self, event: MpEvent) {
        let name = event.name.clone();
        let payload = MpPayload {
            client_id: self.client_id.clone(),
            events: vec![event],
        };
        let result = self
            .client
            .post(&self.config.endpoint)
            .query(&[
                ("measurement_id", self.measurement_id.as_str()),
                ("api_secret", self.config.expose_api_secret()),
            ])
            .json(&payload)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            // the request url carries the api secret
            .map_err(reqwest::Error::without_url);

        match result {
            Ok(_) => debug!(event = %name, "Forwarded event"),
            Err(e) => warn!(event = %name, error = %e, "Failed to forward event"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn translates_event_calls() {
        let event = translate(&[json!("event"), json!("cta_click"), json!({"cta_text": "Go"})])
            .unwrap()
            .unwrap();
        assert_eq!(event.name, "cta_click");
        assert_eq!(event.params["cta_text"], json!("Go"));
    }

    #[test]
    fn config_with_page_path_becomes_page_view() {
        let event = translate(&[json!("config"), json!("G-1"), json!({"page_path": "/"})])
            .unwrap()
            .unwrap();
        assert_eq!(event.name, "page_view");

        let none = translate(&[json!("config"), json!("G-1")]).unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn rejects_malformed_calls() {
        assert!(translate(&[]).is_err());
        assert!(translate(&[json!("event")]).is_err());
        assert!(translate(&[json!("event"), json!("x"), json!(3)]).is_err());
        assert!(translate(&[json!("consent"), json!("update")]).is_err());
    }

    #[test]
    fn payload_serializes_in_protocol_shape() {
        let payload = MpPayload {
            client_id: "abc".into(),
            events: vec![MpEvent {
                name: "scroll_depth".into(),
                params: Map::from_iter([("depth_percentage".to_string(), json!(50))]),
            }],
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            json!({"client_id": "abc", "events": [{"name": "scroll_depth", "params": {"depth_percentage": 50}}]})
        );
    }

    #[test]
    fn hook_reports_queue_full_and_closed() {
        let (tx, rx) = mpsc::channel(1);
        let hook = MeasurementProtocolHook { tx };

        hook.call(&[json!("event"), json!("a")]).unwrap();
        let err = hook.call(&[json!("event"), json!("b")]).unwrap_err();
        assert!(matches!(err, HookError::QueueFull));

        drop(rx);
        assert!(!hook.is_ready());
        let err = hook.call(&[json!("event"), json!("c")]).unwrap_err();
        assert!(matches!(err, HookError::Closed));
    }

    #[test]
    fn bookkeeping_commands_are_not_queued() {
        let (tx, mut rx) = mpsc::channel(1);
        let hook = MeasurementProtocolHook { tx };

        hook.call(&[json!("js"), json!("2024-01-01")]).unwrap();
        assert!(rx.try_recv().is_err());
    }
}
