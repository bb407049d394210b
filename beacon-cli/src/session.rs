//! Wiring of hooks, sinks and the emitter for one CLI run

use std::sync::Arc;

use beacon_core::hooks::{CLARITY, CallLog, FBQ, GTAG, HOTJAR, MeasurementProtocolHook, RecordingHook};
use beacon_core::{AnalyticsConfig, BackendHook, Emitter, HookError, HookRegistry, SinkRegistry};
use serde_json::Value;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

/// Calls every inner hook; the first failure is reported after all ran.
struct Tee(Vec<Arc<dyn BackendHook>>);

impl BackendHook for Tee {
    fn call(&self, args: &[Value]) -> Result<(), HookError> {
        let mut first_error = None;
        for hook in self.0.iter().filter(|h| h.is_ready()) {
            if let Err(e) = hook.call(args) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn is_ready(&self) -> bool {
        self.0.iter().any(|h| h.is_ready())
    }
}

/// Backend hooks that record every call, plus the optional forwarder.
pub struct Session {
    pub emitter: Arc<Emitter>,
    pub hooks: HookRegistry,
    pub log: CallLog,
    shutdown: CancellationToken,
    forwarder: Option<JoinHandle<()>>,
}

impl Session {
    /// Build the session; must run inside the tokio runtime.
    pub fn start(config: &AnalyticsConfig) -> Self {
        let log = CallLog::new();
        let shutdown = CancellationToken::new();
        let recorded = |name: &str| -> Arc<dyn BackendHook> {
            Arc::new(RecordingHook::new(name, log.clone()))
        };

        let mut forwarder = None;
        let gtag = match &config.measurement_protocol {
            Some(mp) => {
                let (hook, handle) = MeasurementProtocolHook::spawn(
                    mp.clone(),
                    config.ga4_id.clone(),
                    Uuid::new_v4().to_string(),
                    shutdown.clone(),
                );
                forwarder = Some(handle);
                Arc::new(Tee(vec![recorded(GTAG), Arc::new(hook)])) as Arc<dyn BackendHook>
            }
            None => recorded(GTAG),
        };

        let hooks = HookRegistry::new()
            .with(GTAG, gtag)
            .with(FBQ, recorded(FBQ))
            .with(HOTJAR, recorded(HOTJAR))
            .with(CLARITY, recorded(CLARITY));

        let mut emitter = Emitter::new(SinkRegistry::resolve(&hooks, config));
        if let Some(url) = &config.page_url {
            emitter = emitter.with_page_url(url.clone());
        }
        debug!(hooks = ?hooks, "Session started");

        Self {
            emitter: Arc::new(emitter),
            hooks,
            log,
            shutdown,
            forwarder,
        }
    }

    /// Print recorded backend calls as JSON lines, oldest first.
    pub fn print_calls(&self) -> anyhow::Result<()> {
        for call in self.log.take() {
            println!("{}", serde_json::to_string(&call)?);
        }
        Ok(())
    }

    /// Stop the forwarder, letting it flush what is queued.
    pub async fn finish(self) {
        self.shutdown.cancel();
        if let Some(handle) = self.forwarder
            && let Err(e) = handle.await
        {
            warn!(error = %e, "Measurement Protocol forwarder failed");
        }
    }
}
