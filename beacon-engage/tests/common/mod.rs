//! Shared helpers for engagement tests

use std::sync::Arc;

use beacon_core::hooks::{CallLog, GTAG, HookCall, RecordingHook};
use beacon_core::{Emitter, GtagSink, SinkRegistry};

/// Emitter with a single recording gtag sink.
pub fn recording_emitter() -> (Arc<Emitter>, CallLog) {
    let log = CallLog::new();
    let hook = Arc::new(RecordingHook::new(GTAG, log.clone()));
    let emitter = Emitter::new(SinkRegistry::new().with(Arc::new(GtagSink::new(hook, "G-TEST"))));
    (Arc::new(emitter), log)
}

/// Names of the gtag events recorded, in order.
#[allow(dead_code)]
pub fn event_names(calls: &[HookCall]) -> Vec<String> {
    calls
        .iter()
        .filter_map(|c| c.target().map(str::to_string))
        .collect()
}

/// Integer parameter `key` of every call whose event name is `name`.
#[allow(dead_code)]
pub fn int_params(calls: &[HookCall], name: &str, key: &str) -> Vec<i64> {
    calls
        .iter()
        .filter(|c| c.target() == Some(name))
        .filter_map(|c| c.params().and_then(|p| p[key].as_i64()))
        .collect()
}
