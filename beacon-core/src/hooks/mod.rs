//! Backend hooks
//!
//! A hook is the callable entry point an analytics backend exposes, such as
//! the `gtag` or `fbq` globals a tag script installs. Calls are variadic JSON
//! argument lists, mirroring `gtag("event", name, params)`.

pub mod measurement;
pub mod recording;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::HookError;

pub use measurement::{MeasurementProtocolHook, MpEvent, MpPayload};
pub use recording::{CallLog, HookCall, RecordingHook};

/// Hook name of the generic analytics tag.
pub const GTAG: &str = "gtag";
/// Hook name of the pixel-style conversion tag.
pub const FBQ: &str = "fbq";
/// Hook name of the Hotjar session recorder.
pub const HOTJAR: &str = "hj";
/// Hook name of the Microsoft Clarity session recorder.
pub const CLARITY: &str = "clarity";

/// The callable entry point of one analytics backend.
pub trait BackendHook: Send + Sync {
    /// Invoke the hook with an argument list.
    fn call(&self, args: &[Value]) -> Result<(), HookError>;

    /// Whether the hook can currently accept calls.
    ///
    /// A hook that is present but not callable reports `false` and is
    /// treated exactly like an absent one.
    fn is_ready(&self) -> bool {
        true
    }
}

/// The set of backend hooks present in this browsing context.
#[derive(Clone, Default)]
pub struct HookRegistry {
    hooks: BTreeMap<String, Arc<dyn BackendHook>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook under a name.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, hook: Arc<dyn BackendHook>) -> Self {
        self.insert(name, hook);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, hook: Arc<dyn BackendHook>) {
        self.hooks.insert(name.into(), hook);
    }

    /// Get a hook only if it is present and ready.
    pub fn available(&self, name: &str) -> Option<Arc<dyn BackendHook>> {
        self.hooks.get(name).filter(|h| h.is_ready()).cloned()
    }

    /// Call a hook if it is available; absence is not an error.
    ///
    /// Returns whether the call was made.
    pub fn call_if_present(&self, name: &str, args: &[Value]) -> Result<bool, HookError> {
        match self.available(name) {
            Some(hook) => hook.call(args).map(|()| true),
            None => Ok(false),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.hooks.keys().map(String::as_str)
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistry")
            .field("hooks", &self.hooks.keys().collect::<Vec<_>>())
            .finish()
    }
}
