//! In-memory hook that records every call
//!
//! Several hooks can share one [`CallLog`] so the relative order of calls
//! across backends is preserved.

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use serde_json::Value;

use super::BackendHook;
use crate::error::HookError;

/// One recorded hook invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HookCall {
    pub hook: String,
    pub args: Vec<Value>,
}

impl HookCall {
    /// First argument, the hook command (`"event"`, `"track"`, ...).
    pub fn command(&self) -> Option<&str> {
        self.args.first().and_then(Value::as_str)
    }

    /// Second argument when it is a string (event name, config id, ...).
    pub fn target(&self) -> Option<&str> {
        self.args.get(1).and_then(Value::as_str)
    }

    /// Third argument, the parameter object.
    pub fn params(&self) -> Option<&Value> {
        self.args.get(2)
    }
}

/// Shared, ordered log of hook calls.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<HookCall>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, call: HookCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    /// Snapshot of all recorded calls.
    pub fn calls(&self) -> Vec<HookCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return all recorded calls.
    pub fn take(&self) -> Vec<HookCall> {
        std::mem::take(&mut *self.calls.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn len(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Behavior {
    Record,
    Fail,
    Panic,
    NotReady,
}

/// Hook that records calls into a [`CallLog`].
#[derive(Debug)]
pub struct RecordingHook {
    name: String,
    log: CallLog,
    behavior: Behavior,
}

impl RecordingHook {
    pub fn new(name: impl Into<String>, log: CallLog) -> Self {
        Self::with_behavior(name, log, Behavior::Record)
    }

    /// A hook whose every call fails.
    pub fn failing(name: impl Into<String>, log: CallLog) -> Self {
        Self::with_behavior(name, log, Behavior::Fail)
    }

    /// A hook whose every call panics.
    pub fn panicking(name: impl Into<String>, log: CallLog) -> Self {
        Self::with_behavior(name, log, Behavior::Panic)
    }

    /// A hook that is present but not callable.
    pub fn not_ready(name: impl Into<String>, log: CallLog) -> Self {
        Self::with_behavior(name, log, Behavior::NotReady)
    }

    fn with_behavior(name: impl Into<String>, log: CallLog, behavior: Behavior) -> Self {
        Self {
            name: name.into(),
            log,
            behavior,
        }
    }
}

impl BackendHook for RecordingHook {
    fn call(&self, args: &[Value]) -> Result<(), HookError> {
        if !args.first().is_some_and(Value::is_string) {
            return Err(HookError::CallShape(format!(
                "{} expects a command string first",
                self.name
            )));
        }
        match self.behavior {
            Behavior::Record => {
                self.log.push(HookCall {
                    hook: self.name.clone(),
                    args: args.to_vec(),
                });
                Ok(())
            }
            Behavior::Fail => Err(HookError::Failed(format!("{} is broken", self.name))),
            Behavior::Panic => panic!("{} hook panicked", self.name),
            Behavior::NotReady => Err(HookError::Closed),
        }
    }

    fn is_ready(&self) -> bool {
        self.behavior != Behavior::NotReady
    }
}
