//! Error types for beacon-core

use thiserror::Error;

/// Errors raised by a backend hook call.
#[derive(Error, Debug)]
pub enum HookError {
    #[error("hook rejected call shape: {0}")]
    CallShape(String),

    #[error("hook queue is full")]
    QueueFull,

    #[error("hook is closed")]
    Closed,

    #[error("hook failed: {0}")]
    Failed(String),
}

/// Errors raised by a sink adapter.
///
/// The emitter logs and swallows these; they never reach the code that
/// triggered the event.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("backend hook error: {0}")]
    Hook(#[from] HookError),

    #[error("failed to encode parameters: {0}")]
    Encode(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_error_wraps_hook_error() {
        let err: SinkError = HookError::QueueFull.into();
        assert_eq!(err.to_string(), "backend hook error: hook queue is full");
    }

    #[test]
    fn hook_error_call_shape_displays_detail() {
        let err = HookError::CallShape("expected command".to_string());
        assert!(err.to_string().contains("expected command"));
    }
}
