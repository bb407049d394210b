//! Development logging sink

use tracing::debug;

use super::Sink;
use crate::error::SinkError;
use crate::events::{Conversion, Event};

/// Logs every event through `tracing` at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl Sink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    fn send(&self, event: &Event) -> Result<(), SinkError> {
        debug!(event = %event.name(), params = ?event.parameters(), "Analytics event");
        Ok(())
    }

    fn send_conversion(&self, conversion: &Conversion) -> Result<(), SinkError> {
        debug!(
            conversion_type = %conversion.conversion_type,
            value = conversion.value,
            currency = %conversion.currency,
            "Analytics conversion"
        );
        Ok(())
    }
}
