//! Typed tracking events
//!
//! Every event the page can send is one of the [`EventKind`] variants, each
//! with a fixed parameter shape. Extra context travels separately in the
//! [`Extras`] side-channel of an [`Event`].

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A scalar parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// Convert to a JSON value for backend call payloads.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Int(i) => serde_json::Value::from(*i),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::Text(s) => serde_json::Value::String(s.clone()),
        }
    }

    /// Numeric view of the scalar, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Text view of the scalar, if it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for Scalar {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u64> for Scalar {
    fn from(value: u64) -> Self {
        Self::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Named parameter map.
pub type Extras = BTreeMap<String, Scalar>;

/// Kind of form interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormAction {
    Focus,
    Blur,
    Submit,
}

impl FormAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::Submit => "submit",
        }
    }
}

impl fmt::Display for FormAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The closed set of events the page emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// A page was viewed
    PageView { page_path: String, page_title: String },

    /// A call-to-action was activated
    CtaClick {
        cta_location: String,
        cta_text: String,
    },

    /// The reader scrolled past a depth threshold
    ScrollDepth { depth_percentage: u32 },

    /// The reader stayed past a dwell threshold
    TimeOnPage { time_seconds: u64 },

    /// The page is being unloaded
    PageExit { time_spent: u64 },

    /// A form or one of its fields was interacted with
    FormInteraction {
        form_name: String,
        field_name: String,
        action: FormAction,
    },

    /// A conversion goal was reached
    Conversion {
        conversion_type: String,
        value: f64,
        currency: String,
        timestamp: DateTime<Utc>,
    },

    /// The browsing context was placed into an experiment variant
    AbTestAssignment { test_name: String, variant: String },

    /// Navigation timing summary, in milliseconds
    PagePerformance {
        page_load_time: i64,
        dom_content_loaded: i64,
        first_paint: i64,
    },

    /// An error was caught by the page
    Exception {
        description: String,
        fatal: bool,
        error_stack: Option<String>,
        error_info: Option<String>,
    },

    /// Free-form event carrying only extras
    Custom { name: String },
}

impl EventKind {
    /// Wire name of the event.
    pub fn name(&self) -> &str {
        match self {
            Self::PageView { .. } => "page_view",
            Self::CtaClick { .. } => "cta_click",
            Self::ScrollDepth { .. } => "scroll_depth",
            Self::TimeOnPage { .. } => "time_on_page",
            Self::PageExit { .. } => "page_exit",
            Self::FormInteraction { .. } => "form_interaction",
            Self::Conversion { .. } => "conversion",
            Self::AbTestAssignment { .. } => "ab_test_assignment",
            Self::PagePerformance { .. } => "page_performance",
            Self::Exception { .. } => "exception",
            Self::Custom { name } => name,
        }
    }

    /// Whether the event describes the reader's activity on the current page.
    ///
    /// These are stamped with the page URL by the emitter.
    pub fn is_page_scoped(&self) -> bool {
        matches!(
            self,
            Self::CtaClick { .. }
                | Self::ScrollDepth { .. }
                | Self::TimeOnPage { .. }
                | Self::PageExit { .. }
                | Self::FormInteraction { .. }
        )
    }

    /// Whether the event is a diagnostic (performance or error) signal.
    pub fn is_diagnostic(&self) -> bool {
        matches!(self, Self::PagePerformance { .. } | Self::Exception { .. })
    }

    /// Typed parameters of the event as a flat map.
    pub fn parameters(&self) -> Extras {
        let mut params = Extras::new();
        match self {
            Self::PageView {
                page_path,
                page_title,
            } => {
                params.insert("page_path".into(), page_path.as_str().into());
                params.insert("page_title".into(), page_title.as_str().into());
            }
            Self::CtaClick {
                cta_location,
                cta_text,
            } => {
                params.insert("cta_location".into(), cta_location.as_str().into());
                params.insert("cta_text".into(), cta_text.as_str().into());
            }
            Self::ScrollDepth { depth_percentage } => {
                params.insert("depth_percentage".into(), (*depth_percentage).into());
            }
            Self::TimeOnPage { time_seconds } => {
                params.insert("time_seconds".into(), (*time_seconds).into());
            }
            Self::PageExit { time_spent } => {
                params.insert("time_spent".into(), (*time_spent).into());
            }
            Self::FormInteraction {
                form_name,
                field_name,
                action,
            } => {
                params.insert("form_name".into(), form_name.as_str().into());
                params.insert("field_name".into(), field_name.as_str().into());
                params.insert("action".into(), action.as_str().into());
            }
            Self::Conversion {
                conversion_type,
                value,
                currency,
                timestamp,
            } => {
                params.insert("conversion_type".into(), conversion_type.as_str().into());
                params.insert("value".into(), (*value).into());
                params.insert("currency".into(), currency.as_str().into());
                params.insert(
                    "timestamp".into(),
                    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true).into(),
                );
            }
            Self::AbTestAssignment { test_name, variant } => {
                params.insert("test_name".into(), test_name.as_str().into());
                params.insert("variant".into(), variant.as_str().into());
            }
            Self::PagePerformance {
                page_load_time,
                dom_content_loaded,
                first_paint,
            } => {
                params.insert("page_load_time".into(), (*page_load_time).into());
                params.insert("dom_content_loaded".into(), (*dom_content_loaded).into());
                params.insert("first_paint".into(), (*first_paint).into());
            }
            Self::Exception {
                description,
                fatal,
                error_stack,
                error_info,
            } => {
                params.insert("description".into(), description.as_str().into());
                params.insert("fatal".into(), (*fatal).into());
                if let Some(stack) = error_stack {
                    params.insert("error_stack".into(), stack.as_str().into());
                }
                if let Some(info) = error_info {
                    params.insert("error_info".into(), info.as_str().into());
                }
            }
            Self::Custom { .. } => {}
        }
        params
    }
}

/// A normalized tracking event.
///
/// Immutable once built: the builder methods consume the event and the
/// fields are only readable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    kind: EventKind,
    extras: Extras,
    timestamp: DateTime<Utc>,
}

impl Event {
    /// Create an event stamped with the current time.
    pub fn new(kind: EventKind) -> Self {
        Self::at(kind, Utc::now())
    }

    /// Create an event with an explicit timestamp.
    pub fn at(kind: EventKind, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind,
            extras: Extras::new(),
            timestamp,
        }
    }

    /// Attach an extra parameter.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }

    /// Attach several extra parameters.
    #[must_use]
    pub fn with_extras(mut self, extras: Extras) -> Self {
        self.extras.extend(extras);
        self
    }

    pub fn name(&self) -> &str {
        self.kind.name()
    }

    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    pub fn extras(&self) -> &Extras {
        &self.extras
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// All parameters: typed ones, then extras whose keys don't collide.
    pub fn parameters(&self) -> Extras {
        let mut params = self.kind.parameters();
        for (key, value) in &self.extras {
            params.entry(key.clone()).or_insert_with(|| value.clone());
        }
        params
    }

    /// Parameters encoded as a JSON object.
    pub fn parameters_json(&self) -> serde_json::Map<String, serde_json::Value> {
        self.parameters()
            .into_iter()
            .map(|(k, v)| (k, v.to_json()))
            .collect()
    }
}
