//! Form wrapper
//!
//! Reports field focus for text inputs and textareas, and a `submit`
//! interaction followed by the form's conversion, if it has one.

use std::collections::BTreeMap;
use std::sync::Arc;

use beacon_core::{ConversionSpec, Emitter, FormAction};
use serde::{Deserialize, Serialize};

/// Field name reported when a field has neither name nor id.
pub const UNNAMED_FIELD: &str = "unnamed_field";

/// Field name reported for whole-form submissions.
pub const FORM_FIELD: &str = "form";

/// Element kind of a focused form control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldTag {
    Input,
    Textarea,
    Select,
    Button,
    Other,
}

/// A form control that gained or lost focus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldElement {
    pub tag: FieldTag,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

impl FieldElement {
    pub fn input(name: impl Into<String>) -> Self {
        Self {
            tag: FieldTag::Input,
            name: Some(name.into()),
            id: None,
        }
    }

    pub fn textarea(name: impl Into<String>) -> Self {
        Self {
            tag: FieldTag::Textarea,
            name: Some(name.into()),
            id: None,
        }
    }

    /// Name used in tracking: name, then id, then [`UNNAMED_FIELD`].
    pub fn label(&self) -> &str {
        [self.name.as_deref(), self.id.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .unwrap_or(UNNAMED_FIELD)
    }

    /// Only text-entry controls are tracked.
    pub fn is_trackable(&self) -> bool {
        matches!(self.tag, FieldTag::Input | FieldTag::Textarea)
    }
}

/// Direction of a focus change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldFocus {
    Focus,
    Blur,
}

impl From<FieldFocus> for FormAction {
    fn from(focus: FieldFocus) -> Self {
        match focus {
            FieldFocus::Focus => FormAction::Focus,
            FieldFocus::Blur => FormAction::Blur,
        }
    }
}

/// Field values of a submitted form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSubmission {
    fields: BTreeMap<String, String>,
}

impl FormSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// A submittable form that reports submissions and field focus changes.
pub struct TrackedForm {
    name: String,
    conversion: Option<ConversionSpec>,
    emitter: Arc<Emitter>,
}

impl TrackedForm {
    pub fn new(emitter: Arc<Emitter>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            conversion: None,
            emitter,
        }
    }

    /// Also report a conversion on every submission.
    #[must_use]
    pub fn with_conversion(mut self, conversion: impl Into<ConversionSpec>) -> Self {
        self.conversion = Some(conversion.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Track a submission with no custom handler.
    pub fn submit(&self) {
        self.track_submit();
    }

    /// Track a submission, then delegate to `handler`.
    ///
    /// The handler's result, including a future, is returned untouched.
    pub fn submit_with<F, R>(&self, submission: &FormSubmission, handler: F) -> R
    where
        F: FnOnce(&FormSubmission) -> R,
    {
        self.track_submit();
        handler(submission)
    }

    /// Track a field focus change; returns whether it was reported.
    pub fn field_event(&self, element: &FieldElement, focus: FieldFocus) -> bool {
        if !element.is_trackable() {
            return false;
        }
        self.emitter
            .form_interaction(&self.name, element.label(), focus.into());
        true
    }

    fn track_submit(&self) {
        self.emitter
            .form_interaction(&self.name, FORM_FIELD, FormAction::Submit);
        if let Some(conversion) = &self.conversion {
            self.emitter.conversion(conversion.to_conversion());
        }
    }
}
