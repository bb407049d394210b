//! Tracked interaction wrappers
//!
//! Wrappers around clickable and submittable elements. Tracking always runs
//! before any user-supplied handler.

mod cta;
mod form;

pub use cta::{Navigation, TrackedCta};
pub use form::{
    FORM_FIELD, FieldElement, FieldFocus, FieldTag, FormSubmission, TrackedForm, UNNAMED_FIELD,
};
