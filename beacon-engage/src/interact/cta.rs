//! Call-to-action wrapper

use std::sync::Arc;

use beacon_core::{ConversionSpec, Emitter};

/// What the browser should do after a CTA activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Follow the link target
    Follow(String),
    /// Default navigation was suppressed for a custom handler
    Prevented,
}

/// A clickable call-to-action that reports `cta_click` on activation.
pub struct TrackedCta {
    location: String,
    text: String,
    href: String,
    conversion: Option<ConversionSpec>,
    emitter: Arc<Emitter>,
}

impl TrackedCta {
    pub fn new(emitter: Arc<Emitter>, location: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            text: text.into(),
            href: "#".to_string(),
            conversion: None,
            emitter,
        }
    }

    #[must_use]
    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = href.into();
        self
    }

    /// Also report a conversion on every activation.
    #[must_use]
    pub fn with_conversion(mut self, conversion: impl Into<ConversionSpec>) -> Self {
        self.conversion = Some(conversion.into());
        self
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Track the click and let the browser follow the link.
    pub fn activate(&self) -> Navigation {
        self.track();
        Navigation::Follow(self.href.clone())
    }

    /// Track the click, suppress navigation, then run `handler`.
    pub fn activate_with<F, R>(&self, handler: F) -> R
    where
        F: FnOnce() -> R,
    {
        self.track();
        handler()
    }

    fn track(&self) {
        self.emitter.cta_click(&self.location, &self.text);
        if let Some(conversion) = &self.conversion {
            self.emitter.conversion(conversion.to_conversion());
        }
    }
}
