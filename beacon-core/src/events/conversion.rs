//! Conversion, page view and navigation timing payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::EventKind;

/// Currency used when a conversion does not name one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// A reached conversion goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    pub conversion_type: String,
    pub value: f64,
    pub currency: String,
    pub timestamp: DateTime<Utc>,
}

impl Conversion {
    /// Create a zero-valued USD conversion stamped now.
    pub fn new(conversion_type: impl Into<String>) -> Self {
        Self {
            conversion_type: conversion_type.into(),
            value: 0.0,
            currency: DEFAULT_CURRENCY.to_string(),
            timestamp: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    /// Set the value when one is given, keeping zero otherwise.
    #[must_use]
    pub fn with_optional_value(self, value: Option<f64>) -> Self {
        match value {
            Some(value) => self.with_value(value),
            None => self,
        }
    }

    #[must_use]
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Transaction identifier used by purchase-shaped backend calls.
    pub fn transaction_id(&self) -> String {
        format!("conv_{}", self.timestamp.timestamp_millis())
    }

    pub(crate) fn to_kind(&self) -> EventKind {
        EventKind::Conversion {
            conversion_type: self.conversion_type.clone(),
            value: self.value,
            currency: self.currency.clone(),
            timestamp: self.timestamp,
        }
    }
}

/// Catalogue of the landing page's conversion goals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionGoal {
    HeroCta,
    PricingCta,
    SpecialOffer,
    EmailSignup,
    DemoRequest,
    ContactForm,
    FaqEngagement,
    SocialProofClick,
}

impl ConversionGoal {
    pub const ALL: [ConversionGoal; 8] = [
        Self::HeroCta,
        Self::PricingCta,
        Self::SpecialOffer,
        Self::EmailSignup,
        Self::DemoRequest,
        Self::ContactForm,
        Self::FaqEngagement,
        Self::SocialProofClick,
    ];

    /// Conversion type reported to the backends.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::HeroCta => "hero_signup",
            Self::PricingCta => "pricing_signup",
            Self::SpecialOffer => "special_offer_claim",
            Self::EmailSignup => "email_signup",
            Self::DemoRequest => "demo_request",
            Self::ContactForm => "contact_form",
            Self::FaqEngagement => "faq_engagement",
            Self::SocialProofClick => "social_proof_click",
        }
    }

    /// Default value attached to the conversion.
    pub fn value(&self) -> f64 {
        match self {
            Self::HeroCta => 100.0,
            Self::PricingCta => 150.0,
            Self::SpecialOffer => 200.0,
            Self::EmailSignup => 50.0,
            Self::DemoRequest => 300.0,
            Self::ContactForm => 75.0,
            Self::FaqEngagement => 25.0,
            Self::SocialProofClick => 30.0,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::HeroCta => "Hero section CTA click",
            Self::PricingCta => "Pricing section signup",
            Self::SpecialOffer => "Special offer claimed",
            Self::EmailSignup => "Email newsletter signup",
            Self::DemoRequest => "Demo request submitted",
            Self::ContactForm => "Contact form submitted",
            Self::FaqEngagement => "FAQ section engaged",
            Self::SocialProofClick => "Social proof element clicked",
        }
    }

    /// Parse from the conversion type string.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|goal| goal.kind() == s)
    }
}

/// A conversion attached to a tracked element: a kind plus optional value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionSpec {
    pub kind: String,
    pub value: Option<f64>,
}

impl ConversionSpec {
    pub fn new(kind: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            kind: kind.into(),
            value,
        }
    }

    /// Build the conversion, stamped now.
    pub fn to_conversion(&self) -> Conversion {
        Conversion::new(self.kind.clone()).with_optional_value(self.value)
    }
}

impl From<ConversionGoal> for ConversionSpec {
    fn from(goal: ConversionGoal) -> Self {
        Self::new(goal.kind(), Some(goal.value()))
    }
}

/// A page view as reported to page-view aware backends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageView {
    pub page_path: String,
    pub page_title: String,
}

impl PageView {
    /// Build from a path and an optional query string.
    ///
    /// The query is appended only when non-empty.
    pub fn new(path: &str, query: Option<&str>, title: impl Into<String>) -> Self {
        let page_path = match query.map(|q| q.trim_start_matches('?')) {
            Some(q) if !q.is_empty() => format!("{path}?{q}"),
            _ => path.to_string(),
        };
        Self {
            page_path,
            page_title: title.into(),
        }
    }

    pub(crate) fn to_kind(&self) -> EventKind {
        EventKind::PageView {
            page_path: self.page_path.clone(),
            page_title: self.page_title.clone(),
        }
    }
}

/// Navigation timing marks, in milliseconds since navigation start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavigationTiming {
    pub fetch_start: f64,
    pub response_end: f64,
    pub dom_content_loaded_event_end: f64,
    pub load_event_end: f64,
}

impl NavigationTiming {
    pub(crate) fn to_kind(self) -> EventKind {
        let since_fetch = |mark: f64| (mark - self.fetch_start).round() as i64;
        EventKind::PagePerformance {
            page_load_time: since_fetch(self.load_event_end),
            dom_content_loaded: since_fetch(self.dom_content_loaded_event_end),
            first_paint: since_fetch(self.response_end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_defaults_to_zero_usd() {
        let conversion = Conversion::new("email_signup");
        assert_eq!(conversion.value, 0.0);
        assert_eq!(conversion.currency, "USD");
    }

    #[test]
    fn transaction_id_uses_epoch_millis() {
        let ts = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        let conversion = Conversion::new("x").with_timestamp(ts);
        assert_eq!(conversion.transaction_id(), "conv_1700000000123");
    }

    #[test]
    fn goal_catalogue_round_trips_through_kind() {
        for goal in ConversionGoal::ALL {
            assert_eq!(ConversionGoal::parse(goal.kind()), Some(goal));
        }
        assert_eq!(ConversionGoal::ContactForm.value(), 75.0);
        assert_eq!(ConversionGoal::parse("unknown"), None);
    }

    #[test]
    fn page_view_appends_non_empty_query() {
        assert_eq!(PageView::new("/", Some("utm=x"), "Home").page_path, "/?utm=x");
        assert_eq!(PageView::new("/", Some(""), "Home").page_path, "/");
        assert_eq!(PageView::new("/pricing", None, "Pricing").page_path, "/pricing");
    }

    #[test]
    fn navigation_timing_rounds_relative_to_fetch_start() {
        let timing = NavigationTiming {
            fetch_start: 10.0,
            response_end: 120.4,
            dom_content_loaded_event_end: 400.6,
            load_event_end: 900.5,
        };
        match timing.to_kind() {
            EventKind::PagePerformance {
                page_load_time,
                dom_content_loaded,
                first_paint,
            } => {
                assert_eq!(page_load_time, 891);
                assert_eq!(dom_content_loaded, 391);
                assert_eq!(first_paint, 110);
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }
}
