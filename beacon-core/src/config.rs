//! Analytics backend configuration

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Placeholder ids used when no real id is configured.
pub const PLACEHOLDER_GA4_ID: &str = "G-XXXXXXXXXX";
pub const PLACEHOLDER_CLARITY_ID: &str = "XXXXXXXXXX";
pub const PLACEHOLDER_HOTJAR_ID: &str = "XXXXXXX";
pub const PLACEHOLDER_FB_PIXEL_ID: &str = "XXXXXXXXXXXXXXX";

/// Default GA4 Measurement Protocol collection endpoint.
pub const DEFAULT_MP_ENDPOINT: &str = "https://www.google-analytics.com/mp/collect";

/// Ids and switches for the analytics backends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Google Analytics 4 measurement id
    pub ga4_id: String,

    /// Facebook pixel id
    pub fb_pixel_id: String,

    /// Microsoft Clarity project id
    pub clarity_id: String,

    /// Hotjar site id
    pub hotjar_id: String,

    /// Log every emitted event (development mode)
    #[serde(default)]
    pub debug: bool,

    /// URL stamped on page-scoped events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,

    /// Server-side forwarding of gtag calls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement_protocol: Option<MeasurementProtocolConfig>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            ga4_id: PLACEHOLDER_GA4_ID.to_string(),
            fb_pixel_id: PLACEHOLDER_FB_PIXEL_ID.to_string(),
            clarity_id: PLACEHOLDER_CLARITY_ID.to_string(),
            hotjar_id: PLACEHOLDER_HOTJAR_ID.to_string(),
            debug: false,
            page_url: None,
            measurement_protocol: None,
        }
    }
}

/// Backend id fields and the environment variables that override them.
pub const ID_ENV_OVERRIDES: [(&str, &str); 4] = [
    ("ga4_id", "BEACON_GA4_ID"),
    ("fb_pixel_id", "BEACON_FB_PIXEL_ID"),
    ("clarity_id", "BEACON_CLARITY_ID"),
    ("hotjar_id", "BEACON_HOTJAR_ID"),
];

/// Value of an override variable, if set and non-empty.
pub fn env_override(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|value| !value.is_empty())
}

impl AnalyticsConfig {
    /// Apply `BEACON_*` environment overrides for the backend ids.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        for (key, var) in ID_ENV_OVERRIDES {
            if let Some(value) = env_override(var)
                && let Some(slot) = self.backend_id_mut(key)
            {
                *slot = value;
            }
        }
        self
    }

    /// Backend id by field name (`ga4_id`, `fb_pixel_id`, `clarity_id`, `hotjar_id`).
    pub fn backend_id(&self, key: &str) -> Option<&str> {
        match key {
            "ga4_id" => Some(&self.ga4_id),
            "fb_pixel_id" => Some(&self.fb_pixel_id),
            "clarity_id" => Some(&self.clarity_id),
            "hotjar_id" => Some(&self.hotjar_id),
            _ => None,
        }
    }

    fn backend_id_mut(&mut self, key: &str) -> Option<&mut String> {
        match key {
            "ga4_id" => Some(&mut self.ga4_id),
            "fb_pixel_id" => Some(&mut self.fb_pixel_id),
            "clarity_id" => Some(&mut self.clarity_id),
            "hotjar_id" => Some(&mut self.hotjar_id),
            _ => None,
        }
    }

    /// Whether a backend id is still its placeholder.
    pub fn is_placeholder(&self, key: &str) -> bool {
        let placeholder = match key {
            "ga4_id" => PLACEHOLDER_GA4_ID,
            "fb_pixel_id" => PLACEHOLDER_FB_PIXEL_ID,
            "clarity_id" => PLACEHOLDER_CLARITY_ID,
            "hotjar_id" => PLACEHOLDER_HOTJAR_ID,
            _ => return false,
        };
        self.backend_id(key) == Some(placeholder)
    }
}

/// GA4 Measurement Protocol forwarding settings.
///
/// The API secret is never serialized and prints as `[REDACTED]` in debug
/// output; only the forwarding worker reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementProtocolConfig {
    /// API secret created in the GA4 admin
    #[serde(skip_serializing)]
    api_secret: SecretString,

    /// Collection endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Calls buffered before new ones are dropped
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

fn default_endpoint() -> String {
    DEFAULT_MP_ENDPOINT.to_string()
}

fn default_queue_capacity() -> usize {
    256
}

impl MeasurementProtocolConfig {
    pub fn new(api_secret: impl Into<String>) -> Self {
        Self {
            api_secret: SecretString::from(api_secret.into()),
            endpoint: default_endpoint(),
            queue_capacity: default_queue_capacity(),
        }
    }

    /// Expose the API secret.
    ///
    /// Use only when building the collection request.
    pub fn expose_api_secret(&self) -> &str {
        self.api_secret.expose_secret()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_placeholders() {
        let config = AnalyticsConfig::default();
        assert_eq!(config.ga4_id, PLACEHOLDER_GA4_ID);
        assert!(!config.debug);
        assert!(config.measurement_protocol.is_none());
    }

    #[test]
    fn measurement_protocol_fills_defaults() {
        let parsed: MeasurementProtocolConfig = toml::from_str(r#"api_secret = "s3cret""#).unwrap();
        assert_eq!(parsed.endpoint, DEFAULT_MP_ENDPOINT);
        assert_eq!(parsed.queue_capacity, 256);
    }

    #[test]
    fn api_secret_stays_out_of_output() {
        let parsed: MeasurementProtocolConfig =
            toml::from_str(r#"api_secret = "TOPSECRET-123""#).unwrap();

        assert_eq!(parsed.expose_api_secret(), "TOPSECRET-123");
        assert!(!format!("{parsed:?}").contains("TOPSECRET-123"));

        let config = AnalyticsConfig {
            measurement_protocol: Some(parsed),
            ..AnalyticsConfig::default()
        };
        let rendered = toml::to_string(&config).unwrap();
        assert!(!rendered.contains("TOPSECRET-123"));
        assert!(!rendered.contains("api_secret"));
        assert!(rendered.contains("queue_capacity = 256"));
    }

    #[test]
    fn env_overrides_replace_ids() {
        unsafe {
            std::env::set_var("BEACON_HOTJAR_ID", "1234567");
        }
        let config = AnalyticsConfig::default().with_env_overrides();
        assert_eq!(config.hotjar_id, "1234567");
        assert!(!config.is_placeholder("hotjar_id"));
        assert!(config.is_placeholder("ga4_id"));
        unsafe {
            std::env::remove_var("BEACON_HOTJAR_ID");
        }
    }
}
