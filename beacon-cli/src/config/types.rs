use std::path::PathBuf;
use std::time::Duration;

use beacon_core::{AnalyticsConfig, MeasurementProtocolConfig};
use beacon_engage::MonitorConfig;
use beacon_lead::DEFAULT_LEAD_ENDPOINT;
use serde::{Deserialize, Serialize};

use super::layers::default_assignments_path;

/// Configuration as stored in TOML files (with optional fields for merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawBeaconConfig {
    #[serde(default)]
    pub analytics: RawAnalyticsConfig,

    #[serde(default)]
    pub monitors: RawMonitorConfig,

    #[serde(default)]
    pub experiments: RawExperimentsConfig,

    #[serde(default)]
    pub lead: RawLeadConfig,
}

/// Analytics section as stored in TOML
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawAnalyticsConfig {
    pub ga4_id: Option<String>,
    pub fb_pixel_id: Option<String>,
    pub clarity_id: Option<String>,
    pub hotjar_id: Option<String>,
    pub debug: Option<bool>,
    pub page_url: Option<String>,
    pub measurement_protocol: Option<MeasurementProtocolConfig>,
}

impl RawAnalyticsConfig {
    /// Backend id by field name, when this layer sets it.
    pub fn backend_id(&self, key: &str) -> Option<&str> {
        match key {
            "ga4_id" => self.ga4_id.as_deref(),
            "fb_pixel_id" => self.fb_pixel_id.as_deref(),
            "clarity_id" => self.clarity_id.as_deref(),
            "hotjar_id" => self.hotjar_id.as_deref(),
            _ => None,
        }
    }
}

/// Monitors section as stored in TOML
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawMonitorConfig {
    pub scroll_thresholds: Option<Vec<u32>>,
    pub time_thresholds: Option<Vec<u32>>,
    #[serde(default, with = "humantime_serde")]
    pub poll_interval: Option<Duration>,
    #[serde(default, with = "humantime_serde")]
    pub scroll_throttle: Option<Duration>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawExperimentsConfig {
    pub store_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawLeadConfig {
    pub endpoint: Option<String>,
}

/// Final configuration with defaults applied
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BeaconConfig {
    #[serde(default)]
    pub analytics: AnalyticsConfig,

    #[serde(default)]
    pub monitors: MonitorConfig,

    #[serde(default)]
    pub experiments: ExperimentsConfig,

    #[serde(default)]
    pub lead: LeadConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentsConfig {
    /// File the visitor's assignments are kept in
    pub store_path: PathBuf,
}

impl Default for ExperimentsConfig {
    fn default() -> Self {
        Self {
            store_path: default_assignments_path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadConfig {
    /// Lead-capture endpoint URL
    pub endpoint: String,
}

impl Default for LeadConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_LEAD_ENDPOINT.to_string(),
        }
    }
}
