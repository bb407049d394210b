use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use beacon_core::{AnalyticsConfig, ID_ENV_OVERRIDES, env_override};
use beacon_engage::MonitorConfig;

use super::layers::Layer;
use super::types::{
    BeaconConfig, ExperimentsConfig, LeadConfig, RawAnalyticsConfig, RawBeaconConfig,
    RawExperimentsConfig, RawLeadConfig, RawMonitorConfig,
};

/// The layer that last set one analytics backend id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdOrigin {
    pub key: &'static str,
    pub layer: Layer,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load merged configuration (user + project + environment)
    pub fn load() -> Result<BeaconConfig> {
        Self::load_from(&Layer::files())
    }

    /// Load and merge the given layer files in order; missing files are skipped
    pub fn load_from(files: &[(Layer, PathBuf)]) -> Result<BeaconConfig> {
        Self::load_traced(files).map(|(config, _)| config)
    }

    /// Like [`ConfigLoader::load_from`], also reporting which layer set each backend id
    pub fn load_traced(files: &[(Layer, PathBuf)]) -> Result<(BeaconConfig, Vec<IdOrigin>)> {
        let mut raw = RawBeaconConfig::default();
        let mut origins: Vec<IdOrigin> = ID_ENV_OVERRIDES
            .iter()
            .map(|&(key, _)| IdOrigin {
                key,
                layer: Layer::Default,
            })
            .collect();

        for (layer, path) in files {
            if !path.exists() {
                continue;
            }
            let overlay = Self::read_raw(path)?;
            for origin in &mut origins {
                if overlay.analytics.backend_id(origin.key).is_some() {
                    origin.layer = *layer;
                }
            }
            raw = Self::merge_raw(raw, overlay);
        }

        for (origin, (_, var)) in origins.iter_mut().zip(ID_ENV_OVERRIDES) {
            if env_override(var).is_some() {
                origin.layer = Layer::Env;
            }
        }

        Ok((Self::finalize(raw), origins))
    }

    fn read_raw(path: &Path) -> Result<RawBeaconConfig> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Invalid config in {}", path.display()))
    }

    /// Merge two raw configs (overlay values override base only if explicitly set)
    fn merge_raw(base: RawBeaconConfig, overlay: RawBeaconConfig) -> RawBeaconConfig {
        RawBeaconConfig {
            analytics: RawAnalyticsConfig {
                ga4_id: overlay.analytics.ga4_id.or(base.analytics.ga4_id),
                fb_pixel_id: overlay.analytics.fb_pixel_id.or(base.analytics.fb_pixel_id),
                clarity_id: overlay.analytics.clarity_id.or(base.analytics.clarity_id),
                hotjar_id: overlay.analytics.hotjar_id.or(base.analytics.hotjar_id),
                debug: overlay.analytics.debug.or(base.analytics.debug),
                page_url: overlay.analytics.page_url.or(base.analytics.page_url),
                measurement_protocol: overlay
                    .analytics
                    .measurement_protocol
                    .or(base.analytics.measurement_protocol),
            },
            monitors: RawMonitorConfig {
                scroll_thresholds: overlay
                    .monitors
                    .scroll_thresholds
                    .or(base.monitors.scroll_thresholds),
                time_thresholds: overlay
                    .monitors
                    .time_thresholds
                    .or(base.monitors.time_thresholds),
                poll_interval: overlay.monitors.poll_interval.or(base.monitors.poll_interval),
                scroll_throttle: overlay
                    .monitors
                    .scroll_throttle
                    .or(base.monitors.scroll_throttle),
            },
            experiments: RawExperimentsConfig {
                store_path: overlay.experiments.store_path.or(base.experiments.store_path),
            },
            lead: RawLeadConfig {
                endpoint: overlay.lead.endpoint.or(base.lead.endpoint),
            },
        }
    }

    /// Convert raw config to final config with defaults and env overrides applied
    fn finalize(raw: RawBeaconConfig) -> BeaconConfig {
        let analytics_defaults = AnalyticsConfig::default();
        let monitor_defaults = MonitorConfig::default();

        BeaconConfig {
            analytics: AnalyticsConfig {
                ga4_id: raw.analytics.ga4_id.unwrap_or(analytics_defaults.ga4_id),
                fb_pixel_id: raw
                    .analytics
                    .fb_pixel_id
                    .unwrap_or(analytics_defaults.fb_pixel_id),
                clarity_id: raw
                    .analytics
                    .clarity_id
                    .unwrap_or(analytics_defaults.clarity_id),
                hotjar_id: raw.analytics.hotjar_id.unwrap_or(analytics_defaults.hotjar_id),
                debug: raw.analytics.debug.unwrap_or(analytics_defaults.debug),
                page_url: raw.analytics.page_url,
                measurement_protocol: raw.analytics.measurement_protocol,
            }
            .with_env_overrides(),
            monitors: MonitorConfig {
                scroll_thresholds: raw
                    .monitors
                    .scroll_thresholds
                    .unwrap_or(monitor_defaults.scroll_thresholds),
                time_thresholds: raw
                    .monitors
                    .time_thresholds
                    .unwrap_or(monitor_defaults.time_thresholds),
                poll_interval: raw
                    .monitors
                    .poll_interval
                    .unwrap_or(monitor_defaults.poll_interval),
                scroll_throttle: raw
                    .monitors
                    .scroll_throttle
                    .unwrap_or(monitor_defaults.scroll_throttle),
            },
            experiments: raw
                .experiments
                .store_path
                .map(|store_path| ExperimentsConfig { store_path })
                .unwrap_or_default(),
            lead: raw
                .lead
                .endpoint
                .map(|endpoint| LeadConfig { endpoint })
                .unwrap_or_default(),
        }
    }
}
