//! Configuration loading and representation.
//!
//! Layers, later wins:
//! 1. built-in defaults (`Settings::default()`)
//! 2. `storepulse.toml` in the working directory, if present (or an explicit
//!    file passed to [`Settings::load_from`])
//! 3. environment variables prefixed `STOREPULSE__`, sections separated by
//!    `__` (e.g. `STOREPULSE__CACHE__TTL_SECS=60`)

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use storepulse_analytics::{DashboardPipeline, QuantileProfile, SegmentLabels};
use storepulse_catalog::NormalizationRules;
use storepulse_core::{DateBounds, DateWindow};

use crate::loader::LoadSettings;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Validation(String),
}

impl ConfigError {
    fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub source: SourceSettings,
    pub cache: CacheSettings,
    pub server: ServerSettings,
    pub analytics: AnalyticsSettings,
    pub normalization: NormalizationSettings,
    pub windows: WindowSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// JSON array or NDJSON product export.
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub ttl_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_addr: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalyticsSettings {
    /// `standard` (0.25/0.75) or `tertile` (0.33/0.67).
    pub quantile_profile: String,
    /// `en` or `vi`.
    pub locale: String,
    pub ranking_limit: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NormalizationSettings {
    pub price_floor: u64,
    pub max_price: u64,
    pub max_history_events: usize,
}

/// Default windows used when the data itself does not decide.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    /// Bounds used when a load has no dated events.
    pub data_start: NaiveDate,
    pub data_end: NaiveDate,
    /// Preferred initial selection, clamped to the load's bounds.
    pub selection_start: NaiveDate,
    pub selection_end: NaiveDate,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/products.json"),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { ttl_secs: 3600 }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            quantile_profile: "standard".to_string(),
            locale: "en".to_string(),
            ranking_limit: 5,
        }
    }
}

impl Default for NormalizationSettings {
    fn default() -> Self {
        let rules = NormalizationRules::default();
        Self {
            price_floor: rules.price_floor,
            max_price: rules.max_price,
            max_history_events: rules.max_history_events,
        }
    }
}

impl Default for WindowSettings {
    fn default() -> Self {
        let date = |m, d| NaiveDate::from_ymd_opt(2025, m, d).unwrap_or_default();
        Self {
            data_start: date(3, 5),
            data_end: date(5, 25),
            selection_start: date(3, 5),
            selection_end: date(5, 18),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source: SourceSettings::default(),
            cache: CacheSettings::default(),
            server: ServerSettings::default(),
            analytics: AnalyticsSettings::default(),
            normalization: NormalizationSettings::default(),
            windows: WindowSettings::default(),
        }
    }
}

impl Settings {
    /// Load from the optional `storepulse.toml` and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::build(config::File::with_name("storepulse").required(false))
    }

    /// Load from an explicit TOML file (must exist) and the environment.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::build(config::File::from(path).required(true))
    }

    fn build<S>(file: S) -> Result<Self, ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings: Settings = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("STOREPULSE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Check every derived parameter converts cleanly.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.quantile_profile()?;
        self.labels()?;
        self.bind_addr()?;
        self.load_settings()?;
        self.selection_window()?;
        if self.analytics.ranking_limit == 0 {
            return Err(ConfigError::validation("analytics.ranking_limit must be positive"));
        }
        Ok(())
    }

    pub fn quantile_profile(&self) -> Result<QuantileProfile, ConfigError> {
        QuantileProfile::named(&self.analytics.quantile_profile)
            .map_err(|e| ConfigError::validation(format!("analytics.quantile_profile: {e}")))
    }

    pub fn labels(&self) -> Result<SegmentLabels, ConfigError> {
        SegmentLabels::for_locale(&self.analytics.locale).ok_or_else(|| {
            ConfigError::validation(format!(
                "analytics.locale: unsupported locale '{}' (expected en or vi)",
                self.analytics.locale
            ))
        })
    }

    pub fn pipeline(&self) -> Result<DashboardPipeline, ConfigError> {
        Ok(DashboardPipeline::new(self.quantile_profile()?, self.labels()?)
            .with_ranking_limit(self.analytics.ranking_limit))
    }

    pub fn normalization_rules(&self) -> Result<NormalizationRules, ConfigError> {
        let n = &self.normalization;
        if n.price_floor == 0 {
            return Err(ConfigError::validation("normalization.price_floor must be positive"));
        }
        if n.max_price <= n.price_floor {
            return Err(ConfigError::validation(
                "normalization.max_price must exceed normalization.price_floor",
            ));
        }
        Ok(NormalizationRules {
            price_floor: n.price_floor,
            max_price: n.max_price,
            max_history_events: n.max_history_events,
        })
    }

    pub fn load_settings(&self) -> Result<LoadSettings, ConfigError> {
        let w = &self.windows;
        let fallback_bounds = DateBounds::new(w.data_start, w.data_end)
            .map_err(|e| ConfigError::validation(format!("windows.data_*: {e}")))?;
        Ok(LoadSettings {
            rules: self.normalization_rules()?,
            fallback_bounds,
        })
    }

    pub fn selection_window(&self) -> Result<DateWindow, ConfigError> {
        let w = &self.windows;
        DateWindow::new(w.selection_start, w.selection_end)
            .map_err(|e| ConfigError::validation(format!("windows.selection_*: {e}")))
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server.bind_addr.parse().map_err(|e| {
            ConfigError::validation(format!(
                "server.bind_addr '{}': {e}",
                self.server.bind_addr
            ))
        })
    }
}
