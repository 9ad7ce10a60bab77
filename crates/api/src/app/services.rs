use std::sync::Arc;

use storepulse_analytics::DashboardPipeline;
use storepulse_core::{DateBounds, DateWindow};
use storepulse_infra::{
    load_snapshot, CatalogSnapshot, ConfigError, JsonFileSource, LoadSettings, RecordSource,
    Settings, SnapshotCache,
};

use crate::app::errors::ApiError;

/// Shared state behind every handler.
pub struct AppServices {
    source: Arc<dyn RecordSource>,
    cache: SnapshotCache,
    load_settings: LoadSettings,
    pipeline: DashboardPipeline,
    preferred_window: DateWindow,
}

impl AppServices {
    pub fn new(source: Arc<dyn RecordSource>, settings: &Settings) -> Result<Self, ConfigError> {
        Ok(Self {
            source,
            cache: SnapshotCache::new(settings.cache_ttl()),
            load_settings: settings.load_settings()?,
            pipeline: settings.pipeline()?,
            preferred_window: settings.selection_window()?,
        })
    }

    /// Services backed by the configured file export.
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let source = JsonFileSource::new(settings.source.path.clone());
        Self::new(Arc::new(source), settings)
    }

    pub fn pipeline(&self) -> &DashboardPipeline {
        &self.pipeline
    }

    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }

    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    /// Initial selection for a load: the preferred window clamped to its bounds.
    pub fn default_window(&self, bounds: &DateBounds) -> DateWindow {
        bounds.default_selection(self.preferred_window)
    }

    /// Current snapshot, loading it on a blocking thread when the cache is
    /// empty or expired.
    pub async fn snapshot(self: &Arc<Self>) -> Result<Arc<CatalogSnapshot>, ApiError> {
        let services = Arc::clone(self);
        tokio::task::spawn_blocking(move || {
            services
                .cache
                .get_or_try_load(|| load_snapshot(services.source.as_ref(), &services.load_settings))
        })
        .await
        .map_err(|e| ApiError::Internal(format!("snapshot load task failed: {e}")))?
        .map_err(ApiError::from)
    }
}
