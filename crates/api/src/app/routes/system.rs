use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, Json};

use crate::app::dto::DiagnosticsResponse;
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Load diagnostics of the current snapshot (loads it if needed).
pub async fn diagnostics(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<DiagnosticsResponse>, ApiError> {
    let snapshot = services.snapshot().await?;

    Ok(Json(DiagnosticsResponse {
        load_id: snapshot.load_id,
        loaded_at: snapshot.loaded_at,
        source: services.source_description(),
        record_count: snapshot.records.len(),
        bounds: snapshot.bounds,
        bounds_from_data: snapshot.bounds_from_data,
        cache_ttl_secs: services.cache().ttl().as_secs(),
        diagnostics: snapshot.diagnostics.clone(),
    }))
}
