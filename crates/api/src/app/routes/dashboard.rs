use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    Json,
};

use crate::app::dto::{DashboardResponse, ReportParams, SegmentsResponse};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub async fn dashboard(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<ReportParams>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let snapshot = services.snapshot().await?;
    let query = params.to_query(&snapshot.bounds, services.default_window(&snapshot.bounds))?;

    let report = services.pipeline().run(&snapshot.records, &query);
    tracing::debug!(
        load_id = %snapshot.load_id,
        mode = query.mode.as_str(),
        products = report.products.len(),
        "dashboard report built"
    );

    Ok(Json(DashboardResponse {
        load_id: snapshot.load_id,
        loaded_at: snapshot.loaded_at,
        bounds: snapshot.bounds,
        report,
    }))
}

/// Segment breakdown only, narrowed by `start`, `end`, `mode`, `category`
/// and `product`. A `segment` parameter is accepted but ignored: the
/// breakdown always covers every tier of the selection.
pub async fn segments(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<ReportParams>,
) -> Result<Json<SegmentsResponse>, ApiError> {
    let snapshot = services.snapshot().await?;
    let query = params.to_query(&snapshot.bounds, services.default_window(&snapshot.bounds))?;

    Ok(Json(SegmentsResponse {
        load_id: snapshot.load_id,
        window: query.window,
        mode: query.mode,
        segments: services.pipeline().segments(&snapshot.records, &query),
    }))
}
