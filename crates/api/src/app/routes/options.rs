use std::sync::Arc;

use axum::{extract::Extension, Json};

use storepulse_analytics::{filter_options, Mode};
use storepulse_catalog::Segment;

use crate::app::dto::{OptionsResponse, SegmentOption};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

/// Everything a client needs to build the filter controls.
pub async fn options(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<OptionsResponse>, ApiError> {
    let snapshot = services.snapshot().await?;
    let options = filter_options(&snapshot.records);
    let labels = services.pipeline().labels();

    let segments = Segment::CANONICAL
        .iter()
        .chain(std::iter::once(&Segment::Undetermined))
        .map(|&segment| SegmentOption {
            segment,
            label: labels.label(segment).to_string(),
        })
        .collect();

    Ok(Json(OptionsResponse {
        bounds: snapshot.bounds,
        bounds_from_data: snapshot.bounds_from_data,
        default_window: services.default_window(&snapshot.bounds),
        categories: options.categories,
        products: options.products,
        modes: vec![Mode::Sales, Mode::Stock],
        segments,
    }))
}
