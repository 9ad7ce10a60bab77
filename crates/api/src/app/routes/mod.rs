use axum::{routing::get, Router};

pub mod dashboard;
pub mod options;
pub mod system;

/// Router for the report endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/dashboard", get(dashboard::dashboard))
        .route("/segments", get(dashboard::segments))
        .route("/options", get(options::options))
        .route("/diagnostics", get(system::diagnostics))
}
