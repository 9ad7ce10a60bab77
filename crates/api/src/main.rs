use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use storepulse_api::app::{build_app, AppServices};
use storepulse_infra::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    storepulse_observability::init();

    let settings = match std::env::var_os("STOREPULSE_CONFIG") {
        Some(path) => Settings::load_from(&PathBuf::from(path)),
        None => Settings::load(),
    }
    .context("failed to load configuration")?;

    let addr = settings.bind_addr()?;
    let services = Arc::new(AppServices::from_settings(&settings)?);

    // Warm the cache; a failing source is reported per request afterwards.
    match services.snapshot().await {
        Ok(snapshot) => tracing::info!(
            load_id = %snapshot.load_id,
            records = snapshot.records.len(),
            "initial catalog load complete"
        ),
        Err(err) => tracing::warn!(error = %err, "initial catalog load failed"),
    }

    let app = build_app(Arc::clone(&services));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        source = %services.source_description(),
        "listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
