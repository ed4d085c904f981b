//! content-scout service entrypoint.
//! Boots the Axum HTTP server on Shuttle with config, tracing and Prometheus metrics.

use content_scout::telemetry::{init_tracing, Metrics};
use content_scout::ScoutConfig;
use shuttle_axum::ShuttleAxum;

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = ScoutConfig::from_toml_or_default()?;
    let metrics = Metrics::init()?;
    tracing::info!(
        feeds = config.feeds.len(),
        snapshots = config.snapshots.len(),
        min_score = config.pipeline.min_score,
        "content-scout starting"
    );

    let router = content_scout::app(config, Some(&metrics))?;
    Ok(router.into())
}
