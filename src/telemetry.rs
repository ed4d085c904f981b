//! Tracing setup, dev-only diagnostics and the Prometheus exporter.

use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::hashing::short_digest;

pub const ENV_DEV_LOG: &str = "SCOUT_DEV_LOG";
pub const ENV_LOG_FORMAT: &str = "SCOUT_LOG_FORMAT";
const DEFAULT_FILTER: &str = "content_scout=info,warn";

/// Install a fmt subscriber filtered by `RUST_LOG`; `SCOUT_LOG_FORMAT=json` switches
/// to JSON lines. A no-op if a global subscriber is already set (e.g. by the Shuttle runtime).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let json = std::env::var(ENV_LOG_FORMAT)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    let _ = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().compact()).try_init()
    };
}

/// Dev logging gate: SCOUT_DEV_LOG=1 AND dev env (debug build or SHUTTLE_ENV in {local,development,dev}).
pub(crate) fn dev_logging_enabled() -> bool {
    let on = std::env::var(ENV_DEV_LOG).ok().as_deref() == Some("1");
    if !on {
        return false;
    }
    if cfg!(debug_assertions) {
        return true;
    }
    matches!(
        std::env::var("SHUTTLE_ENV")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "local" | "development" | "dev"
    )
}

/// Per-idea scoring diagnostics. Never logs the raw title, only its digest.
pub(crate) fn dev_log_idea(event: &str, title: &str, total: f64, min_score: f64) {
    if !dev_logging_enabled() {
        return;
    }
    let id = short_digest(title);
    info!(target: "scout", %id, %total, %min_score, event);
}

/// One-time metrics registration (so series show up on /metrics).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "scout_ideas_ingested_total",
            "Ideas kept after ingest normalization and filtering."
        );
        describe_counter!(
            "scout_provider_errors_total",
            "Idea source fetch/parse errors."
        );
        describe_counter!(
            "scout_ideas_qualified_total",
            "Ideas that passed scoring, dedup and source diversity."
        );
        describe_counter!(
            "scout_dedup_dropped_total",
            "Ideas removed as duplicate titles."
        );
        describe_counter!(
            "scout_diversity_dropped_total",
            "Ideas removed by the per-source cap."
        );
        describe_counter!(
            "scout_pieces_composed_total",
            "Content pieces composed and scored."
        );
        describe_counter!(
            "scout_pieces_auto_approved_total",
            "Content pieces auto-approved by the quality threshold."
        );
        describe_histogram!("scout_parse_ms", "Feed parse time in milliseconds.");
        describe_gauge!(
            "scout_pipeline_last_run_ts",
            "Unix ts when the scan pipeline last ran."
        );
    });
}

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder. Fails if a recorder is already installed.
    pub fn init() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new().install_recorder()?;
        ensure_metrics_described();
        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
