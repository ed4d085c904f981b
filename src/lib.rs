// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod api;
pub mod compose;
pub mod config;
pub mod hashing;
pub mod ingest;
pub mod scout;
pub mod side_data;
pub mod sink;
pub mod tasks;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::config::ScoutConfig;
pub use crate::tasks::{Task, TaskOutcome, TaskRunner};

/// Build the full HTTP app from config: task routes plus `/metrics` when a handle is given.
pub fn app(
    config: ScoutConfig,
    metrics: Option<&telemetry::Metrics>,
) -> anyhow::Result<axum::Router> {
    let runner = TaskRunner::from_config(config)?;
    let router = create_router(AppState::new(runner));
    Ok(match metrics {
        Some(m) => router.merge(m.router()),
        None => router,
    })
}
