//! Regional dashboard data service: binary entrypoint.
//! Loads config, fetches the sheets once, keeps them fresh in the background
//! and serves the records to the map frontend.

use std::sync::Arc;

use regional_dashboard::api::{self, AppState};
use regional_dashboard::config::DashboardConfig;
use regional_dashboard::metrics::Metrics;
use regional_dashboard::refresh::{spawn_refresh_task, DashboardStore};
use regional_dashboard::sheets::{HttpSheetSource, SheetSource};
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - DASHBOARD_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("DASHBOARD_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("regional_dashboard=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    enable_dev_tracing();

    let cfg = DashboardConfig::load_default()?;
    cfg.validate()?;
    let cfg = Arc::new(cfg);

    let metrics = Metrics::init()?;

    let source: Arc<dyn SheetSource> = Arc::new(HttpSheetSource::new(&cfg.sheets)?);
    let store = Arc::new(DashboardStore::new(cfg.refresh.dedup_window()));

    // Initial load; failures leave empty lists and are visible on /api/status.
    store.refresh(source.as_ref(), &cfg, true).await;
    spawn_refresh_task(store.clone(), source.clone(), cfg.clone());

    let state = AppState { store, source, cfg };
    let router = api::router(state).merge(metrics.router());

    Ok(router.into())
}
