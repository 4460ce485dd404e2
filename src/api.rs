use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shuttle_axum::axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::config::DashboardConfig;
use crate::records::{for_departamento, EventRecord, LocationRecord, NewsRecord};
use crate::refresh::{DashboardStore, RefreshOutcome, Status};
use crate::sheets::SheetSource;

/// Map frontend assets, served for any path the API does not own.
pub const STATIC_DIR: &str = "static";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DashboardStore>,
    pub source: Arc<dyn SheetSource>,
    pub cfg: Arc<DashboardConfig>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/locations", get(locations))
        .route("/api/news", get(news))
        .route("/api/events", get(events))
        .route("/api/status", get(status))
        .route("/api/refresh", post(refresh))
        .fallback_service(ServeDir::new(STATIC_DIR))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Deserialize)]
struct DepartamentoQuery {
    #[serde(default)]
    departamento: Option<String>,
}

impl DepartamentoQuery {
    // `?departamento=` means "all", same as leaving it out.
    fn name(&self) -> Option<&str> {
        self.departamento.as_deref().filter(|s| !s.is_empty())
    }
}

async fn locations(State(state): State<AppState>) -> Json<Vec<LocationRecord>> {
    Json(state.store.snapshot().locations.clone())
}

async fn news(
    State(state): State<AppState>,
    Query(q): Query<DepartamentoQuery>,
) -> Json<Vec<NewsRecord>> {
    let snap = state.store.snapshot();
    Json(for_departamento(&snap.news, q.name()))
}

async fn events(
    State(state): State<AppState>,
    Query(q): Query<DepartamentoQuery>,
) -> Json<Vec<EventRecord>> {
    let snap = state.store.snapshot();
    Json(for_departamento(&snap.events, q.name()))
}

async fn status(State(state): State<AppState>) -> Json<Status> {
    Json(state.store.snapshot().status())
}

#[derive(Serialize)]
struct RefreshResp {
    refreshed: bool,
    status: Status,
}

async fn refresh(State(state): State<AppState>) -> Json<RefreshResp> {
    let outcome = state
        .store
        .refresh(state.source.as_ref(), &state.cfg, false)
        .await;
    Json(RefreshResp {
        refreshed: outcome == RefreshOutcome::Refreshed,
        status: state.store.snapshot().status(),
    })
}
