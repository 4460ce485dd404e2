// src/refresh.rs
//! Current dashboard dataset and the periodic job that replaces it.
//!
//! Every refresh builds a new `Snapshot` from scratch and swaps it in whole;
//! readers hold an `Arc` to whichever snapshot was current when they asked.

use chrono::{DateTime, Utc};
use metrics::{counter, gauge};
use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::DashboardConfig;
use crate::pipeline::{Assembly, PipelineReport, SheetRecord};
use crate::records::{EventRecord, LocationRecord, NewsRecord, RecordKind};
use crate::service::try_load_with_retry;
use crate::sheets::SheetSource;

#[derive(Debug, Clone, Serialize)]
pub struct FetchError {
    pub kind: RecordKind,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    pub locations: Vec<LocationRecord>,
    pub news: Vec<NewsRecord>,
    pub events: Vec<EventRecord>,
    pub fetched_at: Option<DateTime<Utc>>,
    /// Kinds whose fetch failed on the last refresh (their lists are empty).
    pub errors: Vec<FetchError>,
    #[serde(skip)]
    pub reports: Vec<(RecordKind, PipelineReport)>,
}

/// Summary served on `/api/status`.
#[derive(Debug, Clone, Serialize)]
pub struct Status {
    pub locations: usize,
    pub news: usize,
    pub events: usize,
    pub fetched_at: Option<DateTime<Utc>>,
    pub errors: Vec<FetchError>,
}

impl Snapshot {
    pub fn status(&self) -> Status {
        Status {
            locations: self.locations.len(),
            news: self.news.len(),
            events: self.events.len(),
            fetched_at: self.fetched_at,
            errors: self.errors.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Refreshed,
    /// Another refresh started less than `dedup_window` ago.
    Deduplicated,
}

#[derive(Debug)]
pub struct DashboardStore {
    snapshot: RwLock<Arc<Snapshot>>,
    last_started: Mutex<Option<Instant>>,
    dedup_window: Duration,
}

impl DashboardStore {
    pub fn new(dedup_window: Duration) -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(Snapshot::default())),
            last_started: Mutex::new(None),
            dedup_window,
        }
    }

    /// Start with a prepared snapshot (tests, offline runs).
    pub fn with_snapshot(dedup_window: Duration, snapshot: Snapshot) -> Self {
        let store = Self::new(dedup_window);
        store.replace(snapshot);
        store
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace(&self, next: Snapshot) {
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(next);
    }

    /// Take the refresh slot unless one was taken inside the dedup window.
    fn claim(&self, force: bool) -> bool {
        let mut last = self.last_started.lock().unwrap_or_else(PoisonError::into_inner);
        let recent = last.is_some_and(|t| t.elapsed() < self.dedup_window);
        if recent && !force {
            return false;
        }
        *last = Some(Instant::now());
        true
    }

    /// Fetch all three sheets and swap in the result.
    pub async fn refresh(
        &self,
        source: &dyn SheetSource,
        cfg: &DashboardConfig,
        force: bool,
    ) -> RefreshOutcome {
        if !self.claim(force) {
            counter!("refresh_deduplicated_total").increment(1);
            return RefreshOutcome::Deduplicated;
        }

        let (locations, news, events) = tokio::join!(
            try_load_with_retry::<LocationRecord>(source, cfg),
            try_load_with_retry::<NewsRecord>(source, cfg),
            try_load_with_retry::<EventRecord>(source, cfg),
        );

        let mut next = Snapshot {
            fetched_at: Some(Utc::now()),
            ..Snapshot::default()
        };
        next.locations = take(locations, &mut next.errors, &mut next.reports);
        next.news = take(news, &mut next.errors, &mut next.reports);
        next.events = take(events, &mut next.errors, &mut next.reports);

        tracing::info!(
            target: "refresh",
            locations = next.locations.len(),
            news = next.news.len(),
            events = next.events.len(),
            errors = next.errors.len(),
            "dataset refreshed"
        );
        gauge!("refresh_last_run_ts").set(Utc::now().timestamp() as f64);

        self.replace(next);
        RefreshOutcome::Refreshed
    }
}

fn take<R: SheetRecord>(
    res: anyhow::Result<Assembly<R>>,
    errors: &mut Vec<FetchError>,
    reports: &mut Vec<(RecordKind, PipelineReport)>,
) -> Vec<R> {
    match res {
        Ok(a) => {
            reports.push((R::KIND, a.report));
            a.records
        }
        Err(e) => {
            tracing::warn!(target: "refresh", error = ?e, kind = %R::KIND, "sheet unavailable");
            errors.push(FetchError {
                kind: R::KIND,
                error: format!("{e:#}"),
            });
            Vec::new()
        }
    }
}

/// Refresh every `refresh.interval_secs`. The first tick fires one interval
/// from now; do the initial load before spawning.
pub fn spawn_refresh_task(
    store: Arc<DashboardStore>,
    source: Arc<dyn SheetSource>,
    cfg: Arc<DashboardConfig>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let period = cfg.refresh.interval();
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            counter!("refresh_runs_total").increment(1);
            store.refresh(source.as_ref(), &cfg, false).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_respects_window_and_force() {
        let store = DashboardStore::new(Duration::from_secs(60));
        assert!(store.claim(false));
        assert!(!store.claim(false));
        assert!(store.claim(true));

        let no_window = DashboardStore::new(Duration::ZERO);
        assert!(no_window.claim(false));
        assert!(no_window.claim(false));
    }

    #[test]
    fn status_counts_snapshot() {
        let snap = Snapshot {
            news: vec![NewsRecord {
                departamento: "Goya".into(),
                titulo: "t".into(),
                enlace: None,
            }],
            ..Snapshot::default()
        };
        let st = snap.status();
        assert_eq!((st.locations, st.news, st.events), (0, 1, 0));
        assert!(st.fetched_at.is_none());
    }
}
