// tests/refresh_store.rs
use anyhow::{bail, Result};
use async_trait::async_trait;
use regional_dashboard::config::DashboardConfig;
use regional_dashboard::records::RecordKind;
use regional_dashboard::refresh::{spawn_refresh_task, DashboardStore, RefreshOutcome};
use regional_dashboard::sheets::{FixtureSheetSource, SheetRange, SheetSource};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Fixture source that counts calls and can be told to fail the news sheet.
struct CountingSource {
    inner: FixtureSheetSource,
    calls: AtomicUsize,
    news_down: AtomicBool,
}

impl CountingSource {
    fn new(cfg: &DashboardConfig) -> Self {
        let inner = FixtureSheetSource::new()
            .with_rows(
                cfg.sheets.demographics.name.clone(),
                &[&["5", "3", "1000000", "Capital", "", "", "250000", "-27.48", "-58.83"]],
            )
            .with_rows(cfg.sheets.news.name.clone(), &[&["Capital", "Titular"]])
            .with_rows(cfg.sheets.events.name.clone(), &[&["Goya", "Feria"], &["Capital", "Carnaval"]]);
        Self {
            inner,
            calls: AtomicUsize::new(0),
            news_down: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl SheetSource for CountingSource {
    async fn fetch_values(&self, range: &SheetRange) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if range.name == "Dummy - Noticias" && self.news_down.load(Ordering::SeqCst) {
            bail!("news sheet unavailable");
        }
        self.inner.fetch_values(range).await
    }
    fn name(&self) -> &'static str {
        "Counting"
    }
}

fn test_cfg() -> DashboardConfig {
    let mut cfg = DashboardConfig::default();
    cfg.refresh.retry_delay_secs = 0;
    cfg.refresh.error_retry_count = 2;
    cfg
}

#[tokio::test]
async fn refresh_fills_snapshot() {
    let cfg = test_cfg();
    let src = CountingSource::new(&cfg);
    let store = DashboardStore::new(cfg.refresh.dedup_window());

    assert!(store.snapshot().fetched_at.is_none());
    let outcome = store.refresh(&src, &cfg, false).await;
    assert_eq!(outcome, RefreshOutcome::Refreshed);

    let snap = store.snapshot();
    assert_eq!(snap.locations.len(), 1);
    assert_eq!(snap.news.len(), 1);
    assert_eq!(snap.events.len(), 2);
    assert!(snap.fetched_at.is_some());
    assert!(snap.errors.is_empty());
    assert_eq!(snap.reports.len(), 3);
    assert_eq!(src.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn second_refresh_inside_window_is_deduplicated() {
    let cfg = test_cfg();
    let src = CountingSource::new(&cfg);
    let store = DashboardStore::new(Duration::from_secs(60));

    store.refresh(&src, &cfg, false).await;
    let first = store.snapshot();
    assert_eq!(
        store.refresh(&src, &cfg, false).await,
        RefreshOutcome::Deduplicated
    );
    assert_eq!(src.calls.load(Ordering::SeqCst), 3);
    // untouched snapshot
    assert!(Arc::ptr_eq(&first, &store.snapshot()));

    // forced refresh goes through and swaps the snapshot wholesale
    assert_eq!(store.refresh(&src, &cfg, true).await, RefreshOutcome::Refreshed);
    assert!(!Arc::ptr_eq(&first, &store.snapshot()));
}

#[tokio::test]
async fn failed_kind_is_empty_and_reported_after_retries() {
    let cfg = test_cfg();
    let src = CountingSource::new(&cfg);
    src.news_down.store(true, Ordering::SeqCst);
    let store = DashboardStore::new(Duration::ZERO);

    store.refresh(&src, &cfg, false).await;
    let snap = store.snapshot();
    assert!(snap.news.is_empty());
    assert_eq!(snap.locations.len(), 1);
    assert_eq!(snap.errors.len(), 1);
    assert_eq!(snap.errors[0].kind, RecordKind::News);
    assert!(snap.errors[0].error.contains("news sheet unavailable"));
    // 2 good sheets + news tried 1 + 2 retries
    assert_eq!(src.calls.load(Ordering::SeqCst), 5);

    // recovery replaces the empty list on the next refresh
    src.news_down.store(false, Ordering::SeqCst);
    store.refresh(&src, &cfg, false).await;
    let snap = store.snapshot();
    assert_eq!(snap.news.len(), 1);
    assert!(snap.errors.is_empty());
}

#[tokio::test(start_paused = true)]
async fn background_task_refreshes_on_interval() {
    let mut cfg = test_cfg();
    cfg.refresh.interval_secs = 300;
    cfg.refresh.dedup_window_secs = 0;
    let cfg = Arc::new(cfg);
    let src = Arc::new(CountingSource::new(&cfg));
    let store = Arc::new(DashboardStore::new(cfg.refresh.dedup_window()));

    let handle = spawn_refresh_task(store.clone(), src.clone(), cfg.clone());

    // nothing before the first interval elapses
    tokio::time::sleep(Duration::from_secs(299)).await;
    assert!(store.snapshot().fetched_at.is_none());

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(store.snapshot().events.len(), 2);
    assert_eq!(src.calls.load(Ordering::SeqCst), 3);

    tokio::time::sleep(Duration::from_secs(300)).await;
    assert_eq!(src.calls.load(Ordering::SeqCst), 6);

    handle.abort();
}
