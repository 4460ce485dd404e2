// src/service.rs
//! Fetch a sheet and run it through the pipeline.
//!
//! `load_*` never fail: a fetch error is logged, counted and turned into an
//! empty dataset, which is what the dashboard panels expect. Callers that
//! must tell "unavailable" from "empty" use `try_load` instead.

use anyhow::Result;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram};
use once_cell::sync::OnceCell;

use crate::config::DashboardConfig;
use crate::pipeline::{assemble, Assembly, PipelineReport, SheetRecord};
use crate::records::{EventRecord, LocationRecord, NewsRecord, RecordKind};
use crate::sheets::SheetSource;

/// One-time metrics registration (so series show up on /metrics).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("pipeline_rows_total", "Rows received from the sheet.");
        describe_counter!(
            "pipeline_malformed_total",
            "Rows dropped as malformed (not a row, or too short)."
        );
        describe_counter!(
            "pipeline_inadmissible_total",
            "Records dropped by the admissibility rules."
        );
        describe_counter!("pipeline_kept_total", "Records kept after filtering.");
        describe_counter!("sheets_fetch_errors_total", "Sheet fetch/decode errors.");
        describe_histogram!("sheets_fetch_ms", "Sheet fetch time in milliseconds.");
        describe_gauge!("refresh_last_run_ts", "Unix ts of the last dataset refresh.");
    });
}

fn record_report(kind: RecordKind, report: &PipelineReport) {
    let k = kind.as_str();
    counter!("pipeline_rows_total", "kind" => k).increment(report.rows as u64);
    counter!("pipeline_malformed_total", "kind" => k).increment(report.malformed as u64);
    counter!("pipeline_inadmissible_total", "kind" => k).increment(report.inadmissible as u64);
    counter!("pipeline_kept_total", "kind" => k).increment(report.kept as u64);
}

/// Fetch once and assemble. Errors only when the fetch itself fails.
pub async fn try_load<R: SheetRecord>(
    source: &dyn SheetSource,
    cfg: &DashboardConfig,
) -> Result<Assembly<R>> {
    ensure_metrics_described();
    let range = cfg.sheets.range_for(R::KIND);

    let payload = match source.fetch_values(range).await {
        Ok(p) => p,
        Err(e) => {
            counter!("sheets_fetch_errors_total", "kind" => R::KIND.as_str()).increment(1);
            return Err(e);
        }
    };

    let out: Assembly<R> = assemble(&payload, &cfg.layout);
    record_report(R::KIND, &out.report);
    tracing::debug!(
        target: "pipeline",
        kind = %R::KIND,
        source = source.name(),
        rows = out.report.rows,
        malformed = out.report.malformed,
        inadmissible = out.report.inadmissible,
        kept = out.report.kept,
        "sheet assembled"
    );
    if R::KIND == RecordKind::Demographics && out.report.kept == 0 {
        tracing::warn!(target: "pipeline", rows = out.report.rows, "no valid demographics rows after parsing");
    }
    Ok(out)
}

/// [`try_load`] with `error_retry_count` extra attempts spaced by `retry_delay`.
pub async fn try_load_with_retry<R: SheetRecord>(
    source: &dyn SheetSource,
    cfg: &DashboardConfig,
) -> Result<Assembly<R>> {
    let mut attempt = 0u32;
    loop {
        match try_load::<R>(source, cfg).await {
            Ok(out) => return Ok(out),
            Err(e) if attempt < cfg.refresh.error_retry_count => {
                attempt += 1;
                tracing::warn!(
                    target: "sheets",
                    error = ?e,
                    kind = %R::KIND,
                    attempt,
                    "sheet fetch failed, retrying"
                );
                tokio::time::sleep(cfg.refresh.retry_delay()).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Fetch and assemble; any failure becomes an empty dataset.
pub async fn load<R: SheetRecord>(source: &dyn SheetSource, cfg: &DashboardConfig) -> Vec<R> {
    match try_load::<R>(source, cfg).await {
        Ok(out) => out.records,
        Err(e) => {
            tracing::warn!(
                target: "sheets",
                error = ?e,
                kind = %R::KIND,
                sheet = %cfg.sheets.range_for(R::KIND).a1(),
                "sheet unavailable, using empty dataset"
            );
            Vec::new()
        }
    }
}

pub async fn load_locations(source: &dyn SheetSource, cfg: &DashboardConfig) -> Vec<LocationRecord> {
    load(source, cfg).await
}

pub async fn load_news(source: &dyn SheetSource, cfg: &DashboardConfig) -> Vec<NewsRecord> {
    load(source, cfg).await
}

pub async fn load_events(source: &dyn SheetSource, cfg: &DashboardConfig) -> Vec<EventRecord> {
    load(source, cfg).await
}
