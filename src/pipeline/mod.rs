// src/pipeline/mod.rs
//! Sheet values → admissible records.
//!
//! normalize (positional decode) → validate (admissibility) → assemble
//! (ordered output + report). The whole chain is pure: same input, same
//! output, no I/O and no state carried between calls. Bad rows are dropped,
//! bad numbers become 0, and an unexpected payload shape is an empty dataset.

pub mod normalize;
pub mod validate;

use serde::Serialize;
use serde_json::Value;

use crate::columns::{ColumnLayout, SentinelPolicy};
use crate::records::{EventRecord, LocationRecord, NewsRecord, RawRow, RecordKind};

/// A record shape the pipeline can produce from a sheet row.
pub trait SheetRecord: Sized {
    type Columns;
    const KIND: RecordKind;

    fn columns(layout: &ColumnLayout) -> &Self::Columns;
    fn from_row(row: &[String], columns: &Self::Columns) -> Option<Self>;
    fn is_admissible(&self, policy: &SentinelPolicy) -> bool;
}

impl SheetRecord for LocationRecord {
    type Columns = crate::columns::DemographicsColumns;
    const KIND: RecordKind = RecordKind::Demographics;

    fn columns(layout: &ColumnLayout) -> &Self::Columns {
        &layout.demographics
    }
    fn from_row(row: &[String], columns: &Self::Columns) -> Option<Self> {
        normalize::normalize_location(row, columns)
    }
    fn is_admissible(&self, policy: &SentinelPolicy) -> bool {
        validate::location_admissible(self, policy)
    }
}

impl SheetRecord for NewsRecord {
    type Columns = crate::columns::NewsColumns;
    const KIND: RecordKind = RecordKind::News;

    fn columns(layout: &ColumnLayout) -> &Self::Columns {
        &layout.news
    }
    fn from_row(row: &[String], columns: &Self::Columns) -> Option<Self> {
        normalize::normalize_news(row, columns)
    }
    fn is_admissible(&self, _policy: &SentinelPolicy) -> bool {
        validate::news_admissible(self)
    }
}

impl SheetRecord for EventRecord {
    type Columns = crate::columns::EventsColumns;
    const KIND: RecordKind = RecordKind::Events;

    fn columns(layout: &ColumnLayout) -> &Self::Columns {
        &layout.events
    }
    fn from_row(row: &[String], columns: &Self::Columns) -> Option<Self> {
        normalize::normalize_event(row, columns)
    }
    fn is_admissible(&self, _policy: &SentinelPolicy) -> bool {
        validate::event_admissible(self)
    }
}

/// Why a row did not make it into the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Not an array, or shorter than the layout's minimum.
    Malformed,
    /// Decoded, but failed the kind's admissibility rule.
    Inadmissible,
}

/// Per-run counters, for logs and metrics only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    pub rows: usize,
    pub malformed: usize,
    pub inadmissible: usize,
    pub kept: usize,
}

impl PipelineReport {
    fn reject(&mut self, why: Rejection) {
        match why {
            Rejection::Malformed => self.malformed += 1,
            Rejection::Inadmissible => self.inadmissible += 1,
        }
    }
}

/// Output of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly<R> {
    pub records: Vec<R>,
    pub report: PipelineReport,
}

impl<R> Default for Assembly<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            report: PipelineReport::default(),
        }
    }
}

/// Cell text the way the sheet would display it.
fn cell_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Pull the rows out of a `values` payload.
///
/// `None` per entry marks a row that is not an array. A missing or
/// non-array `values` (or a non-object payload) is an empty dataset.
pub fn rows_from_values(payload: &Value) -> Vec<Option<RawRow>> {
    let Some(values) = payload.get("values").and_then(Value::as_array) else {
        return Vec::new();
    };
    values
        .iter()
        .map(|row| {
            row.as_array()
                .map(|cells| cells.iter().map(cell_text).collect())
        })
        .collect()
}

fn classify<R: SheetRecord>(
    row: Option<&[String]>,
    columns: &R::Columns,
    policy: &SentinelPolicy,
) -> Result<R, Rejection> {
    let row = row.ok_or(Rejection::Malformed)?;
    let record = R::from_row(row, columns).ok_or(Rejection::Malformed)?;
    if record.is_admissible(policy) {
        Ok(record)
    } else {
        Err(Rejection::Inadmissible)
    }
}

/// Run already-extracted rows through the pipeline, keeping row order.
pub fn assemble_rows<R: SheetRecord>(rows: &[Option<RawRow>], layout: &ColumnLayout) -> Assembly<R> {
    let columns = R::columns(layout);
    let mut out = Assembly {
        records: Vec::with_capacity(rows.len()),
        report: PipelineReport {
            rows: rows.len(),
            ..PipelineReport::default()
        },
    };
    for row in rows {
        match classify::<R>(row.as_deref(), columns, &layout.sentinels) {
            Ok(r) => out.records.push(r),
            Err(why) => out.report.reject(why),
        }
    }
    out.report.kept = out.records.len();
    out
}

/// Run a raw `values` payload through the pipeline.
pub fn assemble<R: SheetRecord>(payload: &Value, layout: &ColumnLayout) -> Assembly<R> {
    assemble_rows(&rows_from_values(payload), layout)
}
