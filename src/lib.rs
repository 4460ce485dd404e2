// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod coerce;
pub mod columns;
pub mod config;
pub mod pipeline;
pub mod records;
pub mod sheets;

// Fetch + pipeline glue, refresh job and HTTP surface
pub mod service;
pub mod refresh;
pub mod api;
pub mod metrics;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::coerce::{coerce_integer, coerce_number};
pub use crate::config::DashboardConfig;
pub use crate::pipeline::{assemble, Assembly, PipelineReport};
pub use crate::records::{EventRecord, LocationRecord, NewsRecord, RawRow, RecordKind};
