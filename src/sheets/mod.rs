// src/sheets/mod.rs
//! Where sheet `values` payloads come from.

pub mod fixture;
pub mod http;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use fixture::FixtureSheetSource;
pub use http::HttpSheetSource;

/// A tab name plus an A1 range inside it, e.g. `Demografia` / `A2:Z`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetRange {
    pub name: String,
    pub range: String,
}

impl SheetRange {
    pub fn new(name: impl Into<String>, range: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            range: range.into(),
        }
    }

    /// `Name!A2:Z`
    pub fn a1(&self) -> String {
        format!("{}!{}", self.name, self.range)
    }
}

/// Fetches the raw JSON payload (`{"values": [[...], ...]}`) for one range.
#[async_trait::async_trait]
pub trait SheetSource: Send + Sync {
    async fn fetch_values(&self, range: &SheetRange) -> Result<Value>;
    fn name(&self) -> &'static str;
}
