// src/sheets/fixture.rs
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

use crate::sheets::{SheetRange, SheetSource};

/// Serves canned `values` payloads keyed by tab name. Used by tests and for
/// running the service without network access.
#[derive(Debug, Clone, Default)]
pub struct FixtureSheetSource {
    payloads: HashMap<String, Value>,
}

impl FixtureSheetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payload(mut self, sheet_name: impl Into<String>, payload: Value) -> Self {
        self.payloads.insert(sheet_name.into(), payload);
        self
    }

    /// Convenience for tests: wrap plain string rows as `{"values": rows}`.
    pub fn with_rows(self, sheet_name: impl Into<String>, rows: &[&[&str]]) -> Self {
        let values: Vec<Vec<&str>> = rows.iter().map(|r| r.to_vec()).collect();
        self.with_payload(sheet_name, serde_json::json!({ "values": values }))
    }

    /// Load a JSON payload from disk for `sheet_name`.
    pub fn with_file(self, sheet_name: impl Into<String>, path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading sheet fixture {}", path.display()))?;
        let payload: Value = serde_json::from_str(&content)
            .with_context(|| format!("parsing sheet fixture {}", path.display()))?;
        Ok(self.with_payload(sheet_name, payload))
    }
}

#[async_trait]
impl SheetSource for FixtureSheetSource {
    async fn fetch_values(&self, range: &SheetRange) -> Result<Value> {
        self.payloads
            .get(&range.name)
            .cloned()
            .ok_or_else(|| anyhow!("no fixture for sheet {}", range.name))
    }

    fn name(&self) -> &'static str {
        "Fixture"
    }
}
