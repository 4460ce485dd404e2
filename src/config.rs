// src/config.rs
//! Dashboard configuration: which spreadsheet to read, how its columns are
//! laid out and how often to refresh.
//!
//! Built once at startup and passed around by reference. Every section has
//! defaults matching the current spreadsheet, so a config file only needs the
//! fields that differ.

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::columns::ColumnLayout;
use crate::records::RecordKind;
use crate::sheets::SheetRange;

pub const ENV_CONFIG_PATH: &str = "DASHBOARD_CONFIG_PATH";
pub const ENV_API_KEY: &str = "GOOGLE_SHEETS_API_KEY";
pub const DEFAULT_TOML_PATH: &str = "config/dashboard.toml";
pub const DEFAULT_JSON_PATH: &str = "config/dashboard.json";

pub const DEFAULT_SPREADSHEET_ID: &str = "11cHtcmd3KQEUlFiOAdh-bc9vtXh12qe-oB_y2opsh50";
pub const DEFAULT_API_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub api_base_url: String,
    /// Literal key, or "ENV" / empty to read `$GOOGLE_SHEETS_API_KEY`.
    #[serde(skip_serializing)]
    pub api_key: String,
    pub demographics: SheetRange,
    pub news: SheetRange,
    pub events: SheetRange,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: DEFAULT_SPREADSHEET_ID.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_key: String::new(),
            demographics: SheetRange::new("Demografia", "A2:Z"),
            news: SheetRange::new("Dummy - Noticias", "A2:C"),
            events: SheetRange::new("Dummy - Eventos", "A2:C"),
        }
    }
}

impl SheetsConfig {
    pub fn range_for(&self, kind: RecordKind) -> &SheetRange {
        match kind {
            RecordKind::Demographics => &self.demographics,
            RecordKind::News => &self.news,
            RecordKind::Events => &self.events,
        }
    }
}

// Keep the key out of logs.
impl std::fmt::Debug for SheetsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsConfig")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("api_base_url", &self.api_base_url)
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("demographics", &self.demographics)
            .field("news", &self.news)
            .field("events", &self.events)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    pub interval_secs: u64,
    /// Refresh requests closer together than this are skipped.
    pub dedup_window_secs: u64,
    pub error_retry_count: u32,
    pub retry_delay_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: 300,
            dedup_window_secs: 60,
            error_retry_count: 3,
            retry_delay_secs: 5,
        }
    }
}

impl RefreshConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
    pub fn dedup_window(&self) -> Duration {
        Duration::from_secs(self.dedup_window_secs)
    }
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub sheets: SheetsConfig,
    pub layout: ColumnLayout,
    pub refresh: RefreshConfig,
}

impl DashboardConfig {
    /// Load from an explicit path. TOML or JSON, chosen by extension.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading dashboard config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let mut cfg = parse_config(&content, ext.as_str())
            .with_context(|| format!("parsing dashboard config {}", path.display()))?;
        cfg.resolve_api_key();
        Ok(cfg)
    }

    /// Resolution order:
    /// 1) $DASHBOARD_CONFIG_PATH (must exist)
    /// 2) config/dashboard.toml
    /// 3) config/dashboard.json
    /// 4) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                bail!("{ENV_CONFIG_PATH} points to non-existent path {}", pb.display());
            }
            return Self::load_from(&pb);
        }
        for p in [DEFAULT_TOML_PATH, DEFAULT_JSON_PATH] {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
        }
        let mut cfg = Self::default();
        cfg.resolve_api_key();
        Ok(cfg)
    }

    fn resolve_api_key(&mut self) {
        let key = self.sheets.api_key.trim();
        if key.is_empty() || key.eq_ignore_ascii_case("env") {
            self.sheets.api_key = std::env::var(ENV_API_KEY)
                .map(|k| k.trim().to_string())
                .unwrap_or_default();
        } else {
            self.sheets.api_key = key.to_string();
        }
    }

    /// Refuse to start without the identifiers needed to reach the sheet.
    pub fn validate(&self) -> Result<()> {
        if self.sheets.api_key.is_empty() {
            bail!("Google Sheets API key is not configured (set {ENV_API_KEY})");
        }
        if self.sheets.spreadsheet_id.trim().is_empty() {
            bail!("spreadsheet id is not configured");
        }
        if self.sheets.api_base_url.trim().is_empty() {
            bail!("sheets api base url is not configured");
        }
        Ok(())
    }
}

fn parse_config(s: &str, hint_ext: &str) -> Result<DashboardConfig> {
    match hint_ext {
        "toml" => Ok(toml::from_str(s)?),
        "json" => Ok(serde_json::from_str(s)?),
        _ => toml::from_str(s)
            .map_err(anyhow::Error::from)
            .or_else(|_| serde_json::from_str(s).map_err(anyhow::Error::from))
            .map_err(|_| anyhow!("unsupported dashboard config format")),
    }
}
