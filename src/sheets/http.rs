// src/sheets/http.rs
use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use metrics::histogram;
use reqwest::{header::ACCEPT, Url};
use serde_json::Value;

use crate::config::SheetsConfig;
use crate::sheets::{SheetRange, SheetSource};

/// Google Sheets `values.get` over HTTPS.
pub struct HttpSheetSource {
    client: reqwest::Client,
    base: Url,
    spreadsheet_id: String,
    api_key: String,
}

impl HttpSheetSource {
    pub fn new(cfg: &SheetsConfig) -> Result<Self> {
        let base = Url::parse(cfg.api_base_url.trim_end_matches('/'))
            .with_context(|| format!("invalid sheets api base url {}", cfg.api_base_url))?;
        if base.cannot_be_a_base() {
            bail!("sheets api base url cannot be a base: {}", cfg.api_base_url);
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base,
            spreadsheet_id: cfg.spreadsheet_id.clone(),
            api_key: cfg.api_key.clone(),
        })
    }

    /// `{base}/{spreadsheet_id}/values/{name}!{range}?key=...`, segments encoded.
    pub fn values_url(&self, range: &SheetRange) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("sheets api base url cannot be a base"))?
            .push(&self.spreadsheet_id)
            .push("values")
            .push(&range.a1());
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }
}

#[async_trait]
impl SheetSource for HttpSheetSource {
    async fn fetch_values(&self, range: &SheetRange) -> Result<Value> {
        let url = self.values_url(range)?;
        let t0 = std::time::Instant::now();

        let resp = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .with_context(|| format!("sheets http get {}", range.a1()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!("sheets api {} for {}: {}", status, range.a1(), body.trim());
        }

        let payload: Value = resp
            .json()
            .await
            .with_context(|| format!("decoding sheets json for {}", range.a1()))?;

        histogram!("sheets_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        Ok(payload)
    }

    fn name(&self) -> &'static str {
        "GoogleSheets"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_encodes_sheet_name_and_key() {
        let mut cfg = SheetsConfig::default();
        cfg.api_key = "k&1".into();
        let src = HttpSheetSource::new(&cfg).unwrap();
        let url = src.values_url(&cfg.news).unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/\
             11cHtcmd3KQEUlFiOAdh-bc9vtXh12qe-oB_y2opsh50/values/\
             Dummy%20-%20Noticias!A2:C?key=k%261"
        );
    }

    #[test]
    fn rejects_bad_base_url() {
        let mut cfg = SheetsConfig::default();
        cfg.api_base_url = "not a url".into();
        assert!(HttpSheetSource::new(&cfg).is_err());
    }
}
