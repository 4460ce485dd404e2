//! Run one sheet through the pipeline and print the admitted records as JSON.
//!
//!   sheet_dump <demographics|news|events> [payload.json]
//!
//! Without a payload file the sheet is fetched live using the dashboard config.

use anyhow::{bail, Context, Result};
use regional_dashboard::config::DashboardConfig;
use regional_dashboard::pipeline::{Assembly, SheetRecord};
use regional_dashboard::records::{EventRecord, LocationRecord, NewsRecord};
use regional_dashboard::service::try_load;
use regional_dashboard::sheets::{FixtureSheetSource, HttpSheetSource, SheetSource};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Serialize)]
struct Dump<'a, R> {
    report: regional_dashboard::PipelineReport,
    records: &'a [R],
}

async fn dump<R: SheetRecord + Serialize>(source: &dyn SheetSource, cfg: &DashboardConfig) -> Result<()> {
    let out: Assembly<R> = try_load(source, cfg).await?;
    let body = serde_json::to_string_pretty(&Dump {
        report: out.report,
        records: &out.records,
    })?;
    println!("{body}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_target(false).init();

    let mut args = std::env::args().skip(1);
    let kind = args.next().unwrap_or_default();
    let payload = args.next().map(PathBuf::from);

    let cfg = DashboardConfig::load_default()?;

    let source: Box<dyn SheetSource> = match payload {
        Some(path) => {
            // Serve the file under every configured tab name.
            let mut fx = FixtureSheetSource::new();
            for range in [&cfg.sheets.demographics, &cfg.sheets.news, &cfg.sheets.events] {
                fx = fx.with_file(range.name.clone(), &path)?;
            }
            Box::new(fx)
        }
        None => {
            cfg.validate().context("live fetch needs a configured sheet")?;
            Box::new(HttpSheetSource::new(&cfg.sheets)?)
        }
    };

    match kind.as_str() {
        "demographics" => dump::<LocationRecord>(source.as_ref(), &cfg).await,
        "news" => dump::<NewsRecord>(source.as_ref(), &cfg).await,
        "events" => dump::<EventRecord>(source.as_ref(), &cfg).await,
        other => bail!("usage: sheet_dump <demographics|news|events> [payload.json] (got {other:?})"),
    }
}
