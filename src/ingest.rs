//! Ingestion pipeline orchestration.
//!
//! Coordinates the full flow: scan → segment → store. Pages whose dedup
//! hash (text plus effective fallback date) is unchanged since the last run
//! are skipped unless `full` is set.
//! Each page is segmented with its file-name date as the fallback, or the
//! configured `segmentation.fallback_date` when the file name has none.

use anyhow::Result;
use tracing::{debug, info};

use crate::config::{parse_iso_date, Config};
use crate::connector_fs;
use crate::json_store::JsonFileStore;
use crate::models::{records_for_page, DiaryPage};
use crate::segment::segment_diary_text;
use crate::store::SegmentStore;

/// Counters reported at the end of an ingest run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IngestSummary {
    pub pages_scanned: u64,
    pub pages_skipped: u64,
    pub pages_written: u64,
    pub segments_written: u64,
    pub undated_segments: u64,
}

/// Options for [`ingest_pages`], mirroring the `diary ingest` flags.
#[derive(Debug, Default, Clone)]
pub struct IngestOptions {
    pub full: bool,
    pub dry_run: bool,
    pub since: Option<String>,
    pub until: Option<String>,
    pub limit: Option<usize>,
}

pub async fn run_ingest(config: &Config, options: &IngestOptions) -> Result<()> {
    let pages = connector_fs::scan_pages(config)?;
    let store = JsonFileStore::open(&config.store.path).await?;

    let summary = ingest_pages(
        &store,
        pages,
        config.segmentation.fallback_date.as_deref(),
        options,
    )
    .await?;

    if options.dry_run {
        println!("ingest (dry-run)");
        println!("  pages found: {}", summary.pages_scanned);
        println!("  estimated segments: {}", summary.segments_written);
        return Ok(());
    }

    println!("ingest");
    println!("  pages scanned: {}", summary.pages_scanned);
    println!("  pages skipped (unchanged): {}", summary.pages_skipped);
    println!("  pages written: {}", summary.pages_written);
    println!("  segments written: {}", summary.segments_written);
    println!("  undated segments: {}", summary.undated_segments);
    println!("  store: {}", store.path().display());
    println!("ok");

    Ok(())
}

/// Segment `pages` and write them through `store`.
///
/// In dry-run mode nothing is written and `segments_written` counts the
/// segments that would have been produced.
pub async fn ingest_pages(
    store: &dyn SegmentStore,
    mut pages: Vec<DiaryPage>,
    default_fallback: Option<&str>,
    options: &IngestOptions,
) -> Result<IngestSummary> {
    if let Some(ref since) = options.since {
        let since_ts = parse_iso_date(since, "--since")?
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp())
            .unwrap_or(i64::MIN);
        pages.retain(|p| p.updated_at >= since_ts);
    }

    if let Some(ref until) = options.until {
        let until_ts = parse_iso_date(until, "--until")?
            .and_hms_opt(23, 59, 59)
            .map(|dt| dt.and_utc().timestamp())
            .unwrap_or(i64::MAX);
        pages.retain(|p| p.updated_at <= until_ts);
    }

    if let Some(limit) = options.limit {
        pages.truncate(limit);
    }

    let mut summary = IngestSummary {
        pages_scanned: pages.len() as u64,
        ..Default::default()
    };

    for page in &mut pages {
        let fallback = page
            .entry_date
            .clone()
            .or_else(|| default_fallback.map(str::to_string));
        let fallback = fallback.as_deref();

        if options.dry_run {
            summary.segments_written +=
                segment_diary_text(&page.raw_text, fallback).len() as u64;
            continue;
        }

        page.set_fallback(fallback);

        if !options.full {
            if let Some(stored) = store.page_hash(&page.source_id).await? {
                if stored == page.dedup_hash {
                    debug!(source_id = %page.source_id, "page unchanged, skipping");
                    summary.pages_skipped += 1;
                    continue;
                }
            }
        }

        let segments = segment_diary_text(&page.raw_text, fallback);
        let records = records_for_page(page, &segments);

        store.store_page(page, &records).await?;

        info!(
            source_id = %page.source_id,
            segments = records.len(),
            fallback = ?fallback,
            "ingested page"
        );

        summary.pages_written += 1;
        summary.segments_written += records.len() as u64;
        summary.undated_segments +=
            records.iter().filter(|r| r.segment_date.is_none()).count() as u64;
    }

    Ok(summary)
}
