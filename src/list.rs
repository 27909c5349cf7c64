//! Reading segments back out of the store.
//!
//! `diary list` prints stored segments filtered by date; `diary get`
//! prints one page with all of its segments as JSON.

use anyhow::{bail, Result};

use crate::config::{parse_iso_date, Config};
use crate::json_store::JsonFileStore;
use crate::store::{SegmentFilter, SegmentListing, SegmentStore};

pub async fn run_list(
    config: &Config,
    since: Option<String>,
    until: Option<String>,
    undated: bool,
) -> Result<()> {
    if let Some(ref s) = since {
        parse_iso_date(s, "--since")?;
    }
    if let Some(ref u) = until {
        parse_iso_date(u, "--until")?;
    }

    let store = JsonFileStore::open(&config.store.path).await?;
    let filter = SegmentFilter {
        since,
        until,
        undated_only: undated,
    };
    let listings = store.list_segments(&filter).await?;

    if listings.is_empty() {
        println!("No segments found.");
        return Ok(());
    }

    for listing in &listings {
        println!("{}", format_listing(listing));
    }
    println!();
    println!("{} segment(s)", listings.len());

    Ok(())
}

pub async fn run_get(config: &Config, id: &str) -> Result<()> {
    let store = JsonFileStore::open(&config.store.path).await?;
    match store.get_page(id).await? {
        Some(page) => {
            println!("{}", serde_json::to_string_pretty(&page)?);
            Ok(())
        }
        None => bail!("page not found: {}", id),
    }
}

fn format_listing(listing: &SegmentListing) -> String {
    let page = listing
        .page_number
        .map(|n| format!(" p{}", n))
        .unwrap_or_default();
    let preview: String = listing
        .text
        .lines()
        .next()
        .unwrap_or_default()
        .chars()
        .take(60)
        .collect();
    format!(
        "{}  {}{} #{}  {}",
        listing.segment_date.as_deref().unwrap_or("undated   "),
        listing.source_id,
        page,
        listing.segment_index,
        preview
    )
}
