//! Storage abstraction for diary pages and their segments.
//!
//! Persistence is owned by the caller. The [`SegmentStore`] trait is the
//! seam the ingestion pipeline writes through, so backends (a JSON file,
//! an in-memory map, a remote database) are interchangeable.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use crate::models::{DiaryPage, SegmentRecord};

/// Restricts [`SegmentStore::list_segments`] by segment date.
///
/// `since` and `until` are inclusive `YYYY-MM-DD` bounds compared as
/// strings. Undated segments never satisfy a bounded filter.
#[derive(Debug, Clone, Default)]
pub struct SegmentFilter {
    pub since: Option<String>,
    pub until: Option<String>,
    /// Only return segments without a date. Ignores `since`/`until`.
    pub undated_only: bool,
}

impl SegmentFilter {
    pub fn matches(&self, record: &SegmentRecord) -> bool {
        if self.undated_only {
            return record.segment_date.is_none();
        }
        if self.since.is_none() && self.until.is_none() {
            return true;
        }
        let Some(date) = record.segment_date.as_deref() else {
            return false;
        };
        if let Some(since) = self.since.as_deref() {
            if date < since {
                return false;
            }
        }
        if let Some(until) = self.until.as_deref() {
            if date > until {
                return false;
            }
        }
        true
    }
}

/// A stored segment joined with the page it came from.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentListing {
    pub page_id: String,
    pub source_id: String,
    pub page_number: Option<i64>,
    pub segment_index: i64,
    pub segment_date: Option<String>,
    pub text: String,
}

/// Full page response: page fields plus its segments in index order.
#[derive(Debug, Clone, Serialize)]
pub struct PageResponse {
    pub page: DiaryPage,
    pub segments: Vec<SegmentRecord>,
}

/// Abstract storage backend for diary pages and segments.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`store_page`](SegmentStore::store_page) | Write a page and replace its segments in one step |
/// | [`page_hash`](SegmentStore::page_hash) | Dedup hash of the stored page for a source |
/// | [`get_page`](SegmentStore::get_page) | Page with its segments |
/// | [`list_segments`](SegmentStore::list_segments) | Segments matching a date filter |
#[async_trait]
pub trait SegmentStore: Send + Sync {
    /// Insert or update a page and replace all of its segments.
    ///
    /// Both become visible together or not at all: a failed call leaves the
    /// previous page (and its `dedup_hash`) and segments in place. A page
    /// with the same `source_id` keeps its existing ID, and every record's
    /// `page_id` is rewritten to it. Returns the ID the page is stored under.
    async fn store_page(&self, page: &DiaryPage, segments: &[SegmentRecord]) -> Result<String>;

    /// Dedup hash of the page stored for `source_id`, if any.
    async fn page_hash(&self, source_id: &str) -> Result<Option<String>>;

    /// Retrieve a page and its segments by page ID.
    async fn get_page(&self, id: &str) -> Result<Option<PageResponse>>;

    /// List segments matching `filter`, ordered by date (undated last),
    /// then source, then segment index.
    async fn list_segments(&self, filter: &SegmentFilter) -> Result<Vec<SegmentListing>>;
}

/// Sort listings by date (undated last), source ID, then segment index.
pub fn sort_listings(listings: &mut [SegmentListing]) {
    listings.sort_by(|a, b| {
        let date_order = match (&a.segment_date, &b.segment_date) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        };
        date_order
            .then_with(|| a.source_id.cmp(&b.source_id))
            .then_with(|| a.segment_index.cmp(&b.segment_index))
    });
}
