//! In-memory [`SegmentStore`] implementation for tests and embedding in
//! other hosts.
//!
//! Pages and segments live in `HashMap`s behind `std::sync::RwLock`.

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{DiaryPage, SegmentRecord};

use super::{sort_listings, PageResponse, SegmentFilter, SegmentListing, SegmentStore};

/// Pages keyed by page ID.
pub type PageMap = HashMap<String, DiaryPage>;
/// Segment records keyed by owning page ID.
pub type SegmentMap = HashMap<String, Vec<SegmentRecord>>;

/// In-memory store keyed by page ID.
pub struct InMemoryStore {
    pages: RwLock<PageMap>,
    segments: RwLock<SegmentMap>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::from_parts(HashMap::new(), HashMap::new())
    }

    /// Build a store pre-populated with pages and their segments.
    pub fn from_parts(pages: PageMap, segments: SegmentMap) -> Self {
        Self {
            pages: RwLock::new(pages),
            segments: RwLock::new(segments),
        }
    }

    /// Clone out the current contents.
    pub fn snapshot(&self) -> (PageMap, SegmentMap) {
        let pages = self.pages.read().unwrap();
        let segments = self.segments.read().unwrap();
        (pages.clone(), segments.clone())
    }

    /// Swap in new contents wholesale.
    pub fn replace_contents(&self, pages: PageMap, segments: SegmentMap) {
        let mut stored_pages = self.pages.write().unwrap();
        let mut stored_segments = self.segments.write().unwrap();
        *stored_pages = pages;
        *stored_segments = segments;
    }

    pub fn page_count(&self) -> usize {
        self.pages.read().unwrap().len()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SegmentStore for InMemoryStore {
    async fn store_page(&self, page: &DiaryPage, segments: &[SegmentRecord]) -> Result<String> {
        // Lock order: pages, then segments.
        let mut pages = self.pages.write().unwrap();
        let mut stored_segments = self.segments.write().unwrap();

        let id = pages
            .values()
            .find(|p| p.source_id == page.source_id)
            .map(|p| p.id.clone())
            .unwrap_or_else(|| page.id.clone());

        let mut records: Vec<SegmentRecord> = segments
            .iter()
            .cloned()
            .map(|mut r| {
                r.page_id = id.clone();
                r
            })
            .collect();
        records.sort_by_key(|r| r.segment_index);

        let mut stored = page.clone();
        stored.id = id.clone();

        stored_segments.insert(id.clone(), records);
        pages.insert(id.clone(), stored);
        Ok(id)
    }

    async fn page_hash(&self, source_id: &str) -> Result<Option<String>> {
        let pages = self.pages.read().unwrap();
        Ok(pages
            .values()
            .find(|p| p.source_id == source_id)
            .map(|p| p.dedup_hash.clone()))
    }

    async fn get_page(&self, id: &str) -> Result<Option<PageResponse>> {
        let pages = self.pages.read().unwrap();
        let Some(page) = pages.get(id) else {
            return Ok(None);
        };
        let segments = self
            .segments
            .read()
            .unwrap()
            .get(id)
            .cloned()
            .unwrap_or_default();
        Ok(Some(PageResponse {
            page: page.clone(),
            segments,
        }))
    }

    async fn list_segments(&self, filter: &SegmentFilter) -> Result<Vec<SegmentListing>> {
        let pages = self.pages.read().unwrap();
        let segments = self.segments.read().unwrap();

        let mut listings: Vec<SegmentListing> = segments
            .iter()
            .filter_map(|(page_id, records)| pages.get(page_id).map(|page| (page, records)))
            .flat_map(|(page, records)| {
                records
                    .iter()
                    .filter(|r| filter.matches(r))
                    .map(move |r| SegmentListing {
                        page_id: page.id.clone(),
                        source_id: page.source_id.clone(),
                        page_number: page.page_number,
                        segment_index: r.segment_index,
                        segment_date: r.segment_date.clone(),
                        text: r.text.clone(),
                    })
            })
            .collect();

        sort_listings(&mut listings);
        Ok(listings)
    }
}
