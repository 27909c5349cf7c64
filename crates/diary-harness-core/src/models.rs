//! Core data models for Diary Harness.
//!
//! A [`DiaryPage`] is one OCR'd scan. The segmenter splits its text into
//! [`Segment`]s, which are stamped with IDs and content hashes to become
//! [`SegmentRecord`]s for storage and downstream embedding.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// A contiguous run of diary text attributed to one calendar date.
///
/// `index` is the segment's position in the segmenter output (contiguous
/// from 0). `date` is `YYYY-MM-DD`, or `None` when neither a header nor a
/// fallback supplied one. `text` is trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub index: i64,
    pub date: Option<String>,
    pub text: String,
}

/// One scanned diary page after OCR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaryPage {
    pub id: String,
    /// Path of the OCR text relative to the scan root.
    pub source_id: String,
    pub title: Option<String>,
    /// Date supplied with the page (e.g. from its file name), used as the
    /// segmenter's fallback.
    pub entry_date: Option<String>,
    pub page_number: Option<i64>,
    pub raw_text: String,
    pub clean_text: String,
    pub updated_at: i64,
    pub dedup_hash: String,
}

impl DiaryPage {
    /// Build a page with a fresh UUID, derived clean text, and dedup hash.
    ///
    /// The hash covers `entry_date` as the fallback; use
    /// [`set_fallback`](DiaryPage::set_fallback) when the page will be
    /// segmented with a different one.
    pub fn new(
        source_id: &str,
        title: Option<String>,
        entry_date: Option<String>,
        page_number: Option<i64>,
        raw_text: String,
        updated_at: i64,
    ) -> Self {
        let trimmed = raw_text.trim();
        let clean_text = if trimmed.is_empty() {
            raw_text.clone()
        } else {
            trimmed.to_string()
        };

        Self {
            id: Uuid::new_v4().to_string(),
            source_id: source_id.to_string(),
            dedup_hash: page_hash(source_id, &raw_text, entry_date.as_deref()),
            title,
            entry_date,
            page_number,
            raw_text,
            clean_text,
            updated_at,
        }
    }

    /// Recompute `dedup_hash` for segmentation with `fallback_date`.
    ///
    /// The fallback dates text before the first header and supplies the
    /// default year, so it is part of the page's identity for dedup.
    pub fn set_fallback(&mut self, fallback_date: Option<&str>) {
        self.dedup_hash = page_hash(&self.source_id, &self.raw_text, fallback_date);
    }
}

/// A segment as persisted: the segment plus its owning page and a content
/// hash for embedding staleness detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentRecord {
    pub id: String,
    pub page_id: String,
    pub segment_index: i64,
    pub segment_date: Option<String>,
    pub text: String,
    pub hash: String,
}

/// SHA-256 over a page's source ID, raw OCR text, and segmentation fallback.
pub fn page_hash(source_id: &str, raw_text: &str, fallback_date: Option<&str>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source_id.as_bytes());
    hasher.update([0u8]);
    hasher.update(raw_text.as_bytes());
    hasher.update([0u8]);
    match fallback_date {
        Some(date) => {
            hasher.update([1u8]);
            hasher.update(date.as_bytes());
        }
        None => hasher.update([0u8]),
    }
    format!("{:x}", hasher.finalize())
}

/// SHA-256 of segment text.
pub fn text_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Turn segmenter output for `page` into storable records.
pub fn records_for_page(page: &DiaryPage, segments: &[Segment]) -> Vec<SegmentRecord> {
    segments
        .iter()
        .map(|s| SegmentRecord {
            id: Uuid::new_v4().to_string(),
            page_id: page.id.clone(),
            segment_index: s.index,
            segment_date: s.date.clone(),
            text: s.text.clone(),
            hash: text_hash(&s.text),
        })
        .collect()
}
