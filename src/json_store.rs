//! JSON-file [`SegmentStore`] backend.
//!
//! The whole store lives in one pretty-printed JSON document:
//!
//! ```json
//! { "pages": [ ... ], "segments": [ ... ] }
//! ```
//!
//! The file is read once at open into an [`InMemoryStore`]. Each
//! [`store_page`](SegmentStore::store_page) applies the change to a staged
//! copy, writes the file through a temporary sibling and a rename, and only
//! then swaps the staged copy in. A failed write leaves both the file and
//! the in-memory view at their previous state.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

use crate::models::{DiaryPage, SegmentRecord};
use crate::store::memory::{InMemoryStore, PageMap, SegmentMap};
use crate::store::{PageResponse, SegmentFilter, SegmentListing, SegmentStore};

#[derive(Serialize, Deserialize, Default)]
struct StoreFile {
    #[serde(default)]
    pages: Vec<DiaryPage>,
    #[serde(default)]
    segments: Vec<SegmentRecord>,
}

impl StoreFile {
    fn from_maps(pages: PageMap, segments: SegmentMap) -> Self {
        let mut pages: Vec<DiaryPage> = pages.into_values().collect();
        pages.sort_by(|a, b| a.source_id.cmp(&b.source_id));

        let order: HashMap<&str, usize> = pages
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.as_str(), i))
            .collect();
        let mut segments: Vec<SegmentRecord> = segments.into_values().flatten().collect();
        segments.sort_by_key(|s| {
            (
                order.get(s.page_id.as_str()).copied().unwrap_or(usize::MAX),
                s.segment_index,
            )
        });

        Self { pages, segments }
    }

    fn into_maps(self) -> (PageMap, SegmentMap) {
        let pages: PageMap = self.pages.into_iter().map(|p| (p.id.clone(), p)).collect();
        let mut segments: SegmentMap = HashMap::new();
        for record in self.segments {
            segments.entry(record.page_id.clone()).or_default().push(record);
        }
        (pages, segments)
    }
}

pub struct JsonFileStore {
    path: PathBuf,
    inner: InMemoryStore,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub async fn open(path: &Path) -> Result<Self> {
        let exists = tokio::fs::try_exists(path)
            .await
            .with_context(|| format!("Failed to access store file: {}", path.display()))?;

        let file: StoreFile = if exists {
            let content = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read store file: {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse store file: {}", path.display()))?
        } else {
            StoreFile::default()
        };

        debug!(
            path = %path.display(),
            pages = file.pages.len(),
            segments = file.segments.len(),
            "opened store"
        );

        let (pages, segments) = file.into_maps();
        Ok(Self {
            path: path.to_path_buf(),
            inner: InMemoryStore::from_parts(pages, segments),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, file: &StoreFile) -> Result<()> {
        let json = serde_json::to_string_pretty(file)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create store directory: {}", parent.display())
                })?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .with_context(|| format!("Failed to write store file: {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("Failed to replace store file: {}", self.path.display()))?;
        Ok(())
    }
}

#[async_trait]
impl SegmentStore for JsonFileStore {
    async fn store_page(&self, page: &DiaryPage, segments: &[SegmentRecord]) -> Result<String> {
        let _guard = self.write_lock.lock().await;

        let (pages, stored_segments) = self.inner.snapshot();
        let staged = InMemoryStore::from_parts(pages, stored_segments);
        let id = staged.store_page(page, segments).await?;

        let (pages, stored_segments) = staged.snapshot();
        self.persist(&StoreFile::from_maps(pages.clone(), stored_segments.clone()))
            .await?;
        self.inner.replace_contents(pages, stored_segments);
        Ok(id)
    }

    async fn page_hash(&self, source_id: &str) -> Result<Option<String>> {
        self.inner.page_hash(source_id).await
    }

    async fn get_page(&self, id: &str) -> Result<Option<PageResponse>> {
        self.inner.get_page(id).await
    }

    async fn list_segments(&self, filter: &SegmentFilter) -> Result<Vec<SegmentListing>> {
        self.inner.list_segments(filter).await
    }
}
