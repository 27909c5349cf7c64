//! # Diary Harness
//!
//! Splits OCR'd diary pages into per-day segments by recognising date
//! header lines, and keeps the segments in a local store for downstream
//! embedding and search.
//!
//! ## Data Flow
//!
//! 1. The **scanner** ([`connector_fs`]) reads OCR text files into
//!    [`models::DiaryPage`]s, taking entry dates and page numbers from file names.
//! 2. The **segmenter** ([`segment`]) splits each page's text at date
//!    headers recognised by [`date`].
//! 3. The **ingestion pipeline** ([`ingest`]) stamps segments into
//!    [`models::SegmentRecord`]s and writes them through a [`store::SegmentStore`].
//! 4. The default backend is a JSON file ([`json_store`]).
//!
//! ## Quick Start
//!
//! ```bash
//! diary segment page.txt --fallback-date 2024-03-04
//! diary resolve "Sept 9, 2023"
//! diary ingest --config ./config/diary.toml
//! diary list --since 2024-01-01
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`connector_fs`] | Filesystem page scanner |
//! | [`ingest`] | Scan → segment → store pipeline |
//! | [`json_store`] | JSON file store backend |
//! | [`segment_cmd`] | `segment` / `resolve` commands |
//! | [`list`] | `list` / `get` commands |

pub use diary_harness_core::{date, models, segment, store};

pub mod config;
pub mod connector_fs;
pub mod ingest;
pub mod json_store;
pub mod list;
pub mod segment_cmd;
