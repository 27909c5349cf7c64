//! # Diary Harness Core
//!
//! Pure logic for Diary Harness: date-header recognition, diary text
//! segmentation, data models, and the segment store trait.
//!
//! This crate does no file or network I/O and carries no async runtime.
//! The segmenter is synchronous and holds no shared state, so it can be
//! called from any number of threads at once.
//!
//! ```rust
//! use diary_harness_core::segment::segment_diary_text;
//!
//! let segments = segment_diary_text("just some prose with no date", Some("2024-05-01"));
//! assert_eq!(segments.len(), 1);
//! assert_eq!(segments[0].date.as_deref(), Some("2024-05-01"));
//! ```

pub mod date;
pub mod models;
pub mod segment;
pub mod store;
