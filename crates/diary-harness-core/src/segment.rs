//! Date-header diary segmenter.
//!
//! Splits a block of raw OCR text into per-day [`Segment`]s. Every line
//! that [`resolve_date`] recognises as a date header closes the segment
//! being built and opens a new one, with the header kept as the new
//! segment's first line.
//!
//! # Algorithm
//!
//! 1. Derive a default year from the fallback date (`YYYY-…`), if any.
//! 2. Split on `\n` / `\r\n` and trim trailing whitespace from each line.
//! 3. Classify each line as blank, header, or body ([`LineKind`]).
//! 4. Fold the lines through `SegmenterState::step`. Headers flush the
//!    open accumulator; blank and body lines are appended to it.
//! 5. Flush whatever remains at end of input.
//! 6. If nothing was emitted but the input has content, emit the whole
//!    trimmed input as a single segment.
//!
//! Flushing joins the pending lines with `\n` and trims the result. Empty
//! results are dropped without consuming an index.
//!
//! # Example
//!
//! ```rust
//! use diary_harness_core::segment::segment_diary_text;
//!
//! let segments = segment_diary_text("1/1/2024\nWoke up early.\n\n1/2/2024\nFelt good.", None);
//! assert_eq!(segments.len(), 2);
//! assert_eq!(segments[0].date.as_deref(), Some("2024-01-01"));
//! assert_eq!(segments[1].text, "1/2/2024\nFelt good.");
//! ```

use crate::date::resolve_date;
use crate::models::Segment;

/// How a single (right-trimmed) line affects segmentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Empty after trimming. Preserved as a paragraph break.
    Blank,
    /// A date header, carrying its trimmed text and resolved ISO date.
    Header { text: String, date: String },
    /// Ordinary content, trimmed.
    Body(String),
}

/// Classify one line of input.
pub fn classify_line(line: &str, default_year: Option<i32>) -> LineKind {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    match resolve_date(trimmed, default_year) {
        Some(date) => LineKind::Header {
            text: trimmed.to_string(),
            date,
        },
        None => LineKind::Body(trimmed.to_string()),
    }
}

/// The year to assume for headers without one: the leading `YYYY` of a
/// fallback date of the form `YYYY-…`.
pub fn default_year_from_fallback(fallback_date: Option<&str>) -> Option<i32> {
    let s = fallback_date?;
    let bytes = s.as_bytes();
    if bytes.len() < 5 || bytes[4] != b'-' || !bytes[..4].iter().all(u8::is_ascii_digit) {
        return None;
    }
    s[..4].parse().ok()
}

/// Lines collected for the segment being built.
///
/// `date` is the header date that opened the accumulator; `None` before the
/// first header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Accumulator {
    pub(crate) date: Option<String>,
    pub(crate) lines: Vec<String>,
}

impl Accumulator {
    fn opened_by(header: String, date: String) -> Self {
        Self {
            date: Some(date),
            lines: vec![header],
        }
    }

    fn text(&self) -> String {
        self.lines.join("\n").trim().to_string()
    }
}

/// Segmenter state threaded through the fold.
///
/// `open` is `None` until the first line arrives ("no open segment") and
/// `Some` once lines are being accumulated ("segment open").
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SegmenterState<'f> {
    fallback_date: Option<&'f str>,
    default_year: Option<i32>,
    open: Option<Accumulator>,
    emitted: Vec<Segment>,
}

impl<'f> SegmenterState<'f> {
    pub(crate) fn new(fallback_date: Option<&'f str>) -> Self {
        Self {
            fallback_date,
            default_year: default_year_from_fallback(fallback_date),
            open: None,
            emitted: Vec::new(),
        }
    }

    /// Apply one input line and return the next state.
    pub(crate) fn step(self, line: &str) -> Self {
        match classify_line(line, self.default_year) {
            LineKind::Blank => self.append(String::new()),
            LineKind::Body(text) => self.append(text),
            LineKind::Header { text, date } => {
                let mut next = self.flush();
                next.open = Some(Accumulator::opened_by(text, date));
                next
            }
        }
    }

    /// Flush the open accumulator and return the emitted segments.
    pub(crate) fn finish(self) -> Vec<Segment> {
        self.flush().emitted
    }

    fn append(mut self, line: String) -> Self {
        self.open.get_or_insert_with(Accumulator::default).lines.push(line);
        self
    }

    fn flush(mut self) -> Self {
        if let Some(acc) = self.open.take() {
            let text = acc.text();
            if !text.is_empty() {
                let date = acc
                    .date
                    .or_else(|| self.fallback_date.map(str::to_string));
                self.emitted.push(Segment {
                    index: self.emitted.len() as i64,
                    date,
                    text,
                });
            }
        }
        self
    }
}

/// Split raw diary text into date-attributed segments.
///
/// `fallback_date` dates any text before the first header, and supplies
/// the default year for headers written without one. The function is total:
/// empty or whitespace-only input yields an empty list and malformed dates
/// are treated as ordinary text.
///
/// # Guarantees
///
/// - Segment indices are contiguous: `0, 1, 2, …, N-1`.
/// - Segments keep source order and their text is never empty.
/// - Header lines stay in the segment they open.
/// - Non-blank input always yields at least one segment.
pub fn segment_diary_text(raw_text: &str, fallback_date: Option<&str>) -> Vec<Segment> {
    let segments = raw_text
        .split('\n')
        .map(str::trim_end)
        .fold(SegmenterState::new(fallback_date), SegmenterState::step)
        .finish();

    let trimmed = raw_text.trim();
    if segments.is_empty() && !trimmed.is_empty() {
        return vec![Segment {
            index: 0,
            date: fallback_date.map(str::to_string),
            text: trimmed.to_string(),
        }];
    }

    segments
}
