//! One-shot segmentation commands that need no store.
//!
//! `diary segment` splits a single OCR text (file or stdin) and prints the
//! segments. `diary resolve` runs the date-header recogniser on one line.

use anyhow::{Context, Result};
use clap::ValueEnum;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::config::parse_iso_date;
use crate::date::resolve_date;
use crate::models::Segment;
use crate::segment::segment_diary_text;

/// Output format for `diary segment`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

/// Read OCR text from `path`, or stdin when `path` is `None` or `-`.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)
            .with_context(|| format!("Failed to read input file: {}", p.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

pub fn run_segment(
    path: Option<&Path>,
    fallback_date: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    if let Some(date) = fallback_date {
        parse_iso_date(date, "--fallback-date")?;
    }

    let text = read_input(path)?;
    let segments = segment_diary_text(&text, fallback_date);
    debug!(bytes = text.len(), segments = segments.len(), "segmented input");

    println!("{}", render_segments(&segments, format)?);
    Ok(())
}

pub fn render_segments(segments: &[Segment], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(segments)?),
        OutputFormat::Text => Ok(segments
            .iter()
            .map(|s| {
                format!(
                    "--- segment {} [{}] ---\n{}",
                    s.index,
                    s.date.as_deref().unwrap_or("undated"),
                    s.text
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")),
    }
}

pub fn run_resolve(line: &str, year: Option<i32>) {
    match resolve_date(line, year) {
        Some(date) => println!("{}", date),
        None => println!("no date"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments() -> Vec<Segment> {
        segment_diary_text("intro\n3/4/2024\nday one", None)
    }

    #[test]
    fn test_render_text() {
        let out = render_segments(&segments(), OutputFormat::Text).unwrap();
        assert_eq!(
            out,
            "--- segment 0 [undated] ---\nintro\n\n--- segment 1 [2024-03-04] ---\n3/4/2024\nday one"
        );
    }

    #[test]
    fn test_render_json() {
        let out = render_segments(&segments(), OutputFormat::Json).unwrap();
        let parsed: Vec<Segment> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, segments());
        assert!(out.contains("\"date\": null"));
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_segments(&[], OutputFormat::Json).unwrap(), "[]");
        assert_eq!(render_segments(&[], OutputFormat::Text).unwrap(), "");
    }

    #[test]
    fn test_read_input_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("page.txt");
        std::fs::write(&path, "hello").unwrap();
        assert_eq!(read_input(Some(&path)).unwrap(), "hello");
        assert!(read_input(Some(&tmp.path().join("missing.txt"))).is_err());
    }

    #[test]
    fn test_invalid_fallback_rejected() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("page.txt");
        std::fs::write(&path, "hello").unwrap();
        assert!(run_segment(Some(&path), Some("05/01/2024"), OutputFormat::Json).is_err());
    }
}
