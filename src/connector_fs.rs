//! Filesystem scanner for OCR'd diary pages.
//!
//! Each matching file under `[scan].root` is one page of OCR text. Page
//! metadata comes from the file stem:
//!
//! | Stem | entry_date | page_number |
//! |------|------------|-------------|
//! | `2024-03-04` | `2024-03-04` | — |
//! | `2024-03-04_p2` | `2024-03-04` | `2` |
//! | `notebook-page12` | — | `12` |

use anyhow::{bail, Result};
use chrono::NaiveDate;
use globset::{Glob, GlobSet, GlobSetBuilder};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::models::DiaryPage;

static PAGE_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[-_ ])p(?:age)?([0-9]+)$").expect("page suffix pattern is valid")
});

pub fn scan_pages(config: &Config) -> Result<Vec<DiaryPage>> {
    let scan = config
        .scan
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("Scan root not configured: add a [scan] section"))?;

    let root = &scan.root;
    if !root.exists() {
        bail!("Scan root does not exist: {}", root.display());
    }

    let include_set = build_globset(&scan.include_globs)?;

    let mut default_excludes = vec!["**/.git/**".to_string()];
    default_excludes.extend(scan.exclude_globs.clone());
    let exclude_set = build_globset(&default_excludes)?;

    let mut pages = Vec::new();

    let walker = WalkDir::new(root).follow_links(scan.follow_symlinks);
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        let rel_str = relative.to_string_lossy().replace('\\', "/");

        if exclude_set.is_match(&rel_str) || !include_set.is_match(&rel_str) {
            continue;
        }

        match file_to_page(path, &rel_str) {
            Ok(page) => {
                debug!(source_id = %page.source_id, entry_date = ?page.entry_date, "scanned page");
                pages.push(page);
            }
            Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable page"),
        }
    }

    pages.sort_by(|a, b| a.source_id.cmp(&b.source_id));

    Ok(pages)
}

fn file_to_page(path: &Path, relative_path: &str) -> Result<DiaryPage> {
    let metadata = std::fs::metadata(path)?;
    let modified_secs = metadata
        .modified()
        .unwrap_or(std::time::SystemTime::UNIX_EPOCH)
        .duration_since(std::time::SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;

    let raw_text = std::fs::read_to_string(path)?;

    let title = path.file_name().map(|n| n.to_string_lossy().to_string());
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    Ok(DiaryPage::new(
        relative_path,
        title,
        entry_date_from_stem(&stem),
        page_number_from_stem(&stem),
        raw_text,
        modified_secs,
    ))
}

/// Leading `YYYY-MM-DD` of a file stem, if it is a real calendar date.
pub fn entry_date_from_stem(stem: &str) -> Option<String> {
    let prefix = stem.get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d")
        .ok()
        .map(|d| d.format("%Y-%m-%d").to_string())
}

/// Trailing `p<N>` / `page<N>` of a file stem.
pub fn page_number_from_stem(stem: &str) -> Option<i64> {
    PAGE_SUFFIX
        .captures(stem)
        .and_then(|caps| caps[1].parse().ok())
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ScanConfig, StoreConfig, SegmentationConfig};
    use std::fs;

    #[test]
    fn test_entry_date_from_stem() {
        assert_eq!(entry_date_from_stem("2024-03-04").as_deref(), Some("2024-03-04"));
        assert_eq!(
            entry_date_from_stem("2024-03-04_p2").as_deref(),
            Some("2024-03-04")
        );
        assert_eq!(entry_date_from_stem("2024-02-30"), None);
        assert_eq!(entry_date_from_stem("notes"), None);
        assert_eq!(entry_date_from_stem("日記日記日記"), None);
    }

    #[test]
    fn test_page_number_from_stem() {
        assert_eq!(page_number_from_stem("2024-03-04_p2"), Some(2));
        assert_eq!(page_number_from_stem("notebook-page12"), Some(12));
        assert_eq!(page_number_from_stem("scan P7"), Some(7));
        assert_eq!(page_number_from_stem("p3"), Some(3));
        assert_eq!(page_number_from_stem("trip3"), None);
        assert_eq!(page_number_from_stem("2024-03-04"), None);
    }

    #[test]
    fn test_scan_pages_filters_and_sorts() {
        let tmp = tempfile::TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("book1")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(root.join("book1/2024-03-04_p1.txt"), "3/4/2024\nhello").unwrap();
        fs::write(root.join("a.txt"), "plain").unwrap();
        fs::write(root.join("skip.md"), "markdown").unwrap();
        fs::write(root.join(".git/HEAD.txt"), "ref").unwrap();

        let config = Config {
            store: StoreConfig {
                path: root.join("store.json"),
            },
            segmentation: SegmentationConfig::default(),
            scan: Some(ScanConfig {
                root: root.to_path_buf(),
                include_globs: vec!["**/*.txt".to_string()],
                exclude_globs: vec![],
                follow_symlinks: false,
            }),
        };

        let pages = scan_pages(&config).unwrap();
        let ids: Vec<&str> = pages.iter().map(|p| p.source_id.as_str()).collect();
        assert_eq!(ids, vec!["a.txt", "book1/2024-03-04_p1.txt"]);
        assert_eq!(pages[1].entry_date.as_deref(), Some("2024-03-04"));
        assert_eq!(pages[1].page_number, Some(1));
        assert_eq!(pages[1].title.as_deref(), Some("2024-03-04_p1.txt"));
        assert_eq!(pages[0].entry_date, None);
    }

    #[test]
    fn test_scan_requires_section() {
        let err = scan_pages(&Config::minimal()).unwrap_err();
        assert!(err.to_string().contains("[scan]"));
    }
}
