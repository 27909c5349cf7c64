use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use globset::Glob;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub store: StoreConfig,
    #[serde(default)]
    pub segmentation: SegmentationConfig,
    #[serde(default)]
    pub scan: Option<ScanConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SegmentationConfig {
    /// Date used for pages whose file name carries no date.
    #[serde(default)]
    pub fallback_date: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScanConfig {
    pub root: PathBuf,
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
    #[serde(default)]
    pub follow_symlinks: bool,
}

fn default_include_globs() -> Vec<String> {
    vec!["**/*.txt".to_string()]
}

impl Config {
    /// Defaults for commands that run without a config file.
    pub fn minimal() -> Self {
        Self {
            store: StoreConfig {
                path: PathBuf::from("./data/segments.json"),
            },
            segmentation: SegmentationConfig::default(),
            scan: None,
        }
    }
}

/// Parse a `YYYY-MM-DD` date argument, naming `what` in the error.
pub fn parse_iso_date(value: &str, what: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("{} must be a YYYY-MM-DD date, got '{}'", what, value))
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if let Some(ref date) = config.segmentation.fallback_date {
        parse_iso_date(date, "segmentation.fallback_date")?;
    }

    if let Some(ref scan) = config.scan {
        if scan.include_globs.is_empty() {
            bail!("scan.include_globs must not be empty");
        }
        for pattern in scan.include_globs.iter().chain(scan.exclude_globs.iter()) {
            Glob::new(pattern).with_context(|| format!("Invalid glob pattern: '{}'", pattern))?;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_minimal_config_file() {
        let file = write_config("[store]\npath = \"./segments.json\"\n");
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.store.path, PathBuf::from("./segments.json"));
        assert!(config.segmentation.fallback_date.is_none());
        assert!(config.scan.is_none());
    }

    #[test]
    fn test_scan_defaults() {
        let file = write_config(
            "[store]\npath = \"s.json\"\n\n[segmentation]\nfallback_date = \"2024-01-01\"\n\n[scan]\nroot = \"./scans\"\n",
        );
        let config = load_config(file.path()).unwrap();
        let scan = config.scan.unwrap();
        assert_eq!(scan.include_globs, vec!["**/*.txt".to_string()]);
        assert!(scan.exclude_globs.is_empty());
        assert!(!scan.follow_symlinks);
        assert_eq!(
            config.segmentation.fallback_date.as_deref(),
            Some("2024-01-01")
        );
    }

    #[test]
    fn test_invalid_fallback_date_rejected() {
        let file = write_config(
            "[store]\npath = \"s.json\"\n\n[segmentation]\nfallback_date = \"March 4\"\n",
        );
        let err = load_config(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("segmentation.fallback_date"));
    }

    #[test]
    fn test_invalid_glob_rejected() {
        let file = write_config(
            "[store]\npath = \"s.json\"\n\n[scan]\nroot = \".\"\ninclude_globs = [\"**/[.txt\"]\n",
        );
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_empty_include_globs_rejected() {
        let file = write_config(
            "[store]\npath = \"s.json\"\n\n[scan]\nroot = \".\"\ninclude_globs = []\n",
        );
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_parse_iso_date() {
        assert!(parse_iso_date("2024-02-29", "x").is_ok());
        assert!(parse_iso_date("2023-02-29", "x").is_err());
        assert!(parse_iso_date("3/4/2024", "x").is_err());
    }
}
