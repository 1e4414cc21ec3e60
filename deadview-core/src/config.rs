//! Configuration loading from deadview.toml.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

use crate::error::DeadviewError;
use crate::extract::ExtractOptions;

/// Name of the optional configuration file at the scanned root.
pub const CONFIG_FILE_NAME: &str = "deadview.toml";

/// Suffix appended to the scanned directory name for the CSV report.
pub const DEFAULT_REPORT_SUFFIX: &str = "_unused_views.csv";

/// How files are classified as explore and/or view sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Parse every `*.lkml` file and extract whatever it declares.
    #[default]
    Content,
    /// Explores only from `*.model.lkml` / `*.explore.lkml`, views only from `*.view.lkml`.
    Suffix,
}

/// Main configuration structure for deadview.toml.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct DeadviewConfig {
    /// File classification strategy.
    pub strategy: Option<Strategy>,
    /// Match `.SQL_TABLE_NAME` case-sensitively (default true).
    pub case_sensitive: Option<bool>,
    /// View names or patterns to leave out of the unused list.
    pub ignore: Option<Vec<String>>,
    /// Directory names pruned from the scan.
    pub exclude_dirs: Option<Vec<String>>,
    /// Output configuration.
    pub output: Option<OutputConfig>,
}

/// Output configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Stdout summary format: "plain" or "json".
    pub format: Option<String>,
    /// CSV file name suffix.
    pub suffix: Option<String>,
}

impl DeadviewConfig {
    /// Extraction options derived from this configuration.
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            case_sensitive: self.case_sensitive.unwrap_or(true),
        }
    }

    /// Whether the stdout summary should be JSON.
    pub fn wants_json(&self) -> bool {
        self.output
            .as_ref()
            .and_then(|o| o.format.as_deref())
            .is_some_and(|f| f.eq_ignore_ascii_case("json"))
    }

    /// CSV suffix, falling back to `_unused_views.csv`.
    pub fn report_suffix(&self) -> &str {
        self.output
            .as_ref()
            .and_then(|o| o.suffix.as_deref())
            .unwrap_or(DEFAULT_REPORT_SUFFIX)
    }
}

/// Loads configuration from deadview.toml if it exists.
pub fn load_config(root: &Path) -> Result<Option<DeadviewConfig>> {
    let path = root.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let cfg = toml::from_str(&content).map_err(|e| DeadviewError::config(&path, e.message()))?;
    Ok(Some(cfg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn create_temp_dir(name: &str) -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir()
            .join("deadview_config_test")
            .join(format!("{}_{}_{}", name, std::process::id(), id));
        if dir.exists() {
            fs::remove_dir_all(&dir).ok();
        }
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_missing_config_is_none() {
        let dir = create_temp_dir("none");
        assert!(load_config(&dir).unwrap().is_none());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_full_config() {
        let dir = create_temp_dir("full");
        fs::write(
            dir.join(CONFIG_FILE_NAME),
            r#"
strategy = "suffix"
case_sensitive = false
ignore = ["tmp_*"]
exclude_dirs = ["archive"]

[output]
format = "json"
suffix = "_dead.csv"
"#,
        )
        .unwrap();

        let cfg = load_config(&dir).unwrap().unwrap();
        assert_eq!(cfg.strategy, Some(Strategy::Suffix));
        assert!(!cfg.extract_options().case_sensitive);
        assert_eq!(cfg.ignore.as_deref(), Some(&["tmp_*".to_string()][..]));
        assert!(cfg.wants_json());
        assert_eq!(cfg.report_suffix(), "_dead.csv");
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_defaults() {
        let cfg = DeadviewConfig::default();
        assert!(cfg.extract_options().case_sensitive);
        assert!(!cfg.wants_json());
        assert_eq!(cfg.report_suffix(), DEFAULT_REPORT_SUFFIX);
    }

    #[test]
    fn test_invalid_config_is_error() {
        let dir = create_temp_dir("invalid");
        fs::write(dir.join(CONFIG_FILE_NAME), "strategy = \"by-magic\"").unwrap();
        let err = load_config(&dir).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DeadviewError>(),
            Some(DeadviewError::Config { .. })
        ));
        fs::remove_dir_all(&dir).ok();
    }
}
