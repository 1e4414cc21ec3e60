//! Builder pattern API for deadview analysis.
//!
//! Provides a fluent interface for configuring and running the detector:
//!
//! ```rust,ignore
//! use deadview_core::prelude::*;
//!
//! let result = Deadview::new("/path/to/lookml")
//!     .strategy(Strategy::Suffix)
//!     .case_sensitive(false)
//!     .ignore_patterns(["tmp_*"])
//!     .analyze()?;
//!
//! println!("Unused views: {:?}", result.unused_views);
//! ```

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::{DeadviewConfig, Strategy};
use crate::detect::{empty_files, skipped_files, unused_views};
use crate::extract::ExtractOptions;
use crate::graph::close_reachability;
use crate::index::{
    build_indices, unique_references, unique_view_names, ExploreIndex, NameRegistry, ViewIndex,
};
use crate::logging::{log_info, log_warn};
use crate::parse::parse_files;
use crate::scan::gather_lookml_files;

/// Builder for configuring unused view analysis.
#[derive(Debug, Clone)]
pub struct Deadview {
    /// Root directory of the LookML project
    root: PathBuf,

    /// File classification strategy
    strategy: Strategy,

    /// Whether `.SQL_TABLE_NAME` matching is case-sensitive
    case_sensitive: bool,

    /// Custom excluded directories
    excluded_dirs: Vec<String>,

    /// Patterns for view names left out of the unused list
    ignored_patterns: Vec<String>,
}

impl Deadview {
    /// Create a new analysis builder for the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            strategy: Strategy::default(),
            case_sensitive: true,
            excluded_dirs: Vec::new(),
            ignored_patterns: Vec::new(),
        }
    }

    /// Choose how files are classified.
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Match `.SQL_TABLE_NAME` case-sensitively (the default) or not.
    pub fn case_sensitive(mut self, enabled: bool) -> Self {
        self.case_sensitive = enabled;
        self
    }

    /// Add directories to exclude from scanning.
    pub fn exclude_dirs(mut self, dirs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.excluded_dirs.extend(dirs.into_iter().map(Into::into));
        self
    }

    /// Add patterns for views to leave out of the unused list.
    pub fn ignore_patterns(mut self, patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.ignored_patterns.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Apply every setting present in a loaded `deadview.toml`.
    pub fn from_config(mut self, cfg: &DeadviewConfig) -> Self {
        if let Some(strategy) = cfg.strategy {
            self.strategy = strategy;
        }
        self.case_sensitive = cfg.extract_options().case_sensitive;
        if let Some(dirs) = &cfg.exclude_dirs {
            self = self.exclude_dirs(dirs.iter().cloned());
        }
        if let Some(patterns) = &cfg.ignore {
            self = self.ignore_patterns(patterns.iter().cloned());
        }
        self
    }

    fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            case_sensitive: self.case_sensitive,
        }
    }

    /// Run the analysis and return results.
    pub fn analyze(&self) -> Result<AnalysisResult> {
        // 1. Gather files
        let excludes: Vec<&str> = self.excluded_dirs.iter().map(String::as_str).collect();
        let files = gather_lookml_files(&self.root, self.strategy, &excludes)
            .context("Failed to gather LookML files")?;
        log_info(&format!("scanning {} LookML files", files.len()));

        // 2. Parse and extract, one file at a time
        let results = parse_files(&files, self.extract_options());

        // 3. Aggregate into file-keyed indices
        let (explores, views) = build_indices(&results);
        let registry = NameRegistry::build(&explores, &views);
        for (name, files) in registry.duplicate_views() {
            log_warn(&format!("view `{}` declared in {} files: {}", name, files.len(), files.join(", ")));
        }

        // 4. Seed from explores and close over view dependencies
        let mut reachable = unique_references(&explores);
        close_reachability(&views, &mut reachable);
        let declared = unique_view_names(&views);

        // 5. Set difference, then user ignores
        let (ignored_views, unused): (Vec<String>, Vec<String>) = unused_views(&declared, &reachable)
            .into_iter()
            .partition(|v| self.is_ignored(v));

        let mut reachable_views: Vec<String> = reachable.into_iter().collect();
        reachable_views.sort();

        let result = AnalysisResult {
            root: self.root.clone(),
            files_scanned: files.len(),
            total_explores: explores.record_count(),
            total_views: views.record_count(),
            declared_views: declared.len(),
            reachable_views,
            unused_views: unused,
            ignored_views,
            skipped_files: skipped_files(&results)
                .into_iter()
                .map(|(file, reason)| SkippedFile { file, reason })
                .collect(),
            empty_files: empty_files(&results),
            explores,
            views,
            registry,
        };

        log_info(&format!(
            "{} unused of {} declared views, {} skipped files, {} empty files",
            result.unused_views.len(),
            result.declared_views,
            result.skipped_files.len(),
            result.empty_files.len()
        ));

        Ok(result)
    }

    /// Check if a view name matches any ignored pattern.
    fn is_ignored(&self, name: &str) -> bool {
        self.ignored_patterns.iter().any(|pattern| matches_pattern(name, pattern))
    }
}

/// `prefix*`, `*suffix`, otherwise exact or substring match.
fn matches_pattern(name: &str, pattern: &str) -> bool {
    if let Some(prefix) = pattern.strip_suffix('*') {
        name.starts_with(prefix)
    } else if let Some(suffix) = pattern.strip_prefix('*') {
        name.ends_with(suffix)
    } else {
        name.contains(pattern)
    }
}

/// A file that contributed nothing because it could not be processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    /// Path relative to the scanned root
    pub file: String,
    pub reason: String,
}

/// Result of running unused view analysis.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// Root path that was analyzed
    pub root: PathBuf,

    /// Number of LookML files considered
    pub files_scanned: usize,

    /// Explore declarations across all files
    pub total_explores: usize,

    /// View declarations across all files
    pub total_views: usize,

    /// Size of the declared set (views plus names views reference)
    pub declared_views: usize,

    /// Every name reachable from an explore, sorted
    pub reachable_views: Vec<String>,

    /// Declared but unreachable views, sorted, ignores removed
    pub unused_views: Vec<String>,

    /// Unreachable views hidden by an ignore pattern
    pub ignored_views: Vec<String>,

    /// Files that failed to read, parse or extract, in scan order
    pub skipped_files: Vec<SkippedFile>,

    /// Files that declared nothing, in scan order
    pub empty_files: Vec<String>,

    pub explores: ExploreIndex,
    pub views: ViewIndex,

    /// Where each name came from
    pub registry: NameRegistry,
}

impl AnalysisResult {
    /// Check if any unused view was found.
    pub fn has_unused(&self) -> bool {
        !self.unused_views.is_empty()
    }

    /// Check if any file needs attention (skipped or empty).
    pub fn has_problem_files(&self) -> bool {
        !self.skipped_files.is_empty() || !self.empty_files.is_empty()
    }

    /// Reachable names as a set.
    pub fn reachable_set(&self) -> HashSet<&str> {
        self.reachable_views.iter().map(String::as_str).collect()
    }

    /// Percentage of declared views that are unused.
    pub fn unused_percentage(&self) -> f64 {
        if self.declared_views == 0 {
            0.0
        } else {
            (self.unused_views.len() as f64 / self.declared_views as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn create_test_project() -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir()
            .join("deadview_builder_test")
            .join(format!("{}_{}", std::process::id(), id));
        if dir.exists() {
            fs::remove_dir_all(&dir).ok();
        }
        fs::create_dir_all(&dir).unwrap();

        fs::write(
            dir.join("sales.model.lkml"),
            "explore: orders {\n  from: orders_view\n  join: users {\n    sql_on: ${orders.user_id} = ${users.id} ;;\n  }\n}\n",
        )
        .unwrap();
        fs::write(
            dir.join("orders.view.lkml"),
            "view: orders_view {\n  derived_table: {\n    sql: SELECT * FROM ${base.SQL_TABLE_NAME} ;;\n  }\n}\n\nview: base {}\n",
        )
        .unwrap();
        fs::write(dir.join("users.view.lkml"), "view: users {}\n").unwrap();
        fs::write(dir.join("stale.view.lkml"), "view: stale_view {}\nview: tmp_scratch {}\n").unwrap();

        dir
    }

    #[test]
    fn test_analyze_finds_unused() {
        let dir = create_test_project();
        let result = Deadview::new(&dir).analyze().unwrap();

        assert_eq!(result.unused_views, vec!["stale_view", "tmp_scratch"]);
        assert!(result.has_unused());
        assert!(result.reachable_set().contains("base"));
        assert_eq!(result.files_scanned, 4);
        assert_eq!(result.total_explores, 1);
        assert_eq!(result.total_views, 5);
        assert!(!result.has_problem_files());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_ignore_patterns() {
        let dir = create_test_project();
        let result = Deadview::new(&dir)
            .ignore_patterns(["tmp_*"])
            .analyze()
            .unwrap();

        assert_eq!(result.unused_views, vec!["stale_view"]);
        assert_eq!(result.ignored_views, vec!["tmp_scratch"]);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_from_config() {
        let cfg = DeadviewConfig {
            strategy: Some(Strategy::Suffix),
            case_sensitive: Some(false),
            ignore: Some(vec!["*_view".to_string()]),
            exclude_dirs: Some(vec!["archive".to_string()]),
            output: None,
        };
        let builder = Deadview::new("/tmp").from_config(&cfg);
        assert_eq!(builder.strategy, Strategy::Suffix);
        assert!(!builder.case_sensitive);
        assert_eq!(builder.excluded_dirs, vec!["archive"]);
        assert!(builder.is_ignored("stale_view"));
    }

    #[test]
    fn test_missing_root_fails() {
        let dir = std::env::temp_dir().join("deadview_builder_test/definitely_missing");
        assert!(Deadview::new(dir).analyze().is_err());
    }

    #[test]
    fn test_matches_pattern() {
        assert!(matches_pattern("tmp_orders", "tmp_*"));
        assert!(matches_pattern("orders_old", "*_old"));
        assert!(matches_pattern("legacy_orders_v1", "orders"));
        assert!(!matches_pattern("orders", "users"));
    }

    #[test]
    fn test_unused_percentage() {
        let dir = create_test_project();
        let result = Deadview::new(&dir).analyze().unwrap();
        // declared: orders_view, base, users, stale_view, tmp_scratch
        assert_eq!(result.declared_views, 5);
        assert!((result.unused_percentage() - 40.0).abs() < f64::EPSILON);
        fs::remove_dir_all(&dir).ok();
    }
}
