//! Deterministic LookML file discovery with directory pruning.
//!
//! - Early directory pruning via `WalkDir::filter_entry` (O(1) subtree skip)
//! - Entries are visited in file-name order so every run sees the same sequence
//! - Classification by suffix decides which extractors run on each file

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::Strategy;
use crate::error::{DeadviewError, IoResultExt};
use crate::parse::path_to_normalized_string;

/// Directories to exclude by default.
const EXCLUDED_DIRS: &[&str] = &[".git", "node_modules", "target"];

const LOOKML_EXTENSION: &str = ".lkml";
const EXPLORE_SUFFIXES: &[&str] = &[".model.lkml", ".explore.lkml"];
const VIEW_SUFFIXES: &[&str] = &[".view.lkml"];

/// Which declarations a file is allowed to contribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Explores only
    Explore,
    /// Views only
    View,
    /// Explores and views
    Any,
}

impl FileKind {
    pub fn wants_explores(self) -> bool {
        matches!(self, Self::Explore | Self::Any)
    }

    pub fn wants_views(self) -> bool {
        matches!(self, Self::View | Self::Any)
    }
}

/// A discovered LookML file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookmlFile {
    /// Full path on disk
    pub path: PathBuf,
    /// Path relative to the scanned root with forward slashes; the file's identity in reports
    pub name: String,
    pub kind: FileKind,
}

/// Classify a file name under the given strategy. `None` means "not scanned".
pub fn classify(file_name: &str, strategy: Strategy) -> Option<FileKind> {
    match strategy {
        Strategy::Content => file_name.ends_with(LOOKML_EXTENSION).then_some(FileKind::Any),
        Strategy::Suffix => {
            if EXPLORE_SUFFIXES.iter().any(|s| file_name.ends_with(s)) {
                Some(FileKind::Explore)
            } else if VIEW_SUFFIXES.iter().any(|s| file_name.ends_with(s)) {
                Some(FileKind::View)
            } else {
                None
            }
        }
    }
}

#[inline]
fn is_excluded_dir(entry: &walkdir::DirEntry, excludes: &HashSet<&str>) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| excludes.contains(name))
}

/// Gathers all LookML files under `root`, sorted by path.
///
/// Fails when `root` cannot be read or is not a directory, or when the walk
/// hits an unreadable directory.
pub fn gather_lookml_files(
    root: &Path,
    strategy: Strategy,
    excludes: &[&str],
) -> Result<Vec<LookmlFile>> {
    let meta = fs::metadata(root).with_path(root)?;
    if !meta.is_dir() {
        return Err(DeadviewError::invalid_argument(format!(
            "{} is not a directory",
            root.display()
        ))
        .into());
    }

    let all_excludes: HashSet<&str> = EXCLUDED_DIRS
        .iter()
        .copied()
        .chain(excludes.iter().copied())
        .collect();

    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_excluded_dir(e, &all_excludes))
    {
        let entry =
            entry.with_context(|| format!("Failed to scan LookML files in {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy();
        let Some(kind) = classify(&file_name, strategy) else {
            continue;
        };

        let path = entry.path().to_path_buf();
        let relative = path.strip_prefix(root).unwrap_or(&path);
        files.push(LookmlFile {
            name: path_to_normalized_string(relative),
            path,
            kind,
        });
    }

    Ok(files)
}
