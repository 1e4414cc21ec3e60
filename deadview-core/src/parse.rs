//! Per-file loading: read, parse, extract.
//!
//! Every failure is confined to its file. A syntax error, a declaration
//! without a name or a file that cannot be read turns into
//! [`ParseResult::Skipped`]; the rest of the run is unaffected.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{DeadviewError, DeadviewResult, IoResultExt};
use crate::extract::{extract_explores, extract_views, ExploreMap, ExtractOptions, ViewMap};
use crate::logging::log_event;
use crate::lookml::parse_lookml;
use crate::scan::{FileKind, LookmlFile};

/// Maximum file size to parse (10 MB).
const MAX_FILE_SIZE: usize = 10_000_000;

/// Normalize a path string to use forward slashes consistently.
#[inline]
pub fn normalize_path_string(path: &str) -> String {
    path.replace('\\', "/")
}

/// Convert a Path to a normalized string (forward slashes).
#[inline]
pub fn path_to_normalized_string(path: &Path) -> String {
    normalize_path_string(&path.display().to_string())
}

/// Declarations extracted from one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileExtraction {
    /// File identity (path relative to the scanned root)
    pub name: String,
    pub explores: ExploreMap,
    pub views: ViewMap,
}

impl FileExtraction {
    /// True when the file declared neither explores nor views.
    pub fn is_empty(&self) -> bool {
        self.explores.is_empty() && self.views.is_empty()
    }
}

/// Result of processing a single file.
#[derive(Debug)]
pub enum ParseResult {
    /// Parsed and extracted (possibly with zero declarations)
    Ok(FileExtraction),
    /// Could not be read, parsed or extracted; the file contributes nothing
    Skipped(String, DeadviewError),
}

impl ParseResult {
    /// The file identity, whatever the outcome.
    pub fn file_name(&self) -> &str {
        match self {
            Self::Ok(extraction) => &extraction.name,
            Self::Skipped(name, _) => name,
        }
    }
}

/// Run the extractors the file kind allows over an already parsed file.
pub fn extract_file(
    name: &str,
    path: &Path,
    parsed: &Value,
    kind: FileKind,
    options: ExtractOptions,
) -> DeadviewResult<FileExtraction> {
    let explores = if kind.wants_explores() {
        extract_explores(path, parsed)?
    } else {
        ExploreMap::new()
    };
    let views = if kind.wants_views() {
        extract_views(path, parsed, options)?
    } else {
        ViewMap::new()
    };

    Ok(FileExtraction {
        name: name.to_string(),
        explores,
        views,
    })
}

/// Read and parse a LookML file from disk.
pub fn read_lookml(path: &Path) -> DeadviewResult<Value> {
    let content = fs::read_to_string(path).with_path(path)?;

    if content.len() > MAX_FILE_SIZE {
        return Err(DeadviewError::malformed(
            path,
            format!("file too large ({} bytes, max {})", content.len(), MAX_FILE_SIZE),
        ));
    }

    parse_lookml(&content)
        .map_err(|e| DeadviewError::parse_at(path, e.message, e.line, e.column))
}

/// Parses a single file. This is the unit of per-file error isolation.
pub fn parse_single_file(file: &LookmlFile, options: ExtractOptions) -> ParseResult {
    let outcome = read_lookml(&file.path)
        .and_then(|parsed| extract_file(&file.name, &file.path, &parsed, file.kind, options));

    match outcome {
        Ok(extraction) => ParseResult::Ok(extraction),
        Err(e) => ParseResult::Skipped(file.name.clone(), e),
    }
}

/// Processes all files in order, logging and keeping the ones that fail.
pub fn parse_files(files: &[LookmlFile], options: ExtractOptions) -> Vec<ParseResult> {
    files
        .iter()
        .map(|file| {
            let result = parse_single_file(file, options);
            if let ParseResult::Skipped(name, reason) = &result {
                let event = if reason.is_recoverable() { "SKIPPED_FILE" } else { "ERROR" };
                log_event(event, &format!("{}: {}", name, reason));
            }
            result
        })
        .collect()
}
