//! deadview-core: unused LookML view detection library
//!
//! This library scans a LookML project, extracts which views every explore
//! touches and which views every view builds on, and reports the views no
//! explore can reach.
//!
//! # Features
//!
//! - **Reference extraction**: explore base views, join targets, `extends`
//!   parents and `<view>.SQL_TABLE_NAME` references inside derived-table SQL
//! - **Transitive reachability**: views reached through chains of derived
//!   tables and `extends` count as used, cycles included
//! - **Per-file isolation**: a file that fails to parse is reported, never fatal
//! - **CSV report**: the single-column `index,value` layout spreadsheets already consume
//!
//! # Quick Start
//!
//! Use the [`prelude`] module for convenient imports:
//!
//! ```rust,ignore
//! use deadview_core::prelude::*;
//!
//! let result = Deadview::new("/path/to/lookml").analyze()?;
//!
//! for view in &result.unused_views {
//!     println!("Unused view: {}", view);
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`lookml`]: LookML lexer and parser producing a `serde_json::Value` tree
//! - [`scan`]: Deterministic file discovery
//! - [`extract`]: Explore and view reference extraction
//! - [`parse`]: Per-file read, parse and extract with error isolation
//! - [`index`]: File-keyed indices and the flat name registry
//! - [`graph`]: View dependency graph and reachability closure
//! - [`detect`]: Unused view and empty file detection
//! - [`report`]: CSV report and stdout summaries
//! - [`builder`]: Fluent builder API for configuration
//! - [`error`]: Typed error handling

pub mod builder;
pub mod config;
pub mod detect;
pub mod error;
pub mod extract;
pub mod graph;
pub mod index;
pub mod logging;
pub mod lookml;
pub mod parse;
pub mod prelude;
pub mod report;
pub mod scan;

// ============================================================================
// Explicit Re-exports (avoiding glob imports for clear API surface)
// ============================================================================

// Error types
pub use error::{DeadviewError, DeadviewResult, IoResultExt};

// Builder API
pub use builder::{AnalysisResult, Deadview, SkippedFile};

// Configuration
pub use config::{
    load_config, DeadviewConfig, OutputConfig, Strategy, CONFIG_FILE_NAME, DEFAULT_REPORT_SUFFIX,
};

// Core detection
pub use detect::{empty_files, skipped_files, unused_views};

// Extraction
pub use extract::{
    extract_explores, extract_views, ExploreMap, ExploreRecord, ExtractOptions, ViewMap,
    ViewRecord,
};

// Graph building and closure
pub use graph::{build_view_graph, close_reachability};

// Aggregation
pub use index::{
    build_indices, unique_references, unique_view_names, ExploreIndex, FileIndex, NameRegistry,
    NameRole, Provenance, ViewIndex,
};

// Logging
pub use logging::{init_structured_logging, log_event, log_info, log_warn};

// LookML parsing
pub use lookml::{parse_lookml, SyntaxError};

// Per-file processing
pub use parse::{
    extract_file, normalize_path_string, parse_files, parse_single_file,
    path_to_normalized_string, read_lookml, FileExtraction, ParseResult,
};

// Reporting
pub use report::{print_json, print_plain, report_file_name, summary_json, write_csv, Report};

// File scanning
pub use scan::{classify, gather_lookml_files, FileKind, LookmlFile};
