//! Prelude module for convenient imports.
//!
//! Import commonly used types with a single line:
//!
//! ```rust,ignore
//! use deadview_core::prelude::*;
//! ```

// Core analysis types
pub use crate::error::{DeadviewError, DeadviewResult};
pub use crate::parse::{FileExtraction, ParseResult};

// Graph building and closure
pub use crate::graph::{build_view_graph, close_reachability};

// Unused view detection
pub use crate::detect::unused_views;

// File scanning
pub use crate::scan::gather_lookml_files;

// Configuration
pub use crate::config::{load_config, DeadviewConfig, Strategy};

// Reporting
pub use crate::report::{write_csv, Report};

// Builder API
pub use crate::builder::{AnalysisResult, Deadview};
