//! Reference extraction from parsed LookML files.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐     ┌──────────────────────┐
//! │ explore_extractor.rs │     │  view_extractor.rs   │
//! │  ──────────────────  │     │  ──────────────────  │
//! │  explore → base view │     │  view → SQL_TABLE_   │
//! │  + join targets      │     │  NAME refs + extends │
//! └──────────┬───────────┘     └──────────┬───────────┘
//!            │                            │
//!            └────────────┬───────────────┘
//!                         ▼
//!              ┌─────────────────────┐
//!              │      index.rs       │
//!              │  file-keyed indices │
//!              └─────────────────────┘
//! ```
//!
//! Both extractors take the parsed file as a `serde_json::Value` and return an
//! ordered map keyed by declaration name. A file without the relevant key
//! yields an empty map. A declaration missing its `name`, or a value of the
//! wrong shape, fails extraction for the whole file.

pub mod explore_extractor;
pub mod view_extractor;

pub use explore_extractor::{extract_explores, ExploreMap, ExploreRecord};
pub use view_extractor::{extract_views, ExtractOptions, ViewMap, ViewRecord};

use std::path::Path;

use serde_json::Value;

use crate::error::{DeadviewError, DeadviewResult};

/// Read an optional string field, rejecting non-string values.
pub(crate) fn optional_str<'a>(
    obj: &'a Value,
    field: &str,
    path: &Path,
) -> DeadviewResult<Option<&'a str>> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(DeadviewError::malformed(
            path,
            format!("`{}` should be a string, found {}", field, type_name(other)),
        )),
    }
}

/// Read the required `name` field of a declaration.
pub(crate) fn required_name<'a>(
    obj: &'a Value,
    object: &'static str,
    path: &Path,
) -> DeadviewResult<&'a str> {
    optional_str(obj, "name", path)?.ok_or_else(|| DeadviewError::missing_field(path, object, "name"))
}

/// Read an optional list of declarations (`views`, `explores`, `joins`).
pub(crate) fn optional_list<'a>(
    obj: &'a Value,
    field: &str,
    path: &Path,
) -> DeadviewResult<&'a [Value]> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(other) => Err(DeadviewError::malformed(
            path,
            format!("`{}` should be a list, found {}", field, type_name(other)),
        )),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
