//! View dependency extraction.
//!
//! A view depends on:
//! - every `<name>.SQL_TABLE_NAME` occurrence in `derived_table.sql`
//!   (in order, duplicates kept)
//! - every entry of `extends`
//!
//! A view with neither has an empty list and is a leaf.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use super::{optional_list, optional_str, required_name};
use crate::error::{DeadviewError, DeadviewResult};

/// One view and the names it depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewRecord {
    pub name: String,
    /// Derived-table SQL references first, then `extends` parents
    pub references: Vec<String>,
}

impl ViewRecord {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            references: Vec::new(),
        }
    }

    /// A view without dependencies.
    pub fn is_leaf(&self) -> bool {
        self.references.is_empty()
    }
}

/// Views of one file, keyed by view name.
pub type ViewMap = BTreeMap<String, ViewRecord>;

/// Knobs for view extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Match the `.SQL_TABLE_NAME` suffix case-sensitively.
    pub case_sensitive: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
        }
    }
}

/// Pre-compiled `identifier.SQL_TABLE_NAME` patterns.
fn sql_table_name_regex(case_sensitive: bool) -> &'static Regex {
    static EXACT: OnceLock<Regex> = OnceLock::new();
    static ANY_CASE: OnceLock<Regex> = OnceLock::new();

    // SAFETY: Both patterns are hardcoded and exercised by the tests below.
    if case_sensitive {
        EXACT.get_or_init(|| {
            Regex::new(r"([A-Za-z0-9_]+)\.SQL_TABLE_NAME").expect("Hardcoded regex pattern is valid")
        })
    } else {
        ANY_CASE.get_or_init(|| {
            Regex::new(r"([A-Za-z0-9_]+)\.(?i:SQL_TABLE_NAME)")
                .expect("Hardcoded regex pattern is valid")
        })
    }
}

/// Collect every identifier written as `<identifier>.SQL_TABLE_NAME` in `sql`.
pub fn sql_table_name_references(sql: &str, options: ExtractOptions) -> Vec<String> {
    sql_table_name_regex(options.case_sensitive)
        .captures_iter(sql)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

fn extends_list<'a>(view: &'a Value, path: &Path) -> DeadviewResult<Vec<&'a str>> {
    match view.get("extends") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(parent)) => Ok(vec![parent.as_str()]),
        Some(Value::Array(_)) => optional_list(view, "extends", path)?
            .iter()
            .map(|parent| {
                parent.as_str().ok_or_else(|| {
                    DeadviewError::malformed(path, "`extends` entries should be view names")
                })
            })
            .collect(),
        Some(_) => Err(DeadviewError::malformed(
            path,
            "`extends` should be a list of view names",
        )),
    }
}

/// Extract every view of a parsed file with its dependencies.
///
/// Returns an empty map when the file declares no views.
pub fn extract_views(path: &Path, parsed: &Value, options: ExtractOptions) -> DeadviewResult<ViewMap> {
    let mut views = ViewMap::new();

    for view in optional_list(parsed, "views", path)? {
        let name = required_name(view, "view", path)?;
        let record = views
            .entry(name.to_string())
            .or_insert_with(|| ViewRecord::new(name));

        match view.get("derived_table") {
            None | Some(Value::Null) => {}
            Some(derived @ Value::Object(_)) => {
                if let Some(sql) = optional_str(derived, "sql", path)? {
                    record.references.extend(sql_table_name_references(sql, options));
                }
            }
            Some(_) => {
                return Err(DeadviewError::malformed(
                    path,
                    format!("`derived_table` of view `{}` should be a block", name),
                ))
            }
        }

        for parent in extends_list(view, path)? {
            record.references.push(parent.to_string());
        }
    }

    Ok(views)
}
