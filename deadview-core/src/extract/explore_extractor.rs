//! Explore reference extraction.
//!
//! For every explore the reference list starts with the base view:
//! - `view_name` and/or `from` when present (both recorded, `view_name` first)
//! - otherwise the explore's own `name`, since the explore is then its own base view
//!
//! Each join then adds its `view_name` and/or `from`, or its own `name` when it
//! has neither. The list is deduplicated, keeping the first occurrence, so the
//! base view always stays first.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use super::{optional_list, optional_str, required_name};
use crate::error::{DeadviewError, DeadviewResult};

/// One explore and the view names it makes reachable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExploreRecord {
    /// Explore name (`label` when present, else `name`)
    pub name: String,
    /// Base view first, then join targets
    pub references: Vec<String>,
}

impl ExploreRecord {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            references: Vec::with_capacity(4),
        }
    }

    fn push(&mut self, reference: &str) {
        if !self.references.iter().any(|r| r == reference) {
            self.references.push(reference.to_string());
        }
    }

    /// The explore's base view.
    pub fn base_view(&self) -> Option<&str> {
        self.references.first().map(String::as_str)
    }
}

/// Explores of one file, keyed by explore name.
pub type ExploreMap = BTreeMap<String, ExploreRecord>;

/// Push `view_name` and `from` when present, else `name`. Returns false when none exist.
fn push_targets(record: &mut ExploreRecord, obj: &Value, path: &Path) -> DeadviewResult<bool> {
    let view_name = optional_str(obj, "view_name", path)?;
    let from = optional_str(obj, "from", path)?;

    if view_name.is_none() && from.is_none() {
        return match optional_str(obj, "name", path)? {
            Some(name) => {
                record.push(name);
                Ok(true)
            }
            None => Ok(false),
        };
    }

    for target in [view_name, from].into_iter().flatten() {
        record.push(target);
    }
    Ok(true)
}

/// Extract every explore of a parsed file with its referenced views.
///
/// Returns an empty map when the file declares no explores.
pub fn extract_explores(path: &Path, parsed: &Value) -> DeadviewResult<ExploreMap> {
    let mut explores = ExploreMap::new();

    for explore in optional_list(parsed, "explores", path)? {
        let name = required_name(explore, "explore", path)?;
        let key = optional_str(explore, "label", path)?.unwrap_or(name);

        // Repeated explore names in one file share a record
        let record = explores
            .entry(key.to_string())
            .or_insert_with(|| ExploreRecord::new(key));

        push_targets(record, explore, path)?;

        for join in optional_list(explore, "joins", path)? {
            if !push_targets(record, join, path)? {
                return Err(DeadviewError::missing_field(path, "join", "name"));
            }
        }
    }

    Ok(explores)
}
