//! File-keyed indices and the flat name registry.
//!
//! Per-file extraction results are folded into two indices (explores and views,
//! each `file → name → record`). Names are treated as one global namespace:
//! a view called `orders` in one file is the same entity as `orders` anywhere
//! else. [`NameRegistry`] records where each name came from so that
//! simplification can be audited.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::extract::{ExploreRecord, ViewRecord};
use crate::parse::ParseResult;

/// `file → name → record`.
#[derive(Debug, Clone)]
pub struct FileIndex<R> {
    files: BTreeMap<String, BTreeMap<String, R>>,
}

impl<R> Default for FileIndex<R> {
    fn default() -> Self {
        Self {
            files: BTreeMap::new(),
        }
    }
}

/// Explores of every file.
pub type ExploreIndex = FileIndex<ExploreRecord>;

/// Views of every file.
pub type ViewIndex = FileIndex<ViewRecord>;

impl<R> FileIndex<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file's records. Empty maps are not stored; returns whether the file was added.
    pub fn insert(&mut self, file: impl Into<String>, records: BTreeMap<String, R>) -> bool {
        if records.is_empty() {
            return false;
        }
        self.files.insert(file.into(), records);
        true
    }

    pub fn get(&self, file: &str) -> Option<&BTreeMap<String, R>> {
        self.files.get(file)
    }

    pub fn contains_file(&self, file: &str) -> bool {
        self.files.contains_key(file)
    }

    /// Number of files in the index.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterate `(file, name → record)`.
    pub fn files(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, R>)> {
        self.files.iter().map(|(f, m)| (f.as_str(), m))
    }

    /// Iterate every `(file, record)` pair.
    pub fn records(&self) -> impl Iterator<Item = (&str, &R)> {
        self.files
            .iter()
            .flat_map(|(f, m)| m.values().map(move |r| (f.as_str(), r)))
    }

    /// Total number of records across files.
    pub fn record_count(&self) -> usize {
        self.files.values().map(BTreeMap::len).sum()
    }
}

/// Fold per-file results into the two indices. Skipped files contribute nothing.
pub fn build_indices(results: &[ParseResult]) -> (ExploreIndex, ViewIndex) {
    let mut explores = ExploreIndex::new();
    let mut views = ViewIndex::new();

    for result in results {
        if let ParseResult::Ok(extraction) = result {
            explores.insert(extraction.name.clone(), extraction.explores.clone());
            views.insert(extraction.name.clone(), extraction.views.clone());
        }
    }

    (explores, views)
}

/// Every reference of every explore: the seed of the reachable set.
pub fn unique_references(explores: &ExploreIndex) -> HashSet<String> {
    explores
        .records()
        .flat_map(|(_, record)| record.references.iter().cloned())
        .collect()
}

/// Every view name plus every name a view references: the declared set.
pub fn unique_view_names(views: &ViewIndex) -> HashSet<String> {
    views
        .records()
        .flat_map(|(_, record)| {
            std::iter::once(record.name.clone()).chain(record.references.iter().cloned())
        })
        .collect()
}

/// How a name appeared in a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NameRole {
    /// Declared as an explore
    Explore,
    /// Declared as a view
    View,
    /// Only mentioned as a reference
    Reference,
}

/// Where a name was seen.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Provenance {
    pub file: String,
    pub role: NameRole,
}

/// Flat registry keyed by name. Provenance is metadata only, never identity.
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    entries: BTreeMap<String, Vec<Provenance>>,
}

impl NameRegistry {
    /// Record every explore, view and reference with the file it came from.
    pub fn build(explores: &ExploreIndex, views: &ViewIndex) -> Self {
        let mut registry = Self::default();

        for (file, record) in explores.records() {
            registry.record(&record.name, file, NameRole::Explore);
            for reference in &record.references {
                registry.record(reference, file, NameRole::Reference);
            }
        }
        for (file, record) in views.records() {
            registry.record(&record.name, file, NameRole::View);
            for reference in &record.references {
                registry.record(reference, file, NameRole::Reference);
            }
        }

        registry
    }

    fn record(&mut self, name: &str, file: &str, role: NameRole) {
        let origins = self.entries.entry(name.to_string()).or_default();
        let provenance = Provenance {
            file: file.to_string(),
            role,
        };
        if let Err(pos) = origins.binary_search(&provenance) {
            origins.insert(pos, provenance);
        }
    }

    /// All provenance entries for a name (sorted by file, then role).
    pub fn origins(&self, name: &str) -> &[Provenance] {
        self.entries.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Files that declare `name` as a view.
    pub fn view_files(&self, name: &str) -> Vec<&str> {
        self.origins(name)
            .iter()
            .filter(|p| p.role == NameRole::View)
            .map(|p| p.file.as_str())
            .collect()
    }

    /// Files that declare `name`, or failing that mention it.
    pub fn source_files(&self, name: &str) -> Vec<&str> {
        let declared = self.view_files(name);
        if !declared.is_empty() {
            return declared;
        }
        let mut files: Vec<&str> = self.origins(name).iter().map(|p| p.file.as_str()).collect();
        files.dedup();
        files
    }

    /// View names declared in more than one file, with those files.
    pub fn duplicate_views(&self) -> Vec<(&str, Vec<&str>)> {
        self.entries
            .keys()
            .filter_map(|name| {
                let files = self.view_files(name);
                (files.len() > 1).then_some((name.as_str(), files))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
