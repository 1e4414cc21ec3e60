//! Unused view and empty file detection.

use std::collections::HashSet;

use crate::parse::ParseResult;

/// Names present in `declared` but not in `reachable`, sorted ascending.
pub fn unused_views(declared: &HashSet<String>, reachable: &HashSet<String>) -> Vec<String> {
    let mut unused: Vec<String> = declared.difference(reachable).cloned().collect();
    unused.sort();
    unused
}

/// Files that parsed but declared no explores and no views, in scan order.
pub fn empty_files(results: &[ParseResult]) -> Vec<String> {
    results
        .iter()
        .filter_map(|r| match r {
            ParseResult::Ok(extraction) if extraction.is_empty() => Some(extraction.name.clone()),
            _ => None,
        })
        .collect()
}

/// Files that were skipped, with the reason, in scan order.
pub fn skipped_files(results: &[ParseResult]) -> Vec<(String, String)> {
    results
        .iter()
        .filter_map(|r| match r {
            ParseResult::Skipped(name, reason) => Some((name.clone(), reason.to_string())),
            ParseResult::Ok(_) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeadviewError;
    use crate::extract::{ViewMap, ViewRecord};
    use crate::parse::FileExtraction;

    fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_unused_views_difference_sorted() {
        assert_eq!(unused_views(&set(&["c", "a", "b"]), &set(&["a", "c"])), vec!["b"]);
        assert_eq!(
            unused_views(&set(&["zeta", "alpha", "mid"]), &HashSet::new()),
            vec!["alpha", "mid", "zeta"]
        );
    }

    #[test]
    fn test_reachable_extras_are_ignored() {
        assert!(unused_views(&set(&["a"]), &set(&["a", "only_in_explore"])).is_empty());
    }

    #[test]
    fn test_empty_and_skipped_files() {
        let results = vec![
            ParseResult::Ok(FileExtraction {
                name: "empty.lkml".into(),
                ..Default::default()
            }),
            ParseResult::Ok(FileExtraction {
                name: "orders.view.lkml".into(),
                views: ViewMap::from([(
                    "orders".to_string(),
                    ViewRecord {
                        name: "orders".into(),
                        references: Vec::new(),
                    },
                )]),
                ..Default::default()
            }),
            ParseResult::Skipped(
                "bad.lkml".into(),
                DeadviewError::parse_at("bad.lkml", "unexpected `}`", 2, 1),
            ),
        ];

        assert_eq!(empty_files(&results), vec!["empty.lkml"]);
        let skipped = skipped_files(&results);
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].0, "bad.lkml");
        assert!(skipped[0].1.contains("unexpected"));
    }
}
