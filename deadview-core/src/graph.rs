//! View dependency graph and reachability closure.
//!
//! Performance characteristics:
//! - Graph build: O(|V| + |E|) where V = view names, E = view → dependency edges
//! - Closure: O(|V| + |E|) single worklist traversal, independent of seed count
//!
//! Names are global: a view declared in several files contributes the union
//! of its dependencies.

use petgraph::graphmap::DiGraphMap;
use std::collections::{HashSet, VecDeque};

use crate::index::ViewIndex;

/// Builds the view dependency graph across all files.
///
/// Every view and every name a view references becomes a node, even when the
/// referenced name is never declared.
pub fn build_view_graph(views: &ViewIndex) -> DiGraphMap<&str, ()> {
    let mut g = DiGraphMap::new();

    for (_, record) in views.records() {
        g.add_node(record.name.as_str());
        for dep in &record.references {
            g.add_edge(record.name.as_str(), dep.as_str(), ());
        }
    }

    g
}

/// Grows `reachable` until every dependency of a reachable view is itself reachable.
///
/// Seeds that are not in the graph stay in the set untouched. Cycles terminate
/// on the membership check. Running it again on a closed set adds nothing.
///
/// Returns the number of names added.
pub fn close_reachability(views: &ViewIndex, reachable: &mut HashSet<String>) -> usize {
    let g = build_view_graph(views);
    let before = reachable.len();

    let mut queue: VecDeque<&str> = g
        .nodes()
        .filter(|node| reachable.contains(*node))
        .collect();

    while let Some(node) = queue.pop_front() {
        for n in g.neighbors(node) {
            if reachable.insert(n.to_string()) {
                queue.push_back(n);
            }
        }
    }

    reachable.len() - before
}
