//! The `extends` relation as a directed acyclic graph

use petgraph::algo::{astar, toposort};
use petgraph::graphmap::DiGraphMap;
use petgraph::visit::Dfs;

use crate::error::GrammarError;

use super::model::PatternDictionary;

/// Directed graph of `extends` edges; an edge `a -> b` means `a` extends `b`.
#[derive(Debug, Clone)]
pub struct ExtendsGraph<'a> {
    graph: DiGraphMap<&'a str, ()>,
}

impl<'a> ExtendsGraph<'a> {
    /// Build the graph from every pattern's `extends` list.
    ///
    /// Targets missing from the dictionary still become nodes.
    pub fn from_dictionary(dict: &'a PatternDictionary) -> Self {
        let mut graph = DiGraphMap::new();
        for (id, pattern) in dict.iter() {
            graph.add_node(id.as_str());
            for target in &pattern.extends {
                graph.add_edge(id.as_str(), target.as_str(), ());
            }
        }
        Self { graph }
    }

    pub fn add_edge(&mut self, from: &'a str, to: &'a str) {
        self.graph.add_edge(from, to, ());
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.graph.contains_edge(from, to)
    }

    /// Whether `to` can be reached from `from` by following edges
    pub fn reaches(&self, from: &str, to: &str) -> bool {
        let (Some(from), Some(to)) = (self.node(from), self.node(to)) else {
            return false;
        };
        let mut dfs = Dfs::new(&self.graph, from);
        while let Some(node) = dfs.next(&self.graph) {
            if node == to {
                return true;
            }
        }
        false
    }

    /// Shortest chain of ids from `from` to `to`, both ends included
    pub fn path(&self, from: &str, to: &str) -> Option<Vec<String>> {
        let (from, to) = (self.node(from)?, self.node(to)?);
        astar(&self.graph, from, |n| n == to, |_| 1, |_| 0)
            .map(|(_, path)| path.into_iter().map(str::to_string).collect())
    }

    /// A cycle in the graph, first node repeated at the end
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        let start = match toposort(&self.graph, None) {
            Ok(_) => return None,
            Err(cycle) => cycle.node_id(),
        };
        self.graph
            .neighbors(start)
            .filter_map(|next| self.path(next, start))
            .min_by_key(|p| p.len())
            .map(|rest| {
                let mut cycle = vec![start.to_string()];
                cycle.extend(rest);
                cycle
            })
    }

    // Map a borrowed id onto the graph's own node key
    fn node(&self, id: &str) -> Option<&'a str> {
        self.graph.nodes().find(|n| *n == id)
    }
}

/// Check that `pattern extends target` may be committed.
///
/// Rejects unknown ids, self-edges, edges already present, and any edge that
/// would let `target` reach back to `pattern`.
pub fn validate_extends(
    dict: &PatternDictionary,
    pattern: &str,
    target: &str,
) -> Result<(), GrammarError> {
    if !dict.contains(pattern) {
        return Err(GrammarError::unknown_pattern(pattern));
    }
    if !dict.contains(target) {
        return Err(GrammarError::UnknownExtendsTarget {
            pattern: pattern.to_string(),
            target: target.to_string(),
        });
    }
    if pattern == target {
        return Err(GrammarError::cyclic(vec![
            pattern.to_string(),
            target.to_string(),
        ]));
    }

    let mut graph = ExtendsGraph::from_dictionary(dict);
    if graph.has_edge(pattern, target) {
        return Err(GrammarError::DuplicateExtends {
            pattern: pattern.to_string(),
            target: target.to_string(),
        });
    }

    // Both ids are dictionary keys, so they are nodes already
    let (Some(from), Some(to)) = (graph.node(pattern), graph.node(target)) else {
        return Err(GrammarError::unknown_pattern(pattern));
    };
    graph.add_edge(from, to);

    if graph.reaches(target, pattern) {
        let mut cycle = vec![pattern.to_string()];
        cycle.extend(
            graph
                .path(target, pattern)
                .unwrap_or_else(|| vec![target.to_string(), pattern.to_string()]),
        );
        return Err(GrammarError::cyclic(cycle));
    }
    Ok(())
}

/// Validate every `extends` list of a freshly built dictionary.
///
/// Duplicate entries and cycles (self-edges included) are errors; unknown
/// targets are left to lint.
pub fn validate_dictionary(dict: &PatternDictionary) -> Result<(), GrammarError> {
    for (id, pattern) in dict.iter() {
        let mut seen = std::collections::HashSet::new();
        for target in &pattern.extends {
            if !seen.insert(target.as_str()) {
                return Err(GrammarError::DuplicateExtends {
                    pattern: id.clone(),
                    target: target.clone(),
                });
            }
        }
    }

    match ExtendsGraph::from_dictionary(dict).find_cycle() {
        Some(cycle) => Err(GrammarError::cyclic(cycle)),
        None => Ok(()),
    }
}
