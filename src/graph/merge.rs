//! Patch Merging
//!
//! Folds a challenge patch into a graph the caller owns. Merging is additive:
//! nodes are upserted by id, edges are unioned by `(from, to, relation)`.

use std::collections::{HashMap, HashSet};

use super::types::{EdgeRelation, Patch, ReasoningGraph};

/// Return a new graph with `patch` applied. `graph` is left untouched.
///
/// - A patch node replaces the graph node with the same id in place; unseen ids
///   are appended in patch order.
/// - A patch edge is appended only if no edge with the same
///   `(from, to, relation)` was seen before, either in the graph or earlier in
///   the patch.
pub fn merge_patch(graph: &ReasoningGraph, patch: &Patch) -> ReasoningGraph {
    let mut nodes = graph.nodes.clone();
    let mut positions: HashMap<String, usize> = HashMap::with_capacity(nodes.len());
    for (idx, node) in nodes.iter().enumerate() {
        positions.entry(node.id.clone()).or_insert(idx);
    }

    for node in &patch.nodes {
        match positions.get(&node.id) {
            Some(&idx) => nodes[idx] = node.clone(),
            None => {
                positions.insert(node.id.clone(), nodes.len());
                nodes.push(node.clone());
            }
        }
    }

    let mut edges = graph.edges.clone();
    let mut seen: HashSet<(String, String, EdgeRelation)> = graph
        .edges
        .iter()
        .map(|e| (e.from.clone(), e.to.clone(), e.relation))
        .collect();

    for edge in &patch.edges {
        if seen.insert((edge.from.clone(), edge.to.clone(), edge.relation)) {
            edges.push(edge.clone());
        }
    }

    tracing::debug!(
        added_nodes = nodes.len() - graph.nodes.len(),
        added_edges = edges.len() - graph.edges.len(),
        "Merged patch into graph"
    );

    ReasoningGraph {
        nodes,
        edges,
        ..graph.clone()
    }
}
