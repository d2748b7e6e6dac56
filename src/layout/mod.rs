//! Layout adapter
//!
//! Builders leave every node at the origin. A [`LayoutEngine`] assigns
//! positions afterwards: messaging graphs read left to right, entity maps use
//! a force-directed layout. Nodes drawn inside a group keep the position the
//! builder gave them relative to the group; edges touching them are attributed
//! to the group when ranking.

mod force_directed;
mod hierarchical;

pub use force_directed::ForceDirectedLayout;
pub use hierarchical::HierarchicalLayout;

use crate::config::LayoutConfig;
use crate::graph::NodesAndEdges;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Assigns positions to the nodes of a built graph
pub trait LayoutEngine {
    fn apply(&self, graph: &mut NodesAndEdges);
}

/// Available layout engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutKind {
    #[default]
    Hierarchical,
    ForceDirected,
}

impl LayoutKind {
    pub fn engine(&self, config: &LayoutConfig) -> Box<dyn LayoutEngine> {
        match self {
            LayoutKind::Hierarchical => Box::new(HierarchicalLayout::new(config.clone())),
            LayoutKind::ForceDirected => Box::new(ForceDirectedLayout::new(config.clone())),
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutKind::Hierarchical => write!(f, "hierarchical"),
            LayoutKind::ForceDirected => write!(f, "force-directed"),
        }
    }
}

/// Top-level nodes in order, and edges between them as index pairs
///
/// Child nodes are folded into their group. Self edges and duplicates are
/// dropped.
pub(crate) fn layout_view(graph: &NodesAndEdges) -> (IndexMap<String, usize>, Vec<(usize, usize)>) {
    let parents: IndexMap<&str, Option<&str>> = graph
        .nodes
        .iter()
        .map(|node| (node.id.as_str(), node.parent_id.as_deref()))
        .collect();

    let top_level = |id: &str| -> Option<String> {
        let mut current = id;
        let mut hops = 0;
        while let Some(Some(parent)) = parents.get(current).copied() {
            if hops > parents.len() {
                break;
            }
            current = parent;
            hops += 1;
        }
        parents.contains_key(current).then(|| current.to_string())
    };

    let index: IndexMap<String, usize> = graph
        .nodes
        .iter()
        .filter(|node| node.parent_id.is_none())
        .enumerate()
        .map(|(position, node)| (node.id.clone(), position))
        .collect();

    let mut edges = Vec::new();
    for edge in &graph.edges {
        let (Some(source), Some(target)) = (top_level(&edge.source), top_level(&edge.target)) else {
            continue;
        };
        let (Some(&from), Some(&to)) = (index.get(&source), index.get(&target)) else {
            continue;
        };
        if from != to && !edges.contains(&(from, to)) {
            edges.push((from, to));
        }
    }

    (index, edges)
}
