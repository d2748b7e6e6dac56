//! Left-to-right layered layout
//!
//! Ranks come from a longest-path layering over the edges (Kahn order). Nodes
//! left over by a cycle are placed one rank after their deepest ranked parent.
//! Each rank is a column, centred vertically.

use super::{layout_view, LayoutEngine};
use crate::config::LayoutConfig;
use crate::graph::NodesAndEdges;
use crate::value_objects::Position2D;
use std::collections::{BTreeMap, VecDeque};

#[derive(Debug, Clone, Default)]
pub struct HierarchicalLayout {
    config: LayoutConfig,
}

impl HierarchicalLayout {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Rank of every node, indexed like the input
    pub fn ranks(node_count: usize, edges: &[(usize, usize)]) -> Vec<usize> {
        let mut ranks = vec![0usize; node_count];
        let mut indegree = vec![0usize; node_count];
        for &(_, to) in edges {
            indegree[to] += 1;
        }

        let mut queue: VecDeque<usize> = (0..node_count).filter(|&n| indegree[n] == 0).collect();
        let mut visited = vec![false; node_count];

        while let Some(node) = queue.pop_front() {
            visited[node] = true;
            for &(from, to) in edges.iter().filter(|(from, _)| *from == node) {
                ranks[to] = ranks[to].max(ranks[from] + 1);
                indegree[to] -= 1;
                if indegree[to] == 0 {
                    queue.push_back(to);
                }
            }
        }

        for node in 0..node_count {
            if visited[node] {
                continue;
            }
            ranks[node] = edges
                .iter()
                .filter(|(from, to)| *to == node && *from != node && visited[*from])
                .map(|(from, _)| ranks[*from] + 1)
                .max()
                .unwrap_or(0);
            visited[node] = true;
        }

        ranks
    }
}

impl LayoutEngine for HierarchicalLayout {
    fn apply(&self, graph: &mut NodesAndEdges) {
        let (index, edges) = layout_view(graph);
        let ranks = Self::ranks(index.len(), &edges);

        let mut columns: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (node, rank) in ranks.iter().enumerate() {
            columns.entry(*rank).or_default().push(node);
        }

        let column_step = self.config.node_width + self.config.rank_spacing;
        let row_step = self.config.node_height + self.config.node_spacing;
        let mut positions = vec![Position2D::default(); index.len()];
        for (rank, members) in columns {
            let offset = (members.len() as f64 - 1.0) / 2.0;
            for (row, node) in members.into_iter().enumerate() {
                positions[node] = Position2D::new(rank as f64 * column_step, (row as f64 - offset) * row_step);
            }
        }

        for node in graph.nodes.iter_mut() {
            if let Some(&slot) = index.get(&node.id) {
                node.position = positions[slot];
            }
        }
    }
}
