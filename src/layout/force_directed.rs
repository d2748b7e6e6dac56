//! Fruchterman-Reingold force-directed layout
//!
//! Used for entity maps, which have no natural direction. Initial placement
//! is seeded so the same graph always lands in the same place.

use super::{layout_view, LayoutEngine};
use crate::config::LayoutConfig;
use crate::graph::NodesAndEdges;
use crate::value_objects::Position2D;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MIN_DISTANCE: f64 = 0.01;

#[derive(Debug, Clone, Default)]
pub struct ForceDirectedLayout {
    config: LayoutConfig,
}

impl ForceDirectedLayout {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Run the simulation over `node_count` nodes
    pub fn simulate(&self, node_count: usize, edges: &[(usize, usize)]) -> Vec<Position2D> {
        if node_count == 0 {
            return Vec::new();
        }

        let k = self.config.ideal_distance.max(1.0);
        let side = k * (node_count as f64).sqrt();
        let half = side / 2.0;

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut positions: Vec<Position2D> = (0..node_count)
            .map(|_| Position2D::new(rng.gen_range(-half..half), rng.gen_range(-half..half)))
            .collect();

        let iterations = self.config.iterations.max(1);
        let mut temperature = k;
        let cooling = temperature / iterations as f64;

        for _ in 0..iterations {
            let mut displacement = vec![(0.0f64, 0.0f64); node_count];

            for i in 0..node_count {
                for j in (i + 1)..node_count {
                    let dx = positions[i].x - positions[j].x;
                    let dy = positions[i].y - positions[j].y;
                    let distance = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
                    let force = k * k / distance;
                    let (fx, fy) = (dx / distance * force, dy / distance * force);
                    displacement[i].0 += fx;
                    displacement[i].1 += fy;
                    displacement[j].0 -= fx;
                    displacement[j].1 -= fy;
                }
            }

            for &(source, target) in edges {
                let dx = positions[target].x - positions[source].x;
                let dy = positions[target].y - positions[source].y;
                let distance = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
                let force = distance * distance / k;
                let (fx, fy) = (dx / distance * force, dy / distance * force);
                displacement[source].0 += fx;
                displacement[source].1 += fy;
                displacement[target].0 -= fx;
                displacement[target].1 -= fy;
            }

            for (position, (dx, dy)) in positions.iter_mut().zip(displacement) {
                let length = (dx * dx + dy * dy).sqrt();
                if length > 0.0 {
                    let step = length.min(temperature);
                    position.x += dx / length * step;
                    position.y += dy / length * step;
                }
            }

            temperature = (temperature - cooling).max(MIN_DISTANCE);
        }

        positions
    }
}

impl LayoutEngine for ForceDirectedLayout {
    fn apply(&self, graph: &mut NodesAndEdges) {
        let (index, edges) = layout_view(graph);
        let positions = self.simulate(index.len(), &edges);

        for node in graph.nodes.iter_mut() {
            if let Some(&slot) = index.get(&node.id) {
                node.position = positions[slot];
            }
        }
    }
}
