mod generations;
mod ordering;

use crate::{Point, SeedConfig};
use petgraph::visit::{IntoNeighborsDirected, IntoNodeIdentifiers};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use thiserror::Error;
use tracing::debug;

use generations::assign_generations;
use ordering::order_generations;

/// Errors that can occur while seeding positions
#[derive(Debug, Error, PartialEq)]
pub enum SeedError<N>
where
    N: fmt::Debug,
{
    /// The graph contains a cycle at the given node
    #[error("graph contains a cycle at node {0:?}")]
    GraphHasCycle(N),
}

/// Initial positions for a DAG that comes without coordinates
///
/// Nodes are stacked in generations (`y`) and spread left to right in slots
/// (`x`), close to their parents. The result is meant as the starting point
/// of a [`crate::Relaxation`].
#[derive(Debug, Clone)]
pub struct GenerationSeed {
    /// Vertical distance between two consecutive generations
    pub level_gap: f64,
}

impl Default for GenerationSeed {
    fn default() -> Self {
        Self::from_config(&SeedConfig::default())
    }
}

/// Generation structure that can be cached and reused
#[derive(Debug, Clone, PartialEq)]
pub struct Generations<N> {
    /// Nodes of each generation, in slot order
    pub nodes: Vec<Vec<N>>,
}

impl GenerationSeed {
    pub fn new(level_gap: f64) -> Self {
        Self { level_gap }
    }

    pub fn from_config(config: &SeedConfig) -> Self {
        Self::new(config.level_gap)
    }

    /// Assign generations and order them (only depends on the graph structure)
    ///
    /// # Errors
    /// Returns an error if the graph contains cycles
    pub fn compute_generations<G>(
        &self,
        graph: G,
    ) -> Result<Generations<G::NodeId>, SeedError<G::NodeId>>
    where
        G: IntoNodeIdentifiers + IntoNeighborsDirected,
        G::NodeId: Copy + Ord + Hash + fmt::Debug,
    {
        let generations = assign_generations(graph)?;
        let nodes = order_generations(graph, generations);
        debug!("Seeded {} generations", nodes.len());
        Ok(Generations { nodes })
    }

    /// Place every node on its generation row and slot column
    pub fn compute_positions<N>(
        &self,
        generations: &Generations<N>,
        min_spacing: f64,
    ) -> HashMap<N, Point>
    where
        N: Copy + Ord + Hash,
    {
        let mut positions = HashMap::new();
        for (depth, generation) in generations.nodes.iter().enumerate() {
            let y = depth as f64 * self.level_gap;
            for (slot, &node) in generation.iter().enumerate() {
                positions.insert(node, Point::new(slot as f64 * min_spacing, y));
            }
        }
        positions
    }

    /// Both phases at once
    ///
    /// # Errors
    /// Returns an error if the graph contains cycles
    pub fn seed<G>(
        &self,
        graph: G,
        min_spacing: f64,
    ) -> Result<HashMap<G::NodeId, Point>, SeedError<G::NodeId>>
    where
        G: IntoNodeIdentifiers + IntoNeighborsDirected,
        G::NodeId: Copy + Ord + Hash + fmt::Debug,
    {
        let generations = self.compute_generations(graph)?;
        Ok(self.compute_positions(&generations, min_spacing))
    }
}
