mod forces;
mod levels;

pub use forces::{gravity, pressure};
pub use levels::Levels;

use crate::{Point, RelaxationConfig, Vec2};
use levels::sorted_by_x;
use petgraph::visit::{IntoNeighborsDirected, IntoNodeIdentifiers};
use petgraph::Direction;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use thiserror::Error;
use tracing::{debug, trace};

/// Invalid relaxation parameters, rejected at construction
#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    /// Width or height is zero, negative or not finite
    #[error("node footprint must be positive and finite, got {width}x{height}")]
    InvalidFootprint { width: f64, height: f64 },

    #[error("damping must lie in (0, 1], got {0}")]
    InvalidDamping(f64),

    #[error("gravity weight must be finite and non-negative, got {0}")]
    InvalidGravityWeight(f64),

    #[error("margin must be finite and non-negative, got {0}")]
    InvalidMargin(f64),
}

/// Iterative force relaxation of horizontal positions, level by level
///
/// Each pass pushes overlapping same-level neighbors apart ("pressure") and
/// pulls every node toward the mean `x` of the nodes it is connected to
/// ("gravity"). A final sweep guarantees that consecutive nodes of a level are
/// at least [`Relaxation::min_spacing`] apart.
#[derive(Debug, Clone)]
pub struct Relaxation {
    footprint: Vec2,
    margin: f64,
    passes: usize,
    damping: f64,
    gravity_weight: f64,
}

impl Relaxation {
    /// Create a relaxation for nodes of the given footprint, with default tuning
    ///
    /// # Errors
    /// Returns an error if the footprint is not strictly positive
    pub fn new(footprint: Vec2) -> Result<Self, LayoutError> {
        Self::from_config(&RelaxationConfig {
            footprint,
            ..Default::default()
        })
    }

    /// Create a relaxation from a full configuration
    ///
    /// # Errors
    /// Returns an error if any parameter is out of range
    pub fn from_config(config: &RelaxationConfig) -> Result<Self, LayoutError> {
        let RelaxationConfig {
            footprint,
            margin,
            passes,
            damping,
            gravity_weight,
        } = *config;

        if !footprint.is_positive() {
            return Err(LayoutError::InvalidFootprint {
                width: footprint.x,
                height: footprint.y,
            });
        }
        if !(damping > 0.0 && damping <= 1.0) {
            return Err(LayoutError::InvalidDamping(damping));
        }
        if !(gravity_weight.is_finite() && gravity_weight >= 0.0) {
            return Err(LayoutError::InvalidGravityWeight(gravity_weight));
        }
        if !(margin.is_finite() && margin >= 0.0) {
            return Err(LayoutError::InvalidMargin(margin));
        }

        Ok(Self {
            footprint,
            margin,
            passes,
            damping,
            gravity_weight,
        })
    }

    /// Override the number of passes per level
    pub fn with_passes(mut self, passes: usize) -> Self {
        self.passes = passes;
        self
    }

    pub fn footprint(&self) -> Vec2 {
        self.footprint
    }

    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Minimum distance between the centers of two same-level nodes
    pub fn min_spacing(&self) -> f64 {
        self.footprint.x + self.margin
    }

    /// Push nodes right until every level respects the minimum spacing
    ///
    /// Nodes are visited in ascending `x` within each level. The first node of
    /// a level never moves and no node ever moves left, so running this twice
    /// gives the same result as running it once.
    pub fn enforce_placement<N>(&self, levels: &Levels<N>, positions: &mut HashMap<N, Point>)
    where
        N: Copy + Ord + Hash,
    {
        let min_spacing = self.min_spacing();

        for level in &levels.nodes {
            let order = sorted_by_x(level, positions);
            let mut previous_x = None;

            for node in order {
                let Some(pos) = positions.get_mut(&node) else {
                    continue;
                };
                if let Some(prev) = previous_x {
                    pos.x = pos.x.max(prev + min_spacing);
                }
                previous_x = Some(pos.x);
            }
        }
    }

    /// Relax the horizontal positions of every node of `graph`
    ///
    /// `positions` is updated in place: only `x` changes, `y` selects the
    /// level. Nodes of the graph missing from `positions` are not laid out and
    /// contribute no gravity.
    pub fn run<G>(&self, graph: G, positions: &mut HashMap<G::NodeId, Point>)
    where
        G: IntoNodeIdentifiers + IntoNeighborsDirected,
        G::NodeId: Copy + Ord + Hash + fmt::Debug,
    {
        let levels = Levels::group(graph.node_identifiers(), positions);
        if levels.is_empty() {
            return;
        }

        let connections = connections(graph, &levels);
        debug!(
            "Relaxing {} nodes over {} levels, {} passes each",
            levels.len(),
            levels.nodes.len(),
            self.passes
        );

        for level in &levels.nodes {
            for _ in 0..self.passes {
                self.relax_level(level, &connections, positions);
            }
        }

        self.enforce_placement(&levels, positions);
    }

    /// One damped pass over a single level
    fn relax_level<N>(
        &self,
        level: &[N],
        connections: &HashMap<N, Vec<N>>,
        positions: &mut HashMap<N, Point>,
    ) where
        N: Copy + Ord + Hash + fmt::Debug,
    {
        let min_spacing = self.min_spacing();
        let order = sorted_by_x(level, positions);
        let x_of = |positions: &HashMap<N, Point>, node: &N| positions.get(node).map(|p| p.x);

        for (i, node) in order.iter().enumerate() {
            let Some(x) = x_of(positions, node) else {
                continue;
            };

            // The leftmost node anchors the level against pressure
            let mut push = 0.0;
            if i > 0 {
                let neighbors = [order.get(i - 1), order.get(i + 1)];
                for neighbor in neighbors.into_iter().flatten() {
                    if let Some(neighbor_x) = x_of(positions, neighbor) {
                        push += pressure(x, neighbor_x, min_spacing);
                    }
                }
            }

            let pull = connections
                .get(node)
                .map_or(0.0, |connected| mean_gravity(*node, x, connected, positions));

            if let Some(pos) = positions.get_mut(node) {
                pos.x += self.damping * (push + self.gravity_weight * pull);
            }
        }
    }
}

/// Mean gravity of `node` toward the connected nodes that have a position
fn mean_gravity<N>(node: N, x: f64, connected: &[N], positions: &HashMap<N, Point>) -> f64
where
    N: Copy + Ord + Hash + fmt::Debug,
{
    let mut sum = 0.0;
    let mut count = 0;
    for other in connected {
        match positions.get(other) {
            Some(pos) => {
                sum += gravity(x, pos.x);
                count += 1;
            }
            None => trace!("{node:?} is connected to {other:?} which has no position"),
        }
    }

    if count > 0 {
        sum / count as f64
    } else {
        0.0
    }
}

/// Nodes each laid out node is pulled toward
///
/// That is its parents plus the other parents of each of its children: for a
/// union its partners, for a person its birth union and co-partners.
fn connections<G>(graph: G, levels: &Levels<G::NodeId>) -> HashMap<G::NodeId, Vec<G::NodeId>>
where
    G: IntoNeighborsDirected,
    G::NodeId: Copy + Ord + Hash,
{
    let mut connections = HashMap::new();

    for &node in levels.nodes.iter().flatten() {
        let mut connected: Vec<G::NodeId> = graph
            .neighbors_directed(node, Direction::Incoming)
            .collect();

        for child in graph.neighbors_directed(node, Direction::Outgoing) {
            connected.extend(
                graph
                    .neighbors_directed(child, Direction::Incoming)
                    .filter(|&co_parent| co_parent != node),
            );
        }

        connected.retain(|&other| other != node);
        connected.sort();
        connected.dedup();
        connections.insert(node, connected);
    }

    connections
}
