use crate::Point;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

/// Nodes grouped by generation level
///
/// Two nodes share a level when their `y` coordinates are equal. Levels are
/// stored top to bottom, each one sorted left to right by `x` at the time of
/// grouping.
#[derive(Debug, Clone, PartialEq)]
pub struct Levels<N> {
    /// Node ids of each level
    pub nodes: Vec<Vec<N>>,
}

impl<N> Levels<N>
where
    N: Copy + Ord + Hash,
{
    /// Group `nodes` by the `y` coordinate found in `positions`
    ///
    /// Nodes without a position are left out.
    pub fn group<I>(nodes: I, positions: &HashMap<N, Point>) -> Self
    where
        I: IntoIterator<Item = N>,
    {
        // `-0.0` and `0.0` are the same row
        let mut placed: Vec<(N, Point)> = nodes
            .into_iter()
            .filter_map(|node| {
                positions
                    .get(&node)
                    .map(|&pos| (node, Point::new(pos.x, pos.y + 0.0)))
            })
            .collect();

        placed.sort_by(|(a, pa), (b, pb)| {
            pa.y.total_cmp(&pb.y)
                .then_with(|| pa.x.total_cmp(&pb.x))
                .then_with(|| a.cmp(b))
        });

        let mut levels: Vec<Vec<N>> = Vec::new();
        let mut current_y = None;
        for (node, pos) in placed {
            if current_y != Some(pos.y.to_bits()) {
                current_y = Some(pos.y.to_bits());
                levels.push(Vec::new());
            }
            if let Some(level) = levels.last_mut() {
                level.push(node);
            }
        }

        Self { nodes: levels }
    }

    /// Total number of nodes across all levels
    pub fn len(&self) -> usize {
        self.nodes.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.iter().all(Vec::is_empty)
    }
}

/// Order of a level by current `x`, ties broken by node id
pub(crate) fn sorted_by_x<N>(level: &[N], positions: &HashMap<N, Point>) -> Vec<N>
where
    N: Copy + Ord + Hash,
{
    let mut order = level.to_vec();
    order.sort_by(|a, b| {
        let xa = positions.get(a).map_or(0.0, |p| p.x);
        let xb = positions.get(b).map_or(0.0, |p| p.x);
        xa.partial_cmp(&xb)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.cmp(b))
    });
    order
}
