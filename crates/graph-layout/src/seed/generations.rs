use super::SeedError;
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use petgraph::visit::{IntoNeighborsDirected, IntoNodeIdentifiers};
use petgraph::Direction;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Give every person and union a generation number
///
/// A child sits one row below the union it was born from, and a union one row
/// below its lowest partner. A married-in partner has no parents in the tree
/// and would otherwise land on row 0; it is moved down to sit just above the
/// union it joins, next to the person it married.
pub(crate) fn assign_generations<G>(
    graph: G,
) -> Result<Vec<Vec<G::NodeId>>, SeedError<G::NodeId>>
where
    G: IntoNodeIdentifiers + IntoNeighborsDirected,
    G::NodeId: Copy + Ord + Hash + fmt::Debug,
{
    let mut tree = DiGraphMap::new();
    for node in graph.node_identifiers() {
        tree.add_node(node);
    }
    for node in graph.node_identifiers() {
        for next in graph.neighbors_directed(node, Direction::Outgoing) {
            tree.add_edge(node, next, ());
        }
    }

    let order =
        toposort(&tree, None).map_err(|cycle| SeedError::GraphHasCycle(cycle.node_id()))?;
    let mut generation: HashMap<G::NodeId, usize> = HashMap::with_capacity(order.len());

    // Parents before children: each node below its deepest parent
    for &node in &order {
        let depth = tree
            .neighbors_directed(node, Direction::Incoming)
            .filter_map(|parent| generation.get(&parent).map(|g| g + 1))
            .max()
            .unwrap_or(0);
        generation.insert(node, depth);
    }

    // Children before parents: married-in partners move down to their union
    for &node in order.iter().rev() {
        let current = generation.get(&node).copied().unwrap_or(0);
        let union_row = tree
            .neighbors_directed(node, Direction::Outgoing)
            .filter_map(|next| generation.get(&next).copied())
            .min();

        if let Some(union_row) = union_row {
            if union_row > current + 1 {
                generation.insert(node, union_row - 1);
            }
        }
    }

    let depth = generation.values().max().map_or(0, |&deepest| deepest + 1);
    let mut generations = vec![Vec::new(); depth];
    for node in order {
        if let Some(&g) = generation.get(&node) {
            generations[g].push(node);
        }
    }

    Ok(generations)
}
