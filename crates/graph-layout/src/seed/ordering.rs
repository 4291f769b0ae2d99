use petgraph::visit::IntoNeighborsDirected;
use petgraph::Direction;
use std::collections::HashMap;
use std::hash::Hash;

/// Order every generation by the barycenter of its predecessors' slots
///
/// Generations are processed top to bottom so each one is ordered against the
/// final arrangement of the ones above. A node without placed predecessors
/// follows the other parents of its children, just right of them. Nodes that
/// end up with no key keep to the right, ordered by id.
pub(crate) fn order_generations<G>(
    graph: G,
    mut generations: Vec<Vec<G::NodeId>>,
) -> Vec<Vec<G::NodeId>>
where
    G: IntoNeighborsDirected,
    G::NodeId: Copy + Ord + Hash,
{
    let mut slots: HashMap<G::NodeId, f64> = HashMap::new();

    for generation in generations.iter_mut() {
        let keys: HashMap<G::NodeId, f64> = generation
            .iter()
            .filter_map(|&node| {
                barycenter(graph.neighbors_directed(node, Direction::Incoming), &slots)
                    .map(|key| (node, key))
            })
            .collect();

        let mut resolved = keys.clone();
        for &node in generation.iter() {
            if keys.contains_key(&node) {
                continue;
            }
            let co_parents = graph
                .neighbors_directed(node, Direction::Outgoing)
                .flat_map(move |child| graph.neighbors_directed(child, Direction::Incoming))
                .filter(|&other| other != node);
            if let Some(key) = barycenter(co_parents, &keys) {
                resolved.insert(node, key + 0.5);
            }
        }

        generation.sort_by(|a, b| {
            let ka = resolved.get(a).copied().unwrap_or(f64::INFINITY);
            let kb = resolved.get(b).copied().unwrap_or(f64::INFINITY);
            ka.total_cmp(&kb).then_with(|| a.cmp(b))
        });

        for (slot, &node) in generation.iter().enumerate() {
            slots.insert(node, slot as f64);
        }
    }

    generations
}

/// Average key of the given nodes, ignoring the ones without a key
fn barycenter<N, I>(nodes: I, keys: &HashMap<N, f64>) -> Option<f64>
where
    N: Hash + Eq,
    I: Iterator<Item = N>,
{
    let mut sum = 0.0;
    let mut count = 0;
    for node in nodes {
        if let Some(key) = keys.get(&node) {
            sum += key;
            count += 1;
        }
    }

    (count > 0).then(|| sum / count as f64)
}
