//! Pairwise forces between two horizontal coordinates.

/// Signed overlap correction of `node_x` against a same-level neighbor
///
/// Negative pushes the node left (neighbor on its right), positive pushes it
/// right (neighbor on its left). Exactly `0.0` once the centers are at least
/// `min_spacing` apart. Coincident centers count as a right neighbor.
pub fn pressure(node_x: f64, neighbor_x: f64, min_spacing: f64) -> f64 {
    let gap = (neighbor_x - node_x).abs();
    if gap >= min_spacing {
        return 0.0;
    }

    let overlap = min_spacing - gap;
    if neighbor_x >= node_x {
        -overlap
    } else {
        overlap
    }
}

/// Pull of `node_x` toward a structurally connected node
pub fn gravity(node_x: f64, neighbor_x: f64) -> f64 {
    neighbor_x - node_x
}
