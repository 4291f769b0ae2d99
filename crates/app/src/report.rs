use indexmap::IndexSet;
use kinfold_families::{node_fill, Family, FamilyDetection, NodeFill};
use kinfold_graph::FamilyGraph;
use serde::Serialize;

/// What the renderer needs for one node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeReport {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub is_union: bool,
    pub families: Vec<String>,
    /// Unions take the look of their partners and have no fill of their own
    pub fill: Option<NodeFill>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutReport {
    pub nodes: Vec<NodeReport>,
    pub families: Vec<Family>,
    pub active: Vec<String>,
}

pub fn build_report(
    graph: &FamilyGraph,
    detection: &FamilyDetection,
    active: &IndexSet<String>,
) -> LayoutReport {
    let nodes = graph
        .nodes()
        .map(|node| NodeReport {
            id: node.id.clone(),
            x: node.x,
            y: node.y,
            is_union: node.is_union(),
            families: detection.families_of(&node.id).to_vec(),
            fill: (!node.is_union()).then(|| node_fill(&node.id, detection, active)),
        })
        .collect();

    LayoutReport {
        nodes,
        families: detection.families.clone(),
        active: active.iter().cloned().collect(),
    }
}
