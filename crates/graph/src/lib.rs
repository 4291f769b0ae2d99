//! Family graph model
//!
//! People and unions form a DAG: a person -> union edge makes the person a
//! partner of the union, a union -> person edge makes the person one of its
//! children. Union ids carry the [`UNION_PREFIX`].
//!
//! The graph only owns positions and domain attributes. Layout lives in
//! `graph-layout` and family detection in `kinfold-families`.

mod data;
mod graph;
mod node;

pub use data::{GraphData, PersonRecord, UnionRecord};
pub use graph::{FamilyGraph, GraphError};
pub use node::{is_union_id, Gender, Node, NodeKind, Person, UNION_PREFIX};

// Re-export the index type used to key positions
pub use petgraph::graph::NodeIndex;
