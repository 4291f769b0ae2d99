use crate::Person;
use serde::{Deserialize, Serialize};

/// A person as handed over by the ingestion layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub id: String,
    #[serde(default)]
    pub person: Person,
    /// Initial `(x, y)`, if the producer already laid the tree out
    #[serde(default)]
    pub position: Option<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnionRecord {
    pub id: String,
    #[serde(default)]
    pub position: Option<(f64, f64)>,
}

/// Flat description of a family graph
///
/// Edges are `(from, to)` pairs, either person -> union (partner) or
/// union -> person (child).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphData {
    pub people: Vec<PersonRecord>,
    pub unions: Vec<UnionRecord>,
    pub edges: Vec<(String, String)>,
    /// Entry person of the tree
    pub start: Option<String>,
}
