use serde::{Deserialize, Serialize};

/// Prefix reserved for the ids of union nodes
pub const UNION_PREFIX: &str = "u_";

/// Whether `id` names a union node
pub fn is_union_id(id: &str) -> bool {
    id.starts_with(UNION_PREFIX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Domain attributes of a person
///
/// Opaque to the layout. Only `surname`, `name` and `is_spouse` are read by
/// the family detection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Person {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub gender: Option<Gender>,
    pub birth: Option<String>,
    pub death: Option<String>,
    /// Married into the tree rather than born in it
    pub is_spouse: bool,
}

impl Person {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_surname(mut self, surname: impl Into<String>) -> Self {
        self.surname = Some(surname.into());
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    /// Flag this person as married in
    pub fn spouse(mut self) -> Self {
        self.is_spouse = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Person(Person),
    /// Synthetic pairing of up to two partners, children hang below it
    Union,
}

/// A node of the family graph with its current position
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub x: f64,
    pub y: f64,
}

impl Node {
    pub fn is_union(&self) -> bool {
        matches!(self.kind, NodeKind::Union)
    }

    pub fn person(&self) -> Option<&Person> {
        match &self.kind {
            NodeKind::Person(person) => Some(person),
            NodeKind::Union => None,
        }
    }
}
