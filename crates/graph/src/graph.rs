use crate::{is_union_id, GraphData, Node, NodeKind, Person};
use graph_layout::{GenerationSeed, Point, Relaxation, SeedError};
use indexmap::IndexMap;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised while building a [`FamilyGraph`]
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("node {0:?} already exists")]
    DuplicateId(String),

    #[error("person id {0:?} uses the reserved union prefix")]
    ReservedPrefix(String),

    #[error("union id {0:?} lacks the union prefix")]
    MissingUnionPrefix(String),

    #[error("edge {from:?} -> {to:?} references unknown node {missing:?}")]
    UnknownNode {
        from: String,
        to: String,
        missing: String,
    },

    /// Only person -> union and union -> person edges exist
    #[error("edge {from:?} -> {to:?} must link a person and a union")]
    InvalidEdgeShape { from: String, to: String },

    #[error("union {0:?} already has two partners")]
    TooManyPartners(String),

    #[error("graph contains a cycle through {0:?}")]
    Cycle(String),
}

/// Genealogical DAG of people and unions
///
/// Nodes live in a petgraph [`DiGraph`] and are addressed by their string id
/// through an index map, so parents and children are both navigable without
/// any node owning another. Insertion order is preserved everywhere.
#[derive(Debug, Clone, Default)]
pub struct FamilyGraph {
    graph: DiGraph<Node, ()>,
    index: HashMap<String, NodeIndex>,
    edges: Vec<(String, String)>,
    start: Option<String>,
}

impl FamilyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from flat records, skipping the ones that don't fit
    ///
    /// User-entered trees are often incomplete, so invalid records are logged
    /// and dropped instead of failing the whole load.
    pub fn from_data(data: GraphData) -> Self {
        let mut graph = Self::new();

        for record in data.people {
            let Ok(index) = graph
                .add_person(record.id, record.person)
                .inspect_err(|e| warn!("Skipping person: {e}"))
            else {
                continue;
            };
            if let Some((x, y)) = record.position {
                graph.graph[index].x = x;
                graph.graph[index].y = y;
            }
        }

        for record in data.unions {
            let Ok(index) = graph
                .add_union(record.id)
                .inspect_err(|e| warn!("Skipping union: {e}"))
            else {
                continue;
            };
            if let Some((x, y)) = record.position {
                graph.graph[index].x = x;
                graph.graph[index].y = y;
            }
        }

        for (from, to) in &data.edges {
            let _ = graph
                .add_edge(from, to)
                .inspect_err(|e| warn!("Skipping edge: {e}"));
        }

        match data.start {
            Some(start) if graph.contains(&start) => graph.set_start(start),
            Some(start) => warn!("Start person {start:?} is not in the graph"),
            None => {}
        }

        debug!(
            "Loaded {} nodes and {} edges",
            graph.len(),
            graph.edges.len()
        );
        graph
    }

    /// Add a person, the id must not carry the union prefix
    pub fn add_person(
        &mut self,
        id: impl Into<String>,
        person: Person,
    ) -> Result<NodeIndex, GraphError> {
        let id = id.into();
        if is_union_id(&id) {
            return Err(GraphError::ReservedPrefix(id));
        }
        self.insert(id, NodeKind::Person(person))
    }

    /// Add a union, the id must carry the union prefix
    pub fn add_union(&mut self, id: impl Into<String>) -> Result<NodeIndex, GraphError> {
        let id = id.into();
        if !is_union_id(&id) {
            return Err(GraphError::MissingUnionPrefix(id));
        }
        self.insert(id, NodeKind::Union)
    }

    fn insert(&mut self, id: String, kind: NodeKind) -> Result<NodeIndex, GraphError> {
        if self.index.contains_key(&id) {
            return Err(GraphError::DuplicateId(id));
        }
        let index = self.graph.add_node(Node {
            id: id.clone(),
            kind,
            x: 0.0,
            y: 0.0,
        });
        self.index.insert(id, index);
        Ok(index)
    }

    /// Link `from` to `to`
    ///
    /// Adding an edge that already exists is a no-op.
    pub fn add_edge(&mut self, from: &str, to: &str) -> Result<(), GraphError> {
        let lookup = |missing: &str| {
            self.index
                .get(missing)
                .copied()
                .ok_or_else(|| GraphError::UnknownNode {
                    from: from.to_string(),
                    to: to.to_string(),
                    missing: missing.to_string(),
                })
        };
        let source = lookup(from)?;
        let target = lookup(to)?;

        let source_is_union = self.graph[source].is_union();
        if source_is_union == self.graph[target].is_union() {
            return Err(GraphError::InvalidEdgeShape {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        if self.graph.contains_edge(source, target) {
            return Ok(());
        }

        if !source_is_union
            && self
                .graph
                .neighbors_directed(target, Direction::Incoming)
                .count()
                >= 2
        {
            return Err(GraphError::TooManyPartners(to.to_string()));
        }

        self.graph.add_edge(source, target, ());
        self.edges.push((from.to_string(), to.to_string()));
        Ok(())
    }

    /// Designate the entry person of the tree
    pub fn set_start(&mut self, id: impl Into<String>) {
        self.start = Some(id.into());
    }

    pub fn start(&self) -> Option<&str> {
        self.start.as_deref()
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    /// All nodes, in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index_of(id).map(|index| &self.graph[index])
    }

    /// Nodes with an edge into `id`, in insertion order
    pub fn parents(&self, id: &str) -> Vec<&Node> {
        self.neighbors(id, Direction::Incoming)
    }

    /// Nodes `id` has an edge into, in insertion order
    pub fn children(&self, id: &str) -> Vec<&Node> {
        self.neighbors(id, Direction::Outgoing)
    }

    /// The (at most two) people of a union
    pub fn partners(&self, union: &str) -> Vec<&Node> {
        if !is_union_id(union) {
            return Vec::new();
        }
        self.parents(union)
    }

    /// Unions a person is a partner in
    pub fn unions_of(&self, person: &str) -> Vec<&Node> {
        self.children(person)
            .into_iter()
            .filter(|node| node.is_union())
            .collect()
    }

    /// Other children of the unions `person` was born from
    pub fn siblings(&self, person: &str) -> Vec<&Node> {
        let mut siblings: Vec<&Node> = Vec::new();
        for union in self.parents(person) {
            for child in self.children(&union.id) {
                if child.id != person && !siblings.iter().any(|s| s.id == child.id) {
                    siblings.push(child);
                }
            }
        }
        siblings
    }

    fn neighbors(&self, id: &str, direction: Direction) -> Vec<&Node> {
        let Some(index) = self.index_of(id) else {
            return Vec::new();
        };
        let mut neighbors: Vec<NodeIndex> =
            self.graph.neighbors_directed(index, direction).collect();
        neighbors.sort();
        neighbors.dedup();
        neighbors.into_iter().map(|n| &self.graph[n]).collect()
    }

    /// Every person keyed by id, in insertion order
    pub fn people(&self) -> IndexMap<String, Person> {
        self.graph
            .node_weights()
            .filter_map(|node| node.person().map(|person| (node.id.clone(), person.clone())))
            .collect()
    }

    /// Every accepted edge as `(from, to)`, in insertion order
    pub fn edges(&self) -> &[(String, String)] {
        &self.edges
    }

    /// Underlying petgraph, for algorithms working on visitor traits
    pub fn petgraph(&self) -> &DiGraph<Node, ()> {
        &self.graph
    }

    /// Current position of every node
    pub fn positions(&self) -> HashMap<NodeIndex, Point> {
        self.graph
            .node_indices()
            .map(|index| {
                let node = &self.graph[index];
                (index, Point::new(node.x, node.y))
            })
            .collect()
    }

    /// Write positions back into the nodes, unknown indices are ignored
    pub fn apply_positions(&mut self, positions: &HashMap<NodeIndex, Point>) {
        for (&index, pos) in positions {
            if let Some(node) = self.graph.node_weight_mut(index) {
                node.x = pos.x;
                node.y = pos.y;
            }
        }
    }

    /// Replace every position with a fresh generation seeding
    ///
    /// # Errors
    /// Returns an error if the graph contains a cycle, positions are left
    /// untouched in that case
    pub fn seed(&mut self, seed: &GenerationSeed, min_spacing: f64) -> Result<(), GraphError> {
        let positions = seed.seed(&self.graph, min_spacing).map_err(|e| match e {
            SeedError::GraphHasCycle(index) => GraphError::Cycle(self.graph[index].id.clone()),
        })?;
        self.apply_positions(&positions);
        Ok(())
    }

    /// Relax the horizontal position of every node in place
    pub fn relax(&mut self, relaxation: &Relaxation) {
        let mut positions = self.positions();
        relaxation.run(&self.graph, &mut positions);
        self.apply_positions(&positions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PersonRecord, UnionRecord};
    use graph_layout::Vec2;
    use test_log::test;

    /// ann + bob -> u_ab -> {cat, dan}; cat + eve -> u_ce -> fay
    fn sample() -> FamilyGraph {
        let mut graph = FamilyGraph::new();
        graph.add_person("ann", Person::named("Ann Smith").with_surname("Smith")).unwrap();
        graph.add_person("bob", Person::named("Bob Smith").with_surname("Smith")).unwrap();
        graph.add_union("u_ab").unwrap();
        graph.add_person("cat", Person::named("Cat Smith")).unwrap();
        graph.add_person("dan", Person::named("Dan Smith")).unwrap();
        graph.add_person("eve", Person::named("Eve Jones").spouse()).unwrap();
        graph.add_union("u_ce").unwrap();
        graph.add_person("fay", Person::named("Fay Smith")).unwrap();
        for (from, to) in [
            ("ann", "u_ab"),
            ("bob", "u_ab"),
            ("u_ab", "cat"),
            ("u_ab", "dan"),
            ("cat", "u_ce"),
            ("eve", "u_ce"),
            ("u_ce", "fay"),
        ] {
            graph.add_edge(from, to).unwrap();
        }
        graph.set_start("ann");
        graph
    }

    fn ids(nodes: Vec<&Node>) -> Vec<&str> {
        nodes.into_iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn navigates_both_directions() {
        let graph = sample();

        assert_eq!(ids(graph.parents("cat")), vec!["u_ab"]);
        assert_eq!(ids(graph.children("u_ab")), vec!["cat", "dan"]);
        assert_eq!(ids(graph.partners("u_ce")), vec!["cat", "eve"]);
        assert_eq!(ids(graph.unions_of("cat")), vec!["u_ce"]);
        assert_eq!(ids(graph.siblings("cat")), vec!["dan"]);
        assert!(graph.parents("ann").is_empty());
    }

    #[test]
    fn unknown_ids_have_no_relations() {
        let graph = sample();
        assert!(graph.parents("nobody").is_empty());
        assert!(graph.children("nobody").is_empty());
        assert!(graph.partners("cat").is_empty());
        assert!(graph.node("nobody").is_none());
    }

    #[test]
    fn people_keep_insertion_order() {
        let graph = sample();
        let people: Vec<String> = graph.people().into_keys().collect();
        assert_eq!(people, vec!["ann", "bob", "cat", "dan", "eve", "fay"]);
        assert!(graph.people()["eve"].is_spouse);
    }

    #[test]
    fn rejects_malformed_edges() {
        let mut graph = sample();

        assert_eq!(
            graph.add_edge("ann", "bob"),
            Err(GraphError::InvalidEdgeShape {
                from: "ann".into(),
                to: "bob".into()
            })
        );
        assert!(matches!(
            graph.add_edge("ann", "ghost"),
            Err(GraphError::UnknownNode { missing, .. }) if missing == "ghost"
        ));
        assert_eq!(
            graph.add_edge("dan", "u_ab"),
            Err(GraphError::TooManyPartners("u_ab".into()))
        );
        assert_eq!(graph.edges().len(), 7);
    }

    #[test]
    fn duplicate_edges_are_ignored() {
        let mut graph = sample();
        graph.add_edge("ann", "u_ab").unwrap();
        assert_eq!(graph.edges().len(), 7);
        assert_eq!(ids(graph.partners("u_ab")), vec!["ann", "bob"]);
    }

    #[test]
    fn rejects_misnamed_nodes() {
        let mut graph = sample();
        assert_eq!(
            graph.add_person("u_x", Person::default()),
            Err(GraphError::ReservedPrefix("u_x".into()))
        );
        assert_eq!(
            graph.add_union("ab"),
            Err(GraphError::MissingUnionPrefix("ab".into()))
        );
        assert_eq!(
            graph.add_person("ann", Person::default()),
            Err(GraphError::DuplicateId("ann".into()))
        );
    }

    #[test]
    fn from_data_skips_bad_records() {
        let data = GraphData {
            people: vec![
                PersonRecord {
                    id: "ann".into(),
                    person: Person::named("Ann"),
                    position: Some((10.0, 0.0)),
                },
                PersonRecord {
                    id: "ann".into(),
                    person: Person::default(),
                    position: None,
                },
                PersonRecord {
                    id: "ben".into(),
                    person: Person::default(),
                    position: None,
                },
            ],
            unions: vec![UnionRecord {
                id: "u_a".into(),
                position: Some((10.0, 100.0)),
            }],
            edges: vec![
                ("ann".into(), "u_a".into()),
                ("u_a".into(), "ben".into()),
                ("u_a".into(), "ghost".into()),
            ],
            start: Some("ghost".into()),
        };

        let graph = FamilyGraph::from_data(data);

        assert_eq!(graph.len(), 3);
        assert_eq!(graph.edges().len(), 2);
        assert_eq!(graph.start(), None);
        assert_eq!(graph.node("u_a").map(|n| n.y), Some(100.0));
        let ann = graph.node("ann").and_then(Node::person);
        assert_eq!(ann.and_then(|p| p.name.as_deref()), Some("Ann"));
    }

    #[test]
    fn parses_ron_data() {
        let data: GraphData = ron::from_str(
            r#"(
                people: [
                    (id: "ann", person: (name: Some("Ann"), is_spouse: false)),
                    (id: "ben"),
                ],
                unions: [(id: "u_a")],
                edges: [("ann", "u_a"), ("u_a", "ben")],
                start: Some("ann"),
            )"#,
        )
        .unwrap();

        let graph = FamilyGraph::from_data(data);
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.start(), Some("ann"));
        assert_eq!(ids(graph.children("u_a")), vec!["ben"]);
    }

    #[test]
    fn seed_then_relax_separates_partners() {
        let mut graph = sample();
        let relaxation = Relaxation::new(Vec2::new(80.0, 40.0)).unwrap();

        graph.seed(&GenerationSeed::new(100.0), relaxation.min_spacing()).unwrap();
        graph.relax(&relaxation);

        let cat = graph.node("cat").unwrap();
        let eve = graph.node("eve").unwrap();
        assert_eq!(cat.y, eve.y);
        assert!((cat.x - eve.x).abs() >= 80.0 - 1e-2);
        let dan = graph.node("dan").unwrap();
        assert!((cat.x - dan.x).abs() >= 80.0 - 1e-2);
    }

    #[test]
    fn relax_keeps_payload() {
        let mut graph = sample();
        let before = graph.people();
        graph.relax(&Relaxation::new(Vec2::new(50.0, 50.0)).unwrap());
        assert_eq!(graph.people(), before);
    }
}
