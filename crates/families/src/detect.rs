use crate::generate_color;
use indexmap::{IndexMap, IndexSet};
use kinfold_graph::{is_union_id, FamilyGraph, Person};
use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, info, warn};

/// Name given to a family whose root has neither surname nor name
pub const UNKNOWN_FAMILY_NAME: &str = "Unknown";

/// A family rooted at a person without recorded parents
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Family {
    pub id: String,
    pub name: String,
    pub color: String,
    pub root_id: String,
    /// Descendants of the root plus everyone married to one of them
    pub member_count: usize,
}

/// Result of a family detection run
///
/// Families are listed in creation order, which is also the order of the
/// family ids in every membership list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FamilyDetection {
    pub families: Vec<Family>,
    pub member_to_families: IndexMap<String, Vec<String>>,
    pub family_colors: IndexMap<String, String>,
}

impl FamilyDetection {
    /// Ids of the families `member` belongs to, empty for unknown members
    pub fn families_of(&self, member: &str) -> &[String] {
        self.member_to_families
            .get(member)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn family(&self, id: &str) -> Option<&Family> {
        self.families.iter().find(|family| family.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }
}

/// Id of the family rooted at `root`
pub fn family_id(root: &str) -> String {
    format!("family_{root}")
}

/// Union adjacency of the members, built from the flat edge list
#[derive(Debug, Default)]
struct Unions<'a> {
    /// person -> unions they are a partner in
    partner_in: HashMap<&'a str, Vec<&'a str>>,
    /// union -> partners
    partners: HashMap<&'a str, Vec<&'a str>>,
    /// union -> children
    children: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> Unions<'a> {
    fn new(members: &IndexMap<String, Person>, edges: &'a [(String, String)]) -> Self {
        let mut unions = Self::default();

        for (from, to) in edges {
            match (is_union_id(from), is_union_id(to)) {
                (true, false) if members.contains_key(to) => {
                    push_unique(unions.children.entry(from.as_str()).or_default(), to);
                }
                (false, true) if members.contains_key(from) => {
                    push_unique(unions.partner_in.entry(from.as_str()).or_default(), to);
                    push_unique(unions.partners.entry(to.as_str()).or_default(), from);
                }
                _ => debug!("Ignoring edge {from:?} -> {to:?}"),
            }
        }

        unions
    }

    fn of(&self, person: &str) -> &[&'a str] {
        self.partner_in.get(person).map(Vec::as_slice).unwrap_or_default()
    }

    fn partners_of(&self, union: &str) -> &[&'a str] {
        self.partners.get(union).map(Vec::as_slice).unwrap_or_default()
    }

    fn children_of(&self, union: &str) -> &[&'a str] {
        self.children.get(union).map(Vec::as_slice).unwrap_or_default()
    }
}

fn push_unique<'a>(list: &mut Vec<&'a str>, item: &'a str) {
    if !list.contains(&item) {
        list.push(item);
    }
}

/// Partition the members into families
///
/// Every member without a parent who didn't marry in roots a family. A family
/// holds the descendants of its root and the partners of those descendants,
/// so partners and children of intermarriage belong to several families.
/// The traversal keeps a visited set and terminates on cyclic input.
pub fn detect_families(
    members: &IndexMap<String, Person>,
    edges: &[(String, String)],
    start: Option<&str>,
) -> FamilyDetection {
    if members.is_empty() {
        info!("No members, no families to detect");
        return FamilyDetection::default();
    }

    let unions = Unions::new(members, edges);
    let roots = find_roots(members, &unions, start);

    let mut families = Vec::with_capacity(roots.len());
    let mut member_sets = Vec::with_capacity(roots.len());

    for (index, &root) in roots.iter().enumerate() {
        let mut family_members = descendants(root, &unions);
        let spouses = spouses(&family_members, &unions);
        family_members.extend(spouses);

        families.push(Family {
            id: family_id(root),
            name: family_name(members.get(root)),
            color: generate_color(index),
            root_id: root.to_string(),
            member_count: family_members.len(),
        });
        member_sets.push(family_members);
    }

    let mut member_to_families = IndexMap::new();
    for id in members.keys() {
        let ids: Vec<String> = families
            .iter()
            .zip(&member_sets)
            .filter(|(_, set)| set.contains(id.as_str()))
            .map(|(family, _)| family.id.clone())
            .collect();
        if !ids.is_empty() {
            member_to_families.insert(id.clone(), ids);
        }
    }

    let family_colors = families
        .iter()
        .map(|family| (family.id.clone(), family.color.clone()))
        .collect();

    debug!(
        "Detected {} families over {} members",
        families.len(),
        member_to_families.len()
    );

    FamilyDetection {
        families,
        member_to_families,
        family_colors,
    }
}

/// Detect the families of a whole graph
pub fn detect_in_graph(graph: &FamilyGraph) -> FamilyDetection {
    detect_families(&graph.people(), graph.edges(), graph.start())
}

/// Members with no parent that are not flagged as spouses, in member order
///
/// Falls back to the start person (or the first member) when no member
/// qualifies: on cyclic input, or when every parentless member is a spouse.
fn find_roots<'a>(
    members: &'a IndexMap<String, Person>,
    unions: &Unions<'a>,
    start: Option<&str>,
) -> Vec<&'a str> {
    let has_parent: HashSet<&str> = unions.children.values().flatten().copied().collect();

    let roots: Vec<&str> = members
        .iter()
        .filter(|(id, person)| !has_parent.contains(id.as_str()) && !person.is_spouse)
        .map(|(id, _)| id.as_str())
        .collect();

    if !roots.is_empty() {
        return roots;
    }

    let fallback = start
        .and_then(|start| members.get_key_value(start))
        .or_else(|| members.first())
        .map(|(id, _)| id.as_str());
    warn!(
        "No root among {} members, falling back to {fallback:?}",
        members.len()
    );
    fallback.into_iter().collect()
}

/// Root and every person reachable through person -> union -> child edges
fn descendants<'a>(root: &'a str, unions: &Unions<'a>) -> IndexSet<&'a str> {
    let mut visited = IndexSet::from([root]);
    let mut queue = VecDeque::from([root]);

    while let Some(person) = queue.pop_front() {
        for union in unions.of(person) {
            for &child in unions.children_of(union) {
                if visited.insert(child) {
                    queue.push_back(child);
                }
            }
        }
    }

    visited
}

/// Partners of the given members that are not members themselves
fn spouses<'a>(members: &IndexSet<&'a str>, unions: &Unions<'a>) -> Vec<&'a str> {
    let mut spouses = Vec::new();
    for member in members {
        for union in unions.of(member) {
            for &partner in unions.partners_of(union) {
                if !members.contains(partner) && !spouses.contains(&partner) {
                    spouses.push(partner);
                }
            }
        }
    }
    spouses
}

fn family_name(root: Option<&Person>) -> String {
    fn non_empty(value: Option<&str>) -> Option<&str> {
        value.map(str::trim).filter(|v| !v.is_empty())
    }

    root.and_then(|person| {
        non_empty(person.surname.as_deref()).or_else(|| non_empty(person.name.as_deref()))
    })
    .unwrap_or(UNKNOWN_FAMILY_NAME)
    .to_string()
}

/// Families to show when nothing was selected yet
///
/// The families of the current person if they have any, every family
/// otherwise.
pub fn default_active_families(
    families: &[Family],
    member_to_families: &IndexMap<String, Vec<String>>,
    current: Option<&str>,
) -> IndexSet<String> {
    let current_families = current
        .and_then(|id| member_to_families.get(id))
        .filter(|ids| !ids.is_empty());

    match current_families {
        Some(ids) => ids.iter().cloned().collect(),
        None => families.iter().map(|family| family.id.clone()).collect(),
    }
}
