//! Property-based tests for the family partition.
//!
//! 1. Every descendant of a root is a member of that root's family.
//! 2. Every family lists at least its root, and counts its members.
//! 3. Arbitrary back edges never hang the detection and still give a family.
//! 4. Detection is deterministic.

use indexmap::IndexMap;
use kinfold_families::{detect_families, family_id, generate_color, FamilyDetection};
use kinfold_graph::Person;
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

/// A random forest: person `i` is either a root or the child of an earlier
/// person, plus a few marriages between arbitrary people.
#[derive(Debug, Clone)]
struct Forest {
    parents: Vec<Option<usize>>,
    marriages: Vec<(usize, usize)>,
}

fn forest_strategy() -> impl Strategy<Value = Forest> {
    (1usize..30)
        .prop_flat_map(|len| {
            let parents = (0..len)
                .map(|i| {
                    if i == 0 {
                        Just(None).boxed()
                    } else {
                        prop::option::weighted(0.7, 0..i).boxed()
                    }
                })
                .collect::<Vec<_>>();
            let marriages = prop::collection::vec((0..len, 0..len), 0..5);
            (parents, marriages)
        })
        .prop_map(|(parents, marriages)| Forest { parents, marriages })
}

fn person_id(i: usize) -> String {
    format!("p{i}")
}

impl Forest {
    fn members(&self) -> IndexMap<String, Person> {
        (0..self.parents.len())
            .map(|i| (person_id(i), Person::named(format!("Person {i}"))))
            .collect()
    }

    fn edges(&self) -> Vec<(String, String)> {
        let mut edges = Vec::new();
        for (child, parent) in self.parents.iter().enumerate() {
            if let Some(parent) = parent {
                edges.push((person_id(*parent), format!("u_{parent}")));
                edges.push((format!("u_{parent}"), person_id(child)));
            }
        }
        for (k, &(a, b)) in self.marriages.iter().enumerate() {
            if a != b {
                edges.push((person_id(a), format!("u_m{k}")));
                edges.push((person_id(b), format!("u_m{k}")));
            }
        }
        edges
    }

    /// Does `ancestor` reach `person` by following parent links upward
    fn descends_from(&self, mut person: usize, ancestor: usize) -> bool {
        loop {
            if person == ancestor {
                return true;
            }
            match self.parents[person] {
                Some(parent) => person = parent,
                None => return false,
            }
        }
    }

    fn detect(&self) -> FamilyDetection {
        detect_families(&self.members(), &self.edges(), None)
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Completeness
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn descendants_belong_to_root_family(forest in forest_strategy()) {
        let detection = forest.detect();

        for root in (0..forest.parents.len()).filter(|&i| forest.parents[i].is_none()) {
            let family = family_id(&person_id(root));
            prop_assert!(detection.family(&family).is_some(), "missing {}", family);

            for person in 0..forest.parents.len() {
                if forest.descends_from(person, root) {
                    prop_assert!(
                        detection.families_of(&person_id(person)).contains(&family),
                        "p{} not in {}",
                        person,
                        family
                    );
                }
            }
        }
    }

    #[test]
    fn every_person_has_a_family(forest in forest_strategy()) {
        let detection = forest.detect();

        for person in 0..forest.parents.len() {
            prop_assert!(!detection.families_of(&person_id(person)).is_empty());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Family records
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn families_are_consistent(forest in forest_strategy()) {
        let detection = forest.detect();

        for (index, family) in detection.families.iter().enumerate() {
            prop_assert!(detection.families_of(&family.root_id).contains(&family.id));
            prop_assert_eq!(&family.color, &generate_color(index));
            prop_assert_eq!(detection.family_colors.get(&family.id), Some(&family.color));

            let members = detection
                .member_to_families
                .values()
                .filter(|ids| ids.contains(&family.id))
                .count();
            prop_assert_eq!(members, family.member_count);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Cycle safety
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn back_edges_terminate(
        forest in forest_strategy(),
        back_edges in prop::collection::vec((0usize..30, 0usize..30), 1..6),
    ) {
        let len = forest.parents.len();
        let mut edges = forest.edges();
        for (from, to) in back_edges {
            let (from, to) = (from % len, to % len);
            edges.push((person_id(from), format!("u_{from}")));
            edges.push((format!("u_{from}"), person_id(to)));
        }

        let detection = detect_families(&forest.members(), &edges, Some("p0"));

        prop_assert!(!detection.families.is_empty());
        prop_assert!(detection.families.iter().all(|family| family.member_count >= 1));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Determinism
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn detection_is_deterministic(forest in forest_strategy()) {
        prop_assert_eq!(forest.detect(), forest.detect());
    }
}

#[test]
fn full_cycle_still_yields_a_family() {
    let members: IndexMap<String, Person> = ["a", "b"]
        .into_iter()
        .map(|id| (id.to_string(), Person::named(id)))
        .collect();
    let edges: Vec<(String, String)> = [("a", "u_a"), ("u_a", "b"), ("b", "u_b"), ("u_b", "a")]
        .into_iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect();

    let detection = detect_families(&members, &edges, None);

    assert_eq!(detection.families.len(), 1);
    assert_eq!(detection.families[0].member_count, 2);
}
