use crate::FamilyDetection;
use indexmap::IndexSet;
use serde::Serialize;

/// How the renderer paints a member given the active families
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum NodeFill {
    /// Member of exactly one active family
    Solid(String),
    /// Member of several active families, colors in membership order
    Gradient(Vec<String>),
    /// Member of no active family, drawn faded
    Dimmed,
}

/// Fill of `member` when only the `active` families are shown
pub fn node_fill(member: &str, detection: &FamilyDetection, active: &IndexSet<String>) -> NodeFill {
    let mut colors: Vec<String> = detection
        .families_of(member)
        .iter()
        .filter(|id| active.contains(*id))
        .filter_map(|id| detection.family_colors.get(id))
        .cloned()
        .collect();

    match colors.len() {
        0 => NodeFill::Dimmed,
        1 => NodeFill::Solid(colors.swap_remove(0)),
        _ => NodeFill::Gradient(colors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{default_active_families, detect_families};
    use indexmap::IndexMap;
    use kinfold_graph::Person;

    fn detection() -> FamilyDetection {
        let members: IndexMap<String, Person> = ["y", "b", "a", "c", "d"]
            .into_iter()
            .map(|id| (id.to_string(), Person::named(id.to_uppercase())))
            .collect();
        let edges: Vec<(String, String)> = [
            ("y", "u_y"),
            ("u_y", "b"),
            ("a", "u_a"),
            ("u_a", "c"),
            ("b", "u_bc"),
            ("c", "u_bc"),
            ("u_bc", "d"),
        ]
        .into_iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect();
        detect_families(&members, &edges, None)
    }

    #[test]
    fn fills_follow_active_families() {
        let detection = detection();
        let all = default_active_families(&detection.families, &detection.member_to_families, None);
        let only_a = IndexSet::from(["family_a".to_string()]);
        let color_y = detection.family_colors["family_y"].clone();
        let color_a = detection.family_colors["family_a"].clone();

        assert_eq!(node_fill("y", &detection, &all), NodeFill::Solid(color_y.clone()));
        assert_eq!(
            node_fill("d", &detection, &all),
            NodeFill::Gradient(vec![color_y, color_a.clone()])
        );
        assert_eq!(node_fill("d", &detection, &only_a), NodeFill::Solid(color_a));
        assert_eq!(node_fill("y", &detection, &only_a), NodeFill::Dimmed);
    }

    #[test]
    fn unknown_member_is_dimmed() {
        let detection = detection();
        let all = default_active_families(&detection.families, &detection.member_to_families, None);
        assert_eq!(node_fill("ghost", &detection, &all), NodeFill::Dimmed);
    }
}
