//! Family partition of a family graph
//!
//! [`detect_families`] groups every person into the families rooted at the
//! people without recorded parents, [`generate_color`] gives each family a
//! stable color and [`node_fill`] tells the renderer how to paint a person
//! for a given selection of families.

mod color;
mod detect;
mod highlight;

pub use color::{generate_color, GOLDEN_ANGLE, PALETTE};
pub use detect::{
    default_active_families, detect_families, detect_in_graph, family_id, Family,
    FamilyDetection, UNKNOWN_FAMILY_NAME,
};
pub use highlight::{node_fill, NodeFill};
