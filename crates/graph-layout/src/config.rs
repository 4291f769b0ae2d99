use crate::Vec2;
use serde::{Deserialize, Serialize};

/// Tunable parameters of the level relaxation
///
/// Every field has a default, so a partial config file only overrides what
/// it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelaxationConfig {
    /// Visual footprint `[width, height]` of every node
    pub footprint: Vec2,

    /// Extra horizontal gap added on top of the footprint width
    pub margin: f64,

    /// Number of relaxation passes per level
    pub passes: usize,

    /// Fraction of the combined force applied on each update, in (0, 1]
    pub damping: f64,

    /// Weight of the gravity pull relative to the pressure push
    pub gravity_weight: f64,
}

impl Default for RelaxationConfig {
    fn default() -> Self {
        Self {
            footprint: Vec2::new(100.0, 100.0),
            margin: 0.0,
            passes: 8,
            damping: 0.5,
            gravity_weight: 0.5,
        }
    }
}

/// Parameters of the generation seeding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Vertical distance between two consecutive generations
    pub level_gap: f64,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self { level_gap: 150.0 }
    }
}
