//! Horizontal layout of generation levels for genealogical DAGs
//!
//! This crate works with any graph data structure through petgraph's visitor
//! traits. Positions are kept in a `HashMap<NodeId, Point>` next to the graph:
//! `y` groups nodes into levels and `x` is what the layout computes.
//!
//! # Layout steps
//!
//! - [`GenerationSeed`]: optional initial positions when the graph comes
//!   without coordinates
//! - [`Relaxation`]: iterative pressure/gravity relaxation of every level,
//!   closed by a non-overlap sweep
//!
//! # Example
//!
//! ```
//! use graph_layout::{GenerationSeed, Relaxation, Vec2};
//! use petgraph::graphmap::DiGraphMap;
//!
//! // Two partners feeding a union with one child
//! let graph = DiGraphMap::<u32, ()>::from_edges([(1, 10), (2, 10), (10, 3)]);
//!
//! let relaxation = Relaxation::new(Vec2::new(100.0, 60.0)).unwrap();
//! let mut positions = GenerationSeed::default()
//!     .seed(&graph, relaxation.min_spacing())
//!     .unwrap();
//!
//! relaxation.run(&graph, &mut positions);
//! assert!((positions[&2].x - positions[&1].x).abs() >= 100.0);
//! ```

mod config;
mod geometry;

pub mod relax;
pub mod seed;

pub use config::{RelaxationConfig, SeedConfig};
pub use geometry::{Point, Vec2};

// Re-export petgraph visitor traits for graph abstraction
pub use petgraph::visit::{GraphBase, IntoNeighborsDirected, IntoNodeIdentifiers};
pub use petgraph::Direction;

pub use relax::{gravity, pressure, LayoutError, Levels, Relaxation};
pub use seed::{GenerationSeed, Generations, SeedError};
