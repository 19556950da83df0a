//! ForceAtlas2 force-directed graph layout, ported from Gephi.
//!
//! The engine runs a continuous simulation: every iteration computes
//! repulsion (optionally Barnes-Hut approximated), gravity and attraction for
//! each node, adapts a global speed from how much the layout is oscillating,
//! and moves nodes by their damped displacement. Repulsion is parallelized
//! over disjoint node ranges on a rayon pool owned by the engine.
//!
//! ```no_run
//! use seacow::graphlib::Graph;
//!
//! let mut graph = Graph::new();
//! graph.add_node("a");
//! graph.add_node("b");
//! graph.add_edge("a", "b", 1.0)?;
//!
//! let graph = seacow::layout(graph, 100)?;
//! let a = graph.node_by_id("a").unwrap();
//! println!("a is at ({}, {})", a.x, a.y);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]

pub mod breakdown;
pub mod engine;
pub mod error;
pub mod forces;
pub mod init;
pub mod region;
pub mod settings;

mod speed;
mod worker;

pub use breakdown::ForceBreakdown;
pub use engine::{CustomForce, ForceAtlas2};
pub use error::{Error, Result};
pub use forces::{Attraction, AttractionKind, Body, Repulsion, RepulsionForce};
pub use init::{PositionInitializer, RandomPositionInitializer};
pub use region::Region;
pub use settings::Settings;

pub use seacow_graphlib as graphlib;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Runs the full lifecycle with default settings: initialize, step
/// `iterations` times, shut down, and hand the laid-out graph back.
pub fn layout(graph: graphlib::Graph, iterations: usize) -> Result<graphlib::Graph> {
    let mut engine = ForceAtlas2::new();
    engine.attach(graph);
    engine.initialize()?;
    for _ in 0..iterations {
        engine.step_once()?;
    }
    engine.shutdown();
    engine.detach().ok_or(Error::MissingGraph)
}
