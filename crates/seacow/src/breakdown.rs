//! Per-node force decomposition, recorded each iteration for inspection.

/// Force components accumulated for one node during the last iteration,
/// indexed by node index in [`ForceAtlas2::breakdown`].
///
/// `applied` is the displacement actually added to the position after speed
/// adaptation; for fixed nodes it stays zero even though the component fields
/// are populated.
///
/// [`ForceAtlas2::breakdown`]: crate::engine::ForceAtlas2::breakdown
#[derive(Debug, Clone, Copy, Default)]
pub struct ForceBreakdown {
    /// Position at the end of the iteration.
    pub x: f64,
    pub y: f64,
    /// Repulsion plus gravity, as computed by the parallel phase.
    pub repulsion: (f64, f64),
    pub attraction: (f64, f64),
    /// Contribution of the user-installed custom force, if any.
    pub custom: (f64, f64),
    pub applied: (f64, f64),
}
