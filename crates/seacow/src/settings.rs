//! Layout parameters and their size-dependent defaults.

/// Tuning knobs for the simulation. All fields are public; the engine reads
/// them at the start of every iteration, so they can be changed between steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    /// Global repulsion strength. Larger values spread the layout out.
    pub scaling_ratio: f64,
    /// Pull towards the origin, keeping disconnected components from drifting
    /// away. The engine divides this by `scaling_ratio` before applying it.
    pub gravity: f64,
    /// Tolerated amount of node oscillation. Higher values trade precision
    /// for speed.
    pub jitter_tolerance: f64,
    /// Barnes-Hut accuracy parameter. Smaller is more precise, larger is
    /// faster.
    pub barnes_hut_theta: f64,
    /// Exponent applied to edge weights: 0 ignores weights, 1 uses them
    /// as-is.
    pub edge_weight_influence: f64,
    /// Divide attraction by source mass so hubs push their leaves outward.
    pub outbound_attraction_distribution: bool,
    /// Honor node radii: anti-collision forces plus a damped integration
    /// step.
    pub adjust_sizes: bool,
    /// Approximate repulsion through the region tree.
    pub barnes_hut_optimize: bool,
    /// Logarithmic attraction, yielding tighter clusters.
    pub lin_log_mode: bool,
    /// Distance-independent gravity.
    pub strong_gravity_mode: bool,
}

impl Settings {
    /// Defaults tuned by graph size, matching the upstream heuristics: small
    /// graphs get a larger scaling ratio so they do not collapse into a blob,
    /// and Barnes-Hut only pays off from about a thousand nodes up.
    pub fn for_node_count(node_count: usize) -> Self {
        Self {
            scaling_ratio: if node_count >= 100 { 2.0 } else { 10.0 },
            gravity: 1.0,
            jitter_tolerance: 1.0,
            barnes_hut_theta: 1.2,
            edge_weight_influence: 1.0,
            outbound_attraction_distribution: false,
            adjust_sizes: false,
            barnes_hut_optimize: node_count >= 1000,
            lin_log_mode: false,
            strong_gravity_mode: false,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::for_node_count(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_graphs_get_a_larger_scaling_ratio() {
        assert_eq!(Settings::for_node_count(99).scaling_ratio, 10.0);
        assert_eq!(Settings::for_node_count(100).scaling_ratio, 2.0);
    }

    #[test]
    fn barnes_hut_enables_at_a_thousand_nodes() {
        assert!(!Settings::for_node_count(999).barnes_hut_optimize);
        assert!(Settings::for_node_count(1000).barnes_hut_optimize);
    }
}
