//! Adaptive global speed controller.
//!
//! Tracks two aggregates over the non-fixed nodes: swinging (mass-weighted
//! disagreement between the previous and current force) and traction
//! (mass-weighted agreement). Their ratio drives the global speed so the
//! layout accelerates when forces are consistent and brakes when nodes
//! oscillate.

pub(crate) const MIN_SPEED_EFFICIENCY: f64 = 0.05;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Totals {
    pub swinging: f64,
    pub traction: f64,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct SpeedState {
    pub speed: f64,
    pub efficiency: f64,
}

impl SpeedState {
    pub(crate) fn new() -> Self {
        Self {
            speed: 1.0,
            efficiency: 1.0,
        }
    }

    /// One controller update. Speed never changes by more than half its
    /// current value in either direction, and efficiency never drops below
    /// [`MIN_SPEED_EFFICIENCY`].
    pub(crate) fn update(&mut self, node_count: usize, totals: Totals, jitter_tolerance: f64) {
        if totals.swinging <= 0.0 || totals.traction <= 0.0 || node_count == 0 {
            // Degenerate iteration (all nodes fixed or no motion): keep the
            // current state rather than dividing by zero.
            return;
        }
        let n = node_count as f64;

        let estimated_optimal_jt = 0.05 * n.sqrt();
        let min_jt = estimated_optimal_jt.sqrt();
        let max_jt = 10.0;
        // min_jt exceeds max_jt on huge graphs; the lower bound wins then, so
        // this cannot be f64::clamp.
        let mut jt = jitter_tolerance
            * (estimated_optimal_jt * totals.traction / (n * n))
                .min(max_jt)
                .max(min_jt);

        if totals.swinging / totals.traction > 2.0 {
            // Erratic regime: brake hard and relax the tolerance.
            self.efficiency = (self.efficiency * 0.5).max(MIN_SPEED_EFFICIENCY);
            jt = jt.max(jitter_tolerance);
        }

        let target_speed = jt * self.efficiency * totals.traction / totals.swinging;

        if totals.swinging > jt * totals.traction {
            self.efficiency = (self.efficiency * 0.7).max(MIN_SPEED_EFFICIENCY);
        } else if self.speed < 1000.0 {
            self.efficiency *= 1.3;
        }

        let max_rise = 0.5 * self.speed;
        self.speed += (target_speed - self.speed).clamp(-max_rise, max_rise);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_change_is_bounded_by_half_per_update() {
        let mut state = SpeedState::new();
        // Huge traction with tiny swinging asks for a much higher target.
        state.update(
            100,
            Totals {
                swinging: 0.001,
                traction: 1000.0,
            },
            1.0,
        );
        assert!((state.speed - 1.5).abs() < 1e-12, "speed {}", state.speed);

        let before = state.speed;
        // Heavy swinging asks for a crawl.
        state.update(
            100,
            Totals {
                swinging: 1.0e9,
                traction: 1.0,
            },
            1.0,
        );
        assert!(state.speed >= before * 0.5 - 1e-12);
    }

    #[test]
    fn efficiency_never_drops_below_the_floor() {
        let mut state = SpeedState::new();
        for _ in 0..64 {
            state.update(
                10,
                Totals {
                    swinging: 1.0e6,
                    traction: 1.0,
                },
                1.0,
            );
        }
        assert!(state.efficiency >= MIN_SPEED_EFFICIENCY);
    }

    #[test]
    fn zero_totals_leave_the_state_untouched() {
        let mut state = SpeedState::new();
        state.update(
            10,
            Totals {
                swinging: 0.0,
                traction: 0.0,
            },
            1.0,
        );
        assert_eq!(state.speed, 1.0);
        assert_eq!(state.efficiency, 1.0);
    }

    #[test]
    fn huge_node_counts_keep_the_tolerance_window_ordered() {
        // At millions of nodes sqrt(0.05 * sqrt(n)) passes 10, inverting the
        // tolerance window; the lower bound must win without panicking.
        let mut state = SpeedState::new();
        state.update(
            5_000_000,
            Totals {
                swinging: 1.0,
                traction: 1.0,
            },
            1.0,
        );
        assert!(state.speed.is_finite());
        assert!(state.speed > 0.0);
    }

    #[test]
    fn consistent_forces_raise_efficiency() {
        let mut state = SpeedState::new();
        state.update(
            100,
            Totals {
                swinging: 0.01,
                traction: 100.0,
            },
            1.0,
        );
        assert!(state.efficiency > 1.0);
    }
}
