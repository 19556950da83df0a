//! Force kernels: repulsion, attraction and gravity.
//!
//! Each kernel variant mirrors one of the upstream `ForceFactory` force
//! classes. Kernels are pure: they return the `(dx, dy)` delta for the query
//! node instead of mutating shared state, so the parallel phase can accumulate
//! into per-range buffers without synchronization.

use std::sync::Arc;

/// Read-only per-node snapshot taken at the start of an iteration. Shared by
/// the region tree and all repulsion workers.
#[derive(Debug, Clone, Copy)]
pub struct Body {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub mass: f64,
}

/// Pluggable repulsion kernel. Implementations must be one-sided: return the
/// force exerted on `a` only, never touch `b`.
pub trait RepulsionForce: Send + Sync {
    /// Force exerted on `a` by another node `b`.
    fn between(&self, a: &Body, b: &Body) -> (f64, f64);

    /// Force exerted on `a` by a region pseudo-body with aggregate `mass` at
    /// the mass centroid `(cx, cy)`.
    fn from_region(&self, a: &Body, mass: f64, cx: f64, cy: f64) -> (f64, f64);
}

/// Repulsion variant selected once per iteration.
#[derive(Clone)]
pub enum Repulsion {
    Standard { coefficient: f64 },
    /// Anti-collision: node radii are subtracted from the distance and
    /// overlapping nodes get a fixed separation push.
    AdjustSizes { coefficient: f64 },
    Custom(Arc<dyn RepulsionForce>),
}

impl Repulsion {
    pub(crate) fn select(
        adjust_sizes: bool,
        coefficient: f64,
        provider: Option<&Arc<dyn RepulsionForce>>,
    ) -> Self {
        if let Some(p) = provider {
            return Self::Custom(Arc::clone(p));
        }
        if adjust_sizes {
            Self::AdjustSizes { coefficient }
        } else {
            Self::Standard { coefficient }
        }
    }

    /// Force exerted on `a` by `b`.
    pub fn between(&self, a: &Body, b: &Body) -> (f64, f64) {
        let xd = a.x - b.x;
        let yd = a.y - b.y;
        match *self {
            Self::Standard { coefficient } => {
                let d2 = xd * xd + yd * yd;
                if d2 > 0.0 {
                    let factor = coefficient * a.mass * b.mass / d2;
                    (xd * factor, yd * factor)
                } else {
                    (0.0, 0.0)
                }
            }
            Self::AdjustSizes { coefficient } => {
                let distance = (xd * xd + yd * yd).sqrt() - a.size - b.size;
                if distance > 0.0 {
                    let factor = coefficient * a.mass * b.mass / distance / distance;
                    (xd * factor, yd * factor)
                } else if distance < 0.0 {
                    // Overlap: constant push, no distance term.
                    let factor = 100.0 * coefficient * a.mass * b.mass;
                    (xd * factor, yd * factor)
                } else {
                    (0.0, 0.0)
                }
            }
            Self::Custom(ref f) => f.between(a, b),
        }
    }

    /// Force exerted on `a` by a region pseudo-body. The anti-collision
    /// variant does not subtract sizes here: a region aggregate has no radius.
    pub fn from_region(&self, a: &Body, mass: f64, cx: f64, cy: f64) -> (f64, f64) {
        match *self {
            Self::Standard { coefficient } | Self::AdjustSizes { coefficient } => {
                let xd = a.x - cx;
                let yd = a.y - cy;
                let d2 = xd * xd + yd * yd;
                if d2 > 0.0 {
                    let factor = coefficient * a.mass * mass / d2;
                    (xd * factor, yd * factor)
                } else {
                    (0.0, 0.0)
                }
            }
            Self::Custom(ref f) => f.from_region(a, mass, cx, cy),
        }
    }
}

/// Gravity pull towards the origin. The decaying variant weakens with
/// distance; strong gravity pulls with a fixed-direction, distance-independent
/// magnitude.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Gravity {
    Decaying { coefficient: f64 },
    Strong { coefficient: f64 },
}

impl Gravity {
    pub(crate) fn apply(&self, a: &Body, g: f64) -> (f64, f64) {
        let distance = (a.x * a.x + a.y * a.y).sqrt();
        if distance <= 0.0 {
            return (0.0, 0.0);
        }
        let factor = match *self {
            Self::Decaying { coefficient } => coefficient * a.mass * g / distance,
            Self::Strong { coefficient } => coefficient * a.mass * g,
        };
        (-a.x * factor, -a.y * factor)
    }
}

/// Attraction variant selected once per iteration from the
/// `(lin_log, distributed, adjust_sizes)` mode flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttractionKind {
    Linear,
    LinearDistributed,
    LogLinear,
    LogLinearDistributed,
    LinearAntiCollision,
    LinearDistributedAntiCollision,
    LogLinearAntiCollision,
    LogLinearDistributedAntiCollision,
}

#[derive(Debug, Clone, Copy)]
pub struct Attraction {
    kind: AttractionKind,
    coefficient: f64,
}

impl Attraction {
    pub fn select(lin_log: bool, distributed: bool, adjust_sizes: bool, coefficient: f64) -> Self {
        use AttractionKind::*;
        let kind = match (lin_log, distributed, adjust_sizes) {
            (false, false, false) => Linear,
            (false, true, false) => LinearDistributed,
            (true, false, false) => LogLinear,
            (true, true, false) => LogLinearDistributed,
            (false, false, true) => LinearAntiCollision,
            (false, true, true) => LinearDistributedAntiCollision,
            (true, false, true) => LogLinearAntiCollision,
            (true, true, true) => LogLinearDistributedAntiCollision,
        };
        Self { kind, coefficient }
    }

    pub fn kind(&self) -> AttractionKind {
        self.kind
    }

    /// Force applied to `source`; the engine applies the negated delta to
    /// `target`. Distributed variants divide by the source mass so hubs do not
    /// pull their whole neighborhood on top of themselves.
    pub fn apply(&self, source: &Body, target: &Body, weight: f64) -> (f64, f64) {
        use AttractionKind::*;
        let xd = source.x - target.x;
        let yd = source.y - target.y;
        let c = self.coefficient;

        let factor = match self.kind {
            Linear => -c * weight,
            LinearDistributed => -c * weight / source.mass,
            LogLinear | LogLinearDistributed => {
                let distance = (xd * xd + yd * yd).sqrt();
                if distance > 0.0 {
                    let f = -c * weight * (1.0 + distance).ln() / distance;
                    if self.kind == LogLinearDistributed {
                        f / source.mass
                    } else {
                        f
                    }
                } else {
                    0.0
                }
            }
            LinearAntiCollision
            | LinearDistributedAntiCollision
            | LogLinearAntiCollision
            | LogLinearDistributedAntiCollision => {
                let distance = (xd * xd + yd * yd).sqrt() - source.size - target.size;
                if distance > 0.0 {
                    match self.kind {
                        LinearAntiCollision => -c * weight,
                        LinearDistributedAntiCollision => -c * weight / source.mass,
                        LogLinearAntiCollision => -c * weight * (1.0 + distance).ln() / distance,
                        LogLinearDistributedAntiCollision => {
                            -c * weight * (1.0 + distance).ln() / distance / source.mass
                        }
                        _ => unreachable!(),
                    }
                } else {
                    // Overlapping endpoints: no attraction.
                    0.0
                }
            }
        };

        (xd * factor, yd * factor)
    }
}
