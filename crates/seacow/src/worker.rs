//! Range partitioning and the per-range repulsion + gravity pass.
//!
//! Each worker owns a disjoint node range and the matching slice of the
//! displacement buffer, so the parallel phase needs no locks. Forces are
//! one-sided: a worker computes the full force on each node in its range
//! against all other nodes (or the region tree) and writes only into its own
//! slice.

use crate::error::{Error, Result};
use crate::forces::{Body, Gravity, Repulsion};
use crate::region::Region;

/// Splits `n` nodes into `task_count` contiguous ranges, sized within one of
/// each other. Range `t` covers `[n*(t-1)/T, n*t/T)`.
pub(crate) fn partition(n: usize, task_count: usize) -> Vec<(usize, usize)> {
    (1..=task_count)
        .map(|t| (n * (t - 1) / task_count, n * t / task_count))
        .collect()
}

/// Computes repulsion plus gravity for every node in `[from, from + out.len())`
/// and accumulates into `out`, which the caller has carved out of the shared
/// displacement buffer.
#[allow(clippy::too_many_arguments)]
pub(crate) fn apply_range(
    from: usize,
    out: &mut [(f64, f64)],
    bodies: &[Body],
    region: Option<&Region>,
    repulsion: &Repulsion,
    gravity: Gravity,
    theta: f64,
    g: f64,
) -> Result<()> {
    for (offset, slot) in out.iter_mut().enumerate() {
        let i = from + offset;
        let a = &bodies[i];
        let (mut fx, mut fy) = match region {
            Some(tree) => tree.apply_force(i, bodies, repulsion, theta),
            None => {
                let mut fx = 0.0;
                let mut fy = 0.0;
                for (j, b) in bodies.iter().enumerate() {
                    if j != i {
                        let (bx, by) = repulsion.between(a, b);
                        fx += bx;
                        fy += by;
                    }
                }
                (fx, fy)
            }
        };
        let (gx, gy) = gravity.apply(a, g);
        fx += gx;
        fy += gy;
        if !fx.is_finite() || !fy.is_finite() {
            return Err(Error::Worker {
                from,
                to: from + out.len(),
                node: i,
            });
        }
        slot.0 += fx;
        slot.1 += fy;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_covers_all_nodes_without_gaps_or_overlap() {
        for n in [0, 1, 7, 100, 1013] {
            for tasks in [1, 3, 8, 32] {
                let ranges = partition(n, tasks);
                assert_eq!(ranges.len(), tasks);
                let mut expected_start = 0;
                for &(from, to) in &ranges {
                    assert_eq!(from, expected_start);
                    assert!(to >= from);
                    expected_start = to;
                }
                assert_eq!(expected_start, n);
            }
        }
    }

    #[test]
    fn partition_ranges_differ_in_size_by_at_most_one() {
        let ranges = partition(10, 4);
        let sizes: Vec<usize> = ranges.iter().map(|&(f, t)| t - f).collect();
        let min = *sizes.iter().min().unwrap();
        let max = *sizes.iter().max().unwrap();
        assert!(max - min <= 1, "sizes {sizes:?}");
    }

    #[test]
    fn non_finite_force_reports_the_offending_node() {
        let bodies = vec![
            Body {
                x: 0.0,
                y: 0.0,
                size: 1.0,
                mass: 1.0,
            },
            Body {
                x: 1.0,
                y: 0.0,
                size: 1.0,
                mass: f64::INFINITY,
            },
        ];
        let mut out = vec![(0.0, 0.0); 2];
        let err = apply_range(
            0,
            &mut out,
            &bodies,
            None,
            &Repulsion::Standard { coefficient: 1.0 },
            Gravity::Decaying { coefficient: 1.0 },
            1.2,
            1.0,
        )
        .unwrap_err();
        match err {
            Error::Worker { from, to, node } => {
                assert_eq!((from, to), (0, 2));
                assert_eq!(node, 0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
