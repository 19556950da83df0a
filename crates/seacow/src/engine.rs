//! The layout engine: iteration pipeline, worker dispatch and integration.

use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::breakdown::ForceBreakdown;
use crate::error::{Error, Result};
use crate::forces::{Attraction, Body, Gravity, Repulsion, RepulsionForce};
use crate::init::{PositionInitializer, RandomPositionInitializer};
use crate::region::Region;
use crate::settings::Settings;
use crate::speed::{SpeedState, Totals};
use crate::worker;
use seacow_graphlib::Graph;

/// Extra force applied after attraction, before speed adaptation. The hook
/// receives the graph and the per-node displacement buffer for the current
/// iteration and may add to any entry.
pub trait CustomForce: Send {
    fn apply(&mut self, graph: &Graph, displacement: &mut [(f64, f64)]);
}

/// ForceAtlas2 layout engine.
///
/// Typical lifecycle: [`attach`](Self::attach) a graph,
/// [`initialize`](Self::initialize), call [`step_once`](Self::step_once) until
/// satisfied, then [`shutdown`](Self::shutdown) and read positions back from
/// the graph. Each engine value is independent; two engines never share
/// state.
pub struct ForceAtlas2 {
    graph: Option<Graph>,
    settings: Settings,
    speed: SpeedState,
    thread_count: usize,
    pool: Option<rayon::ThreadPool>,
    outbound_att_compensation: f64,
    position_initializer: Option<Box<dyn PositionInitializer>>,
    repulsion_provider: Option<Arc<dyn RepulsionForce>>,
    custom_force: Option<Box<dyn CustomForce>>,
    breakdown: Vec<ForceBreakdown>,
    bodies: Vec<Body>,
    disp: Vec<(f64, f64)>,
}

impl Default for ForceAtlas2 {
    fn default() -> Self {
        Self::new()
    }
}

impl ForceAtlas2 {
    pub fn new() -> Self {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self {
            graph: None,
            settings: Settings::default(),
            speed: SpeedState::new(),
            thread_count: (cores.saturating_sub(1)).clamp(1, 4),
            pool: None,
            outbound_att_compensation: 1.0,
            position_initializer: Some(Box::new(RandomPositionInitializer::default())),
            repulsion_provider: None,
            custom_force: None,
            breakdown: Vec::new(),
            bodies: Vec::new(),
            disp: Vec::new(),
        }
    }

    /// Attaches a graph and resets the settings to the size-tuned defaults
    /// for it. Positions already stored on the nodes are kept until
    /// [`initialize`](Self::initialize) runs the position initializer.
    pub fn attach(&mut self, graph: Graph) {
        self.settings = Settings::for_node_count(graph.node_count());
        self.graph = Some(graph);
    }

    /// Takes the graph back out of the engine.
    pub fn detach(&mut self) -> Option<Graph> {
        self.breakdown.clear();
        self.graph.take()
    }

    pub fn graph(&self) -> Option<&Graph> {
        self.graph.as_ref()
    }

    pub fn graph_mut(&mut self) -> Option<&mut Graph> {
        self.graph.as_mut()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn speed(&self) -> f64 {
        self.speed.speed
    }

    pub fn speed_efficiency(&self) -> f64 {
        self.speed.efficiency
    }

    /// Per-node force decomposition from the last completed iteration,
    /// indexed by node index. Empty before the first step and after
    /// [`shutdown`](Self::shutdown).
    pub fn breakdown(&self) -> &[ForceBreakdown] {
        &self.breakdown
    }

    /// Replaces the worker pool size. Takes effect on the next step.
    pub fn set_thread_count(&mut self, thread_count: usize) {
        self.thread_count = thread_count.max(1);
        self.pool = None;
    }

    pub fn thread_count(&self) -> usize {
        self.thread_count
    }

    /// Replaces the position initializer. Pass `None` to keep whatever
    /// positions the graph already carries.
    pub fn set_position_initializer(
        &mut self,
        initializer: Option<Box<dyn PositionInitializer>>,
    ) {
        self.position_initializer = initializer;
    }

    /// Installs a repulsion kernel that replaces the built-in variants.
    pub fn set_repulsion_provider(&mut self, provider: Option<Arc<dyn RepulsionForce>>) {
        self.repulsion_provider = provider;
    }

    /// Installs a force hook that runs after attraction each iteration.
    pub fn set_custom_force(&mut self, force: Option<Box<dyn CustomForce>>) {
        self.custom_force = force;
    }

    /// True iff a graph is attached. Stepping also needs the worker pool,
    /// but [`step_once`](Self::step_once) rebuilds a dropped pool on its own.
    pub fn is_ready(&self) -> bool {
        self.graph.is_some()
    }

    /// Prepares the attached graph for stepping: runs the position
    /// initializer, refreshes masses, zeroes displacement history, resets the
    /// speed controller and builds the worker pool.
    pub fn initialize(&mut self) -> Result<()> {
        let graph = self.graph.as_mut().ok_or(Error::MissingGraph)?;
        if let Some(init) = self.position_initializer.as_mut() {
            init.initialize(graph);
        }
        for i in 0..graph.node_count() {
            let degree = graph.degree(i);
            if let Some(node) = graph.node_mut(i) {
                node.mass = 1.0 + degree as f64;
                node.dx = 0.0;
                node.dy = 0.0;
                node.old_dx = 0.0;
                node.old_dy = 0.0;
            }
        }
        self.speed = SpeedState::new();
        self.outbound_att_compensation = 1.0;
        self.breakdown.clear();
        if self.pool.is_none() {
            self.pool = Some(build_pool(self.thread_count)?);
        }
        debug!(
            nodes = self.graph.as_ref().map(Graph::node_count).unwrap_or(0),
            threads = self.thread_count,
            "layout initialized"
        );
        Ok(())
    }

    /// Runs one full iteration: snapshot, optional region tree, parallel
    /// repulsion + gravity, attraction, custom force, speed adaptation and
    /// integration.
    pub fn step_once(&mut self) -> Result<()> {
        if self.graph.is_none() {
            return Err(Error::MissingGraph);
        }
        if self.pool.is_none() {
            // Stepping after shutdown: bring the pool back.
            self.pool = Some(build_pool(self.thread_count)?);
        }
        let timing = std::env::var("SEACOW_TIMING").ok().as_deref() == Some("1");
        let step_start = Instant::now();

        let Self {
            graph,
            settings,
            speed,
            thread_count,
            pool,
            outbound_att_compensation,
            repulsion_provider,
            custom_force,
            breakdown,
            bodies,
            disp,
            ..
        } = self;
        let (Some(graph), Some(pool)) = (graph.as_mut(), pool.as_ref()) else {
            return Err(Error::MissingGraph);
        };
        let settings = *settings;

        let n = graph.node_count();
        breakdown.resize(n, ForceBreakdown::default());
        if n == 0 {
            return Ok(());
        }

        // Shift displacement history and refresh masses from current degrees.
        for i in 0..n {
            let degree = graph.degree(i);
            if let Some(node) = graph.node_mut(i) {
                node.old_dx = node.dx;
                node.old_dy = node.dy;
                node.dx = 0.0;
                node.dy = 0.0;
                node.mass = 1.0 + degree as f64;
            }
        }

        // Read-only snapshot shared by the region tree and all workers.
        bodies.clear();
        bodies.extend(graph.nodes().iter().map(|node| Body {
            x: node.x,
            y: node.y,
            size: node.size,
            mass: node.mass,
        }));

        let tree_start = Instant::now();
        let region = settings
            .barnes_hut_optimize
            .then(|| Region::build(bodies));
        if timing {
            eprintln!(
                "seacow timing: region tree {} us",
                tree_start.elapsed().as_micros()
            );
        }

        *outbound_att_compensation = if settings.outbound_attraction_distribution {
            bodies.iter().map(|b| b.mass).sum::<f64>() / n as f64
        } else {
            1.0
        };

        let repulsion = Repulsion::select(
            settings.adjust_sizes,
            settings.scaling_ratio,
            repulsion_provider.as_ref(),
        );
        let gravity = if settings.strong_gravity_mode {
            Gravity::Strong {
                coefficient: settings.scaling_ratio,
            }
        } else {
            Gravity::Decaying {
                coefficient: settings.scaling_ratio,
            }
        };
        let g = settings.gravity / settings.scaling_ratio;
        let theta = settings.barnes_hut_theta;

        disp.clear();
        disp.resize(n, (0.0, 0.0));

        // Each task owns a disjoint node range and the matching slice of the
        // displacement buffer.
        let task_count = (8 * *thread_count).max(1);
        let ranges = worker::partition(n, task_count);
        let mut tasks: Vec<(usize, &mut [(f64, f64)])> = Vec::with_capacity(ranges.len());
        let mut rest: &mut [(f64, f64)] = disp.as_mut_slice();
        for &(from, to) in &ranges {
            let (head, tail) = rest.split_at_mut(to - from);
            tasks.push((from, head));
            rest = tail;
        }
        debug_assert!(rest.is_empty());

        let repulsion_start = Instant::now();
        {
            let bodies: &[Body] = bodies;
            let region = region.as_ref();
            let repulsion = &repulsion;
            pool.install(|| {
                tasks.into_par_iter().try_for_each(|(from, out)| {
                    worker::apply_range(from, out, bodies, region, repulsion, gravity, theta, g)
                })
            })?;
        }
        if timing {
            eprintln!(
                "seacow timing: repulsion + gravity {} us",
                repulsion_start.elapsed().as_micros()
            );
        }

        for (slot, &(dx, dy)) in breakdown.iter_mut().zip(disp.iter()) {
            slot.repulsion = (dx, dy);
            slot.attraction = (0.0, 0.0);
            slot.custom = (0.0, 0.0);
            slot.applied = (0.0, 0.0);
        }

        // Attraction is sequential over the edge list. Applying the delta to
        // the source and its negation to the target keeps the pass symmetric.
        let attraction = Attraction::select(
            settings.lin_log_mode,
            settings.outbound_attraction_distribution,
            settings.adjust_sizes,
            *outbound_att_compensation,
        );
        let influence = settings.edge_weight_influence;
        for edge in graph.edges() {
            let weight = if influence == 0.0 {
                1.0
            } else if influence == 1.0 {
                edge.weight
            } else {
                edge.weight.powf(influence)
            };
            let (dx, dy) = attraction.apply(&bodies[edge.source], &bodies[edge.target], weight);
            disp[edge.source].0 += dx;
            disp[edge.source].1 += dy;
            disp[edge.target].0 -= dx;
            disp[edge.target].1 -= dy;
        }
        for (i, slot) in breakdown.iter_mut().enumerate() {
            slot.attraction = (disp[i].0 - slot.repulsion.0, disp[i].1 - slot.repulsion.1);
        }

        if let Some(force) = custom_force.as_mut() {
            let before: Vec<(f64, f64)> = disp.clone();
            force.apply(graph, disp);
            for (i, slot) in breakdown.iter_mut().enumerate() {
                slot.custom = (disp[i].0 - before[i].0, disp[i].1 - before[i].1);
            }
        }

        for (i, &(dx, dy)) in disp.iter().enumerate() {
            if let Some(node) = graph.node_mut(i) {
                node.dx = dx;
                node.dy = dy;
            }
        }

        // Swinging measures disagreement with the previous iteration's force,
        // traction measures agreement. Fixed nodes contribute to neither.
        let mut totals = Totals::default();
        for node in graph.nodes() {
            if node.fixed {
                continue;
            }
            let swing_x = node.old_dx - node.dx;
            let swing_y = node.old_dy - node.dy;
            totals.swinging += node.mass * (swing_x * swing_x + swing_y * swing_y).sqrt();
            let tract_x = node.old_dx + node.dx;
            let tract_y = node.old_dy + node.dy;
            totals.traction += 0.5 * node.mass * (tract_x * tract_x + tract_y * tract_y).sqrt();
        }
        speed.update(n, totals, settings.jitter_tolerance);

        // Integration. Per-node damping grows with that node's own swinging,
        // so oscillating nodes are slowed down individually.
        for (i, node) in graph.nodes_mut().iter_mut().enumerate() {
            let slot = &mut breakdown[i];
            if node.fixed {
                slot.x = node.x;
                slot.y = node.y;
                continue;
            }
            let swing_x = node.old_dx - node.dx;
            let swing_y = node.old_dy - node.dy;
            let swinging = node.mass * (swing_x * swing_x + swing_y * swing_y).sqrt();
            let factor = if settings.adjust_sizes {
                let df = (node.dx * node.dx + node.dy * node.dy).sqrt();
                if df > 0.0 {
                    (0.1 * speed.speed / (1.0 + (speed.speed * swinging).sqrt()) * df).min(10.0)
                        / df
                } else {
                    0.0
                }
            } else {
                speed.speed / (1.0 + (speed.speed * swinging).sqrt())
            };
            let applied = (node.dx * factor, node.dy * factor);
            node.x += applied.0;
            node.y += applied.1;
            slot.applied = applied;
            slot.x = node.x;
            slot.y = node.y;
        }

        trace!(
            speed = speed.speed,
            efficiency = speed.efficiency,
            swinging = totals.swinging,
            traction = totals.traction,
            "iteration complete"
        );
        if timing {
            eprintln!(
                "seacow timing: step {} us",
                step_start.elapsed().as_micros()
            );
        }
        Ok(())
    }

    /// Releases the worker pool and the per-iteration buffers. The graph and
    /// node positions are kept; stepping again rebuilds the pool. Calling
    /// this twice is harmless.
    pub fn shutdown(&mut self) {
        self.pool = None;
        self.breakdown.clear();
        self.bodies.clear();
        self.disp.clear();
    }
}

fn build_pool(thread_count: usize) -> Result<rayon::ThreadPool> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(thread_count)
        .thread_name(|i| format!("seacow-worker-{i}"))
        .build()?;
    Ok(pool)
}
