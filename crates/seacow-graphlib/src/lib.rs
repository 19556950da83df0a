//! Graph model APIs used by `seacow`.
//!
//! The layout engine consumes a flat node/edge arena: nodes are addressed by a
//! stable integer index assigned at insertion, edges store endpoint indices,
//! and per-node degrees are maintained incrementally so `1 + degree` masses can
//! be refreshed cheaply on every iteration.

use rustc_hash::FxHashMap;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("edge references a missing endpoint: {id}")]
    MissingEndpoint { id: String },
}

pub type Result<T> = std::result::Result<T, Error>;

/// A layout particle. Positions and displacement accumulators are plain `f64`
/// fields; the engine's disjoint range partitioning makes synchronized
/// accumulation unnecessary.
#[derive(Debug, Clone)]
pub struct Node {
    id: String,
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
    pub old_dx: f64,
    pub old_dy: f64,
    /// Radius used by the anti-collision (`adjust_sizes`) force variants.
    pub size: f64,
    /// Refreshed to `1 + degree` by the engine at the start of every iteration.
    pub mass: f64,
    /// Fixed nodes accumulate forces but never move.
    pub fixed: bool,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            x: 0.0,
            y: 0.0,
            dx: 0.0,
            dy: 0.0,
            old_dx: 0.0,
            old_dy: 0.0,
            size: 1.0,
            mass: 1.0,
            fixed: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Edge {
    pub source: usize,
    pub target: usize,
    pub weight: f64,
}

/// Flat undirected graph: node arena + edge list + id index.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    node_index: FxHashMap<String, usize>,
    degree: Vec<usize>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a node and returns its index. Re-inserting an existing id
    /// returns the index of the existing node.
    pub fn add_node(&mut self, id: impl Into<String>) -> usize {
        let id = id.into();
        if let Some(&idx) = self.node_index.get(&id) {
            return idx;
        }
        let idx = self.nodes.len();
        self.nodes.push(Node::new(id.clone()));
        self.node_index.insert(id, idx);
        self.degree.push(0);
        idx
    }

    /// Adds an undirected edge between two existing nodes and returns its
    /// index. Negative weights are clamped to zero. A self-loop contributes 2
    /// to its node's degree.
    pub fn add_edge(&mut self, source: &str, target: &str, weight: f64) -> Result<usize> {
        let source = self.index_of(source).ok_or_else(|| Error::MissingEndpoint {
            id: source.to_string(),
        })?;
        let target = self.index_of(target).ok_or_else(|| Error::MissingEndpoint {
            id: target.to_string(),
        })?;
        Ok(self.add_edge_between(source, target, weight))
    }

    /// Index-addressed variant of [`add_edge`](Self::add_edge).
    ///
    /// # Panics
    ///
    /// Panics if either index does not come from a prior
    /// [`add_node`](Self::add_node) call on this graph.
    pub fn add_edge_between(&mut self, source: usize, target: usize, weight: f64) -> usize {
        assert!(
            source < self.nodes.len() && target < self.nodes.len(),
            "edge endpoint out of range: {source}/{target} with {} nodes",
            self.nodes.len()
        );
        let idx = self.edges.len();
        self.edges.push(Edge {
            source,
            target,
            weight: weight.max(0.0),
        });
        self.degree[source] += 1;
        self.degree[target] += 1;
        idx
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.node_index.get(id).copied()
    }

    pub fn node(&self, idx: usize) -> Option<&Node> {
        self.nodes.get(idx)
    }

    pub fn node_mut(&mut self, idx: usize) -> Option<&mut Node> {
        self.nodes.get_mut(idx)
    }

    pub fn node_id(&self, idx: usize) -> Option<&str> {
        self.nodes.get(idx).map(Node::id)
    }

    pub fn node_by_id(&self, id: &str) -> Option<&Node> {
        self.index_of(id).and_then(|idx| self.nodes.get(idx))
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn degree(&self, idx: usize) -> usize {
        self.degree.get(idx).copied().unwrap_or(0)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
