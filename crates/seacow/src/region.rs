//! Barnes-Hut region tree.
//!
//! The tree is rebuilt from the body snapshot at the start of each iteration
//! and is then read-only, so all repulsion workers can query it concurrently.
//! Subdivision is a quadrant split about the mass centroid rather than a
//! geometric midpoint, which keeps the tree balanced for clustered layouts.

use crate::forces::{Body, Repulsion};

/// One quadtree cell. `size` is the cell's spread: twice the largest distance
/// from the centroid to a member, which is what the `distance * theta > size`
/// acceptance test compares against.
#[derive(Debug, Clone)]
pub struct Region {
    mass: f64,
    mass_center_x: f64,
    mass_center_y: f64,
    size: f64,
    nodes: Vec<usize>,
    subregions: Vec<Region>,
}

impl Region {
    /// Builds the tree over the full body snapshot.
    pub fn build(bodies: &[Body]) -> Self {
        let nodes = (0..bodies.len()).collect();
        Self::from_nodes(nodes, bodies)
    }

    fn from_nodes(nodes: Vec<usize>, bodies: &[Body]) -> Self {
        let mut region = Self {
            mass: 0.0,
            mass_center_x: 0.0,
            mass_center_y: 0.0,
            size: 0.0,
            nodes,
            subregions: Vec::new(),
        };
        region.update_mass_and_geometry(bodies);
        region.build_sub_regions(bodies);
        region
    }

    fn update_mass_and_geometry(&mut self, bodies: &[Body]) {
        if self.nodes.len() <= 1 {
            return;
        }
        let mut mass = 0.0;
        let mut mass_sum_x = 0.0;
        let mut mass_sum_y = 0.0;
        for &i in &self.nodes {
            let b = &bodies[i];
            mass += b.mass;
            mass_sum_x += b.x * b.mass;
            mass_sum_y += b.y * b.mass;
        }
        self.mass = mass;
        self.mass_center_x = mass_sum_x / mass;
        self.mass_center_y = mass_sum_y / mass;
        let mut size = f64::MIN;
        for &i in &self.nodes {
            let b = &bodies[i];
            let distance = ((b.x - self.mass_center_x).powi(2)
                + (b.y - self.mass_center_y).powi(2))
            .sqrt();
            size = size.max(2.0 * distance);
        }
        self.size = size;
    }

    fn build_sub_regions(&mut self, bodies: &[Body]) {
        if self.nodes.len() <= 1 {
            return;
        }
        let mut left: Vec<usize> = Vec::new();
        let mut right: Vec<usize> = Vec::new();
        for &i in &self.nodes {
            if bodies[i].x < self.mass_center_x {
                left.push(i);
            } else {
                right.push(i);
            }
        }
        let split_vertical = |side: &[usize]| -> (Vec<usize>, Vec<usize>) {
            let mut top = Vec::new();
            let mut bottom = Vec::new();
            for &i in side {
                if bodies[i].y < self.mass_center_y {
                    top.push(i);
                } else {
                    bottom.push(i);
                }
            }
            (top, bottom)
        };
        let (top_left, bottom_left) = split_vertical(&left);
        let (top_right, bottom_right) = split_vertical(&right);

        for quadrant in [top_left, bottom_left, top_right, bottom_right] {
            if quadrant.is_empty() {
                continue;
            }
            if quadrant.len() < self.nodes.len() {
                self.subregions.push(Self::from_nodes(quadrant, bodies));
            } else {
                // All members share a position: give each its own leaf so
                // recursion terminates.
                for i in quadrant {
                    self.subregions.push(Self::from_nodes(vec![i], bodies));
                }
            }
        }
    }

    /// Repulsion exerted on `query` by this cell, using the pseudo-body
    /// approximation where `distance * theta > size` holds and recursing
    /// otherwise.
    pub fn apply_force(
        &self,
        query: usize,
        bodies: &[Body],
        repulsion: &Repulsion,
        theta: f64,
    ) -> (f64, f64) {
        let a = &bodies[query];
        if self.nodes.len() < 2 {
            return match self.nodes.first() {
                Some(&other) if other != query => repulsion.between(a, &bodies[other]),
                _ => (0.0, 0.0),
            };
        }
        let distance = ((a.x - self.mass_center_x).powi(2)
            + (a.y - self.mass_center_y).powi(2))
        .sqrt();
        if distance * theta > self.size {
            return repulsion.from_region(a, self.mass, self.mass_center_x, self.mass_center_y);
        }
        let mut fx = 0.0;
        let mut fy = 0.0;
        for sub in &self.subregions {
            let (sx, sy) = sub.apply_force(query, bodies, repulsion, theta);
            fx += sx;
            fy += sy;
        }
        (fx, fy)
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn mass_center(&self) -> (f64, f64) {
        (self.mass_center_x, self.mass_center_y)
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn subregions(&self) -> &[Region] {
        &self.subregions
    }
}
