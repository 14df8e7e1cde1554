//! In-memory triangle collection with simple mesh statistics.

use std::collections::HashMap;

use bifilar_math::{Point3, Tolerance, Triangle};
use serde::Serialize;

use crate::error::Result;
use crate::sink::TriangleSink;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    /// Minimum corner.
    pub min: [f64; 3],
    /// Maximum corner.
    pub max: [f64; 3],
}

impl Bounds {
    fn from_point(p: &Point3) -> Self {
        Self {
            min: [p.x, p.y, p.z],
            max: [p.x, p.y, p.z],
        }
    }

    fn include(&mut self, p: &Point3) {
        for (i, v) in [p.x, p.y, p.z].into_iter().enumerate() {
            self.min[i] = self.min[i].min(v);
            self.max[i] = self.max[i].max(v);
        }
    }

    /// Edge lengths along X, Y and Z.
    pub fn size(&self) -> [f64; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }
}

/// Summary of a triangle collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshStats {
    /// Number of triangles.
    pub triangles: usize,
    /// Number of degenerate (zero-normal) triangles.
    pub degenerate: usize,
    /// Total surface area in mm².
    pub area: f64,
    /// Number of unmatched edges after welding.
    pub open_edges: usize,
    /// Bounding box, absent for an empty mesh.
    pub bounds: Option<Bounds>,
}

/// A [`TriangleSink`] that keeps everything in memory.
#[derive(Debug, Clone, Default)]
pub struct MeshBuffer {
    triangles: Vec<Triangle>,
}

impl MeshBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of triangles.
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// True when no triangle has been written.
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Borrow the collected triangles.
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Bounding box of every vertex.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut points = self.triangles.iter().flat_map(|t| t.vertices.iter());
        let first = points.next()?;
        let mut b = Bounds::from_point(first);
        for p in points {
            b.include(p);
        }
        Some(b)
    }

    /// Total surface area.
    pub fn area(&self) -> f64 {
        self.triangles.iter().map(Triangle::area).sum()
    }

    /// Edges not matched by an oppositely directed twin.
    ///
    /// Vertices are welded on the [`Tolerance::DEFAULT`] lattice. An edge used
    /// `n` times one way and `m` times the other is reported `|n - m|` times,
    /// in its more frequent direction, so a closed and consistently oriented
    /// surface has none.
    pub fn open_edges(&self) -> Vec<(Point3, Point3)> {
        let tol = Tolerance::DEFAULT;
        let mut corners: HashMap<[i64; 3], Point3> = HashMap::new();
        let mut edges: HashMap<([i64; 3], [i64; 3]), usize> = HashMap::new();
        for t in &self.triangles {
            let keys = t.vertices.map(|v| tol.weld_key(&v));
            for (key, v) in keys.iter().zip(&t.vertices) {
                corners.entry(*key).or_insert(*v);
            }
            for i in 0..3 {
                let (a, b) = (keys[i], keys[(i + 1) % 3]);
                if a != b {
                    *edges.entry((a, b)).or_default() += 1;
                }
            }
        }

        let mut open = Vec::new();
        for (&(a, b), &n) in &edges {
            let m = edges.get(&(b, a)).copied().unwrap_or(0);
            if n > m {
                let edge = (corners[&a], corners[&b]);
                open.extend(std::iter::repeat(edge).take(n - m));
            }
        }
        open
    }

    /// Number of [`open_edges`](Self::open_edges).
    pub fn open_edge_count(&self) -> usize {
        self.open_edges().len()
    }

    /// Gather all statistics in one pass over the public accessors.
    pub fn stats(&self) -> MeshStats {
        MeshStats {
            triangles: self.len(),
            degenerate: self.triangles.iter().filter(|t| t.is_degenerate()).count(),
            area: self.area(),
            open_edges: self.open_edge_count(),
            bounds: self.bounds(),
        }
    }
}

impl From<Vec<Triangle>> for MeshBuffer {
    fn from(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }
}

impl TriangleSink for MeshBuffer {
    fn write_triangle(&mut self, tri: &Triangle) -> Result<()> {
        self.triangles.push(*tri);
        Ok(())
    }
}
