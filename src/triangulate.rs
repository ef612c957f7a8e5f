//! Constrained Delaunay triangulation of the stroke polygon.
//!
//! Thin adapter over spade. The outer outline and each hole become
//! constraint rings; spade triangulates the convex hull, so faces whose
//! centroid falls outside the polygon-with-holes are discarded on the
//! way out. Everything past this boundary works with plain triangles.

use geo::Contains;
use kurbo::Point;
use spade::{ConstrainedDelaunayTriangulation, Point2, Triangulation};

use crate::error::DotError;
use crate::geom::{self, EPSILON};
use crate::nesting;

/// A triangle of the tessellation, by value. Consumed immediately by the
/// edge filter; no persistent identity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
}

impl Triangle {
    pub fn edges(&self) -> [[Point; 2]; 3] {
        [[self.p0, self.p1], [self.p1, self.p2], [self.p2, self.p0]]
    }

    pub fn center(&self) -> Point {
        geom::centroid(&[self.p0, self.p1, self.p2])
    }
}

/// Tessellate an outer polyline with holes into triangles, honoring all
/// boundary edges as constraints.
///
/// Rings are taken open (a duplicate closing point is stripped). A
/// polygon the library cannot constrain (self-intersecting input,
/// rings collapsing to fewer than three points) fails with
/// [`DotError::Triangulation`]; there is no local recovery.
pub fn triangulate(outer: &[Point], holes: &[Vec<Point>]) -> Result<Vec<Triangle>, DotError> {
    let mut cdt: ConstrainedDelaunayTriangulation<Point2<f64>> =
        ConstrainedDelaunayTriangulation::new();

    add_constraint_ring(&mut cdt, outer)?;
    for hole in holes {
        add_constraint_ring(&mut cdt, hole)?;
    }

    let hole_slices: Vec<&[Point]> = holes.iter().map(|h| h.as_slice()).collect();
    let region = nesting::to_geo_polygon(outer, &hole_slices);

    let triangles: Vec<Triangle> = cdt
        .inner_faces()
        .map(|face| {
            let [a, b, c] = face.positions();
            Triangle {
                p0: Point::new(a.x, a.y),
                p1: Point::new(b.x, b.y),
                p2: Point::new(c.x, c.y),
            }
        })
        .filter(|t| {
            let c = t.center();
            region.contains(&geo::Point::new(c.x, c.y))
        })
        .collect();

    if triangles.is_empty() {
        return Err(DotError::Triangulation(
            "no interior triangles produced".into(),
        ));
    }
    Ok(triangles)
}

fn add_constraint_ring(
    cdt: &mut ConstrainedDelaunayTriangulation<Point2<f64>>,
    ring: &[Point],
) -> Result<(), DotError> {
    let ring = open_ring(ring);
    if ring.len() < 3 {
        return Err(DotError::Triangulation(format!(
            "ring collapsed to {} points",
            ring.len()
        )));
    }

    let mut handles = Vec::with_capacity(ring.len());
    for p in &ring {
        let handle = cdt
            .insert(Point2::new(p.x, p.y))
            .map_err(|e| DotError::Triangulation(e.to_string()))?;
        handles.push(handle);
    }

    for i in 0..handles.len() {
        let (from, to) = (handles[i], handles[(i + 1) % handles.len()]);
        if from == to {
            continue;
        }
        if !cdt.can_add_constraint(from, to) {
            return Err(DotError::Triangulation(
                "constraint edge crosses an existing constraint".into(),
            ));
        }
        cdt.add_constraint(from, to);
    }
    Ok(())
}

/// Strip the duplicate closing point and consecutive near-duplicates.
fn open_ring(ring: &[Point]) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(ring.len());
    for &p in ring {
        if out
            .last()
            .is_some_and(|&last| geom::points_equal(last, p, EPSILON))
        {
            continue;
        }
        out.push(p);
    }
    while out.len() > 1 && geom::points_equal(out[0], out[out.len() - 1], EPSILON) {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rectangle(w: f64, h: f64) -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(w, 0.0),
            Point::new(w, h),
            Point::new(0.0, h),
        ]
    }

    #[test]
    fn rectangle_triangulates() {
        let triangles = triangulate(&rectangle(20.0, 100.0), &[]).unwrap();
        assert!(!triangles.is_empty());
        // Triangle areas must add up to the rectangle area.
        let total: f64 = triangles
            .iter()
            .map(|t| {
                let (a, b, c) = (t.p0, t.p1, t.p2);
                ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)).abs() / 2.0
            })
            .sum();
        assert!((total - 2000.0).abs() < 1e-6);
    }

    #[test]
    fn hole_is_respected() {
        let outer = rectangle(100.0, 100.0);
        let hole = vec![
            Point::new(40.0, 40.0),
            Point::new(60.0, 40.0),
            Point::new(60.0, 60.0),
            Point::new(40.0, 60.0),
        ];
        let triangles = triangulate(&outer, &[hole]).unwrap();
        // No triangle centroid may land inside the hole.
        for t in &triangles {
            let c = t.center();
            assert!(
                !(c.x > 40.0 && c.x < 60.0 && c.y > 40.0 && c.y < 60.0),
                "triangle centroid {:?} inside hole",
                c
            );
        }
    }

    #[test]
    fn duplicate_closing_point_is_stripped() {
        let mut ring = rectangle(10.0, 10.0);
        ring.push(ring[0]);
        let triangles = triangulate(&ring, &[]).unwrap();
        assert!(!triangles.is_empty());
    }

    #[test]
    fn collapsed_ring_fails() {
        let ring = vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
        assert!(matches!(
            triangulate(&ring, &[]),
            Err(DotError::Triangulation(_))
        ));
    }
}
