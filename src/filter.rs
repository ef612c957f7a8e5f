//! Triangle-edge filtering against the glyph outline.
//!
//! Triangulation reproduces the outline and hole boundaries as triangle
//! edges; only the interior edges support the skeleton. Each triangle
//! keeps the 0–3 of its edges that don't coincide with any outline edge,
//! and each surviving edge is then replaced by its midpoint, which is
//! the skeleton graph's vertex identity.

use std::collections::HashSet;

use kurbo::Point;

use crate::geom::{self, EdgeKey};
use crate::triangulate::Triangle;

/// Endpoint tolerance for matching a triangle edge against an outline
/// edge. Deliberately much looser than [`geom::EPSILON`]: subdivision
/// drift can move re-flattened outline points by a visible fraction of
/// a unit.
const OUTLINE_EPSILON: f64 = 1.0;

/// For each triangle, the edges that do not lie on any outline.
///
/// `outlines` holds the outer boundary and all hole boundaries as open
/// polylines; the closing segment of each is matched as well. A triangle
/// can lose all three edges at a degenerate corner; the empty group is
/// kept so downstream counts stay aligned with the triangle list.
///
/// Most triangle edges on the boundary reuse the outline's own vertices,
/// so an exact canonicalized-key lookup handles them; the loose scan only
/// runs for the misses.
pub fn surviving_edges(triangles: &[Triangle], outlines: &[&[Point]]) -> Vec<Vec<[Point; 2]>> {
    let exact: HashSet<EdgeKey> = outlines
        .iter()
        .flat_map(|o| outline_segments(o))
        .map(|s| EdgeKey::new(s[0], s[1]))
        .collect();

    triangles
        .iter()
        .map(|triangle| {
            triangle
                .edges()
                .into_iter()
                .filter(|edge| {
                    !exact.contains(&EdgeKey::new(edge[0], edge[1]))
                        && !outlines.iter().any(|o| on_outline(*edge, o))
                })
                .collect()
        })
        .collect()
}

/// Replace each surviving edge with its midpoint, keeping the per-triangle
/// grouping.
pub fn edge_midpoints(groups: &[Vec<[Point; 2]>]) -> Vec<Vec<Point>> {
    groups
        .iter()
        .map(|edges| {
            edges
                .iter()
                .map(|e| geom::midpoint(e[0], e[1]))
                .collect()
        })
        .collect()
}

/// The segments of an open polyline, closing segment included.
fn outline_segments(outline: &[Point]) -> impl Iterator<Item = [Point; 2]> + '_ {
    let closing = if outline.len() >= 2 {
        Some([outline[outline.len() - 1], outline[0]])
    } else {
        None
    };
    outline
        .windows(2)
        .map(|w| [w[0], w[1]])
        .chain(closing)
}

/// Whether an edge is almost identical to some segment of the outline,
/// in either direction.
fn on_outline(edge: [Point; 2], outline: &[Point]) -> bool {
    outline_segments(outline).any(|segment| geom::lines_equal(edge, segment, OUTLINE_EPSILON))
}
