//! Curve flattening: a cyclic contour of control points → a polyline.
//!
//! The contour is closed, implied on-curve midpoints between consecutive
//! off-curve points are synthesized, and each resulting line or quadratic
//! Bezier candidate is subdivided, either to a caller-specified minimum
//! segment length, or (for Beziers with no length given) until consecutive
//! segments turn by less than the angle tolerance.

use kurbo::{Line, ParamCurve, Point, QuadBez};

use crate::error::DotError;
use crate::geom::{self, EPSILON};

/// One control point of a glyph contour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPoint {
    pub x: f64,
    pub y: f64,
    pub on_curve: bool,
}

impl ControlPoint {
    pub fn new(x: f64, y: f64, on_curve: bool) -> Self {
        Self { x, y, on_curve }
    }

    pub fn pos(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Subdivision search range for the shallow-angle heuristic.
const MIN_BEZIER_STEPS: usize = 3;
const MAX_BEZIER_STEPS: usize = 25;

/// A flattening candidate: a straight segment or a quadratic Bezier.
enum Candidate {
    Line(Line),
    Quad(QuadBez),
}

impl Candidate {
    fn chord(&self) -> f64 {
        match self {
            Candidate::Line(l) => geom::distance(l.p0, l.p1),
            Candidate::Quad(q) => geom::distance(q.p0, q.p2),
        }
    }

    fn subdivide(&self, n: usize) -> Result<Vec<Point>, DotError> {
        match self {
            Candidate::Line(l) => subdivide_line(*l, n),
            Candidate::Quad(q) => subdivide_quad(*q, n),
        }
    }
}

/// Flatten a cyclic contour to a closed polyline (first point not
/// repeated at the end).
///
/// `min_segment` is the minimum length of each output segment; when
/// `None`, lines are left whole and Beziers are subdivided by the
/// shallow-angle search with `angle_tolerance_deg`.
pub fn flatten_contour(
    contour: &[ControlPoint],
    min_segment: Option<f64>,
    angle_tolerance_deg: f64,
) -> Result<Vec<Point>, DotError> {
    let closed = extrapolate_midpoints(contour)?;
    let mut out: Vec<Point> = Vec::new();
    let mut last: Option<Point> = None;

    for candidate in extract_candidates(&closed) {
        let n = match min_segment {
            Some(min) => {
                let chord = candidate.chord();
                ((chord / min).floor() as usize).max(1)
            }
            None => match &candidate {
                Candidate::Line(_) => 1,
                Candidate::Quad(q) => shallow_subdivision(*q, angle_tolerance_deg),
            },
        };
        let points = candidate.subdivide(n)?;
        // Each candidate starts where the previous one ended.
        out.extend_from_slice(&points[..points.len() - 1]);
        last = points.last().copied();
    }

    if let Some(p) = last {
        out.push(p);
    }
    // Drop the duplicate closing point.
    if out.len() >= 2 && geom::points_equal(out[0], out[out.len() - 1], EPSILON) {
        out.pop();
    }
    Ok(out)
}

/// Close the contour and synthesize the implied on-curve midpoint between
/// every pair of consecutive off-curve points.
fn extrapolate_midpoints(contour: &[ControlPoint]) -> Result<Vec<ControlPoint>, DotError> {
    if contour.len() < 2 {
        return Err(DotError::DegenerateContour {
            points: contour.len(),
        });
    }
    let mut points = contour.to_vec();
    let first = points[0];
    let last = points[points.len() - 1];
    if !geom::points_equal(first.pos(), last.pos(), EPSILON) {
        points.push(first);
    }

    let mut result = Vec::with_capacity(points.len());
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        result.push(a);
        if !a.on_curve && !b.on_curve {
            let mid = geom::midpoint(a.pos(), b.pos());
            result.push(ControlPoint::new(mid.x, mid.y, true));
        }
    }
    result.push(points[points.len() - 1]);
    Ok(result)
}

/// Partition a closed, midpoint-extrapolated point list into line and
/// Bezier candidates: `[on, on]` is a line, `[on, off, on]` a quadratic.
fn extract_candidates(points: &[ControlPoint]) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    let mut i = 0;
    while i + 1 < points.len() {
        if points[i + 1].on_curve || i + 2 >= points.len() {
            candidates.push(Candidate::Line(Line::new(
                points[i].pos(),
                points[i + 1].pos(),
            )));
            i += 1;
        } else {
            candidates.push(Candidate::Quad(QuadBez::new(
                points[i].pos(),
                points[i + 1].pos(),
                points[i + 2].pos(),
            )));
            i += 2;
        }
    }
    candidates
}

/// Evaluate a line at `n + 1` evenly spaced parameters.
fn subdivide_line(line: Line, n: usize) -> Result<Vec<Point>, DotError> {
    if n == 0 {
        return Err(DotError::InvalidSubdivision(0));
    }
    Ok((0..=n)
        .map(|i| line.eval(i as f64 / n as f64))
        .collect())
}

/// Evaluate a quadratic Bezier at `n + 1` evenly spaced parameters using
/// the exact blending formula `(1-t)²P0 + 2t(1-t)P1 + t²P2`.
fn subdivide_quad(quad: QuadBez, n: usize) -> Result<Vec<Point>, DotError> {
    if n == 0 {
        return Err(DotError::InvalidSubdivision(0));
    }
    Ok((0..=n)
        .map(|i| quad.eval(i as f64 / n as f64))
        .collect())
}

/// Find the smallest odd subdivision count (3..=25) at which every
/// consecutive point triple turns by less than the tolerance. Returns the
/// cap when no count within the range qualifies.
fn shallow_subdivision(quad: QuadBez, tolerance_deg: f64) -> usize {
    let tolerance = tolerance_deg.to_radians();
    for n in (MIN_BEZIER_STEPS..=MAX_BEZIER_STEPS).step_by(2) {
        let points: Vec<Point> = (0..=n).map(|i| quad.eval(i as f64 / n as f64)).collect();
        let shallow = points
            .windows(3)
            .all(|w| geom::turn_angle(w[0], w[1], w[2]) < tolerance);
        if shallow {
            return n;
        }
    }
    MAX_BEZIER_STEPS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on(x: f64, y: f64) -> ControlPoint {
        ControlPoint::new(x, y, true)
    }

    fn off(x: f64, y: f64) -> ControlPoint {
        ControlPoint::new(x, y, false)
    }

    #[test]
    fn line_segment_is_unchanged() {
        // Two on-curve points, no minimum length: n = 1, no subdivision.
        let contour = [on(0.0, 0.0), on(10.0, 0.0)];
        let line = flatten_contour(&contour, None, 3.0).unwrap();
        assert_eq!(line, vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
    }

    #[test]
    fn bezier_preserves_endpoints() {
        let contour = [on(0.0, 0.0), off(50.0, 100.0), on(100.0, 0.0)];
        let line = flatten_contour(&contour, None, 3.0).unwrap();
        assert_eq!(line[0], Point::new(0.0, 0.0));
        // The quad ends at P2 before the closing line returns to P0.
        assert!(line
            .iter()
            .any(|p| geom::points_equal(*p, Point::new(100.0, 0.0), 1e-9)));
    }

    #[test]
    fn consecutive_off_curve_points_get_a_midpoint() {
        let contour = [on(0.0, 0.0), off(10.0, 10.0), off(20.0, 10.0), on(30.0, 0.0)];
        let extrapolated = extrapolate_midpoints(&contour).unwrap();
        let implied = extrapolated
            .iter()
            .find(|p| p.on_curve && geom::points_equal(p.pos(), Point::new(15.0, 10.0), 1e-9));
        assert!(implied.is_some());
    }

    #[test]
    fn min_segment_subdivides_lines() {
        let contour = [on(0.0, 0.0), on(100.0, 0.0), on(100.0, 10.0), on(0.0, 10.0)];
        let line = flatten_contour(&contour, Some(25.0), 3.0).unwrap();
        // The two 100-unit edges are split into 4 segments each, the two
        // 10-unit edges stay whole: 4 + 1 + 4 + 1 segments = 10 points.
        assert_eq!(line.len(), 10);
    }

    #[test]
    fn too_few_points_is_degenerate() {
        let contour = [on(0.0, 0.0)];
        let result = flatten_contour(&contour, None, 3.0);
        assert!(matches!(
            result,
            Err(DotError::DegenerateContour { points: 1 })
        ));
    }

    #[test]
    fn zero_subdivision_is_rejected() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(1.0, 0.0));
        assert!(matches!(
            subdivide_line(line, 0),
            Err(DotError::InvalidSubdivision(0))
        ));
    }

    #[test]
    fn shallow_search_flattens_a_deep_curve() {
        // A strongly curved quad needs more than the minimum step count.
        let quad = QuadBez::new(
            Point::new(0.0, 0.0),
            Point::new(50.0, 200.0),
            Point::new(100.0, 0.0),
        );
        let n = shallow_subdivision(quad, 3.0);
        assert!(n > MIN_BEZIER_STEPS);
        assert!(n <= MAX_BEZIER_STEPS);
    }
}
