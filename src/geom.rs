//! Shared geometry utilities: epsilon comparisons, quantized hash keys,
//! midpoints and turn angles.

use kurbo::Point;

/// Tolerance for "these two flattened coordinates are the same point".
pub const EPSILON: f64 = 1e-9;

/// Quantization step for hash keys, the inverse of [`EPSILON`].
const KEY_SCALE: f64 = 1e9;

/// Compare two points within a tolerance.
pub fn points_equal(a: Point, b: Point, epsilon: f64) -> bool {
    (a.x - b.x).abs() < epsilon && (a.y - b.y).abs() < epsilon
}

/// Compare two segments within a tolerance, ignoring direction.
pub fn lines_equal(a: [Point; 2], b: [Point; 2], epsilon: f64) -> bool {
    (points_equal(a[0], b[0], epsilon) && points_equal(a[1], b[1], epsilon))
        || (points_equal(a[0], b[1], epsilon) && points_equal(a[1], b[0], epsilon))
}

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    (a - b).hypot()
}

/// Coordinate average of two points.
pub fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Coordinate average of a set of points (the centroid of a midpoint triple).
pub fn centroid(points: &[Point]) -> Point {
    let n = points.len() as f64;
    let sum = points
        .iter()
        .fold(kurbo::Vec2::ZERO, |acc, p| acc + p.to_vec2());
    Point::new(sum.x / n, sum.y / n)
}

/// Absolute turn angle (radians) at `b` when travelling `a → b → c`.
///
/// Returns 0 for collinear points and up to PI for a full reversal.
/// Degenerate (zero-length) steps count as no turn.
pub fn turn_angle(a: Point, b: Point, c: Point) -> f64 {
    let d1 = b - a;
    let d2 = c - b;
    if d1.hypot() < EPSILON || d2.hypot() < EPSILON {
        return 0.0;
    }
    let cross = d1.cross(d2);
    let dot = d1.dot(d2);
    cross.atan2(dot).abs()
}

/// A point quantized to the [`EPSILON`] grid, usable as a hash key.
///
/// Floats can't go straight into a `HashMap`; quantizing first makes
/// equality representation-independent for coordinates that agree to
/// within the exact-equality tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointKey(i64, i64);

impl From<Point> for PointKey {
    fn from(p: Point) -> Self {
        PointKey(
            (p.x * KEY_SCALE).round() as i64,
            (p.y * KEY_SCALE).round() as i64,
        )
    }
}

/// An unordered edge, canonicalized by sorting its quantized endpoints.
///
/// `EdgeKey::new(a, b)` and `EdgeKey::new(b, a)` compare equal and hash
/// identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeKey(PointKey, PointKey);

impl EdgeKey {
    pub fn new(a: Point, b: Point) -> Self {
        let (ka, kb) = (PointKey::from(a), PointKey::from(b));
        if ka <= kb {
            EdgeKey(ka, kb)
        } else {
            EdgeKey(kb, ka)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn edge_key_ignores_direction() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(3.0, 4.0);
        let forward = EdgeKey::new(a, b);
        let reverse = EdgeKey::new(b, a);
        assert_eq!(forward, reverse);
        assert_eq!(hash_of(&forward), hash_of(&reverse));
    }

    #[test]
    fn point_key_tolerates_float_noise() {
        let a = Point::new(0.1 + 0.2, 1.0);
        let b = Point::new(0.3, 1.0);
        assert_eq!(PointKey::from(a), PointKey::from(b));
    }

    #[test]
    fn lines_equal_matches_reversed() {
        let a = [Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
        let b = [Point::new(10.0, 0.3), Point::new(0.4, 0.0)];
        assert!(lines_equal(a, b, 1.0));
        assert!(!lines_equal(a, b, 0.1));
    }

    #[test]
    fn turn_angle_straight_is_zero() {
        let angle = turn_angle(
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 2.0),
        );
        assert!(angle.abs() < 1e-12);
    }

    #[test]
    fn turn_angle_right_angle() {
        let angle = turn_angle(
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
        );
        assert!((angle - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }
}
