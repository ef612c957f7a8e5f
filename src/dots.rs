//! Dot placement along skeleton polylines at regular arc-length intervals.

use geo::{EuclideanLength, LineInterpolatePoint, LineString};
use kurbo::Point;

use crate::geom::EPSILON;

/// Place dots along each skeleton polyline.
///
/// `spacing` is a multiple of `radius`; the number of dots on a line of
/// length L is `max(1, floor(L / (spacing · radius)))`, spread evenly so
/// the first dot sits at the line's start. A zero-length line still gets
/// one dot.
pub fn place(lines: &[Vec<[Point; 2]>], radius: f64, spacing: f64) -> Vec<Point> {
    let unit_spacing = spacing * radius;
    let mut dots = Vec::new();
    for line in lines {
        let points = segment_points(line);
        let Some(&first) = points.first() else {
            continue;
        };
        let path: LineString<f64> = points.iter().map(|p| (p.x, p.y)).collect();
        let length = path.euclidean_length();
        if length < EPSILON {
            dots.push(first);
            continue;
        }
        let num_dots = ((length / unit_spacing).floor()).max(1.0) as usize;
        let interval = length / num_dots as f64;
        for i in 0..num_dots {
            let fraction = (i as f64 * interval) / length;
            if let Some(dot) = path.line_interpolate_point(fraction) {
                dots.push(Point::new(dot.x(), dot.y()));
            }
        }
    }
    dots
}

/// Collapse a segment list back into the point list it traces.
fn segment_points(line: &[[Point; 2]]) -> Vec<Point> {
    let mut points: Vec<Point> = line.iter().map(|pair| pair[0]).collect();
    if let Some(last) = line.last() {
        points.push(last[1]);
    }
    points
}
