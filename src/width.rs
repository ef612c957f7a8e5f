//! Stroke width estimation from the area/perimeter ratio.
//!
//! `2 · area / perimeter` is exact for a constant-width rectangle and a
//! usable approximation for curved strokes. The width can't be known
//! until an approximate polygon exists, so the caller flattens coarsely
//! first, estimates here, and then re-flattens at the estimated width.

use geo::{Area, EuclideanLength, Polygon};
use kurbo::Point;

use crate::config::DotConfig;
use crate::nesting;

/// Estimate the stroke width of a polygon-with-holes, with the configured
/// fudge multiplier applied and the result clamped to the configured
/// bounds.
pub fn estimate(outline: &[Point], holes: &[&[Point]], config: &DotConfig) -> f64 {
    let polygon = nesting::to_geo_polygon(outline, holes);
    let raw = raw_width(&polygon);
    let fudged = raw * (1.0 + config.width_fudge);
    fudged.clamp(config.min_stroke_width, config.max_stroke_width)
}

fn raw_width(polygon: &Polygon<f64>) -> f64 {
    let perimeter = polygon.exterior().euclidean_length()
        + polygon
            .interiors()
            .iter()
            .map(|ring| ring.euclidean_length())
            .sum::<f64>();
    if perimeter <= 0.0 {
        return 0.0;
    }
    2.0 * polygon.unsigned_area() / perimeter
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(min: f64, max: f64) -> DotConfig {
        DotConfig {
            min_stroke_width: min,
            max_stroke_width: max,
            width_fudge: 0.0,
            ..DotConfig::default()
        }
    }

    #[test]
    fn rectangle_width_is_exact_for_long_strokes() {
        // A 4 x 100 bar: 2*400/208 ≈ 3.85, slightly under the true 4.
        let outline = vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 4.0),
            Point::new(0.0, 4.0),
        ];
        let width = estimate(&outline, &[], &config(0.0, 1e100));
        assert!((width - 3.846).abs() < 0.01);
    }

    #[test]
    fn thin_polygon_clamps_to_minimum() {
        // A sliver with near-zero area.
        let outline = vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 0.001),
            Point::new(0.0, 0.001),
        ];
        let width = estimate(&outline, &[], &config(2.0, 5.0));
        assert_eq!(width, 2.0);
    }

    #[test]
    fn wide_polygon_clamps_to_maximum() {
        let outline = vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ];
        let width = estimate(&outline, &[], &config(2.0, 5.0));
        assert_eq!(width, 5.0);
    }

    #[test]
    fn holes_reduce_the_estimate() {
        let outline = vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ];
        let hole = vec![
            Point::new(20.0, 20.0),
            Point::new(80.0, 20.0),
            Point::new(80.0, 80.0),
            Point::new(20.0, 80.0),
        ];
        let solid = estimate(&outline, &[], &config(0.0, 1e100));
        let ring = estimate(&outline, &[&hole], &config(0.0, 1e100));
        assert!(ring < solid);
    }
}
