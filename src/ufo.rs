//! Font boundary: norad glyphs in, dotted norad glyphs out.
//!
//! Conversion happens immediately at this boundary: the pipeline only
//! ever sees [`ControlPoint`] contours and produces plain dot positions.

use kurbo::Point;
use norad::{Contour, ContourPoint, Glyph, PointType};

use crate::flatten::ControlPoint;

/// Circle approximation constant for cubic Beziers.
const KAPPA: f64 = 0.552_284_749_830_793_6;

/// Extract a glyph's contours as cyclic control-point sequences.
///
/// Outlines are read in the quadratic (TrueType) convention: any point
/// that isn't an off-curve control is on-curve, and consecutive
/// off-curves imply an on-curve midpoint (synthesized later by the
/// flattener).
pub fn glyph_contours(glyph: &Glyph) -> Vec<Vec<ControlPoint>> {
    glyph
        .contours
        .iter()
        .map(|contour| {
            contour
                .points
                .iter()
                .map(|p| {
                    ControlPoint::new(p.x, p.y, !matches!(p.typ, PointType::OffCurve))
                })
                .collect()
        })
        .collect()
}

/// Build the dotted replacement for a glyph: one circular contour per
/// dot, keeping the source glyph's name, advance width, codepoints and
/// anchors.
pub fn dotted_glyph(source: &Glyph, dots: &[Point], radius: f64) -> Glyph {
    let mut glyph = Glyph::new(source.name().as_str());
    glyph.width = source.width;
    glyph.height = source.height;
    glyph.codepoints = source.codepoints.clone();
    glyph.anchors = source.anchors.clone();
    for &dot in dots {
        glyph.contours.push(circle_contour(dot, radius));
    }
    glyph
}

/// A circle as four cubic Bezier segments, in UFO's cyclic point order
/// (each on-curve point preceded by its two incoming off-curves).
fn circle_contour(center: Point, radius: f64) -> Contour {
    let (cx, cy) = (center.x, center.y);
    let r = radius;
    let k = KAPPA * r;

    // On-curve points east, north, west, south; the trailing off-curve
    // pair closes the loop back to the leading east point.
    let points = vec![
        on_point(cx + r, cy),
        off_point(cx + r, cy + k),
        off_point(cx + k, cy + r),
        on_point(cx, cy + r),
        off_point(cx - k, cy + r),
        off_point(cx - r, cy + k),
        on_point(cx - r, cy),
        off_point(cx - r, cy - k),
        off_point(cx - k, cy - r),
        on_point(cx, cy - r),
        off_point(cx + k, cy - r),
        off_point(cx + r, cy - k),
    ];
    Contour::new(points, None, None)
}

fn on_point(x: f64, y: f64) -> ContourPoint {
    ContourPoint::new(x, y, PointType::Curve, true, None, None, None)
}

fn off_point(x: f64, y: f64) -> ContourPoint {
    ContourPoint::new(x, y, PointType::OffCurve, false, None, None, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_contour_per_dot() {
        let source = Glyph::new("test");
        let dots = [
            Point::new(10.0, 10.0),
            Point::new(10.0, 60.0),
            Point::new(10.0, 110.0),
        ];
        let glyph = dotted_glyph(&source, &dots, 12.0);
        assert_eq!(glyph.contours.len(), dots.len());
    }

    #[test]
    fn circle_contour_shape() {
        let contour = circle_contour(Point::new(0.0, 0.0), 10.0);
        assert_eq!(contour.points.len(), 12);
        let on_count = contour
            .points
            .iter()
            .filter(|p| matches!(p.typ, PointType::Curve))
            .count();
        assert_eq!(on_count, 4);
        // Extremes sit on the circle.
        assert!(contour
            .points
            .iter()
            .any(|p| p.x == 10.0 && p.y == 0.0));
        assert!(contour
            .points
            .iter()
            .any(|p| p.x == 0.0 && p.y == -10.0));
    }

    #[test]
    fn contours_convert_to_control_points() {
        let mut glyph = Glyph::new("square");
        glyph.contours.push(Contour::new(
            vec![
                ContourPoint::new(0.0, 0.0, PointType::Line, false, None, None, None),
                ContourPoint::new(100.0, 0.0, PointType::Line, false, None, None, None),
                ContourPoint::new(50.0, 80.0, PointType::OffCurve, false, None, None, None),
                ContourPoint::new(0.0, 100.0, PointType::QCurve, false, None, None, None),
            ],
            None,
            None,
        ));
        let contours = glyph_contours(&glyph);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].len(), 4);
        assert!(contours[0][0].on_curve);
        assert!(!contours[0][2].on_curve);
        assert!(contours[0][3].on_curve);
    }
}
