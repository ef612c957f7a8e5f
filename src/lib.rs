//! dotfont: solid font glyphs → dotted glyphs.
//!
//! Replaces each glyph's solid strokes with evenly spaced dots along the
//! stroke's medial-axis skeleton. Per glyph the pipeline is:
//!
//! 1. flatten each contour coarsely (Bezier → polyline),
//! 2. resolve contour nesting (which contours are holes of which),
//! 3. estimate the stroke width from area/perimeter and re-flatten at
//!    width resolution,
//! 4. constrained Delaunay triangulation of each ink polygon with its
//!    holes,
//! 5. drop triangle edges lying on the outline,
//! 6. reconstruct the skeleton from the surviving edge midpoints,
//! 7. place dots along the skeleton at regular arc-length intervals.
//!
//! # Example
//!
//! ```no_run
//! use dotfont::{dot_glyph, ControlPoint, DotConfig};
//!
//! let square = vec![
//!     ControlPoint::new(0.0, 0.0, true),
//!     ControlPoint::new(20.0, 0.0, true),
//!     ControlPoint::new(20.0, 100.0, true),
//!     ControlPoint::new(0.0, 100.0, true),
//! ];
//! let result = dot_glyph(&[square], &DotConfig::default())?;
//! // result.dots holds the dot centers.
//! # Ok::<(), dotfont::DotError>(())
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod dots;
pub mod error;
pub mod filter;
pub mod flatten;
pub mod geom;
pub mod nesting;
pub mod skeleton;
pub mod triangulate;
pub mod ufo;
pub mod width;

// Re-export kurbo so downstream users get the same Point as GlyphDots.
pub use kurbo;

pub use config::DotConfig;
pub use error::DotError;
pub use flatten::ControlPoint;
pub use skeleton::SkeletonWarning;

use kurbo::Point;

/// A contour skipped during glyph processing, with the reason.
#[derive(Debug)]
pub struct SkippedContour {
    /// Index of the contour within the glyph.
    pub contour: usize,
    pub reason: DotError,
}

/// The result of dotting one glyph.
#[derive(Debug)]
pub struct GlyphDots {
    /// Dot centers, concatenated across all ink polygons.
    pub dots: Vec<Point>,
    /// Contours that could not be processed; the rest of the glyph
    /// continued without them.
    pub skipped: Vec<SkippedContour>,
    /// Non-fatal skeleton problems, surfaced rather than hidden.
    pub warnings: Vec<SkeletonWarning>,
}

/// Run the full pipeline on one glyph's contours.
///
/// Degenerate contours are skipped and reported in the result; a
/// triangulation failure aborts the whole glyph.
pub fn dot_glyph(
    contours: &[Vec<ControlPoint>],
    config: &DotConfig,
) -> Result<GlyphDots, DotError> {
    let mut skipped = Vec::new();

    // First pass: coarse flattening, just enough to estimate widths and
    // resolve nesting.
    let mut coarse: Vec<(Vec<Point>, usize)> = Vec::new();
    for (i, contour) in contours.iter().enumerate() {
        match flatten::flatten_contour(contour, None, config.angle_tolerance_deg) {
            Ok(outline) if outline.len() >= 3 => coarse.push((outline, i)),
            Ok(outline) => skipped.push(SkippedContour {
                contour: i,
                reason: DotError::DegenerateContour {
                    points: outline.len(),
                },
            }),
            Err(reason) => skipped.push(SkippedContour { contour: i, reason }),
        }
    }

    let nesting = nesting::resolve(coarse);

    let mut all_dots = Vec::new();
    let mut warnings = Vec::new();
    for idx in nesting.ink_polygons() {
        let record = &nesting.records[idx];
        let hole_records: Vec<&nesting::PolygonRecord> = record
            .immediate_children
            .iter()
            .map(|&c| &nesting.records[c])
            .collect();

        // Stroke width from the coarse outlines, then the precise second
        // flattening pass at width resolution.
        let hole_outlines: Vec<&[Point]> = hole_records
            .iter()
            .map(|r| r.outline.as_slice())
            .collect();
        let stroke_width = width::estimate(&record.outline, &hole_outlines, config);

        let outer = flatten::flatten_contour(
            &contours[record.contour],
            Some(stroke_width),
            config.angle_tolerance_deg,
        )?;
        let holes: Vec<Vec<Point>> = hole_records
            .iter()
            .map(|r| {
                flatten::flatten_contour(
                    &contours[r.contour],
                    Some(stroke_width),
                    config.angle_tolerance_deg,
                )
            })
            .collect::<Result<_, _>>()?;

        let triangles = triangulate::triangulate(&outer, &holes)?;

        let mut outlines: Vec<&[Point]> = vec![&outer];
        outlines.extend(holes.iter().map(|h| h.as_slice()));
        let edge_groups = filter::surviving_edges(&triangles, &outlines);
        let midpoint_groups = filter::edge_midpoints(&edge_groups);

        let skeleton = skeleton::build(&midpoint_groups);
        warnings.extend(skeleton.warnings);
        all_dots.extend(dots::place(&skeleton.lines, config.radius, config.spacing));
    }

    Ok(GlyphDots {
        dots: all_dots,
        skipped,
        warnings,
    })
}
