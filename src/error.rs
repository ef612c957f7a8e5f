use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while dotting a glyph.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DotError {
    /// The contour has too few points to flatten. Per-contour: the rest
    /// of the glyph continues.
    #[error("contour has {points} points, need at least 2")]
    DegenerateContour { points: usize },

    /// A non-positive subdivision count was requested. This is a caller
    /// bug, not an input problem, and should not be caught-and-continued.
    #[error("cannot subdivide a segment into {0} pieces")]
    InvalidSubdivision(i64),

    /// The triangulation library rejected the polygon. Glyph-level:
    /// the whole glyph is skipped and reported.
    #[error("triangulation failed: {0}")]
    Triangulation(String),

    #[error("glyph not found: {0}")]
    GlyphNotFound(String),

    #[error("glyph processing timed out after {0:?}")]
    Timeout(Duration),

    #[error("font load error: {0}")]
    FontLoad(#[from] norad::error::FontLoadError),

    #[error("font write error: {0}")]
    FontWrite(#[from] norad::error::FontWriteError),
}
