/// All pipeline parameters in one struct, passed explicitly into every
/// stage (no global argument state).
#[derive(Debug, Clone)]
pub struct DotConfig {
    /// Dot radius, in em units.
    pub radius: f64,
    /// Dot spacing, as a multiple of the radius.
    pub spacing: f64,
    /// Lower clamp for the estimated stroke width.
    pub min_stroke_width: f64,
    /// Upper clamp for the estimated stroke width.
    pub max_stroke_width: f64,
    /// Fudge multiplier added to the raw width estimate. The
    /// 2·area/perimeter formula systematically underestimates the width
    /// of curved strokes; +5% compensates.
    pub width_fudge: f64,
    /// Maximum angle change (degrees) between consecutive flattened
    /// segments of a Bezier when no explicit segment length is given.
    pub angle_tolerance_deg: f64,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            radius: 12.0,
            spacing: 6.0,
            min_stroke_width: 1.0,
            max_stroke_width: 1e100,
            width_fudge: 0.05,
            angle_tolerance_deg: 3.0,
        }
    }
}
