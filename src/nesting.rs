//! Contour nesting: which flattened contours lie inside which.
//!
//! A glyph may have nested counters (the hole of "o", a solid dot inside
//! that hole, ...). Every ordered pair of polygons is containment-tested;
//! the derived forest is stored as indices into a flat arena, so there are
//! no ownership cycles. Even levels are solid ink, odd levels are the
//! holes of the level above them.

use geo::{Contains, LineString, Polygon};
use kurbo::Point;

/// One polygon in the nesting arena. Adjacency is by arena index.
#[derive(Debug, Clone)]
pub struct PolygonRecord {
    /// Flattened outline, first point not repeated.
    pub outline: Vec<Point>,
    /// Index of the source control-point contour in the glyph.
    pub contour: usize,
    /// All polygons containing this one.
    pub parents: Vec<usize>,
    /// All polygons contained in this one.
    pub children: Vec<usize>,
    /// Nesting depth: the number of parents.
    pub level: usize,
    /// The parent one level up, if any. When several qualify the first
    /// one found in iteration order wins.
    pub immediate_parent: Option<usize>,
    /// Children exactly one level down: this polygon's direct holes.
    pub immediate_children: Vec<usize>,
}

/// The containment forest for one glyph's contours.
#[derive(Debug, Clone)]
pub struct Nesting {
    pub records: Vec<PolygonRecord>,
    /// Arena indices grouped by level, 0..=max_level.
    pub levels: Vec<Vec<usize>>,
}

impl Nesting {
    /// Indices of the solid-ink polygons (even levels), outermost first.
    pub fn ink_polygons(&self) -> impl Iterator<Item = usize> + '_ {
        self.levels
            .iter()
            .step_by(2)
            .flat_map(|level| level.iter().copied())
    }
}

/// Build the containment forest for a set of flattened outlines.
///
/// Containment is O(N²) pairwise testing; glyph contour counts are small.
/// Self-intersecting or degenerate outlines are undefined behavior here,
/// matching the underlying polygon predicates.
pub fn resolve(outlines: Vec<(Vec<Point>, usize)>) -> Nesting {
    let mut records: Vec<PolygonRecord> = outlines
        .into_iter()
        .map(|(outline, contour)| PolygonRecord {
            outline,
            contour,
            parents: Vec::new(),
            children: Vec::new(),
            level: 0,
            immediate_parent: None,
            immediate_children: Vec::new(),
        })
        .collect();

    let polygons: Vec<Polygon<f64>> = records
        .iter()
        .map(|r| to_geo_polygon(&r.outline, &[]))
        .collect();

    for a in 0..records.len() {
        for b in 0..records.len() {
            if a != b && polygons[b].contains(&polygons[a]) {
                records[a].parents.push(b);
                records[b].children.push(a);
            }
        }
    }

    let mut max_level = 0;
    for record in &mut records {
        record.level = record.parents.len();
        max_level = max_level.max(record.level);
    }

    let mut levels = vec![Vec::new(); max_level + 1];
    for (i, record) in records.iter().enumerate() {
        levels[record.level].push(i);
    }

    for i in 0..records.len() {
        let level = records[i].level;
        let immediate_parent = records[i]
            .parents
            .iter()
            .copied()
            .find(|&p| level > 0 && records[p].level == level - 1);
        let immediate_children: Vec<usize> = records[i]
            .children
            .iter()
            .copied()
            .filter(|&c| records[c].level == level + 1)
            .collect();
        records[i].immediate_parent = immediate_parent;
        records[i].immediate_children = immediate_children;
    }

    Nesting { records, levels }
}

/// Build a geo polygon-with-holes from kurbo point lists. geo closes
/// rings implicitly.
pub fn to_geo_polygon(outline: &[Point], holes: &[&[Point]]) -> Polygon<f64> {
    let ring = |points: &[Point]| -> LineString<f64> {
        points.iter().map(|p| (p.x, p.y)).collect()
    };
    Polygon::new(ring(outline), holes.iter().map(|h| ring(h)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(cx: f64, cy: f64, side: f64) -> Vec<Point> {
        let h = side / 2.0;
        vec![
            Point::new(cx - h, cy - h),
            Point::new(cx + h, cy - h),
            Point::new(cx + h, cy + h),
            Point::new(cx - h, cy + h),
        ]
    }

    #[test]
    fn concentric_squares_nest_by_level() {
        // Outer square, middle hole, inner solid: sides 10, 6, 2.
        let nesting = resolve(vec![
            (square(0.0, 0.0, 10.0), 0),
            (square(0.0, 0.0, 6.0), 1),
            (square(0.0, 0.0, 2.0), 2),
        ]);

        assert_eq!(nesting.records[0].level, 0);
        assert_eq!(nesting.records[1].level, 1);
        assert_eq!(nesting.records[2].level, 2);
        assert_eq!(nesting.records[1].immediate_parent, Some(0));
        assert_eq!(nesting.records[2].immediate_parent, Some(1));
        assert_eq!(nesting.records[0].immediate_children, vec![1]);
        assert_eq!(nesting.records[1].immediate_children, vec![2]);
        assert!(nesting.records[2].immediate_children.is_empty());
    }

    #[test]
    fn ink_polygons_are_even_levels() {
        let nesting = resolve(vec![
            (square(0.0, 0.0, 10.0), 0),
            (square(0.0, 0.0, 6.0), 1),
            (square(0.0, 0.0, 2.0), 2),
        ]);
        let ink: Vec<usize> = nesting.ink_polygons().collect();
        assert_eq!(ink, vec![0, 2]);
    }

    #[test]
    fn disjoint_polygons_are_both_roots() {
        let nesting = resolve(vec![
            (square(0.0, 0.0, 4.0), 0),
            (square(100.0, 0.0, 4.0), 1),
        ]);
        assert_eq!(nesting.levels.len(), 1);
        assert_eq!(nesting.levels[0], vec![0, 1]);
        assert!(nesting.records[0].immediate_parent.is_none());
        assert!(nesting.records[1].immediate_parent.is_none());
    }
}
