//! Medial-axis reconstruction from filtered triangle midpoints.
//!
//! Each triangle arrives as the midpoints of its surviving edges. A
//! group of three midpoints marks a branch (intersection) triangle, two
//! a mid-stroke pass-through, one an endpoint. The walk stitches these
//! into polylines: pass one grows lines out of endpoints, pass two picks
//! up the branches that remain, redirecting branch ends to the branch
//! triangle's centerpoint so strokes meet visually in the middle of the
//! intersection.
//!
//! Known gap, kept deliberately: a closed-loop skeleton (all pass-through
//! groups, as in an annulus) has no seed and is reported via
//! [`SkeletonWarning::Incomplete`] rather than walked. Likewise a pair of
//! touching branch triangles (an arity-4 midpoint) uses the shared point
//! as both centerpoints instead of emitting an extra connecting segment.

use std::collections::{HashMap, HashSet};
use std::fmt;

use kurbo::Point;

use crate::geom::{self, PointKey, EPSILON};

/// Non-fatal problems found while walking. The partial skeleton is still
/// used for dot placement; the caller decides how loudly to report.
#[derive(Debug, Clone, PartialEq)]
pub enum SkeletonWarning {
    /// The walk terminated before connecting every midpoint.
    Incomplete { unvisited: usize },
    /// A branch seed had no resolvable centerpoint; the raw midpoint was
    /// used instead.
    MissingCenterpoint { at: Point },
}

impl fmt::Display for SkeletonWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkeletonWarning::Incomplete { unvisited } => {
                write!(f, "skeleton incomplete: {unvisited} midpoints unconnected")
            }
            SkeletonWarning::MissingCenterpoint { at } => {
                write!(f, "no centerpoint found at ({:.1}, {:.1})", at.x, at.y)
            }
        }
    }
}

/// The reconstructed medial axis: polylines as segment lists.
#[derive(Debug, Clone)]
pub struct Skeleton {
    pub lines: Vec<Vec<[Point; 2]>>,
    pub warnings: Vec<SkeletonWarning>,
}

/// Build the skeleton from per-triangle midpoint groups (0–3 midpoints
/// each; empty groups are tolerated and ignored).
pub fn build(groups: &[Vec<Point>]) -> Skeleton {
    Walker::new(groups).run()
}

struct Walker<'a> {
    groups: &'a [Vec<Point>],
    /// Indices of the groups each midpoint belongs to.
    by_point: HashMap<PointKey, Vec<usize>>,
    /// Endpoint groups (one midpoint).
    singles: Vec<usize>,
    /// Branch groups (three midpoints).
    triples: Vec<usize>,
    /// Distinct midpoints overall.
    total: usize,
    /// Drawn neighbors per midpoint.
    connected: HashMap<PointKey, Vec<Point>>,
    finished: HashSet<PointKey>,
    lines: Vec<Vec<[Point; 2]>>,
    warnings: Vec<SkeletonWarning>,
}

impl<'a> Walker<'a> {
    fn new(groups: &'a [Vec<Point>]) -> Self {
        let mut by_point: HashMap<PointKey, Vec<usize>> = HashMap::new();
        let mut singles = Vec::new();
        let mut triples = Vec::new();
        for (i, group) in groups.iter().enumerate() {
            for &p in group {
                by_point.entry(p.into()).or_default().push(i);
            }
            match group.len() {
                1 => singles.push(i),
                3 => triples.push(i),
                _ => {}
            }
        }
        let total = by_point.len();
        Walker {
            groups,
            by_point,
            singles,
            triples,
            total,
            connected: HashMap::new(),
            finished: HashSet::new(),
            lines: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn run(mut self) -> Skeleton {
        self.walk_pass(Seed::Endpoints);
        self.walk_pass(Seed::Branches);
        if !self.done() {
            let unvisited = self.total - self.connected.len();
            self.warnings.push(SkeletonWarning::Incomplete { unvisited });
        }
        Skeleton {
            lines: self.lines,
            warnings: self.warnings,
        }
    }

    fn done(&self) -> bool {
        self.connected.len() >= self.total
    }

    /// First midpoint of a seed group that hasn't been finished yet.
    fn next_seed(&self, seeds: &[usize]) -> Option<Point> {
        for &idx in seeds {
            for &p in &self.groups[idx] {
                if !self.finished.contains(&PointKey::from(p)) {
                    return Some(p);
                }
            }
        }
        None
    }

    fn is_finished(&self, p: Point) -> bool {
        self.finished.contains(&PointKey::from(p))
    }

    fn record(&mut self, a: Point, b: Point, line: &mut Vec<[Point; 2]>) {
        line.push([a, b]);
        self.connected.entry(a.into()).or_default().push(b);
        self.connected.entry(b.into()).or_default().push(a);
    }

    /// First midpoint in a group that isn't `p`.
    fn other_point(&self, group: &[Point], p: Point) -> Option<Point> {
        group
            .iter()
            .copied()
            .find(|&q| !geom::points_equal(q, p, EPSILON))
    }

    /// Degree of `p` in the induced skeleton graph: how many other
    /// midpoints share a group with it.
    fn arity(&self, p: Point) -> usize {
        self.by_point
            .get(&PointKey::from(p))
            .map(|indices| {
                indices
                    .iter()
                    .flat_map(|&i| &self.groups[i])
                    .filter(|&&q| !geom::points_equal(q, p, EPSILON))
                    .count()
            })
            .unwrap_or(0)
    }

    /// The next midpoint on the walk from `cur`.
    ///
    /// Look at the pass-through (two-midpoint) groups containing `cur`;
    /// with two such groups, prefer the one that does not contain the
    /// midpoint we just came from. Remaining ambiguity resolves to the
    /// first group in input order, the documented tie-break.
    fn next_point(&self, cur: Point) -> Option<Point> {
        let came_from = self
            .connected
            .get(&PointKey::from(cur))
            .and_then(|neighbors| {
                neighbors
                    .iter()
                    .copied()
                    .find(|&q| !geom::points_equal(q, cur, EPSILON))
            });

        let pass_throughs: Vec<usize> = self
            .by_point
            .get(&PointKey::from(cur))
            .map(|indices| {
                indices
                    .iter()
                    .copied()
                    .filter(|&i| self.groups[i].len() == 2)
                    .collect()
            })
            .unwrap_or_default();

        let group = match pass_throughs.len() {
            2 => {
                let back_in_first = came_from.is_some_and(|old| {
                    self.groups[pass_throughs[0]]
                        .iter()
                        .any(|&q| geom::points_equal(q, old, EPSILON))
                });
                if back_in_first {
                    pass_throughs[1]
                } else {
                    pass_throughs[0]
                }
            }
            1 => pass_throughs[0],
            _ => return None,
        };
        self.other_point(&self.groups[group], cur)
    }

    /// The centerpoint associated with a midpoint on a branch triangle:
    /// the centroid of its unique three-midpoint group. A midpoint shared
    /// by two branch triangles is its own centerpoint, as is any arity-4
    /// midpoint of the group.
    fn centerpoint(&self, edge_point: Point) -> Option<Point> {
        let branches: Vec<usize> = self
            .by_point
            .get(&PointKey::from(edge_point))
            .map(|indices| {
                indices
                    .iter()
                    .copied()
                    .filter(|&i| self.groups[i].len() == 3)
                    .collect()
            })
            .unwrap_or_default();

        match branches.len() {
            0 => None,
            1 => {
                let group = &self.groups[branches[0]];
                for &q in group {
                    if self.arity(q) == 4 {
                        return Some(q);
                    }
                }
                Some(geom::centroid(group))
            }
            _ => Some(edge_point),
        }
    }

    fn walk_pass(&mut self, seed: Seed) {
        let seeds = match seed {
            Seed::Endpoints => self.singles.clone(),
            Seed::Branches => self.triples.clone(),
        };
        while !self.done() {
            let Some(start) = self.next_seed(&seeds) else {
                break;
            };
            let mut cur = start;
            let next = self.next_point(cur);
            let Some(mut next) = next.filter(|&n| !self.is_finished(n)) else {
                // Either an isolated midpoint (a lone triangle whose
                // other edges were all boundary) or a stale seed whose
                // line was already walked from the other side. Isolated
                // midpoints become zero-length lines, which still get
                // their one dot.
                if self.arity(cur) == 0 {
                    self.lines.push(vec![[cur, cur]]);
                    self.connected.entry(cur.into()).or_default();
                }
                self.finished.insert(cur.into());
                continue;
            };

            // A branch seed draws from its centerpoint, not the raw
            // midpoint; the raw midpoint still drives next_point().
            let mut redirect_start = false;
            let mut start_from = cur;
            if matches!(seed, Seed::Branches) {
                match self.centerpoint(cur) {
                    Some(center) => {
                        start_from = center;
                        redirect_start = true;
                    }
                    None => {
                        self.warnings
                            .push(SkeletonWarning::MissingCenterpoint { at: cur });
                    }
                }
            }

            let mut line: Vec<[Point; 2]> = Vec::new();
            loop {
                self.record(cur, next, &mut line);
                let mut end_at = next;
                let mut redraw = redirect_start;
                if self.arity(next) > 2 {
                    // Arrived at a branch: the drawn segment should end at
                    // the branch centerpoint, not the edge midpoint.
                    end_at = self.centerpoint(next).unwrap_or(next);
                    redraw = true;
                }
                if redraw {
                    line.pop();
                    line.push([start_from, end_at]);
                    redirect_start = false;
                }
                self.finished.insert(cur.into());
                cur = next;
                start_from = cur;
                match self.next_point(cur) {
                    Some(n) if !self.is_finished(n) => next = n,
                    _ => break,
                }
            }
            if !line.is_empty() {
                self.lines.push(line);
            }
        }
    }
}

#[derive(Clone, Copy)]
enum Seed {
    Endpoints,
    Branches,
}
