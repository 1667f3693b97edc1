//! Single half-plane clipping.

use std::cmp::Ordering;

use crate::geom::{Arrangement, LineContext, LineId};

use super::{Polygon, Polygons};

/// Half-plane behind one signed boundary id: above the line for a
/// non-negative id, below it for a complemented one.
pub struct HalfPlane<'c, C: LineContext> {
    ctx: &'c C,
    boundary: LineId,
}

/// A maximal run of polygon edges whose vertices all lie inside the region.
/// `begin`/`end` are edge positions in the clipped polygon; the id values are
/// kept alongside for the boundary-order comparators.
struct Polyline {
    begin: usize,
    end: usize,
    begin_value: LineId,
    end_value: LineId,
    next: usize,
    visited: bool,
}

impl<'c, C: LineContext> HalfPlane<'c, C> {
    pub fn new(ctx: &'c C, boundary: LineId) -> HalfPlane<'c, C> {
        HalfPlane { ctx, boundary }
    }

    /// Whether the intersection of `l0` and `l1` lies strictly inside the
    /// half-plane. The lines must not be parallel.
    ///
    /// A vertex on the boundary is never inside; in particular the answer is
    /// `false` whenever `l0` or `l1` is the boundary line itself.
    pub fn contains_intersection(&self, l0: LineId, l1: LineId) -> bool {
        let mut l0 = l0.canon();
        let mut l1 = l1.canon();
        if l0 > l1 {
            std::mem::swap(&mut l0, &mut l1);
        }
        debug_assert_ne!(self.ctx.slope_id(l0), self.ctx.slope_id(l1));

        let l = self.boundary.canon();
        if l0 == l || l1 == l {
            return false;
        }

        let below = if self.ctx.slope_id(l0) == self.ctx.slope_id(l) {
            // the vertex is below l iff l is above the parallel l0
            l0 < l
        } else if self.ctx.slope_id(l1) == self.ctx.slope_id(l) {
            l1 < l
        } else if l < l0 {
            self.ctx.arrangement(l, l0, l1) == Arrangement::V
        } else if l1 < l {
            self.ctx.arrangement(l0, l1, l) == Arrangement::V
        } else {
            self.ctx.arrangement(l0, l, l1) == Arrangement::U
        };

        if self.boundary.is_complement() {
            below
        } else {
            !below
        }
    }

    /// Clip one polygon. The result may be empty or split into several
    /// polygons, each closed by one boundary edge.
    pub fn intersect(&self, poly: &Polygon) -> Polygons {
        if poly.is_empty() {
            return vec![];
        }
        debug_assert!(poly.len() >= 3);

        let mut polylines = self.build_polylines(poly);
        if polylines.is_empty() {
            // no crossing: the polygon is wholly inside or wholly outside
            return if self.contains_intersection(poly[0], poly[1]) {
                vec![poly.clone()]
            } else {
                vec![]
            };
        }
        self.link_polylines(&mut polylines);
        self.make_polygons(poly, &mut polylines)
    }

    /// Clip every polygon of a set.
    pub fn intersect_polygons(&self, polys: &Polygons) -> Polygons {
        polys.iter().flat_map(|p| self.intersect(p)).collect()
    }

    fn build_polylines(&self, poly: &Polygon) -> Vec<Polyline> {
        let len = poly.len();
        let mut p_in = self.contains_intersection(poly[len - 1], poly[0]);
        let mut polylines: Vec<Polyline> = Vec::new();
        let mut open: Option<(usize, LineId)> = None;

        for i in 0..len {
            let m = poly[i];
            let n = poly[(i + 1) % len];
            let q_in = self.contains_intersection(m, n);

            if !p_in && q_in {
                // edge m enters the region
                open = Some((i, m));
            } else if p_in && !q_in {
                // edge m leaves the region; a missing begin is filled from
                // the wrap-around at the end of the walk
                let (begin, begin_value) = open.take().unwrap_or((0, m));
                polylines.push(Polyline {
                    begin,
                    end: i,
                    begin_value,
                    end_value: m,
                    next: usize::MAX,
                    visited: false,
                });
            }

            p_in = q_in;
        }

        // splice a trailing begin into the leading polyline (cyclic join)
        if let Some((begin, begin_value)) = open {
            polylines[0].begin = begin;
            polylines[0].begin_value = begin_value;
        }

        polylines
    }

    /// Order in which an outgoing edge meets the boundary, walking the
    /// boundary inside the region.
    fn line_out_before(&self, id0: LineId, id1: LineId) -> bool {
        HalfPlane::new(self.ctx, id0).contains_intersection(self.boundary, id1)
    }

    fn link_polylines(&self, polylines: &mut [Polyline]) {
        let k = polylines.len();
        let mut by_begin: Vec<usize> = (0..k).collect();
        let mut by_end: Vec<usize> = (0..k).collect();
        // entering edges point into the region; flip them so both sorts
        // compare outgoing directions
        by_begin.sort_by(|&a, &b| {
            if self.line_out_before(!polylines[a].begin_value, !polylines[b].begin_value) {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        });
        by_end.sort_by(|&a, &b| {
            if self.line_out_before(polylines[a].end_value, polylines[b].end_value) {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        });
        for i in 0..k {
            polylines[by_end[i]].next = by_begin[i];
        }
    }

    fn make_polygons(&self, poly: &Polygon, polylines: &mut [Polyline]) -> Polygons {
        let mut out = Polygons::new();
        for start in 0..polylines.len() {
            if polylines[start].visited {
                continue;
            }
            let mut cur_polygon = Polygon::new();
            let mut cur = start;
            while !polylines[cur].visited {
                polylines[cur].visited = true;
                let (b, e) = (polylines[cur].begin, polylines[cur].end);
                if b <= e {
                    cur_polygon.extend_from_slice(&poly[b..=e]);
                } else {
                    cur_polygon.extend_from_slice(&poly[b..]);
                    cur_polygon.extend_from_slice(&poly[..=e]);
                }
                // close across an arc of the boundary
                cur_polygon.push(self.boundary);
                cur = polylines[cur].next;
            }
            out.push(cur_polygon);
        }
        out
    }
}
