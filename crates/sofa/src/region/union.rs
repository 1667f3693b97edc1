//! Clipping against the union of two half-planes.

use std::cmp::Ordering;

use crate::geom::{LineContext, LineId};

use super::half_plane::HalfPlane;
use super::{Polygon, Polygons};

/// Which half-plane's boundary a polyline endpoint sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BoundaryType {
    H0,
    H1,
}

/// Set-theoretic union of two half-planes with signed boundary ids.
///
/// The constructor canonicalizes the pair so that the single corner-crossing
/// configuration during linking always runs from `bd0` to `bd1`.
pub struct UnionOfTwoHalfPlanes<'c, C: LineContext> {
    ctx: &'c C,
    bd0: LineId,
    bd1: LineId,
}

struct Polyline {
    begin: usize,
    end: usize,
    begin_value: LineId,
    end_value: LineId,
    begin_type: BoundaryType,
    end_type: BoundaryType,
    next: usize,
    visited: bool,
}

impl<'c, C: LineContext> UnionOfTwoHalfPlanes<'c, C> {
    pub fn new(ctx: &'c C, bd0: LineId, bd1: LineId) -> UnionOfTwoHalfPlanes<'c, C> {
        let mut flip = bd0.is_complement() != bd1.is_complement();
        if bd0.canon() < bd1.canon() {
            flip = !flip;
        }
        let (bd0, bd1) = if flip { (bd1, bd0) } else { (bd0, bd1) };
        UnionOfTwoHalfPlanes { ctx, bd0, bd1 }
    }

    fn in_h0(&self, l0: LineId, l1: LineId) -> bool {
        HalfPlane::new(self.ctx, self.bd0).contains_intersection(l0, l1)
    }

    fn in_h1(&self, l0: LineId, l1: LineId) -> bool {
        HalfPlane::new(self.ctx, self.bd1).contains_intersection(l0, l1)
    }

    /// Whether the corner `bd0 ∩ bd1` lies inside the half-plane above the
    /// (signed) edge `m`. Resolves which boundary an ambiguous transition
    /// goes through.
    fn corner_above(&self, m: LineId) -> bool {
        debug_assert!(m.canon() != self.bd0.canon() && m.canon() != self.bd1.canon());
        HalfPlane::new(self.ctx, m).contains_intersection(self.bd0, self.bd1)
    }

    /// Clip one polygon against the union.
    pub fn intersect(&self, poly: &Polygon) -> Polygons {
        if poly.is_empty() {
            return vec![];
        }
        debug_assert!(poly.len() >= 3);

        let mut polylines = self.build_polylines(poly);
        if polylines.is_empty() {
            let len = poly.len();
            let p_in =
                self.in_h0(poly[len - 1], poly[0]) || self.in_h1(poly[len - 1], poly[0]);
            return if p_in { vec![poly.clone()] } else { vec![] };
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
        let mut p_in_h0 = self.in_h0(poly[len - 1], poly[0]);
        let mut p_in_h1 = self.in_h1(poly[len - 1], poly[0]);
        let mut p_in = p_in_h0 || p_in_h1;
        let mut polylines: Vec<Polyline> = Vec::new();
        let mut open: Option<(usize, LineId, BoundaryType)> = None;

        let close = |polylines: &mut Vec<Polyline>,
                         open: &mut Option<(usize, LineId, BoundaryType)>,
                         i: usize,
                         m: LineId,
                         end_type: BoundaryType| {
            // a missing begin belongs to the leading polyline and is filled
            // from the wrap-around after the walk
            let (begin, begin_value, begin_type) =
                open.take().unwrap_or((0, m, BoundaryType::H0));
            polylines.push(Polyline {
                begin,
                end: i,
                begin_value,
                end_value: m,
                begin_type,
                end_type,
                next: usize::MAX,
                visited: false,
            });
        };

        for i in 0..len {
            let m = poly[i];
            let n = poly[(i + 1) % len];
            let q_in_h0 = self.in_h0(m, n);
            let q_in_h1 = self.in_h1(m, n);
            let q_in = q_in_h0 || q_in_h1;

            if !p_in && q_in {
                // edge m enters the union
                let ty = if !p_in_h0 && !q_in_h0 {
                    BoundaryType::H1
                } else if !p_in_h1 && !q_in_h1 {
                    BoundaryType::H0
                } else if self.corner_above(m) {
                    BoundaryType::H1
                } else {
                    BoundaryType::H0
                };
                open = Some((i, m, ty));
            } else if p_in && !q_in {
                // edge m leaves the union
                let ty = if !p_in_h0 && !q_in_h0 {
                    BoundaryType::H1
                } else if !p_in_h1 && !q_in_h1 {
                    BoundaryType::H0
                } else if self.corner_above(m) {
                    BoundaryType::H0
                } else {
                    BoundaryType::H1
                };
                close(&mut polylines, &mut open, i, m, ty);
            } else if p_in && q_in && p_in_h0 != q_in_h0 && p_in_h1 != q_in_h1 {
                // edge m swaps half-planes; it leaves the union iff the
                // corner is on the wrong side of the edge
                if p_in_h0 {
                    debug_assert!(p_in_h0 && !p_in_h1 && !q_in_h0 && q_in_h1);
                    if self.corner_above(m) {
                        close(&mut polylines, &mut open, i, m, BoundaryType::H0);
                        open = Some((i, m, BoundaryType::H1));
                    }
                } else {
                    debug_assert!(!p_in_h0 && p_in_h1 && q_in_h0 && !q_in_h1);
                    if !self.corner_above(m) {
                        close(&mut polylines, &mut open, i, m, BoundaryType::H1);
                        open = Some((i, m, BoundaryType::H0));
                    }
                }
            }

            p_in_h0 = q_in_h0;
            p_in_h1 = q_in_h1;
            p_in = q_in;
        }

        if let Some((begin, begin_value, begin_type)) = open {
            polylines[0].begin = begin;
            polylines[0].begin_value = begin_value;
            polylines[0].begin_type = begin_type;
        }

        polylines
    }

    fn line_out_before(&self, boundary: LineId, id0: LineId, id1: LineId) -> bool {
        HalfPlane::new(self.ctx, id0).contains_intersection(boundary, id1)
    }

    fn link_polylines(&self, polylines: &mut [Polyline]) {
        let mut b_h0: Vec<usize> = Vec::new();
        let mut b_h1: Vec<usize> = Vec::new();
        let mut e_h0: Vec<usize> = Vec::new();
        let mut e_h1: Vec<usize> = Vec::new();
        for (i, pl) in polylines.iter().enumerate() {
            match pl.begin_type {
                BoundaryType::H0 => b_h0.push(i),
                BoundaryType::H1 => b_h1.push(i),
            }
            match pl.end_type {
                BoundaryType::H0 => e_h0.push(i),
                BoundaryType::H1 => e_h1.push(i),
            }
        }

        let sort_out = |ids: &mut Vec<usize>, boundary: LineId, flip: bool| {
            ids.sort_by(|&a, &b| {
                let (va, vb) = if flip {
                    // entering edges point into the region; reverse them
                    (!polylines[a].begin_value, !polylines[b].begin_value)
                } else {
                    (polylines[a].end_value, polylines[b].end_value)
                };
                if self.line_out_before(boundary, va, vb) {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            });
        };
        sort_out(&mut b_h0, self.bd0, true);
        sort_out(&mut b_h1, self.bd1, true);
        sort_out(&mut e_h0, self.bd0, false);
        sort_out(&mut e_h1, self.bd1, false);

        if b_h0.len() == e_h0.len() {
            debug_assert_eq!(b_h1.len(), e_h1.len());
            for i in 0..b_h0.len() {
                polylines[e_h0[i]].next = b_h0[i];
            }
            for i in 0..b_h1.len() {
                polylines[e_h1[i]].next = b_h1[i];
            }
        } else {
            // the union boundary crosses the corner from bd0 to bd1 exactly
            // once: the last exit on bd0 resumes at the first entry on bd1
            debug_assert!(b_h0.len() + 1 == e_h0.len() && b_h1.len() == e_h1.len() + 1);
            for i in 0..e_h0.len() - 1 {
                polylines[e_h0[i]].next = b_h0[i];
            }
            polylines[e_h0[e_h0.len() - 1]].next = b_h1[0];
            for i in 0..e_h1.len() {
                polylines[e_h1[i]].next = b_h1[i + 1];
            }
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

                let nxt = polylines[cur].next;
                match (polylines[cur].end_type, polylines[nxt].begin_type) {
                    (BoundaryType::H0, BoundaryType::H1) => {
                        // around the corner, unless an endpoint already sits
                        // on the matching boundary line
                        if polylines[cur].end_value != self.bd1
                            && polylines[nxt].begin_value != self.bd0
                        {
                            cur_polygon.push(self.bd0);
                            cur_polygon.push(self.bd1);
                        }
                    }
                    (BoundaryType::H0, BoundaryType::H0) => cur_polygon.push(self.bd0),
                    (BoundaryType::H1, bt) => {
                        debug_assert_eq!(bt, BoundaryType::H1);
                        cur_polygon.push(self.bd1);
                    }
                }

                cur = nxt;
            }
            out.push(cur_polygon);
        }
        out
    }
}
