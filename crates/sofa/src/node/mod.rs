//! Sofa candidate nodes.
//!
//! Purpose
//! - A node upper-bounds every sofa whose bounding rectangles at each
//!   rotation angle fall inside its `mu`/`nu` interval boxes. It owns a
//!   band-pair line context, the polygon set carved out of the initial
//!   triangle, and the set's exact area.
//! - `halve` bisects one interval and derives the child node; `halve_gain`
//!   prices a bisection without constructing the child.
//!
//! Line layout per node: axes `0..N-1` are the right side (mu), axis `N` is
//! the fixed horizontal base `[0, 1/3, 2/3, 1]`, axes `N+1..2N` the left
//! side (nu).

use num_traits::{One, Zero};

use crate::band::{BandPair, BranchDirection, SofaLineContext};
use crate::geom::{rat, Coord, Line, LineContext, LineId, Rat};
use crate::region::{self, HalfPlane, Polygon, Polygons, UnionOfTwoHalfPlanes};

/// Closed rational interval `min ≤ max`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interval {
    pub min: Rat,
    pub max: Rat,
}

impl Interval {
    pub fn new(min: Rat, max: Rat) -> Interval {
        debug_assert!(min <= max);
        Interval { min, max }
    }

    pub fn avg(&self) -> Rat {
        (&self.min + &self.max) / rat(2, 1)
    }
}

/// One bisection move on a parameter axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HalveType {
    MuDown,
    MuUp,
    NuDown,
    NuUp,
}

impl HalveType {
    pub const ALL: [HalveType; 4] = [
        HalveType::MuDown,
        HalveType::MuUp,
        HalveType::NuDown,
        HalveType::NuUp,
    ];

    #[inline]
    pub fn is_mu(self) -> bool {
        matches!(self, HalveType::MuDown | HalveType::MuUp)
    }

    #[inline]
    pub fn direction(self) -> BranchDirection {
        match self {
            HalveType::MuDown | HalveType::NuDown => BranchDirection::Down,
            HalveType::MuUp | HalveType::NuUp => BranchDirection::Up,
        }
    }
}

/// The interval boxes that pin down one sofa candidate.
#[derive(Clone, Debug)]
pub struct SofaParams {
    pub mu_range: Vec<Interval>,
    pub nu_range: Vec<Interval>,
}

/// One branch-and-bound node.
#[derive(Clone)]
pub struct Sofa {
    pub n: usize,
    pub mu_fix_idx: usize,
    /// Unit normals, ascending slope, all components positive.
    pub mu: Vec<Coord>,
    /// The normals rotated 90°: `nu[i] = (-mu[i].y, mu[i].x)`.
    pub nu: Vec<Coord>,
    pub mu_range: Vec<Interval>,
    pub nu_range: Vec<Interval>,
    pub ctx: SofaLineContext,
    pub polygons: Polygons,
    pub area: Rat,
}

fn rotate90(mu: &[Coord]) -> Vec<Coord> {
    mu.iter()
        .map(|v| Coord::new(-v.y.clone(), v.x.clone()))
        .collect()
}

impl Sofa {
    /// Root nodes: partition `nu_range[mu_fix_idx]` over `[0, 1/mu.y]` into
    /// `count` equal slices, each with the widest parameter box the pivot
    /// geometry admits.
    pub fn a_priori_sofas(normals: &[Coord], mu_fix_idx: usize, count: usize) -> Vec<Sofa> {
        Self::a_priori_params(normals, mu_fix_idx, count)
            .into_iter()
            .map(|p| Sofa::new(normals.to_vec(), p.mu_range, p.nu_range, mu_fix_idx))
            .collect()
    }

    /// Parameter boxes for the root nodes, derived from the pivot points of
    /// the unit-square-and-translation construction.
    pub fn a_priori_params(
        normals: &[Coord],
        mu_fix_idx: usize,
        count: usize,
    ) -> Vec<SofaParams> {
        let n = normals.len();
        let mu = normals;
        let nu = rotate90(normals);
        let nu_max = Rat::one() / &normals[mu_fix_idx].y;
        let u_line = Line::new(rat(0, 1), rat(1, 1));
        let l_line = Line::new(rat(0, 1), rat(0, 1));
        let fix_line = Line::from_normal(&mu[mu_fix_idx], Rat::zero());
        let r0 = fix_line.intersection(&u_line);
        let r1 = fix_line.intersection(&l_line);

        (0..count)
            .map(|i| {
                let lo = &nu_max * rat(i as i64, 1) / rat(count as i64, 1);
                let hi = &nu_max * rat(i as i64 + 1, 1) / rat(count as i64, 1);
                let upperl = Line::from_normal(&nu[mu_fix_idx], hi.clone());
                let lowerl = Line::from_normal(&nu[mu_fix_idx], lo.clone());
                let l0 = upperl.intersection(&u_line);
                let l1 = lowerl.intersection(&u_line);
                let l2 = upperl.intersection(&l_line);
                let l3 = lowerl.intersection(&l_line);

                let mut mu_range = Vec::with_capacity(n);
                let mut nu_range = Vec::with_capacity(n);
                for j in 0..n {
                    if j < mu_fix_idx {
                        mu_range.push(Interval::new(r0.dot(&mu[j]), r1.dot(&mu[j])));
                        nu_range.push(Interval::new(l3.dot(&nu[j]), l0.dot(&nu[j])));
                    } else if j == mu_fix_idx {
                        mu_range.push(Interval::new(Rat::zero(), Rat::zero()));
                        nu_range.push(Interval::new(lo.clone(), hi.clone()));
                    } else {
                        mu_range.push(Interval::new(r1.dot(&mu[j]), r0.dot(&mu[j])));
                        nu_range.push(Interval::new(l1.dot(&nu[j]), l2.dot(&nu[j])));
                    }
                }
                SofaParams { mu_range, nu_range }
            })
            .collect()
    }

    fn make_band_pairs(
        mu: &[Coord],
        nu: &[Coord],
        mu_range: &[Interval],
        nu_range: &[Interval],
        mu_fix_idx: usize,
    ) -> Vec<BandPair> {
        let n = mu.len();
        debug_assert_eq!(n, nu.len());
        debug_assert_eq!(n, mu_range.len());
        debug_assert_eq!(n, nu_range.len());

        let mut res = Vec::with_capacity(2 * n + 1);
        for i in 0..n {
            if i == mu_fix_idx {
                // mu is frozen here; pad the band with auxiliary intercepts
                debug_assert!(mu_range[i].min == mu_range[i].max);
                let base = &mu_range[i].min;
                res.push(BandPair::from_normal(
                    &mu[i],
                    base.clone(),
                    base + rat(1, 3),
                    base + rat(2, 3),
                    base + rat(1, 1),
                ));
                continue;
            }
            debug_assert!(mu_range[i].min < mu_range[i].max);
            res.push(BandPair::from_normal(
                &mu[i],
                mu_range[i].min.clone(),
                mu_range[i].avg(),
                mu_range[i].avg() + rat(1, 1),
                &mu_range[i].max + rat(1, 1),
            ));
        }
        res.push(BandPair::from_slope(
            rat(0, 1),
            rat(0, 1),
            rat(1, 3),
            rat(2, 3),
            rat(1, 1),
        ));
        for i in 0..n {
            debug_assert!(nu_range[i].min < nu_range[i].max);
            res.push(BandPair::from_normal(
                &nu[i],
                nu_range[i].min.clone(),
                nu_range[i].avg(),
                nu_range[i].avg() + rat(1, 1),
                &nu_range[i].max + rat(1, 1),
            ));
        }
        res
    }

    /// Build a node from scratch: seed triangle below the pivot, then carve
    /// with the base ceiling and every axis's union and upper clips.
    pub fn new(
        normals: Vec<Coord>,
        mu_range: Vec<Interval>,
        nu_range: Vec<Interval>,
        mu_fix_idx: usize,
    ) -> Sofa {
        let n = normals.len();
        for c in &normals {
            debug_assert!(c.x > Rat::zero());
            debug_assert!(c.y > Rat::zero());
            debug_assert!(&c.x * &c.x + &c.y * &c.y == Rat::one());
        }
        let mu = normals;
        let nu = rotate90(&mu);
        let ctx = SofaLineContext::new(&Self::make_band_pairs(
            &mu, &nu, &mu_range, &nu_range, mu_fix_idx,
        ));

        let mut sofa = Sofa {
            n,
            mu_fix_idx,
            mu,
            nu,
            mu_range,
            nu_range,
            ctx,
            polygons: Polygons::new(),
            area: Rat::zero(),
        };

        let pivot = sofa
            .ctx
            .intersection(sofa.luu(mu_fix_idx), sofa.ruu(mu_fix_idx));
        debug_assert!(pivot.y > Rat::zero());

        let mut polygons: Polygons =
            vec![vec![!sofa.luu(mu_fix_idx), sofa.hl(), !sofa.ruu(mu_fix_idx)]];
        polygons = HalfPlane::new(&sofa.ctx, !sofa.hu()).intersect_polygons(&polygons);
        for i in 0..n {
            polygons = UnionOfTwoHalfPlanes::new(&sofa.ctx, sofa.ldd(i), sofa.rdd(i))
                .intersect_polygons(&polygons);
            polygons = HalfPlane::new(&sofa.ctx, !sofa.luu(i)).intersect_polygons(&polygons);
            polygons = HalfPlane::new(&sofa.ctx, !sofa.ruu(i)).intersect_polygons(&polygons);
        }

        sofa.area = region::polygons_area(&sofa.ctx, &polygons);
        sofa.polygons = polygons;
        sofa
    }

    /// Child node for the bisection `(idx, t)`. Halving the pivot's mu is
    /// not allowed (that interval is degenerate).
    pub fn halve(&self, idx: usize, t: HalveType) -> Sofa {
        debug_assert!(idx != self.mu_fix_idx || !t.is_mu());

        let band = if t.is_mu() { idx } else { self.n + 1 + idx };
        let ctx = self.ctx.branch(band, t.direction());

        let mut mu_range = self.mu_range.clone();
        let mut nu_range = self.nu_range.clone();
        match t {
            HalveType::MuDown => {
                let mid = mu_range[idx].avg();
                mu_range[idx].max = mid;
            }
            HalveType::MuUp => {
                let mid = mu_range[idx].avg();
                mu_range[idx].min = mid;
            }
            HalveType::NuDown => {
                let mid = nu_range[idx].avg();
                nu_range[idx].max = mid;
            }
            HalveType::NuUp => {
                let mid = nu_range[idx].avg();
                nu_range[idx].min = mid;
            }
        }

        // clip in the parent's context, then renumber into the child's
        let clipped = match t {
            HalveType::MuDown => {
                HalfPlane::new(&self.ctx, !self.rud(idx)).intersect_polygons(&self.polygons)
            }
            HalveType::MuUp => {
                UnionOfTwoHalfPlanes::new(&self.ctx, self.ldd(idx), self.rdu(idx))
                    .intersect_polygons(&self.polygons)
            }
            HalveType::NuDown => {
                HalfPlane::new(&self.ctx, !self.lud(idx)).intersect_polygons(&self.polygons)
            }
            HalveType::NuUp => {
                UnionOfTwoHalfPlanes::new(&self.ctx, self.ldu(idx), self.rdd(idx))
                    .intersect_polygons(&self.polygons)
            }
        };
        let polygons: Polygons = clipped
            .into_iter()
            .map(|poly| poly.into_iter().map(remap_to_child).collect())
            .collect();

        let area = region::polygons_area(&ctx, &polygons);
        Sofa {
            n: self.n,
            mu_fix_idx: self.mu_fix_idx,
            mu: self.mu.clone(),
            nu: self.nu.clone(),
            mu_range,
            nu_range,
            ctx,
            polygons,
            area,
        }
    }

    /// Area the bisection `(idx, t)` would shave off: for any child,
    /// `child.area + parent.halve_gain(idx, t) == parent.area`.
    pub fn halve_gain(&self, idx: usize, t: HalveType) -> Rat {
        let polys = match t {
            HalveType::MuDown => {
                HalfPlane::new(&self.ctx, self.rud(idx)).intersect_polygons(&self.polygons)
            }
            HalveType::MuUp => {
                let p = HalfPlane::new(&self.ctx, !self.ldd(idx))
                    .intersect_polygons(&self.polygons);
                HalfPlane::new(&self.ctx, !self.rdu(idx)).intersect_polygons(&p)
            }
            HalveType::NuDown => {
                HalfPlane::new(&self.ctx, self.lud(idx)).intersect_polygons(&self.polygons)
            }
            HalveType::NuUp => {
                let p = HalfPlane::new(&self.ctx, !self.rdd(idx))
                    .intersect_polygons(&self.polygons);
                HalfPlane::new(&self.ctx, !self.ldu(idx)).intersect_polygons(&p)
            }
        };
        region::polygons_area(&self.ctx, &polys)
    }

    /// Materialize every polygon's vertices.
    pub fn coord_polygons(&self) -> Vec<Vec<Coord>> {
        self.polygons
            .iter()
            .map(|p| region::polygon_coords(&self.ctx, p))
            .collect()
    }

    /// Vertices of one polygon in this node's context.
    pub fn polygon_coords(&self, poly: &Polygon) -> Vec<Coord> {
        region::polygon_coords(&self.ctx, poly)
    }

    // named line ids; r* index the mu side, l* the nu side, h* the base

    pub fn hl(&self) -> LineId {
        LineId((self.n * 4) as i32)
    }
    pub fn hu(&self) -> LineId {
        LineId((self.n * 4 + 3) as i32)
    }
    pub fn rdd(&self, i: usize) -> LineId {
        LineId((i * 4) as i32)
    }
    pub fn rdu(&self, i: usize) -> LineId {
        LineId((i * 4 + 1) as i32)
    }
    pub fn rud(&self, i: usize) -> LineId {
        LineId((i * 4 + 2) as i32)
    }
    pub fn ruu(&self, i: usize) -> LineId {
        LineId((i * 4 + 3) as i32)
    }
    pub fn ldd(&self, i: usize) -> LineId {
        LineId(((i + self.n + 1) * 4) as i32)
    }
    pub fn ldu(&self, i: usize) -> LineId {
        LineId(((i + self.n + 1) * 4 + 1) as i32)
    }
    pub fn lud(&self, i: usize) -> LineId {
        LineId(((i + self.n + 1) * 4 + 2) as i32)
    }
    pub fn luu(&self, i: usize) -> LineId {
        LineId(((i + self.n + 1) * 4 + 3) as i32)
    }
}

/// After a branch the bisected band renumbers: within a band, `iu` takes the
/// child's `il` slot and `ol` takes `ou`. Orientation bits pass through.
fn remap_to_child(id: LineId) -> LineId {
    let flip = id.is_complement();
    let raw = id.canon().0;
    let raw = match raw % 4 {
        1 => raw - 1,
        2 => raw + 1,
        _ => raw,
    };
    let out = LineId(raw);
    if flip {
        !out
    } else {
        out
    }
}

#[cfg(test)]
mod tests;
