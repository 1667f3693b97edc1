//! Band-pair line contexts for the sofa search.
//!
//! Purpose
//! - Hold the `4N` lines of `N` slope groups ("band pairs") with every
//!   pairwise intersection precomputed and every three-line arrangement
//!   memoized.
//! - Derive a child context by bisecting one band down or up, shifting the
//!   caches instead of rebuilding them.
//!
//! Cache layout
//! - Intersections live in a perfect-hash array of size `16·C(N,2)`.
//! - Arrangements live in an array of size `64·C(N,3)`, grouped by *band
//!   triples* of 8 slots each, where a band is a pair of consecutive lines
//!   (`il,iu` or `ol,ou`). If the uniform test proves the whole band triple
//!   shares one answer, all 8 slots are stamped at once and survive any
//!   further bisection; otherwise slots fill lazily and are invalidated or
//!   shifted when their band moves.

use std::cell::RefCell;

use crate::geom::{
    arrangement_general, rat, Arrangement, Coord, Line, LineContext, LineId, Rat, SlopeId,
};

/// Four parallel lines bounding one parameter band, strictly ascending
/// intercepts `il < iu < ol < ou`.
#[derive(Clone, Debug)]
pub struct BandPair {
    pub il: Line,
    pub iu: Line,
    pub ol: Line,
    pub ou: Line,
}

impl BandPair {
    pub fn from_slope(slope: Rat, il: Rat, iu: Rat, ol: Rat, ou: Rat) -> BandPair {
        BandPair {
            il: Line::new(slope.clone(), il),
            iu: Line::new(slope.clone(), iu),
            ol: Line::new(slope.clone(), ol),
            ou: Line::new(slope, ou),
        }
    }

    pub fn from_normal(unit: &Coord, il: Rat, iu: Rat, ol: Rat, ou: Rat) -> BandPair {
        BandPair {
            il: Line::from_normal(unit, il),
            iu: Line::from_normal(unit, iu),
            ol: Line::from_normal(unit, ol),
            ou: Line::from_normal(unit, ou),
        }
    }
}

/// Which half of a band a bisection keeps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BranchDirection {
    Down,
    Up,
}

#[inline]
fn comb2(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

#[inline]
fn comb3(n: usize) -> usize {
    n * n.saturating_sub(1) * n.saturating_sub(2) / 6
}

#[inline]
fn num_lines(n: usize) -> usize {
    4 * n
}

#[inline]
fn num_pair_slots(n: usize) -> usize {
    16 * comb2(n)
}

#[inline]
fn num_triple_slots(n: usize) -> usize {
    64 * comb3(n)
}

#[inline]
fn num_band_triples(n: usize) -> usize {
    8 * comb3(n)
}

/// Perfect pair hash for lines `i < j` in different slope groups.
#[inline]
fn pair_slot(i: usize, j: usize) -> usize {
    debug_assert!(i < j);
    16 * comb2(j / 4) + (j % 4) * 4 + 16 * (i / 4) + i % 4
}

/// Perfect triple hash for lines `i < j < k` in pairwise different slope
/// groups. The three low bits pick the line within its band, so dividing by
/// 8 yields the owning band-triple index.
#[inline]
fn triple_slot(i: usize, j: usize, k: usize) -> usize {
    debug_assert!(i < j && j < k);
    64 * (i / 4) + (i & 2) / 2 * 8 + (i & 1)
        + 64 * comb2(j / 4) + (j & 2) / 2 * 16 + (j & 1) * 2
        + 64 * comb3(k / 4) + (k & 2) / 2 * 32 + (k & 1) * 4
}

/// Triple hash with `x` in arbitrary position relative to `a < b`.
#[inline]
fn triple_slot_with(x: usize, a: usize, b: usize) -> usize {
    debug_assert!(a < b);
    if x < a {
        triple_slot(x, a, b)
    } else if x < b {
        triple_slot(a, x, b)
    } else {
        triple_slot(a, b, x)
    }
}

#[inline]
fn band_triple_of(slot: usize) -> usize {
    slot / 8
}

/// Memoized three-line arrangements, grouped by band triple.
#[derive(Clone, Debug)]
struct ArrangementCache {
    /// Band triples whose uniform test should run at the next lookup.
    to_determine: Vec<bool>,
    /// Band triples stamped with one uniform answer for all 8 slots.
    determined: Vec<bool>,
    known: Vec<bool>,
    mem: Vec<Arrangement>,
}

/// Line context of `N` band pairs with incrementally maintained caches.
///
/// Lines are registered in band order: slope group `s` holds ids
/// `[4s, 4s+1, 4s+2, 4s+3] = [il, iu, ol, ou]`.
#[derive(Clone, Debug)]
pub struct SofaLineContext {
    n: usize,
    lines: Vec<Line>,
    intersections: Vec<Coord>,
    cache: RefCell<ArrangementCache>,
}

impl SofaLineContext {
    pub fn new(band_pairs: &[BandPair]) -> SofaLineContext {
        let n = band_pairs.len();
        for w in band_pairs.windows(2) {
            debug_assert!(w[0].il.slope < w[1].il.slope);
        }

        let mut lines = Vec::with_capacity(num_lines(n));
        for bp in band_pairs {
            debug_assert!(bp.il.slope == bp.iu.slope);
            debug_assert!(bp.iu.slope == bp.ol.slope);
            debug_assert!(bp.ol.slope == bp.ou.slope);
            debug_assert!(bp.il.intercept < bp.iu.intercept);
            debug_assert!(bp.iu.intercept < bp.ol.intercept);
            debug_assert!(bp.ol.intercept < bp.ou.intercept);
            lines.push(bp.il.clone());
            lines.push(bp.iu.clone());
            lines.push(bp.ol.clone());
            lines.push(bp.ou.clone());
        }

        let mut intersections = vec![Coord::default(); num_pair_slots(n)];
        for i in 0..num_lines(n) {
            for j in (i + 1)..num_lines(n) {
                if i / 4 != j / 4 {
                    intersections[pair_slot(i, j)] = lines[i].intersection(&lines[j]);
                }
            }
        }

        let cache = RefCell::new(ArrangementCache {
            to_determine: vec![true; num_band_triples(n)],
            determined: vec![false; num_band_triples(n)],
            known: vec![false; num_triple_slots(n)],
            mem: vec![Arrangement::V; num_triple_slots(n)],
        });

        SofaLineContext {
            n,
            lines,
            intersections,
            cache,
        }
    }

    /// Number of band pairs (slope groups).
    pub fn num_bands(&self) -> usize {
        self.n
    }

    /// Derive a context with band `s` bisected. Down keeps the lower half
    /// (`ou` drops to the old `ol`), up keeps the upper half (`il` rises to
    /// the old `iu`); the surviving extreme stays put.
    pub fn branch(&self, s: SlopeId, dir: BranchDirection) -> SofaLineContext {
        let mut ctx = self.clone();
        let n = ctx.n;
        let (il, iu, ol, ou) = (4 * s, 4 * s + 1, 4 * s + 2, 4 * s + 3);
        let igap = (&ctx.lines[ou].intercept - &ctx.lines[ol].intercept) / rat(2, 1);

        match dir {
            BranchDirection::Down => {
                let new_iu = &ctx.lines[iu].intercept - &igap;
                let new_ou = ctx.lines[ol].intercept.clone();
                let new_ol = &ctx.lines[ol].intercept - &igap;
                ctx.lines[iu].intercept = new_iu;
                ctx.lines[ou].intercept = new_ou;
                ctx.lines[ol].intercept = new_ol;
            }
            BranchDirection::Up => {
                let new_il = ctx.lines[iu].intercept.clone();
                let new_iu = &ctx.lines[iu].intercept + &igap;
                let new_ol = &ctx.lines[ol].intercept + &igap;
                ctx.lines[il].intercept = new_il;
                ctx.lines[iu].intercept = new_iu;
                ctx.lines[ol].intercept = new_ol;
            }
        }

        // refresh intersections: one cached coord per touched pair shifts
        // to the line that inherited its geometry, the two moved lines are
        // recomputed
        for l in 0..num_lines(n) {
            if l / 4 == s {
                continue;
            }
            let slot = |x: usize| {
                if l < x {
                    pair_slot(l, x)
                } else {
                    pair_slot(x, l)
                }
            };
            match dir {
                BranchDirection::Down => {
                    ctx.intersections[slot(ou)] = ctx.intersections[slot(ol)].clone();
                    ctx.intersections[slot(iu)] = ctx.lines[l].intersection(&ctx.lines[iu]);
                    ctx.intersections[slot(ol)] = ctx.lines[l].intersection(&ctx.lines[ol]);
                }
                BranchDirection::Up => {
                    ctx.intersections[slot(il)] = ctx.intersections[slot(iu)].clone();
                    ctx.intersections[slot(iu)] = ctx.lines[l].intersection(&ctx.lines[iu]);
                    ctx.intersections[slot(ol)] = ctx.lines[l].intersection(&ctx.lines[ol]);
                }
            }
        }

        // arrangement slots move with their band triple; uniformly stamped
        // triples stay valid because the stamp covers the band's whole
        // reachable intercept range
        let cache = ctx.cache.get_mut();
        for a in 0..num_lines(n) {
            if a / 4 == s {
                continue;
            }
            for b in (a + 1)..num_lines(n) {
                if b / 4 == s || b / 4 == a / 4 {
                    continue;
                }
                let inner = band_triple_of(triple_slot_with(iu, a, b));
                let outer = band_triple_of(triple_slot_with(ol, a, b));
                match dir {
                    BranchDirection::Down => {
                        if !cache.determined[inner] {
                            cache.to_determine[inner] = true;
                            cache.known[triple_slot_with(iu, a, b)] = false;
                        }
                        if !cache.determined[outer] {
                            cache.to_determine[outer] = true;
                            let from = triple_slot_with(ol, a, b);
                            let to = triple_slot_with(ou, a, b);
                            cache.known[to] = cache.known[from];
                            cache.mem[to] = cache.mem[from];
                            cache.known[from] = false;
                        }
                    }
                    BranchDirection::Up => {
                        if !cache.determined[inner] {
                            cache.to_determine[inner] = true;
                            let from = triple_slot_with(iu, a, b);
                            let to = triple_slot_with(il, a, b);
                            cache.known[to] = cache.known[from];
                            cache.mem[to] = cache.mem[from];
                            cache.known[from] = false;
                        }
                        if !cache.determined[outer] {
                            cache.to_determine[outer] = true;
                            cache.known[triple_slot_with(ol, a, b)] = false;
                        }
                    }
                }
            }
        }

        ctx
    }

    /// Lowest line reachable by bisection within band `band` (a line pair):
    /// the band's extent mirrored past its lower member.
    fn band_lower(&self, band: usize) -> Line {
        let lo = &self.lines[2 * band];
        let hi = &self.lines[2 * band + 1];
        Line::new(
            lo.slope.clone(),
            &lo.intercept + &lo.intercept - &hi.intercept,
        )
    }

    fn band_upper(&self, band: usize) -> Line {
        let lo = &self.lines[2 * band];
        let hi = &self.lines[2 * band + 1];
        Line::new(
            lo.slope.clone(),
            &hi.intercept + &hi.intercept - &lo.intercept,
        )
    }

    fn arrangement_explicit(&self, i: usize, j: usize, k: usize) -> Arrangement {
        let p = self.intersection(LineId(i as i32), LineId(k as i32));
        if self.lines[j].parallel_intercept(&p) >= self.lines[j].intercept {
            Arrangement::V
        } else {
            Arrangement::U
        }
    }

    /// Fill one slot and, on the band triple's first lookup, try to stamp
    /// all 8 of its slots with a uniform answer.
    fn update_slot(&self, i: usize, j: usize, k: usize, slot: usize) -> Arrangement {
        let ans = self.arrangement_explicit(i, j, k);
        let mut cache = self.cache.borrow_mut();
        cache.mem[slot] = ans;
        cache.known[slot] = true;

        let b3 = band_triple_of(slot);
        if cache.to_determine[b3] {
            cache.to_determine[b3] = false;
            let uniform = match ans {
                Arrangement::V => {
                    arrangement_general(
                        &self.band_lower(i / 2),
                        &self.band_upper(j / 2),
                        &self.band_lower(k / 2),
                    ) == Arrangement::V
                }
                Arrangement::U => {
                    arrangement_general(
                        &self.band_upper(i / 2),
                        &self.band_lower(j / 2),
                        &self.band_upper(k / 2),
                    ) == Arrangement::U
                }
            };
            if uniform {
                cache.determined[b3] = true;
                for s in 8 * b3..8 * (b3 + 1) {
                    cache.known[s] = true;
                    cache.mem[s] = ans;
                }
            }
        }
        ans
    }
}

impl LineContext for SofaLineContext {
    fn num_lines(&self) -> usize {
        self.lines.len()
    }

    fn line(&self, id: LineId) -> &Line {
        &self.lines[id.canon().index()]
    }

    fn all_lines(&self) -> &[Line] {
        &self.lines
    }

    fn intersection(&self, id0: LineId, id1: LineId) -> Coord {
        let i = id0.canon().index();
        let j = id1.canon().index();
        debug_assert_ne!(i / 4, j / 4);
        let slot = if i < j { pair_slot(i, j) } else { pair_slot(j, i) };
        self.intersections[slot].clone()
    }

    fn slope_id(&self, id: LineId) -> SlopeId {
        id.canon().index() / 4
    }

    fn arrangement(&self, id0: LineId, id1: LineId, id2: LineId) -> Arrangement {
        let i = id0.canon().index();
        let j = id1.canon().index();
        let k = id2.canon().index();
        debug_assert!(i < j && j < k);
        debug_assert!(i / 4 != j / 4 && j / 4 != k / 4);
        let slot = triple_slot(i, j, k);
        {
            let cache = self.cache.borrow();
            if cache.known[slot] {
                return cache.mem[slot];
            }
        }
        self.update_slot(i, j, k, slot)
    }
}
