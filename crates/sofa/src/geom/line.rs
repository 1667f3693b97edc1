//! Oriented lines in slope–intercept form and the U/V arrangement predicate.
//!
//! Every line is non-vertical (`y = slope·x + intercept`); all normal vectors
//! in this system have a positive y-component, so a vertical boundary never
//! arises. Two coords with equal `x` are a precondition failure, not a
//! handled case.

use std::cmp::Ordering;
use std::fmt;

use super::types::{Coord, Rat};

/// Non-vertical line `y = slope·x + intercept`.
///
/// Total order is lexicographic by `(slope, intercept)`, both ascending.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    pub slope: Rat,
    pub intercept: Rat,
}

impl Line {
    pub fn new(slope: Rat, intercept: Rat) -> Line {
        Line { slope, intercept }
    }

    /// Line through two points with distinct `x`.
    pub fn through_points(p0: &Coord, p1: &Coord) -> Line {
        debug_assert!(p0.x != p1.x, "line through points with equal x is vertical");
        let dx = &p1.x - &p0.x;
        Line {
            slope: (&p1.y - &p0.y) / &dx,
            intercept: (&p1.x * &p0.y - &p0.x * &p1.y) / dx,
        }
    }

    /// Line `{ p : n·p = d }` for a normal `n` with nonzero y-component.
    pub fn from_normal(n: &Coord, d: Rat) -> Line {
        Line {
            slope: -(&n.x / &n.y),
            intercept: d / &n.y,
        }
    }

    /// Intersection with a non-parallel line.
    pub fn intersection(&self, other: &Line) -> Coord {
        debug_assert!(self.slope != other.slope);
        let ds = &other.slope - &self.slope;
        Coord {
            x: (&self.intercept - &other.intercept) / &ds,
            y: (&other.slope * &self.intercept - &other.intercept * &self.slope) / ds,
        }
    }

    /// Intercept of the line parallel to `self` passing through `p`.
    pub fn parallel_intercept(&self, p: &Coord) -> Rat {
        &p.y - &self.slope * &p.x
    }
}

impl PartialOrd for Line {
    fn partial_cmp(&self, other: &Line) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Line {
    fn cmp(&self, other: &Line) -> Ordering {
        self.slope
            .cmp(&other.slope)
            .then_with(|| self.intercept.cmp(&other.intercept))
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "y = {}*x + {}", self.slope, self.intercept)
    }
}

/// Intersection of two non-parallel lines (free-function form).
pub fn intersection(l0: &Line, l1: &Line) -> Coord {
    l0.intersection(l1)
}

/// The two qualitative shapes three pairwise non-parallel lines can form.
///
/// Sorted in ascending slope, the arrangement is `U` when the middle line
/// passes strictly above the intersection of the outer two, and `V` when it
/// passes through or below it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arrangement {
    U,
    V,
}

/// Arrangement of lines already in strictly ascending slope order.
pub(crate) fn arrangement_general(l0: &Line, l1: &Line, l2: &Line) -> Arrangement {
    let p = l0.intersection(l2);
    if l1.intercept > l1.parallel_intercept(&p) {
        Arrangement::U
    } else {
        Arrangement::V
    }
}

/// Arrangement of monotonically non-decreasing lines; a parallel pair is V.
fn arrangement_ordered(l0: &Line, l1: &Line, l2: &Line) -> Arrangement {
    if l0.slope == l1.slope || l1.slope == l2.slope {
        Arrangement::V
    } else {
        arrangement_general(l0, l1, l2)
    }
}

/// Arrangement of three lines in any order.
pub fn arrangement(l0: &Line, l1: &Line, l2: &Line) -> Arrangement {
    let (mut a, mut b, mut c) = (l0, l1, l2);
    if a > b {
        std::mem::swap(&mut a, &mut b);
    }
    if b > c {
        std::mem::swap(&mut b, &mut c);
    }
    if a > b {
        std::mem::swap(&mut a, &mut b);
    }
    arrangement_ordered(a, b, c)
}
