//! Scalar and identifier types shared by all geometry modules.
//!
//! - `Rat`: exact arbitrary-precision rational; no floating point enters any
//!   geometric predicate.
//! - `Coord`: exact 2D point.
//! - `LineId`: signed identifier into a line context, orientation carried in
//!   the sign via bitwise complement.

use std::fmt;
use std::ops::Not;

use num_bigint::BigInt;
use num_rational::BigRational;

/// Exact rational scalar used for every slope, intercept and coordinate.
pub type Rat = BigRational;

/// Index of a slope class; equal for parallel lines.
pub type SlopeId = usize;

/// Shorthand rational constructor. Panics on a zero denominator.
#[inline]
pub fn rat(numer: i64, denom: i64) -> Rat {
    Rat::new(BigInt::from(numer), BigInt::from(denom))
}

/// Signed line identifier into a [`LineContext`](super::LineContext).
///
/// A non-negative id `i` and its bitwise complement `!i` name the same
/// geometric line with opposite orientation: the non-negative form keeps the
/// half-plane above the line, the complemented form the half-plane below it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineId(pub i32);

impl LineId {
    /// Strip the orientation bit.
    #[inline]
    pub fn canon(self) -> LineId {
        if self.0 < 0 {
            LineId(!self.0)
        } else {
            self
        }
    }

    /// True when the id is in complemented (below) form.
    #[inline]
    pub fn is_complement(self) -> bool {
        self.0 < 0
    }

    /// Canonical id as an array index; the id must be non-negative.
    #[inline]
    pub fn index(self) -> usize {
        debug_assert!(self.0 >= 0);
        self.0 as usize
    }
}

impl Not for LineId {
    type Output = LineId;
    #[inline]
    fn not(self) -> LineId {
        LineId(!self.0)
    }
}

impl fmt::Debug for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0 {
            write!(f, "~{}", !self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Exact 2D point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Coord {
    pub x: Rat,
    pub y: Rat,
}

impl Default for Coord {
    fn default() -> Coord {
        use num_traits::Zero;
        Coord {
            x: Rat::zero(),
            y: Rat::zero(),
        }
    }
}

impl Coord {
    pub fn new(x: Rat, y: Rat) -> Coord {
        Coord { x, y }
    }

    pub fn dot(&self, other: &Coord) -> Rat {
        &self.x * &other.x + &self.y * &other.y
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
