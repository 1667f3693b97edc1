//! Polygon clipping against half-plane regions, expressed over line ids.
//!
//! Purpose
//! - A polygon is a cyclic edge list of signed line ids; consecutive edges
//!   meet in a vertex, materialized on demand through the context. The
//!   interior is on the left of each directed edge.
//! - Two region shapes share the `intersect` contract: a single half-plane
//!   and the union of two half-planes. Clipping classifies vertices with
//!   `contains_intersection`, cuts the edge cycle into polylines, links the
//!   polylines around the region boundary, and re-emits closed polygons.
//!
//! Code cross-refs: `geom::LineContext` (the only oracle consulted),
//! `node::Sofa` (the sole production caller).

mod half_plane;
mod union;

pub use half_plane::HalfPlane;
pub use union::UnionOfTwoHalfPlanes;

use crate::geom::{rat, Coord, LineContext, LineId, Rat};
use num_traits::Zero;

/// Cyclic edge list; fewer than three ids is an empty polygon.
pub type Polygon = Vec<LineId>;

/// Unordered collection of polygons.
pub type Polygons = Vec<Polygon>;

/// Vertices of a polygon, one per adjacent edge pair: vertex `i` is the
/// intersection of edges `i-1` and `i` (cyclic).
pub fn polygon_coords<C: LineContext>(ctx: &C, poly: &Polygon) -> Vec<Coord> {
    let len = poly.len();
    (0..len)
        .map(|i| ctx.intersection(poly[i], poly[(i + len - 1) % len]))
        .collect()
}

/// Signed area of one polygon via the shoelace formula.
pub fn polygon_area<C: LineContext>(ctx: &C, poly: &Polygon) -> Rat {
    let coords = polygon_coords(ctx, poly);
    if coords.is_empty() {
        return Rat::zero();
    }
    let len = coords.len();
    let mut twice = Rat::zero();
    for i in 0..len {
        let c0 = &coords[(i + len - 1) % len];
        let c1 = &coords[i];
        twice = twice + (&c0.x * &c1.y - &c0.y * &c1.x);
    }
    twice / rat(2, 1)
}

/// Total signed area of a polygon set.
pub fn polygons_area<C: LineContext>(ctx: &C, polys: &Polygons) -> Rat {
    polys
        .iter()
        .fold(Rat::zero(), |acc, p| acc + polygon_area(ctx, p))
}

#[cfg(test)]
mod tests;
