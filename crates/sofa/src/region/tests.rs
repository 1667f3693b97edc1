use proptest::prelude::*;

use super::*;
use crate::geom::{rat, Coord, Line, VanillaLineContext};

fn coord(x: i64, y: i64) -> Coord {
    Coord::new(rat(x, 1), rat(y, 1))
}

fn id(i: i32) -> LineId {
    LineId(i)
}

/// Rotate a cyclic edge list to its lexicographically smallest form.
fn canonical_rotation(poly: &Polygon) -> Polygon {
    let mut best = poly.clone();
    let mut copy = poly.clone();
    for _ in 0..poly.len() {
        copy.rotate_left(1);
        if copy < best {
            best.clone_from(&copy);
        }
    }
    best
}

fn canonical_set(mut polys: Polygons) -> Polygons {
    for p in polys.iter_mut() {
        *p = canonical_rotation(p);
    }
    polys.sort();
    polys
}

fn assert_same_polygons(got: Polygons, want: Polygons) {
    assert_eq!(canonical_set(got), canonical_set(want));
}

/// The decagon fixture. Walking the vertices, edges 1/3 and 2/8 reuse lines,
/// so the context holds 8 distinct lines; ids are signed left-to-right.
///
/// ```text
///         7         444444
///         70       5    6
///        7  0     5     6
///        7   03335     6
///       7              6
///       7             6
///      7              6
///      7             6
///     7      2222    6
///     7     5    0  6
///    7     5      0 6
///    *11111        0
/// ```
fn decagon() -> (VanillaLineContext, Polygon) {
    let verts = vec![
        coord(-2, -1),
        coord(-1, -1),
        coord(0, 0),
        coord(1, 0),
        coord(2, -1),
        coord(3, 2),
        coord(2, 2),
        coord(1, 1),
        coord(0, 1),
        coord(-1, 2),
    ];
    let lines: Vec<Line> = (0..verts.len())
        .map(|i| Line::through_points(&verts[i], &verts[(i + 1) % verts.len()]))
        .collect();
    let ctx = VanillaLineContext::new(lines.clone());

    let mut line_ids = Polygon::new();
    for (i, l) in lines.iter().enumerate() {
        let found = ctx
            .all_lines()
            .iter()
            .position(|cl| cl == l)
            .expect("every edge line registered");
        let p = &verts[i];
        let q = &verts[(i + 1) % verts.len()];
        line_ids.push(if p.x < q.x {
            id(found as i32)
        } else {
            !id(found as i32)
        });
    }
    (ctx, line_ids)
}

#[test]
fn decagon_edge_ids() {
    let (_, line_ids) = decagon();
    assert_eq!(
        line_ids,
        vec![id(1), id(5), id(2), id(0), id(6), !id(4), !id(5), !id(3), !id(0), !id(7)]
    );
}

#[test]
fn polygon_canonicalization_helpers() {
    let poly: Polygon = [4, 5, 3, 0, 7, 1, 5, 2, 0, 6].iter().map(|&i| id(i)).collect();
    let expected: Polygon = [0, 6, 4, 5, 3, 0, 7, 1, 5, 2].iter().map(|&i| id(i)).collect();
    assert_eq!(canonical_rotation(&poly), expected);

    let polys: Polygons = vec![
        [2, 7, 1, 5].iter().map(|&i| id(i)).collect(),
        [6, 2, 0].iter().map(|&i| id(i)).collect(),
    ];
    let expected_polys: Polygons = vec![
        [0, 6, 2].iter().map(|&i| id(i)).collect(),
        [1, 5, 2, 7].iter().map(|&i| id(i)).collect(),
    ];
    assert_eq!(canonical_set(polys), expected_polys);
}

#[test]
fn half_plane_contains_intersection() {
    let (ctx, _) = decagon();
    let r5 = HalfPlane::new(&ctx, id(5));

    assert!(r5.contains_intersection(id(3), id(0)));
    assert!(r5.contains_intersection(id(0), id(3)));
    assert!(r5.contains_intersection(!id(0), !id(3)));
    assert!(r5.contains_intersection(!id(3), id(0)));
    assert!(r5.contains_intersection(id(3), !id(0)));

    assert!(!r5.contains_intersection(id(0), id(2)));
    assert!(!r5.contains_intersection(!id(0), !id(2)));
    // vertices on the boundary line itself are never inside
    assert!(!r5.contains_intersection(id(5), id(0)));
    assert!(!r5.contains_intersection(id(5), id(3)));
    assert!(!r5.contains_intersection(id(7), id(5)));
    assert!(!r5.contains_intersection(!id(0), id(5)));
    assert!(!r5.contains_intersection(id(5), id(6)));

    assert!(r5.contains_intersection(id(0), id(7)));
    assert!(!r5.contains_intersection(id(0), id(6)));
}

#[test]
fn half_plane_clips_decagon() {
    let (ctx, line_ids) = decagon();

    let r5 = HalfPlane::new(&ctx, id(5));
    assert_same_polygons(
        r5.intersect(&line_ids),
        vec![vec![id(5), !id(3), !id(0), !id(7), id(1)]],
    );

    // two polygons cut out, one polygon edge aligned with the cutting line
    let rn2 = HalfPlane::new(&ctx, !id(2));
    assert_same_polygons(
        rn2.intersect(&line_ids),
        vec![
            vec![!id(2), !id(7), id(1), id(5)],
            vec![id(0), id(6), !id(2)],
        ],
    );

    let r3 = HalfPlane::new(&ctx, id(3));
    assert_same_polygons(
        r3.intersect(&line_ids),
        vec![
            vec![!id(0), !id(7), id(3)],
            vec![id(3), id(6), !id(4), !id(5)],
        ],
    );
}

#[test]
fn union_clips_decagon() {
    let (ctx, line_ids) = decagon();

    let r50 = UnionOfTwoHalfPlanes::new(&ctx, id(5), id(0));
    assert_same_polygons(
        r50.intersect(&line_ids),
        vec![vec![
            id(1),
            id(5),
            id(0),
            id(6),
            !id(4),
            !id(5),
            !id(3),
            !id(0),
            !id(7),
        ]],
    );

    let r3n5 = UnionOfTwoHalfPlanes::new(&ctx, id(3), !id(5));
    assert_same_polygons(
        r3n5.intersect(&line_ids),
        vec![
            vec![!id(0), !id(7), id(3)],
            vec![id(2), id(0), id(6), !id(4), !id(5)],
        ],
    );

    let rn03 = UnionOfTwoHalfPlanes::new(&ctx, !id(0), id(3));
    assert_same_polygons(
        rn03.intersect(&line_ids),
        vec![
            vec![id(3), id(6), !id(4), !id(5)],
            vec![!id(0), !id(7), id(1), id(5), id(2)],
        ],
    );
}

#[test]
fn empty_and_full_clips() {
    let (ctx, line_ids) = decagon();
    // boundary below the whole decagon keeps it intact
    let below = HalfPlane::new(&ctx, id(1));
    assert_same_polygons(below.intersect(&line_ids), vec![line_ids.clone()]);
    // and its complement removes it entirely
    let above = HalfPlane::new(&ctx, !id(1));
    assert!(above.intersect(&line_ids).is_empty());
    // empty input stays empty
    assert!(HalfPlane::new(&ctx, id(5)).intersect(&Polygon::new()).is_empty());
}

proptest! {
    /// Clipping a polygon with a half-plane and with its complement
    /// partitions the area exactly.
    #[test]
    fn half_plane_area_partition(boundary in 0i32..8, complement: bool) {
        let (ctx, line_ids) = decagon();
        let b = if complement { !id(boundary) } else { id(boundary) };
        let inside = HalfPlane::new(&ctx, b).intersect(&line_ids);
        let outside = HalfPlane::new(&ctx, !b).intersect(&line_ids);
        let total = polygon_area(&ctx, &line_ids);
        prop_assert_eq!(
            polygons_area(&ctx, &inside) + polygons_area(&ctx, &outside),
            total
        );
    }
}
