use super::*;

fn q(n: i64, d: i64) -> Rat {
    rat(n, d)
}

fn coord(x: Rat, y: Rat) -> Coord {
    Coord::new(x, y)
}

/// Five pythagorean normals in ascending slope, `mu_fix_idx = 2`.
fn fixture_normals() -> Vec<Coord> {
    let x = [q(24, 25), q(56, 65), q(120, 169), q(33, 65), q(7, 25)];
    let y = [q(7, 25), q(33, 65), q(119, 169), q(56, 65), q(24, 25)];
    x.into_iter().zip(y).map(|(x, y)| coord(x, y)).collect()
}

fn fixture_sofa() -> Sofa {
    let mu_range = vec![
        Interval::new(q(-84, 125), q(0, 1)),
        Interval::new(q(-26, 75), q(0, 1)),
        Interval::new(q(0, 1), q(0, 1)), // fixed
        Interval::new(q(0, 1), q(931, 2600)),
        Interval::new(q(0, 1), q(2047, 3000)),
    ];
    let nu_range = vec![
        Interval::new(q(57122, 151725), q(62833, 50575)),
        Interval::new(q(58334, 70805), q(77253, 70805)),
        Interval::new(q(338, 357), q(169, 119)),
        Interval::new(q(314533, 394485), q(17576, 10115)),
        Interval::new(q(513383, 354025), q(685464, 354025)),
    ];
    Sofa::new(fixture_normals(), mu_range, nu_range, 2)
}

#[test]
fn construction_carves_the_expected_polygon() {
    let s = fixture_sofa();
    let expected = vec![vec![
        coord(q(-1039489, 339864), q(0, 1)),
        coord(q(-758342, 467313), q(0, 1)),
        coord(q(-3348722, 2251599), q(419523, 5253731)),
        coord(q(-724776, 520625), q(30199, 74375)),
        coord(q(-1137513, 1047914), q(379171, 1197616)),
        coord(q(-517586, 552279), q(625, 1547)),
        coord(q(-2, 3), q(80, 119)),
        coord(q(0, 1), q(0, 1)),
        coord(q(25, 24), q(0, 1)),
        coord(q(37, 40), q(2, 5)),
        coord(q(83, 104), q(8, 13)),
        coord(q(5, 12), q(1, 1)),
        coord(q(-377246, 155771), q(1, 1)),
        coord(q(-448941, 184093), q(12253, 12376)),
        coord(q(-39832, 14161), q(13, 21)),
        coord(q(-1666397, 566440), q(2, 5)),
    ]];
    assert_eq!(s.coord_polygons(), expected);
    assert!(s.area > Rat::zero());
}

#[test]
fn halve_gain_matches_child_area() {
    let s = fixture_sofa();

    let s2 = s.halve(3, HalveType::NuUp);
    assert_eq!(&s2.area + s.halve_gain(3, HalveType::NuUp), s.area);

    let s3 = s2.halve(1, HalveType::MuDown);
    assert_eq!(&s3.area + s2.halve_gain(1, HalveType::MuDown), s2.area);
}

#[test]
fn halve_updates_only_the_bisected_interval() {
    let s = fixture_sofa();
    let mid = s.nu_range[3].avg();

    let down = s.halve(3, HalveType::NuDown);
    assert_eq!(down.nu_range[3].min, s.nu_range[3].min);
    assert_eq!(down.nu_range[3].max, mid);

    let up = s.halve(3, HalveType::NuUp);
    assert_eq!(up.nu_range[3].min, mid);
    assert_eq!(up.nu_range[3].max, s.nu_range[3].max);

    for i in 0..s.n {
        assert_eq!(up.mu_range[i], s.mu_range[i]);
        if i != 3 {
            assert_eq!(up.nu_range[i], s.nu_range[i]);
        }
    }
}

#[test]
fn a_priori_sofas_partition_the_pivot_interval() {
    let normals = fixture_normals();
    let sofas = Sofa::a_priori_sofas(&normals, 2, 3);
    assert_eq!(sofas.len(), 3);

    // nu_range[2] slices [0, 1/mu[2].y] = [0, 169/119] into thirds
    assert_eq!(sofas[0].nu_range[2], Interval::new(q(0, 1), q(169, 357)));
    assert_eq!(
        sofas[1].nu_range[2],
        Interval::new(q(169, 357), q(338, 357))
    );
    assert_eq!(
        sofas[2].nu_range[2],
        Interval::new(q(338, 357), q(169, 119))
    );

    for s in &sofas {
        assert!(s.area > Rat::zero());
        assert_eq!(s.mu_range[2].min, s.mu_range[2].max);
        for (i, r) in s.mu_range.iter().enumerate() {
            if i != 2 {
                assert!(r.min < r.max);
            }
        }
    }
}

#[test]
fn interval_midpoint() {
    let i = Interval::new(q(1, 3), q(1, 1));
    assert_eq!(i.avg(), q(2, 3));
}
