use super::*;
use crate::geom::{rat, Coord};
use num_traits::One;

fn fixture_normals() -> Vec<Coord> {
    let x = [rat(24, 25), rat(56, 65), rat(120, 169), rat(33, 65), rat(7, 25)];
    let y = [rat(7, 25), rat(33, 65), rat(119, 169), rat(56, 65), rat(24, 25)];
    x.into_iter()
        .zip(y)
        .map(|(x, y)| Coord::new(x, y))
        .collect()
}

fn roots() -> Vec<Sofa> {
    Sofa::a_priori_sofas(&fixture_normals(), 2, 3)
}

#[test]
fn branch_children_shrink() {
    let sofas = roots();
    let s = &sofas[1];
    let (sd, su) = branch(s);
    assert!(sd.area > Rat::zero() && sd.area <= s.area);
    assert!(su.area > Rat::zero() && su.area <= s.area);
    // the maximizing direction shaved off a positive gain
    assert!(sd.area < s.area || su.area < s.area);
}

#[test]
fn worker_respects_the_batch_bound() {
    // with target 0 nothing prunes; every iteration replaces one node with
    // two, so the stack grows by one per iteration
    let sofas = roots();
    let initial = sofas.len();
    let (survivors, iters) = worker(sofas, &Rat::zero(), 12, 0);
    assert_eq!(iters, 12);
    assert_eq!(survivors.len(), initial + 12);
    for s in &survivors {
        assert!(s.area > Rat::zero());
    }
}

#[test]
fn worker_drains_when_everything_prunes() {
    let sofas = roots();
    let initial = sofas.len();
    let unreachable = sofas
        .iter()
        .map(|s| s.area.clone())
        .max()
        .unwrap()
        + Rat::one();
    let (survivors, iters) = worker(sofas, &unreachable, 1_000, 0);
    assert!(survivors.is_empty());
    assert_eq!(iters, initial);
}

#[test]
fn run_reports_total_iterations() {
    let sofas = roots();
    let initial = sofas.len();
    let unreachable = sofas
        .iter()
        .map(|s| s.area.clone())
        .max()
        .unwrap()
        + Rat::one();
    let cfg = SearchCfg {
        target: unreachable,
        num_workers: 2,
        iters_per_batch: 100,
    };
    let total = run(sofas, &cfg);
    assert_eq!(total, initial);
}
