//! Criterion benchmarks for node construction and bisection pricing.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use sofa::geom::{rat, Coord};
use sofa::node::{HalveType, Interval, Sofa};

fn fixture_normals() -> Vec<Coord> {
    let x = [rat(24, 25), rat(56, 65), rat(120, 169), rat(33, 65), rat(7, 25)];
    let y = [rat(7, 25), rat(33, 65), rat(119, 169), rat(56, 65), rat(24, 25)];
    x.into_iter()
        .zip(y)
        .map(|(x, y)| Coord::new(x, y))
        .collect()
}

fn fixture_sofa() -> Sofa {
    let mu_range = vec![
        Interval::new(rat(-84, 125), rat(0, 1)),
        Interval::new(rat(-26, 75), rat(0, 1)),
        Interval::new(rat(0, 1), rat(0, 1)),
        Interval::new(rat(0, 1), rat(931, 2600)),
        Interval::new(rat(0, 1), rat(2047, 3000)),
    ];
    let nu_range = vec![
        Interval::new(rat(57122, 151725), rat(62833, 50575)),
        Interval::new(rat(58334, 70805), rat(77253, 70805)),
        Interval::new(rat(338, 357), rat(169, 119)),
        Interval::new(rat(314533, 394485), rat(17576, 10115)),
        Interval::new(rat(513383, 354025), rat(685464, 354025)),
    ];
    Sofa::new(fixture_normals(), mu_range, nu_range, 2)
}

fn bench_node(c: &mut Criterion) {
    let mut group = c.benchmark_group("node");

    group.bench_function("construct", |b| b.iter(fixture_sofa));

    let s = fixture_sofa();
    group.bench_function("halve_gain_scan", |b| {
        b.iter(|| {
            let mut best = s.halve_gain(0, HalveType::NuDown);
            for idx in 0..s.n {
                for t in HalveType::ALL {
                    if idx == s.mu_fix_idx && t.is_mu() {
                        continue;
                    }
                    let g = s.halve_gain(idx, t);
                    if g > best {
                        best = g;
                    }
                }
            }
            best
        })
    });

    group.bench_function("halve", |b| {
        b.iter_batched(
            || s.clone(),
            |parent| parent.halve(3, HalveType::NuUp),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_node);
criterion_main!(benches);
