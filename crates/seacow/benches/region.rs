use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use seacow::{Body, Region, Repulsion};
use std::hint::black_box;

fn scatter(n: usize) -> Vec<Body> {
    (0..n)
        .map(|i| {
            let a = i as f64;
            Body {
                x: (a * 127.1).sin() * 500.0,
                y: (a * 311.7).cos() * 500.0,
                size: 1.0,
                mass: 1.0 + (i % 7) as f64,
            }
        })
        .collect()
}

fn brute_force_pass(bodies: &[Body], repulsion: &Repulsion) -> (f64, f64) {
    let mut total = (0.0, 0.0);
    for i in 0..bodies.len() {
        for (j, b) in bodies.iter().enumerate() {
            if j != i {
                let (fx, fy) = repulsion.between(&bodies[i], b);
                total.0 += fx;
                total.1 += fy;
            }
        }
    }
    total
}

fn tree_pass(bodies: &[Body], region: &Region, repulsion: &Repulsion, theta: f64) -> (f64, f64) {
    let mut total = (0.0, 0.0);
    for i in 0..bodies.len() {
        let (fx, fy) = region.apply_force(i, bodies, repulsion, theta);
        total.0 += fx;
        total.1 += fy;
    }
    total
}

fn bench_repulsion(c: &mut Criterion) {
    let repulsion = Repulsion::Standard { coefficient: 2.0 };
    let mut group = c.benchmark_group("repulsion");

    for n in [500usize, 2000, 8000] {
        let bodies = scatter(n);

        if n <= 2000 {
            group.bench_with_input(BenchmarkId::new("brute_force", n), &bodies, |b, bodies| {
                b.iter(|| brute_force_pass(black_box(bodies), &repulsion))
            });
        }

        group.bench_with_input(BenchmarkId::new("tree_build", n), &bodies, |b, bodies| {
            b.iter(|| Region::build(black_box(bodies)))
        });

        let region = Region::build(&bodies);
        group.bench_with_input(
            BenchmarkId::new("tree_theta_1.2", n),
            &bodies,
            |b, bodies| b.iter(|| tree_pass(black_box(bodies), &region, &repulsion, 1.2)),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_repulsion);
criterion_main!(benches);
