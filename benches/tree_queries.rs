use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rs_orthtree::parallel::{par_far_field, par_neighbors};
use rs_orthtree::queries::{FarFieldQuery, NeighborQuery};
use rs_orthtree::tree::Tree;
use rs_orthtree::utils::TreeConfig;

fn random_points(count: usize) -> Vec<[f64; 3]> {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    (0..count)
        .map(|_| [
            rng.random_range(0.0..100.0),
            rng.random_range(0.0..100.0),
            rng.random_range(0.0..100.0),
        ])
        .collect()
}

pub fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_build");
    group.measurement_time(std::time::Duration::from_secs(5));
    group.sample_size(50);

    for count in [1_000, 10_000, 100_000] {
        let points = random_points(count);
        group.bench_function(format!("build_enclosing_{}", count), |b| b.iter(|| {
            let tree = Tree::build_enclosing(&points, TreeConfig::default()).unwrap();
            black_box(tree.len());
        }));
    }
}

pub fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_queries");
    group.measurement_time(std::time::Duration::from_secs(5));
    group.sample_size(50);

    let points = random_points(20_000);
    let config = TreeConfig::default().with_neighbor_limit(Some(16));
    let tree = Tree::build_enclosing(&points, config).unwrap();

    group.bench_function("neighbors_first_16", |b| b.iter(|| {
        let mut sum = 0;
        for id in (0..points.len()).step_by(97) {
            sum += NeighborQuery::of_element(&tree, id).unwrap().into_iter().sum::<usize>();
        }
        black_box(sum);
    }));

    group.bench_function("neighbors_radius_5", |b| b.iter(|| {
        let mut sum = 0;
        for id in (0..points.len()).step_by(97) {
            sum += NeighborQuery::of_element(&tree, id).unwrap()
                .without_limit()
                .within(5.0)
                .into_iter()
                .count();
        }
        black_box(sum);
    }));

    for theta in [0.3, 0.5, 1.0] {
        let query = FarFieldQuery::new(&tree).with_theta(theta).unwrap();
        group.bench_function(format!("far_field_theta_{}", theta), |b| b.iter(|| {
            let mut sum = 0;
            for id in (0..points.len()).step_by(97) {
                sum += query.for_element(id).unwrap().far.len();
            }
            black_box(sum);
        }));
    }

    group.bench_function("par_neighbors", |b| b.iter(|| {
        black_box(par_neighbors(&tree, None).len());
    }));

    let query = FarFieldQuery::new(&tree);
    group.bench_function("par_far_field", |b| b.iter(|| {
        black_box(par_far_field(&query).len());
    }));
}

criterion_group!(benches, bench_build, bench_queries);
criterion_main!(benches);
