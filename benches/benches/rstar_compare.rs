// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_dynamic_tree::{Aabb2D, DynamicTree};

use rstar::primitives::Rectangle;
use rstar::{AABB, RTree};

fn gen_grid_rects(n: usize, cell: f64) -> Vec<Aabb2D<f64>> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let y0 = y as f64 * cell;
            out.push(Aabb2D::<f64>::from_xywh(x0, y0, cell * 1.5, cell * 1.5));
        }
    }
    out
}

fn to_rstar_rects(v: &[Aabb2D<f64>]) -> Vec<Rectangle<[f64; 2]>> {
    v.iter()
        .map(|r| Rectangle::from_corners([r.min_x, r.min_y], [r.max_x, r.max_y]))
        .collect()
}

fn bench_build_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("rstar_compare_build_query");
    for &n in &[64usize, 128] {
        let rects = gen_grid_rects(n, 10.0);
        let aabb_query = Aabb2D::<f64>::from_xywh(100.0, 100.0, 400.0, 400.0);
        group.throughput(Throughput::Elements((n * n) as u64));

        group.bench_function(format!("dynamic_tree_n{}", n), |b| {
            b.iter_batched(
                || DynamicTree::<f64, u32>::with_capacity(rects.len()),
                |mut tree| {
                    for (i, r) in rects.iter().copied().enumerate() {
                        let _ = tree.insert(r, i as u32);
                    }
                    let hits: usize = tree.query_rect(aabb_query).count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("rstar_incremental_n{}", n), |b| {
            b.iter_batched(
                || to_rstar_rects(&rects),
                |rectangles| {
                    let mut tree = RTree::new();
                    for r in rectangles {
                        tree.insert(r);
                    }
                    let aabb = AABB::from_corners(
                        [aabb_query.min_x, aabb_query.min_y],
                        [aabb_query.max_x, aabb_query.max_y],
                    );
                    let hits: usize = tree.locate_in_envelope_intersecting(&aabb).count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_pairs(c: &mut Criterion) {
    let mut group = c.benchmark_group("rstar_compare_pairs");
    let rects = gen_grid_rects(64, 10.0);
    group.throughput(Throughput::Elements(rects.len() as u64));

    let mut tree = DynamicTree::<f64, u32>::with_capacity(rects.len());
    for (i, r) in rects.iter().copied().enumerate() {
        let _ = tree.insert(r, i as u32);
    }
    group.bench_function("dynamic_tree_pairs", |b| {
        b.iter(|| black_box(tree.enumerate_overlapping_leaves().count()))
    });

    let rtree = RTree::bulk_load(to_rstar_rects(&rects));
    group.bench_function("rstar_self_intersection", |b| {
        // Yields ordered pairs including self-pairs; only the timing is comparable.
        b.iter(|| {
            black_box(
                rtree
                    .intersection_candidates_with_other_tree(&rtree)
                    .count(),
            )
        })
    });
    group.finish();
}

criterion_group!(benches, bench_build_query, bench_pairs);
criterion_main!(benches);
