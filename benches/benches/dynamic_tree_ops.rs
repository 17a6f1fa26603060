// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_dynamic_tree::{Aabb2D, DynamicTree, ProxyFlags, ProxyId};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_grid_rects(n: usize, cell: f64, scale: f64) -> Vec<Aabb2D<f64>> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let y0 = y as f64 * cell;
            out.push(Aabb2D::<f64>::from_xywh(x0, y0, cell * scale, cell * scale));
        }
    }
    out
}

fn gen_random_rects(count: usize, world: f64, size: f64, seed: u64) -> Vec<Aabb2D<f64>> {
    let mut out = Vec::with_capacity(count);
    let mut rng = Rng::new(seed);
    for _ in 0..count {
        let x0 = rng.next_f64() * (world - size).max(1.0);
        let y0 = rng.next_f64() * (world - size).max(1.0);
        out.push(Aabb2D::<f64>::from_xywh(x0, y0, size, size));
    }
    out
}

fn gen_clustered_rects(n_clusters: usize, per_cluster: usize, spread: f64) -> Vec<Aabb2D<f64>> {
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let mut centers = Vec::with_capacity(n_clusters);
    for _ in 0..n_clusters {
        centers.push((rng.next_f64() * 2000.0, rng.next_f64() * 2000.0));
    }
    for (cx, cy) in centers {
        for _ in 0..per_cluster {
            let dx = (rng.next_f64() - 0.5) * spread;
            let dy = (rng.next_f64() - 0.5) * spread;
            out.push(Aabb2D::<f64>::from_xywh(cx + dx, cy + dy, 12.0, 12.0));
        }
    }
    out
}

fn build(rects: &[Aabb2D<f64>]) -> (DynamicTree<f64, u32>, Vec<ProxyId>) {
    let mut tree = DynamicTree::with_capacity(rects.len());
    let ids = rects
        .iter()
        .copied()
        .enumerate()
        .map(|(i, r)| {
            let flags = if i % 4 == 0 {
                ProxyFlags::DYNAMIC
            } else {
                ProxyFlags::STATIC
            };
            tree.insert_with_flags(r, i as u32, flags).unwrap()
        })
        .collect();
    (tree, ids)
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for &n in &[32usize, 64, 128] {
        let rects = gen_grid_rects(n, 10.0, 1.0);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("grid_n{}", n), |b| {
            b.iter_batched(
                DynamicTree::<f64, u32>::new,
                |mut tree| {
                    for (i, r) in rects.iter().copied().enumerate() {
                        let _ = tree.insert(r, i as u32);
                    }
                    black_box(tree.tree_height());
                },
                BatchSize::SmallInput,
            )
        });
    }
    let rects = gen_clustered_rects(32, 128, 150.0);
    group.throughput(Throughput::Elements(rects.len() as u64));
    group.bench_function("clustered_4096", |b| {
        b.iter_batched(
            DynamicTree::<f64, u32>::new,
            |mut tree| {
                for (i, r) in rects.iter().copied().enumerate() {
                    let _ = tree.insert(r, i as u32);
                }
                black_box(tree.tree_height());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_move_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("move_churn");
    let rects = gen_random_rects(4096, 2000.0, 12.0, 0xCAFE_F00D_DEAD_BEEF);
    let moves = 1024;
    group.throughput(Throughput::Elements(moves as u64));
    group.bench_function("random_jitter_4096", |b| {
        b.iter_batched(
            || (build(&rects), Rng::new(0xFACE_FEED_CAFE_BABE)),
            |((mut tree, ids), mut rng)| {
                for k in 0..moves {
                    let id = ids[(rng.next_u64() as usize) % ids.len()];
                    let r = rects[k % rects.len()];
                    let dx = (rng.next_f64() - 0.5) * 8.0;
                    let dy = (rng.next_f64() - 0.5) * 8.0;
                    let moved = Aabb2D::new(r.min_x + dx, r.min_y + dy, r.max_x + dx, r.max_y + dy);
                    let _ = tree.move_proxy(id, moved);
                }
                black_box(tree.compute_tree_quality());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");
    let rects = gen_random_rects(16_384, 4000.0, 12.0, 0x1234_5678_9ABC_DEF0);
    let (tree, _) = build(&rects);
    let region = Aabb2D::<f64>::from_xywh(1800.0, 1800.0, 400.0, 400.0);

    group.bench_function("rect_16k", |b| {
        b.iter(|| black_box(tree.query_rect(black_box(region)).count()))
    });
    group.bench_function("rect_masked_16k", |b| {
        b.iter(|| {
            black_box(
                tree.query_with_flags(|a| a.overlaps(&region), ProxyFlags::DYNAMIC)
                    .count(),
            )
        })
    });
    group.bench_function("point_16k", |b| {
        b.iter(|| black_box(tree.query_point(black_box(2000.0), black_box(2000.0)).count()))
    });
    group.bench_function("linear_scan_16k", |b| {
        b.iter(|| black_box(rects.iter().filter(|r| r.overlaps(&region)).count()))
    });
    group.finish();
}

fn bench_pairs(c: &mut Criterion) {
    let mut group = c.benchmark_group("pairs");
    for &n in &[1024usize, 4096] {
        let rects = gen_random_rects(n, 1000.0, 12.0, 0xBADC_F00D_1234_5678);
        let (tree, _) = build(&rects);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("tree_n{}", n), |b| {
            b.iter(|| black_box(tree.enumerate_overlapping_leaves().count()))
        });
        group.bench_function(format!("tree_masked_n{}", n), |b| {
            b.iter(|| {
                black_box(
                    tree.enumerate_overlapping_leaves_masked(
                        ProxyFlags::DYNAMIC,
                        ProxyFlags::STATIC,
                    )
                    .count(),
                )
            })
        });
        group.bench_function(format!("brute_force_n{}", n), |b| {
            b.iter(|| {
                let mut count = 0usize;
                for (i, a) in rects.iter().enumerate() {
                    for r in &rects[i + 1..] {
                        if a.overlaps(r) {
                            count += 1;
                        }
                    }
                }
                black_box(count)
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_insert,
    bench_move_churn,
    bench_query,
    bench_pairs,
);
criterion_main!(benches);
