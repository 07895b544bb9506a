// Copyright (c) 2024-present, Andrew Werner
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rand::{rng, seq::SliceRandom, RngCore};

use crossbeam_skiplist::SkipMap as CrossbeamSkipMap;
use skiptable::SkipList;

const COUNTS: [usize; 4] = [1_000, 10_000, 100_000, 1_000_000];
const DELETE_COUNTS: [usize; 3] = [1_000, 10_000, 100_000];

fn shuffled_keys(n: usize) -> Vec<u64> {
    let mut keys: Vec<u64> = (0..n as u64).collect();
    keys.shuffle(&mut rng());
    keys
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for &n in &COUNTS {
        group.bench_with_input(BenchmarkId::new("CrossbeamSkipMap", n), &n, |b, &n| {
            let keys = shuffled_keys(n);
            b.iter(|| {
                let map = CrossbeamSkipMap::new();
                for &k in &keys {
                    map.insert(k, k);
                }
            });
        });
        group.bench_with_input(BenchmarkId::new("SkipList", n), &n, |b, &n| {
            let keys = shuffled_keys(n);
            b.iter(|| {
                let mut list = SkipList::new(rng().next_u32());
                for &k in &keys {
                    list.set(k, k);
                }
            });
        });
    }
    group.finish();
}

fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");
    for &n in &COUNTS {
        group.bench_with_input(BenchmarkId::new("CrossbeamSkipMap", n), &n, |b, &n| {
            let map = CrossbeamSkipMap::new();
            for k in shuffled_keys(n) {
                map.insert(k, k);
            }
            let mut r = rng();
            b.iter(|| {
                let k = r.next_u64() % n as u64;
                black_box(map.get(&k));
            });
        });
        group.bench_with_input(BenchmarkId::new("SkipList", n), &n, |b, &n| {
            let mut list = SkipList::new(rng().next_u32());
            for k in shuffled_keys(n) {
                list.set(k, k);
            }
            let mut r = rng();
            b.iter(|| {
                let k = r.next_u64() % n as u64;
                black_box(list.get(&k));
            });
        });
    }
    group.finish();
}

fn bench_delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("delete");
    for &n in &DELETE_COUNTS {
        group.bench_with_input(BenchmarkId::new("CrossbeamSkipMap", n), &n, |b, &n| {
            let keys = shuffled_keys(n);
            b.iter_batched(
                || {
                    let map = CrossbeamSkipMap::new();
                    for &k in &keys {
                        map.insert(k, k);
                    }
                    map
                },
                |map| {
                    for &k in &keys {
                        black_box(map.remove(&k));
                    }
                },
                BatchSize::LargeInput,
            );
        });
        group.bench_with_input(BenchmarkId::new("SkipList", n), &n, |b, &n| {
            let keys = shuffled_keys(n);
            let mut base = SkipList::new(rng().next_u32());
            for &k in &keys {
                base.set(k, k);
            }
            b.iter_batched(
                || base.clone(),
                |mut list| {
                    for &k in &keys {
                        black_box(list.delete(&k));
                    }
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");
    for &n in &COUNTS {
        group.bench_with_input(BenchmarkId::new("CrossbeamSkipMap", n), &n, |b, &n| {
            let map = CrossbeamSkipMap::new();
            for k in shuffled_keys(n) {
                map.insert(k, k);
            }
            b.iter(|| {
                map.iter().for_each(|v| {
                    black_box(v);
                });
            });
        });
        group.bench_with_input(BenchmarkId::new("SkipList", n), &n, |b, &n| {
            let mut list = SkipList::new(rng().next_u32());
            for k in shuffled_keys(n) {
                list.set(k, k);
            }
            b.iter(|| {
                list.scan(|k, v| {
                    black_box((k, v));
                    true
                });
            });
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = bench_insert, bench_get, bench_delete, bench_scan
}
criterion_main!(benches);
