use criterion::{black_box, BatchSize, Criterion};
use criterion::{criterion_group, criterion_main};
use rand::prelude::*;

use workpool::WorkerPool;

/// 生成100个随机的自旋计数
fn generate_spins() -> Vec<u64> {
    let mut rng = rand::thread_rng();

    let mut spins = Vec::with_capacity(100);
    for _ in 0..100 {
        spins.push(rng.gen_range(100, 10_000));
    }

    spins
}

fn spin(count: u64) -> u64 {
    let mut acc = 0u64;
    for i in 0..count {
        acc = acc.wrapping_add(i);
    }
    acc
}

fn submit_batch_bench(c: &mut Criterion) {
    let spins = generate_spins();
    let mut group = c.benchmark_group("submit_batch_bench");
    group.sample_size(10);

    {
        let spins = spins.clone();
        group.bench_function("workpool", move |b| {
            b.iter_batched(
                || WorkerPool::new(4).unwrap(),
                |pool| {
                    let actions: Vec<_> = spins
                        .iter()
                        .map(|&n| {
                            move || {
                                black_box(spin(n));
                            }
                        })
                        .collect();
                    let handle = pool.submit_batch(actions).unwrap();
                    handle.wait().unwrap();
                    pool
                },
                BatchSize::SmallInput,
            );
        });
    }

    {
        let spins = spins.clone();
        group.bench_function("rayon", move |b| {
            b.iter_batched(
                || {
                    rayon::ThreadPoolBuilder::new()
                        .num_threads(4)
                        .build()
                        .unwrap()
                },
                |pool| {
                    pool.scope(|s| {
                        for &n in spins.iter() {
                            s.spawn(move |_| {
                                black_box(spin(n));
                            });
                        }
                    });
                    pool
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, submit_batch_bench);
criterion_main!(benches);
