use std::collections::HashMap;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use quadmap::ProbingMap;

// A prime a little over twice the number of keys.
const CAPACITY: usize = 20_011;
const SIZE: usize = 10_000;

fn keys() -> Vec<String> {
    // Add 1 then multiply by some 32 bit prime.
    let mut state = 0usize;
    (0..SIZE)
        .map(|_| {
            state = state.wrapping_add(1).wrapping_mul(3_787_392_781);
            format!("{state:x}")
        })
        .collect()
}

fn compare(c: &mut Criterion) {
    let keys = keys();

    let mut group = c.benchmark_group("read");

    group.bench_function("quadmap", |b| {
        let mut m = ProbingMap::new(CAPACITY).unwrap();
        for (i, key) in keys.iter().enumerate() {
            m.insert(key, i).unwrap();
        }

        b.iter(|| {
            for (i, key) in keys.iter().enumerate() {
                black_box(assert_eq!(m.get(key), Ok(Some(&i))));
            }
        });
    });

    group.bench_function("std", |b| {
        let mut m = HashMap::<String, usize>::default();
        for (i, key) in keys.iter().enumerate() {
            m.insert(key.clone(), i);
        }

        b.iter(|| {
            for (i, key) in keys.iter().enumerate() {
                black_box(assert_eq!(m.get(key.as_str()), Some(&i)));
            }
        });
    });

    group.finish();

    let mut group = c.benchmark_group("churn");

    // Remove and reinsert every key, building up tombstones until a rehash.
    group.bench_function("quadmap", |b| {
        let mut m = ProbingMap::new(CAPACITY).unwrap();
        for (i, key) in keys.iter().enumerate() {
            m.insert(key, i).unwrap();
        }

        b.iter(|| {
            for (i, key) in keys.iter().enumerate() {
                black_box(m.remove(key).unwrap());
                black_box(m.insert(key, i).unwrap());
            }
        });
    });

    group.bench_function("std", |b| {
        let mut m = HashMap::<String, usize>::default();
        for (i, key) in keys.iter().enumerate() {
            m.insert(key.clone(), i);
        }

        b.iter(|| {
            for (i, key) in keys.iter().enumerate() {
                black_box(m.remove(key.as_str()));
                black_box(m.insert(key.clone(), i));
            }
        });
    });

    group.finish();
}

criterion_group!(benches, compare);
criterion_main!(benches);
