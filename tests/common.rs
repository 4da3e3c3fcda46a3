#![allow(dead_code)]

use quadmap::{DuplicatePolicy, KeyHasher, Polynomial, ProbingMap, ProbingSet, RehashMode};

// Run the test on a `ProbingMap` under each duplicate-key policy.
pub fn with_map<V>(test: impl FnMut(&dyn Fn(usize) -> ProbingMap<V>)) {
    with_map_hasher(Polynomial::default(), test)
}

// Run the test on a `ProbingMap` with a custom hasher under each duplicate-key policy.
pub fn with_map_hasher<V, H>(hasher: H, mut test: impl FnMut(&dyn Fn(usize) -> ProbingMap<V, H>))
where
    H: KeyHasher + Clone,
{
    for policy in [DuplicatePolicy::Unique, DuplicatePolicy::FirstOpen] {
        test(
            &(|capacity: usize| {
                ProbingMap::builder()
                    .hasher(hasher.clone())
                    .capacity(capacity)
                    .duplicates(policy)
                    .build()
                    .unwrap()
            }),
        );
    }
}

// Run the test on a `ProbingSet` under each duplicate-key policy.
pub fn with_set(mut test: impl FnMut(&dyn Fn(usize) -> ProbingSet)) {
    for policy in [DuplicatePolicy::Unique, DuplicatePolicy::FirstOpen] {
        test(
            &(|capacity: usize| {
                ProbingSet::builder()
                    .capacity(capacity)
                    .duplicates(policy)
                    .build()
                    .unwrap()
            }),
        );
    }
}

// Builds a map that never rehashes on its own.
pub fn manual<V, H: KeyHasher>(hasher: H, capacity: usize) -> ProbingMap<V, H> {
    ProbingMap::builder()
        .hasher(hasher)
        .capacity(capacity)
        .rehash_mode(RehashMode::Manual)
        .build()
        .unwrap()
}

// Maps numeric keys to their own value, and everything else to slot 0.
#[derive(Debug, Clone, Copy)]
pub struct Identity;

impl KeyHasher for Identity {
    fn hash(&self, key: &str, capacity: usize) -> usize {
        key.parse::<usize>().map_or(0, |n| n % capacity)
    }
}

// Sends every key to the same slot.
#[derive(Debug, Clone, Copy)]
pub struct Constant(pub usize);

impl KeyHasher for Constant {
    fn hash(&self, _key: &str, capacity: usize) -> usize {
        self.0 % capacity
    }
}

// Returns the index of the slot holding `key`, if any.
pub fn position<V, H>(map: &ProbingMap<V, H>, key: &str) -> Option<usize> {
    map.slots()
        .position(|slot| matches!(slot, quadmap::SlotState::Occupied(k, _) if k == key))
}

// Initializes logging for the test binary, honoring `RUST_LOG`.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
