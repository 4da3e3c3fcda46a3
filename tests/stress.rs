use quadmap::{DuplicatePolicy, Error, Insert, ProbingMap, RehashMode, SlotState};
use rand::prelude::*;

use std::collections::HashMap;

mod common;
use common::{init_logger, with_map};

const OPERATIONS: usize = if cfg!(quadmap_stress) { 1 << 20 } else { 1 << 14 };

fn random_key(rng: &mut StdRng, keys: usize) -> String {
    format!("key-{}", rng.gen_range(0..keys))
}

// Check the slot array against the map's counters.
fn check_layout<V>(map: &ProbingMap<V>) {
    let (mut live, mut tombstones) = (0, 0);
    for slot in map.slots() {
        match slot {
            SlotState::Occupied(..) => live += 1,
            SlotState::Tombstone => tombstones += 1,
            SlotState::Empty => {}
        }
    }

    assert_eq!(live, map.len());
    assert_eq!(tombstones, map.tombstones());
    assert!(live + tombstones <= map.capacity());
}

// With at most half of a prime capacity in use, every insert must find a slot
// and the table must agree with `std::collections::HashMap`.
#[test]
fn differential() {
    init_logger();

    for mode in [RehashMode::Tombstones, RehashMode::Manual] {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut map = ProbingMap::builder()
            .capacity(211)
            .rehash_mode(mode)
            .build()
            .unwrap();
        let mut model = HashMap::new();

        for i in 0..OPERATIONS {
            let key = random_key(&mut rng, 100);

            match rng.gen_range(0..10) {
                0..=3 => {
                    let value: u32 = rng.gen();
                    let expected = match model.insert(key.clone(), value) {
                        Some(old) => Insert::Updated(old),
                        None => Insert::Inserted,
                    };
                    assert_eq!(map.insert(&key, value), Ok(expected));
                }
                4..=6 => {
                    assert_eq!(map.remove(&key), Ok(model.remove(&key)));
                }
                7 | 8 => {
                    assert_eq!(map.get(&key), Ok(model.get(&key)));
                }
                _ => {
                    if mode == RehashMode::Manual || i % 64 == 0 {
                        map.rehash().unwrap();
                        assert_eq!(map.tombstones(), 0);
                    }
                }
            }

            assert_eq!(map.len(), model.len());
        }

        check_layout(&map);
        for (key, value) in &model {
            assert_eq!(map.get(key), Ok(Some(value)));
        }
    }
}

// Under churn, inserts either succeed or report a full table, and the table
// never loses an entry it acknowledged.
#[test]
fn churn_near_capacity() {
    init_logger();

    with_map::<usize>(|map| {
        let mut rng = StdRng::seed_from_u64(7);
        let mut map = map(31);
        let mut model = HashMap::new();

        for i in 0..OPERATIONS {
            let key = random_key(&mut rng, 40);

            if rng.gen_bool(0.6) {
                match map.insert(&key, i) {
                    Ok(_) => {
                        if map.duplicate_policy() == DuplicatePolicy::Unique {
                            model.insert(key, i);
                        }
                    }
                    Err(err) => assert_eq!(err, Error::TableFull { capacity: 31 }),
                }
            } else {
                let removed = map.remove(&key).unwrap();
                if map.duplicate_policy() == DuplicatePolicy::Unique {
                    assert_eq!(removed, model.remove(&key));
                }
            }

            check_layout(&map);
        }

        if map.duplicate_policy() == DuplicatePolicy::Unique {
            for (key, value) in &model {
                assert_eq!(map.get(key), Ok(Some(value)));
            }
        }
    });
}

#[test]
fn rehash_preserves_entries() {
    init_logger();

    let mut rng = StdRng::seed_from_u64(42);
    let mut map = ProbingMap::<u64>::new(101).unwrap();

    for _ in 0..64 {
        for _ in 0..20 {
            let key = random_key(&mut rng, 45);
            if rng.gen_bool(0.5) {
                map.insert(&key, rng.gen()).unwrap();
            } else {
                map.remove(&key).unwrap();
            }
        }

        let mut before: Vec<(String, u64)> =
            map.iter().map(|(k, v)| (k.to_owned(), *v)).collect();
        before.sort();

        map.rehash().unwrap();
        assert_eq!(map.tombstones(), 0);
        check_layout(&map);

        let mut after: Vec<(String, u64)> =
            map.iter().map(|(k, v)| (k.to_owned(), *v)).collect();
        after.sort();

        assert_eq!(before, after);
    }
}
