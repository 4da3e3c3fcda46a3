#![no_main]

use libfuzzer_sys::fuzz_target;

use arbitrary::Arbitrary;
use quadmap::{Error, Insert, ProbingMap, RehashMode};
use std::collections::HashMap as StdHashMap;

// Keys are drawn from a small alphabet so that operations collide often.
#[derive(Debug, Arbitrary)]
struct Key(u8);

impl Key {
    fn as_string(&self) -> String {
        format!("k{}", self.0 % 64)
    }
}

#[derive(Debug, Arbitrary)]
enum Operation {
    Insert(Key, u32),
    Remove(Key),
    Get(Key),
    Contains(Key),
    Rehash,
    Clear,
    Len,
    IsEmpty,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    manual: bool,
    operations: Vec<Operation>,
}

// 64 distinct keys never fill the half of a 131-slot table that quadratic
// probing is guaranteed to reach, so every insert must succeed.
const CAPACITY: usize = 131;

fn fuzz_map(input: FuzzInput) {
    let mode = if input.manual {
        RehashMode::Manual
    } else {
        RehashMode::Tombstones
    };

    let mut std_map = StdHashMap::new();
    let mut map = ProbingMap::builder()
        .capacity(CAPACITY)
        .rehash_mode(mode)
        .build()
        .unwrap();

    for op in input.operations {
        match op {
            Operation::Insert(k, v) => {
                let k = k.as_string();
                let std_result = match std_map.insert(k.clone(), v) {
                    Some(old) => Insert::Updated(old),
                    None => Insert::Inserted,
                };
                assert_eq!(map.insert(&k, v), Ok(std_result));
            }
            Operation::Remove(k) => {
                let k = k.as_string();
                assert_eq!(map.remove(&k), Ok(std_map.remove(&k)));
            }
            Operation::Get(k) => {
                let k = k.as_string();
                assert_eq!(map.get(&k), Ok(std_map.get(&k)));
            }
            Operation::Contains(k) => {
                let k = k.as_string();
                assert_eq!(map.contains_key(&k), Ok(std_map.contains_key(&k)));
            }
            Operation::Rehash => {
                map.rehash().unwrap();
                assert_eq!(map.tombstones(), 0);
            }
            Operation::Clear => {
                std_map.clear();
                map.clear();
            }
            Operation::Len => {
                assert_eq!(std_map.len(), map.len());
            }
            Operation::IsEmpty => {
                assert_eq!(std_map.is_empty(), map.is_empty());
            }
        }

        assert!(map.len() + map.tombstones() <= map.capacity());
    }

    // Final consistency checks
    for (k, v) in std_map.iter() {
        assert_eq!(Ok(Some(v)), map.get(k));
    }
    assert_eq!(std_map.len(), map.len());
    assert_eq!(map.insert("", 0), Err(Error::InvalidArgument("key must not be empty")));
}

fuzz_target!(|data: FuzzInput| {
    fuzz_map(data);
});
