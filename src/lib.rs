#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]

mod error;
mod hash;
mod map;
mod raw;
mod set;

#[cfg(feature = "serde")]
mod serde_impls;

pub use error::Error;
pub use hash::{KeyHasher, Polynomial, DEFAULT_MULTIPLIER};
pub use map::{
    DuplicatePolicy, Insert, Iter, Keys, ProbingMap, ProbingMapBuilder, RehashMode, SlotState,
    Slots, Values, DEFAULT_CAPACITY,
};
pub use set::{Iter as SetIter, ProbingSet, ProbingSetBuilder};
