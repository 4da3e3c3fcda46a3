use std::mem;

use crate::Error;

// A single cell of the slot array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot<V> {
    // Never occupied since the array was allocated. Ends every probe.
    Empty,
    // Holds a live entry.
    Occupied(Entry<V>),
    // Previously occupied. Probes continue past it, inserts may reuse it.
    Tombstone,
}

// A live key-value pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<V> {
    pub key: Box<str>,
    pub value: V,
}

impl<V> Default for Slot<V> {
    fn default() -> Self {
        Slot::Empty
    }
}

impl<V> Slot<V> {
    // Returns the entry if this slot is occupied.
    #[inline]
    pub fn entry(&self) -> Option<&Entry<V>> {
        match self {
            Slot::Occupied(entry) => Some(entry),
            _ => None,
        }
    }

    // Returns true if this slot holds an entry for `key`.
    #[inline]
    pub fn holds(&self, key: &str) -> bool {
        matches!(self, Slot::Occupied(entry) if *entry.key == *key)
    }

    // Replaces this slot with a tombstone, returning the removed entry.
    #[inline]
    pub fn bury(&mut self) -> Option<Entry<V>> {
        match mem::replace(self, Slot::Tombstone) {
            Slot::Occupied(entry) => Some(entry),
            other => {
                *self = other;
                None
            }
        }
    }
}

// Allocate an array of `len` empty slots.
//
// Allocation failure is reported instead of aborting, so that callers can
// leave their current array untouched.
pub fn slots<V>(len: usize) -> Result<Vec<Slot<V>>, Error> {
    let mut slots = Vec::new();
    slots
        .try_reserve_exact(len)
        .map_err(|_| Error::OutOfMemory { slots: len })?;
    slots.resize_with(len, Slot::default);
    Ok(slots)
}

// Allocate a vector of `len` copies of `value`, reporting allocation failure.
pub fn filled<T: Clone>(len: usize, value: T) -> Result<Vec<T>, Error> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| Error::OutOfMemory { slots: len })?;
    buf.resize(len, value);
    Ok(buf)
}

// Returns the smallest prime that is at least `n`.
#[cfg(any(test, feature = "serde"))]
pub fn prime_at_least(n: usize) -> usize {
    fn is_prime(n: usize) -> bool {
        if n < 4 {
            return n >= 2;
        }

        if n % 2 == 0 {
            return false;
        }

        let mut d = 3;
        while d <= n / d {
            if n % d == 0 {
                return false;
            }
            d += 2;
        }

        true
    }

    let mut n = n.max(2);
    while !is_prime(n) {
        n += 1;
    }
    n
}
