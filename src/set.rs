use crate::map::{DuplicatePolicy, Insert, RehashMode, Slots, DEFAULT_CAPACITY};
use crate::raw::{self, Slot};
use crate::{Error, KeyHasher, Polynomial};

use std::fmt;

/// A fixed-capacity set of strings, resolving collisions with quadratic probing.
///
/// This is a [`ProbingMap`](crate::ProbingMap) without values, and shares its
/// slot, tombstone and rehash behavior.
///
/// # Examples
///
/// ```
/// use quadmap::ProbingSet;
///
/// let mut set = ProbingSet::new(13)?;
/// assert!(set.insert("powerful")?);
/// assert!(!set.insert("powerful")?);
/// assert!(set.contains("powerful")?);
///
/// assert!(set.remove("powerful")?);
/// assert!(!set.contains("powerful")?);
/// # Ok::<(), quadmap::Error>(())
/// ```
pub struct ProbingSet<H = Polynomial> {
    raw: raw::Table<(), H>,
}

/// A builder for a [`ProbingSet`].
///
/// # Examples
///
/// ```rust
/// use quadmap::{DuplicatePolicy, Polynomial, ProbingSet, RehashMode};
///
/// let set: ProbingSet = ProbingSet::builder()
///     // Set the number of slots, ideally a prime.
///     .capacity(101)
///     // Set the hasher.
///     .hasher(Polynomial::new(31))
///     // Set how repeated keys are handled.
///     .duplicates(DuplicatePolicy::FirstOpen)
///     // Set when tombstones are reclaimed.
///     .rehash_mode(RehashMode::Tombstones)
///     // Construct the set.
///     .build()?;
/// # Ok::<(), quadmap::Error>(())
/// ```
pub struct ProbingSetBuilder<H = Polynomial> {
    hasher: H,
    capacity: usize,
    duplicates: DuplicatePolicy,
    rehash_mode: RehashMode,
}

impl ProbingSetBuilder {
    /// Set the hasher used to find the base slot of a key.
    pub fn hasher<H>(self, hasher: H) -> ProbingSetBuilder<H> {
        ProbingSetBuilder {
            hasher,
            capacity: self.capacity,
            duplicates: self.duplicates,
            rehash_mode: self.rehash_mode,
        }
    }
}

impl<H> ProbingSetBuilder<H> {
    /// Set the number of slots in the set.
    ///
    /// See [`ProbingMapBuilder::capacity`](crate::ProbingMapBuilder::capacity)
    /// for guidance on choosing a capacity.
    pub fn capacity(self, capacity: usize) -> ProbingSetBuilder<H> {
        ProbingSetBuilder { capacity, ..self }
    }

    /// Set how inserts treat keys that may already be present. See
    /// [`DuplicatePolicy`] for details.
    pub fn duplicates(self, duplicates: DuplicatePolicy) -> ProbingSetBuilder<H> {
        ProbingSetBuilder { duplicates, ..self }
    }

    /// Set when tombstones are reclaimed. See [`RehashMode`] for details.
    pub fn rehash_mode(self, rehash_mode: RehashMode) -> ProbingSetBuilder<H> {
        ProbingSetBuilder {
            rehash_mode,
            ..self
        }
    }

    /// Construct a [`ProbingSet`] from the builder, using the configured options.
    pub fn build(self) -> Result<ProbingSet<H>, Error> {
        Ok(ProbingSet {
            raw: raw::Table::new(
                self.capacity,
                self.hasher,
                self.duplicates,
                self.rehash_mode,
            )?,
        })
    }
}

impl<H: fmt::Debug> fmt::Debug for ProbingSetBuilder<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbingSetBuilder")
            .field("hasher", &self.hasher)
            .field("capacity", &self.capacity)
            .field("duplicates", &self.duplicates)
            .field("rehash_mode", &self.rehash_mode)
            .finish()
    }
}

impl ProbingSet {
    /// Creates an empty `ProbingSet` with `capacity` slots and the default
    /// options.
    pub fn new(capacity: usize) -> Result<ProbingSet, Error> {
        ProbingSet::builder().capacity(capacity).build()
    }

    /// Returns a builder for a `ProbingSet`.
    pub fn builder() -> ProbingSetBuilder {
        ProbingSetBuilder {
            hasher: Polynomial::default(),
            capacity: DEFAULT_CAPACITY,
            duplicates: DuplicatePolicy::default(),
            rehash_mode: RehashMode::default(),
        }
    }
}

impl<H> ProbingSet<H> {
    /// Returns the number of keys in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the set holds no keys.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of slots in the set.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Returns the number of tombstones left behind by removals since the
    /// last rehash.
    #[inline]
    pub fn tombstones(&self) -> usize {
        self.raw.tombstones()
    }

    /// Returns a reference to the set's [`KeyHasher`].
    #[inline]
    pub fn hasher(&self) -> &H {
        self.raw.hasher()
    }

    /// Removes every key and tombstone, keeping the allocated slots.
    pub fn clear(&mut self) {
        self.raw.clear()
    }

    /// An iterator visiting all keys in slot order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            raw: self.raw.slots().iter(),
        }
    }

    /// An iterator over the state of every slot, in slot order.
    ///
    /// Occupied slots carry a `()` value.
    pub fn slots(&self) -> Slots<'_, ()> {
        Slots::new(self.raw.slots())
    }
}

impl<H> ProbingSet<H>
where
    H: KeyHasher,
{
    /// Adds a key to the set.
    ///
    /// Returns `true` if the key was not already present.
    pub fn insert(&mut self, key: &str) -> Result<bool, Error> {
        Ok(matches!(self.raw.insert(key, ())?, Insert::Inserted))
    }

    /// Returns `true` if the set contains the key.
    pub fn contains(&self, key: &str) -> Result<bool, Error> {
        Ok(self.raw.get(key)?.is_some())
    }

    /// Returns the stored key equal to `key`, if any.
    pub fn get(&self, key: &str) -> Result<Option<&str>, Error> {
        Ok(self.raw.get(key)?.map(|entry| &*entry.key))
    }

    /// Removes a key from the set, returning `true` if it was present.
    pub fn remove(&mut self, key: &str) -> Result<bool, Error> {
        Ok(self.raw.remove(key)?.is_some())
    }

    /// Rebuilds the slot array at the same capacity, discarding all tombstones.
    ///
    /// See [`ProbingMap::rehash`](crate::ProbingMap::rehash) for details.
    pub fn rehash(&mut self) -> Result<(), Error> {
        self.raw.rehash()
    }
}

impl<H> PartialEq for ProbingSet<H>
where
    H: KeyHasher,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }

        self.iter().all(|key| other.contains(key) == Ok(true))
    }
}

impl<H> Eq for ProbingSet<H> where H: KeyHasher {}

impl<H> fmt::Debug for ProbingSet<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a, H> IntoIterator for &'a ProbingSet<H> {
    type Item = &'a str;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the keys of a [`ProbingSet`].
///
/// This struct is created by the [`iter`](ProbingSet::iter) method on [`ProbingSet`].
pub struct Iter<'a> {
    raw: std::slice::Iter<'a, Slot<()>>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.raw.find_map(|slot| slot.entry()).map(|entry| &*entry.key)
    }
}
