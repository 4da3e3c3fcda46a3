use crate::raw::{self, Slot};
use crate::{Error, KeyHasher, Polynomial};

use std::fmt;
use std::marker::PhantomData;

/// The capacity used by [`ProbingMapBuilder`] when none is configured.
pub const DEFAULT_CAPACITY: usize = 13;

/// A fixed-capacity hash map from string keys to values, resolving collisions
/// with quadratic probing.
///
/// The map owns a single array of `capacity` slots. Removing an entry leaves a
/// tombstone behind so that probe sequences passing through the slot keep
/// working, and the tombstones are reclaimed by a [`rehash`](ProbingMap::rehash),
/// which is triggered automatically once they dominate the table (see
/// [`RehashMode`]). The capacity never changes.
///
/// # Examples
///
/// ```
/// use quadmap::{Insert, ProbingMap};
///
/// let mut map = ProbingMap::new(13)?;
/// assert_eq!(map.insert("powerful", 1)?, Insert::Inserted);
/// assert_eq!(map.insert("powerful", 2)?, Insert::Updated(1));
/// assert_eq!(map.get("powerful")?, Some(&2));
///
/// assert_eq!(map.remove("powerful")?, Some(2));
/// assert_eq!(map.tombstones(), 1);
/// # Ok::<(), quadmap::Error>(())
/// ```
pub struct ProbingMap<V, H = Polynomial> {
    raw: raw::Table<V, H>,
}

/// The outcome of a successful insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insert<V> {
    /// The key was not present and now occupies a fresh slot.
    Inserted,
    /// The key was present. Its value was replaced and the old value is returned.
    Updated(V),
}

impl<V> Insert<V> {
    /// Returns `true` if the key was newly inserted.
    pub fn is_inserted(&self) -> bool {
        matches!(self, Insert::Inserted)
    }
}

/// How an insert treats a key that may already be present.
///
/// The two policies differ only once tombstones are involved. A key inserted
/// after a tombstone in its probe sequence lives past that tombstone, and
/// after a later insert of the same key the policies disagree on whether the
/// tombstone or the existing entry wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Scan the probe sequence up to the first empty slot for the key before
    /// claiming an open slot. Keys are always unique.
    ///
    /// This is the default policy.
    #[default]
    Unique,
    /// Take the first slot that is empty, a tombstone, or already holds the key.
    ///
    /// Inserts touch fewer slots, but a key reachable only past a tombstone
    /// can end up stored twice. [`ProbingMap::len`] counts both copies and a
    /// removal only removes the first one.
    FirstOpen,
}

/// When tombstones are reclaimed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RehashMode {
    /// Rehash at the start of an insert once tombstones outnumber live entries
    /// and together they occupy more than half of the table.
    ///
    /// This is the default mode.
    #[default]
    Tombstones,
    /// Never rehash automatically, only through [`ProbingMap::rehash`].
    Manual,
}

/// A builder for a [`ProbingMap`].
///
/// # Examples
///
/// ```rust
/// use quadmap::{DuplicatePolicy, Polynomial, ProbingMap, RehashMode};
///
/// let map: ProbingMap<i32> = ProbingMap::builder()
///     // Set the number of slots, ideally a prime.
///     .capacity(101)
///     // Set the hasher.
///     .hasher(Polynomial::new(31))
///     // Set how repeated keys are handled.
///     .duplicates(DuplicatePolicy::Unique)
///     // Set when tombstones are reclaimed.
///     .rehash_mode(RehashMode::Manual)
///     // Construct the map.
///     .build()?;
/// # Ok::<(), quadmap::Error>(())
/// ```
pub struct ProbingMapBuilder<V, H = Polynomial> {
    hasher: H,
    capacity: usize,
    duplicates: DuplicatePolicy,
    rehash_mode: RehashMode,
    _v: PhantomData<V>,
}

impl<V> ProbingMapBuilder<V> {
    /// Set the hasher used to find the base slot of a key.
    pub fn hasher<H>(self, hasher: H) -> ProbingMapBuilder<V, H> {
        ProbingMapBuilder {
            hasher,
            capacity: self.capacity,
            duplicates: self.duplicates,
            rehash_mode: self.rehash_mode,
            _v: PhantomData,
        }
    }
}

impl<V, H> ProbingMapBuilder<V, H> {
    /// Set the number of slots in the map.
    ///
    /// The capacity is fixed for the lifetime of the map. Quadratic probing
    /// only reaches every other slot of a prime-sized table, and fewer for
    /// other sizes, so a prime of at least twice the expected number of
    /// entries is recommended.
    pub fn capacity(self, capacity: usize) -> ProbingMapBuilder<V, H> {
        ProbingMapBuilder { capacity, ..self }
    }

    /// Set how inserts treat keys that may already be present. See
    /// [`DuplicatePolicy`] for details.
    pub fn duplicates(self, duplicates: DuplicatePolicy) -> ProbingMapBuilder<V, H> {
        ProbingMapBuilder { duplicates, ..self }
    }

    /// Set when tombstones are reclaimed. See [`RehashMode`] for details.
    pub fn rehash_mode(self, rehash_mode: RehashMode) -> ProbingMapBuilder<V, H> {
        ProbingMapBuilder {
            rehash_mode,
            ..self
        }
    }

    /// Construct a [`ProbingMap`] from the builder, using the configured options.
    ///
    /// Fails with [`Error::InvalidArgument`] if the capacity is zero, or
    /// [`Error::OutOfMemory`] if the slot array cannot be allocated.
    pub fn build(self) -> Result<ProbingMap<V, H>, Error> {
        Ok(ProbingMap {
            raw: raw::Table::new(
                self.capacity,
                self.hasher,
                self.duplicates,
                self.rehash_mode,
            )?,
        })
    }
}

impl<V, H: fmt::Debug> fmt::Debug for ProbingMapBuilder<V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbingMapBuilder")
            .field("hasher", &self.hasher)
            .field("capacity", &self.capacity)
            .field("duplicates", &self.duplicates)
            .field("rehash_mode", &self.rehash_mode)
            .finish()
    }
}

impl<V> ProbingMap<V> {
    /// Creates an empty `ProbingMap` with `capacity` slots and the default
    /// options.
    ///
    /// # Examples
    ///
    /// ```
    /// use quadmap::ProbingMap;
    ///
    /// let map: ProbingMap<i32> = ProbingMap::new(13)?;
    /// assert_eq!(map.capacity(), 13);
    /// # Ok::<(), quadmap::Error>(())
    /// ```
    pub fn new(capacity: usize) -> Result<ProbingMap<V>, Error> {
        ProbingMap::builder().capacity(capacity).build()
    }

    /// Returns a builder for a `ProbingMap`.
    ///
    /// The builder can be used for more complex configuration, such as using
    /// a custom [`KeyHasher`] or [`DuplicatePolicy`].
    pub fn builder() -> ProbingMapBuilder<V> {
        ProbingMapBuilder {
            hasher: Polynomial::default(),
            capacity: DEFAULT_CAPACITY,
            duplicates: DuplicatePolicy::default(),
            rehash_mode: RehashMode::default(),
            _v: PhantomData,
        }
    }
}

impl<V, H> ProbingMap<V, H> {
    /// Returns the number of live entries in the map.
    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map holds no live entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of slots in the map.
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

    /// Returns a reference to the map's [`KeyHasher`].
    #[inline]
    pub fn hasher(&self) -> &H {
        self.raw.hasher()
    }

    /// Returns the configured [`DuplicatePolicy`].
    #[inline]
    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        self.raw.duplicates()
    }

    /// Returns the configured [`RehashMode`].
    #[inline]
    pub fn rehash_mode(&self) -> RehashMode {
        self.raw.rehash_mode()
    }

    /// Removes every entry and tombstone, keeping the allocated slots.
    pub fn clear(&mut self) {
        self.raw.clear()
    }

    /// An iterator visiting all live entries in slot order.
    ///
    /// # Examples
    ///
    /// ```
    /// use quadmap::ProbingMap;
    ///
    /// let mut map = ProbingMap::new(13)?;
    /// map.insert("a", 1)?;
    /// map.insert("b", 2)?;
    ///
    /// let mut entries: Vec<_> = map.iter().collect();
    /// entries.sort();
    /// assert_eq!(entries, [("a", &1), ("b", &2)]);
    /// # Ok::<(), quadmap::Error>(())
    /// ```
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            raw: self.raw.slots().iter(),
        }
    }

    /// An iterator visiting all keys in slot order.
    pub fn keys(&self) -> Keys<'_, V> {
        Keys { iter: self.iter() }
    }

    /// An iterator visiting all values in slot order.
    pub fn values(&self) -> Values<'_, V> {
        Values { iter: self.iter() }
    }

    /// An iterator over the state of every slot, in index order.
    ///
    /// This exposes the physical layout of the table, which is useful for
    /// inspecting clustering and tombstone buildup.
    ///
    /// # Examples
    ///
    /// ```
    /// use quadmap::{ProbingMap, SlotState};
    ///
    /// let mut map = ProbingMap::new(7)?;
    /// map.insert("a", ())?;
    /// map.remove("a")?;
    ///
    /// // 'a' is 97, and 97 mod 7 = 6
    /// assert_eq!(map.slots().nth(6), Some(SlotState::Tombstone));
    /// assert!(map.slots().take(6).all(|slot| slot == SlotState::Empty));
    /// # Ok::<(), quadmap::Error>(())
    /// ```
    pub fn slots(&self) -> Slots<'_, V> {
        Slots::new(self.raw.slots())
    }
}

impl<V, H> ProbingMap<V, H>
where
    H: KeyHasher,
{
    /// Inserts a key-value pair into the map.
    ///
    /// If the key was present, its value is replaced and the old value is
    /// returned in [`Insert::Updated`]. An insert may first rehash the table,
    /// depending on the configured [`RehashMode`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for an empty key, and
    /// [`Error::TableFull`] if no open slot is reachable within `capacity`
    /// probes. In both cases the map is unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use quadmap::{Insert, ProbingMap};
    ///
    /// let mut map = ProbingMap::new(13)?;
    /// assert_eq!(map.insert("waterpark", 37)?, Insert::Inserted);
    /// assert!(map.insert("", 0).is_err());
    /// # Ok::<(), quadmap::Error>(())
    /// ```
    pub fn insert(&mut self, key: &str, value: V) -> Result<Insert<V>, Error> {
        self.raw.insert(key, value)
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use quadmap::ProbingMap;
    ///
    /// let mut map = ProbingMap::new(13)?;
    /// map.insert("firefight", 1)?;
    /// assert_eq!(map.get("firefight")?, Some(&1));
    /// assert_eq!(map.get("pokemon")?, None);
    /// # Ok::<(), quadmap::Error>(())
    /// ```
    pub fn get(&self, key: &str) -> Result<Option<&V>, Error> {
        Ok(self.raw.get(key)?.map(|entry| &entry.value))
    }

    /// Returns the stored key and a reference to its value.
    pub fn get_key_value(&self, key: &str) -> Result<Option<(&str, &V)>, Error> {
        Ok(self.raw.get(key)?.map(|entry| (&*entry.key, &entry.value)))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &str) -> Result<Option<&mut V>, Error> {
        self.raw.get_mut(key)
    }

    /// Returns `true` if the map contains a live entry for the key.
    pub fn contains_key(&self, key: &str) -> Result<bool, Error> {
        Ok(self.raw.get(key)?.is_some())
    }

    /// Removes a key from the map, returning its value if it was present.
    ///
    /// The slot becomes a tombstone until the next rehash.
    ///
    /// # Examples
    ///
    /// ```
    /// use quadmap::ProbingMap;
    ///
    /// let mut map = ProbingMap::new(13)?;
    /// map.insert("powerful", 1)?;
    /// assert_eq!(map.remove("powerful")?, Some(1));
    /// assert_eq!(map.remove("powerful")?, None);
    /// # Ok::<(), quadmap::Error>(())
    /// ```
    pub fn remove(&mut self, key: &str) -> Result<Option<V>, Error> {
        Ok(self.raw.remove(key)?.map(|entry| entry.value))
    }

    /// Removes a key from the map, returning the stored key and value if it
    /// was present.
    pub fn remove_entry(&mut self, key: &str) -> Result<Option<(Box<str>, V)>, Error> {
        Ok(self.raw.remove(key)?.map(|entry| (entry.key, entry.value)))
    }

    /// Rebuilds the slot array at the same capacity, discarding all tombstones.
    ///
    /// Every live entry is re-inserted in slot order, so entries may move.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfMemory`] if the new array cannot be allocated,
    /// or [`Error::TableFull`] if the probe sequences of a capacity with poor
    /// coverage (such as a power of two) cannot reach an empty slot for some
    /// entry. The map is unchanged in either case.
    ///
    /// # Examples
    ///
    /// ```
    /// use quadmap::ProbingMap;
    ///
    /// let mut map = ProbingMap::new(13)?;
    /// map.insert("powerful", 1)?;
    /// map.insert("firefight", 2)?;
    /// map.remove("powerful")?;
    ///
    /// map.rehash()?;
    /// assert_eq!(map.tombstones(), 0);
    /// assert_eq!(map.get("firefight")?, Some(&2));
    /// # Ok::<(), quadmap::Error>(())
    /// ```
    pub fn rehash(&mut self) -> Result<(), Error> {
        self.raw.rehash()
    }
}

impl<V, H> PartialEq for ProbingMap<V, H>
where
    V: PartialEq,
    H: KeyHasher,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }

        self.iter()
            .all(|(key, value)| other.get(key) == Ok(Some(value)))
    }
}

impl<V, H> Eq for ProbingMap<V, H>
where
    V: Eq,
    H: KeyHasher,
{
}

impl<V, H> fmt::Debug for ProbingMap<V, H>
where
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, V, H> IntoIterator for &'a ProbingMap<V, H> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// The state of a single slot, as returned by [`ProbingMap::slots`] and
/// [`ProbingSet::slots`](crate::ProbingSet::slots).
#[derive(Debug, PartialEq, Eq)]
pub enum SlotState<'a, V> {
    /// The slot has not been used since the last rehash.
    Empty,
    /// The slot holds a live entry.
    Occupied(&'a str, &'a V),
    /// The slot held an entry that has since been removed.
    Tombstone,
}

// Only references are held, so no bound on `V` is needed.
impl<V> Clone for SlotState<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for SlotState<'_, V> {}

/// An iterator over the entries of a [`ProbingMap`].
///
/// This struct is created by the [`iter`](ProbingMap::iter) method on [`ProbingMap`].
pub struct Iter<'a, V> {
    raw: std::slice::Iter<'a, Slot<V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.raw
            .find_map(|slot| slot.entry())
            .map(|entry| (&*entry.key, &entry.value))
    }
}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Iter {
            raw: self.raw.clone(),
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for Iter<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An iterator over the keys of a [`ProbingMap`].
///
/// This struct is created by the [`keys`](ProbingMap::keys) method on [`ProbingMap`].
pub struct Keys<'a, V> {
    iter: Iter<'a, V>,
}

impl<'a, V> Iterator for Keys<'a, V> {
    type Item = &'a str;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let (key, _) = self.iter.next()?;
        Some(key)
    }
}

/// An iterator over the values of a [`ProbingMap`].
///
/// This struct is created by the [`values`](ProbingMap::values) method on [`ProbingMap`].
pub struct Values<'a, V> {
    iter: Iter<'a, V>,
}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let (_, value) = self.iter.next()?;
        Some(value)
    }
}

/// An iterator over the slot states of a [`ProbingMap`].
///
/// This struct is created by the [`slots`](ProbingMap::slots) method on [`ProbingMap`]
/// and the [`slots`](crate::ProbingSet::slots) method on [`ProbingSet`](crate::ProbingSet).
pub struct Slots<'a, V> {
    raw: std::slice::Iter<'a, Slot<V>>,
}

impl<'a, V> Slots<'a, V> {
    pub(crate) fn new(slots: &'a [Slot<V>]) -> Slots<'a, V> {
        Slots { raw: slots.iter() }
    }
}

impl<'a, V> Iterator for Slots<'a, V> {
    type Item = SlotState<'a, V>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        Some(match self.raw.next()? {
            Slot::Empty => SlotState::Empty,
            Slot::Occupied(entry) => SlotState::Occupied(&*entry.key, &entry.value),
            Slot::Tombstone => SlotState::Tombstone,
        })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.raw.size_hint()
    }
}

impl<V> ExactSizeIterator for Slots<'_, V> {}
