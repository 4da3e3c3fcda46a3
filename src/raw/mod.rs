mod alloc;
mod probe;

use std::mem;

use self::probe::Probe;
use crate::map::{DuplicatePolicy, Insert, RehashMode};
use crate::{Error, KeyHasher};

pub use alloc::{Entry, Slot};

#[cfg(feature = "serde")]
pub use alloc::prime_at_least;

// An open-addressing table over a fixed number of slots.
//
// Invariants:
// - `live` and `tombstones` count the occupied and tombstone slots.
// - every occupied slot is reachable from its key's base index within
//   `capacity` probe steps, without crossing an empty slot.
pub struct Table<V, H> {
    slots: Vec<Slot<V>>,
    live: usize,
    tombstones: usize,
    hasher: H,
    duplicates: DuplicatePolicy,
    rehash_mode: RehashMode,
}

// Keys are opaque, but the empty key is rejected rather than hashed.
#[inline]
fn validate(key: &str) -> Result<(), Error> {
    if key.is_empty() {
        return Err(Error::InvalidArgument("key must not be empty"));
    }

    Ok(())
}

impl<V, H> Table<V, H> {
    pub fn new(
        capacity: usize,
        hasher: H,
        duplicates: DuplicatePolicy,
        rehash_mode: RehashMode,
    ) -> Result<Table<V, H>, Error> {
        if capacity == 0 {
            return Err(Error::InvalidArgument("capacity must be at least one"));
        }

        Ok(Table {
            slots: alloc::slots(capacity)?,
            live: 0,
            tombstones: 0,
            hasher,
            duplicates,
            rehash_mode,
        })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    #[inline]
    pub fn slots(&self) -> &[Slot<V>] {
        &self.slots
    }

    #[inline]
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    #[inline]
    pub fn duplicates(&self) -> DuplicatePolicy {
        self.duplicates
    }

    #[inline]
    pub fn rehash_mode(&self) -> RehashMode {
        self.rehash_mode
    }

    // Reset every slot to empty, dropping all entries.
    pub fn clear(&mut self) {
        self.slots.fill_with(Slot::default);
        self.live = 0;
        self.tombstones = 0;
    }

    // Whether tombstones outnumber live entries and together they fill more
    // than half of the table.
    #[inline]
    pub fn needs_rehash(&self) -> bool {
        self.tombstones > self.live && self.tombstones + self.live > self.capacity() / 2
    }
}

impl<V, H> Table<V, H>
where
    H: KeyHasher,
{
    // Returns the start of the probe sequence for `key`.
    #[inline]
    fn probe(&self, key: &str) -> (Probe, usize) {
        let capacity = self.capacity();

        // reduce again so a misbehaving hasher cannot index out of bounds
        let base = self.hasher.hash(key, capacity) % capacity;
        Probe::start(base, capacity)
    }

    // Returns the index of the first live slot holding `key`.
    fn find(&self, key: &str) -> Option<usize> {
        let (mut probe, limit) = self.probe(key);

        while probe.len < limit {
            match &self.slots[probe.i] {
                // an empty slot ends every probe sequence that could contain the key
                Slot::Empty => return None,
                slot if slot.holds(key) => return Some(probe.i),
                // a tombstone or another key, keep searching
                _ => {}
            }

            probe.next();
        }

        None
    }

    // Returns the slot an insert of `key` should write to: either the slot
    // already holding the key, or an open slot.
    fn find_insert_slot(&self, key: &str) -> Option<usize> {
        let (mut probe, limit) = self.probe(key);

        // the first tombstone seen, reused if the key turns out to be absent
        let mut reusable = None;

        while probe.len < limit {
            match &self.slots[probe.i] {
                Slot::Empty => return Some(reusable.unwrap_or(probe.i)),
                Slot::Tombstone => match self.duplicates {
                    DuplicatePolicy::FirstOpen => return Some(probe.i),
                    DuplicatePolicy::Unique => {
                        reusable.get_or_insert(probe.i);
                    }
                },
                slot if slot.holds(key) => return Some(probe.i),
                Slot::Occupied(_) => {}
            }

            probe.next();
        }

        reusable
    }

    pub fn get(&self, key: &str) -> Result<Option<&Entry<V>>, Error> {
        validate(key)?;
        Ok(self.find(key).and_then(|i| self.slots[i].entry()))
    }

    pub fn get_mut(&mut self, key: &str) -> Result<Option<&mut V>, Error> {
        validate(key)?;

        match self.find(key) {
            Some(i) => match &mut self.slots[i] {
                Slot::Occupied(entry) => Ok(Some(&mut entry.value)),
                _ => Ok(None),
            },
            None => Ok(None),
        }
    }

    pub fn insert(&mut self, key: &str, value: V) -> Result<Insert<V>, Error> {
        validate(key)?;

        if self.rehash_mode == RehashMode::Tombstones && self.needs_rehash() {
            match self.rehash() {
                Ok(()) => {}
                // the current layout is still consistent, keep using it
                Err(Error::TableFull { .. }) => {
                    log::warn!(
                        "automatic rehash could not place every entry, continuing with {} tombstones",
                        self.tombstones
                    );
                }
                Err(err) => return Err(err),
            }
        }

        let Some(i) = self.find_insert_slot(key) else {
            log::trace!("no open slot for {key:?} within {} probes", self.capacity());
            return Err(Error::TableFull {
                capacity: self.capacity(),
            });
        };

        match &mut self.slots[i] {
            Slot::Occupied(entry) => Ok(Insert::Updated(mem::replace(&mut entry.value, value))),
            slot => {
                if matches!(slot, Slot::Tombstone) {
                    self.tombstones -= 1;
                }

                *slot = Slot::Occupied(Entry {
                    key: key.into(),
                    value,
                });
                self.live += 1;

                Ok(Insert::Inserted)
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Result<Option<Entry<V>>, Error> {
        validate(key)?;

        let Some(i) = self.find(key) else {
            return Ok(None);
        };

        let entry = self.slots[i].bury();
        if entry.is_some() {
            self.live -= 1;
            self.tombstones += 1;
        }

        Ok(entry)
    }

    // Rebuild the slot array at the same capacity, dropping all tombstones.
    //
    // Live entries are re-inserted in slot order. The placement is computed
    // and the new array allocated before the table is modified, so on error
    // the table is unchanged.
    pub fn rehash(&mut self) -> Result<(), Error> {
        let capacity = self.capacity();

        // `sources[j]` is the old index of the entry that moves to slot `j`
        let mut sources = alloc::filled(capacity, None::<usize>)?;

        'entries: for (old, slot) in self.slots.iter().enumerate() {
            let Some(entry) = slot.entry() else {
                continue;
            };

            let (mut probe, limit) = self.probe(&entry.key);
            while probe.len < limit {
                let source = &mut sources[probe.i];
                if source.is_none() {
                    *source = Some(old);
                    continue 'entries;
                }

                probe.next();
            }

            // only possible when the capacity leaves parts of the table unreachable
            log::trace!("rehash could not place {:?} within {capacity} probes", entry.key);
            return Err(Error::TableFull { capacity });
        }

        let mut slots = alloc::slots(capacity)?;
        for (new, source) in sources.into_iter().enumerate() {
            if let Some(old) = source {
                slots[new] = mem::take(&mut self.slots[old]);
            }
        }

        log::debug!(
            "rehashed {} live entries, dropped {} tombstones",
            self.live,
            self.tombstones
        );

        self.slots = slots;
        self.tombstones = 0;
        Ok(())
    }
}
