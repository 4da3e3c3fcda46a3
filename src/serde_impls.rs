use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use std::fmt::{self, Formatter};
use std::marker::PhantomData;

use crate::raw::prime_at_least;
use crate::{KeyHasher, ProbingMap, ProbingSet, DEFAULT_CAPACITY};

// Choose a capacity that keeps a deserialized table under half full.
fn capacity_for(len: usize) -> usize {
    prime_at_least(len.saturating_mul(2).saturating_add(1).max(DEFAULT_CAPACITY))
}

struct MapVisitor<V, H> {
    _marker: PhantomData<ProbingMap<V, H>>,
}

impl<V, H> Serialize for ProbingMap<V, H>
where
    V: Serialize,
{
    fn serialize<Sr>(&self, serializer: Sr) -> Result<Sr::Ok, Sr::Error>
    where
        Sr: Serializer,
    {
        serializer.collect_map(self)
    }
}

impl<'de, V, H> Deserialize<'de> for ProbingMap<V, H>
where
    V: Deserialize<'de>,
    H: KeyHasher + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(MapVisitor::new())
    }
}

impl<V, H> MapVisitor<V, H> {
    pub(crate) fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<'de, V, H> Visitor<'de> for MapVisitor<V, H>
where
    V: Deserialize<'de>,
    H: KeyHasher + Default,
{
    type Value = ProbingMap<V, H>;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "a map with string keys")
    }

    fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        // the capacity is fixed, so buffer the entries to size the table
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, V>()? {
            entries.push((key, value));
        }

        let mut map = ProbingMap::builder()
            .hasher(H::default())
            .capacity(capacity_for(entries.len()))
            .build()
            .map_err(de::Error::custom)?;

        for (key, value) in entries {
            map.insert(&key, value).map_err(de::Error::custom)?;
        }

        Ok(map)
    }
}

struct SetVisitor<H> {
    _marker: PhantomData<ProbingSet<H>>,
}

impl<H> Serialize for ProbingSet<H> {
    fn serialize<Sr>(&self, serializer: Sr) -> Result<Sr::Ok, Sr::Error>
    where
        Sr: Serializer,
    {
        serializer.collect_seq(self)
    }
}

impl<'de, H> Deserialize<'de> for ProbingSet<H>
where
    H: KeyHasher + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(SetVisitor::new())
    }
}

impl<H> SetVisitor<H> {
    pub(crate) fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<'de, H> Visitor<'de> for SetVisitor<H>
where
    H: KeyHasher + Default,
{
    type Value = ProbingSet<H>;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "a sequence of strings")
    }

    fn visit_seq<M>(self, mut access: M) -> Result<Self::Value, M::Error>
    where
        M: SeqAccess<'de>,
    {
        let mut keys = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(key) = access.next_element::<String>()? {
            keys.push(key);
        }

        let mut set = ProbingSet::builder()
            .hasher(H::default())
            .capacity(capacity_for(keys.len()))
            .build()
            .map_err(de::Error::custom)?;

        for key in keys {
            set.insert(&key).map_err(de::Error::custom)?;
        }

        Ok(set)
    }
}

#[cfg(test)]
mod test {
    use crate::{ProbingMap, ProbingSet};

    #[test]
    fn test_map() {
        let mut map: ProbingMap<u8> = ProbingMap::new(13).unwrap();

        map.insert("powerful", 4).unwrap();
        map.insert("firefight", 3).unwrap();
        map.insert("waterpark", 2).unwrap();
        map.insert("pokemon", 1).unwrap();
        map.insert("hello", 0).unwrap();
        map.remove("hello").unwrap();

        let serialized = serde_json::to_string(&map).unwrap();
        let deserialized: ProbingMap<u8> = serde_json::from_str(&serialized).unwrap();

        assert_eq!(map, deserialized);
        assert_eq!(deserialized.tombstones(), 0);
    }

    #[test]
    fn test_set() {
        let mut set = ProbingSet::new(13).unwrap();

        set.insert("powerful").unwrap();
        set.insert("firefight").unwrap();
        set.insert("waterpark").unwrap();

        let serialized = serde_json::to_string(&set).unwrap();
        let deserialized: ProbingSet = serde_json::from_str(&serialized).unwrap();

        assert_eq!(set, deserialized);
    }

    #[test]
    fn sized_for_input() {
        let keys: Vec<String> = (0..40).map(|i| format!("key{i}")).collect();
        let json = serde_json::to_string(&keys).unwrap();

        let set: ProbingSet = serde_json::from_str(&json).unwrap();
        assert_eq!(set.len(), 40);
        assert!(set.capacity() >= 81);
    }

    #[test]
    fn rejects_empty_key() {
        let result = serde_json::from_str::<ProbingMap<u8>>(r#"{"": 1}"#);
        assert!(result.is_err());
    }
}
