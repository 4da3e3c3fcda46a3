/// The multiplier used by the default [`Polynomial`] hasher.
pub const DEFAULT_MULTIPLIER: usize = 37;

/// Maps a key to a base slot index.
///
/// Implementations must be deterministic and must return an index in
/// `[0, capacity)` for any `capacity > 0`. The table never calls `hash` with
/// an empty key or a zero capacity.
pub trait KeyHasher {
    /// Returns the base index of `key` in a table with `capacity` slots.
    fn hash(&self, key: &str, capacity: usize) -> usize;
}

/// A polynomial rolling hash over the characters of a key.
///
/// For each character `c`, `h = (h * multiplier + c) mod capacity`. This is
/// fast and not collision resistant; tables built with it should use a prime
/// capacity to keep quadratic probing from clustering.
///
/// # Examples
///
/// ```
/// use quadmap::{KeyHasher, Polynomial};
///
/// let hasher = Polynomial::default();
/// assert_eq!(hasher.hash("a", 13), 97 % 13);
/// assert!(hasher.hash("powerful", 13) < 13);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Polynomial {
    multiplier: usize,
}

impl Polynomial {
    /// Creates a hasher with the given multiplier.
    ///
    /// The multiplier should be a small odd number.
    pub const fn new(multiplier: usize) -> Polynomial {
        Polynomial { multiplier }
    }

    /// Returns the multiplier of this hasher.
    pub const fn multiplier(&self) -> usize {
        self.multiplier
    }
}

impl Default for Polynomial {
    fn default() -> Self {
        Polynomial::new(DEFAULT_MULTIPLIER)
    }
}

impl KeyHasher for Polynomial {
    #[inline]
    fn hash(&self, key: &str, capacity: usize) -> usize {
        debug_assert!(capacity > 0);

        // widen so that `h * multiplier + c` cannot overflow for any capacity
        let capacity = capacity as u128;
        let multiplier = self.multiplier as u128;

        key.chars().fold(0u128, |h, c| {
            (h * multiplier + u128::from(u32::from(c))) % capacity
        }) as usize
    }
}

impl<H: KeyHasher + ?Sized> KeyHasher for &H {
    #[inline]
    fn hash(&self, key: &str, capacity: usize) -> usize {
        (**self).hash(key, capacity)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn matches_rolling_definition() {
        let hasher = Polynomial::default();
        let capacity = 13;

        let mut expected = 0;
        for c in "firefight".chars() {
            expected = (expected * 37 + c as usize) % capacity;
        }

        assert_eq!(hasher.hash("firefight", capacity), expected);
    }

    #[test]
    fn in_range() {
        let hasher = Polynomial::new(31);
        for capacity in [1, 2, 7, 13, 64, 997] {
            for key in ["a", "powerful", "waterpark", "ünïcödé", "🦀🦀🦀"] {
                assert!(hasher.hash(key, capacity) < capacity);
            }
        }
    }

    #[test]
    fn capacity_one() {
        assert_eq!(Polynomial::default().hash("anything", 1), 0);
    }

    #[test]
    fn huge_capacity() {
        let hasher = Polynomial::new(usize::MAX);
        let capacity = usize::MAX;
        assert!(hasher.hash("overflow", capacity) < capacity);
    }

    #[test]
    fn deterministic() {
        let hasher = Polynomial::default();
        assert_eq!(hasher.hash("pokemon", 101), hasher.hash("pokemon", 101));
    }
}
