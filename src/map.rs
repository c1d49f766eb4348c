use std::{borrow::Borrow, fmt, hash::Hash};

use crate::{
    ResizePolicy, TableConfig, TableError,
    table::{Cursor, Iter, RawTable, TableStats},
};

/// A hash map resolving collisions by separate chaining.
///
/// Each bucket holds a chain of the entries whose keys hash to it; keys are
/// told apart by equality, so colliding hashes are expected and harmless. The
/// bucket array doubles when the average chain length would exceed the load
/// factor threshold (3.0 by default) and never shrinks.
///
/// Note: this implementation is not thread-safe and holds no locks. Shared
/// access across threads needs external synchronization.
///
/// ```rust
/// use chaintable::ChainedHashMap;
///
/// let mut map = ChainedHashMap::new();
/// assert_eq!(map.put(5, "a"), None);
/// assert_eq!(map.put(5, "b"), Some("a"));
/// assert_eq!(map.get(&5), Some(&"b"));
/// assert_eq!(map.len(), 1);
/// ```
#[derive(Clone)]
pub struct ChainedHashMap<K, V> {
    /// The shared bucket engine
    table: RawTable<K, V>,
}

impl<K, V> Default for ChainedHashMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for ChainedHashMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> ChainedHashMap<K, V> {
    /// Creates an empty map with 16 buckets and a load factor threshold of 3.0
    #[must_use]
    pub fn new() -> Self {
        Self { table: RawTable::new() }
    }

    /// Creates an empty map from explicit parameters
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidArgument`] if the configuration is invalid,
    /// or [`TableError::ResourceExhausted`] if the buckets cannot be allocated.
    pub fn with_config(config: TableConfig) -> Result<Self, TableError> {
        Ok(Self { table: RawTable::with_config(config)? })
    }

    /// Returns the number of entries in the map
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns true if the map holds no entry
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// Returns the number of buckets
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.table.bucket_count()
    }

    /// Returns the number of buckets holding no entry
    #[must_use]
    pub fn empty_buckets(&self) -> usize {
        self.table.empty_buckets()
    }

    /// Returns the length of the longest collision chain
    #[must_use]
    pub fn largest_chain(&self) -> usize {
        self.table.largest_chain()
    }

    /// Returns the current load factor of the map
    #[must_use]
    pub fn load_factor(&self) -> f64 {
        self.table.load_factor()
    }

    /// Returns the resize policy in force
    #[must_use]
    pub fn policy(&self) -> ResizePolicy {
        self.table.policy()
    }

    /// Collects every diagnostic in one pass over the buckets
    #[must_use]
    pub fn stats(&self) -> TableStats {
        self.table.stats()
    }

    /// Returns an iterator over the key-value pairs, in unspecified order
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.table.iter()
    }

    /// Returns a cursor that can outlive borrows of the map.
    ///
    /// See [`Cursor`] for the invalidation rules.
    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.table.cursor()
    }

    /// Yields the next pair for `cursor`
    ///
    /// # Errors
    ///
    /// Returns [`TableError::IteratorInvalidated`] if the cursor came from
    /// another map, or this map gained or lost an entry or was resized since
    /// the cursor was created.
    pub fn advance(&self, cursor: &mut Cursor) -> Result<Option<(&K, &V)>, TableError> {
        self.table.advance(cursor)
    }

    /// Whether `cursor` has another pair to yield
    ///
    /// # Errors
    ///
    /// Same as [`ChainedHashMap::advance`].
    pub fn has_next(&self, cursor: &Cursor) -> Result<bool, TableError> {
        self.table.has_next(cursor)
    }

    /// Clears the map, removing all key-value pairs. The bucket count is kept.
    pub fn clear(&mut self) {
        self.table.clear();
    }
}

impl<K: Eq + Hash, V> ChainedHashMap<K, V> {
    /// Associates `value` with `key`.
    ///
    /// Returns the previous value when the key was present, in which case the
    /// stored key is kept and only the value replaced. Allocation failure while
    /// growing aborts the process, as it does for `std` collections.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        self.table.insert(key, value)
    }

    /// Fallible [`ChainedHashMap::put`]
    ///
    /// # Errors
    ///
    /// Returns [`TableError::ResourceExhausted`] if growing the map fails; the
    /// map is left unchanged and `key` is not inserted.
    pub fn try_put(&mut self, key: K, value: V) -> Result<Option<V>, TableError> {
        self.table.try_insert(key, value)
    }

    /// Retrieve a value for a given key
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table.get(key)
    }

    /// Retrieve the stored key and its value
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table.get_key_value(key)
    }

    /// Get a mutable reference to a value for a given key
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table.get_mut(key)
    }

    /// Returns true if the map contains the given key
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table.contains_key(key)
    }

    /// Removes a key from the map, returning its value if it was present
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table.remove(key)
    }
}

impl<K: Eq + Hash, V> Extend<(K, V)> for ChainedHashMap<K, V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<K: Eq + Hash, V> FromIterator<(K, V)> for ChainedHashMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<'a, K, V> IntoIterator for &'a ChainedHashMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_and_get() {
        let mut map = ChainedHashMap::new();
        assert_eq!(map.put("key1".to_string(), 1), None);
        assert_eq!(map.put("key2".to_string(), 2), None);
        assert_eq!(map.put("key3".to_string(), 3), None);

        assert_eq!(map.get("key1"), Some(&1));
        assert_eq!(map.get("key2"), Some(&2));
        assert_eq!(map.get("key3"), Some(&3));
        assert_eq!(map.get("key4"), None);
    }

    #[test]
    fn test_update_returns_previous() {
        let mut map = ChainedHashMap::new();
        assert_eq!(map.put(5, "a"), None);
        assert_eq!(map.put(5, "b"), Some("a"));
        assert_eq!(map.get(&5), Some(&"b"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut map = ChainedHashMap::new();
        map.put("key1".to_string(), 1);
        map.put("key2".to_string(), 2);

        assert_eq!(map.remove("key1"), Some(1));
        assert_eq!(map.get("key1"), None);
        assert_eq!(map.get("key2"), Some(&2));
        assert_eq!(map.remove("key1"), None);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_hundred_thousand_keys() {
        let mut map = ChainedHashMap::new();
        for key in 1..=100_000_u32 {
            map.put(key, key);
        }
        assert_eq!(map.len(), 100_000);
        let buckets = map.bucket_count();
        assert!(buckets.is_power_of_two());
        assert!(buckets >= 100_000 / 3);
        assert!(map.load_factor() <= 3.0);
        assert_eq!(map.get(&77_777), Some(&77_777));
    }

    #[test]
    fn test_removal_never_shrinks() {
        let mut map = ChainedHashMap::new();
        for key in 0..1_000_u32 {
            map.put(key, ());
        }
        let buckets = map.bucket_count();
        for key in 1..1_000_u32 {
            assert_eq!(map.remove(&key), Some(()));
            assert_eq!(map.bucket_count(), buckets);
            assert_eq!(map.len(), 1_000 - key as usize);
        }
        assert_eq!(map.len(), 1);
        assert!(map.contains_key(&0));
    }

    #[test]
    fn test_resize_keeps_entries() {
        let config = TableConfig::default().initial_buckets(2).load_factor_threshold(1.0);
        let mut map = ChainedHashMap::with_config(config).unwrap();
        map.put("key1".to_string(), 1);
        map.put("key2".to_string(), 2);
        assert_eq!(map.bucket_count(), 2);

        map.put("key3".to_string(), 3);
        assert_eq!(map.bucket_count(), 4);
        assert_eq!(map.get("key1"), Some(&1));
        assert_eq!(map.get("key2"), Some(&2));
        assert_eq!(map.get("key3"), Some(&3));
    }

    #[test]
    fn test_len_and_is_empty() {
        let mut map = ChainedHashMap::new();
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);

        map.put("key1".to_string(), 1);
        assert!(!map.is_empty());
        assert_eq!(map.len(), 1);

        map.remove("key1");
        assert!(map.is_empty());
    }

    #[test]
    fn test_get_mut_and_contains() {
        let mut map = ChainedHashMap::new();
        map.put("key1".to_string(), 1);

        if let Some(value) = map.get_mut("key1") {
            *value += 10;
        }

        assert_eq!(map.get("key1"), Some(&11));
        assert!(map.contains_key("key1"));
        assert!(!map.contains_key("key2"));
        assert_eq!(map.get_key_value("key1"), Some((&"key1".to_string(), &11)));
    }

    #[test]
    fn test_try_put() {
        let mut map = ChainedHashMap::new();
        assert_eq!(map.try_put(1, 'x'), Ok(None));
        assert_eq!(map.try_put(1, 'y'), Ok(Some('x')));
    }

    #[test]
    fn test_iter_and_collect() {
        let map: ChainedHashMap<u32, u32> = (0..10).map(|i| (i, i * i)).collect();
        let mut pairs: Vec<(u32, u32)> = map.iter().map(|(k, v)| (*k, *v)).collect();
        pairs.sort_unstable();
        assert_eq!(pairs, (0..10).map(|i| (i, i * i)).collect::<Vec<_>>());

        let sum: u32 = (&map).into_iter().map(|(_, v)| v).sum();
        assert_eq!(sum, 285);
    }

    #[test]
    fn test_cursor_survives_value_update() {
        let mut map = ChainedHashMap::new();
        map.put(1, "one");
        map.put(2, "two");
        let mut cursor = map.cursor();
        assert!(map.advance(&mut cursor).unwrap().is_some());

        map.put(1, "uno");
        assert!(map.has_next(&cursor).unwrap());

        map.remove(&2);
        assert!(matches!(
            map.advance(&mut cursor),
            Err(TableError::IteratorInvalidated { .. })
        ));
    }

    #[test]
    fn test_clear_and_debug() {
        let mut map = ChainedHashMap::new();
        map.put("only", 1);
        assert_eq!(format!("{map:?}"), r#"{"only": 1}"#);
        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.bucket_count(), 16);
        assert_eq!(map.empty_buckets(), 16);
        assert_eq!(map.largest_chain(), 0);
        assert_eq!(map.stats().len, 0);
        assert!((map.policy().threshold() - 3.0).abs() < f64::EPSILON);
    }
}
