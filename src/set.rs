use std::{borrow::Borrow, fmt, hash::Hash, iter::FusedIterator};

use crate::{
    ResizePolicy, TableConfig, TableError,
    table::{Cursor, Iter, RawTable, TableStats},
};

/// A hash set built on the same chained bucket engine as
/// [`ChainedHashMap`](crate::ChainedHashMap).
///
/// Entries carry no payload: the value slot is `()`, so an entry is just the
/// element and its cached hash.
///
/// Iteration comes in two forms. [`ChainedHashSet::iter`] borrows the set, so
/// the compiler rejects any modification while it is alive.
/// [`ChainedHashSet::cursor`] returns a detached [`Cursor`] that reports
/// [`TableError::IteratorInvalidated`] once the set is structurally modified.
///
/// ```rust
/// use chaintable::{ChainedHashSet, TableError};
///
/// let mut set: ChainedHashSet<&str> = ["a", "b", "c"].into_iter().collect();
/// let mut cursor = set.cursor();
/// assert!(set.advance(&mut cursor)?.is_some());
///
/// set.add("d");
/// assert!(matches!(set.advance(&mut cursor), Err(TableError::IteratorInvalidated { .. })));
/// # Ok::<(), TableError>(())
/// ```
#[derive(Clone)]
pub struct ChainedHashSet<T> {
    /// The shared bucket engine with unit values
    table: RawTable<T, ()>,
}

impl<T> Default for ChainedHashSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for ChainedHashSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> ChainedHashSet<T> {
    /// Creates an empty set with 16 buckets and a load factor threshold of 3.0
    #[must_use]
    pub fn new() -> Self {
        Self { table: RawTable::new() }
    }

    /// Creates an empty set from explicit parameters
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidArgument`] if the configuration is invalid,
    /// or [`TableError::ResourceExhausted`] if the buckets cannot be allocated.
    pub fn with_config(config: TableConfig) -> Result<Self, TableError> {
        Ok(Self { table: RawTable::with_config(config)? })
    }

    /// Returns the number of elements in the set
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns true if the set holds no element
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// Returns the number of buckets
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.table.bucket_count()
    }

    /// Returns the number of buckets holding no element
    #[must_use]
    pub fn empty_buckets(&self) -> usize {
        self.table.empty_buckets()
    }

    /// Returns the length of the longest collision chain
    #[must_use]
    pub fn largest_chain(&self) -> usize {
        self.table.largest_chain()
    }

    /// Returns the current load factor of the set
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

    /// Returns an iterator over the elements, in unspecified order
    #[must_use]
    pub fn iter(&self) -> SetIter<'_, T> {
        SetIter { inner: self.table.iter() }
    }

    /// Returns a detached cursor positioned before the first element
    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.table.cursor()
    }

    /// Yields the next element for `cursor`
    ///
    /// # Errors
    ///
    /// Returns [`TableError::IteratorInvalidated`] if the cursor came from
    /// another set, or an element was added or removed, or the set was resized
    /// or cleared, since the cursor was created.
    pub fn advance(&self, cursor: &mut Cursor) -> Result<Option<&T>, TableError> {
        Ok(self.table.advance(cursor)?.map(|(element, ())| element))
    }

    /// Whether `cursor` has another element to yield
    ///
    /// # Errors
    ///
    /// Same as [`ChainedHashSet::advance`].
    pub fn has_next(&self, cursor: &Cursor) -> Result<bool, TableError> {
        self.table.has_next(cursor)
    }

    /// Removes every element. The bucket count is kept.
    pub fn clear(&mut self) {
        self.table.clear();
    }
}

impl<T: Eq + Hash> ChainedHashSet<T> {
    /// Adds an element, returning false if an equal element was already present.
    ///
    /// An equal element already in the set is left untouched.
    pub fn add(&mut self, element: T) -> bool {
        self.table.insert(element, ()).is_none()
    }

    /// Fallible [`ChainedHashSet::add`]
    ///
    /// # Errors
    ///
    /// Returns [`TableError::ResourceExhausted`] if growing the set fails; the
    /// set is left unchanged.
    pub fn try_add(&mut self, element: T) -> Result<bool, TableError> {
        Ok(self.table.try_insert(element, ())?.is_none())
    }

    /// Returns true if the set contains the element
    pub fn contains<Q>(&self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table.contains_key(element)
    }

    /// Returns the stored element equal to `element`
    pub fn get<Q>(&self, element: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table.get_key_value(element).map(|(stored, ())| stored)
    }

    /// Removes an element, returning whether it was present
    pub fn remove<Q>(&mut self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table.remove(element).is_some()
    }
}

impl<T: Eq + Hash> Extend<T> for ChainedHashSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for element in iter {
            self.add(element);
        }
    }
}

impl<T: Eq + Hash> FromIterator<T> for ChainedHashSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<'a, T> IntoIterator for &'a ChainedHashSet<T> {
    type Item = &'a T;
    type IntoIter = SetIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Borrowing iterator over the elements of a [`ChainedHashSet`]
#[derive(Debug, Clone)]
pub struct SetIter<'a, T> {
    /// Iterator over the underlying `(element, ())` entries
    inner: Iter<'a, T, ()>,
}

impl<'a, T> Iterator for SetIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(element, ())| element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for SetIter<'_, T> {}

impl<T> FusedIterator for SetIter<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Invalidation;

    /// Element whose hash ignores its id, so every instance collides
    #[derive(Debug, Clone, PartialEq, Eq)]
    struct SameHash {
        /// Distinguishes otherwise colliding elements
        id: u8,
    }

    impl Hash for SameHash {
        fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
            state.write_u64(0xDEAD_BEEF);
        }
    }

    #[test]
    fn test_add_and_contains() {
        let mut set = ChainedHashSet::new();
        assert!(set.add("Brendan".to_string()));
        assert!(set.contains("Brendan"));
        assert!(!set.contains("Alice"));
        assert!(!set.add("Brendan".to_string()));
    }

    #[test]
    fn test_duplicate_add() {
        let mut set = ChainedHashSet::new();
        assert!(set.add("x"));
        assert!(!set.add("x"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut set = ChainedHashSet::new();
        set.add("Brendan");
        set.add("Alice");

        assert!(set.remove("Brendan"));
        assert!(!set.contains("Brendan"));
        assert!(!set.remove("NonExistent"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_size_and_is_empty() {
        let mut set = ChainedHashSet::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);

        set.add("Brendan");
        set.add("Alice");

        assert!(!set.is_empty());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_iterator_yields_each_element_once() {
        let mut set = ChainedHashSet::new();
        set.add("X");
        set.add("Y");

        let mut iter = set.iter();
        let first = iter.next().unwrap();
        let second = iter.next().unwrap();
        assert!(["X", "Y"].contains(first));
        assert!(["X", "Y"].contains(second));
        assert_ne!(first, second);
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_colliding_elements() {
        let mut set = ChainedHashSet::new();
        assert!(set.add(SameHash { id: 1 }));
        assert!(set.add(SameHash { id: 2 }));

        assert!(set.contains(&SameHash { id: 1 }));
        assert!(set.contains(&SameHash { id: 2 }));
        assert!(!set.contains(&SameHash { id: 3 }));
        assert_eq!(set.largest_chain(), 2);

        let mut ids: Vec<u8> = set.iter().map(|element| element.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_cursor_invalidated_by_add() {
        let mut set: ChainedHashSet<u32> = [10, 20, 30].into_iter().collect();
        let mut cursor = set.cursor();
        assert!(set.has_next(&cursor).unwrap());
        assert!(set.advance(&mut cursor).unwrap().is_some());

        assert!(set.add(40));
        assert!(matches!(
            set.advance(&mut cursor),
            Err(TableError::IteratorInvalidated { .. })
        ));
        // Invalidation is permanent for this cursor
        assert!(matches!(set.has_next(&cursor), Err(TableError::IteratorInvalidated { .. })));

        let mut fresh = set.cursor();
        let mut seen = Vec::new();
        while let Some(element) = set.advance(&mut fresh).unwrap() {
            seen.push(*element);
        }
        seen.sort_unstable();
        assert_eq!(seen, vec![10, 20, 30, 40]);
    }

    #[test]
    fn test_cursor_unaffected_by_duplicate_add() {
        let mut set: ChainedHashSet<u32> = [1, 2, 3].into_iter().collect();
        let mut cursor = set.cursor();
        assert!(!set.add(2));
        assert!(!set.remove(&9));
        assert!(set.advance(&mut cursor).is_ok());
    }

    #[test]
    fn test_cursor_invalidated_by_resize() {
        let mut set = ChainedHashSet::new();
        for element in 0..48_u32 {
            set.add(element);
        }
        let cursor = set.cursor();
        set.add(48);
        assert_eq!(set.bucket_count(), 32);
        assert_eq!(
            set.has_next(&cursor),
            Err(TableError::IteratorInvalidated {
                cause: Invalidation::Modified {
                    expected: cursor.generation(),
                    found: cursor.generation() + 1,
                },
            })
        );
    }

    #[test]
    fn test_cursor_bound_to_its_set() {
        let first: ChainedHashSet<u32> = [1, 2, 3].into_iter().collect();
        let second: ChainedHashSet<u32> = [7, 8, 9].into_iter().collect();
        let mut cursor = first.cursor();
        assert!(matches!(
            second.advance(&mut cursor),
            Err(TableError::IteratorInvalidated { cause: Invalidation::ForeignTable { .. } })
        ));

        // A set rebuilt in the same variable is a different table
        let mut rebuilt: ChainedHashSet<u32> = [1, 2, 3].into_iter().collect();
        let mut cursor = rebuilt.cursor();
        rebuilt = [1, 2, 3].into_iter().collect();
        assert!(rebuilt.advance(&mut cursor).is_err());

        let copy = first.clone();
        assert!(copy.has_next(&first.cursor()).is_err());
    }

    #[test]
    fn test_oversized_config_is_exhaustion() {
        let config = TableConfig::default().initial_buckets(1 << 60);
        assert_eq!(
            ChainedHashSet::<u32>::with_config(config).err(),
            Some(TableError::ResourceExhausted { requested_buckets: 1 << 60 })
        );
    }

    #[test]
    fn test_get_returns_stored_element() {
        let mut set = ChainedHashSet::new();
        set.add("stored".to_string());
        assert_eq!(set.get("stored").map(String::as_str), Some("stored"));
        assert_eq!(set.get("other"), None);
    }

    #[test]
    fn test_try_add_and_clear() {
        let mut set = ChainedHashSet::new();
        assert_eq!(set.try_add(1_u8), Ok(true));
        assert_eq!(set.try_add(1_u8), Ok(false));
        set.clear();
        assert!(set.is_empty());
        assert_eq!(format!("{set:?}"), "{}");
    }

    #[test]
    fn test_diagnostics() {
        let set: ChainedHashSet<u16> = (0..64).collect();
        let stats = set.stats();
        assert_eq!(stats.len, 64);
        assert_eq!(stats.buckets, set.bucket_count());
        assert_eq!(stats.empty_buckets, set.empty_buckets());
        assert_eq!(stats.largest_chain, set.largest_chain());
        assert!(set.load_factor() <= set.policy().threshold());
        assert_eq!(set.iter().len(), 64);
    }
}
