//! Collision chains: the entries that share one bucket

use std::{borrow::Borrow, collections::TryReserveError, mem};

/// A key-value pair stored in a chain.
///
/// The hash of the key is cached so that rehashing never has to call
/// `Hash::hash` again. Two entries are equal when their keys are equal; the
/// value never takes part in the comparison.
#[derive(Debug, Clone)]
pub(crate) struct Entry<K, V> {
    /// Cached hash of `key`
    pub(crate) hash: u64,
    /// The key, unique within the table
    pub(crate) key: K,
    /// The value associated with the key (`()` for sets)
    pub(crate) value: V,
}

impl<K, V> Entry<K, V> {
    /// Creates an entry from a precomputed hash
    pub(crate) fn new(hash: u64, key: K, value: V) -> Self {
        Self { hash, key, value }
    }

    /// Whether this entry holds `key`
    fn holds<Q>(&self, hash: u64, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.hash == hash && self.key.borrow() == key
    }
}

impl<K: PartialEq, V> PartialEq for Entry<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<K: Eq, V> Eq for Entry<K, V> {}

/// Outcome of offering an entry to a chain without allocating
#[derive(Debug)]
pub(crate) enum Placement<K, V> {
    /// An equal key was present; its value was replaced and the old one returned
    Updated(V),
    /// The key is new; the entry is handed back untouched
    Vacant(Entry<K, V>),
}

/// The entries that collided into one bucket, in no particular order.
///
/// A chain never holds two entries with equal keys.
#[derive(Debug, Clone)]
pub(crate) struct Chain<K, V> {
    /// Entries of this bucket
    entries: Vec<Entry<K, V>>,
}

impl<K, V> Default for Chain<K, V> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<K, V> Chain<K, V> {
    /// Number of entries in the chain
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entry hashed to this bucket
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `slot`, if any
    pub(crate) fn get(&self, slot: usize) -> Option<&Entry<K, V>> {
        self.entries.get(slot)
    }

    /// Iterates over the entries of the chain
    pub(crate) fn iter(&self) -> std::slice::Iter<'_, Entry<K, V>> {
        self.entries.iter()
    }

    /// Makes room for `additional` more entries without touching existing ones
    pub(crate) fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.entries.try_reserve_exact(additional)
    }

    /// Appends an entry whose key is known to be absent.
    ///
    /// Callers reserve capacity first, so this never reallocates during a rehash.
    pub(crate) fn push(&mut self, entry: Entry<K, V>) {
        self.entries.push(entry);
    }

    /// Takes every entry out of the chain, leaving it empty
    pub(crate) fn take(&mut self) -> Vec<Entry<K, V>> {
        mem::take(&mut self.entries)
    }

    /// Drops every entry of the chain
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    /// Position of the entry holding `key`
    fn position<Q>(&self, hash: u64, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.entries.iter().position(|entry| entry.holds(hash, key))
    }

    /// Finds the entry holding `key`
    pub(crate) fn find<Q>(&self, hash: u64, key: &Q) -> Option<&Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.entries.iter().find(|entry| entry.holds(hash, key))
    }

    /// Finds the entry holding `key` for in-place mutation
    pub(crate) fn find_mut<Q>(&mut self, hash: u64, key: &Q) -> Option<&mut Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.entries.iter_mut().find(|entry| entry.holds(hash, key))
    }

    /// Removes the entry holding `key` and returns its value
    pub(crate) fn remove<Q>(&mut self, hash: u64, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let slot = self.position(hash, key)?;
        Some(self.entries.swap_remove(slot).value)
    }
}

impl<K: Eq, V> Chain<K, V> {
    /// Replaces the value of an equal key, or hands the entry back when the key is new.
    ///
    /// The existing key is kept; only the value is swapped.
    pub(crate) fn update_or_vacant(&mut self, entry: Entry<K, V>) -> Placement<K, V> {
        match self.find_mut(entry.hash, &entry.key) {
            Some(existing) => Placement::Updated(mem::replace(&mut existing.value, entry.value)),
            None => Placement::Vacant(entry),
        }
    }

    /// Inserts a new entry or updates the value of an equal key.
    ///
    /// Returns the previous value on update and `None` on insertion.
    ///
    /// # Errors
    ///
    /// Fails without modifying the chain when it cannot grow by one entry.
    pub(crate) fn insert_or_update(
        &mut self,
        entry: Entry<K, V>,
    ) -> Result<Option<V>, TryReserveError> {
        match self.update_or_vacant(entry) {
            Placement::Updated(previous) => Ok(Some(previous)),
            Placement::Vacant(entry) => {
                self.entries.try_reserve(1)?;
                self.entries.push(entry);
                Ok(None)
            }
        }
    }
}
