//! Uniform container interfaces shared by the chained tables and their `std`
//! counterparts

use std::{
    collections::{HashMap, HashSet},
    hash::{BuildHasher, Hash},
};

use crate::{ChainedHashMap, ChainedHashSet};

/// The minimal interface every container of the library exposes.
///
/// Implemented for [`ChainedHashSet`] and for `std::collections::HashSet`, so
/// benchmark code can drive both through the same calls.
pub trait Collection<T> {
    /// Returns the number of elements
    fn len(&self) -> usize;

    /// Returns true if the collection holds no element
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Adds an element, returning false if it was already present
    fn add(&mut self, element: T) -> bool;

    /// Removes an element, returning whether it was present
    fn remove(&mut self, element: &T) -> bool;

    /// Returns true if the element is present
    fn contains(&self, element: &T) -> bool;

    /// Returns an iterator over the elements, in unspecified order
    fn iter<'a>(&'a self) -> impl Iterator<Item = &'a T>
    where
        T: 'a;
}

impl<T: Eq + Hash> Collection<T> for ChainedHashSet<T> {
    fn len(&self) -> usize {
        Self::len(self)
    }

    fn add(&mut self, element: T) -> bool {
        Self::add(self, element)
    }

    fn remove(&mut self, element: &T) -> bool {
        Self::remove(self, element)
    }

    fn contains(&self, element: &T) -> bool {
        Self::contains(self, element)
    }

    fn iter<'a>(&'a self) -> impl Iterator<Item = &'a T>
    where
        T: 'a,
    {
        Self::iter(self)
    }
}

impl<T: Eq + Hash, S: BuildHasher> Collection<T> for HashSet<T, S> {
    fn len(&self) -> usize {
        Self::len(self)
    }

    fn add(&mut self, element: T) -> bool {
        self.insert(element)
    }

    fn remove(&mut self, element: &T) -> bool {
        Self::remove(self, element)
    }

    fn contains(&self, element: &T) -> bool {
        Self::contains(self, element)
    }

    fn iter<'a>(&'a self) -> impl Iterator<Item = &'a T>
    where
        T: 'a,
    {
        Self::iter(self)
    }
}

/// Key-value operations shared by [`ChainedHashMap`] and `std::collections::HashMap`
pub trait Associative<K, V> {
    /// Returns the number of entries
    fn len(&self) -> usize;

    /// Returns true if the map holds no entry
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Associates `value` with `key`, returning the previous value
    fn put(&mut self, key: K, value: V) -> Option<V>;

    /// Returns the value stored for `key`
    fn get(&self, key: &K) -> Option<&V>;

    /// Returns true if `key` is present
    fn contains_key(&self, key: &K) -> bool;

    /// Removes `key`, returning its value
    fn remove(&mut self, key: &K) -> Option<V>;
}

impl<K: Eq + Hash, V> Associative<K, V> for ChainedHashMap<K, V> {
    fn len(&self) -> usize {
        Self::len(self)
    }

    fn put(&mut self, key: K, value: V) -> Option<V> {
        Self::put(self, key, value)
    }

    fn get(&self, key: &K) -> Option<&V> {
        Self::get(self, key)
    }

    fn contains_key(&self, key: &K) -> bool {
        Self::contains_key(self, key)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        Self::remove(self, key)
    }
}

impl<K: Eq + Hash, V, S: BuildHasher> Associative<K, V> for HashMap<K, V, S> {
    fn len(&self) -> usize {
        Self::len(self)
    }

    fn put(&mut self, key: K, value: V) -> Option<V> {
        self.insert(key, value)
    }

    fn get(&self, key: &K) -> Option<&V> {
        Self::get(self, key)
    }

    fn contains_key(&self, key: &K) -> bool {
        Self::contains_key(self, key)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        Self::remove(self, key)
    }
}

/// Extension trait for map implementations that provides additional utility methods
pub trait MapExtensions<K, V> {
    /// Returns the keys of the map as a Vec
    fn keys(&self) -> Vec<K>;

    /// Returns the values of the map as a Vec
    fn values(&self) -> Vec<V>;
}

impl<K, V> MapExtensions<K, V> for ChainedHashMap<K, V>
where
    K: Clone,
    V: Clone,
{
    fn keys(&self) -> Vec<K> {
        self.iter().map(|(k, _)| k.clone()).collect()
    }

    fn values(&self) -> Vec<V> {
        self.iter().map(|(_, v)| v.clone()).collect()
    }
}
