//! The bucket engine shared by the map and the set
//!
//! `RawTable` composes the bucket array, the hash distributor, the chain
//! resolver and the resize policy. It is single-threaded: every operation runs
//! to completion on the caller's thread, and a resize happens inline inside
//! the insertion that crosses the load factor threshold.

use std::{
    alloc::Layout,
    borrow::Borrow,
    hash::Hash,
    iter, mem,
    sync::atomic::{AtomicU64, Ordering},
};

use crate::{
    Invalidation, ResizePolicy, TableConfig, TableError,
    bucket::BucketArray,
    chain::{Chain, Entry, Placement},
    distributor::{self, hash_key},
    policy,
};

/// Source of table identities, shared by every table in the process
static NEXT_TABLE_ID: AtomicU64 = AtomicU64::new(0);

/// Hands out an identity no other live table holds
fn next_table_id() -> u64 {
    NEXT_TABLE_ID.fetch_add(1, Ordering::Relaxed)
}

/// Read-only health snapshot of a table, computed in O(bucket count)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableStats {
    /// Number of stored entries
    pub len: usize,
    /// Number of buckets
    pub buckets: usize,
    /// Buckets holding no entry
    pub empty_buckets: usize,
    /// Length of the longest chain
    pub largest_chain: usize,
    /// Entries per bucket
    pub load_factor: f64,
}

/// A detached position inside a table.
///
/// Unlike [`Iter`], a cursor does not borrow the table, so the table may be
/// modified while a cursor exists. Every structural change (a new entry, a
/// removal, a resize or a clear) advances the table's generation, and a cursor
/// created under an older generation reports
/// [`TableError::IteratorInvalidated`] on every later use instead of yielding
/// stale or skipped entries. Updating the value of an existing key is not a
/// structural change.
///
/// A cursor is bound to the table that created it. Passing it to any other
/// table, including a clone of its own, reports
/// [`TableError::IteratorInvalidated`] as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Identity of the table that created the cursor
    table: u64,
    /// Bucket currently being walked
    bucket: usize,
    /// Next slot within that bucket
    slot: usize,
    /// Table generation captured at creation
    generation: u64,
}

impl Cursor {
    /// Generation of the table this cursor was created from
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Separate-chaining hash table storing `(K, V)` entries.
#[derive(Debug)]
pub(crate) struct RawTable<K, V> {
    /// Process-unique identity checked by cursors
    id: u64,
    /// Chains addressed by bucket index
    buckets: BucketArray<K, V>,
    /// Number of entries, distinct from the bucket count
    len: usize,
    /// When and how far to grow
    policy: ResizePolicy,
    /// Incremented on every structural mutation
    generation: u64,
}

impl<K: Clone, V: Clone> Clone for RawTable<K, V> {
    /// Copies the entries under a fresh identity, so cursors of the source
    /// table are rejected by the copy.
    fn clone(&self) -> Self {
        Self {
            id: next_table_id(),
            buckets: self.buckets.clone(),
            len: self.len,
            policy: self.policy,
            generation: self.generation,
        }
    }
}

impl<K, V> RawTable<K, V> {
    /// Empty table with [`TableConfig::DEFAULT_BUCKETS`] buckets and the default policy
    pub(crate) fn new() -> Self {
        Self {
            id: next_table_id(),
            buckets: BucketArray::with_buckets(TableConfig::DEFAULT_BUCKET_COUNT),
            len: 0,
            policy: ResizePolicy::DEFAULT,
            generation: 0,
        }
    }

    /// Empty table built from validated parameters
    pub(crate) fn with_config(config: TableConfig) -> Result<Self, TableError> {
        let (bucket_count, policy) = config.validate()?;
        Ok(Self {
            id: next_table_id(),
            buckets: BucketArray::try_with_buckets(bucket_count)?,
            len: 0,
            policy,
            generation: 0,
        })
    }

    /// Number of entries
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Number of buckets
    pub(crate) fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Buckets holding no entry
    pub(crate) fn empty_buckets(&self) -> usize {
        self.buckets.empty_buckets()
    }

    /// Length of the longest chain
    pub(crate) fn largest_chain(&self) -> usize {
        self.buckets.largest_chain()
    }

    /// Entries per bucket
    pub(crate) fn load_factor(&self) -> f64 {
        policy::load_factor(self.len, self.buckets.len())
    }

    /// The resize policy in force
    pub(crate) fn policy(&self) -> ResizePolicy {
        self.policy
    }

    /// Diagnostic snapshot
    pub(crate) fn stats(&self) -> TableStats {
        TableStats {
            len: self.len,
            buckets: self.bucket_count(),
            empty_buckets: self.empty_buckets(),
            largest_chain: self.largest_chain(),
            load_factor: self.load_factor(),
        }
    }

    /// Records a structural mutation
    fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Removes every entry, keeping the bucket count
    pub(crate) fn clear(&mut self) {
        self.buckets.clear();
        self.len = 0;
        self.bump_generation();
    }

    /// Borrowing iterator over all entries
    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter { chains: self.buckets.chains(), bucket: 0, slot: 0, remaining: self.len }
    }

    /// Cursor positioned before the first entry
    pub(crate) fn cursor(&self) -> Cursor {
        Cursor { table: self.id, bucket: 0, slot: 0, generation: self.generation }
    }

    /// Fails for a cursor of another table, or once this table changed
    /// structurally since `cursor` was created
    fn check_cursor(&self, cursor: &Cursor) -> Result<(), TableError> {
        let cause = if cursor.table != self.id {
            Invalidation::ForeignTable { expected: cursor.table, found: self.id }
        } else if cursor.generation != self.generation {
            Invalidation::Modified { expected: cursor.generation, found: self.generation }
        } else {
            return Ok(());
        };
        Err(TableError::IteratorInvalidated { cause })
    }

    /// Moves `cursor` past the next entry and returns it
    ///
    /// # Errors
    ///
    /// Returns [`TableError::IteratorInvalidated`] if the cursor belongs to
    /// another table or this table changed structurally since its creation.
    pub(crate) fn advance(&self, cursor: &mut Cursor) -> Result<Option<(&K, &V)>, TableError> {
        self.check_cursor(cursor)?;
        while let Some(chain) = self.buckets.chain(cursor.bucket) {
            if let Some(entry) = chain.get(cursor.slot) {
                cursor.slot = cursor.slot.saturating_add(1);
                return Ok(Some((&entry.key, &entry.value)));
            }
            cursor.bucket = cursor.bucket.saturating_add(1);
            cursor.slot = 0;
        }
        Ok(None)
    }

    /// Whether `cursor` has another entry to yield, without moving it
    ///
    /// # Errors
    ///
    /// Same as [`RawTable::advance`].
    pub(crate) fn has_next(&self, cursor: &Cursor) -> Result<bool, TableError> {
        let mut lookahead = *cursor;
        Ok(self.advance(&mut lookahead)?.is_some())
    }
}

impl<K: Eq + Hash, V> RawTable<K, V> {
    /// Entry stored for `key`
    fn find<Q>(&self, key: &Q) -> Option<&Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = hash_key(key);
        self.buckets.chain_for(hash).find(hash, key)
    }

    /// Value stored for `key`
    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(key).map(|entry| &entry.value)
    }

    /// Stored key and value for `key`
    pub(crate) fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(key).map(|entry| (&entry.key, &entry.value))
    }

    /// Mutable value stored for `key`
    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = hash_key(key);
        self.buckets.chain_for_mut(hash).find_mut(hash, key).map(|entry| &mut entry.value)
    }

    /// Whether `key` is present
    pub(crate) fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Removes `key`, returning its value. Never shrinks the bucket array.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = hash_key(key);
        let removed = self.buckets.chain_for_mut(hash).remove(hash, key)?;
        self.len = self.len.saturating_sub(1);
        self.bump_generation();
        Some(removed)
    }

    /// Inserts `key` or replaces its value, growing the table when needed.
    ///
    /// Returns the previous value when the key was already present.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::ResourceExhausted`] when the chain or the grown
    /// bucket array cannot be allocated. Every allocation happens before any
    /// entry moves, so on error the table is exactly as it was before the call.
    pub(crate) fn try_insert(&mut self, key: K, value: V) -> Result<Option<V>, TableError> {
        let entry = Entry::new(hash_key(&key), key, value);
        let bucket_count = self.buckets.len();
        let grow = self.policy.should_grow(self.len.saturating_add(1), bucket_count);

        let chain = self.buckets.chain_for_mut(entry.hash);

        if grow {
            match chain.update_or_vacant(entry) {
                Placement::Updated(previous) => return Ok(Some(previous)),
                Placement::Vacant(entry) => self.grow_with(entry)?,
            }
        } else {
            let previous = chain
                .insert_or_update(entry)
                .map_err(|_| TableError::ResourceExhausted { requested_buckets: bucket_count })?;
            if previous.is_some() {
                return Ok(previous);
            }
        }

        self.len = self.len.saturating_add(1);
        self.bump_generation();
        Ok(None)
    }

    /// Infallible [`RawTable::try_insert`]; allocation failure aborts like `std` collections
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.try_insert(key, value) {
            Ok(previous) => previous,
            Err(err) => std::alloc::handle_alloc_error(exhausted_layout::<K, V>(&err)),
        }
    }

    /// Rehashes every entry plus `incoming` into a larger bucket array.
    ///
    /// Runs in two phases. The first obtains every allocation the move will
    /// need: the new array and the exact capacity of each of its chains. The
    /// second moves the entries and cannot fail. The old array is dropped once
    /// empty.
    fn grow_with(&mut self, incoming: Entry<K, V>) -> Result<(), TableError> {
        let requested_buckets =
            self.policy.grown_bucket_count(self.len.saturating_add(1), self.buckets.count())?;
        let exhausted =
            |_| TableError::ResourceExhausted { requested_buckets: requested_buckets.get() };

        let mut grown = BucketArray::try_with_buckets(requested_buckets)?;
        let mut counts: Vec<usize> = Vec::new();
        counts.try_reserve_exact(requested_buckets.get()).map_err(exhausted)?;
        counts.resize(requested_buckets.get(), 0);
        for hash in self.buckets.hashes().chain(iter::once(incoming.hash)) {
            if let Some(count) = counts.get_mut(distributor::reduce(hash, requested_buckets)) {
                *count = count.saturating_add(1);
            }
        }
        grown.try_reserve_chains(&counts)?;

        for entry in self.buckets.drain_entries() {
            grown.place(entry);
        }
        grown.place(incoming);
        drop(mem::replace(&mut self.buckets, grown));
        Ok(())
    }
}

/// Layout reported to the allocation error handler when an insertion fails.
///
/// Insertion only fails with [`TableError::ResourceExhausted`]; any other error
/// is reported against a single chain.
fn exhausted_layout<K, V>(err: &TableError) -> Layout {
    let buckets = match *err {
        TableError::ResourceExhausted { requested_buckets } => requested_buckets,
        TableError::InvalidArgument { .. } | TableError::IteratorInvalidated { .. } => 1,
    };
    Layout::array::<Chain<K, V>>(buckets).unwrap_or_else(|_| Layout::new::<Chain<K, V>>())
}

/// Borrowing iterator over the entries of a table, in bucket order.
///
/// The order is unspecified and changes when the table grows.
#[derive(Debug, Clone)]
pub struct Iter<'a, K, V> {
    /// Chains of the iterated table
    chains: &'a [Chain<K, V>],
    /// Current bucket
    bucket: usize,
    /// Next slot in the current bucket
    slot: usize,
    /// Entries not yet yielded
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let chain = self.chains.get(self.bucket)?;
            if let Some(entry) = chain.get(self.slot) {
                self.slot = self.slot.saturating_add(1);
                self.remaining = self.remaining.saturating_sub(1);
                return Some((&entry.key, &entry.value));
            }
            self.bucket = self.bucket.saturating_add(1);
            self.slot = 0;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> iter::FusedIterator for Iter<'_, K, V> {}
