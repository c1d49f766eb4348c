//! The bucket array: fixed-size storage for collision chains

use std::num::NonZeroUsize;

use crate::{TableError, chain::Chain, chain::Entry, distributor};

/// A fixed, non-zero number of chains addressed by bucket index.
///
/// Pure storage: the array never decides when to grow. A resize builds a
/// fresh array and moves every entry into it.
#[derive(Debug, Clone)]
pub(crate) struct BucketArray<K, V> {
    /// One chain per bucket; always `count` long
    chains: Vec<Chain<K, V>>,
    /// Number of buckets
    count: NonZeroUsize,
}

impl<K, V> BucketArray<K, V> {
    /// Allocates `count` empty chains, aborting on allocation failure
    pub(crate) fn with_buckets(count: NonZeroUsize) -> Self {
        let mut chains = Vec::with_capacity(count.get());
        chains.resize_with(count.get(), Chain::default);
        Self { chains, count }
    }

    /// Allocates `count` empty chains, reporting allocation failure
    ///
    /// # Errors
    ///
    /// Returns [`TableError::ResourceExhausted`] if the chain vector cannot be
    /// allocated.
    pub(crate) fn try_with_buckets(count: NonZeroUsize) -> Result<Self, TableError> {
        let mut chains = Vec::new();
        chains
            .try_reserve_exact(count.get())
            .map_err(|_| TableError::ResourceExhausted { requested_buckets: count.get() })?;
        chains.resize_with(count.get(), Chain::default);
        Ok(Self { chains, count })
    }

    /// Number of buckets
    pub(crate) fn len(&self) -> usize {
        self.count.get()
    }

    /// Number of buckets, as the divisor of the hash reduction
    pub(crate) fn count(&self) -> NonZeroUsize {
        self.count
    }

    /// Chain stored at `index`
    pub(crate) fn chain(&self, index: usize) -> Option<&Chain<K, V>> {
        self.chains.get(index)
    }

    /// Chain selected by `hash` under the current bucket count
    #[allow(clippy::indexing_slicing)]
    pub(crate) fn chain_for(&self, hash: u64) -> &Chain<K, V> {
        // `reduce` stays below `count`, the length of `chains`
        &self.chains[distributor::reduce(hash, self.count)]
    }

    /// Mutable chain selected by `hash` under the current bucket count
    #[allow(clippy::indexing_slicing)]
    pub(crate) fn chain_for_mut(&mut self, hash: u64) -> &mut Chain<K, V> {
        &mut self.chains[distributor::reduce(hash, self.count)]
    }

    /// All chains, in bucket order
    pub(crate) fn chains(&self) -> &[Chain<K, V>] {
        &self.chains
    }

    /// Cached hashes of every stored entry
    pub(crate) fn hashes(&self) -> impl Iterator<Item = u64> + '_ {
        self.chains.iter().flat_map(Chain::iter).map(|entry| entry.hash)
    }

    /// Reserves exact room in every chain for the number of entries it will receive
    ///
    /// # Errors
    ///
    /// Returns [`TableError::ResourceExhausted`] on the first chain that cannot
    /// be grown. Chains reserved before the failure keep their spare capacity.
    pub(crate) fn try_reserve_chains(&mut self, counts: &[usize]) -> Result<(), TableError> {
        let requested_buckets = self.len();
        for (chain, &count) in self.chains.iter_mut().zip(counts) {
            chain
                .try_reserve(count)
                .map_err(|_| TableError::ResourceExhausted { requested_buckets })?;
        }
        Ok(())
    }

    /// Moves an entry into the chain its cached hash selects
    pub(crate) fn place(&mut self, entry: Entry<K, V>) {
        self.chain_for_mut(entry.hash).push(entry);
    }

    /// Drains every entry out of the array, bucket by bucket
    pub(crate) fn drain_entries(&mut self) -> impl Iterator<Item = Entry<K, V>> + '_ {
        self.chains.iter_mut().flat_map(Chain::take)
    }

    /// Empties every chain, keeping the bucket count
    pub(crate) fn clear(&mut self) {
        self.chains.iter_mut().for_each(Chain::clear);
    }

    /// Number of buckets holding no entry
    pub(crate) fn empty_buckets(&self) -> usize {
        self.chains.iter().filter(|chain| chain.is_empty()).count()
    }

    /// Length of the longest chain
    pub(crate) fn largest_chain(&self) -> usize {
        self.chains.iter().map(Chain::len).max().unwrap_or(0)
    }
}
