//! Maps keys to bucket indices

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    num::NonZeroUsize,
};

use crate::TableError;

/// Computes the 64-bit hash for a key.
///
/// `DefaultHasher::new()` uses fixed keys, so the result is stable for the
/// lifetime of the process and a cached hash can be reused when rehashing.
pub fn hash_key<Q: ?Sized + Hash>(key: &Q) -> u64 {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish()
}

/// Reduces a hash to a bucket index in `[0, bucket_count)`.
///
/// The reduction is an unsigned remainder, so every hash value (including the
/// bit pattern of the most negative signed integer) lands in range.
#[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
pub(crate) fn reduce(hash: u64, bucket_count: NonZeroUsize) -> usize {
    // The divisor is non-zero and the remainder is below `bucket_count`
    (hash % bucket_count.get() as u64) as usize
}

/// Bucket index for an already computed hash
///
/// # Errors
///
/// Returns [`TableError::InvalidArgument`] when `bucket_count` is zero.
pub fn index_for_hash(hash: u64, bucket_count: usize) -> Result<usize, TableError> {
    NonZeroUsize::new(bucket_count)
        .map(|count| reduce(hash, count))
        .ok_or_else(|| TableError::invalid("bucket count must be positive"))
}

/// Bucket index for a key under the given bucket count
///
/// # Errors
///
/// Returns [`TableError::InvalidArgument`] when `bucket_count` is zero.
pub fn index<Q: ?Sized + Hash>(key: &Q, bucket_count: usize) -> Result<usize, TableError> {
    index_for_hash(hash_key(key), bucket_count)
}
