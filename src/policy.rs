//! Load factor tracking and the grow decision

use std::num::NonZeroUsize;

use crate::TableError;

/// Decides when the bucket array grows and to what size.
///
/// The table grows only when an insertion creates a new entry and the average
/// chain length would exceed the threshold. Growth always doubles the bucket
/// count; removals never shrink it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizePolicy {
    /// Maximum average number of entries per bucket
    threshold: f64,
}

impl Default for ResizePolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl ResizePolicy {
    /// Default average chain length tolerated before growing
    pub const DEFAULT_THRESHOLD: f64 = 3.0;

    /// Factor applied to the bucket count on every grow step
    pub const GROWTH_FACTOR: usize = 2;

    /// Policy with [`Self::DEFAULT_THRESHOLD`]
    pub const DEFAULT: Self = Self { threshold: Self::DEFAULT_THRESHOLD };

    /// Creates a policy with the given load factor threshold
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidArgument`] unless `threshold` is finite and
    /// strictly positive.
    pub fn new(threshold: f64) -> Result<Self, TableError> {
        if threshold.is_finite() && threshold > 0.0 {
            Ok(Self { threshold })
        } else {
            Err(TableError::invalid(format!(
                "load factor threshold must be finite and positive, got {threshold}"
            )))
        }
    }

    /// The configured load factor threshold
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Whether `len` entries spread over `bucket_count` buckets exceed the threshold
    #[must_use]
    pub fn should_grow(&self, len: usize, bucket_count: usize) -> bool {
        load_factor(len, bucket_count) > self.threshold
    }

    /// Bucket count that brings `len` entries back under the threshold.
    ///
    /// With any threshold of at least one half this is a single doubling; smaller
    /// thresholds keep doubling until the load fits.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::ResourceExhausted`] when the bucket count would
    /// overflow `usize`.
    pub fn grown_bucket_count(
        &self,
        len: usize,
        bucket_count: NonZeroUsize,
    ) -> Result<NonZeroUsize, TableError> {
        let mut target = bucket_count;
        loop {
            target = target
                .get()
                .checked_mul(Self::GROWTH_FACTOR)
                .and_then(NonZeroUsize::new)
                .ok_or(TableError::ResourceExhausted { requested_buckets: usize::MAX })?;
            if !self.should_grow(len, target.get()) {
                return Ok(target);
            }
        }
    }
}

/// Ratio of entries to buckets; zero for an empty bucket array
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::arithmetic_side_effects)]
pub fn load_factor(len: usize, bucket_count: usize) -> f64 {
    if bucket_count == 0 { 0.0 } else { len as f64 / bucket_count as f64 }
}
