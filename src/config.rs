//! Construction parameters for the chained tables

use std::num::NonZeroUsize;

use crate::{ResizePolicy, TableError};

/// Parameters used to build a [`ChainedHashMap`](crate::ChainedHashMap) or
/// [`ChainedHashSet`](crate::ChainedHashSet).
///
/// ```rust
/// use chaintable::{ChainedHashSet, TableConfig};
///
/// let config = TableConfig::default().initial_buckets(64).load_factor_threshold(1.5);
/// let set: ChainedHashSet<u32> = ChainedHashSet::with_config(config)?;
/// assert_eq!(set.bucket_count(), 64);
/// # Ok::<(), chaintable::TableError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableConfig {
    /// Requested number of buckets before the first insertion
    initial_buckets: usize,
    /// Maximum average chain length before the table grows
    load_factor_threshold: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_buckets: Self::DEFAULT_BUCKETS,
            load_factor_threshold: ResizePolicy::DEFAULT_THRESHOLD,
        }
    }
}

impl TableConfig {
    /// Bucket count of a table built with [`TableConfig::default`]
    pub const DEFAULT_BUCKETS: usize = 16;

    /// [`Self::DEFAULT_BUCKETS`] as a bucket array size
    pub(crate) const DEFAULT_BUCKET_COUNT: NonZeroUsize =
        match NonZeroUsize::new(Self::DEFAULT_BUCKETS) {
            Some(count) => count,
            None => NonZeroUsize::MIN,
        };

    /// Sets the initial bucket count. It is rounded up to a power of two.
    #[must_use]
    pub fn initial_buckets(mut self, buckets: usize) -> Self {
        self.initial_buckets = buckets;
        self
    }

    /// Sets the load factor threshold
    #[must_use]
    pub fn load_factor_threshold(mut self, threshold: f64) -> Self {
        self.load_factor_threshold = threshold;
        self
    }

    /// The bucket count as requested, before rounding
    #[must_use]
    pub fn requested_buckets(&self) -> usize {
        self.initial_buckets
    }

    /// The requested load factor threshold
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.load_factor_threshold
    }

    /// Checks the parameters and resolves them into a bucket count and a policy
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidArgument`] for a zero bucket count, a bucket
    /// count with no power of two above it, or an unusable threshold.
    pub fn validate(&self) -> Result<(NonZeroUsize, ResizePolicy), TableError> {
        let requested = NonZeroUsize::new(self.initial_buckets)
            .ok_or_else(|| TableError::invalid("initial bucket count must be positive"))?;
        let buckets = requested.checked_next_power_of_two().ok_or_else(|| {
            TableError::invalid(format!(
                "initial bucket count {requested} cannot be rounded to a power of two"
            ))
        })?;
        let policy = ResizePolicy::new(self.load_factor_threshold)?;
        Ok((buckets, policy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let (buckets, policy) = TableConfig::default().validate().unwrap();
        assert_eq!(buckets.get(), 16);
        assert_eq!(TableConfig::DEFAULT_BUCKET_COUNT, buckets);
        assert!((policy.threshold() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rounds_to_power_of_two() {
        let (buckets, _) = TableConfig::default().initial_buckets(100).validate().unwrap();
        assert_eq!(buckets.get(), 128);
        let (buckets, _) = TableConfig::default().initial_buckets(1).validate().unwrap();
        assert_eq!(buckets.get(), 1);
    }

    #[test]
    fn test_invalid_parameters() {
        let zero = TableConfig::default().initial_buckets(0);
        assert!(matches!(zero.validate(), Err(TableError::InvalidArgument { .. })));

        let huge = TableConfig::default().initial_buckets(usize::MAX);
        assert!(matches!(huge.validate(), Err(TableError::InvalidArgument { .. })));

        let negative = TableConfig::default().load_factor_threshold(-2.0);
        assert!(matches!(negative.validate(), Err(TableError::InvalidArgument { .. })));
    }

    #[test]
    fn test_accessors() {
        let config = TableConfig::default().initial_buckets(5).load_factor_threshold(0.5);
        assert_eq!(config.requested_buckets(), 5);
        assert!((config.threshold() - 0.5).abs() < f64::EPSILON);
    }
}
