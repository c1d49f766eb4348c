#![allow(clippy::missing_docs_in_private_items, clippy::unwrap_used, clippy::indexing_slicing)]

use std::collections::{HashMap, HashSet};

use chaintable::{ChainedHashMap, ChainedHashSet, TableConfig};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Put(u16, u32),
    Remove(u16),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (any::<u16>(), any::<u32>()).prop_map(|(key, value)| Op::Put(key, value)),
        1 => any::<u16>().prop_map(Op::Remove),
    ]
}

proptest! {
    #[test]
    fn map_matches_std_model(ops in prop::collection::vec(op(), 0..400)) {
        let mut map = ChainedHashMap::new();
        let mut model = HashMap::new();

        for op in ops {
            match op {
                Op::Put(key, value) => {
                    prop_assert_eq!(map.put(key, value), model.insert(key, value));
                    let threshold = map.policy().threshold();
                    prop_assert!(map.load_factor() <= threshold);
                }
                Op::Remove(key) => {
                    let buckets = map.bucket_count();
                    prop_assert_eq!(map.remove(&key), model.remove(&key));
                    prop_assert_eq!(map.bucket_count(), buckets);
                }
            }
            prop_assert_eq!(map.len(), model.len());
        }

        for (key, value) in &model {
            prop_assert_eq!(map.get(key), Some(value));
        }
        prop_assert_eq!(map.iter().count(), model.len());
    }

    #[test]
    fn set_has_no_duplicates(elements in prop::collection::vec(any::<i64>(), 0..300)) {
        let mut set = ChainedHashSet::new();
        let mut model = HashSet::new();
        for element in &elements {
            prop_assert_eq!(set.add(*element), model.insert(*element));
        }
        prop_assert_eq!(set.len(), model.len());

        let mut seen: Vec<i64> = set.iter().copied().collect();
        seen.sort_unstable();
        let mut expected: Vec<i64> = model.into_iter().collect();
        expected.sort_unstable();
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn resize_is_transparent(
        keys in prop::collection::hash_set(any::<u32>(), 1..500),
        lookups in prop::collection::vec(any::<u32>(), 0..100)
    ) {
        let config = TableConfig::default().initial_buckets(1).load_factor_threshold(1.0);
        let mut map: ChainedHashMap<u32, u32> = ChainedHashMap::with_config(config).unwrap();
        for &key in &keys {
            let before: Vec<Option<u32>> = lookups.iter().map(|lookup| map.get(lookup).copied()).collect();
            let buckets = map.bucket_count();
            map.put(key, key.wrapping_mul(3));

            if map.bucket_count() != buckets {
                // Every lookup other than the key just inserted answers as before
                for (lookup, previous) in lookups.iter().zip(&before) {
                    if *lookup != key {
                        prop_assert_eq!(map.get(lookup).copied(), *previous);
                    }
                }
            }
            prop_assert!(map.load_factor() <= 1.0);
        }
        for key in &keys {
            prop_assert_eq!(map.get(key), Some(&key.wrapping_mul(3)));
        }
    }

    #[test]
    fn removing_absent_keys_changes_nothing(
        present in prop::collection::hash_set(0..1_000_u32, 0..200),
        absent in prop::collection::vec(1_000..2_000_u32, 1..50)
    ) {
        let mut set: ChainedHashSet<u32> = present.iter().copied().collect();
        let len = set.len();
        let buckets = set.bucket_count();
        let generation = set.cursor().generation();
        for key in &absent {
            prop_assert!(!set.remove(key));
            prop_assert!(!set.contains(key));
        }
        prop_assert_eq!(set.len(), len);
        prop_assert_eq!(set.bucket_count(), buckets);
        prop_assert_eq!(set.cursor().generation(), generation);
    }

    #[test]
    fn round_trip(key in ".*", value in any::<u64>()) {
        let mut map = ChainedHashMap::new();
        map.put(key.clone(), value);
        prop_assert_eq!(map.get(&key), Some(&value));

        let mut set = ChainedHashSet::new();
        set.add(key.clone());
        prop_assert!(set.contains(&key));
    }

    #[test]
    fn small_thresholds_hold_the_bound(
        threshold in 0.1_f64..4.0,
        count in 1_usize..300
    ) {
        let config = TableConfig::default().load_factor_threshold(threshold);
        let mut set = ChainedHashSet::with_config(config).unwrap();
        for element in 0..count {
            set.add(element);
            prop_assert!(set.load_factor() <= threshold);
            prop_assert!(set.bucket_count().is_power_of_two());
        }
    }
}
