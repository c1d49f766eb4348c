//! # Chained Hash Tables
//!
//! A Rust implementation of a hash table resolving collisions by separate
//! chaining.
//!
//! This crate provides two containers built on one bucket engine:
//!
//! - `ChainedHashMap`: associates each key with exactly one value
//! - `ChainedHashSet`: stores distinct elements with no payload
//!
//! Each bucket holds a chain of the entries whose keys hash to it. Lookups
//! scan one chain and compare keys by equality. When an insertion would push
//! the average chain length past the load factor threshold (3.0 by default),
//! the bucket array doubles and every entry is rehashed into it. Operations
//! are amortized O(1) under a uniform hash and degrade to O(chain length)
//! when many keys collide.
//!
//! Both containers are single-threaded and hold no locks.
//!
//! ## Basic Usage
//!
//! ```rust
//! use chaintable::ChainedHashMap;
//!
//! // Create a new hash map
//! let mut map = ChainedHashMap::new();
//!
//! // Insert values
//! map.put("apple".to_string(), 1);
//! map.put("banana".to_string(), 2);
//!
//! // Retrieve values
//! assert_eq!(map.get("apple"), Some(&1));
//!
//! // Update values
//! assert_eq!(map.put("apple".to_string(), 10), Some(1));
//! assert_eq!(map.get("apple"), Some(&10));
//!
//! // Remove values
//! map.remove("apple");
//! assert_eq!(map.get("apple"), None);
//! ```
//!
//! ## Sets and cursors
//!
//! ```rust
//! use chaintable::{ChainedHashSet, TableError};
//!
//! let mut set = ChainedHashSet::new();
//! assert!(set.add("x"));
//! assert!(!set.add("x"));
//!
//! // A cursor does not borrow the set, so the set can change under it
//! let mut cursor = set.cursor();
//! set.add("y");
//! assert!(matches!(
//!     set.advance(&mut cursor),
//!     Err(TableError::IteratorInvalidated { .. })
//! ));
//! ```

/// Module holding the fixed-size array of chains
mod bucket;
/// Module resolving keys inside a single chain
mod chain;
/// Uniform container traits
mod collection;
/// Construction parameters
mod config;
/// Hashing and bucket index reduction
pub mod distributor;
/// Error type
mod error;
/// Module implementing the chained hash map
mod map;
/// Load factor policy
mod policy;
/// Module implementing the chained hash set
mod set;
/// The bucket engine shared by the map and the set
mod table;

pub use collection::{Associative, Collection, MapExtensions};
pub use config::TableConfig;
pub use error::{Invalidation, TableError};
pub use map::ChainedHashMap;
pub use policy::{ResizePolicy, load_factor};
pub use set::{ChainedHashSet, SetIter};
pub use table::{Cursor, Iter, TableStats};
