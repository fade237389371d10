#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// Error type for the keyed sets.
pub mod error;

/// The raw open-addressing engine: slot array, probing, tombstones and
/// growth.
pub mod hash_table;

/// A hash set built on the perturbation-probing `HashTable`.
///
/// This module provides a `HashSet` that wraps the `HashTable` and provides
/// a standard set interface with configurable hashers.
pub mod hash_set;

pub mod hasher;

pub mod ordered_set;

pub mod probe;

pub mod slot;

pub use error::SetError;
pub use hash_set::HashSet;
pub use hash_table::GrowthPolicy;
pub use hash_table::HashTable;
pub use hasher::DefaultHashBuilder;
pub use ordered_set::OrderedSet;
