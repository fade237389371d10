//! Slot model and the storage policy used to write slots.
//!
//! Every write to the backing array goes through the functions in this module
//! so the choice between mutating an `Active` slot's fields in place and
//! replacing the whole slot value stays an internal detail. The default policy
//! mutates in place; the `replace-on-write` feature rebuilds the slot on every
//! write. Both produce identical layouts.

use core::mem;

use crate::error::invariant_violation;

/// One cell of the backing array.
#[derive(Clone, Debug, Default)]
pub enum Slot<V> {
    /// Never written since the array was allocated. Terminates probes.
    #[default]
    Empty,
    /// Previously held a value that was removed. Probes continue through it.
    Tombstone,
    /// Holds a live value together with its cached hash.
    Active {
        /// Hash the value was inserted with.
        hash: u64,
        /// The stored value.
        value: V,
    },
}

impl<V> Slot<V> {
    /// Whether the slot has never been written.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }

    /// Whether the slot holds a live value.
    #[inline(always)]
    pub fn is_active(&self) -> bool {
        matches!(self, Slot::Active { .. })
    }

    /// The live value, if any.
    #[inline(always)]
    pub fn value(&self) -> Option<&V> {
        match self {
            Slot::Active { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Whether this slot is live and holds a value with `hash` for which `eq`
    /// returns `true`. The cached hash is compared first.
    #[inline(always)]
    pub(crate) fn matches(&self, hash: u64, eq: &impl Fn(&V) -> bool) -> bool {
        match self {
            Slot::Active { hash: cached, value } => *cached == hash && eq(value),
            _ => false,
        }
    }
}

/// Writes a live value into a slot that is `Empty` or a `Tombstone`.
#[inline(always)]
pub(crate) fn occupy<V>(slot: &mut Slot<V>, hash: u64, value: V) {
    debug_assert!(!slot.is_active());
    *slot = Slot::Active { hash, value };
}

/// Turns a live slot into a tombstone and hands back its value.
#[inline(always)]
pub(crate) fn vacate<V>(slot: &mut Slot<V>) -> V {
    match mem::replace(slot, Slot::Tombstone) {
        Slot::Active { value, .. } => value,
        _ => invariant_violation("vacated a slot that was not active"),
    }
}

/// Returns a mutable reference to the value in a live slot.
#[inline(always)]
pub(crate) fn value_mut<V>(slot: &mut Slot<V>) -> &mut V {
    match slot {
        Slot::Active { value, .. } => value,
        _ => invariant_violation("expected an active slot"),
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "replace-on-write")] {
        /// Stores `value` in a live slot whose cached hash is `hash`, returning
        /// the value it replaces.
        #[inline(always)]
        pub(crate) fn overwrite<V>(slot: &mut Slot<V>, hash: u64, value: V) -> V {
            match mem::replace(slot, Slot::Active { hash, value }) {
                Slot::Active { hash: previous, value } => {
                    debug_assert_eq!(previous, hash);
                    value
                }
                _ => invariant_violation("overwrote a slot that was not active"),
            }
        }
    } else {
        /// Stores `value` in a live slot whose cached hash is `hash`, returning
        /// the value it replaces.
        #[inline(always)]
        pub(crate) fn overwrite<V>(slot: &mut Slot<V>, hash: u64, value: V) -> V {
            match slot {
                Slot::Active { hash: cached, value: current } => {
                    debug_assert_eq!(*cached, hash);
                    mem::replace(current, value)
                }
                _ => invariant_violation("overwrote a slot that was not active"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occupy_vacate_cycle() {
        let mut slot: Slot<u32> = Slot::default();
        assert!(slot.is_empty());

        occupy(&mut slot, 17, 5);
        assert!(slot.is_active());
        assert!(slot.matches(17, &|v: &u32| *v == 5));
        assert!(!slot.matches(18, &|v: &u32| *v == 5));
        assert!(!slot.matches(17, &|v: &u32| *v == 6));

        assert_eq!(vacate(&mut slot), 5);
        assert!(matches!(slot, Slot::Tombstone));
        assert_eq!(slot.value(), None);
        assert!(!slot.matches(17, &|_: &u32| true));

        occupy(&mut slot, 3, 9);
        assert_eq!(slot.value(), Some(&9));
    }

    #[test]
    fn overwrite_keeps_hash() {
        let mut slot = Slot::Active { hash: 42, value: "old" };
        assert_eq!(overwrite(&mut slot, 42, "new"), "old");
        match slot {
            Slot::Active { hash, value } => {
                assert_eq!(hash, 42);
                assert_eq!(value, "new");
            }
            _ => panic!("slot should stay active"),
        }
    }

    #[cfg(feature = "replace-on-write")]
    #[test]
    fn overwrite_replaces_whole_slot() {
        let mut slot = Slot::Active {
            hash: 7,
            value: alloc::vec![1u8, 2],
        };
        let old = overwrite(&mut slot, 7, alloc::vec![3]);
        assert_eq!(old, [1, 2]);
        assert!(slot.matches(7, &|v: &alloc::vec::Vec<u8>| v == &[3]));
    }

    #[test]
    #[should_panic(expected = "vacated a slot that was not active")]
    fn vacate_empty_is_fatal() {
        let mut slot: Slot<u8> = Slot::Empty;
        vacate(&mut slot);
    }
}
