use alloc::boxed::Box;
#[cfg(any(test, feature = "stats"))]
use alloc::vec::Vec;
use core::fmt::Debug;
use core::iter::FusedIterator;
use core::mem;

use crate::error::invariant_violation;
use crate::probe::ProbeSeq;
use crate::slot;
use crate::slot::Slot;

/// Smallest number of slots a table ever has.
pub const MIN_CAPACITY: usize = 8;

/// The table grows once `fill / capacity` reaches
/// `MAX_LOAD_NUMERATOR / MAX_LOAD_DENOMINATOR`.
const MAX_LOAD_NUMERATOR: usize = 2;
const MAX_LOAD_DENOMINATOR: usize = 3;

/// Controls how far the table grows when it crosses its load limit.
///
/// On growth the table is rebuilt with room for `used * small_growth` live
/// entries while `used <= small_table_limit`, and `used * large_growth`
/// beyond that, trading memory for fewer rebuilds on small tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthPolicy {
    /// Largest live count that still grows by `small_growth`.
    pub small_table_limit: usize,
    /// Growth multiplier applied to small tables.
    pub small_growth: usize,
    /// Growth multiplier applied to large tables.
    pub large_growth: usize,
}

impl GrowthPolicy {
    /// The policy used unless another one is requested.
    pub const DEFAULT: GrowthPolicy = GrowthPolicy {
        small_table_limit: 50_000,
        small_growth: 4,
        large_growth: 2,
    };

    /// Minimum live count the rebuilt table must accommodate.
    #[inline]
    pub fn target(&self, used: usize) -> usize {
        let factor = if used <= self.small_table_limit {
            self.small_growth
        } else {
            self.large_growth
        };
        used.checked_mul(factor)
            .unwrap_or_else(|| invariant_violation("capacity overflow"))
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Smallest power of two, at least [`MIN_CAPACITY`], that is strictly
/// greater than `minused`.
fn capacity_above(minused: usize) -> usize {
    let mut capacity = MIN_CAPACITY;
    while capacity <= minused {
        capacity = capacity
            .checked_mul(2)
            .unwrap_or_else(|| invariant_violation("capacity overflow"));
    }
    capacity
}

fn empty_slots<V>(capacity: usize) -> Box<[Slot<V>]> {
    (0..capacity).map(|_| Slot::Empty).collect()
}

/// Debug statistics for hash table analysis.
///
/// Available in tests or with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of live values
    pub used: usize,
    /// Number of live values plus tombstones
    pub fill: usize,
    /// Number of tombstones
    pub tombstones: usize,
    /// Total number of slots allocated
    pub capacity: usize,
    /// Load factor (fill / capacity)
    pub load_factor: f64,
    /// Longest probe, in steps past the home slot, needed to reach a live value
    pub max_probe_length: usize,
    /// Mean probe length over all live values
    pub mean_probe_length: f64,
    /// Total memory in bytes used by the slot array
    pub total_bytes: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Slots: {} used, {} tombstones, {} total ({:.2}% load factor)",
            self.used,
            self.tombstones,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Probe length: max {}, mean {:.3}",
            self.max_probe_length, self.mean_probe_length
        );
        println!("Total Allocated: {} bytes", self.total_bytes);
    }
}

/// Count of live values per probe length.
///
/// `counts[n]` is the number of values found `n` steps after their home slot.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeHistogram {
    /// Values per probe length.
    pub counts: Vec<usize>,
}

#[cfg(any(test, feature = "stats"))]
impl ProbeHistogram {
    /// Pretty-prints the histogram horizontally using stdout.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let max = self.counts.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("probe histogram: empty");
            return;
        }

        let max_bar = 60usize;
        println!(
            "probe histogram ({} entries):",
            self.counts.iter().sum::<usize>()
        );
        for (len, &count) in self.counts.iter().enumerate() {
            let width = (count * max_bar).div_ceil(max);
            println!("{:>3} | {} ({})", len, "█".repeat(width), count);
        }
    }
}

/// An open-addressing hash table with linear-then-perturbed probing and
/// tombstone deletion.
///
/// `HashTable<V>` stores values of type `V`. Like other raw tables, it does
/// not hash anything itself: every operation takes the value's hash and an
/// equality predicate, and each live slot caches the hash it was inserted
/// with so rebuilding never calls back into user code.
///
/// The slot array always has a power-of-two length of at least
/// [`MIN_CAPACITY`]. Removing a value leaves a tombstone so that probe
/// chains passing through the slot stay intact; tombstones count toward the
/// load limit and are dropped when the table is rebuilt.
///
/// ## Example
///
/// ```rust
/// use perturb_hash::hash_table::Entry;
/// use perturb_hash::hash_table::HashTable;
///
/// let mut table: HashTable<(u32, &str)> = HashTable::with_capacity(0);
/// let hash = 0x5eed;
///
/// match table.entry(hash, |(id, _)| *id == 7) {
///     Entry::Vacant(entry) => {
///         entry.insert((7, "seven"));
///     }
///     Entry::Occupied(_) => unreachable!(),
/// }
///
/// assert_eq!(table.find(hash, |(id, _)| *id == 7), Some(&(7, "seven")));
/// assert_eq!(table.capacity(), 8);
/// ```
#[derive(Clone)]
pub struct HashTable<V> {
    slots: Box<[Slot<V>]>,
    used: usize,
    fill: usize,
    policy: GrowthPolicy,
    /// Slot where the next `pop_first` scan starts.
    finger: usize,
}

impl<V> Debug for HashTable<V>
where
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        struct SlotMap<'a, V>(&'a [Slot<V>]);

        impl<V: Debug> Debug for SlotMap<'_, V> {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                let mut list = f.debug_list();
                for slot in self.0 {
                    match slot {
                        Slot::Empty => list.entry(&format_args!("..")),
                        Slot::Tombstone => list.entry(&format_args!("<dead>")),
                        Slot::Active { hash, value } => {
                            list.entry(&format_args!("{hash:016x}: {value:?}"))
                        }
                    };
                }
                list.finish()
            }
        }

        f.debug_struct("HashTable")
            .field("used", &self.used)
            .field("fill", &self.fill)
            .field("capacity", &self.capacity())
            .field("slots", &SlotMap(&self.slots))
            .finish()
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<V> HashTable<V> {
    /// Creates a new hash table with at least `capacity` slots.
    ///
    /// The slot count is rounded up to the next power of two, and is never
    /// smaller than [`MIN_CAPACITY`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use perturb_hash::hash_table::HashTable;
    /// #
    /// assert_eq!(HashTable::<u8>::with_capacity(0).capacity(), 8);
    /// assert_eq!(HashTable::<u8>::with_capacity(9).capacity(), 16);
    /// assert_eq!(HashTable::<u8>::with_capacity(100).capacity(), 128);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_policy(capacity, GrowthPolicy::DEFAULT)
    }

    /// Creates a new hash table with at least `capacity` slots that grows
    /// according to `policy`.
    pub fn with_capacity_and_policy(capacity: usize, policy: GrowthPolicy) -> Self {
        let capacity = capacity
            .max(MIN_CAPACITY)
            .checked_next_power_of_two()
            .unwrap_or_else(|| invariant_violation("capacity overflow"));

        Self {
            slots: empty_slots(capacity),
            used: 0,
            fill: 0,
            policy,
            finger: 0,
        }
    }

    #[inline(always)]
    fn mask(&self) -> usize {
        self.slots.len() - 1
    }

    /// Returns the number of live values in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.used
    }

    /// Returns `true` if the table holds no live values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    /// Returns the number of slots in the table.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of slots that are live or tombstoned.
    #[inline]
    pub fn fill(&self) -> usize {
        self.fill
    }

    /// Returns the growth policy of this table.
    #[inline]
    pub fn policy(&self) -> GrowthPolicy {
        self.policy
    }

    /// Read-only view of the slot array, in iteration order.
    #[inline]
    pub fn slots(&self) -> &[Slot<V>] {
        &self.slots
    }

    /// Locates the slot for a lookup: either the live slot holding a match or
    /// the `Empty` slot that ends the probe.
    fn find_slot(&self, hash: u64, eq: &impl Fn(&V) -> bool) -> usize {
        for index in ProbeSeq::new(hash, self.mask()) {
            let slot = &self.slots[index];
            if slot.is_empty() || slot.matches(hash, eq) {
                return index;
            }
        }
        invariant_violation("probe sequence ended")
    }

    /// Locates the slot for an insertion: the live slot holding a match if
    /// there is one, otherwise the first tombstone passed on the way, otherwise
    /// the `Empty` slot that ends the probe.
    ///
    /// The probe keeps going past tombstones because a matching value may have
    /// been inserted further along the chain before the tombstone was made.
    fn find_insert_slot(&self, hash: u64, eq: &impl Fn(&V) -> bool) -> usize {
        let mut reusable = None;
        for index in ProbeSeq::new(hash, self.mask()) {
            match &self.slots[index] {
                Slot::Empty => return reusable.unwrap_or(index),
                Slot::Tombstone => {
                    reusable.get_or_insert(index);
                }
                slot => {
                    if slot.matches(hash, eq) {
                        return index;
                    }
                }
            }
        }
        invariant_violation("probe sequence ended")
    }

    /// Finds a value in the table.
    ///
    /// Searches for a value with the given `hash` that satisfies `eq`. The
    /// cached hash of each probed slot is compared before `eq` is called.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use perturb_hash::hash_table::{Entry, HashTable};
    /// #
    /// let mut table = HashTable::with_capacity(0);
    /// if let Entry::Vacant(entry) = table.entry(11, |v: &u64| *v == 42) {
    ///     entry.insert(42);
    /// }
    ///
    /// assert_eq!(table.find(11, |v| *v == 42), Some(&42));
    /// assert_eq!(table.find(12, |v| *v == 42), None);
    /// ```
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        let index = self.find_slot(hash, &eq);
        self.slots[index].value()
    }

    /// Finds a value in the table and returns a mutable reference to it.
    ///
    /// The caller must not change the value in a way that changes its hash or
    /// its equality with other values.
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        let index = self.find_slot(hash, &eq);
        match &mut self.slots[index] {
            Slot::Active { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Gets the entry for the value with `hash` satisfying `eq`, for in-place
    /// inspection or insertion.
    ///
    /// A vacant entry remembers the slot it will be written to: a reusable
    /// tombstone if the probe passed one, otherwise the `Empty` slot that
    /// ended it.
    pub fn entry(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Entry<'_, V> {
        let index = self.find_insert_slot(hash, &eq);
        if self.slots[index].is_active() {
            Entry::Occupied(OccupiedEntry { table: self, index })
        } else {
            Entry::Vacant(VacantEntry {
                table: self,
                hash,
                index,
            })
        }
    }

    /// Removes a value from the table, leaving a tombstone in its slot.
    ///
    /// Returns the removed value, or `None` if no value with `hash`
    /// satisfies `eq`. `fill` is unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use perturb_hash::hash_table::{Entry, HashTable};
    /// #
    /// let mut table = HashTable::with_capacity(0);
    /// if let Entry::Vacant(entry) = table.entry(1, |v: &&str| *v == "one") {
    ///     entry.insert("one");
    /// }
    ///
    /// assert_eq!(table.remove(1, |v| *v == "one"), Some("one"));
    /// assert_eq!(table.remove(1, |v| *v == "one"), None);
    /// assert_eq!(table.len(), 0);
    /// assert_eq!(table.fill(), 1);
    /// ```
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<V> {
        let index = self.find_slot(hash, &eq);
        if !self.slots[index].is_active() {
            return None;
        }
        Some(self.vacate(index))
    }

    fn vacate(&mut self, index: usize) -> V {
        let value = slot::vacate(&mut self.slots[index]);
        self.used -= 1;
        value
    }

    /// Removes and returns a live value, scanning in slot order from where
    /// the previous pop stopped.
    ///
    /// The scan position survives between calls, so popping every value is
    /// linear in the capacity overall. It restarts at slot 0 after `clear`,
    /// `drain` and any rebuild.
    pub fn pop_first(&mut self) -> Option<V> {
        if self.used == 0 {
            return None;
        }
        let mask = self.mask();
        let mut index = self.finger & mask;
        for _ in 0..self.slots.len() {
            if self.slots[index].is_active() {
                self.finger = index + 1;
                return Some(self.vacate(index));
            }
            index = (index + 1) & mask;
        }
        invariant_violation("live count with no active slot")
    }

    /// Retains only the values for which `keep` returns `true`.
    ///
    /// Rejected values are tombstoned in place; the table is not rebuilt.
    pub fn retain(&mut self, mut keep: impl FnMut(&V) -> bool) {
        for slot in self.slots.iter_mut() {
            if let Slot::Active { value, .. } = slot {
                if !keep(value) {
                    slot::vacate(slot);
                    self.used -= 1;
                }
            }
        }
    }

    /// Removes all values, keeping the current number of slots.
    ///
    /// All tombstones are discarded as well.
    pub fn clear(&mut self) {
        if self.fill == 0 {
            return;
        }
        log::trace!("clearing table of {} slots", self.slots.len());
        self.slots = empty_slots(self.slots.len());
        self.used = 0;
        self.fill = 0;
        self.finger = 0;
    }

    /// Removes all values and returns them as an iterator, keeping the current
    /// number of slots.
    pub fn drain(&mut self) -> Drain<'_, V> {
        let capacity = self.slots.len();
        let slots = mem::replace(&mut self.slots, empty_slots(capacity));
        let remaining = mem::take(&mut self.used);
        self.fill = 0;
        self.finger = 0;
        Drain {
            inner: IntoIter {
                slots: slots.into_vec().into_iter(),
                remaining,
            },
            _table: core::marker::PhantomData,
        }
    }

    /// Returns an iterator over the live values in slot order.
    ///
    /// The order depends only on the current slot layout, so repeated calls on
    /// an unmodified table yield the same sequence. The iterator borrows the
    /// table, so the table cannot be modified while it is alive.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.used,
        }
    }

    #[inline(always)]
    fn over_load_limit(&self) -> bool {
        self.fill.saturating_mul(MAX_LOAD_DENOMINATOR)
            >= self.slots.len().saturating_mul(MAX_LOAD_NUMERATOR)
    }

    /// Rebuilds the table so that it has room for at least `minused` live
    /// values.
    ///
    /// Only live values are carried over, so all tombstones are dropped. The
    /// new slot count is the smallest power of two, at least
    /// [`MIN_CAPACITY`], that is strictly greater than `minused` and keeps the
    /// current live values under the load limit. Asking for less than `len()`
    /// shrinks the table only as far as that limit allows.
    pub fn resize(&mut self, minused: usize) {
        self.resize_tracking(minused, usize::MAX);
    }

    /// Rebuilds the table and returns the new index of the value that was in
    /// slot `track` (or `usize::MAX` if that slot was not live).
    fn resize_tracking(&mut self, minused: usize, track: usize) -> usize {
        // `used * 3 < capacity * 2` must hold after the rebuild.
        let floor = self
            .used
            .checked_mul(MAX_LOAD_DENOMINATOR)
            .unwrap_or_else(|| invariant_violation("capacity overflow"))
            / MAX_LOAD_NUMERATOR;
        let capacity = capacity_above(minused.max(floor));
        let old = mem::replace(&mut self.slots, empty_slots(capacity));
        self.finger = 0;
        let old_capacity = old.len();
        let live = self.used;
        self.used = 0;
        self.fill = 0;

        let mut tracked = usize::MAX;
        for (old_index, old_slot) in old.into_vec().into_iter().enumerate() {
            if let Slot::Active { hash, value } = old_slot {
                let index = self.insert_fresh(hash, value);
                if old_index == track {
                    tracked = index;
                }
            }
        }
        debug_assert_eq!(self.used, live);

        log::debug!(
            "resized hash table from {} to {} slots ({} live)",
            old_capacity,
            capacity,
            live
        );
        tracked
    }

    /// Writes a value known not to be present into the first `Empty` slot of
    /// its probe sequence. Only valid on a table without tombstones.
    fn insert_fresh(&mut self, hash: u64, value: V) -> usize {
        debug_assert_eq!(self.used, self.fill);
        for index in ProbeSeq::new(hash, self.mask()) {
            if self.slots[index].is_empty() {
                slot::occupy(&mut self.slots[index], hash, value);
                self.used += 1;
                self.fill += 1;
                return index;
            }
        }
        invariant_violation("probe sequence ended")
    }

    /// Computes the probe length of every live value.
    #[cfg(any(test, feature = "stats"))]
    fn probe_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        let mask = self.mask();
        self.slots.iter().enumerate().filter_map(move |(index, slot)| {
            let Slot::Active { hash, .. } = slot else {
                return None;
            };
            ProbeSeq::new(*hash, mask).position(|probed| probed == index)
        })
    }

    /// Computes a histogram of probe lengths for the current table state.
    ///
    /// Available in tests or with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> ProbeHistogram {
        let mut counts = Vec::new();
        for len in self.probe_lengths() {
            if counts.len() <= len {
                counts.resize(len + 1, 0);
            }
            counts[len] += 1;
        }
        ProbeHistogram { counts }
    }

    /// Returns detailed utilization statistics for debugging.
    ///
    /// Available in tests or with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let (max_probe_length, total_probe_length) = self
            .probe_lengths()
            .fold((0, 0), |(max, total), len| (max.max(len), total + len));

        DebugStats {
            used: self.used,
            fill: self.fill,
            tombstones: self.fill - self.used,
            capacity: self.slots.len(),
            load_factor: self.fill as f64 / self.slots.len() as f64,
            max_probe_length,
            mean_probe_length: if self.used == 0 {
                0.0
            } else {
                total_probe_length as f64 / self.used as f64
            },
            total_bytes: self.slots.len() * mem::size_of::<Slot<V>>(),
        }
    }

    /// Verifies the counters against the slot array.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let active = self.slots.iter().filter(|s| s.is_active()).count();
        let tombstones = self
            .slots
            .iter()
            .filter(|s| matches!(s, Slot::Tombstone))
            .count();
        assert!(self.slots.len().is_power_of_two());
        assert!(self.slots.len() >= MIN_CAPACITY);
        assert_eq!(self.used, active);
        assert_eq!(self.fill, active + tombstones);
        assert!(self.used <= self.fill && self.fill <= self.slots.len());
        assert!(!self.over_load_limit());
    }
}

/// A view into a single entry in the hash table, which may be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashTable`].
///
/// [`entry`]: HashTable::entry
pub enum Entry<'a, V> {
    /// A live slot holding a matching value.
    Occupied(OccupiedEntry<'a, V>),
    /// No matching value; holds the slot an insertion would use.
    Vacant(VacantEntry<'a, V>),
}

impl<'a, V> Entry<'a, V> {
    /// Ensures a value is in the entry by inserting `default` if vacant, and
    /// returns a mutable reference to the value.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Like [`or_insert`](Self::or_insert), but only builds the value when the
    /// entry is vacant.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }
}

/// A view into a vacant entry in a [`HashTable`].
pub struct VacantEntry<'a, V> {
    table: &'a mut HashTable<V>,
    hash: u64,
    index: usize,
}

impl<'a, V> VacantEntry<'a, V> {
    /// Inserts a value into the vacant entry, growing the table if this
    /// insertion pushes it to its load limit.
    ///
    /// Returns a mutable reference to the inserted value, wherever it ended up
    /// after any growth.
    pub fn insert(self, value: V) -> &'a mut V {
        let table = self.table;
        let slot = &mut table.slots[self.index];
        if slot.is_empty() {
            table.fill += 1;
        }
        slot::occupy(slot, self.hash, value);
        table.used += 1;

        let index = if table.over_load_limit() {
            let minused = table.policy.target(table.used);
            table.resize_tracking(minused, self.index)
        } else {
            self.index
        };

        slot::value_mut(&mut table.slots[index])
    }

    /// Slot index the value will be written to.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// A view into an occupied entry in a [`HashTable`].
pub struct OccupiedEntry<'a, V> {
    table: &'a mut HashTable<V>,
    index: usize,
}

impl<'a, V> OccupiedEntry<'a, V> {
    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        match &self.table.slots[self.index] {
            Slot::Active { value, .. } => value,
            _ => invariant_violation("occupied entry points at a dead slot"),
        }
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        slot::value_mut(&mut self.table.slots[self.index])
    }

    /// Converts the entry into a mutable reference to its value.
    pub fn into_mut(self) -> &'a mut V {
        slot::value_mut(&mut self.table.slots[self.index])
    }

    /// Replaces the value in the entry, returning the old one. The cached
    /// hash is kept.
    pub fn replace(&mut self, value: V) -> V {
        let slot = &mut self.table.slots[self.index];
        let hash = match slot {
            Slot::Active { hash, .. } => *hash,
            _ => invariant_violation("occupied entry points at a dead slot"),
        };
        slot::overwrite(slot, hash, value)
    }

    /// Removes the value, leaving a tombstone, and returns it.
    pub fn remove(self) -> V {
        self.table.vacate(self.index)
    }

    /// Slot index of the value.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// An iterator over the live values of a [`HashTable`], in slot order.
#[derive(Clone)]
pub struct Iter<'a, V> {
    slots: core::slice::Iter<'a, Slot<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        for slot in self.slots.by_ref() {
            if let Slot::Active { value, .. } = slot {
                self.remaining -= 1;
                return Some(value);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}
impl<V> FusedIterator for Iter<'_, V> {}

/// An owning iterator over the live values of a [`HashTable`], in slot
/// order.
pub struct IntoIter<V> {
    slots: alloc::vec::IntoIter<Slot<V>>,
    remaining: usize,
}

impl<V> Iterator for IntoIter<V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        for slot in self.slots.by_ref() {
            if let Slot::Active { value, .. } = slot {
                self.remaining -= 1;
                return Some(value);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}
impl<V> FusedIterator for IntoIter<V> {}

impl<V> IntoIterator for HashTable<V> {
    type IntoIter = IntoIter<V>;
    type Item = V;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            slots: self.slots.into_vec().into_iter(),
            remaining: self.used,
        }
    }
}

impl<'a, V> IntoIterator for &'a HashTable<V> {
    type IntoIter = Iter<'a, V>;
    type Item = &'a V;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A draining iterator over the values of a [`HashTable`].
///
/// The table is already empty when this is returned; values not consumed
/// are dropped with the iterator.
pub struct Drain<'a, V> {
    inner: IntoIter<V>,
    _table: core::marker::PhantomData<&'a mut HashTable<V>>,
}

impl<V> Iterator for Drain<'_, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Drain<'_, V> {}
