//! An insertion-ordered hash set.
//!
//! [`OrderedSet`] keeps its elements in a vector in arrival order and uses a
//! [`HashTable`] of positions into that vector for lookups. Removal leaves a
//! hole in the vector so that the positions of later elements stay valid; the
//! vector is compacted (and the index rebuilt) once holes outnumber live
//! elements.

use alloc::vec::Vec;
use core::fmt;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::hash::Hasher;
use core::iter::FusedIterator;
use core::ops::BitAnd;
use core::ops::BitOr;
use core::ops::BitXor;
use core::ops::Sub;

use crate::error::SetError;
use crate::error::invariant_violation;
use crate::hash_table::Entry;
use crate::hash_table::HashTable;
use crate::hasher::DefaultHashBuilder;
use crate::hasher::unordered_digest;

/// Holes are tolerated up to this count regardless of the live count.
const MIN_HOLES_BEFORE_COMPACT: usize = 8;

/// A hash set that iterates in insertion order.
///
/// Re-adding an element that is already present does not move it. Removing
/// an element and adding it again places it last.
///
/// # Examples
///
/// ```rust
/// use perturb_hash::OrderedSet;
///
/// let mut set: OrderedSet<&str> = OrderedSet::new();
/// set.add("c");
/// set.add("a");
/// set.add("b");
/// set.add("a");
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), ["c", "a", "b"]);
///
/// set.discard(&"c");
/// set.add("c");
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), ["a", "b", "c"]);
/// ```
#[derive(Clone)]
pub struct OrderedSet<T, S = DefaultHashBuilder> {
    entries: Vec<Option<T>>,
    index: HashTable<usize>,
    hash_builder: S,
}

impl<T, S> OrderedSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    /// Creates an empty set with the given hasher builder.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_capacity_and_hasher(0, hash_builder)
    }

    /// Creates an empty set whose index starts with at least `capacity`
    /// slots.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            entries: Vec::new(),
            index: HashTable::with_capacity(capacity),
            hash_builder,
        }
    }

    /// Returns the number of elements in the set.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if the set contains no elements.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns a reference to the set's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Removes all elements from the set.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    fn position_of(&self, hash: u64, value: &T) -> Option<usize> {
        let entries = &self.entries;
        self.index
            .find(hash, |&i| entries[i].as_ref() == Some(value))
            .copied()
    }

    /// Adds a value at the end of the set.
    ///
    /// Returns `false`, leaving the existing element where it is, if an equal
    /// value is already present.
    pub fn add(&mut self, value: T) -> bool {
        let hash = self.hash_builder.hash_one(&value);
        let entries = &self.entries;
        match self.index.entry(hash, |&i| entries[i].as_ref() == Some(&value)) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(self.entries.len());
                self.entries.push(Some(value));
                true
            }
        }
    }

    /// Returns `true` if the set contains a value.
    pub fn contains(&self, value: &T) -> bool {
        let hash = self.hash_builder.hash_one(value);
        self.position_of(hash, value).is_some()
    }

    /// Returns a reference to the stored value equal to `value`, if any.
    pub fn get(&self, value: &T) -> Option<&T> {
        let hash = self.hash_builder.hash_one(value);
        let position = self.position_of(hash, value)?;
        self.entries[position].as_ref()
    }

    fn take(&mut self, value: &T) -> Option<T> {
        let hash = self.hash_builder.hash_one(value);
        let entries = &self.entries;
        let position = self
            .index
            .remove(hash, |&i| entries[i].as_ref() == Some(value))?;
        let taken = self.entries[position].take();
        self.after_removal();
        taken
    }

    /// Removes a value from the set. Returns whether the value was present.
    pub fn discard(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }

    /// Removes a value from the set and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`SetError::NotFound`] if the value is not in the set.
    pub fn remove(&mut self, value: &T) -> Result<T, SetError> {
        self.take(value).ok_or(SetError::NotFound)
    }

    /// Removes and returns the most recently added element.
    ///
    /// # Errors
    ///
    /// Returns [`SetError::EmptyCollection`] if the set is empty.
    ///
    /// ```rust
    /// use perturb_hash::{OrderedSet, SetError};
    ///
    /// let mut set: OrderedSet<i32> = [1, 2, 3].into_iter().collect();
    /// assert_eq!(set.pop(), Ok(3));
    /// assert_eq!(set.pop(), Ok(2));
    /// assert_eq!(set.pop(), Ok(1));
    /// assert_eq!(set.pop(), Err(SetError::EmptyCollection));
    /// ```
    pub fn pop(&mut self) -> Result<T, SetError> {
        self.trim_tail();
        let Some(Some(value)) = self.entries.pop() else {
            return Err(SetError::EmptyCollection);
        };
        let position = self.entries.len();
        let hash = self.hash_builder.hash_one(&value);
        if self.index.remove(hash, |&i| i == position).is_none() {
            invariant_violation("ordered entry missing from its index");
        }
        self.after_removal();
        Ok(value)
    }

    /// Drops holes at the end of the entry vector.
    fn trim_tail(&mut self) {
        while let Some(None) = self.entries.last() {
            self.entries.pop();
        }
    }

    fn after_removal(&mut self) {
        self.trim_tail();
        let holes = self.entries.len() - self.index.len();
        if holes > MIN_HOLES_BEFORE_COMPACT && holes > self.index.len() {
            self.compact();
        }
    }

    /// Closes every hole in the entry vector and rebuilds the index to match.
    fn compact(&mut self) {
        log::debug!(
            "compacting ordered set: {} live of {} entries",
            self.index.len(),
            self.entries.len()
        );
        self.entries.retain(Option::is_some);
        self.index = HashTable::with_capacity_and_policy(
            self.index.capacity(),
            self.index.policy(),
        );
        for (position, value) in self.entries.iter().enumerate() {
            let Some(value) = value else {
                invariant_violation("hole left after compaction");
            };
            let hash = self.hash_builder.hash_one(value);
            self.index.entry(hash, |_| false).or_insert(position);
        }
    }

    /// Returns an iterator over the elements in insertion order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            entries: self.entries.iter(),
            remaining: self.len(),
        }
    }

    /// Returns `true` if `self` has no elements in common with `other`.
    pub fn is_disjoint(&self, other: &OrderedSet<T, S>) -> bool {
        self.iter().all(|v| !other.contains(v))
    }

    /// Returns `true` if every element of `self` is in `other`.
    pub fn is_subset(&self, other: &OrderedSet<T, S>) -> bool {
        self.len() <= other.len() && self.iter().all(|v| other.contains(v))
    }

    /// Returns `true` if every element of `other` is in `self`.
    pub fn is_superset(&self, other: &OrderedSet<T, S>) -> bool {
        other.is_subset(self)
    }

    fn collect_like<'a>(&self, elements: impl Iterator<Item = &'a T>) -> Self
    where
        T: Clone + 'a,
        S: Clone,
    {
        let mut out = Self::with_hasher(self.hash_builder.clone());
        out.extend(elements.cloned());
        out
    }
}

impl<T, S> OrderedSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Creates an empty set whose index starts with at least `capacity`
    /// slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, S::default())
    }
}

impl<T, S> Default for OrderedSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S> PartialEq for OrderedSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    /// Two ordered sets are equal when they hold the same elements, in any
    /// order.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|v| other.contains(v))
    }
}

impl<T, S> Eq for OrderedSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
}

impl<T, S> Hash for OrderedSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        state.write_u64(unordered_digest(self.iter()));
    }
}

impl<T, S> Debug for OrderedSet<T, S>
where
    T: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.iter().flatten()).finish()
    }
}

impl<T, S> fmt::Display for OrderedSet<T, S>
where
    T: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OrderedSet({:?})", self)
    }
}

/// Returns a new set with the elements of `self`, then the new elements of
/// `rhs`, in their respective orders.
impl<T, S> BitOr<&OrderedSet<T, S>> for &OrderedSet<T, S>
where
    T: Hash + Eq + Clone,
    S: BuildHasher + Clone,
{
    type Output = OrderedSet<T, S>;

    fn bitor(self, rhs: &OrderedSet<T, S>) -> OrderedSet<T, S> {
        self.collect_like(self.iter().chain(rhs.iter()))
    }
}

/// Returns a new set with the elements of `self` that are in `rhs`, in the
/// order of `self`.
impl<T, S> BitAnd<&OrderedSet<T, S>> for &OrderedSet<T, S>
where
    T: Hash + Eq + Clone,
    S: BuildHasher + Clone,
{
    type Output = OrderedSet<T, S>;

    fn bitand(self, rhs: &OrderedSet<T, S>) -> OrderedSet<T, S> {
        self.collect_like(self.iter().filter(|v| rhs.contains(v)))
    }
}

/// Returns a new set with the elements of `self` that are not in `rhs`, in
/// the order of `self`.
impl<T, S> Sub<&OrderedSet<T, S>> for &OrderedSet<T, S>
where
    T: Hash + Eq + Clone,
    S: BuildHasher + Clone,
{
    type Output = OrderedSet<T, S>;

    fn sub(self, rhs: &OrderedSet<T, S>) -> OrderedSet<T, S> {
        self.collect_like(self.iter().filter(|v| !rhs.contains(v)))
    }
}

/// Returns a new set with the elements of `self` not in `rhs`, followed by
/// the elements of `rhs` not in `self`.
impl<T, S> BitXor<&OrderedSet<T, S>> for &OrderedSet<T, S>
where
    T: Hash + Eq + Clone,
    S: BuildHasher + Clone,
{
    type Output = OrderedSet<T, S>;

    fn bitxor(self, rhs: &OrderedSet<T, S>) -> OrderedSet<T, S> {
        let left = self.iter().filter(|v| !rhs.contains(v));
        let right = rhs.iter().filter(|v| !self.contains(v));
        self.collect_like(left.chain(right))
    }
}

/// An iterator over the elements of an [`OrderedSet`], in insertion order.
#[derive(Clone)]
pub struct Iter<'a, T> {
    entries: core::slice::Iter<'a, Option<T>>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.entries.by_ref().flatten().next()?;
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let value = self.entries.by_ref().rev().flatten().next()?;
        self.remaining -= 1;
        Some(value)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

/// A consuming iterator over the elements of an [`OrderedSet`], in insertion
/// order.
pub struct IntoIter<T> {
    inner: core::iter::Flatten<alloc::vec::IntoIter<Option<T>>>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl<T, S> IntoIterator for OrderedSet<T, S> {
    type IntoIter = IntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.entries.into_iter().flatten(),
        }
    }
}

impl<'a, T, S> IntoIterator for &'a OrderedSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, S> FromIterator<T> for OrderedSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = OrderedSet::new();
        set.extend(iter);
        set
    }
}

impl<T, S> Extend<T> for OrderedSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec;

    use super::*;
    use crate::hasher::FnvBuildHasher;

    fn ordered(values: &[i32]) -> OrderedSet<i32> {
        values.iter().copied().collect()
    }

    fn contents<S: BuildHasher>(set: &OrderedSet<i32, S>) -> Vec<i32> {
        set.iter().copied().collect()
    }

    #[test]
    fn preserves_insertion_order() {
        let set = ordered(&[5, 3, 9, 1, 3, 5, 7]);
        assert_eq!(contents(&set), vec![5, 3, 9, 1, 7]);
        assert_eq!(set.len(), 5);
        assert_eq!(set.iter().rev().copied().collect::<Vec<_>>(), vec![7, 1, 9, 3, 5]);
    }

    #[test]
    fn discard_and_readd_moves_to_end() {
        let mut set = ordered(&[1, 2, 3]);
        assert!(set.discard(&1));
        assert!(!set.discard(&1));
        assert!(!set.contains(&1));
        assert!(set.add(1));
        assert_eq!(contents(&set), vec![2, 3, 1]);
    }

    #[test]
    fn remove_missing_is_error() {
        let mut set = ordered(&[1]);
        assert_eq!(set.remove(&2), Err(SetError::NotFound));
        assert_eq!(set.remove(&1), Ok(1));
        assert!(set.is_empty());
    }

    #[test]
    fn pop_takes_latest_live_element() {
        let mut set = ordered(&[1, 2, 3, 4]);
        set.discard(&4);
        set.discard(&2);
        assert_eq!(set.pop(), Ok(3));
        assert_eq!(set.pop(), Ok(1));
        assert_eq!(set.pop(), Err(SetError::EmptyCollection));
        assert!(set.is_empty());
        assert!(set.add(9));
        assert_eq!(contents(&set), vec![9]);
    }

    #[test_log::test]
    fn compaction_keeps_order_and_lookups() {
        let mut set: OrderedSet<i32> = (0..200).collect();
        for v in (0..200).filter(|v| v % 10 != 0) {
            assert!(set.discard(&v));
        }
        assert_eq!(set.len(), 20);
        assert!(set.entries.len() - set.len() <= set.len().max(MIN_HOLES_BEFORE_COMPACT));
        assert_eq!(contents(&set), (0..200).step_by(10).collect::<Vec<_>>());
        for v in 0..200 {
            assert_eq!(set.contains(&v), v % 10 == 0);
        }
        set.index.assert_invariants();

        assert!(set.add(5));
        assert_eq!(contents(&set).last(), Some(&5));
        assert_eq!(set.get(&5), Some(&5));
    }

    #[test]
    fn algebra_keeps_operand_order() {
        let a = ordered(&[4, 1, 3]);
        let b = ordered(&[3, 5, 4, 2]);

        assert_eq!(contents(&(&a | &b)), vec![4, 1, 3, 5, 2]);
        assert_eq!(contents(&(&a & &b)), vec![4, 3]);
        assert_eq!(contents(&(&a - &b)), vec![1]);
        assert_eq!(contents(&(&a ^ &b)), vec![1, 5, 2]);
    }

    #[test]
    fn predicates() {
        let a = ordered(&[1, 2]);
        let b = ordered(&[2, 1, 3]);
        let c = ordered(&[7]);
        assert!(a.is_subset(&b));
        assert!(b.is_superset(&a));
        assert!(!b.is_subset(&a));
        assert!(a.is_disjoint(&c));
        assert!(!a.is_disjoint(&b));
    }

    #[test]
    fn equality_and_hash_ignore_order() {
        let a = ordered(&[1, 2, 3]);
        let b = ordered(&[3, 2, 1]);
        assert_eq!(a, b);
        assert_eq!(FnvBuildHasher.hash_one(&a), FnvBuildHasher.hash_one(&b));
        assert_ne!(a, ordered(&[1, 2]));
    }

    #[test]
    fn formatting_lists_insertion_order() {
        let set: OrderedSet<String> = ["b", "a"].iter().map(|s| s.to_string()).collect();
        assert_eq!(format!("{:?}", set), r#"{"b", "a"}"#);
        assert_eq!(set.to_string(), r#"OrderedSet({"b", "a"})"#);
    }

    #[test]
    fn into_iter_and_clear() {
        let mut set = ordered(&[3, 1, 2]);
        set.discard(&1);
        assert_eq!(set.clone().into_iter().collect::<Vec<_>>(), vec![3, 2]);
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.iter().next(), None);
    }
}
