use core::fmt;

/// Errors reported by the keyed set facades.
///
/// Absence is only an error for the operations that promise a value back
/// ([`remove`](crate::HashSet::remove) and [`pop`](crate::HashSet::pop));
/// every other operation reports it through a `bool` or `Option`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetError {
    /// The requested element is not in the set.
    NotFound,
    /// The set has no elements to hand out.
    EmptyCollection,
}

impl fmt::Display for SetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetError::NotFound => f.write_str("element not found in set"),
            SetError::EmptyCollection => f.write_str("pop from an empty set"),
        }
    }
}

impl core::error::Error for SetError {}

/// Aborts on a broken table invariant.
///
/// Reaching this means the engine itself is wrong, so there is nothing a
/// caller could do with an error value.
#[cold]
#[inline(never)]
#[track_caller]
pub(crate) fn invariant_violation(what: &str) -> ! {
    panic!("hash table invariant violated: {what}")
}
