//! Probe sequence generation.
//!
//! A probe starts at `hash & mask` and then follows the recurrence
//! `i = 5*i + 1 + perturb (mod capacity)`. For the first
//! [`LINEAR_PROBES`] steps `perturb` is the full hash; after that it is
//! shifted right by [`PERTURB_SHIFT`] bits before every step, so the upper
//! bits of the hash gradually take part in slot selection. Once `perturb`
//! reaches zero the recurrence is `i = 5*i + 1`, which visits every residue
//! of a power-of-two modulus, so any probe that keeps going eventually
//! reaches every slot.

/// Number of steps taken with the unshifted hash mixed in, before `perturb`
/// starts decaying.
pub const LINEAR_PROBES: usize = 9;

/// Bits dropped from `perturb` before every step of the perturbed phase.
pub const PERTURB_SHIFT: u32 = 5;

/// Multiplier of the probe recurrence. `MULTIPLIER - 1` is divisible by four,
/// which together with an odd [`INCREMENT`] gives a full period modulo any
/// power of two.
pub const MULTIPLIER: u64 = 5;

/// Increment of the probe recurrence.
pub const INCREMENT: u64 = 1;

/// The deterministic, unbounded sequence of slot indices visited for one
/// hash value.
///
/// The first item is always `hash & mask`. The iterator never returns
/// `None`; callers stop as soon as they reach a slot that resolves their
/// search.
///
/// ```rust
/// use perturb_hash::probe::ProbeSeq;
///
/// let visited: Vec<usize> = ProbeSeq::new(0, 7).take(11).collect();
/// assert_eq!(visited, [0, 1, 6, 7, 4, 5, 2, 3, 0, 1, 6]);
/// ```
#[derive(Debug, Clone)]
pub struct ProbeSeq {
    index: usize,
    perturb: u64,
    mask: usize,
    linear_left: usize,
    started: bool,
}

impl ProbeSeq {
    /// Starts a probe for `hash` over a table whose capacity is `mask + 1`.
    ///
    /// `mask + 1` must be a power of two.
    #[inline]
    pub fn new(hash: u64, mask: usize) -> Self {
        debug_assert!(mask.wrapping_add(1).is_power_of_two());
        ProbeSeq {
            index: hash as usize & mask,
            perturb: hash,
            mask,
            linear_left: LINEAR_PROBES,
            started: false,
        }
    }

    /// Current `perturb` value. Exposed for inspection in tests and stats.
    #[inline]
    pub fn perturb(&self) -> u64 {
        self.perturb
    }

    #[inline(always)]
    fn step(&mut self) {
        if self.linear_left > 0 {
            self.linear_left -= 1;
        } else {
            self.perturb >>= PERTURB_SHIFT;
        }
        // Only the low bits survive the mask, so truncating to usize on
        // 32-bit targets does not change the result.
        let next = (self.index as u64)
            .wrapping_mul(MULTIPLIER)
            .wrapping_add(INCREMENT)
            .wrapping_add(self.perturb);
        self.index = next as usize & self.mask;
    }
}

impl Iterator for ProbeSeq {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.started {
            self.step();
        } else {
            self.started = true;
        }
        Some(self.index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}
