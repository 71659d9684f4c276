//! Per-lane predicates for scalable vectors.
//!
//! A [`Predicate`] is the governing mask of a predicated vector instruction:
//! one boolean per lane, stored as a bitmask where bit `i` is lane `i`. It
//! supports the primitives predicated loops are written with:
//!
//! - [`Predicate::first`]: keep only the lowest active lane
//! - [`Predicate::next`]: step to the next active lane after a cursor
//! - [`Predicate::any_in`]: test for an active lane under a governing mask
//! - [`Predicate::first_n`]: the "while less than" mask used for loop tails
//!
//! Bits at or above the lane count are always clear, so negation and counting
//! never see lanes the vector does not have.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Not};

use crate::error::{validation_error, SvError};

/// A per-lane boolean mask over a vector of `N` lanes (`1 <= N <= 64`).
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Predicate<const N: usize> {
    bits: u64,
}

impl<const N: usize> Predicate<N> {
    const LANE_LIMIT: () = assert!(N >= 1 && N <= 64, "predicates cover between 1 and 64 lanes");

    /// Mask with every lane of the vector set.
    const MASK: u64 = if N >= 64 { u64::MAX } else { (1u64 << N) - 1 };

    /// Number of lanes governed by this predicate.
    pub const LANES: usize = N;

    #[inline(always)]
    const fn raw(bits: u64) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::LANE_LIMIT;
        Self {
            bits: bits & Self::MASK,
        }
    }

    /// Predicate with no active lane.
    #[inline(always)]
    pub const fn none() -> Self {
        Self::raw(0)
    }

    /// Predicate with every lane active.
    #[inline(always)]
    pub const fn all() -> Self {
        Self::raw(u64::MAX)
    }

    /// Builds a predicate from a bitmask. Bits at or above `N` are dropped.
    #[inline(always)]
    pub const fn from_bits(bits: u64) -> Self {
        Self::raw(bits)
    }

    /// Returns the bitmask, bit `i` set when lane `i` is active.
    #[inline(always)]
    pub const fn bits(self) -> u64 {
        self.bits
    }

    /// Builds a predicate from one boolean per lane.
    pub fn from_lanes(lanes: [bool; N]) -> Self {
        Self::from_fn(|i| lanes[i])
    }

    /// Builds a predicate by asking `f` about each lane in ascending order.
    pub fn from_fn(mut f: impl FnMut(usize) -> bool) -> Self {
        let bits = (0..N).fold(0u64, |acc, i| if f(i) { acc | (1u64 << i) } else { acc });
        Self::raw(bits)
    }

    /// Lanes `0..n` active, the rest inactive. `n >= N` gives [`Predicate::all`].
    #[inline(always)]
    pub const fn first_n(n: usize) -> Self {
        if n >= 64 {
            Self::raw(u64::MAX)
        } else {
            Self::raw((1u64 << n) - 1)
        }
    }

    /// One boolean per lane.
    pub fn to_lanes(self) -> [bool; N] {
        std::array::from_fn(|i| self.is_active(i))
    }

    /// Whether lane `lane` is active. Lanes past the end are never active.
    #[inline(always)]
    pub const fn is_active(self, lane: usize) -> bool {
        lane < N && (self.bits >> lane) & 1 == 1
    }

    /// Whether any lane is active.
    #[inline(always)]
    pub const fn any(self) -> bool {
        self.bits != 0
    }

    /// Whether some lane is active in both `self` and `governing`.
    #[inline(always)]
    pub const fn any_in(self, governing: Self) -> bool {
        self.bits & governing.bits != 0
    }

    /// Number of active lanes, between 0 and `N`.
    #[inline(always)]
    pub const fn count(self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Index of the lowest active lane.
    #[inline(always)]
    pub const fn first_active(self) -> Option<usize> {
        if self.bits == 0 {
            None
        } else {
            Some(self.bits.trailing_zeros() as usize)
        }
    }

    /// Index of the highest active lane.
    #[inline(always)]
    pub const fn last_active(self) -> Option<usize> {
        if self.bits == 0 {
            None
        } else {
            Some(63 - self.bits.leading_zeros() as usize)
        }
    }

    /// Keeps only the lowest active lane. An empty predicate stays empty.
    #[inline(always)]
    pub const fn first(self) -> Self {
        Self::raw(self.bits & self.bits.wrapping_neg())
    }

    /// The first active lane of `self` strictly above the highest active lane
    /// of `prev`.
    ///
    /// With an empty `prev` this is [`Predicate::first`]. Once `prev` has
    /// reached the last active lane of `self` the result is empty, so stepping
    /// a cursor with `next` visits every active lane of `self` exactly once,
    /// in ascending order.
    #[inline(always)]
    pub const fn next(self, prev: Self) -> Self {
        let remaining = match prev.last_active() {
            Some(lane) if lane >= 63 => 0,
            Some(lane) => self.bits & !((1u64 << (lane + 1)) - 1),
            None => self.bits,
        };
        Self::raw(remaining & remaining.wrapping_neg())
    }

    /// Lanes active in `self` but not in `other`.
    #[inline(always)]
    pub const fn and_not(self, other: Self) -> Self {
        Self::raw(self.bits & !other.bits)
    }

    /// Iterates over the active lane indices in ascending order.
    #[inline(always)]
    pub fn lanes(self) -> ActiveLanes {
        ActiveLanes { bits: self.bits }
    }
}

impl<const N: usize> Default for Predicate<N> {
    fn default() -> Self {
        Self::none()
    }
}

impl<const N: usize> fmt::Debug for Predicate<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lanes: String = (0..N)
            .map(|i| if self.is_active(i) { '1' } else { '0' })
            .collect();
        write!(f, "Predicate<{N}>[{lanes}]")
    }
}

impl<const N: usize> BitAnd for Predicate<N> {
    type Output = Self;

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self::Output {
        Self::raw(self.bits & rhs.bits)
    }
}

impl<const N: usize> BitOr for Predicate<N> {
    type Output = Self;

    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self::raw(self.bits | rhs.bits)
    }
}

impl<const N: usize> BitXor for Predicate<N> {
    type Output = Self;

    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self::Output {
        Self::raw(self.bits ^ rhs.bits)
    }
}

impl<const N: usize> Not for Predicate<N> {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self::Output {
        Self::raw(!self.bits)
    }
}

/// Per-element mask of up to `N` lanes. Lanes past the end of a short
/// mask are inactive; a mask longer than the vector is rejected.
impl<const N: usize> TryFrom<&[bool]> for Predicate<N> {
    type Error = SvError;

    fn try_from(mask: &[bool]) -> Result<Self, Self::Error> {
        if mask.len() > N {
            return Err(validation_error(format!(
                "mask of {} lanes does not fit a {N}-lane predicate",
                mask.len()
            )));
        }
        Ok(Self::from_fn(|i| mask.get(i).copied().unwrap_or(false)))
    }
}

/// Ascending iterator over the active lanes of a [`Predicate`].
#[derive(Clone, Debug)]
pub struct ActiveLanes {
    bits: u64,
}

impl Iterator for ActiveLanes {
    type Item = usize;

    #[inline(always)]
    fn next(&mut self) -> Option<usize> {
        if self.bits == 0 {
            return None;
        }
        let lane = self.bits.trailing_zeros() as usize;
        self.bits &= self.bits - 1;
        Some(lane)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bits.count_ones() as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ActiveLanes {}
