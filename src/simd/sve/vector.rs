//! Scalable vector value type.
//!
//! [`Vector`] wraps `N` lanes of one element kind and provides the
//! vocabulary predicated math kernels are written in:
//!
//! - **Construction**: [`Vector::splat`] (broadcast), [`Vector::from_array`],
//!   [`Vector::from_fn`], and slice loading through [`SimdLoad`]
//! - **Predicated arithmetic**: [`Vector::fma`] and [`Vector::fma_n`] update
//!   only the lanes their predicate selects
//! - **Lane movement**: [`Vector::select`] merges two vectors under a predicate,
//!   [`Vector::extract_last`] reads the highest active lane
//! - **Views**: [`Vector::to_bits`], [`Vector::from_bits`] and
//!   [`Vector::reinterpret`] change the element kind without touching bits
//! - **Comparisons**: `*_elements` methods produce a [`Predicate`]
//!
//! Lane-wise `+ - * /` are available for every kind (integers wrap), and
//! `& | ^ !` for the integer kinds.
//!
//! # Reinterpretation
//!
//! Reinterpretation is a view change: the lane array is cast as a whole with
//! [`bytemuck::cast`], which is only possible between kinds marked
//! [`BitCast`], i.e. kinds of the same width. No lane value is converted, so
//! NaN payloads and negative zero survive a round trip.

use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Index, Mul, Not, Sub};

use num::Float;

use crate::simd::{
    sve::predicate::Predicate, BitCast, Element, FloatElement, IntElement, SimdLoad, SimdStore,
};

/// `N` lanes of element kind `T`.
///
/// # Usage
///
/// ```rust
/// use svmath::simd::sve::{predicate::Predicate, vector::Vector};
///
/// let x = Vector::from_array([1.0f64, 2.0, 3.0, 4.0]);
/// let pg = Predicate::from_lanes([true, false, true, false]);
///
/// // z + x * y on the active lanes, z elsewhere
/// let z = Vector::splat(10.0);
/// let r = Vector::fma(pg, x, x, z);
/// assert_eq!(r.to_array(), [11.0, 10.0, 19.0, 10.0]);
///
/// // Integer view of the same bits
/// let bits = Vector::<f64, 4>::splat(1.0).to_bits();
/// assert_eq!(bits.lane(0), 0x3FF0_0000_0000_0000);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
#[repr(transparent)]
pub struct Vector<T: Element, const N: usize> {
    /// Lane values, lane 0 first.
    pub elements: [T; N],
}

impl<T: Element, const N: usize> Vector<T, N> {
    /// Number of lanes.
    pub const LANES: usize = N;

    /// Every lane set to `value`.
    #[inline(always)]
    pub fn splat(value: T) -> Self {
        Self {
            elements: [value; N],
        }
    }

    #[inline(always)]
    pub fn from_array(elements: [T; N]) -> Self {
        Self { elements }
    }

    /// Builds a vector by asking `f` for each lane in ascending order.
    #[inline(always)]
    pub fn from_fn(f: impl FnMut(usize) -> T) -> Self {
        Self {
            elements: std::array::from_fn(f),
        }
    }

    #[inline(always)]
    pub fn to_array(self) -> [T; N] {
        self.elements
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        &self.elements
    }

    /// Value of lane `lane`.
    ///
    /// # Panics
    ///
    /// Panics if `lane >= N`.
    #[inline(always)]
    pub fn lane(&self, lane: usize) -> T {
        self.elements[lane]
    }

    /// Lanes of `on_true` where `pg` is active, lanes of `on_false` elsewhere.
    #[inline(always)]
    pub fn select(pg: Predicate<N>, on_true: Self, on_false: Self) -> Self {
        Self::from_fn(|i| {
            if pg.is_active(i) {
                on_true.elements[i]
            } else {
                on_false.elements[i]
            }
        })
    }

    /// Value of the highest lane active in `pg`, or `fallback` when `pg` has
    /// no active lane.
    #[inline(always)]
    pub fn extract_last(&self, pg: Predicate<N>, fallback: T) -> T {
        match pg.last_active() {
            Some(lane) => self.elements[lane],
            None => fallback,
        }
    }

    /// Views the same bits as lanes of kind `U`.
    #[inline(always)]
    pub fn reinterpret<U: Element>(self) -> Vector<U, N>
    where
        T: BitCast<U>,
    {
        Vector {
            elements: bytemuck::cast::<[T; N], [U; N]>(self.elements),
        }
    }

    /// Applies `f` to every lane.
    #[inline(always)]
    pub fn map(self, mut f: impl FnMut(T) -> T) -> Self {
        Self::from_fn(|i| f(self.elements[i]))
    }

    #[inline(always)]
    fn compare(&self, rhs: &Self, mut op: impl FnMut(&T, &T) -> bool) -> Predicate<N> {
        Predicate::from_fn(|i| op(&self.elements[i], &rhs.elements[i]))
    }

    /// Lanes where `self == rhs`. NaN lanes are never equal.
    #[inline(always)]
    pub fn eq_elements(&self, rhs: Self) -> Predicate<N> {
        self.compare(&rhs, |a, b| a == b)
    }

    /// Lanes where `self < rhs`.
    #[inline(always)]
    pub fn lt_elements(&self, rhs: Self) -> Predicate<N> {
        self.compare(&rhs, |a, b| a < b)
    }

    /// Lanes where `self <= rhs`.
    #[inline(always)]
    pub fn le_elements(&self, rhs: Self) -> Predicate<N> {
        self.compare(&rhs, |a, b| a <= b)
    }

    /// Lanes where `self > rhs`.
    #[inline(always)]
    pub fn gt_elements(&self, rhs: Self) -> Predicate<N> {
        self.compare(&rhs, |a, b| a > b)
    }

    /// Lanes where `self >= rhs`.
    #[inline(always)]
    pub fn ge_elements(&self, rhs: Self) -> Predicate<N> {
        self.compare(&rhs, |a, b| a >= b)
    }
}

impl<T: FloatElement, const N: usize> Vector<T, N> {
    /// Predicated fused multiply-add: `z + x * y` with a single rounding on
    /// the lanes active in `pg`, `z` unchanged on the others.
    #[inline(always)]
    pub fn fma(pg: Predicate<N>, x: Self, y: Self, z: Self) -> Self {
        Self::from_fn(|i| {
            if pg.is_active(i) {
                x.elements[i].mul_add(y.elements[i], z.elements[i])
            } else {
                z.elements[i]
            }
        })
    }

    /// [`Vector::fma`] with a scalar `x` broadcast to every lane.
    #[inline(always)]
    pub fn fma_n(pg: Predicate<N>, x: T, y: Self, z: Self) -> Self {
        Self::fma(pg, Self::splat(x), y, z)
    }

    /// The raw bits of every lane as the same-width unsigned kind.
    #[inline(always)]
    pub fn to_bits(self) -> Vector<T::Bits, N>
    where
        T: BitCast<T::Bits>,
    {
        self.reinterpret()
    }

    /// Float lanes carrying exactly the given bits.
    #[inline(always)]
    pub fn from_bits(bits: Vector<T::Bits, N>) -> Self {
        bits.reinterpret()
    }

    /// Absolute value of each lane (clears the sign bit, NaN stays NaN).
    #[inline(always)]
    pub fn abs(self) -> Self {
        self.map(Float::abs)
    }

    /// Square root of each lane.
    #[inline(always)]
    pub fn sqrt(self) -> Self {
        self.map(Float::sqrt)
    }

    /// Lanes holding a NaN.
    #[inline(always)]
    pub fn is_nan(&self) -> Predicate<N> {
        Predicate::from_fn(|i| self.elements[i].is_nan())
    }

    /// Lanes holding neither an infinity nor a NaN.
    #[inline(always)]
    pub fn is_finite(&self) -> Predicate<N> {
        Predicate::from_fn(|i| self.elements[i].is_finite())
    }
}

impl<T: Element, const N: usize> Default for Vector<T, N> {
    fn default() -> Self {
        Self::splat(T::ZERO)
    }
}

impl<T: Element, const N: usize> Index<usize> for Vector<T, N> {
    type Output = T;

    #[inline(always)]
    fn index(&self, lane: usize) -> &T {
        &self.elements[lane]
    }
}

impl<T: Element, const N: usize> From<[T; N]> for Vector<T, N> {
    fn from(elements: [T; N]) -> Self {
        Self { elements }
    }
}

impl<T: Element, const N: usize> From<&[T]> for Vector<T, N> {
    /// Loads a full vector when the slice is long enough, otherwise a
    /// zero-padded partial one.
    fn from(slice: &[T]) -> Self {
        match slice.len().cmp(&N) {
            std::cmp::Ordering::Less => Self::load_partial(slice),
            std::cmp::Ordering::Equal | std::cmp::Ordering::Greater => Self::load(slice),
        }
    }
}

impl<T: Element, const N: usize> SimdLoad<T> for Vector<T, N> {
    type Output = Self;

    #[inline(always)]
    fn load(slice: &[T]) -> Self::Output {
        let mut elements = [T::ZERO; N];
        elements.copy_from_slice(&slice[..N]);
        Self { elements }
    }

    #[inline(always)]
    fn load_partial(slice: &[T]) -> Self::Output {
        let size = slice.len().min(N);
        let mut elements = [T::ZERO; N];
        elements[..size].copy_from_slice(&slice[..size]);
        Self { elements }
    }
}

impl<T: Element, const N: usize> SimdStore<T> for Vector<T, N> {
    #[inline(always)]
    fn store_at(&self, out: &mut [T]) {
        out[..N].copy_from_slice(&self.elements);
    }

    #[inline(always)]
    fn store_partial(&self, out: &mut [T]) {
        let size = out.len().min(N);
        out[..size].copy_from_slice(&self.elements[..size]);
    }
}

macro_rules! impl_lane_op {
    ($($trait:ident, $method:ident, $lane_op:ident);* $(;)?) => {
        $(
            impl<T: Element, const N: usize> $trait for Vector<T, N> {
                type Output = Self;

                #[inline(always)]
                fn $method(self, rhs: Self) -> Self::Output {
                    Self::from_fn(|i| self.elements[i].$lane_op(rhs.elements[i]))
                }
            }
        )*
    };
}

impl_lane_op! {
    Add, add, lane_add;
    Sub, sub, lane_sub;
    Mul, mul, lane_mul;
    Div, div, lane_div;
}

macro_rules! impl_bit_op {
    ($($trait:ident, $method:ident, $op:tt);* $(;)?) => {
        $(
            impl<T: IntElement, const N: usize> $trait for Vector<T, N> {
                type Output = Self;

                #[inline(always)]
                fn $method(self, rhs: Self) -> Self::Output {
                    Self::from_fn(|i| self.elements[i] $op rhs.elements[i])
                }
            }
        )*
    };
}

impl_bit_op! {
    BitAnd, bitand, &;
    BitOr, bitor, |;
    BitXor, bitxor, ^;
}

impl<T: IntElement, const N: usize> Not for Vector<T, N> {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self::Output {
        self.map(|lane| !lane)
    }
}
