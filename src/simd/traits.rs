//! Element kinds and the load/store vocabulary shared by every vector type.
//!
//! A lane holds one of six scalar kinds: `f64`, `u64`, `i64` (64-bit lanes) or
//! `f32`, `u32`, `i32` (32-bit lanes). The traits here tell the vector layer
//! how to do arithmetic on a lane and which kinds share a bit width, which is
//! what makes reinterpretation between float and integer views legal.

use std::fmt::Debug;

use bytemuck::Pod;
use num::{Float, PrimInt};

/// A scalar that can occupy one vector lane.
pub trait Element: Pod + Default + PartialEq + PartialOrd + Debug + Send + Sync + 'static {
    /// The all-zero bit pattern of this kind.
    const ZERO: Self;

    /// Lane-wise addition. Integer kinds wrap on overflow.
    fn lane_add(self, rhs: Self) -> Self;

    /// Lane-wise subtraction. Integer kinds wrap on overflow.
    fn lane_sub(self, rhs: Self) -> Self;

    /// Lane-wise multiplication. Integer kinds wrap on overflow.
    fn lane_mul(self, rhs: Self) -> Self;

    /// Lane-wise division.
    ///
    /// # Panics
    ///
    /// Integer kinds panic on a zero divisor, like the scalar operator.
    fn lane_div(self, rhs: Self) -> Self;
}

/// Floating point lane kinds.
///
/// `Bits` is the unsigned integer kind of the same width, the target of
/// [`Vector::to_bits`](crate::simd::sve::vector::Vector::to_bits).
pub trait FloatElement: Element + Float {
    /// Unsigned integer kind with the same width as `Self`.
    type Bits: IntElement + BitCast<Self>;
}

/// Integer lane kinds, used for the bit manipulation side of kernels.
pub trait IntElement: Element + PrimInt {}

/// Marks `Self` and `U` as the same width, so a lane array of one can be
/// viewed as a lane array of the other without touching the bits.
pub trait BitCast<U: Element>: Element {}

/// Loading lanes from memory.
pub trait SimdLoad<T> {
    type Output;

    /// Loads exactly one full vector from the front of `slice`.
    ///
    /// # Panics
    ///
    /// Panics if `slice` holds fewer elements than the vector has lanes.
    fn load(slice: &[T]) -> Self::Output;

    /// Loads up to one vector from the front of `slice`. Lanes past the end
    /// of the slice are zero.
    fn load_partial(slice: &[T]) -> Self::Output;
}

/// Storing lanes to memory.
pub trait SimdStore<T> {
    /// Stores every lane to the front of `out`.
    ///
    /// # Panics
    ///
    /// Panics if `out` is shorter than the vector.
    fn store_at(&self, out: &mut [T]);

    /// Stores as many leading lanes as fit in `out`.
    fn store_partial(&self, out: &mut [T]);
}

macro_rules! impl_float_element {
    ($($float:ty => $bits:ty),* $(,)?) => {
        $(
            impl Element for $float {
                const ZERO: Self = 0.0;

                #[inline(always)]
                fn lane_add(self, rhs: Self) -> Self {
                    self + rhs
                }

                #[inline(always)]
                fn lane_sub(self, rhs: Self) -> Self {
                    self - rhs
                }

                #[inline(always)]
                fn lane_mul(self, rhs: Self) -> Self {
                    self * rhs
                }

                #[inline(always)]
                fn lane_div(self, rhs: Self) -> Self {
                    self / rhs
                }
            }

            impl FloatElement for $float {
                type Bits = $bits;
            }
        )*
    };
}

macro_rules! impl_int_element {
    ($($int:ty),* $(,)?) => {
        $(
            impl Element for $int {
                const ZERO: Self = 0;

                #[inline(always)]
                fn lane_add(self, rhs: Self) -> Self {
                    self.wrapping_add(rhs)
                }

                #[inline(always)]
                fn lane_sub(self, rhs: Self) -> Self {
                    self.wrapping_sub(rhs)
                }

                #[inline(always)]
                fn lane_mul(self, rhs: Self) -> Self {
                    self.wrapping_mul(rhs)
                }

                #[inline(always)]
                fn lane_div(self, rhs: Self) -> Self {
                    self.wrapping_div(rhs)
                }
            }

            impl IntElement for $int {}
        )*
    };
}

macro_rules! impl_bit_cast {
    ($($a:ty, $b:ty);* $(;)?) => {
        $(
            impl BitCast<$b> for $a {}
            impl BitCast<$a> for $b {}
        )*
    };
}

impl_float_element!(f64 => u64, f32 => u32);
impl_int_element!(u64, i64, u32, i32);

impl_bit_cast! {
    f64, u64;
    f64, i64;
    u64, i64;
    f32, u32;
    f32, i32;
    u32, i32;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_lanes_wrap() {
        assert_eq!(u64::MAX.lane_add(1), 0);
        assert_eq!(0u32.lane_sub(1), u32::MAX);
        assert_eq!(i32::MIN.lane_sub(1), i32::MAX);
        assert_eq!(i64::MIN.lane_div(-1), i64::MIN);
    }

    #[test]
    fn test_float_lanes_follow_ieee() {
        assert_eq!(1.5f64.lane_mul(2.0), 3.0);
        assert!(0.0f32.lane_div(0.0).is_nan());
        assert_eq!(1.0f64.lane_div(0.0), f64::INFINITY);
    }

    #[test]
    fn test_zero_is_all_zero_bits() {
        assert_eq!(f64::ZERO.to_bits(), 0);
        assert_eq!(f32::ZERO.to_bits(), 0);
        assert_eq!(i64::ZERO, 0);
    }
}
