//! Vector kernels and the fast-path/special-case pattern.
//!
//! A kernel maps one vector of inputs to one vector of results. Most
//! vectorized math routines are built the same way:
//!
//! 1. compute an approximate result for every lane (the fast path)
//! 2. mark the lanes whose inputs lie outside the fast path's accurate domain
//! 3. recompute exactly those lanes with an exact scalar function
//!
//! [`SpecialCaseKernel`] packages that pattern so a routine only supplies the
//! three pieces. Step 3 goes through [`call_scalar`], so unmarked lanes keep
//! the fast result bit for bit.
//!
//! # Usage Example
//!
//! ```rust
//! use svmath::simd::sve::{kernel::{SpecialCaseKernel, VectorKernel}, F64xN};
//!
//! // Fast square root that only trusts non-negative inputs; negative lanes
//! // get an exact scalar answer instead of NaN.
//! let kernel = SpecialCaseKernel::new(
//!     |x: F64xN| x.abs().sqrt(),
//!     |x: F64xN| x.lt_elements(F64xN::splat(0.0)),
//!     |x: f64| -((-x).sqrt()),
//! );
//!
//! let y = kernel.compute(F64xN::splat(-4.0));
//! assert_eq!(y.lane(0), -2.0);
//! ```

use crate::simd::{
    sve::{fallback::call_scalar, predicate::Predicate, vector::Vector},
    Element,
};

/// A vectorized routine: one vector of inputs to one vector of results.
///
/// Implemented for every `Fn(Vector<T, N>) -> Vector<T, N>`. Such a closure
/// has no way to see a governing predicate, so it computes every lane,
/// padding included. Wrap a closure that takes the predicate in
/// [`MaskedKernel`] when inactive lanes must stay untouched.
pub trait VectorKernel<T: Element, const N: usize> {
    /// Computes every lane of `x`.
    fn compute(&self, x: Vector<T, N>) -> Vector<T, N>;

    /// Computes the lanes of `x` active in `pg`.
    ///
    /// Inactive lanes of the result are unspecified; callers only read the
    /// active ones. Slice drivers use this for partial tails. The default
    /// ignores `pg` and computes every lane, so only kernels that override
    /// it ([`SpecialCaseKernel`], [`MaskedKernel`]) keep padding lanes away
    /// from a scalar fallback.
    fn compute_masked(&self, _pg: Predicate<N>, x: Vector<T, N>) -> Vector<T, N> {
        self.compute(x)
    }
}

impl<T, F, const N: usize> VectorKernel<T, N> for F
where
    T: Element,
    F: Fn(Vector<T, N>) -> Vector<T, N>,
{
    #[inline(always)]
    fn compute(&self, x: Vector<T, N>) -> Vector<T, N> {
        self(x)
    }
}

/// A closure kernel that receives the governing predicate.
///
/// `compute` passes an all-true predicate; `compute_masked` passes the
/// caller's, so a scalar fallback inside the closure can be restricted to
/// the active lanes.
///
/// ```rust
/// use svmath::simd::sve::{fallback::call_f64, kernel::MaskedKernel, slice::SvMap, B64xN, F64xN};
///
/// let kernel = MaskedKernel::new(|pg: B64xN, x: F64xN| {
///     call_f64(f64::ln_1p, x, x.eq_elements(F64xN::splat(0.0)) & pg)
/// });
///
/// let y = [0.0, 1.0, 2.0].sv_map(&kernel);
/// assert_eq!(y, vec![0.0, 1.0, 2.0]);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct MaskedKernel<F>(F);

impl<F> MaskedKernel<F> {
    pub fn new(kernel: F) -> Self {
        Self(kernel)
    }
}

impl<T, F, const N: usize> VectorKernel<T, N> for MaskedKernel<F>
where
    T: Element,
    F: Fn(Predicate<N>, Vector<T, N>) -> Vector<T, N>,
{
    #[inline(always)]
    fn compute(&self, x: Vector<T, N>) -> Vector<T, N> {
        (self.0)(Predicate::all(), x)
    }

    #[inline(always)]
    fn compute_masked(&self, pg: Predicate<N>, x: Vector<T, N>) -> Vector<T, N> {
        (self.0)(pg, x)
    }
}

/// Fast vector path patched by an exact scalar function on special lanes.
///
/// - `fast`: computes every lane, accurate only on the non-special ones
/// - `special`: marks the lanes `fast` cannot be trusted with
/// - `exact`: the scalar reference, called once per special lane
///
/// `exact` is `Fn` rather than `FnMut` so a kernel can be shared across
/// threads by the parallel slice driver.
#[derive(Clone, Copy, Debug)]
pub struct SpecialCaseKernel<Fast, Special, Exact> {
    fast: Fast,
    special: Special,
    exact: Exact,
}

impl<Fast, Special, Exact> SpecialCaseKernel<Fast, Special, Exact> {
    pub fn new(fast: Fast, special: Special, exact: Exact) -> Self {
        Self {
            fast,
            special,
            exact,
        }
    }

    /// The exact scalar function, for computing reference values.
    pub fn exact(&self) -> &Exact {
        &self.exact
    }

    #[inline(always)]
    fn run<T, const N: usize>(&self, pg: Predicate<N>, x: Vector<T, N>) -> Vector<T, N>
    where
        T: Element,
        Fast: Fn(Vector<T, N>) -> Vector<T, N>,
        Special: Fn(Vector<T, N>) -> Predicate<N>,
        Exact: Fn(T) -> T,
    {
        let y = (self.fast)(x);
        let cmp = (self.special)(x) & pg;

        if cmp.any() {
            call_scalar(&self.exact, x, y, cmp)
        } else {
            y
        }
    }
}

impl<T, Fast, Special, Exact, const N: usize> VectorKernel<T, N>
    for SpecialCaseKernel<Fast, Special, Exact>
where
    T: Element,
    Fast: Fn(Vector<T, N>) -> Vector<T, N>,
    Special: Fn(Vector<T, N>) -> Predicate<N>,
    Exact: Fn(T) -> T,
{
    #[inline(always)]
    fn compute(&self, x: Vector<T, N>) -> Vector<T, N> {
        self.run(Predicate::all(), x)
    }

    #[inline(always)]
    fn compute_masked(&self, pg: Predicate<N>, x: Vector<T, N>) -> Vector<T, N> {
        self.run(pg, x)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    type V4 = Vector<f64, 4>;

    #[test]
    fn test_closures_are_kernels() {
        let double = |x: V4| x + x;
        let y = double.compute(V4::from_array([1.0, 2.0, 3.0, 4.0]));
        assert_eq!(y.to_array(), [2.0, 4.0, 6.0, 8.0]);
        assert_eq!(double.compute_masked(Predicate::none(), y), y + y);
    }

    #[test]
    fn test_special_lanes_take_exact_path() {
        // Fast reciprocal that gets zero wrong on purpose
        let kernel = SpecialCaseKernel::new(
            |x: V4| V4::splat(1.0) / (x + V4::splat(1e-300)),
            |x: V4| x.eq_elements(V4::splat(0.0)),
            |x: f64| 1.0 / x,
        );

        let y = kernel.compute(V4::from_array([2.0, 0.0, -0.0, 4.0]));
        assert_eq!(y.lane(0), 0.5);
        assert_eq!(y.lane(1), (kernel.exact())(0.0));
        assert_eq!(y.lane(1), f64::INFINITY);
        assert_eq!(y.lane(2), f64::NEG_INFINITY);
        assert_eq!(y.lane(3), 0.25);
    }

    #[test]
    fn test_masked_lanes_skip_exact_path() {
        let calls = AtomicUsize::new(0);
        let kernel = SpecialCaseKernel::new(
            |x: V4| x,
            |_: V4| Predicate::<4>::all(),
            |x: f64| {
                calls.fetch_add(1, Ordering::Relaxed);
                x * 10.0
            },
        );

        let y = kernel.compute_masked(Predicate::first_n(2), V4::splat(1.0));
        assert_eq!(calls.load(Ordering::Relaxed), 2);
        assert_eq!(y.lane(0), 10.0);
        assert_eq!(y.lane(1), 10.0);

        kernel.compute(V4::splat(1.0));
        assert_eq!(calls.load(Ordering::Relaxed), 6);
    }

    #[test]
    fn test_masked_kernel_forwards_predicate() {
        let kernel = MaskedKernel::new(|pg: Predicate<4>, x: V4| {
            call_scalar(|v: f64| v + 1.0, x, x, pg)
        });

        let x = V4::from_array([1.0, 2.0, 3.0, 4.0]);
        assert_eq!(kernel.compute(x).to_array(), [2.0, 3.0, 4.0, 5.0]);
        assert_eq!(
            kernel.compute_masked(Predicate::first_n(1), x).to_array(),
            [2.0, 2.0, 3.0, 4.0]
        );
    }

    #[test]
    fn test_no_special_lane_returns_fast_result() {
        let kernel = SpecialCaseKernel::new(
            |x: V4| x * V4::splat(3.0),
            |x: V4| x.is_nan(),
            |_: f64| -> f64 { panic!("no lane is special") },
        );
        let y = kernel.compute(V4::from_array([1.0, 2.0, 3.0, 4.0]));
        assert_eq!(y.to_array(), [3.0, 6.0, 9.0, 12.0]);
    }
}
