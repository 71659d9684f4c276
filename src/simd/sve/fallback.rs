//! Exact scalar fallback for selected vector lanes.
//!
//! Fast vector kernels are only accurate over part of their input domain.
//! Rather than dropping to a scalar loop for the whole vector, a kernel
//! computes its fast result for every lane, marks the lanes it cannot handle
//! with a predicate, and hands those lanes to an exact scalar function here.
//! Every other lane keeps the fast result bit for bit.
//!
//! # Algorithm
//!
//! A one-lane cursor walks the selection predicate:
//!
//! 1. The cursor starts at the first selected lane.
//! 2. The lane under the cursor is extracted and passed to the scalar function.
//! 3. The scalar result is broadcast and merged into the result under the cursor.
//! 4. The cursor steps to the next selected lane above it.
//!
//! The loop runs once per selected lane, so a sparse predicate costs a few
//! scalar calls and an all-true predicate costs `N`. The visiting order is
//! ascending lane index, but callers must not rely on it.
//!
//! # Scalar Functions
//!
//! The scalar function is any `FnMut(T) -> T`. It is called exactly once per
//! selected lane and never for an unselected one, so a function that must not
//! run (for instance one that panics) is fine as long as nothing is selected.
//! It should be total over every bit pattern of `T` including NaN, infinities
//! and subnormals; anything it does outside that contract is passed through.

use crate::{
    error::{Result, SvError},
    simd::{
        sve::{predicate::Predicate, vector::Vector, B32xN, B64xN, F32xN, F64xN},
        Element,
    },
};

/// Replaces the lanes of `fallback` selected by `select` with
/// `scalar_fn(input[i])`.
///
/// For every lane `i`:
///
/// - not selected: the result is `fallback[i]`, unchanged
/// - selected: the result is `scalar_fn(input[i])`
///
/// `scalar_fn` runs exactly `select.count()` times.
#[inline(always)]
pub fn call_scalar<T, F, const N: usize>(
    mut scalar_fn: F,
    input: Vector<T, N>,
    fallback: Vector<T, N>,
    select: Predicate<N>,
) -> Vector<T, N>
where
    T: Element,
    F: FnMut(T) -> T,
{
    let mut result = fallback;
    let mut cursor = select.first();

    while select.any_in(cursor) {
        let elem = scalar_fn(input.extract_last(cursor, T::ZERO));
        result = Vector::select(cursor, Vector::splat(elem), result);
        cursor = select.next(cursor);
    }

    result
}

/// Replaces the selected lanes of `fallback` with `scalar_fn` applied to
/// the lane's own value; unselected lanes pass through unchanged.
///
/// This is [`call_scalar`] with the same vector as input and fallback.
#[inline(always)]
pub fn call_scalar_fallback<T, F, const N: usize>(
    scalar_fn: F,
    fallback: Vector<T, N>,
    select: Predicate<N>,
) -> Vector<T, N>
where
    T: Element,
    F: FnMut(T) -> T,
{
    call_scalar(scalar_fn, fallback, fallback, select)
}

/// [`call_scalar`] with an optional scalar function.
///
/// An absent function is fine while nothing is selected: `fallback` is
/// returned as is.
///
/// # Errors
///
/// Returns [`SvError::MissingScalarFn`] if `scalar_fn` is `None` and `select`
/// has at least one active lane.
pub fn try_call_scalar<T, F, const N: usize>(
    scalar_fn: Option<F>,
    input: Vector<T, N>,
    fallback: Vector<T, N>,
    select: Predicate<N>,
) -> Result<Vector<T, N>>
where
    T: Element,
    F: FnMut(T) -> T,
{
    match scalar_fn {
        Some(f) => Ok(call_scalar(f, input, fallback, select)),
        None if !select.any() => Ok(fallback),
        None => Err(SvError::MissingScalarFn {
            active: select.count(),
        }),
    }
}

/// Double precision [`call_scalar_fallback`].
#[inline(always)]
pub fn call_f64(scalar_fn: impl FnMut(f64) -> f64, fallback: F64xN, select: B64xN) -> F64xN {
    call_scalar_fallback(scalar_fn, fallback, select)
}

/// Single precision [`call_scalar_fallback`].
#[inline(always)]
pub fn call_f32(scalar_fn: impl FnMut(f32) -> f32, fallback: F32xN, select: B32xN) -> F32xN {
    call_scalar_fallback(scalar_fn, fallback, select)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_squares_only_selected_lane() {
        let fallback = Vector::<f64, 2>::from_array([1.0, 100.0]);
        let select = Predicate::from_lanes([true, false]);

        let mut calls = Vec::new();
        let result = call_scalar_fallback(
            |x: f64| {
                calls.push(x);
                x * x
            },
            fallback,
            select,
        );

        assert_eq!(result.to_array(), [1.0, 100.0]);
        assert_eq!(calls, vec![1.0]);
    }

    #[test]
    fn test_nan_propagates_through_selected_lane() {
        let fallback = Vector::<f64, 2>::from_array([f64::NAN, 2.0]);

        let mut calls = 0;
        let result = call_scalar_fallback(
            |x: f64| {
                calls += 1;
                x + 1.0
            },
            fallback,
            Predicate::all(),
        );

        assert!(result.lane(0).is_nan());
        assert_eq!(result.lane(1), 3.0);
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_empty_selection_never_calls() {
        let fallback = Vector::<f32, 8>::from_fn(|i| i as f32);
        let result = call_scalar_fallback(
            |_: f32| -> f32 { panic!("no lane is selected") },
            fallback,
            Predicate::none(),
        );
        assert_eq!(result, fallback);
    }

    #[test]
    fn test_two_source_form_reads_input_and_keeps_fallback() {
        let input = Vector::<f64, 4>::from_array([4.0, 9.0, 16.0, 25.0]);
        let fast = Vector::<f64, 4>::from_array([-1.0, -2.0, -3.0, -4.0]);
        let select = Predicate::from_bits(0b1010);

        let result = call_scalar(f64::sqrt, input, fast, select);
        assert_eq!(result.to_array(), [-1.0, 3.0, -3.0, 5.0]);
    }

    #[test]
    fn test_visits_each_selected_lane_once() {
        let fallback = Vector::<u32, 16>::from_fn(|i| i as u32);
        let select = Predicate::from_bits(0b1000_0000_1001_0110);

        let mut seen = Vec::new();
        let result = call_scalar_fallback(
            |x: u32| {
                seen.push(x);
                x + 100
            },
            fallback,
            select,
        );

        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2, 4, 7, 15]);
        for i in 0..16 {
            let expected = if select.is_active(i) { i as u32 + 100 } else { i as u32 };
            assert_eq!(result.lane(i), expected);
        }
    }

    #[test]
    fn test_try_call_scalar_without_function() {
        let v = Vector::<f64, 4>::splat(1.5);

        let passthrough =
            try_call_scalar(None::<fn(f64) -> f64>, v, v, Predicate::none()).unwrap();
        assert_eq!(passthrough, v);

        let err = try_call_scalar(None::<fn(f64) -> f64>, v, v, Predicate::from_bits(0b0110))
            .unwrap_err();
        assert_eq!(err, SvError::MissingScalarFn { active: 2 });
    }

    #[test]
    fn test_try_call_scalar_with_function() {
        let v = Vector::<f32, 4>::from_array([1.0, 2.0, 3.0, 4.0]);
        let result = try_call_scalar(Some(|x: f32| -x), v, v, Predicate::from_bits(0b1001)).unwrap();
        assert_eq!(result.to_array(), [-1.0, 2.0, 3.0, -4.0]);
    }

    #[test]
    fn test_try_call_scalar_with_function_and_empty_predicate() {
        let v = Vector::<f64, 4>::from_array([1.0, -2.0, f64::NAN, 4.0]);
        let result = try_call_scalar(
            Some(|_: f64| -> f64 { panic!("no lane is selected") }),
            v,
            v,
            Predicate::none(),
        )
        .unwrap();
        assert_eq!(result.to_bits(), v.to_bits());
    }

    #[test]
    fn test_precision_entry_points() {
        let x = F64xN::from_fn(|i| i as f64);
        let y = call_f64(|v| v * 2.0, x, B64xN::all());
        assert_eq!(y.lane(F64xN::LANES - 1), 2.0 * (F64xN::LANES - 1) as f64);

        let x = F32xN::splat(-3.0);
        let y = call_f32(f32::abs, x, B32xN::first_n(1));
        assert_eq!(y.lane(0), 3.0);
        assert_eq!(y.lane(1), -3.0);
    }
}
