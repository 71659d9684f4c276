//! Vector kernels applied over slices.
//!
//! Slices are processed one vector at a time: full blocks are loaded and
//! stored whole, and the final partial block is zero-padded on load and
//! handed to [`VectorKernel::compute_masked`] with a "first n lanes"
//! predicate. Kernels that honour that predicate ([`SpecialCaseKernel`],
//! [`MaskedKernel`]) never pass padding lanes to a scalar fallback; a plain
//! closure kernel computes the padding lanes like any others.
//!
//! [`SpecialCaseKernel`]: crate::simd::sve::kernel::SpecialCaseKernel
//! [`MaskedKernel`]: crate::simd::sve::kernel::MaskedKernel
//!
//! # Available Operations
//!
//! - [`SvMap::sv_map`]: single-threaded block loop
//! - [`SvMap::par_sv_map`]: rayon over chunks of whole vectors
//! - [`SvMap::fast_sv_map`]: picks one of the two by input size
//! - [`SvMap::scalar_map`]: plain scalar baseline
//! - [`SvMap::patch_lanes`]: scalar fallback driven by a per-element mask
//!
//! # Usage Example
//!
//! ```rust
//! use svmath::simd::sve::{kernel::SpecialCaseKernel, slice::SvMap, F64xN};
//!
//! let kernel = SpecialCaseKernel::new(
//!     |x: F64xN| x * x,
//!     |x: F64xN| x.is_nan(),
//!     |_: f64| 0.0,
//! );
//!
//! let input = vec![1.0, 2.0, f64::NAN, 4.0, 5.0];
//! let squares = input.sv_map(&kernel);
//! assert_eq!(squares, vec![1.0, 4.0, 0.0, 16.0, 25.0]);
//!
//! let patched = input
//!     .patch_lanes(&squares, &[false, true, false, false, true], |x| -x)
//!     .unwrap();
//! assert_eq!(patched, vec![1.0, -2.0, 0.0, 16.0, -5.0]);
//! ```

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::{
    error::{length_mismatch, Result},
    simd::{
        sve::{
            fallback::call_scalar, kernel::VectorKernel, predicate::Predicate, vector::Vector,
            LANES_32, LANES_64,
        },
        Element, SimdLoad, SimdStore,
    },
    PARALLEL_CHUNK_SIZE, PARALLEL_SIMD_THRESHOLD,
};

/// Kernel application over a slice of `T`, one `N`-lane vector at a time.
pub trait SvMap<T: Element, const N: usize> {
    /// Applies `kernel` to every element on the current thread.
    fn sv_map<K>(&self, kernel: &K) -> Vec<T>
    where
        K: VectorKernel<T, N> + ?Sized;

    /// Applies `kernel` to every element, splitting the slice into chunks of
    /// whole vectors processed in parallel with rayon.
    fn par_sv_map<K>(&self, kernel: &K) -> Vec<T>
    where
        K: VectorKernel<T, N> + Sync + ?Sized;

    /// [`SvMap::sv_map`] below [`PARALLEL_SIMD_THRESHOLD`] elements,
    /// [`SvMap::par_sv_map`] from there on.
    fn fast_sv_map<K>(&self, kernel: &K) -> Vec<T>
    where
        K: VectorKernel<T, N> + Sync + ?Sized;

    /// Applies `f` element by element without vectors.
    fn scalar_map<F>(&self, f: F) -> Vec<T>
    where
        F: FnMut(T) -> T;

    /// Element `i` of the result is `scalar_fn(self[i])` where `mask[i]` is
    /// set and `fallback[i]` otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`SvError::LengthMismatch`](crate::error::SvError::LengthMismatch)
    /// unless `self`, `fallback` and `mask` have the same length.
    fn patch_lanes<F>(&self, fallback: &[T], mask: &[bool], scalar_fn: F) -> Result<Vec<T>>
    where
        F: FnMut(T) -> T;
}

/// Runs `kernel` over `input` into `output`, which must have the same length.
#[inline(always)]
fn map_blocks<T, K, const N: usize>(input: &[T], output: &mut [T], kernel: &K)
where
    T: Element,
    K: VectorKernel<T, N> + ?Sized,
{
    debug_assert_eq!(input.len(), output.len(), "Slices must be the same length");

    let complete = input.len() - input.len() % N;

    for (a, c) in input[..complete]
        .chunks_exact(N)
        .zip(output[..complete].chunks_exact_mut(N))
    {
        kernel.compute(Vector::<T, N>::load(a)).store_at(c);
    }

    if complete < input.len() {
        let remaining = input.len() - complete;
        trace!(remaining, lanes = N, "partial tail block");

        let pg = Predicate::<N>::first_n(remaining);
        let x = Vector::<T, N>::load_partial(&input[complete..]);
        kernel
            .compute_masked(pg, x)
            .store_partial(&mut output[complete..]);
    }
}

fn sequential_map<T, K, const N: usize>(input: &[T], kernel: &K) -> Vec<T>
where
    T: Element,
    K: VectorKernel<T, N> + ?Sized,
{
    debug!(len = input.len(), lanes = N, "sequential sv_map");

    let mut output = vec![T::ZERO; input.len()];
    map_blocks::<T, K, N>(input, &mut output, kernel);
    output
}

fn parallel_map<T, K, const N: usize>(input: &[T], kernel: &K) -> Vec<T>
where
    T: Element,
    K: VectorKernel<T, N> + Sync + ?Sized,
{
    // Chunks hold whole vectors so only the last chunk can have a tail
    let chunk_size = ((PARALLEL_CHUNK_SIZE / N) * N).max(N);

    debug!(
        len = input.len(),
        lanes = N,
        chunk_size,
        "parallel sv_map"
    );

    let mut output = vec![T::ZERO; input.len()];

    output
        .par_chunks_mut(chunk_size)
        .zip(input.par_chunks(chunk_size))
        .for_each(|(c_chunk, a_chunk)| map_blocks::<T, K, N>(a_chunk, c_chunk, kernel));

    output
}

fn fast_map<T, K, const N: usize>(input: &[T], kernel: &K) -> Vec<T>
where
    T: Element,
    K: VectorKernel<T, N> + Sync + ?Sized,
{
    match input.len() {
        0..PARALLEL_SIMD_THRESHOLD => sequential_map::<T, K, N>(input, kernel),
        _ => parallel_map::<T, K, N>(input, kernel),
    }
}

fn patch_blocks<T, F, const N: usize>(
    input: &[T],
    fallback: &[T],
    mask: &[bool],
    mut scalar_fn: F,
) -> Result<Vec<T>>
where
    T: Element,
    F: FnMut(T) -> T,
{
    if input.len() != fallback.len() || input.len() != mask.len() {
        return Err(length_mismatch(input.len(), fallback.len(), mask.len()));
    }

    let mut output = vec![T::ZERO; input.len()];
    let mut patched = 0usize;

    for ((a, b), (m, c)) in input
        .chunks(N)
        .zip(fallback.chunks(N))
        .zip(mask.chunks(N).zip(output.chunks_mut(N)))
    {
        // Lanes past the end of a short tail read as unselected
        let select = Predicate::<N>::try_from(m)?;
        patched += select.count();

        let x = Vector::<T, N>::load_partial(a);
        let y = Vector::<T, N>::load_partial(b);
        call_scalar(&mut scalar_fn, x, y, select).store_partial(c);
    }

    debug!(len = input.len(), lanes = N, patched, "patched lanes");

    Ok(output)
}

macro_rules! impl_sv_map {
    ($($elem:ty => $lanes:ident),* $(,)?) => {
        $(
            impl SvMap<$elem, $lanes> for [$elem] {
                #[inline(always)]
                fn sv_map<K>(&self, kernel: &K) -> Vec<$elem>
                where
                    K: VectorKernel<$elem, $lanes> + ?Sized,
                {
                    sequential_map::<$elem, K, $lanes>(self, kernel)
                }

                #[inline(always)]
                fn par_sv_map<K>(&self, kernel: &K) -> Vec<$elem>
                where
                    K: VectorKernel<$elem, $lanes> + Sync + ?Sized,
                {
                    parallel_map::<$elem, K, $lanes>(self, kernel)
                }

                #[inline(always)]
                fn fast_sv_map<K>(&self, kernel: &K) -> Vec<$elem>
                where
                    K: VectorKernel<$elem, $lanes> + Sync + ?Sized,
                {
                    fast_map::<$elem, K, $lanes>(self, kernel)
                }

                #[inline(always)]
                fn scalar_map<F>(&self, f: F) -> Vec<$elem>
                where
                    F: FnMut($elem) -> $elem,
                {
                    self.iter().copied().map(f).collect()
                }

                #[inline(always)]
                fn patch_lanes<F>(
                    &self,
                    fallback: &[$elem],
                    mask: &[bool],
                    scalar_fn: F,
                ) -> Result<Vec<$elem>>
                where
                    F: FnMut($elem) -> $elem,
                {
                    patch_blocks::<$elem, F, $lanes>(self, fallback, mask, scalar_fn)
                }
            }
        )*
    };
}

impl_sv_map!(f64 => LANES_64, f32 => LANES_32);
