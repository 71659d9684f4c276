//! # svmath
//!
//! Plumbing for vectorized math routines on scalable, predicated vector units.
//!
//! The crate provides two layers:
//!
//! - a **vector value model**: typed vectors of 64-bit or 32-bit lanes
//!   ([`F64xN`], [`F32xN`] and their integer views), broadcast, predicated
//!   fused multiply-add and bit-pattern reinterpretation between float and
//!   integer views
//! - a **scalar fallback dispatcher**: [`call_scalar`] patches the lanes a
//!   predicate selects with the result of an exact scalar function, leaving
//!   every other lane untouched
//!
//! On top of those, [`SpecialCaseKernel`] wires a fast vector path, a
//! special-lane predicate and an exact scalar function together, and [`SvMap`]
//! runs kernels over slices, optionally in parallel with rayon.
//!
//! ```rust
//! use svmath::{call_f64, F64xN};
//!
//! let x = F64xN::splat(9.0);
//! let first = x.lt_elements(F64xN::splat(10.0)) & svmath::B64xN::first_n(1);
//! let y = call_f64(f64::sqrt, x, first);
//!
//! assert_eq!(y.lane(0), 3.0);
//! assert_eq!(y.lane(1), 9.0);
//! ```

pub mod error;

pub mod simd;

pub use error::{Result, SvError};
pub use simd::sve::{
    fallback::{call_f32, call_f64, call_scalar, call_scalar_fallback, try_call_scalar},
    kernel::{MaskedKernel, SpecialCaseKernel, VectorKernel},
    predicate::Predicate,
    slice::SvMap,
    vector::Vector,
    B32xN, B64xN, F32xN, F64xN, I32xN, I64xN, U32xN, U64xN, LANES_32, LANES_64, VECTOR_BITS,
};

/// Slices with at least this many elements are mapped in parallel by
/// [`SvMap::fast_sv_map`].
pub const PARALLEL_SIMD_THRESHOLD: usize = 131_072;

/// Elements per rayon task in the parallel slice drivers, rounded down to a
/// whole number of vectors.
pub const PARALLEL_CHUNK_SIZE: usize = 16_384;
