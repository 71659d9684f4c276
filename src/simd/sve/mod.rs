//! Scalable vector implementations for predicated SIMD math.
//!
//! This module models a scalable, predicated vector unit: every vector holds
//! as many lanes as the configured vector length allows, and operations are
//! governed by per-lane predicates rather than by fixed shuffles. The lane
//! primitives are implemented portably on plain lane arrays, so the same
//! kernels run on any target.
//!
//! # Vector Length
//!
//! The vector length is fixed at build time (see `build.rs`):
//!
//! - `SVMATH_VECTOR_BITS` selects 128, 256, 512, 1024 or 2048 bits explicitly
//! - native aarch64 Linux builds read the kernel's default SVE vector length
//! - otherwise 512 bits are used
//!
//! | Type | Lanes at 128 bits | Lanes at 512 bits | Lanes at 2048 bits |
//! |------|-------------------|-------------------|--------------------|
//! | [`F64xN`], [`U64xN`], [`I64xN`] | 2 | 8 | 32 |
//! | [`F32xN`], [`U32xN`], [`I32xN`] | 4 | 16 | 64 |
//!
//! # Available Modules
//!
//! - [`vector`]: the [`Vector`](vector::Vector) value type
//! - [`predicate`]: per-lane [`Predicate`](predicate::Predicate) masks
//! - [`fallback`]: exact scalar fallback for selected lanes
//! - [`kernel`]: the kernel interface and the fast-path/special-case kernel
//! - [`slice`]: kernels applied over slices, sequentially or with rayon
//!
//! # Usage Example
//!
//! ```rust
//! use svmath::simd::sve::{fallback, F64xN};
//!
//! let x = F64xN::from_fn(|i| i as f64 - 1.0);
//!
//! // Patch the lanes the fast path cannot handle with an exact scalar call
//! let special = x.lt_elements(F64xN::splat(0.0));
//! let y = fallback::call_f64(|v| v.abs(), x, special);
//!
//! assert_eq!(y.lane(0), 1.0);
//! assert_eq!(y.lane(1), 0.0);
//! ```

pub mod fallback;

pub mod kernel;

pub mod predicate;

pub mod slice;

pub mod vector;

use predicate::Predicate;
use vector::Vector;

/// Configured vector length in bits.
#[cfg(sv_bits = "128")]
pub const VECTOR_BITS: usize = 128;

/// Configured vector length in bits.
#[cfg(sv_bits = "256")]
pub const VECTOR_BITS: usize = 256;

/// Configured vector length in bits.
#[cfg(sv_bits = "1024")]
pub const VECTOR_BITS: usize = 1024;

/// Configured vector length in bits.
#[cfg(sv_bits = "2048")]
pub const VECTOR_BITS: usize = 2048;

/// Configured vector length in bits.
#[cfg(not(any(
    sv_bits = "128",
    sv_bits = "256",
    sv_bits = "1024",
    sv_bits = "2048"
)))]
pub const VECTOR_BITS: usize = 512;

/// Lanes in a vector of 64-bit elements.
pub const LANES_64: usize = VECTOR_BITS / 64;

/// Lanes in a vector of 32-bit elements.
pub const LANES_32: usize = VECTOR_BITS / 32;

/// Double precision vector.
pub type F64xN = Vector<f64, LANES_64>;

/// Unsigned 64-bit view of a double precision vector.
pub type U64xN = Vector<u64, LANES_64>;

/// Signed 64-bit view of a double precision vector.
pub type I64xN = Vector<i64, LANES_64>;

/// Predicate over 64-bit lanes.
pub type B64xN = Predicate<LANES_64>;

/// Single precision vector.
pub type F32xN = Vector<f32, LANES_32>;

/// Unsigned 32-bit view of a single precision vector.
pub type U32xN = Vector<u32, LANES_32>;

/// Signed 32-bit view of a single precision vector.
pub type I32xN = Vector<i32, LANES_32>;

/// Predicate over 32-bit lanes.
pub type B32xN = Predicate<LANES_32>;
