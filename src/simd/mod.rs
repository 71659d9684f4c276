pub mod sve;

pub mod traits;

pub use traits::{BitCast, Element, FloatElement, IntElement, SimdLoad, SimdStore};
