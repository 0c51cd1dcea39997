//! Shared value types: the vectors that flow into and out of `Matrix4`.
//!
//! # Invariants
//! - Vectors are plain `Copy` values with a `#[repr(C)]` layout.
//! - Normalizing a zero-length vector yields `None`, never NaN.

mod types;

pub use types::{Vector3, Vector4};
