//! Transform core: the 4x4 matrices every draw call uploads.
//!
//! # Invariants
//! - Storage and output are column-major `f32`, uploadable with `transpose = false`.
//! - Composition multiplies on the right, so `proj * view * model` is built by
//!   `set(proj)`, `multiply(view)`, `multiply(model)`.
//! - Degenerate inputs return `TransformError` and never write NaN into a matrix.

mod error;
mod matrix4;
mod stack;

pub use error::{DegenerateReason, TransformError};
pub use matrix4::Matrix4;
pub use stack::{MatrixStack, StackError};
pub use xform_common::{Vector3, Vector4};

pub fn crate_info() -> &'static str {
    "xform-math v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("math"));
    }
}
