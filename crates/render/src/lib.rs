//! Rendering adapter: cameras, projections and the uniforms a draw call uploads.
//!
//! # Invariants
//! - Renderers never see a partially built matrix; any degenerate camera or
//!   model aborts the frame with `TransformError`.
//! - Uniform blocks are `#[repr(C)]` column-major `f32`, uploadable as bytes.

mod camera;
mod renderer;
mod uniforms;

pub use camera::{Camera, Projection};
pub use renderer::{DebugTextRenderer, Draw, Renderer};
pub use uniforms::DrawUniforms;

pub fn crate_info() -> &'static str {
    "xform-render v0.1.0"
}
