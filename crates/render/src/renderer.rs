use crate::camera::{Camera, Projection};
use crate::uniforms::DrawUniforms;
use xform_math::{Matrix4, TransformError, Vector4};

/// One object to draw: a label and its model matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Draw {
    pub label: String,
    pub model: Matrix4,
}

impl Draw {
    pub fn new(label: impl Into<String>, model: Matrix4) -> Self {
        Self {
            label: label.into(),
            model,
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer receives a camera and a list of draws, builds the per-draw
/// uniforms and produces output. Degenerate camera or model matrices abort
/// the frame with the error.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, camera: &Camera, draws: &[Draw]) -> Result<Self::Output, TransformError>;
}

/// Renders a frame as text: where each draw's model origin lands in clip
/// space and NDC. Stands in for the graphics backend in the CLI and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, camera: &Camera, draws: &[Draw]) -> Result<String, TransformError> {
        let vp = camera.view_projection()?;

        let mut out = String::new();
        out.push_str(&format!("=== Frame (draws={}) ===\n", draws.len()));
        out.push_str(&format!(
            "Camera: eye=({:.2}, {:.2}, {:.2}) center=({:.2}, {:.2}, {:.2}) {}\n",
            camera.eye.x,
            camera.eye.y,
            camera.eye.z,
            camera.center.x,
            camera.center.y,
            camera.center.z,
            describe_projection(&camera.projection)
        ));

        for draw in draws {
            let uniforms = DrawUniforms::new(&vp, &draw.model)?;
            let clip = Matrix4::from_cols_array(uniforms.mvp)
                .multiply_vector4(Vector4::new(0.0, 0.0, 0.0, 1.0));
            out.push_str(&format!(
                "  [{}] clip=({:.4}, {:.4}, {:.4}, {:.4})",
                draw.label, clip.x, clip.y, clip.z, clip.w
            ));
            match ndc(clip) {
                Some(n) => {
                    let visible = n.iter().all(|c| c.abs() <= 1.0);
                    out.push_str(&format!(
                        " ndc=({:.4}, {:.4}, {:.4}) visible={}\n",
                        n[0],
                        n[1],
                        n[2],
                        if visible { "yes" } else { "no" }
                    ));
                }
                None => out.push_str(" ndc=undefined visible=no\n"),
            }
        }

        tracing::debug!(draws = draws.len(), "debug frame rendered");
        Ok(out)
    }
}

fn describe_projection(projection: &Projection) -> String {
    match *projection {
        Projection::Perspective {
            fovy_deg,
            aspect,
            near,
            far,
        } => format!("perspective fovy={fovy_deg:.0} aspect={aspect:.2} near={near} far={far}"),
        Projection::Orthographic {
            left,
            right,
            bottom,
            top,
            near,
            far,
        } => format!("ortho x=[{left}, {right}] y=[{bottom}, {top}] z=[{near}, {far}]"),
    }
}

/// Perspective divide; `None` when `w` is zero.
fn ndc(clip: Vector4) -> Option<[f32; 3]> {
    if clip.w == 0.0 {
        return None;
    }
    Some([clip.x / clip.w, clip.y / clip.w, clip.z / clip.w])
}
