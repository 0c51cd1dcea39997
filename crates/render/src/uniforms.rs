use bytemuck::{Pod, Zeroable};
use xform_math::{Matrix4, TransformError};

/// Per-draw matrices in upload layout: three column-major `mat4`s.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct DrawUniforms {
    pub mvp: [f32; 16],
    pub model: [f32; 16],
    /// Inverse-transpose of `model`, for transforming normals.
    pub normal: [f32; 16],
}

impl DrawUniforms {
    pub fn new(view_projection: &Matrix4, model: &Matrix4) -> Result<Self, TransformError> {
        let mut mvp = *view_projection;
        mvp.multiply(model);

        let mut normal = Matrix4::new();
        normal.set_normal_matrix_of(model)?;

        Ok(Self {
            mvp: mvp.matrix(),
            model: model.matrix(),
            normal: normal.matrix(),
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}
