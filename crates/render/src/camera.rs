use serde::{Deserialize, Serialize};
use xform_math::{Matrix4, TransformError, Vector3};

/// How eye space is mapped to clip space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    Perspective {
        /// Vertical field of view in degrees.
        fovy_deg: f32,
        aspect: f32,
        near: f32,
        far: f32,
    },
    Orthographic {
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    },
}

impl Default for Projection {
    fn default() -> Self {
        Projection::Perspective {
            fovy_deg: 30.0,
            aspect: 1.0,
            near: 1.0,
            far: 100.0,
        }
    }
}

impl Projection {
    pub fn matrix(&self) -> Result<Matrix4, TransformError> {
        match *self {
            Projection::Perspective {
                fovy_deg,
                aspect,
                near,
                far,
            } => Matrix4::perspective_fov(fovy_deg, aspect, near, far),
            Projection::Orthographic {
                left,
                right,
                bottom,
                top,
                near,
                far,
            } => Matrix4::orthographic(left, right, bottom, top, near, far),
        }
    }
}

/// Camera/view configuration: where the eye is, what it looks at, how it projects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Camera position in world space.
    pub eye: Vector3,
    /// Point the camera is looking at.
    pub center: Vector3,
    pub up: Vector3,
    #[serde(default)]
    pub projection: Projection,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vector3::new(3.0, 3.0, 7.0),
            center: Vector3::ZERO,
            up: Vector3::Y,
            projection: Projection::default(),
        }
    }
}

impl Camera {
    /// Match a perspective projection to a new canvas size. Orthographic
    /// projections are left as they are.
    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        if let Projection::Perspective { aspect, .. } = &mut self.projection {
            if height > 0 {
                *aspect = width as f32 / height as f32;
            }
        }
        self
    }

    pub fn view_matrix(&self) -> Result<Matrix4, TransformError> {
        Matrix4::look_at_rh(self.eye, self.center, self.up)
    }

    pub fn projection_matrix(&self) -> Result<Matrix4, TransformError> {
        self.projection.matrix()
    }

    /// `projection * view`, built the way the demos do: projection first,
    /// then `look_at` composed onto it.
    pub fn view_projection(&self) -> Result<Matrix4, TransformError> {
        let mut vp = self.projection_matrix()?;
        vp.look_at(self.eye, self.center, self.up)?;
        Ok(vp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xform_math::{DegenerateReason, Vector4};

    #[test]
    fn default_camera_matches_fixture() {
        let cam = Camera::default();
        let vp = cam.view_projection().unwrap();
        let clip = vp.multiply_vector4(Vector4::new(1.0, 1.0, 1.0, 1.0));
        assert!((clip.x - 1.960_169).abs() < 1e-4);
        assert!((clip.w - 6.597_150).abs() < 1e-4);
    }

    #[test]
    fn view_projection_equals_product() {
        let cam = Camera::default();
        let product = cam.projection_matrix().unwrap() * cam.view_matrix().unwrap();
        assert!(cam.view_projection().unwrap().abs_diff_eq(&product, 1e-6));
    }

    #[test]
    fn viewport_updates_aspect() {
        let cam = Camera::default().with_viewport(800, 400);
        match cam.projection {
            Projection::Perspective { aspect, .. } => assert_eq!(aspect, 2.0),
            Projection::Orthographic { .. } => panic!("projection kind changed"),
        }
        // Zero height keeps the old aspect rather than dividing by zero.
        let cam = cam.with_viewport(800, 0);
        assert!(cam.projection_matrix().is_ok());
    }

    #[test]
    fn orthographic_camera() {
        let cam = Camera {
            eye: Vector3::new(0.0, 0.0, 1.0),
            projection: Projection::Orthographic {
                left: -1.0,
                right: 1.0,
                bottom: -1.0,
                top: 1.0,
                near: 0.0,
                far: 2.0,
            },
            ..Camera::default()
        };
        let vp = cam.view_projection().unwrap();
        let clip = vp.multiply_vector4(Vector4::new(0.0, 0.0, 0.0, 1.0));
        assert!(clip.z.abs() < 1e-6);
    }

    #[test]
    fn degenerate_projection_surfaces_error() {
        let cam = Camera {
            projection: Projection::Perspective {
                fovy_deg: 30.0,
                aspect: 1.0,
                near: 10.0,
                far: 10.0,
            },
            ..Camera::default()
        };
        let err = cam.view_projection().unwrap_err();
        assert_eq!(err.reason(), DegenerateReason::NullFrustum);
    }

    #[test]
    fn camera_from_json() {
        let json = r#"{
            "eye": {"x": 0.0, "y": 0.0, "z": 5.0},
            "center": {"x": 0.0, "y": 0.0, "z": -100.0},
            "up": {"x": 0.0, "y": 1.0, "z": 0.0},
            "projection": {"perspective": {"fovy_deg": 30.0, "aspect": 1.0, "near": 1.0, "far": 100.0}}
        }"#;
        let cam: Camera = serde_json::from_str(json).unwrap();
        assert_eq!(cam.eye, Vector3::new(0.0, 0.0, 5.0));
        assert_eq!(cam.projection, Projection::default());
    }
}
