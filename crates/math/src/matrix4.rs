use crate::error::{DegenerateReason, TransformError, degenerate};
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::ops::Mul;
use xform_common::{Vector3, Vector4};

/// A 4x4 homogeneous transform stored column-major, ready for
/// `uniformMatrix4fv(location, false, m.matrix())`.
///
/// Element (row `r`, column `c`) lives at index `c * 4 + r`. Vectors are
/// column vectors multiplied on the right.
///
/// Operations come in two flavours:
/// - `set_*` replaces the matrix.
/// - the bare form composes a new factor on the right (`self = self * factor`),
///   so the factor is applied to a vertex *before* everything already
///   accumulated. `mvp.set(&proj).multiply(&view).multiply(&model)` therefore
///   maps a vertex through model, then view, then projection.
///
/// Fallible operations leave the matrix untouched on error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Matrix4 {
    elements: [f32; 16],
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix4 {
    #[rustfmt::skip]
    pub const IDENTITY: Self = Self {
        elements: [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    /// The identity matrix.
    pub const fn new() -> Self {
        Self::IDENTITY
    }

    /// Wrap 16 column-major values.
    pub const fn from_cols_array(elements: [f32; 16]) -> Self {
        Self { elements }
    }

    /// The 16 column-major values for upload.
    pub fn matrix(&self) -> [f32; 16] {
        self.elements
    }

    pub fn as_array(&self) -> &[f32; 16] {
        &self.elements
    }

    /// Element at `row`, `col`.
    ///
    /// # Panics
    /// If either index is 4 or more.
    pub fn get(&self, row: usize, col: usize) -> f32 {
        assert!(row < 4 && col < 4, "matrix index ({row}, {col}) out of range");
        self.elements[col * 4 + row]
    }

    // ------------------------------------------------------------------
    // Constructors
    // ------------------------------------------------------------------

    #[rustfmt::skip]
    pub fn from_translation(dx: f32, dy: f32, dz: f32) -> Self {
        Self {
            elements: [
                1.0, 0.0, 0.0, 0.0,
                0.0, 1.0, 0.0, 0.0,
                0.0, 0.0, 1.0, 0.0,
                dx,  dy,  dz,  1.0,
            ],
        }
    }

    #[rustfmt::skip]
    pub fn from_scale(sx: f32, sy: f32, sz: f32) -> Self {
        Self {
            elements: [
                sx,  0.0, 0.0, 0.0,
                0.0, sy,  0.0, 0.0,
                0.0, 0.0, sz,  0.0,
                0.0, 0.0, 0.0, 1.0,
            ],
        }
    }

    /// Rotation by `angle_deg` about the coordinate axes whose flag is non-zero.
    ///
    /// This is not an arbitrary-axis rotation. Each selected axis contributes an
    /// elementary rotation; with several flags set the result is `Rx * Ry * Rz`
    /// (z is applied to a vertex first).
    pub fn from_rotation(angle_deg: f32, x: f32, y: f32, z: f32) -> Result<Self, TransformError> {
        let radian = PI * f64::from(angle_deg) / 180.0;
        let (sin, cos) = radian.sin_cos();

        let axes: [(f32, fn(f64, f64) -> [f64; 16]); 3] =
            [(x, rotation_x), (y, rotation_y), (z, rotation_z)];

        let mut rotation: Option<[f64; 16]> = None;
        for (flag, elementary) in axes {
            if flag == 0.0 {
                continue;
            }
            let r = elementary(sin, cos);
            rotation = Some(match rotation {
                Some(acc) => mul64(&acc, &r),
                None => r,
            });
        }

        let rotation = rotation.ok_or_else(|| degenerate(DegenerateReason::NoRotationAxis))?;
        Self::checked(rotation)
    }

    /// Right-handed view matrix looking from `eye` towards `center`.
    pub fn look_at_rh(eye: Vector3, center: Vector3, up: Vector3) -> Result<Self, TransformError> {
        let eye = widen3(eye);
        let center = widen3(center);
        let up = widen3(up);

        let f = normalize(subtract(center, eye))
            .ok_or_else(|| degenerate(DegenerateReason::CoincidentEyeAndCenter))?;
        let s = normalize(cross(f, up))
            .ok_or_else(|| degenerate(DegenerateReason::ParallelUpVector))?;
        let u = cross(s, f);

        #[rustfmt::skip]
        let m = [
            s[0], u[0], -f[0], 0.0,
            s[1], u[1], -f[1], 0.0,
            s[2], u[2], -f[2], 0.0,
            -dot(s, eye), -dot(u, eye), dot(f, eye), 1.0,
        ];
        Self::checked(m)
    }

    /// Orthographic projection mapping the box to the `[-1, 1]` cube.
    pub fn orthographic(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Result<Self, TransformError> {
        if left == right || bottom == top || near == far {
            return Err(degenerate(DegenerateReason::NullFrustum));
        }

        let (left, right) = (f64::from(left), f64::from(right));
        let (bottom, top) = (f64::from(bottom), f64::from(top));
        let (near, far) = (f64::from(near), f64::from(far));

        let rw = 1.0 / (right - left);
        let rh = 1.0 / (top - bottom);
        let rd = 1.0 / (far - near);

        #[rustfmt::skip]
        let m = [
            2.0 * rw, 0.0, 0.0, 0.0,
            0.0, 2.0 * rh, 0.0, 0.0,
            0.0, 0.0, -2.0 * rd, 0.0,
            -(right + left) * rw, -(top + bottom) * rh, -(far + near) * rd, 1.0,
        ];
        Self::checked(m)
    }

    /// OpenGL perspective projection: eye-space `-near..-far` maps to clip
    /// `z` in `[-w, w]` with `w = -z_eye`.
    pub fn perspective_fov(fovy_deg: f32, aspect: f32, near: f32, far: f32) -> Result<Self, TransformError> {
        if near == far || aspect == 0.0 {
            return Err(degenerate(DegenerateReason::NullFrustum));
        }
        if near <= 0.0 {
            return Err(degenerate(DegenerateReason::NearNotPositive));
        }
        if far <= 0.0 {
            return Err(degenerate(DegenerateReason::FarNotPositive));
        }

        let half_fovy = PI * f64::from(fovy_deg) / 180.0 / 2.0;
        let s = half_fovy.sin();
        if s == 0.0 {
            return Err(degenerate(DegenerateReason::ZeroFieldOfView));
        }

        let (aspect, near, far) = (f64::from(aspect), f64::from(near), f64::from(far));
        let rd = 1.0 / (far - near);
        let ct = half_fovy.cos() / s;

        #[rustfmt::skip]
        let m = [
            ct / aspect, 0.0, 0.0, 0.0,
            0.0, ct, 0.0, 0.0,
            0.0, 0.0, -(far + near) * rd, -1.0,
            0.0, 0.0, -2.0 * near * far * rd, 0.0,
        ];
        Self::checked(m)
    }

    /// Inverse of this matrix in `f64`, narrowed once.
    pub fn inverse(&self) -> Result<Self, TransformError> {
        let m = widen(&self.elements);
        let (adj, det) = adjugate(&m);
        if det == 0.0 || !det.is_finite() {
            return Err(degenerate(DegenerateReason::SingularMatrix));
        }
        let inv_det = 1.0 / det;
        let inv = adj.map(|v| v * inv_det);
        Self::checked(inv).map_err(|_| degenerate(DegenerateReason::SingularMatrix))
    }

    /// Determinant, evaluated in `f64`.
    pub fn determinant(&self) -> f64 {
        adjugate(&widen(&self.elements)).1
    }

    // ------------------------------------------------------------------
    // Replace ("set") operations
    // ------------------------------------------------------------------

    /// Copy `other` into `self`.
    pub fn set(&mut self, other: &Matrix4) -> &mut Self {
        self.elements = other.elements;
        self
    }

    /// Reset to identity.
    pub fn set_identity(&mut self) -> &mut Self {
        self.set(&Self::IDENTITY)
    }

    /// Replace with a translation.
    pub fn set_translate(&mut self, dx: f32, dy: f32, dz: f32) -> &mut Self {
        self.set(&Self::from_translation(dx, dy, dz))
    }

    /// Replace with a scale.
    pub fn set_scale(&mut self, sx: f32, sy: f32, sz: f32) -> &mut Self {
        self.set(&Self::from_scale(sx, sy, sz))
    }

    /// Replace with a rotation; see [`Matrix4::from_rotation`].
    pub fn set_rotate(&mut self, angle_deg: f32, x: f32, y: f32, z: f32) -> Result<&mut Self, TransformError> {
        let r = Self::from_rotation(angle_deg, x, y, z)?;
        Ok(self.set(&r))
    }

    /// Replace with a view matrix; see [`Matrix4::look_at_rh`].
    pub fn set_look_at(&mut self, eye: Vector3, center: Vector3, up: Vector3) -> Result<&mut Self, TransformError> {
        let view = Self::look_at_rh(eye, center, up)?;
        Ok(self.set(&view))
    }

    /// Replace with an orthographic projection.
    pub fn set_ortho(
        &mut self,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Result<&mut Self, TransformError> {
        let proj = Self::orthographic(left, right, bottom, top, near, far)?;
        Ok(self.set(&proj))
    }

    /// Replace with a perspective projection.
    pub fn set_perspective(
        &mut self,
        fovy_deg: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Result<&mut Self, TransformError> {
        let proj = Self::perspective_fov(fovy_deg, aspect, near, far)?;
        Ok(self.set(&proj))
    }

    /// Replace with the inverse of `other`.
    ///
    /// A singular `other` is rejected with `SingularMatrix`; `self` keeps its
    /// previous value.
    pub fn set_inverse_of(&mut self, other: &Matrix4) -> Result<&mut Self, TransformError> {
        let inv = other.inverse()?;
        Ok(self.set(&inv))
    }

    /// Replace with the normal matrix of `model` (its inverse-transpose).
    pub fn set_normal_matrix_of(&mut self, model: &Matrix4) -> Result<&mut Self, TransformError> {
        let inv = model.inverse()?;
        Ok(self.set(&inv).transpose())
    }

    // ------------------------------------------------------------------
    // Composing operations
    // ------------------------------------------------------------------

    /// `self = self * other`.
    pub fn multiply(&mut self, other: &Matrix4) -> &mut Self {
        self.elements = narrow(mul64(&widen(&self.elements), &widen(&other.elements)));
        self
    }

    /// `self = self * T`.
    pub fn translate(&mut self, dx: f32, dy: f32, dz: f32) -> &mut Self {
        self.multiply(&Self::from_translation(dx, dy, dz))
    }

    /// `self = self * S`.
    pub fn scale(&mut self, sx: f32, sy: f32, sz: f32) -> &mut Self {
        self.multiply(&Self::from_scale(sx, sy, sz))
    }

    /// `self = self * R`. With no axis flag set there is nothing to
    /// compose and `self` is returned unchanged.
    pub fn rotate(&mut self, angle_deg: f32, x: f32, y: f32, z: f32) -> Result<&mut Self, TransformError> {
        if x == 0.0 && y == 0.0 && z == 0.0 {
            return Ok(self);
        }
        let r = Self::from_rotation(angle_deg, x, y, z)?;
        Ok(self.multiply(&r))
    }

    /// `self = self * L`.
    pub fn look_at(&mut self, eye: Vector3, center: Vector3, up: Vector3) -> Result<&mut Self, TransformError> {
        let view = Self::look_at_rh(eye, center, up)?;
        Ok(self.multiply(&view))
    }

    /// `self = self * O`.
    pub fn ortho(
        &mut self,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Result<&mut Self, TransformError> {
        let proj = Self::orthographic(left, right, bottom, top, near, far)?;
        Ok(self.multiply(&proj))
    }

    /// `self = self * P`.
    pub fn perspective(
        &mut self,
        fovy_deg: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Result<&mut Self, TransformError> {
        let proj = Self::perspective_fov(fovy_deg, aspect, near, far)?;
        Ok(self.multiply(&proj))
    }

    /// Transpose in place.
    pub fn transpose(&mut self) -> &mut Self {
        let e = self.elements;
        for row in 0..4 {
            for col in 0..4 {
                self.elements[col * 4 + row] = e[row * 4 + col];
            }
        }
        self
    }

    /// Invert in place. On a singular matrix the value is left unchanged.
    pub fn invert(&mut self) -> Result<&mut Self, TransformError> {
        let inv = self.inverse()?;
        Ok(self.set(&inv))
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// `self * v`. Does not modify `self`.
    pub fn multiply_vector4(&self, v: Vector4) -> Vector4 {
        let m = &self.elements;
        let v = [f64::from(v.x), f64::from(v.y), f64::from(v.z), f64::from(v.w)];
        let row = |r: usize| {
            (f64::from(m[r]) * v[0]
                + f64::from(m[4 + r]) * v[1]
                + f64::from(m[8 + r]) * v[2]
                + f64::from(m[12 + r]) * v[3]) as f32
        };
        Vector4::new(row(0), row(1), row(2), row(3))
    }

    /// Transform a point (`w = 1`) and drop the resulting `w`.
    pub fn multiply_vector3(&self, p: Vector3) -> Vector3 {
        self.multiply_vector4(Vector4::from_point(p)).xyz()
    }

    /// Element-wise comparison within `epsilon`.
    pub fn abs_diff_eq(&self, other: &Matrix4, epsilon: f32) -> bool {
        self.elements
            .iter()
            .zip(other.elements.iter())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }

    /// `true` when no element is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.elements.iter().all(|v| v.is_finite())
    }

    fn checked(m: [f64; 16]) -> Result<Self, TransformError> {
        let elements = narrow(m);
        if elements.iter().any(|v| !v.is_finite()) {
            return Err(degenerate(DegenerateReason::NonFinite));
        }
        Ok(Self { elements })
    }
}

impl Mul for Matrix4 {
    type Output = Matrix4;

    fn mul(mut self, rhs: Matrix4) -> Matrix4 {
        self.multiply(&rhs);
        self
    }
}

impl Mul<Vector4> for Matrix4 {
    type Output = Vector4;

    fn mul(self, rhs: Vector4) -> Vector4 {
        self.multiply_vector4(rhs)
    }
}

impl AsRef<[f32]> for Matrix4 {
    fn as_ref(&self) -> &[f32] {
        &self.elements
    }
}

impl From<[f32; 16]> for Matrix4 {
    fn from(elements: [f32; 16]) -> Self {
        Self { elements }
    }
}

impl From<Matrix4> for [f32; 16] {
    fn from(m: Matrix4) -> Self {
        m.elements
    }
}

/// Prints rows, the way the matrix reads on paper.
impl fmt::Display for Matrix4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(4);
        for row in 0..4 {
            write!(f, "[")?;
            for col in 0..4 {
                if col > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{:>10.*}", precision, self.get(row, col))?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------
// f64 helpers
// ----------------------------------------------------------------------

#[rustfmt::skip]
fn rotation_x(sin: f64, cos: f64) -> [f64; 16] {
    [
        1.0, 0.0, 0.0, 0.0,
        0.0, cos, sin, 0.0,
        0.0, -sin, cos, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ]
}

#[rustfmt::skip]
fn rotation_y(sin: f64, cos: f64) -> [f64; 16] {
    [
        cos, 0.0, -sin, 0.0,
        0.0, 1.0, 0.0, 0.0,
        sin, 0.0, cos, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ]
}

#[rustfmt::skip]
fn rotation_z(sin: f64, cos: f64) -> [f64; 16] {
    [
        cos, sin, 0.0, 0.0,
        -sin, cos, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ]
}

fn widen(m: &[f32; 16]) -> [f64; 16] {
    m.map(f64::from)
}

fn narrow(m: [f64; 16]) -> [f32; 16] {
    m.map(|v| v as f32)
}

/// Column-major `a * b`.
fn mul64(a: &[f64; 16], b: &[f64; 16]) -> [f64; 16] {
    let mut out = [0.0; 16];
    for col in 0..4 {
        for row in 0..4 {
            out[col * 4 + row] = (0..4).map(|k| a[k * 4 + row] * b[col * 4 + k]).sum();
        }
    }
    out
}

/// Adjugate (transposed cofactor matrix) and determinant.
#[rustfmt::skip]
fn adjugate(m: &[f64; 16]) -> ([f64; 16], f64) {
    let mut inv = [0.0; 16];

    inv[0] = m[5] * m[10] * m[15] - m[5] * m[11] * m[14] - m[9] * m[6] * m[15]
        + m[9] * m[7] * m[14] + m[13] * m[6] * m[11] - m[13] * m[7] * m[10];
    inv[4] = -m[4] * m[10] * m[15] + m[4] * m[11] * m[14] + m[8] * m[6] * m[15]
        - m[8] * m[7] * m[14] - m[12] * m[6] * m[11] + m[12] * m[7] * m[10];
    inv[8] = m[4] * m[9] * m[15] - m[4] * m[11] * m[13] - m[8] * m[5] * m[15]
        + m[8] * m[7] * m[13] + m[12] * m[5] * m[11] - m[12] * m[7] * m[9];
    inv[12] = -m[4] * m[9] * m[14] + m[4] * m[10] * m[13] + m[8] * m[5] * m[14]
        - m[8] * m[6] * m[13] - m[12] * m[5] * m[10] + m[12] * m[6] * m[9];

    inv[1] = -m[1] * m[10] * m[15] + m[1] * m[11] * m[14] + m[9] * m[2] * m[15]
        - m[9] * m[3] * m[14] - m[13] * m[2] * m[11] + m[13] * m[3] * m[10];
    inv[5] = m[0] * m[10] * m[15] - m[0] * m[11] * m[14] - m[8] * m[2] * m[15]
        + m[8] * m[3] * m[14] + m[12] * m[2] * m[11] - m[12] * m[3] * m[10];
    inv[9] = -m[0] * m[9] * m[15] + m[0] * m[11] * m[13] + m[8] * m[1] * m[15]
        - m[8] * m[3] * m[13] - m[12] * m[1] * m[11] + m[12] * m[3] * m[9];
    inv[13] = m[0] * m[9] * m[14] - m[0] * m[10] * m[13] - m[8] * m[1] * m[14]
        + m[8] * m[2] * m[13] + m[12] * m[1] * m[10] - m[12] * m[2] * m[9];

    inv[2] = m[1] * m[6] * m[15] - m[1] * m[7] * m[14] - m[5] * m[2] * m[15]
        + m[5] * m[3] * m[14] + m[13] * m[2] * m[7] - m[13] * m[3] * m[6];
    inv[6] = -m[0] * m[6] * m[15] + m[0] * m[7] * m[14] + m[4] * m[2] * m[15]
        - m[4] * m[3] * m[14] - m[12] * m[2] * m[7] + m[12] * m[3] * m[6];
    inv[10] = m[0] * m[5] * m[15] - m[0] * m[7] * m[13] - m[4] * m[1] * m[15]
        + m[4] * m[3] * m[13] + m[12] * m[1] * m[7] - m[12] * m[3] * m[5];
    inv[14] = -m[0] * m[5] * m[14] + m[0] * m[6] * m[13] + m[4] * m[1] * m[14]
        - m[4] * m[2] * m[13] - m[12] * m[1] * m[6] + m[12] * m[2] * m[5];

    inv[3] = -m[1] * m[6] * m[11] + m[1] * m[7] * m[10] + m[5] * m[2] * m[11]
        - m[5] * m[3] * m[10] - m[9] * m[2] * m[7] + m[9] * m[3] * m[6];
    inv[7] = m[0] * m[6] * m[11] - m[0] * m[7] * m[10] - m[4] * m[2] * m[11]
        + m[4] * m[3] * m[10] + m[8] * m[2] * m[7] - m[8] * m[3] * m[6];
    inv[11] = -m[0] * m[5] * m[11] + m[0] * m[7] * m[9] + m[4] * m[1] * m[11]
        - m[4] * m[3] * m[9] - m[8] * m[1] * m[7] + m[8] * m[3] * m[5];
    inv[15] = m[0] * m[5] * m[10] - m[0] * m[6] * m[9] - m[4] * m[1] * m[10]
        + m[4] * m[2] * m[9] + m[8] * m[1] * m[6] - m[8] * m[2] * m[5];

    let det = m[0] * inv[0] + m[1] * inv[4] + m[2] * inv[8] + m[3] * inv[12];
    (inv, det)
}

fn widen3(v: Vector3) -> [f64; 3] {
    [f64::from(v.x), f64::from(v.y), f64::from(v.z)]
}

fn subtract(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn normalize(v: [f64; 3]) -> Option<[f64; 3]> {
    let len = dot(v, v).sqrt();
    if len == 0.0 || !len.is_finite() {
        return None;
    }
    Some([v[0] / len, v[1] / len, v[2] / len])
}
