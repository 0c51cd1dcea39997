use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// A 3-component vector: eye/center/up triples, light directions, points.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction, or `None` for a zero-length vector.
    pub fn normalize(self) -> Option<Self> {
        let len = self.length();
        if len == 0.0 || !len.is_finite() {
            return None;
        }
        Some(self * (1.0 / len))
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f32; 3]> for Vector3 {
    fn from(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<Vector3> for [f32; 3] {
    fn from(v: Vector3) -> Self {
        v.to_array()
    }
}

impl Add for Vector3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vector3 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vector3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// A homogeneous 4-component vector, the input and output of `Matrix4::multiply_vector4`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
pub struct Vector4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vector4 {
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// A position: `w = 1`, so translations apply.
    pub const fn from_point(p: Vector3) -> Self {
        Self::new(p.x, p.y, p.z, 1.0)
    }

    /// A direction: `w = 0`, so translations are ignored.
    pub const fn from_direction(d: Vector3) -> Self {
        Self::new(d.x, d.y, d.z, 0.0)
    }

    pub fn xyz(self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }
}

impl From<[f32; 4]> for Vector4 {
    fn from(v: [f32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<Vector4> for [f32; 4] {
    fn from(v: Vector4) -> Self {
        v.to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_of_basis_vectors() {
        assert_eq!(Vector3::X.cross(Vector3::Y), Vector3::Z);
        assert_eq!(Vector3::Y.cross(Vector3::Z), Vector3::X);
        assert_eq!(Vector3::Z.cross(Vector3::X), Vector3::Y);
    }

    #[test]
    fn normalize_light_direction() {
        let dir = Vector3::new(0.5, 3.0, 4.0).normalize().unwrap();
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert!((dir.x - 0.5 / 5.024_938).abs() < 1e-5);
    }

    #[test]
    fn normalize_zero_is_none() {
        assert_eq!(Vector3::ZERO.normalize(), None);
    }

    #[test]
    fn point_and_direction_w() {
        let p = Vector4::from_point(Vector3::new(1.0, 2.0, 3.0));
        let d = Vector4::from_direction(Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(p.w, 1.0);
        assert_eq!(d.w, 0.0);
        assert_eq!(p.xyz(), d.xyz());
    }

    #[test]
    fn vector_is_tightly_packed() {
        let v = Vector3::new(1.0, 2.0, 3.0);
        let bytes: &[u8] = bytemuck::bytes_of(&v);
        assert_eq!(bytes.len(), 12);
    }
}
