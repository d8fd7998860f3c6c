/// Transform constructors and rotation state
use crate::error::Result;
use crate::matrix::Mat44;
use crate::vector::Vec3;

/// Rotation state around three axes (in radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Builders for 4x4 object transforms
pub struct Transform;

impl Transform {
    /// Right-handed rotation about +X
    pub fn rotation_x(angle: f32) -> Mat44 {
        let (sin, cos) = angle.sin_cos();
        let mut m = Mat44::IDENTITY;
        m[(1, 1)] = cos;
        m[(1, 2)] = -sin;
        m[(2, 1)] = sin;
        m[(2, 2)] = cos;
        m
    }

    /// Right-handed rotation about +Y
    pub fn rotation_y(angle: f32) -> Mat44 {
        let (sin, cos) = angle.sin_cos();
        let mut m = Mat44::IDENTITY;
        m[(0, 0)] = cos;
        m[(0, 2)] = sin;
        m[(2, 0)] = -sin;
        m[(2, 2)] = cos;
        m
    }

    /// Right-handed rotation about +Z
    pub fn rotation_z(angle: f32) -> Mat44 {
        let (sin, cos) = angle.sin_cos();
        let mut m = Mat44::IDENTITY;
        m[(0, 0)] = cos;
        m[(0, 1)] = -sin;
        m[(1, 0)] = sin;
        m[(1, 1)] = cos;
        m
    }

    /// Create a rotation matrix from a rotation state
    pub fn rotation_matrix(rotation: &RotationState) -> Mat44 {
        // Apply rotations in order: X, Y, Z
        Self::rotation_z(rotation.z) * Self::rotation_y(rotation.y) * Self::rotation_x(rotation.x)
    }

    pub fn translation(offset: Vec3) -> Mat44 {
        let mut m = Mat44::IDENTITY;
        m[(0, 3)] = offset.x;
        m[(1, 3)] = offset.y;
        m[(2, 3)] = offset.z;
        m
    }

    /// Non-uniform scale; the homogeneous slot stays 1
    pub fn scaling(sx: f32, sy: f32, sz: f32) -> Mat44 {
        let mut m = Mat44::ZERO;
        m[(0, 0)] = sx;
        m[(1, 1)] = sy;
        m[(2, 2)] = sz;
        m[(3, 3)] = 1.0;
        m
    }

    /// Inverse-transpose of `model`, for carrying normals through it
    pub fn normal_matrix(model: &Mat44) -> Result<Mat44> {
        Ok(model.invert()?.transpose())
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(model: &Mat44, view: &Mat44, projection: &Mat44) -> Mat44 {
        *projection * *view * *model
    }
}
