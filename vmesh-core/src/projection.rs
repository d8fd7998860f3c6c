/// Perspective projection and an orbiting camera
use std::f32::consts::{FRAC_PI_2, PI};

use crate::error::{GeometryError, Result};
use crate::matrix::Mat44;
use crate::transform::Transform;
use crate::vector::{Vec3, Vec4};

/// Closest the orbit camera may get to its target
pub const MIN_ORBIT_RADIUS: f32 = 0.1;

/// Symmetric-frustum perspective matrix (OpenGL clip conventions).
///
/// Requires `0 < fov_y < π`, `aspect > 0` and `far > near > 0`.
pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Result<Mat44> {
    if !(fov_y > 0.0 && fov_y < PI) {
        return Err(GeometryError::InvalidProjection(format!(
            "vertical field of view {fov_y} must lie in (0, π)"
        )));
    }
    if !(aspect > 0.0 && aspect.is_finite()) {
        return Err(GeometryError::InvalidProjection(format!(
            "aspect ratio {aspect} must be positive"
        )));
    }
    if !(near > 0.0 && far > near && far.is_finite()) {
        return Err(GeometryError::InvalidProjection(format!(
            "clip planes must satisfy far > near > 0 (near = {near}, far = {far})"
        )));
    }

    let tan_half_fov = (fov_y / 2.0).tan();
    let mut m = Mat44::ZERO;
    m[(0, 0)] = 1.0 / (aspect * tan_half_fov);
    m[(1, 1)] = 1.0 / tan_half_fov;
    m[(2, 2)] = -(far + near) / (far - near);
    m[(2, 3)] = -(2.0 * far * near) / (far - near);
    m[(3, 2)] = -1.0;
    Ok(m)
}

/// Camera orbiting the origin at `radius`, yawed by `phi` and pitched by `theta`
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub phi: f32,
    pub theta: f32,
    pub radius: f32,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            phi: 0.0,
            theta: 0.0,
            radius: 10.0,
            fov: 60.0_f32.to_radians(),
            aspect: width as f32 / height.max(1) as f32,
            near: 0.1,
            far: 100.0,
        }
    }

    /// Turn around the target; pitch is clamped to straight up/down
    pub fn orbit(&mut self, dphi: f32, dtheta: f32) {
        self.phi += dphi;
        self.theta = (self.theta + dtheta).clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    /// Move towards (negative) or away from (positive) the target
    pub fn zoom(&mut self, delta: f32) {
        self.radius = (self.radius + delta).max(MIN_ORBIT_RADIUS);
    }

    /// World-to-camera transform
    pub fn view_matrix(&self) -> Mat44 {
        Transform::translation(Vec3::new(0.0, 0.0, -self.radius))
            * Transform::rotation_x(self.theta)
            * Transform::rotation_y(self.phi)
    }

    pub fn projection_matrix(&self) -> Result<Mat44> {
        perspective(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Result<Mat44> {
        Ok(self.projection_matrix()? * self.view_matrix())
    }

    /// Project a 3D point to 2D screen space using a combined
    /// model-view-projection matrix. Returns `(x, y, depth)` with depth in
    /// normalized device units, or `None` outside the view volume.
    pub fn project(mvp: &Mat44, point: Vec3, width: u32, height: u32) -> Option<(f32, f32, f32)> {
        let clip: Vec4 = *mvp * point.extend(1.0);

        // Behind the eye or on the eye plane
        if clip.w < 1e-6 {
            return None;
        }

        let ndc = clip.truncate() / clip.w;
        if !(-1.0..=1.0).contains(&ndc.x)
            || !(-1.0..=1.0).contains(&ndc.y)
            || !(-1.0..=1.0).contains(&ndc.z)
        {
            return None;
        }

        let screen_x = (ndc.x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc.y) * 0.5 * height as f32;
        Some((screen_x, screen_y, ndc.z))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}
