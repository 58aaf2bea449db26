use crate::foundation::core::{Mat4, Vec3, Viewport};

/// Perspective camera looking down -z from `(0, 0, z)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,
    pub aspect: f32,
    pub z: f32,
}

impl Camera {
    pub const FOV_Y_DEG: f32 = 75.0;
    pub const NEAR: f32 = 0.1;
    pub const FAR: f32 = 1000.0;

    pub fn new(viewport: Viewport, z: f32) -> Self {
        Self {
            fov_y_deg: Self::FOV_Y_DEG,
            near: Self::NEAR,
            far: Self::FAR,
            aspect: viewport.aspect() as f32,
            z,
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.aspect = viewport.aspect() as f32;
    }

    /// Right-handed projection with a `[0, 1]` depth range.
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_deg.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, 0.0, -self.z))
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection() * self.view()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/camera.rs"]
mod tests;
