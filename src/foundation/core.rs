use std::{cell::RefCell, rc::Rc};

use crate::foundation::error::{StageError, StageResult};

pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

/// Single-owner-per-thread handle used for state that two components read and write
/// (scene transforms, plate material, scroll surface).
pub type Shared<T> = Rc<RefCell<T>>;

/// Wrap a value into a [`Shared`] handle.
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// Viewport size in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Viewport {
    /// Create a validated viewport (both sides finite and > 0).
    pub fn new(width: f64, height: f64) -> StageResult<Self> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(StageError::validation(format!(
                "viewport must be positive and finite, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Width / height.
    pub fn aspect(self) -> f64 {
        self.width / self.height
    }

    /// Draw-buffer size in whole pixels (at least 1x1).
    pub fn pixel_size(self) -> (u32, u32) {
        (
            self.width.round().max(1.0) as u32,
            self.height.round().max(1.0) as u32,
        )
    }

    /// Viewport class for a given breakpoint width.
    pub fn breakpoint(self, wide_from_px: f64) -> Breakpoint {
        Breakpoint::classify(self.width, wide_from_px)
    }
}

/// Host-reported sizes go through the same checks as [`Viewport::new`].
impl TryFrom<kurbo::Size> for Viewport {
    type Error = StageError;

    fn try_from(size: kurbo::Size) -> StageResult<Self> {
        Self::new(size.width, size.height)
    }
}

/// Viewport-width class. Each class owns a complete keyframe set; they are never mixed.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum Breakpoint {
    /// Narrow viewports (below the breakpoint width).
    Compact,
    /// Viewports at or above the breakpoint width.
    Wide,
}

impl Breakpoint {
    /// Classify a viewport width.
    pub fn classify(width: f64, wide_from_px: f64) -> Self {
        if width >= wide_from_px {
            Self::Wide
        } else {
            Self::Compact
        }
    }
}

/// Straight RGB color with channels in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rgb {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
}

impl Rgb {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);

    /// Construct from float channels.
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Neutral gray at the given level.
    pub const fn gray(v: f32) -> Self {
        Self::new(v, v, v)
    }

    /// Construct from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
        )
    }

    /// Channel-wise linear interpolation.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    /// Pack as `[r, g, b, 1]`.
    pub fn to_array4(self) -> [f32; 4] {
        [self.r, self.g, self.b, 1.0]
    }
}

/// Position / Euler rotation (XYZ order, radians) / scale of a scene node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    /// Translation.
    pub position: Vec3,
    /// Euler angles applied in X, Y, Z order.
    pub rotation: Vec3,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    /// No translation, no rotation, unit scale.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    /// Identity pose moved to `position`.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Local-to-parent matrix.
    pub fn matrix(&self) -> Mat4 {
        let q = Quat::from_euler(
            glam::EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_scale_rotation_translation(self.scale, q, self.position)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
