use bytemuck::{Pod, Zeroable};

use crate::foundation::core::{Mat4, Rgb, Vec2};

/// Texture handle: the index of the media slot that produces it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextureId(pub usize);

/// UV scale/offset that fits media of any aspect into the square plate without distortion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UvFit {
    pub scale: Vec2,
    pub offset: Vec2,
}

impl Default for UvFit {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl UvFit {
    pub const IDENTITY: Self = Self {
        scale: Vec2::ONE,
        offset: Vec2::ZERO,
    };

    /// Aspect assumed while the native size is still unknown.
    pub const FALLBACK_ASPECT: f32 = 16.0 / 9.0;

    /// Wider-than-square media is scaled down horizontally, taller media vertically; both are
    /// centered.
    pub fn for_media(native_size: Option<(u32, u32)>) -> Self {
        let aspect = match native_size {
            Some((w, h)) if w > 0 && h > 0 => w as f32 / h as f32,
            _ => Self::FALLBACK_ASPECT,
        };
        if aspect > 1.0 {
            let s = 1.0 / aspect;
            Self {
                scale: Vec2::new(s, 1.0),
                offset: Vec2::new((1.0 - s) / 2.0, 0.0),
            }
        } else {
            let s = aspect;
            Self {
                scale: Vec2::new(1.0, s),
                offset: Vec2::new(0.0, (1.0 - s) / 2.0),
            }
        }
    }

    pub fn apply(&self, uv: Vec2) -> Vec2 {
        uv * self.scale + self.offset
    }

    fn pack(&self) -> [f32; 4] {
        [self.scale.x, self.scale.y, self.offset.x, self.offset.y]
    }
}

/// One side of the crossfade: a texture when available, otherwise its sampled color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlateSource {
    pub texture: Option<TextureId>,
    pub color: Rgb,
    pub uv: UvFit,
}

impl Default for PlateSource {
    fn default() -> Self {
        Self {
            texture: None,
            color: Rgb::BLACK,
            uv: UvFit::IDENTITY,
        }
    }
}

/// Semantic plate shader state. `a` is outgoing, `b` incoming.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlateMaterial {
    pub a: PlateSource,
    pub b: PlateSource,
    /// Crossfade from `a` to `b`, 0..1.
    pub progress: f32,
    /// Fade toward black, 0..1.
    pub fade_out: f32,
    /// Seed-like time for the dither noise.
    pub time: f32,
    /// When off the plate renders opaque black.
    pub use_texture: bool,
}

impl PlateMaterial {
    /// Drop every transition uniform back to the idle black plate.
    pub fn clear(&mut self) {
        *self = Self {
            time: self.time,
            ..Self::default()
        };
    }

    /// GPU layout. `has_a`/`has_b` tell whether a decoded frame is bound for each side.
    pub fn to_uniforms(&self, view_proj: Mat4, model: Mat4, has_a: bool, has_b: bool) -> PlateUniforms {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        PlateUniforms {
            view_proj: view_proj.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            color_a: self.a.color.to_array4(),
            color_b: self.b.color.to_array4(),
            uv_a: self.a.uv.pack(),
            uv_b: self.b.uv.pack(),
            params: [
                self.progress,
                self.fade_out,
                self.time,
                flag(self.use_texture),
            ],
            flags: [flag(has_a), flag(has_b), 0.0, 0.0],
        }
    }
}

/// Plate uniform block as laid out for the shader (std140-compatible, vec4 aligned).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct PlateUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub color_a: [f32; 4],
    pub color_b: [f32; 4],
    /// `scale.xy, offset.xy`
    pub uv_a: [f32; 4],
    pub uv_b: [f32; 4],
    /// `progress, fade_out, time, use_texture`
    pub params: [f32; 4],
    /// `has_texture_a, has_texture_b, _, _`
    pub flags: [f32; 4],
}

/// Transform block for the mask pass.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct MaskUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
}

#[cfg(test)]
#[path = "../../tests/unit/render/uniforms.rs"]
mod tests;
