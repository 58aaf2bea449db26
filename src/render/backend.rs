use crate::{
    foundation::{core::Mat4, error::StageResult},
    render::{scene::Mesh, uniforms::{PlateMaterial, TextureId}},
};

/// Read-back frame, straight (non-premultiplied) RGBA8, rows top to bottom.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl FrameRGBA {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + x as usize) * 4;
        let p = self.data.get(i..i + 4)?;
        Some([p[0], p[1], p[2], p[3]])
    }

    pub fn into_image(self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.data)
    }
}

/// Decoded frames for texture handles. Implemented by the media pool.
pub trait FrameSource {
    /// Current decoded frame, or `None` while nothing is decoded yet.
    fn frame(&self, id: TextureId) -> Option<&image::RgbaImage>;
}

/// Source with no frames; every plate side falls back to its color.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoFrames;

impl FrameSource for NoFrames {
    fn frame(&self, _id: TextureId) -> Option<&image::RgbaImage> {
        None
    }
}

/// The three passes of a composed frame, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StencilPass {
    /// Prisms into the stencil only; color and depth writes off.
    Mask,
    /// Plate where the stencil equals the mask reference; color and depth writes on.
    Plate,
    /// Stencil state back to defaults for the next frame.
    Reset,
}

impl StencilPass {
    pub const ORDER: [Self; 3] = [Self::Mask, Self::Plate, Self::Reset];
}

/// Stencil value written by the mask pass and tested by the plate pass.
pub const MASK_REF: u8 = 1;

pub struct MaskPass<'a> {
    pub view_proj: Mat4,
    pub models: &'a [Mat4],
    pub mesh: &'a Mesh,
}

pub struct PlatePass<'a> {
    pub view_proj: Mat4,
    pub model: Mat4,
    pub mesh: &'a Mesh,
    pub material: &'a PlateMaterial,
}

pub trait PassBackend {
    /// Size the draw buffers and clear color, depth and stencil.
    fn begin_frame(&mut self, width: u32, height: u32) -> StageResult<()>;

    fn draw_mask(&mut self, pass: &MaskPass<'_>) -> StageResult<()>;

    fn draw_plate(&mut self, pass: &PlatePass<'_>, frames: &dyn FrameSource) -> StageResult<()>;

    fn reset(&mut self) -> StageResult<()>;

    fn readback(&mut self) -> StageResult<FrameRGBA>;
}

/// Run one frame through `backend` in [`StencilPass::ORDER`] and read it back.
pub fn execute_frame<B: PassBackend + ?Sized>(
    backend: &mut B,
    size: (u32, u32),
    mask: &MaskPass<'_>,
    plate: &PlatePass<'_>,
    frames: &dyn FrameSource,
) -> StageResult<FrameRGBA> {
    backend.begin_frame(size.0, size.1)?;
    for pass in StencilPass::ORDER {
        match pass {
            StencilPass::Mask => backend.draw_mask(mask)?,
            StencilPass::Plate => backend.draw_plate(plate, frames)?,
            StencilPass::Reset => backend.reset()?,
        }
    }
    backend.readback()
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
