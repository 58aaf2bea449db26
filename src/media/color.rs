use image::imageops::{self, FilterType};

use crate::{config::TransitionConfig, foundation::core::Rgb, media::pool::MediaElement};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SampleError {
    #[error("no decoded frame")]
    NoFrame,
    #[error("frame has zero size")]
    EmptyFrame,
}

/// Largest grid side a sampler averages over.
pub const MAX_SAMPLE_GRID: u32 = 64;

/// Approximate dominant color: the frame box-downsampled to an `N x N` grid and averaged.
#[derive(Debug, Clone, Copy)]
pub struct ColorSampler {
    grid: u32,
    fallback: Rgb,
}

impl ColorSampler {
    pub fn new(grid: u32, fallback: Rgb) -> Self {
        Self {
            grid: grid.clamp(1, MAX_SAMPLE_GRID),
            fallback,
        }
    }

    pub fn from_config(cfg: &TransitionConfig) -> Self {
        Self::new(cfg.sample_grid, cfg.fallback_color())
    }

    pub fn fallback(&self) -> Rgb {
        self.fallback
    }

    pub fn sample_frame(&self, frame: &image::RgbaImage) -> Result<Rgb, SampleError> {
        let (w, h) = frame.dimensions();
        if w == 0 || h == 0 {
            return Err(SampleError::EmptyFrame);
        }
        let small = imageops::resize(frame, self.grid, self.grid, FilterType::Triangle);
        let mut sum = [0u64; 3];
        for p in small.pixels() {
            for (acc, c) in sum.iter_mut().zip(p.0) {
                *acc += u64::from(c);
            }
        }
        let n = (u64::from(self.grid) * u64::from(self.grid)) as f32 * 255.0;
        Ok(Rgb::new(
            sum[0] as f32 / n,
            sum[1] as f32 / n,
            sum[2] as f32 / n,
        ))
    }

    pub fn sample(&self, media: &dyn MediaElement) -> Result<Rgb, SampleError> {
        let frame = media.current_frame().ok_or(SampleError::NoFrame)?;
        self.sample_frame(frame)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/color.rs"]
mod tests;
