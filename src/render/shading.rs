//! Reference plate shading, shared by the CPU backend and mirrored by the WGSL shader.

use crate::{
    foundation::{
        core::{Rgb, Vec2},
        math::hash21,
    },
    render::uniforms::PlateMaterial,
};

/// Cells per plate side used for the dither noise.
pub const NOISE_CELLS: f32 = 64.0;

/// Progress mapped through per-cell noise so the crossfade dissolves instead of blending
/// uniformly. Exactly 0 at `p = 0` and exactly 1 at `p = 1`.
pub fn dissolve(p: f32, noise: f32) -> f32 {
    (p * 1.2 - noise * 0.2).clamp(0.0, 1.0)
}

/// Dither noise for a plate UV.
pub fn plate_noise(uv: Vec2, time: f32) -> f32 {
    let cell = (uv * NOISE_CELLS).floor();
    hash21(cell.x + time, cell.y - time)
}

/// Color of the plate at `uv`.
///
/// `sample_a`/`sample_b` are the decoded texture colors at the side's fitted UV, or `None` when
/// that side has no decoded frame; the side's sampled color is used instead.
pub fn shade_plate(
    m: &PlateMaterial,
    uv: Vec2,
    sample_a: Option<Rgb>,
    sample_b: Option<Rgb>,
) -> [f32; 4] {
    if !m.use_texture {
        return Rgb::BLACK.to_array4();
    }
    let a = sample_a.unwrap_or(m.a.color);
    let b = sample_b.unwrap_or(m.b.color);
    let n = plate_noise(uv, m.time);
    let mixed = a.lerp(b, dissolve(m.progress, n));
    mixed.lerp(Rgb::BLACK, dissolve(m.fade_out, n)).to_array4()
}

#[cfg(test)]
#[path = "../../tests/unit/render/shading.rs"]
mod tests;
