use crate::{
    foundation::{
        core::{Mat4, Rgb, Vec2, Vec3},
        error::{StageError, StageResult},
    },
    render::{
        backend::{FrameRGBA, FrameSource, MASK_REF, MaskPass, PassBackend, PlatePass},
        scene::Mesh,
        shading::shade_plate,
        uniforms::PlateSource,
    },
};

/// Software rasterizer with color, depth and stencil buffers.
///
/// No near-plane clipping: triangles with a vertex behind the camera are skipped. Faces are
/// drawn from both sides.
#[derive(Debug, Default)]
pub struct CpuBackend {
    width: u32,
    height: u32,
    color: Vec<[f32; 4]>,
    depth: Vec<f32>,
    stencil: Vec<u8>,
    stencil_test: bool,
}

#[derive(Clone, Copy, Debug)]
struct ScreenVertex {
    x: f32,
    y: f32,
    z: f32,
    inv_w: f32,
    uv_over_w: Vec2,
}

/// Covered pixel handed to a fragment callback.
#[derive(Clone, Copy, Debug)]
struct Fragment {
    index: usize,
    depth: f32,
    uv: Vec2,
}

impl CpuBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pixels currently holding the mask reference value.
    pub fn stencil_coverage(&self) -> usize {
        self.stencil.iter().filter(|&&s| s == MASK_REF).count()
    }

    pub fn stencil_at(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.stencil
            .get((y as usize) * (self.width as usize) + x as usize)
            .copied()
    }

    pub fn is_stencil_test_enabled(&self) -> bool {
        self.stencil_test
    }

    fn project(&self, mvp: Mat4, p: Vec3, uv: Vec2) -> Option<ScreenVertex> {
        let clip = mvp * p.extend(1.0);
        if clip.w <= 1e-5 {
            return None;
        }
        let inv_w = 1.0 / clip.w;
        let ndc = clip.truncate() * inv_w;
        Some(ScreenVertex {
            x: (ndc.x * 0.5 + 0.5) * self.width as f32,
            y: (0.5 - ndc.y * 0.5) * self.height as f32,
            z: ndc.z,
            inv_w,
            uv_over_w: uv * inv_w,
        })
    }

    fn rasterize(&self, mvp: Mat4, mesh: &Mesh, mut frag: impl FnMut(Fragment)) {
        for [i0, i1, i2] in mesh.triangles() {
            let vert = |i: u32| {
                let i = i as usize;
                let uv = mesh.uvs.get(i).copied().unwrap_or(Vec2::ZERO);
                mesh.positions
                    .get(i)
                    .and_then(|&p| self.project(mvp, p, uv))
            };
            let (Some(a), Some(b), Some(c)) = (vert(i0), vert(i1), vert(i2)) else {
                continue;
            };
            self.raster_triangle([a, b, c], &mut frag);
        }
    }

    fn raster_triangle(&self, v: [ScreenVertex; 3], frag: &mut impl FnMut(Fragment)) {
        let area = edge(v[0].x, v[0].y, v[1].x, v[1].y, v[2].x, v[2].y);
        if area.abs() < 1e-8 {
            return;
        }
        let min_x = v.iter().map(|p| p.x).fold(f32::INFINITY, f32::min).floor().max(0.0);
        let max_x = v
            .iter()
            .map(|p| p.x)
            .fold(f32::NEG_INFINITY, f32::max)
            .ceil()
            .min(self.width as f32);
        let min_y = v.iter().map(|p| p.y).fold(f32::INFINITY, f32::min).floor().max(0.0);
        let max_y = v
            .iter()
            .map(|p| p.y)
            .fold(f32::NEG_INFINITY, f32::max)
            .ceil()
            .min(self.height as f32);
        if min_x >= max_x || min_y >= max_y {
            return;
        }

        for py in min_y as u32..max_y as u32 {
            for px in min_x as u32..max_x as u32 {
                let (sx, sy) = (px as f32 + 0.5, py as f32 + 0.5);
                let w0 = edge(v[1].x, v[1].y, v[2].x, v[2].y, sx, sy) / area;
                let w1 = edge(v[2].x, v[2].y, v[0].x, v[0].y, sx, sy) / area;
                let w2 = edge(v[0].x, v[0].y, v[1].x, v[1].y, sx, sy) / area;
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }
                let depth = w0 * v[0].z + w1 * v[1].z + w2 * v[2].z;
                if !(0.0..=1.0).contains(&depth) {
                    continue;
                }
                let inv_w = w0 * v[0].inv_w + w1 * v[1].inv_w + w2 * v[2].inv_w;
                let uv =
                    (v[0].uv_over_w * w0 + v[1].uv_over_w * w1 + v[2].uv_over_w * w2) / inv_w;
                frag(Fragment {
                    index: (py as usize) * (self.width as usize) + px as usize,
                    depth,
                    uv,
                });
            }
        }
    }
}

fn edge(ax: f32, ay: f32, bx: f32, by: f32, px: f32, py: f32) -> f32 {
    (bx - ax) * (py - ay) - (by - ay) * (px - ax)
}

/// Nearest-texel lookup; UV origin bottom-left, clamped to edge.
fn sample_texel(img: &image::RgbaImage, uv: Vec2) -> Option<Rgb> {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return None;
    }
    let x = ((uv.x.clamp(0.0, 1.0) * w as f32) as u32).min(w - 1);
    let y = (((1.0 - uv.y).clamp(0.0, 1.0) * h as f32) as u32).min(h - 1);
    let p = img.get_pixel(x, y).0;
    Some(Rgb::from_rgb8(p[0], p[1], p[2]))
}

fn sample_side(side: &PlateSource, frames: &dyn FrameSource, uv: Vec2) -> Option<Rgb> {
    let img = frames.frame(side.texture?)?;
    sample_texel(img, side.uv.apply(uv))
}

fn to_u8(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl PassBackend for CpuBackend {
    fn begin_frame(&mut self, width: u32, height: u32) -> StageResult<()> {
        if width == 0 || height == 0 {
            return Err(StageError::render(format!(
                "draw buffer must be non-empty, got {width}x{height}"
            )));
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| StageError::render("draw buffer size overflow"))?;
        self.width = width;
        self.height = height;
        self.color.clear();
        self.color.resize(len, [0.0; 4]);
        self.depth.clear();
        self.depth.resize(len, 1.0);
        self.stencil.clear();
        self.stencil.resize(len, 0);
        self.stencil_test = true;
        Ok(())
    }

    fn draw_mask(&mut self, pass: &MaskPass<'_>) -> StageResult<()> {
        let mut marked = Vec::new();
        for &model in pass.models {
            self.rasterize(pass.view_proj * model, pass.mesh, |f| marked.push(f.index));
        }
        for i in marked {
            self.stencil[i] = MASK_REF;
        }
        Ok(())
    }

    fn draw_plate(&mut self, pass: &PlatePass<'_>, frames: &dyn FrameSource) -> StageResult<()> {
        let mut hits = Vec::new();
        self.rasterize(pass.view_proj * pass.model, pass.mesh, |f| hits.push(f));
        let m = pass.material;
        for f in hits {
            if self.stencil_test && self.stencil[f.index] != MASK_REF {
                continue;
            }
            if f.depth >= self.depth[f.index] {
                continue;
            }
            let a = sample_side(&m.a, frames, f.uv);
            let b = sample_side(&m.b, frames, f.uv);
            self.color[f.index] = shade_plate(m, f.uv, a, b);
            self.depth[f.index] = f.depth;
        }
        Ok(())
    }

    fn reset(&mut self) -> StageResult<()> {
        self.stencil_test = false;
        Ok(())
    }

    fn readback(&mut self) -> StageResult<FrameRGBA> {
        let mut data = Vec::with_capacity(self.color.len() * 4);
        for c in &self.color {
            data.extend(c.map(to_u8));
        }
        Ok(FrameRGBA {
            width: self.width,
            height: self.height,
            data,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
