use std::collections::HashMap;

use crate::{
    foundation::error::{StageError, StageResult},
    render::{
        backend::{FrameRGBA, FrameSource, MASK_REF, MaskPass, PassBackend, PlatePass},
        scene::Mesh,
        uniforms::{MaskUniforms, TextureId},
    },
};

const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
const DEPTH_STENCIL_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24PlusStencil8;
/// Interleaved position (xyz) + uv.
const VERTEX_STRIDE: u64 = 5 * 4;

const MASK_SHADER: &str = r#"
struct MaskU {
  view_proj: mat4x4<f32>,
  model: mat4x4<f32>,
};

struct VsOut {
  @builtin(position) pos: vec4<f32>,
  @location(0) uv: vec2<f32>,
};

@group(0) @binding(0) var<uniform> mask_u: MaskU;

@vertex
fn vs_mask(@location(0) p: vec3<f32>, @location(1) uv: vec2<f32>) -> VsOut {
  var o: VsOut;
  o.pos = mask_u.view_proj * mask_u.model * vec4<f32>(p, 1.0);
  o.uv = uv;
  return o;
}

@fragment
fn fs_mask(in: VsOut) -> @location(0) vec4<f32> {
  return vec4<f32>(0.0);
}
"#;

const PLATE_SHADER: &str = r#"
struct PlateU {
  view_proj: mat4x4<f32>,
  model: mat4x4<f32>,
  color_a: vec4<f32>,
  color_b: vec4<f32>,
  uv_a: vec4<f32>,
  uv_b: vec4<f32>,
  params: vec4<f32>,
  flags: vec4<f32>,
};

struct VsOut {
  @builtin(position) pos: vec4<f32>,
  @location(0) uv: vec2<f32>,
};

@group(0) @binding(0) var<uniform> u: PlateU;
@group(0) @binding(1) var tex_a: texture_2d<f32>;
@group(0) @binding(2) var tex_b: texture_2d<f32>;
@group(0) @binding(3) var samp: sampler;

fn hash21(x: f32, y: f32) -> f32 {
  let v = sin(x * 12.9898 + y * 78.233) * 43758.547;
  return v - floor(v);
}

fn dissolve(p: f32, n: f32) -> f32 {
  return clamp(p * 1.2 - n * 0.2, 0.0, 1.0);
}

@vertex
fn vs_plate(@location(0) p: vec3<f32>, @location(1) uv: vec2<f32>) -> VsOut {
  var o: VsOut;
  o.pos = u.view_proj * u.model * vec4<f32>(p, 1.0);
  o.uv = uv;
  return o;
}

@fragment
fn fs_plate(in: VsOut) -> @location(0) vec4<f32> {
  let uv_a = in.uv * u.uv_a.xy + u.uv_a.zw;
  let uv_b = in.uv * u.uv_b.xy + u.uv_b.zw;
  let ta = textureSample(tex_a, samp, vec2<f32>(uv_a.x, 1.0 - uv_a.y)).rgb;
  let tb = textureSample(tex_b, samp, vec2<f32>(uv_b.x, 1.0 - uv_b.y)).rgb;
  if (u.params.w < 0.5) {
    return vec4<f32>(0.0, 0.0, 0.0, 1.0);
  }
  let a = select(u.color_a.rgb, ta, u.flags.x > 0.5);
  let b = select(u.color_b.rgb, tb, u.flags.y > 0.5);
  let cell = floor(in.uv * 64.0);
  let n = hash21(cell.x + u.params.z, cell.y - u.params.z);
  let mixed = mix(a, b, dissolve(u.params.x, n));
  let c = mix(mixed, vec3<f32>(0.0), dissolve(u.params.y, n));
  return vec4<f32>(c, 1.0);
}
"#;

struct Target {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

struct Pipelines {
    mask: wgpu::RenderPipeline,
    mask_layout: wgpu::BindGroupLayout,
    plate: wgpu::RenderPipeline,
    plate_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    /// Bound for plate sides without a decoded frame.
    blank: Target,
}

struct UploadedFrame {
    size: (u32, u32),
    target: Target,
}

/// wgpu backend: offscreen RGBA8 color plus a Depth24PlusStencil8 attachment.
///
/// Every pass is recorded into one encoder that is submitted on [`PassBackend::reset`].
pub struct GpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipelines: Pipelines,

    width: u32,
    height: u32,
    color: Option<Target>,
    depth_stencil: Option<Target>,
    readback: Option<wgpu::Buffer>,
    readback_bytes_per_row: u32,

    frames: HashMap<TextureId, UploadedFrame>,
    encoder: Option<wgpu::CommandEncoder>,
}

impl GpuBackend {
    pub fn new() -> StageResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .map_err(|e| match e {
            wgpu::RequestAdapterError::NotFound { .. } => {
                StageError::render("no gpu adapter available")
            }
            other => StageError::render(format!("wgpu request_adapter failed: {other:?}")),
        })?;

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("prism_stage_device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            experimental_features: wgpu::ExperimentalFeatures::default(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        }))
        .map_err(|e| StageError::render(format!("wgpu request_device failed: {e:?}")))?;

        let pipelines = build_pipelines(&device, &queue);
        Ok(Self {
            device,
            queue,
            pipelines,
            width: 0,
            height: 0,
            color: None,
            depth_stencil: None,
            readback: None,
            readback_bytes_per_row: 0,
            frames: HashMap::new(),
            encoder: None,
        })
    }

    fn ensure_targets(&mut self, width: u32, height: u32) -> StageResult<()> {
        if self.color.is_some() && self.width == width && self.height == height {
            return Ok(());
        }
        let bytes_per_row_unpadded = width
            .checked_mul(4)
            .ok_or_else(|| StageError::render("render target width overflow"))?;
        let bytes_per_row = align_to(bytes_per_row_unpadded, wgpu::COPY_BYTES_PER_ROW_ALIGNMENT);
        let buffer_size = u64::from(bytes_per_row)
            .checked_mul(u64::from(height))
            .ok_or_else(|| StageError::render("readback buffer size overflow"))?;

        self.color = Some(create_target(
            &self.device,
            "prism_stage_color",
            (width, height),
            COLOR_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        ));
        self.depth_stencil = Some(create_target(
            &self.device,
            "prism_stage_depth_stencil",
            (width, height),
            DEPTH_STENCIL_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        ));
        self.readback = Some(self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("prism_stage_readback"),
            size: buffer_size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.readback_bytes_per_row = bytes_per_row;
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn targets(&self) -> StageResult<(&Target, &Target)> {
        match (&self.color, &self.depth_stencil) {
            (Some(c), Some(d)) => Ok((c, d)),
            _ => Err(StageError::render("gpu frame not started")),
        }
    }

    fn upload_frame(&mut self, id: TextureId, img: &image::RgbaImage) {
        let size = img.dimensions();
        let stale = self.frames.get(&id).is_none_or(|f| f.size != size);
        if stale {
            let target = create_target(
                &self.device,
                "prism_stage_media_frame",
                size,
                COLOR_FORMAT,
                wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            );
            self.frames.insert(id, UploadedFrame { size, target });
        }
        if let Some(f) = self.frames.get(&id) {
            write_rgba(&self.queue, &f.target.texture, size, img.as_raw());
        }
    }

    fn side_view(&self, id: Option<TextureId>, decoded: bool) -> &wgpu::TextureView {
        id.filter(|_| decoded)
            .and_then(|id| self.frames.get(&id))
            .map_or(&self.pipelines.blank.view, |f| &f.target.view)
    }
}

impl PassBackend for GpuBackend {
    fn begin_frame(&mut self, width: u32, height: u32) -> StageResult<()> {
        if width == 0 || height == 0 {
            return Err(StageError::render(format!(
                "draw buffer must be non-empty, got {width}x{height}"
            )));
        }
        self.ensure_targets(width, height)?;
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("prism_stage_frame_encoder"),
            });
        {
            let (color, ds) = self.targets()?;
            let _clear = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("prism_stage_clear"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &color.view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &ds.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(0),
                        store: wgpu::StoreOp::Store,
                    }),
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        }
        self.encoder = Some(encoder);
        Ok(())
    }

    fn draw_mask(&mut self, pass: &MaskPass<'_>) -> StageResult<()> {
        let mut encoder = self
            .encoder
            .take()
            .ok_or_else(|| StageError::render("gpu frame not started"))?;
        let (vertices, indices, index_count) = mesh_buffers(&self.device, pass.mesh);
        let bind_groups: Vec<wgpu::BindGroup> = pass
            .models
            .iter()
            .map(|&model| {
                let u = MaskUniforms {
                    view_proj: pass.view_proj.to_cols_array_2d(),
                    model: model.to_cols_array_2d(),
                };
                let buf = init_buffer(
                    &self.device,
                    "prism_stage_mask_uniforms",
                    bytemuck::bytes_of(&u),
                    wgpu::BufferUsages::UNIFORM,
                );
                self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("prism_stage_mask_bg"),
                    layout: &self.pipelines.mask_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buf.as_entire_binding(),
                    }],
                })
            })
            .collect();
        {
            let (color, ds) = self.targets()?;
            let mut rp = begin_load_pass(&mut encoder, "prism_stage_mask_pass", color, ds);
            rp.set_pipeline(&self.pipelines.mask);
            rp.set_stencil_reference(u32::from(MASK_REF));
            rp.set_vertex_buffer(0, vertices.slice(..));
            rp.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
            for bg in &bind_groups {
                rp.set_bind_group(0, bg, &[]);
                rp.draw_indexed(0..index_count, 0, 0..1);
            }
        }
        self.encoder = Some(encoder);
        Ok(())
    }

    fn draw_plate(&mut self, pass: &PlatePass<'_>, frames: &dyn FrameSource) -> StageResult<()> {
        let m = pass.material;
        let mut decoded = [false; 2];
        for (slot, side) in [&m.a, &m.b].into_iter().enumerate() {
            if let Some(id) = side.texture {
                if let Some(img) = frames.frame(id) {
                    self.upload_frame(id, img);
                    decoded[slot] = true;
                }
            }
        }

        let mut encoder = self
            .encoder
            .take()
            .ok_or_else(|| StageError::render("gpu frame not started"))?;
        let u = m.to_uniforms(pass.view_proj, pass.model, decoded[0], decoded[1]);
        let ubuf = init_buffer(
            &self.device,
            "prism_stage_plate_uniforms",
            bytemuck::bytes_of(&u),
            wgpu::BufferUsages::UNIFORM,
        );
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("prism_stage_plate_bg"),
            layout: &self.pipelines.plate_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: ubuf.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(
                        self.side_view(m.a.texture, decoded[0]),
                    ),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(
                        self.side_view(m.b.texture, decoded[1]),
                    ),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&self.pipelines.sampler),
                },
            ],
        });
        let (vertices, indices, index_count) = mesh_buffers(&self.device, pass.mesh);
        {
            let (color, ds) = self.targets()?;
            let mut rp = begin_load_pass(&mut encoder, "prism_stage_plate_pass", color, ds);
            rp.set_pipeline(&self.pipelines.plate);
            rp.set_stencil_reference(u32::from(MASK_REF));
            rp.set_bind_group(0, &bind_group, &[]);
            rp.set_vertex_buffer(0, vertices.slice(..));
            rp.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
            rp.draw_indexed(0..index_count, 0, 0..1);
        }
        self.encoder = Some(encoder);
        Ok(())
    }

    fn reset(&mut self) -> StageResult<()> {
        // Stencil state lives in the pipelines; submitting closes the frame's passes.
        if let Some(encoder) = self.encoder.take() {
            self.queue.submit(Some(encoder.finish()));
        }
        Ok(())
    }

    fn readback(&mut self) -> StageResult<FrameRGBA> {
        let (color, _) = self.targets()?;
        let readback = self
            .readback
            .as_ref()
            .ok_or_else(|| StageError::render("gpu backend not initialized"))?;

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("prism_stage_readback_encoder"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &color.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: readback,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(self.readback_bytes_per_row),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(Some(encoder.finish()));

        let buffer_slice = readback.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |res| {
            let _ = tx.send(res);
        });
        self.device
            .poll(wgpu::PollType::wait_indefinitely())
            .map_err(|e| StageError::render(format!("wgpu poll failed: {e:?}")))?;
        rx.recv()
            .map_err(|_| StageError::render("readback channel closed"))?
            .map_err(|e| StageError::render(format!("readback map failed: {e:?}")))?;

        let mapped = buffer_slice.get_mapped_range();
        let row_bytes = (self.width as usize) * 4;
        let padded_row_bytes = self.readback_bytes_per_row as usize;
        let mut out = Vec::with_capacity(row_bytes * self.height as usize);
        for row in 0..self.height as usize {
            let start = row * padded_row_bytes;
            out.extend_from_slice(&mapped[start..start + row_bytes]);
        }
        drop(mapped);
        readback.unmap();

        Ok(FrameRGBA {
            width: self.width,
            height: self.height,
            data: out,
        })
    }
}

fn begin_load_pass<'e>(
    encoder: &'e mut wgpu::CommandEncoder,
    label: &'static str,
    color: &Target,
    ds: &Target,
) -> wgpu::RenderPass<'e> {
    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: &color.view,
            resolve_target: None,
            depth_slice: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Load,
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
            view: &ds.view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Load,
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Load,
                store: wgpu::StoreOp::Store,
            }),
        }),
        timestamp_writes: None,
        occlusion_query_set: None,
    })
}

fn create_target(
    device: &wgpu::Device,
    label: &'static str,
    (width, height): (u32, u32),
    format: wgpu::TextureFormat,
    usage: wgpu::TextureUsages,
) -> Target {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    Target { texture, view }
}

fn write_rgba(queue: &wgpu::Queue, texture: &wgpu::Texture, (width, height): (u32, u32), data: &[u8]) {
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        data,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(width * 4),
            rows_per_image: Some(height),
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
}

fn init_buffer(
    device: &wgpu::Device,
    label: &'static str,
    bytes: &[u8],
    usage: wgpu::BufferUsages,
) -> wgpu::Buffer {
    let size = u64::from(align_to(bytes.len() as u32, wgpu::COPY_BUFFER_ALIGNMENT as u32));
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage,
        mapped_at_creation: true,
    });
    buffer.slice(..).get_mapped_range_mut()[..bytes.len()].copy_from_slice(bytes);
    buffer.unmap();
    buffer
}

fn mesh_buffers(device: &wgpu::Device, mesh: &Mesh) -> (wgpu::Buffer, wgpu::Buffer, u32) {
    let mut interleaved: Vec<f32> = Vec::with_capacity(mesh.positions.len() * 5);
    for (i, p) in mesh.positions.iter().enumerate() {
        let uv = mesh.uvs.get(i).copied().unwrap_or_default();
        interleaved.extend_from_slice(&[p.x, p.y, p.z, uv.x, uv.y]);
    }
    let vertices = init_buffer(
        device,
        "prism_stage_vertices",
        bytemuck::cast_slice(&interleaved),
        wgpu::BufferUsages::VERTEX,
    );
    let indices = init_buffer(
        device,
        "prism_stage_indices",
        bytemuck::cast_slice(&mesh.indices),
        wgpu::BufferUsages::INDEX,
    );
    (vertices, indices, mesh.indices.len() as u32)
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            multisampled: false,
            view_dimension: wgpu::TextureViewDimension::D2,
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
        },
        count: None,
    }
}

fn stencil_face(compare: wgpu::CompareFunction, pass_op: wgpu::StencilOperation) -> wgpu::StencilFaceState {
    wgpu::StencilFaceState {
        compare,
        fail_op: wgpu::StencilOperation::Keep,
        depth_fail_op: wgpu::StencilOperation::Keep,
        pass_op,
    }
}

fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] = [
        wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x3,
            offset: 0,
            shader_location: 0,
        },
        wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x2,
            offset: 12,
            shader_location: 1,
        },
    ];
    wgpu::VertexBufferLayout {
        array_stride: VERTEX_STRIDE,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRIBUTES,
    }
}

fn build_pipelines(device: &wgpu::Device, queue: &wgpu::Queue) -> Pipelines {
    let mask_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("prism_stage_mask_shader"),
        source: wgpu::ShaderSource::Wgsl(MASK_SHADER.into()),
    });
    let plate_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("prism_stage_plate_shader"),
        source: wgpu::ShaderSource::Wgsl(PLATE_SHADER.into()),
    });

    let mask_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("prism_stage_mask_bgl"),
        entries: &[uniform_entry(0, wgpu::ShaderStages::VERTEX)],
    });
    let plate_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("prism_stage_plate_bgl"),
        entries: &[
            uniform_entry(0, wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT),
            texture_entry(1),
            texture_entry(2),
            wgpu::BindGroupLayoutEntry {
                binding: 3,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    });

    // Stencil only.
    let mask = create_pipeline(
        device,
        "prism_stage_mask_pipeline",
        &mask_layout,
        &mask_module,
        ("vs_mask", "fs_mask"),
        wgpu::ColorWrites::empty(),
        wgpu::DepthStencilState {
            format: DEPTH_STENCIL_FORMAT,
            depth_write_enabled: false,
            depth_compare: wgpu::CompareFunction::Always,
            stencil: wgpu::StencilState {
                front: stencil_face(wgpu::CompareFunction::Always, wgpu::StencilOperation::Replace),
                back: stencil_face(wgpu::CompareFunction::Always, wgpu::StencilOperation::Replace),
                read_mask: 0xff,
                write_mask: 0xff,
            },
            bias: wgpu::DepthBiasState::default(),
        },
    );
    // Plate where stencil == MASK_REF.
    let plate = create_pipeline(
        device,
        "prism_stage_plate_pipeline",
        &plate_layout,
        &plate_module,
        ("vs_plate", "fs_plate"),
        wgpu::ColorWrites::ALL,
        wgpu::DepthStencilState {
            format: DEPTH_STENCIL_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState {
                front: stencil_face(wgpu::CompareFunction::Equal, wgpu::StencilOperation::Keep),
                back: stencil_face(wgpu::CompareFunction::Equal, wgpu::StencilOperation::Keep),
                read_mask: 0xff,
                write_mask: 0x00,
            },
            bias: wgpu::DepthBiasState::default(),
        },
    );

    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("prism_stage_plate_sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    });

    let blank = create_target(
        device,
        "prism_stage_blank_frame",
        (1, 1),
        COLOR_FORMAT,
        wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
    );
    write_rgba(queue, &blank.texture, (1, 1), &[0, 0, 0, 255]);

    Pipelines {
        mask,
        mask_layout,
        plate,
        plate_layout,
        sampler,
        blank,
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    label: &'static str,
    bind_group_layout: &wgpu::BindGroupLayout,
    module: &wgpu::ShaderModule,
    (vs, fs): (&'static str, &'static str),
    write_mask: wgpu::ColorWrites,
    depth_stencil: wgpu::DepthStencilState,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module,
            entry_point: Some(vs),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            buffers: &[vertex_layout()],
        },
        fragment: Some(wgpu::FragmentState {
            module,
            entry_point: Some(fs),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: COLOR_FORMAT,
                blend: None,
                write_mask,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(depth_stencil),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

fn align_to(value: u32, alignment: u32) -> u32 {
    let mask = alignment - 1;
    (value + mask) & !mask
}
