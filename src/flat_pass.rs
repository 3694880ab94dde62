//! wgpu rendering for flat-colored primitives.
//!
//! [`FlatPass`] is the GPU implementation of [`RenderSurface`]. Draws submitted during a
//! frame are staged on the CPU, then [`FlatPass::present`] uploads them and records one
//! render pass into the next surface texture.
//!
//! # Architecture
//!
//! The pass uses two bind groups:
//! - **Group 0**: global uniforms (`u_GlobalRotateMatrix`, `u_GlobalTranslateMatrix`)
//! - **Group 1**: per-draw uniforms (`u_ModelMatrix`, `u_FragColor`) in a single buffer
//!   addressed with dynamic offsets, one aligned slot per draw
//!
//! Fans and indexed geometry are flattened into one shared triangle-list vertex buffer,
//! since wgpu has no fan topology. Faces are drawn from both sides.
//!
//! # Depth Buffer
//!
//! The pass owns a `Depth32Float` buffer. Call [`FlatPass::ensure_depth_size`] after the
//! surface is resized; [`FlatPass::present`] also checks it.

use glam::Mat4;

use crate::error::{FigurineError, Result};
use crate::gpu::GpuContext;
use crate::matrix::Matrix4;
use crate::surface::{Binding, DrawCall, ProgramBindings, RenderSurface};

/// The built-in shader.
pub const FLAT_SHADER: &str = include_str!("shaders/flat.wgsl");

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Vertex buffer capacity allocated up front, in vertices.
const INITIAL_VERTICES: usize = 4096;
/// Per-draw uniform slots allocated up front.
const INITIAL_DRAWS: usize = 256;

/// Global uniforms, written once per frame.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct GlobalUniforms {
    pub rotate: [[f32; 4]; 4],
    pub translate: [[f32; 4]; 4],
}

impl Default for GlobalUniforms {
    fn default() -> Self {
        Self {
            rotate: Mat4::IDENTITY.to_cols_array_2d(),
            translate: Mat4::IDENTITY.to_cols_array_2d(),
        }
    }
}

/// Per-draw uniforms, one dynamic-offset slot each.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct DrawUniforms {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

/// A staged draw: a range of the frame's vertices and its uniform slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct StagedDraw {
    first_vertex: u32,
    vertex_count: u32,
    slot: u32,
}

/// Rounds `value` up to a multiple of `alignment`.
pub(crate) fn align_to(value: u64, alignment: u64) -> u64 {
    let alignment = alignment.max(1);
    value.div_ceil(alignment) * alignment
}

/// Lays uniforms out `stride` bytes apart, zero-padding each slot.
fn pack_uniforms(uniforms: &[DrawUniforms], stride: usize) -> Vec<u8> {
    let size = std::mem::size_of::<DrawUniforms>();
    let mut bytes = vec![0u8; uniforms.len() * stride];
    for (i, u) in uniforms.iter().enumerate() {
        let at = i * stride;
        bytes[at..at + size].copy_from_slice(bytemuck::bytes_of(u));
    }
    bytes
}

/// Grows a capacity to fit `needed`, doubling.
fn grown_capacity(current: usize, needed: usize) -> usize {
    if needed <= current {
        current
    } else {
        needed.next_power_of_two().max(current * 2)
    }
}

/// Renders flat-colored triangles with depth testing.
///
/// Implements [`RenderSurface`]; a frame is `clear`, global uniforms, any number of
/// draws, then [`present`](Self::present).
pub struct FlatPass {
    pipeline: wgpu::RenderPipeline,
    bindings: ProgramBindings,

    globals: GlobalUniforms,
    global_buffer: wgpu::Buffer,
    global_bind_group: wgpu::BindGroup,

    draw_layout: wgpu::BindGroupLayout,
    draw_buffer: wgpu::Buffer,
    draw_bind_group: wgpu::BindGroup,
    draw_capacity: usize,
    draw_stride: u64,

    vertex_buffer: wgpu::Buffer,
    vertex_capacity: usize,

    #[allow(dead_code)]
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
    depth_size: (u32, u32),

    clear_color: wgpu::Color,
    vertices: Vec<[f32; 3]>,
    uniforms: Vec<DrawUniforms>,
    draws: Vec<StagedDraw>,
}

impl FlatPass {
    /// Creates the pass with the built-in shader.
    pub fn new(gpu: &GpuContext) -> Result<Self> {
        Self::with_shader(gpu, FLAT_SHADER)
    }

    /// Creates the pass with a custom WGSL program.
    ///
    /// The program must expose `vs` and `fs` entry points and use the same bind group
    /// layout as the built-in shader. Names it does not declare are reported by
    /// [`ProgramBindings::resolve`] and their uniform writes are dropped.
    pub fn with_shader(gpu: &GpuContext, source: &str) -> Result<Self> {
        let device = &gpu.device;
        let bindings = ProgramBindings::resolve(source);

        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Flat Shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        // Global uniforms (group 0)
        let global_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Global Uniforms"),
            size: std::mem::size_of::<GlobalUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let global_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Global Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let global_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Global Bind Group"),
            layout: &global_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: global_buffer.as_entire_binding(),
            }],
        });

        // Per-draw uniforms (group 1)
        let draw_stride = align_to(
            std::mem::size_of::<DrawUniforms>() as u64,
            u64::from(device.limits().min_uniform_buffer_offset_alignment),
        );

        let draw_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Draw Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<DrawUniforms>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let (draw_buffer, draw_bind_group) =
            Self::create_draw_buffer(gpu, &draw_layout, draw_stride, INITIAL_DRAWS);
        let vertex_buffer = Self::create_vertex_buffer(gpu, INITIAL_VERTICES);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Flat Pipeline Layout"),
            bind_group_layouts: &[&global_layout, &draw_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Flat Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 3]>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x3],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(FigurineError::Initialization(format!(
                "flat pipeline rejected: {err}"
            )));
        }

        let (depth_texture, depth_view) = Self::create_depth_texture(gpu);

        Ok(Self {
            pipeline,
            bindings,
            globals: GlobalUniforms::default(),
            global_buffer,
            global_bind_group,
            draw_layout,
            draw_buffer,
            draw_bind_group,
            draw_capacity: INITIAL_DRAWS,
            draw_stride,
            vertex_buffer,
            vertex_capacity: INITIAL_VERTICES,
            depth_texture,
            depth_view,
            depth_size: (gpu.width(), gpu.height()),
            clear_color: wgpu::Color::BLACK,
            vertices: Vec::new(),
            uniforms: Vec::new(),
            draws: Vec::new(),
        })
    }

    /// Sets the color `clear` fills with, components in 0–1.
    pub fn set_clear_color(&mut self, rgba: [f32; 4]) {
        self.clear_color = wgpu::Color {
            r: f64::from(rgba[0]),
            g: f64::from(rgba[1]),
            b: f64::from(rgba[2]),
            a: f64::from(rgba[3]),
        };
    }

    pub fn bindings(&self) -> &ProgramBindings {
        &self.bindings
    }

    /// Number of draws staged for the next [`present`](Self::present).
    pub fn staged_draws(&self) -> usize {
        self.draws.len()
    }

    fn create_draw_buffer(
        gpu: &GpuContext,
        layout: &wgpu::BindGroupLayout,
        stride: u64,
        slots: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Draw Uniforms"),
            size: stride * slots as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Draw Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<DrawUniforms>() as u64),
                }),
            }],
        });
        (buffer, bind_group)
    }

    fn create_vertex_buffer(gpu: &GpuContext, vertices: usize) -> wgpu::Buffer {
        gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Flat Vertices"),
            size: (vertices * std::mem::size_of::<[f32; 3]>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn create_depth_texture(gpu: &GpuContext) -> (wgpu::Texture, wgpu::TextureView) {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: gpu.width(),
                height: gpu.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        (texture, view)
    }

    /// Recreates the depth buffer if the surface size changed.
    pub fn ensure_depth_size(&mut self, gpu: &GpuContext) {
        if self.depth_size != (gpu.width(), gpu.height()) {
            let (texture, view) = Self::create_depth_texture(gpu);
            self.depth_texture = texture;
            self.depth_view = view;
            self.depth_size = (gpu.width(), gpu.height());
        }
    }

    /// Grows the GPU buffers to hold everything staged this frame.
    fn reserve(&mut self, gpu: &GpuContext) {
        let vertices = grown_capacity(self.vertex_capacity, self.vertices.len());
        if vertices != self.vertex_capacity {
            log::debug!("growing vertex buffer to {vertices} vertices");
            self.vertex_buffer = Self::create_vertex_buffer(gpu, vertices);
            self.vertex_capacity = vertices;
        }

        let slots = grown_capacity(self.draw_capacity, self.uniforms.len());
        if slots != self.draw_capacity {
            log::debug!("growing draw uniforms to {slots} slots");
            let (buffer, bind_group) =
                Self::create_draw_buffer(gpu, &self.draw_layout, self.draw_stride, slots);
            self.draw_buffer = buffer;
            self.draw_bind_group = bind_group;
            self.draw_capacity = slots;
        }
    }

    /// Uploads the staged frame and renders it into the next surface texture.
    ///
    /// Staged draws are consumed whether or not the frame could be acquired.
    pub fn present(&mut self, gpu: &GpuContext) -> Result<()> {
        self.ensure_depth_size(gpu);
        self.reserve(gpu);

        let frame = gpu.surface.get_current_texture();
        let vertices = std::mem::take(&mut self.vertices);
        let uniforms = std::mem::take(&mut self.uniforms);
        let draws = std::mem::take(&mut self.draws);
        let output = frame?;

        gpu.queue.write_buffer(
            &self.global_buffer,
            0,
            bytemuck::cast_slice(&[self.globals]),
        );
        if !vertices.is_empty() {
            gpu.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
            gpu.queue.write_buffer(
                &self.draw_buffer,
                0,
                &pack_uniforms(&uniforms, self.draw_stride as usize),
            );
        }

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Flat Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Flat Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if !draws.is_empty() {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_bind_group(0, &self.global_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                for draw in &draws {
                    let offset = (u64::from(draw.slot) * self.draw_stride) as u32;
                    render_pass.set_bind_group(1, &self.draw_bind_group, &[offset]);
                    let first = draw.first_vertex;
                    render_pass.draw(first..first + draw.vertex_count, 0..1);
                }
            }
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

impl RenderSurface for FlatPass {
    fn set_global_rotation(&mut self, matrix: &Matrix4) {
        write_global(
            &self.bindings,
            Binding::GlobalRotateMatrix,
            &mut self.globals.rotate,
            matrix,
        );
    }

    fn set_global_translation(&mut self, matrix: &Matrix4) {
        write_global(
            &self.bindings,
            Binding::GlobalTranslateMatrix,
            &mut self.globals.translate,
            matrix,
        );
    }

    /// Drops anything staged; the render pass itself clears color and depth.
    fn clear(&mut self) {
        self.vertices.clear();
        self.uniforms.clear();
        self.draws.clear();
    }

    fn draw(&mut self, call: DrawCall<'_>) {
        let Some(uniforms) = draw_uniforms(&self.bindings, &call) else {
            return;
        };
        let triangles = call.geometry.to_triangle_list();
        if triangles.is_empty() {
            return;
        }

        self.draws.push(StagedDraw {
            first_vertex: self.vertices.len() as u32,
            vertex_count: triangles.len() as u32,
            slot: self.uniforms.len() as u32,
        });
        self.vertices.extend(triangles);
        self.uniforms.push(uniforms);
    }
}

/// Writes a global matrix into its slot, unless the program never declared it.
fn write_global(
    bindings: &ProgramBindings,
    binding: Binding,
    slot: &mut [[f32; 4]; 4],
    matrix: &Matrix4,
) {
    if bindings.is_bound(binding) {
        *slot = matrix.to_cols_array_2d();
    }
}

/// The uniforms a draw uploads, with undeclared inputs left at identity or zero.
///
/// `None` when the program has no `a_Position`, since nothing could be drawn.
fn draw_uniforms(bindings: &ProgramBindings, call: &DrawCall<'_>) -> Option<DrawUniforms> {
    if !bindings.is_bound(Binding::Position) {
        return None;
    }
    let mut uniforms = DrawUniforms {
        model: Mat4::IDENTITY.to_cols_array_2d(),
        color: [0.0; 4],
    };
    if bindings.is_bound(Binding::ModelMatrix) {
        uniforms.model = call.model.to_cols_array_2d();
    }
    if bindings.is_bound(Binding::FragColor) {
        uniforms.color = call.color;
    }
    Some(uniforms)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = "
        struct Globals { u_GlobalRotateMatrix: mat4x4<f32>, u_GlobalTranslateMatrix: mat4x4<f32> }
        struct Model { u_ModelMatrix: mat4x4<f32>, u_FragColor: vec4<f32> }
        @vertex fn vs(@location(0) a_Position: vec3<f32>) {}
    ";
    const TRIANGLE: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];

    fn scaled_call() -> DrawCall<'static> {
        let mut model = Matrix4::identity();
        model.scale(2.0, 3.0, 4.0);
        DrawCall {
            geometry: crate::surface::Geometry::Triangles(&TRIANGLE),
            model,
            color: [0.2, 0.4, 0.6, 1.0],
        }
    }

    #[test]
    fn fully_bound_program_uploads_everything() {
        let bindings = ProgramBindings::scan(FULL);
        let call = scaled_call();
        let uniforms = draw_uniforms(&bindings, &call).unwrap();
        assert_eq!(uniforms.model, call.model.to_cols_array_2d());
        assert_eq!(uniforms.color, call.color);
    }

    #[test]
    fn missing_color_uploads_zero() {
        let bindings = ProgramBindings::scan(&FULL.replace("u_FragColor", "tint"));
        let call = scaled_call();
        let uniforms = draw_uniforms(&bindings, &call).unwrap();
        assert_eq!(uniforms.color, [0.0; 4]);
        assert_eq!(uniforms.model, call.model.to_cols_array_2d());
    }

    #[test]
    fn missing_model_matrix_uploads_identity() {
        let bindings = ProgramBindings::scan(&FULL.replace("u_ModelMatrix", "model"));
        let uniforms = draw_uniforms(&bindings, &scaled_call()).unwrap();
        assert_eq!(uniforms.model, Mat4::IDENTITY.to_cols_array_2d());
        assert_eq!(uniforms.color, [0.2, 0.4, 0.6, 1.0]);
    }

    #[test]
    fn missing_position_drops_the_draw() {
        let bindings = ProgramBindings::scan(&FULL.replace("a_Position", "pos"));
        assert_eq!(draw_uniforms(&bindings, &scaled_call()), None);
    }

    #[test]
    fn missing_global_keeps_previous_value() {
        let bindings = ProgramBindings::scan(&FULL.replace("u_GlobalRotateMatrix", "spin"));
        let mut globals = GlobalUniforms::default();
        let mut m = Matrix4::identity();
        m.translate(1.0, 2.0, 3.0);

        write_global(&bindings, Binding::GlobalRotateMatrix, &mut globals.rotate, &m);
        write_global(&bindings, Binding::GlobalTranslateMatrix, &mut globals.translate, &m);

        assert_eq!(globals.rotate, Mat4::IDENTITY.to_cols_array_2d());
        assert_eq!(globals.translate, m.to_cols_array_2d());
    }

    #[test]
    fn align_rounds_up_to_multiple() {
        assert_eq!(align_to(80, 256), 256);
        assert_eq!(align_to(256, 256), 256);
        assert_eq!(align_to(257, 256), 512);
        assert_eq!(align_to(80, 16), 80);
        assert_eq!(align_to(7, 0), 7);
    }

    #[test]
    fn uniform_layouts_match_the_shader() {
        assert_eq!(std::mem::size_of::<GlobalUniforms>(), 128);
        assert_eq!(std::mem::size_of::<DrawUniforms>(), 80);
    }

    #[test]
    fn packed_uniforms_sit_at_stride_offsets() {
        let a = DrawUniforms {
            model: Mat4::IDENTITY.to_cols_array_2d(),
            color: [1.0, 0.0, 0.0, 1.0],
        };
        let b = DrawUniforms {
            model: Mat4::from_scale(glam::Vec3::splat(2.0)).to_cols_array_2d(),
            color: [0.0, 0.0, 1.0, 1.0],
        };
        let bytes = pack_uniforms(&[a, b], 256);
        assert_eq!(bytes.len(), 512);

        let second: DrawUniforms = bytemuck::pod_read_unaligned(&bytes[256..256 + 80]);
        assert_eq!(second, b);
        assert!(bytes[80..256].iter().all(|&x| x == 0));
    }

    #[test]
    fn capacity_doubles_only_when_needed() {
        assert_eq!(grown_capacity(256, 100), 256);
        assert_eq!(grown_capacity(256, 257), 512);
        assert_eq!(grown_capacity(256, 1500), 2048);
    }

    #[test]
    fn built_in_shader_declares_every_binding() {
        let bindings = ProgramBindings::scan(FLAT_SHADER);
        assert_eq!(bindings.missing().count(), 0);
    }
}
