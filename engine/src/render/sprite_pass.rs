//! Billboard Sprite Pass
//!
//! Draws every prop as a camera-facing quad. Billboarding happens on
//! the CPU: each frame the prop poses are evaluated, the quads are
//! expanded along the camera's right/up basis, sorted far-to-near, and
//! streamed into one dynamic vertex buffer. Draws batch consecutive
//! props of the same sprite kind to limit bind group churn.
//!
//! Sprites alpha-blend and test depth against the terrain without
//! writing it, so overlapping transparent edges never punch holes in
//! each other.

use bytemuck::{Pod, Zeroable};

use crate::assets::SpriteStore;
use crate::camera::ParallaxCamera;
use crate::props::PropKind;
use crate::render::gpu::GpuContext;
use crate::scene::Scene;

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct SpriteVertex {
    position: [f32; 3],
    uv: [f32; 2],
}

const VERTS_PER_QUAD: usize = 6;

struct Batch {
    kind: PropKind,
    range: std::ops::Range<u32>,
}

pub struct SpritePass {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    vertices: Vec<SpriteVertex>,
    batches: Vec<Batch>,
}

impl SpritePass {
    pub fn new(
        gpu: &GpuContext,
        scene_layout: &wgpu::BindGroupLayout,
        sprite_layout: &wgpu::BindGroupLayout,
        color_format: wgpu::TextureFormat,
        max_sprites: usize,
    ) -> Self {
        let shader = gpu
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Sprite Shader"),
                source: wgpu::ShaderSource::Wgsl(
                    include_str!("../../../shaders/sprite.wgsl").into(),
                ),
            });

        let pipeline_layout = gpu
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Sprite Pipeline Layout"),
                bind_group_layouts: &[scene_layout, sprite_layout],
                push_constant_ranges: &[],
            });

        let pipeline = gpu
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Sprite Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<SpriteVertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &[
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
                        ],
                    }],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: color_format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    // Mirrored sprites invert the quad winding.
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: wgpu::TextureFormat::Depth32Float,
                    depth_write_enabled: false,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            });

        let vertex_buffer = gpu.create_dynamic_vertex_buffer(
            "Sprite Vertices",
            (max_sprites * VERTS_PER_QUAD * std::mem::size_of::<SpriteVertex>()) as u64,
        );

        Self {
            pipeline,
            vertex_buffer,
            vertices: Vec::with_capacity(max_sprites * VERTS_PER_QUAD),
            batches: Vec::new(),
        }
    }

    /// Evaluate poses at `t`, rebuild the quad stream far-to-near, and
    /// upload it.
    pub fn build_frame(&mut self, gpu: &GpuContext, scene: &Scene, camera: &ParallaxCamera, t: f32) {
        let (right, up) = camera.billboard_basis();

        let mut poses: Vec<_> = scene
            .props
            .iter()
            .map(|inst| (inst.placement.kind, inst.pose(t)))
            .collect();
        // Far-to-near so alpha blending composites correctly without
        // depth writes.
        poses.sort_by(|a, b| a.1.position.z.total_cmp(&b.1.position.z));

        self.vertices.clear();
        self.batches.clear();

        for (kind, pose) in poses {
            let half_r = right * (pose.scale.x * 0.5);
            let half_u = up * (pose.scale.y * 0.5);
            let c = pose.position;

            let bl = c - half_r - half_u;
            let br = c + half_r - half_u;
            let tl = c - half_r + half_u;
            let tr = c + half_r + half_u;

            let quad = [
                SpriteVertex {
                    position: bl.to_array(),
                    uv: [0.0, 1.0],
                },
                SpriteVertex {
                    position: br.to_array(),
                    uv: [1.0, 1.0],
                },
                SpriteVertex {
                    position: tr.to_array(),
                    uv: [1.0, 0.0],
                },
                SpriteVertex {
                    position: bl.to_array(),
                    uv: [0.0, 1.0],
                },
                SpriteVertex {
                    position: tr.to_array(),
                    uv: [1.0, 0.0],
                },
                SpriteVertex {
                    position: tl.to_array(),
                    uv: [0.0, 0.0],
                },
            ];

            let start = self.vertices.len() as u32;
            self.vertices.extend_from_slice(&quad);
            let end = self.vertices.len() as u32;

            match self.batches.last_mut() {
                Some(batch) if batch.kind == kind => batch.range.end = end,
                _ => self.batches.push(Batch {
                    kind,
                    range: start..end,
                }),
            }
        }

        if !self.vertices.is_empty() {
            gpu.write_buffer(&self.vertex_buffer, &self.vertices);
        }
    }

    pub fn render<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        scene_bind_group: &'a wgpu::BindGroup,
        sprites: &'a SpriteStore,
    ) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, scene_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        for batch in &self.batches {
            render_pass.set_bind_group(1, sprites.bind_group(batch.kind), &[]);
            render_pass.draw(batch.range.clone(), 0..1);
        }
    }
}
