//! Render Module
//!
//! wgpu-based rendering for the landing-page scene. Every frame renders
//! sky, terrain, and billboard sprites into an offscreen target, then
//! pushes that target through the warp post pass onto the surface.

pub mod gpu;
pub mod post;
pub mod sky_pass;
pub mod sprite_pass;
pub mod targets;
pub mod terrain_pass;
pub mod uniforms;

// Re-export commonly used types for convenience
pub use gpu::{capped_surface_size, GpuContext, GpuContextConfig, MAX_PIXEL_RATIO};
pub use post::{WarpConfig, WarpPostPass};
pub use uniforms::SceneUniforms;

use crate::assets::SpriteStore;
use crate::camera::ParallaxCamera;
use crate::props::PLACEMENTS;
use crate::scene::Scene;
use sky_pass::SkyPass;
use sprite_pass::SpritePass;
use targets::OffscreenTargets;
use terrain_pass::TerrainPass;

/// Frame orchestrator: owns the passes, the offscreen targets, and the
/// shared uniform buffer.
pub struct Renderer {
    targets: OffscreenTargets,
    uniform_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    sky: SkyPass,
    terrain: TerrainPass,
    sprites: SpritePass,
    post: WarpPostPass,
}

impl Renderer {
    pub fn new(gpu: &GpuContext, scene: &Scene, sprite_layout: &wgpu::BindGroupLayout) -> Self {
        let (width, height) = gpu.dimensions();
        let format = gpu.format();
        let targets = OffscreenTargets::new(&gpu.device, width, height, format);

        let scene_layout = uniforms::scene_bind_group_layout(&gpu.device);
        let camera = ParallaxCamera::new();
        let uniform_buffer = gpu.create_uniform_buffer(
            "Scene Uniforms",
            &SceneUniforms::capture(scene, &camera, gpu.aspect(), 0.0),
        );
        let scene_bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Uniforms Bind Group"),
            layout: &scene_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let sky = SkyPass::new(&gpu.device, &scene_layout, format);
        let terrain = TerrainPass::new(gpu, &scene_layout, format, &scene.terrain);
        let sprites = SpritePass::new(gpu, &scene_layout, sprite_layout, format, PLACEMENTS.len());
        let post = WarpPostPass::new(&gpu.device, format);

        Self {
            targets,
            uniform_buffer,
            scene_bind_group,
            sky,
            terrain,
            sprites,
            post,
        }
    }

    /// Rebuild the offscreen targets after a surface resize.
    pub fn resize(&mut self, gpu: &GpuContext) {
        let (width, height) = gpu.dimensions();
        self.targets = OffscreenTargets::new(&gpu.device, width, height, gpu.format());
    }

    pub fn post_config(&self) -> &WarpConfig {
        self.post.config()
    }

    pub fn set_post_config(&mut self, config: WarpConfig) {
        self.post.set_config(config);
    }

    /// Render one frame at elapsed time `t`.
    pub fn render(
        &mut self,
        gpu: &GpuContext,
        scene: &Scene,
        camera: &ParallaxCamera,
        sprite_store: &SpriteStore,
        t: f32,
    ) -> Result<(), wgpu::SurfaceError> {
        let surface_texture = gpu.get_current_texture()?;
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let uniforms = SceneUniforms::capture(scene, camera, gpu.aspect(), t);
        gpu.write_buffer(&self.uniform_buffer, std::slice::from_ref(&uniforms));
        self.sprites.build_frame(gpu, scene, camera, t);
        self.post.update(&gpu.queue);

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.targets.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.sky.render(&mut pass, &self.scene_bind_group);
            self.terrain.render(&mut pass, &self.scene_bind_group);
            self.sprites
                .render(&mut pass, &self.scene_bind_group, sprite_store);
        }

        self.post.render_to_view(
            &gpu.device,
            &mut encoder,
            &self.targets.color_view,
            &surface_view,
        );

        gpu.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }
}
