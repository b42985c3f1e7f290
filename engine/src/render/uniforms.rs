//! Shared Scene Uniforms
//!
//! One uniform buffer feeds the sky, terrain, and sprite passes: camera
//! matrices, fog, sky gradient, and the light rig, refreshed once per
//! frame.

use bytemuck::{Pod, Zeroable};
use static_assertions::const_assert_eq;

use crate::camera::ParallaxCamera;
use crate::scene::Scene;

/// GPU uniform layout (must match WGSL struct SceneParams)
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4], // 64 bytes (offset 0)
    pub camera_pos: [f32; 3],     // 12 bytes (offset 64)
    pub time: f32,                // 4 bytes (offset 76)
    pub fog_color: [f32; 3],      // 12 bytes (offset 80)
    pub fog_near: f32,            // 4 bytes (offset 92)
    pub sky_top: [f32; 3],        // 12 bytes (offset 96)
    pub fog_far: f32,             // 4 bytes (offset 108)
    pub sky_bottom: [f32; 3],     // 12 bytes (offset 112)
    pub _pad0: f32,               // 4 bytes (offset 124)
    pub sun_dir: [f32; 3],        // 12 bytes (offset 128)
    pub _pad1: f32,               // 4 bytes (offset 140)
    pub sun_color: [f32; 3],      // 12 bytes (offset 144) - premultiplied by intensity
    pub _pad2: f32,               // 4 bytes (offset 156)
    pub fill_dir: [f32; 3],       // 12 bytes (offset 160)
    pub _pad3: f32,               // 4 bytes (offset 172)
    pub fill_color: [f32; 3],     // 12 bytes (offset 176)
    pub _pad4: f32,               // 4 bytes (offset 188)
    pub hemi_sky: [f32; 3],       // 12 bytes (offset 192)
    pub _pad5: f32,               // 4 bytes (offset 204)
    pub hemi_ground: [f32; 3],    // 12 bytes (offset 208)
    pub hemi_intensity: f32,      // 4 bytes (offset 220) - total 224
}

const_assert_eq!(std::mem::size_of::<SceneUniforms>(), 224);

impl SceneUniforms {
    /// Snapshot the per-frame state the shaders need.
    pub fn capture(scene: &Scene, camera: &ParallaxCamera, aspect: f32, time: f32) -> Self {
        let lights = &scene.lights;
        Self {
            view_proj: camera.view_proj(aspect).to_cols_array_2d(),
            camera_pos: camera.position().to_array(),
            time,
            fog_color: scene.fog.color.to_array(),
            fog_near: scene.fog.near,
            sky_top: scene.sky.top.to_array(),
            fog_far: scene.fog.far,
            sky_bottom: scene.sky.bottom.to_array(),
            _pad0: 0.0,
            sun_dir: lights.sun_position.normalize_or_zero().to_array(),
            _pad1: 0.0,
            sun_color: (lights.sun_color * lights.sun_intensity).to_array(),
            _pad2: 0.0,
            fill_dir: lights.fill_position.normalize_or_zero().to_array(),
            _pad3: 0.0,
            fill_color: (lights.fill_color * lights.fill_intensity).to_array(),
            _pad4: 0.0,
            hemi_sky: lights.hemi_sky.to_array(),
            _pad5: 0.0,
            hemi_ground: lights.hemi_ground.to_array(),
            hemi_intensity: lights.hemi_intensity,
        }
    }
}

/// Bind group layout shared by the scene passes: one uniform buffer at
/// binding 0, visible to both stages.
pub fn scene_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Scene Uniforms Bind Group Layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_premultiplies_light_intensities() {
        let camera = ParallaxCamera::new();
        let scene = Scene::compose(&camera, 1.6);
        let u = SceneUniforms::capture(&scene, &camera, 1.6, 0.0);

        let expected = scene.lights.sun_color * scene.lights.sun_intensity;
        assert_eq!(u.sun_color, expected.to_array());
        assert_eq!(u.fog_near, 10.0);
        assert_eq!(u.fog_far, 55.0);

        let dir = glam::Vec3::from_array(u.sun_dir);
        assert!((dir.length() - 1.0).abs() < 1e-5);
    }
}
