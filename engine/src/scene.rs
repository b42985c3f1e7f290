//! Scene Composition Module
//!
//! Builds the static scene once: sky gradient, light rig, fog, the
//! displaced terrain mesh, and the authored prop instances grounded via
//! the height sampler. After composition only three things ever touch
//! the scene again: aspect reflow on resize, billboard rescale when a
//! sprite image finishes decoding, and the per-frame pose evaluation.

use glam::{Vec2, Vec3};

use crate::camera::ParallaxCamera;
use crate::props::{Anchor, PropInstance, PropKind, Reflow, PLACEMENTS};
use crate::terrain::{rgb, HeightSampler, TerrainMesh, TerrainParams};

/// Vertical sky gradient endpoints.
#[derive(Clone, Copy, Debug)]
pub struct SkyConfig {
    pub top: Vec3,
    pub bottom: Vec3,
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            top: rgb(0x2a8ac4),
            bottom: rgb(0xd6c5e7),
        }
    }
}

/// Linear distance fog, tinted to the sky's horizon color so far props
/// dissolve into the backdrop.
#[derive(Clone, Copy, Debug)]
pub struct FogConfig {
    pub color: Vec3,
    pub near: f32,
    pub far: f32,
}

impl Default for FogConfig {
    fn default() -> Self {
        Self {
            color: rgb(0xd6c5e7),
            near: 10.0,
            far: 55.0,
        }
    }
}

/// Hemisphere ambient plus a warm key light and a cool fill.
#[derive(Clone, Copy, Debug)]
pub struct LightRig {
    pub hemi_sky: Vec3,
    pub hemi_ground: Vec3,
    pub hemi_intensity: f32,
    pub sun_color: Vec3,
    pub sun_intensity: f32,
    /// Position the key light shines from (toward the origin)
    pub sun_position: Vec3,
    pub fill_color: Vec3,
    pub fill_intensity: f32,
    pub fill_position: Vec3,
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            hemi_sky: rgb(0x9ac6ff),
            hemi_ground: rgb(0xd9e6ff),
            hemi_intensity: 0.55,
            sun_color: rgb(0xfff0cf),
            sun_intensity: 1.35,
            sun_position: Vec3::new(10.0, 14.0, 8.0),
            fill_color: rgb(0xa9c9ff),
            fill_intensity: 0.35,
            fill_position: Vec3::new(-8.0, 6.0, -6.0),
        }
    }
}

/// Aspect-driven horizontal squeeze for sky props. Narrow viewports pull
/// clouds and mountains toward the center so both stay framed.
pub fn reflow_factor(aspect: f32) -> f32 {
    let aspect = if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    };
    (aspect / 1.6).clamp(0.45, 1.0)
}

fn reflow_x(reflow: Reflow, base_x: f32, factor: f32) -> f32 {
    match reflow {
        Reflow::Fixed => base_x,
        Reflow::SkyScale => base_x * factor,
        Reflow::MountainLeft => {
            let bias = (1.0 - factor) * 6.0;
            (base_x * factor - bias).clamp(-9.5, -2.0)
        }
        Reflow::MountainRight => (base_x * factor).clamp(2.0, 9.5),
    }
}

/// The composed landing-page scene.
pub struct Scene {
    pub sky: SkyConfig,
    pub fog: FogConfig,
    pub lights: LightRig,
    pub sampler: HeightSampler,
    pub terrain: TerrainMesh,
    pub props: Vec<PropInstance>,
}

impl Scene {
    /// Build the full scene for a camera at its base framing. Terrain
    /// is displaced and colored here; props are grounded via the height
    /// sampler and start with a square billboard until their sprite's
    /// real aspect is known.
    pub fn compose(camera: &ParallaxCamera, aspect: f32) -> Self {
        let sampler = HeightSampler::new(TerrainParams::default(), camera.base_position.z);
        let terrain = TerrainMesh::build(&sampler);

        let props = PLACEMENTS
            .iter()
            .map(|placement| {
                let anchor_y = match placement.anchor {
                    Anchor::Terrain { offset } => {
                        sampler.sample_height(placement.x, placement.z) + offset
                    }
                    Anchor::Sky { y } => y,
                };
                PropInstance {
                    placement: *placement,
                    anchor_y,
                    reflow_x: placement.x,
                    // Square until the image decodes; see update_prop_scales.
                    scale: Vec2::splat(placement.height),
                }
            })
            .collect();

        let mut scene = Self {
            sky: SkyConfig::default(),
            fog: FogConfig::default(),
            lights: LightRig::default(),
            sampler,
            terrain,
            props,
        };
        scene.reflow(aspect);
        scene
    }

    /// Reposition aspect-sensitive props. Called on every resize, not
    /// only at build time.
    pub fn reflow(&mut self, aspect: f32) {
        let factor = reflow_factor(aspect);
        for inst in &mut self.props {
            inst.reflow_x = reflow_x(inst.placement.reflow, inst.placement.x, factor);
        }
    }

    /// Refresh billboard sizes from the sprites' natural aspect ratios.
    /// Sprites still decoding report `None` and keep their square
    /// placeholder; called once per tick until every kind has resolved.
    pub fn update_prop_scales<F>(&mut self, aspect_of: F)
    where
        F: Fn(PropKind) -> Option<f32>,
    {
        for inst in &mut self.props {
            if let Some(aspect) = aspect_of(inst.placement.kind) {
                let h = inst.placement.height;
                inst.scale = Vec2::new(h * aspect, h);
            }
        }
    }
}
