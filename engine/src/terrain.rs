//! Terrain Height-Field Module
//!
//! Builds the displaced, vertex-colored ground mesh from the noise field.
//!
//! The height-field is sampled on a fixed grid (220x90 segments over a
//! 200x30 world-unit plane) and displaced once at scene construction.
//! Coloring is a two-pass algorithm: the displacement pass tracks the
//! global min/max height of the mesh, then a second pass blends each
//! vertex across the low/mid/high gradient using those extrema. A single
//! pass cannot work because the blend depends on the extrema of the whole
//! mesh being colored.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::noise::fbm;

/// Convert a 0xRRGGBB hex value to a linear RGB vector.
pub fn rgb(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}

/// Terrain tuning parameters.
///
/// Single source of truth for the ground look; the defaults match the
/// hand-tuned reference landscape.
#[derive(Clone, Copy, Debug)]
pub struct TerrainParams {
    /// Ground plane width in world units (x axis)
    pub width: f32,
    /// Ground plane depth in world units (z axis)
    pub depth: f32,
    /// Grid segments along x (high enough to avoid visible faceting)
    pub segments_x: u32,
    /// Grid segments along z
    pub segments_z: u32,
    /// Peak displacement amplitude
    pub amplitude: f32,
    /// Spatial frequency of the noise field (lower = bigger hills)
    pub noise_scale: f32,
    /// Flatten factor right at the viewer (1.0 = no near-field clearing)
    pub near_flatten: f32,
    /// fbm octave count
    pub octaves: u32,
    /// Color stop at the lowest observed height
    pub color_low: Vec3,
    /// Color stop at the gradient breakpoint
    pub color_mid: Vec3,
    /// Color stop at the highest observed height
    pub color_high: Vec3,
    /// Normalized height where low->mid hands over to mid->high
    pub color_break: f32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            width: 200.0,
            depth: 30.0,
            segments_x: 220,
            segments_z: 90,
            amplitude: 2.2,
            noise_scale: 0.06,
            near_flatten: 0.15,
            octaves: 5,
            color_low: rgb(0x1f7f52),
            color_mid: rgb(0x2aa865),
            color_high: rgb(0x6fcf7f),
            color_break: 0.55,
        }
    }
}

/// Maps world (x, z) to a displacement height.
///
/// The raw fbm value is recentered to a signed displacement and scaled by
/// an ease factor that grows from `near_flatten` at the viewer's z toward
/// 1.0 with distance, producing a readable clearing in the near field
/// while far terrain stays varied.
#[derive(Clone, Copy, Debug)]
pub struct HeightSampler {
    pub params: TerrainParams,
    /// z coordinate of the viewer's starting position
    pub reference_z: f32,
}

impl HeightSampler {
    pub fn new(params: TerrainParams, reference_z: f32) -> Self {
        Self { params, reference_z }
    }

    /// Displacement height at a world (x, z) coordinate.
    pub fn sample_height(&self, world_x: f32, world_z: f32) -> f32 {
        let p = &self.params;
        let n = fbm(world_x * p.noise_scale, world_z * p.noise_scale, p.octaves);
        let h = (n - 0.5) * 2.0 * p.amplitude;
        let dist = (world_z - self.reference_z).abs();
        let t = (dist / (p.depth * 0.8)).clamp(0.0, 1.0);
        let ease = p.near_flatten + (1.0 - p.near_flatten) * t;
        h * ease
    }
}

/// Blend a displaced height into the three-stop terrain gradient given the
/// observed extrema of the mesh.
pub fn blend_color(params: &TerrainParams, height: f32, min_h: f32, max_h: f32) -> Vec3 {
    let t = ((height - min_h) / (max_h - min_h + 1e-6)).clamp(0.0, 1.0);
    if t < params.color_break {
        params
            .color_low
            .lerp(params.color_mid, t / params.color_break)
    } else {
        params
            .color_mid
            .lerp(params.color_high, (t - params.color_break) / (1.0 - params.color_break))
    }
}

/// Vertex layout shared with the terrain render pipeline.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

/// Immutable displaced grid mesh. Built once at scene construction;
/// never mutated afterwards.
pub struct TerrainMesh {
    pub vertices: Vec<TerrainVertex>,
    pub indices: Vec<u32>,
    pub min_height: f32,
    pub max_height: f32,
}

impl TerrainMesh {
    /// Build the terrain grid centered on x = 0, spanning `depth` world
    /// units ending at the sampler's reference z.
    pub fn build(sampler: &HeightSampler) -> Self {
        let p = sampler.params;
        let nx = p.segments_x as usize + 1;
        let nz = p.segments_z as usize + 1;
        let count = nx * nz;

        // Near edge of the plane sits at the viewer; it extends away in -z.
        let z_far = sampler.reference_z - p.depth;

        // Pass 1: displace into a scratch height arena, tracking extrema.
        let mut heights = vec![0.0f32; count];
        let mut min_h = f32::INFINITY;
        let mut max_h = f32::NEG_INFINITY;
        for iz in 0..nz {
            for ix in 0..nx {
                let x = -p.width / 2.0 + p.width * ix as f32 / p.segments_x as f32;
                let z = z_far + p.depth * iz as f32 / p.segments_z as f32;
                let h = sampler.sample_height(x, z);
                heights[iz * nx + ix] = h;
                min_h = min_h.min(h);
                max_h = max_h.max(h);
            }
        }

        // Pass 2: positions + colors from the global extrema.
        let mut vertices = Vec::with_capacity(count);
        for iz in 0..nz {
            for ix in 0..nx {
                let x = -p.width / 2.0 + p.width * ix as f32 / p.segments_x as f32;
                let z = z_far + p.depth * iz as f32 / p.segments_z as f32;
                let h = heights[iz * nx + ix];
                let c = blend_color(&p, h, min_h, max_h);
                vertices.push(TerrainVertex {
                    position: [x, h, z],
                    normal: [0.0, 1.0, 0.0],
                    color: [c.x, c.y, c.z, 1.0],
                });
            }
        }

        let mut indices = Vec::with_capacity(p.segments_x as usize * p.segments_z as usize * 6);
        for iz in 0..p.segments_z as usize {
            for ix in 0..p.segments_x as usize {
                let a = (iz * nx + ix) as u32;
                let b = a + 1;
                let c = a + nx as u32;
                let d = c + 1;
                // Winding chosen so faces look up (+y), CCW from above.
                indices.extend_from_slice(&[a, c, b, b, c, d]);
            }
        }

        let mut mesh = Self {
            vertices,
            indices,
            min_height: min_h,
            max_height: max_h,
        };
        mesh.recompute_normals();
        mesh
    }

    /// One-time smooth normal recomputation after displacement.
    fn recompute_normals(&mut self) {
        let mut accum = vec![Vec3::ZERO; self.vertices.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let pa = Vec3::from(self.vertices[a].position);
            let pb = Vec3::from(self.vertices[b].position);
            let pc = Vec3::from(self.vertices[c].position);
            let face = (pb - pa).cross(pc - pa);
            accum[a] += face;
            accum[b] += face;
            accum[c] += face;
        }
        for (v, n) in self.vertices.iter_mut().zip(accum) {
            v.normal = n.normalize_or_zero().into();
        }
    }
}
