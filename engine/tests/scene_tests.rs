//! Scene Tests - Terrain Field, Prop Grounding, and Animation
//!
//! End-to-end checks over the composed scene: the displaced terrain,
//! the authored prop set, and the pure-in-time animation poses.

use overlook_engine::camera::ParallaxCamera;
use overlook_engine::noise::fbm;
use overlook_engine::props::{Anchor, Animation, PropKind};
use overlook_engine::scene::{reflow_factor, Scene};
use overlook_engine::terrain::{blend_color, HeightSampler, TerrainParams};

fn scene() -> Scene {
    Scene::compose(&ParallaxCamera::new(), 1.6)
}

// ============================================================================
// Terrain field
// ============================================================================

#[test]
fn test_fbm_bounded_over_terrain_domain() {
    let p = TerrainParams::default();
    for ix in 0..50 {
        for iz in 0..50 {
            let x = -100.0 + ix as f32 * 4.0;
            let z = -23.6 + iz as f32 * 0.6;
            let v = fbm(x * p.noise_scale, z * p.noise_scale, p.octaves);
            assert!((0.0..=1.0).contains(&v));
        }
    }
}

#[test]
fn test_terrain_mesh_spans_expected_extent() {
    let s = scene();
    let p = TerrainParams::default();
    let mut min_z = f32::INFINITY;
    let mut max_z = f32::NEG_INFINITY;
    for v in &s.terrain.vertices {
        min_z = min_z.min(v.position[2]);
        max_z = max_z.max(v.position[2]);
        assert!(v.position[0].abs() <= p.width / 2.0 + 1e-3);
    }
    // The plane ends at the camera's base z and extends `depth` away.
    assert!((max_z - 6.4).abs() < 1e-3);
    assert!((min_z - (6.4 - p.depth)).abs() < 1e-3);
}

#[test]
fn test_color_gradient_follows_observed_extrema() {
    let s = scene();
    let p = TerrainParams::default();
    let low = blend_color(&p, s.terrain.min_height, s.terrain.min_height, s.terrain.max_height);
    let high = blend_color(&p, s.terrain.max_height, s.terrain.min_height, s.terrain.max_height);
    assert!(low.abs_diff_eq(p.color_low, 1e-4));
    assert!(high.abs_diff_eq(p.color_high, 1e-4));
}

#[test]
fn test_height_sampler_is_deterministic() {
    let a = HeightSampler::new(TerrainParams::default(), 6.4);
    let b = HeightSampler::new(TerrainParams::default(), 6.4);
    for i in 0..100 {
        let x = -20.0 + i as f32 * 0.4;
        assert_eq!(a.sample_height(x, -12.0), b.sample_height(x, -12.0));
    }
}

// ============================================================================
// Prop set
// ============================================================================

#[test]
fn test_ground_props_sit_on_sampled_terrain() {
    let s = scene();
    for inst in &s.props {
        if let Anchor::Terrain { offset } = inst.placement.anchor {
            let ground = s.sampler.sample_height(inst.placement.x, inst.placement.z);
            assert!(
                (inst.anchor_y - ground - offset).abs() < 1e-6,
                "{} floats off the ground",
                inst.placement.name
            );
        }
    }
}

#[test]
fn test_animation_profiles_match_prop_families() {
    let s = scene();
    for inst in &s.props {
        match inst.placement.kind {
            PropKind::Grass => {
                assert!(matches!(inst.placement.animation, Animation::Sway { .. }))
            }
            PropKind::Bush | PropKind::BushSmall => {
                assert!(matches!(inst.placement.animation, Animation::Shake { .. }))
            }
            PropKind::Boulder | PropKind::Mountain => {
                assert!(matches!(inst.placement.animation, Animation::Still))
            }
            PropKind::Cloud | PropKind::CloudB | PropKind::CloudC => {
                assert!(matches!(inst.placement.animation, Animation::Drift { .. }))
            }
        }
    }
}

#[test]
fn test_cloud_poses_desynchronized() {
    let s = scene();
    let clouds: Vec<_> = s
        .props
        .iter()
        .filter(|i| matches!(i.placement.anchor, Anchor::Sky { .. }))
        .filter(|i| matches!(i.placement.animation, Animation::Drift { .. }))
        .collect();
    assert_eq!(clouds.len(), 5);

    // At one instant no two clouds share the same drift offset.
    let t = 3.7;
    for a in 0..clouds.len() {
        for b in (a + 1)..clouds.len() {
            let da = clouds[a].pose(t).position - glam::Vec3::new(
                clouds[a].reflow_x,
                clouds[a].anchor_y,
                clouds[a].placement.z,
            );
            let db = clouds[b].pose(t).position - glam::Vec3::new(
                clouds[b].reflow_x,
                clouds[b].anchor_y,
                clouds[b].placement.z,
            );
            assert!((da - db).length() > 1e-4);
        }
    }
}

#[test]
fn test_frames_reproducible_from_elapsed_time() {
    let s1 = scene();
    let s2 = scene();
    for (a, b) in s1.props.iter().zip(&s2.props) {
        assert_eq!(a.pose(12.34), b.pose(12.34));
    }
}

// ============================================================================
// Reflow
// ============================================================================

#[test]
fn test_resize_reflows_and_restores() {
    let mut s = scene();
    let original: Vec<f32> = s.props.iter().map(|i| i.reflow_x).collect();

    s.reflow(0.6);
    let narrow: Vec<f32> = s.props.iter().map(|i| i.reflow_x).collect();
    assert_ne!(original, narrow);

    // Returning to the reference aspect restores every x exactly.
    s.reflow(1.6);
    let restored: Vec<f32> = s.props.iter().map(|i| i.reflow_x).collect();
    assert_eq!(original, restored);
}

#[test]
fn test_reflow_factor_monotone_in_aspect() {
    let mut prev = 0.0;
    for i in 1..40 {
        let f = reflow_factor(i as f32 * 0.1);
        assert!(f >= prev);
        prev = f;
    }
}
