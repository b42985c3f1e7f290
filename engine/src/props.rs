//! Prop Placement Module
//!
//! The authored set of billboard props (grass tufts, bushes, boulders,
//! clouds, mountains), their ground/sky anchoring, and their per-frame
//! animation profiles.
//!
//! Placements are a fixed authored table, not procedural scatter: each
//! prop was positioned by eye against the terrain. Animation is pure in
//! elapsed time; [`PropInstance::pose`] holds no mutable state, so any
//! frame can be reproduced from `t` alone.

use glam::{Vec2, Vec3};

/// Billboard sprite family. One GPU texture per kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropKind {
    Grass,
    Bush,
    BushSmall,
    Boulder,
    Cloud,
    CloudB,
    CloudC,
    Mountain,
}

impl PropKind {
    /// Asset path of the sprite sheet for this kind.
    pub fn sprite_path(self) -> &'static str {
        match self {
            PropKind::Grass => "assets/grass1.png",
            PropKind::Bush => "assets/bush1-1.png",
            PropKind::BushSmall => "assets/bush2-1.png",
            PropKind::Boulder => "assets/boulder1.png",
            PropKind::Cloud => "assets/cloud1.png",
            PropKind::CloudB => "assets/cloud2.png",
            PropKind::CloudC => "assets/cloud3.png",
            PropKind::Mountain => "assets/mountain1.png",
        }
    }

    pub const ALL: [PropKind; 8] = [
        PropKind::Grass,
        PropKind::Bush,
        PropKind::BushSmall,
        PropKind::Boulder,
        PropKind::Cloud,
        PropKind::CloudB,
        PropKind::CloudC,
        PropKind::Mountain,
    ];
}

/// Vertical anchoring of a prop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Anchor {
    /// Resting on the terrain: y = sampled height + `offset`.
    Terrain { offset: f32 },
    /// Free-floating at a fixed world y (clouds, backdrop mountains).
    Sky { y: f32 },
}

/// Per-frame animation profile, evaluated purely from elapsed seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Animation {
    Still,
    /// Grass wind sway: slow sine stretch on x, counter-squash on y.
    Sway { phase: f32 },
    /// Bush rustle: fast jitter gated by a slow cubed pulse envelope, so
    /// each bush shakes in bursts with calm stretches between them.
    /// `bias_x`/`bias_y` desynchronize the stretch/squash axes slightly.
    Shake {
        amp: f32,
        phase: f32,
        bias_x: f32,
        bias_y: f32,
    },
    /// Cloud drift: slow positional figure around the anchor point.
    Drift { phase: f32, amp_x: f32, amp_y: f32 },
}

/// How a prop's x coordinate responds to viewport aspect changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reflow {
    /// x never moves.
    Fixed,
    /// Clouds squeeze toward the center on narrow viewports.
    SkyScale,
    /// Left backdrop mountain: scaled and pushed inward, kept on screen.
    MountainLeft,
    /// Right backdrop mountain: scaled, kept on screen.
    MountainRight,
}

/// One authored prop in the scene.
#[derive(Clone, Copy, Debug)]
pub struct PropPlacement {
    pub name: &'static str,
    pub kind: PropKind,
    /// Authored x before any reflow
    pub x: f32,
    pub z: f32,
    /// Target world-space sprite height; width follows the image aspect
    pub height: f32,
    /// Mirror the sprite horizontally
    pub flipped: bool,
    pub anchor: Anchor,
    pub animation: Animation,
    pub reflow: Reflow,
}

/// The authored scene table. Ordering is back-to-front within each
/// ground band; the sprite pass re-sorts by depth anyway.
pub const PLACEMENTS: &[PropPlacement] = &[
    // ---- grass tufts around the near clearing ----
    PropPlacement {
        name: "grass",
        kind: PropKind::Grass,
        x: 0.0,
        z: -5.2,
        height: 0.3,
        flipped: false,
        anchor: Anchor::Terrain { offset: 0.35 },
        animation: Animation::Sway { phase: 0.0 },
        reflow: Reflow::Fixed,
    },
    PropPlacement {
        name: "grass_left",
        kind: PropKind::Grass,
        x: -2.8,
        z: -5.2,
        height: 0.3,
        flipped: true,
        anchor: Anchor::Terrain { offset: 0.35 },
        animation: Animation::Sway { phase: 0.9 },
        reflow: Reflow::Fixed,
    },
    PropPlacement {
        name: "grass_right",
        kind: PropKind::Grass,
        x: 2.8,
        z: -5.2,
        height: 0.3,
        flipped: false,
        anchor: Anchor::Terrain { offset: 0.35 },
        animation: Animation::Sway { phase: 1.7 },
        reflow: Reflow::Fixed,
    },
    PropPlacement {
        name: "grass_back",
        kind: PropKind::Grass,
        x: -1.4,
        z: -9.2,
        height: 0.3,
        flipped: false,
        anchor: Anchor::Terrain { offset: 0.35 },
        animation: Animation::Sway { phase: 2.4 },
        reflow: Reflow::Fixed,
    },
    PropPlacement {
        name: "grass_back_right",
        kind: PropKind::Grass,
        x: 1.9,
        z: -8.6,
        height: 0.3,
        flipped: true,
        anchor: Anchor::Terrain { offset: 0.35 },
        animation: Animation::Sway { phase: 3.1 },
        reflow: Reflow::Fixed,
    },
    // ---- large bushes ----
    PropPlacement {
        name: "bush",
        kind: PropKind::Bush,
        x: 0.0,
        z: -13.2,
        height: 0.4,
        flipped: false,
        anchor: Anchor::Terrain { offset: 0.35 },
        animation: Animation::Shake {
            amp: 0.05,
            phase: 0.2,
            bias_x: 1.0,
            bias_y: 1.0,
        },
        reflow: Reflow::Fixed,
    },
    PropPlacement {
        name: "bush_left",
        kind: PropKind::Bush,
        x: -6.0,
        z: -9.8,
        height: 0.4,
        flipped: false,
        anchor: Anchor::Terrain { offset: 0.35 },
        animation: Animation::Shake {
            amp: 0.05,
            phase: 2.0,
            bias_x: 1.01,
            bias_y: 0.99,
        },
        reflow: Reflow::Fixed,
    },
    PropPlacement {
        name: "bush_left_near1",
        kind: PropKind::Bush,
        x: -5.8,
        z: -7.4,
        height: 0.4,
        flipped: false,
        anchor: Anchor::Terrain { offset: 0.35 },
        animation: Animation::Shake {
            amp: 0.06,
            phase: 2.7,
            bias_x: 1.02,
            bias_y: 0.98,
        },
        reflow: Reflow::Fixed,
    },
    PropPlacement {
        name: "bush_right",
        kind: PropKind::Bush,
        x: 6.0,
        z: -9.8,
        height: 0.4,
        flipped: false,
        anchor: Anchor::Terrain { offset: 0.35 },
        animation: Animation::Shake {
            amp: 0.05,
            phase: 4.3,
            bias_x: 1.01,
            bias_y: 0.99,
        },
        reflow: Reflow::Fixed,
    },
    PropPlacement {
        name: "bush_right_near1",
        kind: PropKind::Bush,
        x: 5.8,
        z: -7.4,
        height: 0.4,
        flipped: false,
        anchor: Anchor::Terrain { offset: 0.35 },
        animation: Animation::Shake {
            amp: 0.04,
            phase: 5.1,
            bias_x: 0.98,
            bias_y: 1.02,
        },
        reflow: Reflow::Fixed,
    },
    PropPlacement {
        name: "bush_far_front",
        kind: PropKind::Bush,
        x: -3.75,
        z: -21.4,
        height: 0.4,
        flipped: false,
        anchor: Anchor::Terrain { offset: 0.15 },
        animation: Animation::Shake {
            amp: 0.035,
            phase: 6.8,
            bias_x: 0.97,
            bias_y: 1.03,
        },
        reflow: Reflow::Fixed,
    },
    // ---- small bushes ----
    PropPlacement {
        name: "bush_back_left",
        kind: PropKind::BushSmall,
        x: -0.8,
        z: -12.4,
        height: 0.32,
        flipped: false,
        anchor: Anchor::Terrain { offset: 0.35 },
        animation: Animation::Shake {
            amp: 0.04,
            phase: 1.1,
            bias_x: 0.98,
            bias_y: 1.02,
        },
        reflow: Reflow::Fixed,
    },
    PropPlacement {
        name: "bush_left_near2",
        kind: PropKind::BushSmall,
        x: -4.9,
        z: -10.0,
        height: 0.32,
        flipped: false,
        anchor: Anchor::Terrain { offset: 0.35 },
        animation: Animation::Shake {
            amp: 0.045,
            phase: 3.6,
            bias_x: 0.99,
            bias_y: 1.01,
        },
        reflow: Reflow::Fixed,
    },
    PropPlacement {
        name: "bush_right_near2",
        kind: PropKind::BushSmall,
        x: 4.9,
        z: -10.0,
        height: 0.32,
        flipped: false,
        anchor: Anchor::Terrain { offset: 0.35 },
        animation: Animation::Shake {
            amp: 0.055,
            phase: 6.0,
            bias_x: 1.02,
            bias_y: 0.98,
        },
        reflow: Reflow::Fixed,
    },
    PropPlacement {
        name: "bush2_far_front",
        kind: PropKind::BushSmall,
        x: -2.65,
        z: -21.7,
        height: 0.32,
        flipped: false,
        anchor: Anchor::Terrain { offset: 0.15 },
        animation: Animation::Shake {
            amp: 0.05,
            phase: 7.5,
            bias_x: 1.03,
            bias_y: 0.97,
        },
        reflow: Reflow::Fixed,
    },
    // ---- boulders ----
    PropPlacement {
        name: "boulder",
        kind: PropKind::Boulder,
        x: 3.8,
        z: -14.4,
        height: 2.0,
        flipped: false,
        anchor: Anchor::Terrain { offset: 0.05 },
        animation: Animation::Still,
        reflow: Reflow::Fixed,
    },
    PropPlacement {
        name: "boulder_far_right",
        kind: PropKind::Boulder,
        x: 9.6,
        z: -14.4,
        height: 2.0,
        flipped: false,
        anchor: Anchor::Terrain { offset: 0.95 },
        animation: Animation::Still,
        reflow: Reflow::Fixed,
    },
    PropPlacement {
        name: "boulder_far_left",
        kind: PropKind::Boulder,
        x: -8.0,
        z: -9.6,
        height: 2.0,
        flipped: true,
        anchor: Anchor::Terrain { offset: 0.95 },
        animation: Animation::Still,
        reflow: Reflow::Fixed,
    },
    PropPlacement {
        name: "boulder_far_center",
        kind: PropKind::Boulder,
        x: -3.25,
        z: -22.8,
        height: 1.2,
        flipped: false,
        anchor: Anchor::Terrain { offset: 0.2 },
        animation: Animation::Still,
        reflow: Reflow::Fixed,
    },
    // ---- clouds ----
    PropPlacement {
        name: "cloud",
        kind: PropKind::Cloud,
        x: -5.0,
        z: -17.2,
        height: 2.4,
        flipped: false,
        anchor: Anchor::Sky { y: 6.9 },
        animation: Animation::Drift {
            phase: 0.0,
            amp_x: 0.12,
            amp_y: 0.06,
        },
        reflow: Reflow::SkyScale,
    },
    PropPlacement {
        name: "cloud2",
        kind: PropKind::CloudB,
        x: 3.1,
        z: -16.2,
        height: 2.1,
        flipped: false,
        anchor: Anchor::Sky { y: 5.8 },
        animation: Animation::Drift {
            phase: 0.7,
            amp_x: 0.14,
            amp_y: 0.06,
        },
        reflow: Reflow::SkyScale,
    },
    PropPlacement {
        name: "cloud3",
        kind: PropKind::CloudC,
        x: -2.3,
        z: -20.2,
        height: 1.9,
        flipped: true,
        anchor: Anchor::Sky { y: 5.0 },
        animation: Animation::Drift {
            phase: 1.4,
            amp_x: 0.1,
            amp_y: 0.06,
        },
        reflow: Reflow::SkyScale,
    },
    PropPlacement {
        name: "cloud4",
        kind: PropKind::CloudB,
        x: -10.9,
        z: -18.2,
        height: 2.0,
        flipped: true,
        anchor: Anchor::Sky { y: 5.2 },
        animation: Animation::Drift {
            phase: 2.1,
            amp_x: 0.14,
            amp_y: 0.06,
        },
        reflow: Reflow::SkyScale,
    },
    PropPlacement {
        name: "cloud5",
        kind: PropKind::Cloud,
        x: 13.0,
        z: -23.2,
        height: 2.2,
        flipped: false,
        anchor: Anchor::Sky { y: 4.6 },
        animation: Animation::Drift {
            phase: 2.8,
            amp_x: 0.1,
            amp_y: 0.06,
        },
        reflow: Reflow::SkyScale,
    },
    // ---- backdrop mountains ----
    PropPlacement {
        name: "mountain_left",
        kind: PropKind::Mountain,
        x: -8.0,
        z: -25.2,
        height: 19.5,
        flipped: false,
        anchor: Anchor::Sky { y: 1.2 },
        animation: Animation::Still,
        reflow: Reflow::MountainLeft,
    },
    PropPlacement {
        name: "mountain_right",
        kind: PropKind::Mountain,
        x: 10.5,
        z: -25.2,
        height: 19.5,
        flipped: true,
        anchor: Anchor::Sky { y: -1.4 },
        animation: Animation::Still,
        reflow: Reflow::MountainRight,
    },
];

/// World position + billboard scale produced for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropPose {
    pub position: Vec3,
    /// Signed billboard extents; x is negative for mirrored sprites
    pub scale: Vec2,
}

/// A placed prop with its resolved anchor height and reflowed x.
///
/// `anchor_y` and `reflow_x` are fixed between resizes; `scale` is
/// refreshed when the sprite image finishes decoding and its real aspect
/// becomes known.
#[derive(Clone, Copy, Debug)]
pub struct PropInstance {
    pub placement: PropPlacement,
    /// Resolved world y of the anchor point
    pub anchor_y: f32,
    /// Current x after aspect reflow
    pub reflow_x: f32,
    /// World-space billboard size (width, height), aspect included
    pub scale: Vec2,
}

impl PropInstance {
    /// Evaluate the prop's pose at `t` elapsed seconds. Pure in `t`.
    pub fn pose(&self, t: f32) -> PropPose {
        let mut position = Vec3::new(self.reflow_x, self.anchor_y, self.placement.z);
        let mut scale = self.scale;

        match self.placement.animation {
            Animation::Still => {}
            Animation::Sway { phase } => {
                let wave = (t * 1.1 + phase).sin();
                scale.x *= 1.0 + wave * 0.06;
                scale.y *= 1.0 - wave * 0.04;
            }
            Animation::Shake {
                amp,
                phase,
                bias_x,
                bias_y,
            } => {
                let pulse = (t * 0.7 + phase).sin().max(0.0).powi(3);
                let shake = (t * 12.0 + phase * 2.3).sin() * amp * pulse;
                scale.x *= 1.0 + shake * bias_x;
                scale.y *= 1.0 - shake * bias_y;
            }
            Animation::Drift {
                phase,
                amp_x,
                amp_y,
            } => {
                position.x += (t * 0.4 + phase).sin() * amp_x;
                position.y += (t * 0.8 + phase * 2.0).sin() * amp_y;
            }
        }

        if self.placement.flipped {
            scale.x = -scale.x;
        }

        PropPose { position, scale }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance(animation: Animation, flipped: bool) -> PropInstance {
        PropInstance {
            placement: PropPlacement {
                name: "test",
                kind: PropKind::Bush,
                x: 1.0,
                z: -10.0,
                height: 0.4,
                flipped,
                anchor: Anchor::Terrain { offset: 0.35 },
                animation,
                reflow: Reflow::Fixed,
            },
            anchor_y: 0.5,
            reflow_x: 1.0,
            scale: Vec2::new(0.6, 0.4),
        }
    }

    #[test]
    fn test_table_shape() {
        assert_eq!(PLACEMENTS.len(), 26);
        let count = |k: PropKind| PLACEMENTS.iter().filter(|p| p.kind == k).count();
        assert_eq!(count(PropKind::Grass), 5);
        assert_eq!(count(PropKind::Bush), 6);
        assert_eq!(count(PropKind::BushSmall), 4);
        assert_eq!(count(PropKind::Boulder), 4);
        assert_eq!(
            count(PropKind::Cloud) + count(PropKind::CloudB) + count(PropKind::CloudC),
            5
        );
        assert_eq!(count(PropKind::Mountain), 2);
    }

    #[test]
    fn test_clouds_and_mountains_are_sky_anchored() {
        for p in PLACEMENTS {
            let sky = matches!(p.anchor, Anchor::Sky { .. });
            match p.kind {
                PropKind::Cloud | PropKind::CloudB | PropKind::CloudC | PropKind::Mountain => {
                    assert!(sky, "{} should float", p.name)
                }
                _ => assert!(!sky, "{} should sit on terrain", p.name),
            }
        }
    }

    #[test]
    fn test_pose_is_pure_in_time() {
        let inst = instance(
            Animation::Shake {
                amp: 0.05,
                phase: 1.3,
                bias_x: 1.01,
                bias_y: 0.99,
            },
            false,
        );
        for t in [0.0, 0.7, 12.34, 500.0] {
            assert_eq!(inst.pose(t), inst.pose(t));
        }
    }

    #[test]
    fn test_still_pose_never_moves() {
        let inst = instance(Animation::Still, false);
        let p0 = inst.pose(0.0);
        assert_eq!(inst.pose(37.5), p0);
        assert_eq!(p0.position, Vec3::new(1.0, 0.5, -10.0));
        assert_eq!(p0.scale, Vec2::new(0.6, 0.4));
    }

    #[test]
    fn test_shake_gated_by_pulse_envelope() {
        let phase = 0.0;
        // sin(0.7 t) <= 0 over [pi/0.7, 2pi/0.7]: the envelope kills the
        // jitter entirely for that stretch.
        let inst = instance(
            Animation::Shake {
                amp: 0.05,
                phase,
                bias_x: 1.0,
                bias_y: 1.0,
            },
            false,
        );
        let calm_t = (std::f32::consts::PI / 0.7) * 1.5;
        let pose = inst.pose(calm_t);
        assert_eq!(pose.scale, Vec2::new(0.6, 0.4));

        // Inside the positive half of the envelope the jitter shows up.
        let busy_t = std::f32::consts::FRAC_PI_2 / 0.7 + 0.013;
        let busy = inst.pose(busy_t);
        assert_ne!(busy.scale, Vec2::new(0.6, 0.4));
    }

    #[test]
    fn test_shake_stretch_and_squash_oppose() {
        let inst = instance(
            Animation::Shake {
                amp: 0.05,
                phase: 0.0,
                bias_x: 1.0,
                bias_y: 1.0,
            },
            false,
        );
        let pose = inst.pose(std::f32::consts::FRAC_PI_2 / 0.7 + 0.013);
        let dx = pose.scale.x / 0.6 - 1.0;
        let dy = pose.scale.y / 0.4 - 1.0;
        assert!((dx + dy).abs() < 1e-6, "x stretch should mirror y squash");
    }

    #[test]
    fn test_phase_desynchronizes_neighbors() {
        let a = instance(Animation::Sway { phase: 0.0 }, false);
        let b = instance(Animation::Sway { phase: 0.9 }, false);
        assert_ne!(a.pose(1.0).scale, b.pose(1.0).scale);
    }

    #[test]
    fn test_drift_orbits_the_anchor() {
        let inst = instance(
            Animation::Drift {
                phase: 0.7,
                amp_x: 0.14,
                amp_y: 0.06,
            },
            false,
        );
        let mut min_x = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        for i in 0..1000 {
            let pose = inst.pose(i as f32 * 0.05);
            assert!((pose.position.x - 1.0).abs() <= 0.14 + 1e-5);
            assert!((pose.position.y - 0.5).abs() <= 0.06 + 1e-5);
            min_x = min_x.min(pose.position.x);
            max_x = max_x.max(pose.position.x);
        }
        // It actually moves, both directions.
        assert!(min_x < 1.0 - 0.1);
        assert!(max_x > 1.0 + 0.1);
    }

    #[test]
    fn test_flip_mirrors_width_only() {
        let inst = instance(Animation::Still, true);
        let pose = inst.pose(0.0);
        assert_eq!(pose.scale, Vec2::new(-0.6, 0.4));
    }
}
