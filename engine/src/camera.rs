//! Parallax Camera Module
//!
//! Fixed-base camera with a pointer-driven parallax offset. The offset is
//! exponentially smoothed once per frame with a fixed blend factor (not
//! time-scaled), the only cross-frame mutable animation state in the
//! scene.

use glam::{Mat4, Vec2, Vec3};

/// Fixed smoothing factor applied once per tick.
const SMOOTHING: f32 = 0.12;

/// Camera with a fixed base framing and a smoothed parallax offset.
#[derive(Clone, Copy, Debug)]
pub struct ParallaxCamera {
    pub base_position: Vec3,
    pub base_look_at: Vec3,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Smoothed offset, updated once per tick
    offset: Vec2,
    /// Latest pointer-derived target, written by the input handler
    target: Vec2,
}

impl Default for ParallaxCamera {
    fn default() -> Self {
        Self {
            base_position: Vec3::new(0.0, 3.6, 6.4),
            base_look_at: Vec3::new(0.0, 1.2, -18.0),
            fov: 30.0_f32.to_radians(),
            near: 0.1,
            far: 200.0,
            offset: Vec2::ZERO,
            target: Vec2::ZERO,
        }
    }
}

impl ParallaxCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the parallax target from a pointer position normalized to
    /// [-1, 1] on both axes. Called from the pointer-move handler; the
    /// smoothed offset only catches up on the next tick.
    pub fn set_pointer(&mut self, nx: f32, ny: f32) {
        self.target.x = nx.clamp(-1.0, 1.0) * 1.6;
        self.target.y = ny.clamp(-1.0, 1.0) * -1.2;
    }

    /// Advance the smoothed offset one frame toward the target.
    pub fn tick(&mut self) {
        self.offset = self.offset.lerp(self.target, SMOOTHING);
    }

    /// Camera world position for the current smoothed offset.
    pub fn position(&self) -> Vec3 {
        self.base_position
            + Vec3::new(
                -self.offset.x * 1.2,
                -self.offset.y * 0.8,
                self.offset.y * 0.45,
            )
    }

    /// Look-at target for the current smoothed offset.
    pub fn look_at(&self) -> Vec3 {
        self.base_look_at + Vec3::new(self.offset.x * 0.08, self.offset.y * 0.05, 0.0)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.look_at(), Vec3::Y)
    }

    /// Projection matrix. A degenerate aspect (zero-sized mount) falls
    /// back to 1:1 instead of dividing by zero.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        let aspect = if aspect.is_finite() && aspect > 0.0 {
            aspect
        } else {
            1.0
        };
        Mat4::perspective_rh(self.fov, aspect, self.near, self.far)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// Orthonormal basis for billboarding: world-space right and up of
    /// the camera plane.
    pub fn billboard_basis(&self) -> (Vec3, Vec3) {
        let forward = (self.look_at() - self.position()).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);
        (right, up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_frame_the_clearing() {
        let cam = ParallaxCamera::new();
        assert_eq!(cam.position(), Vec3::new(0.0, 3.6, 6.4));
        assert_eq!(cam.look_at(), Vec3::new(0.0, 1.2, -18.0));
    }

    #[test]
    fn test_smoothing_converges_to_target() {
        let mut cam = ParallaxCamera::new();
        cam.set_pointer(1.0, -1.0);
        for _ in 0..200 {
            cam.tick();
        }
        // target = (1.6, 1.2) after axis mapping
        let expected = Vec3::new(0.0 - 1.6 * 1.2, 3.6 - 1.2 * 0.8, 6.4 + 1.2 * 0.45);
        assert!(cam.position().abs_diff_eq(expected, 1e-3));
    }

    #[test]
    fn test_single_tick_moves_fixed_fraction() {
        let mut cam = ParallaxCamera::new();
        cam.set_pointer(0.5, 0.0);
        cam.tick();
        let dx = cam.base_position.x - cam.position().x;
        // One tick covers 12% of the gap: 0.5 * 1.6 * 0.12 * 1.2
        assert!((dx - 0.5 * 1.6 * SMOOTHING * 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_pointer_clamped_to_unit_square() {
        let mut a = ParallaxCamera::new();
        let mut b = ParallaxCamera::new();
        a.set_pointer(5.0, -7.0);
        b.set_pointer(1.0, -1.0);
        for _ in 0..10 {
            a.tick();
            b.tick();
        }
        assert!(a.position().abs_diff_eq(b.position(), 1e-6));
    }

    #[test]
    fn test_zero_aspect_tolerated() {
        let cam = ParallaxCamera::new();
        let m = cam.projection_matrix(0.0);
        assert!(m.is_finite());
        let m = cam.projection_matrix(f32::NAN);
        assert!(m.is_finite());
    }

    #[test]
    fn test_billboard_basis_orthonormal() {
        let mut cam = ParallaxCamera::new();
        cam.set_pointer(0.8, 0.3);
        for _ in 0..5 {
            cam.tick();
        }
        let (right, up) = cam.billboard_basis();
        assert!((right.length() - 1.0).abs() < 1e-4);
        assert!((up.length() - 1.0).abs() < 1e-4);
        assert!(right.dot(up).abs() < 1e-4);
    }
}
