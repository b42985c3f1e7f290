//! Terrain Noise Module
//!
//! Deterministic 2D value noise and fractal sum used by the terrain
//! height-field and any other procedural variation in the scene.
//!
//! The hash is a sinusoidal fract hash, not a seeded RNG stream: the same
//! lattice coordinates always produce the same value within one process.
//! It only needs to look incoherent, nothing cryptographic.

/// Cubic ease curve `3t^2 - 2t^3` (smoothstep).
///
/// Required for corner interpolation: linear blending leaves visible
/// grid artifacts at lattice boundaries.
#[inline]
pub fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Hash integer lattice coordinates to a value in [0, 1).
#[inline]
pub fn hash2(xi: f32, zi: f32) -> f32 {
    let n = (xi * 127.1 + zi * 311.7).sin() * 43758.5453123;
    n - n.floor()
}

/// Smooth 2D value noise: bilinear blend of the four lattice corners
/// around (x, z), eased with [`smoothstep`] on each axis.
pub fn value_noise(x: f32, z: f32) -> f32 {
    let xi = x.floor();
    let zi = z.floor();
    let xf = x - xi;
    let zf = z - zi;

    let r00 = hash2(xi, zi);
    let r10 = hash2(xi + 1.0, zi);
    let r01 = hash2(xi, zi + 1.0);
    let r11 = hash2(xi + 1.0, zi + 1.0);

    let u = smoothstep(xf);
    let v = smoothstep(zf);

    let x1 = lerp(r00, r10, u);
    let x2 = lerp(r01, r11, u);
    lerp(x1, x2, v)
}

/// Fractal sum of value noise: `octaves` layers at doubling frequency and
/// halving amplitude, starting from a base amplitude of 0.6, clamped to
/// [0, 1].
pub fn fbm(x: f32, z: f32, octaves: u32) -> f32 {
    let mut v = 0.0;
    let mut amp = 0.6;
    let mut freq = 1.0;
    for _ in 0..octaves {
        v += value_noise(x * freq, z * freq) * amp;
        freq *= 2.0;
        amp *= 0.5;
    }
    v.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_range_and_determinism() {
        for i in -50..50 {
            for j in -50..50 {
                let h = hash2(i as f32, j as f32);
                assert!((0.0..1.0).contains(&h), "hash2({i},{j}) = {h}");
                assert_eq!(h, hash2(i as f32, j as f32));
            }
        }
    }

    #[test]
    fn test_fbm_in_unit_range() {
        let samples = [
            (0.0, 0.0),
            (1.5, -2.25),
            (123.456, -789.012),
            (-0.0001, 0.0001),
            (1e4, -1e4),
        ];
        for octaves in 1..=8 {
            for &(x, z) in &samples {
                let v = fbm(x, z, octaves);
                assert!(
                    (0.0..=1.0).contains(&v),
                    "fbm({x},{z},{octaves}) = {v}"
                );
            }
        }
    }

    #[test]
    fn test_value_noise_continuous_at_lattice_boundary() {
        // Approaching an integer x from below must converge to the value
        // at the boundary itself (no seam between cells).
        let z = 0.37;
        for xi in [-3.0_f32, 0.0, 2.0, 7.0] {
            let at = value_noise(xi, z);
            let before = value_noise(xi - 1e-4, z);
            assert!(
                (at - before).abs() < 1e-2,
                "discontinuity at x={xi}: {before} vs {at}"
            );
        }
    }

    #[test]
    fn test_value_noise_matches_corner_blend_at_lattice_point() {
        // At an exact lattice x the eased weight is zero, so the result is
        // the v-blend of the two corners in that column.
        let x = 4.0;
        let z: f32 = 2.6;
        let v = smoothstep(z - z.floor());
        let expected = hash2(x, 2.0) * (1.0 - v) + hash2(x, 3.0) * v;
        assert!((value_noise(x, z) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_smoothstep_endpoints() {
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(1.0), 1.0);
        assert!((smoothstep(0.5) - 0.5).abs() < 1e-6);
    }
}
