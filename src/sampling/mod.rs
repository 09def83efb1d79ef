//! Procedural point sampling for the tree and scatter configurations
//!
//! Pure generation functions called exactly once per element at field
//! construction. Results are stored for the lifetime of the field so the
//! scene never reshuffles between morphs.

use std::f32::consts::{PI, TAU};
use crate::math::Vec3;

/// Golden angle in radians, used for even spiral placement
pub const GOLDEN_ANGLE: f32 = 2.399_963_2;

/// Exponent shaping foliage density toward the base of the cone
const HEIGHT_BIAS: f32 = 0.8;

/// Spiral twist from base to apex (two full turns)
const SPIRAL_TWIST: f32 = 4.0 * PI;

/// Small 32-bit LCG, good enough for decorative placement
#[derive(Debug, Clone)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Uniform float in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 * (1.0 / 16_777_216.0)
    }
}

/// Sample a point inside a cone volume of the given height and base radius.
///
/// The cone is centered on the Y axis with its base at `-height/2` and apex
/// at `+height/2`. Heights are biased toward the base for denser low
/// foliage; the disc draw at each height is area-uniform to avoid the
/// center clustering of naive polar sampling.
pub fn sample_tree_volume(rng: &mut SeededRng, height: f32, base_radius: f32) -> Vec3 {
    let y_norm = 1.0 - rng.next_f32().powf(HEIGHT_BIAS);
    let radius_at = base_radius * (1.0 - y_norm);
    let radius = rng.next_f32().sqrt() * radius_at;
    let angle = rng.next_f32() * TAU;

    Vec3::new(
        angle.cos() * radius,
        y_norm * height - height * 0.5,
        angle.sin() * radius,
    )
}

/// Sample a point on the cone surface along a golden-angle spiral.
///
/// Discrete instances use an index-derived azimuth instead of a random one:
/// at low counts, pure random angles cluster visibly, while golden-angle
/// steps stay even.
pub fn sample_tree_spiral(
    rng: &mut SeededRng,
    height: f32,
    base_radius: f32,
    index: usize,
) -> Vec3 {
    let y_norm = rng.next_f32();
    let radius = base_radius * (1.0 - y_norm);
    let angle = index as f32 * GOLDEN_ANGLE + y_norm * SPIRAL_TWIST;

    Vec3::new(
        angle.cos() * radius,
        y_norm * height - height * 0.5,
        angle.sin() * radius,
    )
}

/// Sample a point on a noisy spherical shell, the scattered resting state.
///
/// Radius is uniform in `[min_radius, min_radius + radius_spread]`. The
/// direction uses `phi = acos(2u - 1)`, which is uniform over the sphere;
/// drawing phi uniformly instead would pile samples up at the poles.
pub fn sample_scatter_shell(rng: &mut SeededRng, min_radius: f32, radius_spread: f32) -> Vec3 {
    let radius = min_radius + rng.next_f32() * radius_spread;
    let theta = rng.next_f32() * TAU;
    let phi = (2.0 * rng.next_f32() - 1.0).acos();

    Vec3::new(
        phi.sin() * theta.cos(),
        phi.cos(),
        phi.sin() * theta.sin(),
    )
    .scale(radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_is_deterministic() {
        let mut a = SeededRng::new(7);
        let mut b = SeededRng::new(7);
        for _ in 0..100 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn test_rng_unit_range() {
        let mut rng = SeededRng::new(42);
        for _ in 0..10_000 {
            let v = rng.next_f32();
            assert!(v >= 0.0 && v < 1.0);
        }
    }

    #[test]
    fn test_tree_volume_bounds() {
        let mut rng = SeededRng::new(1);
        let height = 17.0;
        let base_radius = 5.5;

        for _ in 0..5_000 {
            let p = sample_tree_volume(&mut rng, height, base_radius);
            assert!(p.y >= -height * 0.5 - 1e-4);
            assert!(p.y <= height * 0.5 + 1e-4);

            let y_norm = (p.y + height * 0.5) / height;
            let radial = (p.x * p.x + p.z * p.z).sqrt();
            assert!(
                radial <= base_radius * (1.0 - y_norm) + 1e-3,
                "point outside cone profile: radial {} at y_norm {}",
                radial,
                y_norm
            );
        }
    }

    #[test]
    fn test_tree_volume_denser_near_base() {
        let mut rng = SeededRng::new(2);
        let height = 10.0;
        let mut below = 0;
        let samples = 10_000;

        for _ in 0..samples {
            let p = sample_tree_volume(&mut rng, height, 4.0);
            if p.y < 0.0 {
                below += 1;
            }
        }

        // Bias shaping puts clearly more than half the points in the lower half
        assert!(below > samples * 55 / 100, "only {} of {} below midline", below, samples);
    }

    #[test]
    fn test_tree_spiral_on_cone_surface() {
        let mut rng = SeededRng::new(3);
        let height = 12.0;
        let base_radius = 4.0;

        for index in 0..300 {
            let p = sample_tree_spiral(&mut rng, height, base_radius, index);
            let y_norm = (p.y + height * 0.5) / height;
            let radial = (p.x * p.x + p.z * p.z).sqrt();
            assert!((radial - base_radius * (1.0 - y_norm)).abs() < 1e-3);
        }
    }

    #[test]
    fn test_scatter_shell_radius_bounds() {
        let mut rng = SeededRng::new(4);
        let min_radius = 8.0;
        let spread = 6.0;

        for _ in 0..5_000 {
            let p = sample_scatter_shell(&mut rng, min_radius, spread);
            let r = p.length();
            assert!(r >= min_radius - 1e-3);
            assert!(r <= min_radius + spread + 1e-3);
        }
    }

    #[test]
    fn test_scatter_shell_no_pole_clustering() {
        let mut rng = SeededRng::new(5);
        let samples = 40_000;

        // Count directions per octant; uniform sampling fills them evenly,
        // pole-clustered sampling does not.
        let mut octants = [0usize; 8];
        for _ in 0..samples {
            let p = sample_scatter_shell(&mut rng, 1.0, 0.0);
            let idx = ((p.x >= 0.0) as usize)
                | (((p.y >= 0.0) as usize) << 1)
                | (((p.z >= 0.0) as usize) << 2);
            octants[idx] += 1;
        }

        let expected = samples / 8;
        for (i, &count) in octants.iter().enumerate() {
            let deviation = (count as f32 - expected as f32).abs() / expected as f32;
            assert!(deviation < 0.1, "octant {} off by {:.1}%", i, deviation * 100.0);
        }

        // Direct pole check: |y| near 1 should hold roughly its share of
        // solid angle (caps above |y| > 0.9 cover 10% of the sphere).
        let mut rng = SeededRng::new(6);
        let mut cap = 0usize;
        for _ in 0..samples {
            let p = sample_scatter_shell(&mut rng, 1.0, 0.0);
            if p.y.abs() > 0.9 {
                cap += 1;
            }
        }
        let share = cap as f32 / samples as f32;
        assert!((share - 0.1).abs() < 0.02, "polar cap share {:.3}", share);
    }
}
