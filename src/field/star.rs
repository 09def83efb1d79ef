//! Tree-top star
//!
//! A single distinguished transform with bespoke morph curves: it descends
//! from a wobbling scatter altitude onto the cone apex, circling inward as
//! it arrives, spinning continuously with a slight tilt wobble and a fast
//! scale pulse.

use crate::animation::{ease, Easing};
use crate::math::{Mat4, Vec3};
use crate::scene::{FrameContext, StarConfig, TreeLayout};

const BOB_AMPLITUDE: f32 = 0.3;
const ORBIT_RADIUS: f32 = 1.6;
const SPIN_RATE: f32 = 1.5;
const TILT_AMPLITUDE: f32 = 0.12;
const PULSE_AMPLITUDE: f32 = 0.05;
/// Scattered scale relative to the assembled one
const SCATTER_SCALE: f32 = 0.6;

/// The single top marker
pub struct StarMarker {
    assembled_altitude: f32,
    scatter_altitude: f32,
    base_scale: f32,
    transform: Mat4,
    dirty: bool,
}

impl StarMarker {
    pub fn new(config: &StarConfig, layout: &TreeLayout) -> Self {
        assert!(
            config.base_scale.is_finite() && config.base_scale > 0.0,
            "star scale must be finite and positive, got {}",
            config.base_scale
        );
        assert!(
            config.height_offset.is_finite() && config.scatter_altitude.is_finite(),
            "star altitudes must be finite"
        );

        Self {
            assembled_altitude: layout.height * 0.5 + config.height_offset,
            scatter_altitude: config.scatter_altitude,
            base_scale: config.base_scale,
            transform: Mat4::identity(),
            dirty: false,
        }
    }

    pub fn update(&mut self, ctx: &FrameContext) {
        let eased = ease(ctx.progress, Easing::Smoothstep);

        // Wobbling high drift while scattered, fixed perch when assembled
        let bob = (ctx.elapsed * 0.8).sin() * BOB_AMPLITUDE;
        let y = lerp(self.scatter_altitude + bob, self.assembled_altitude, eased);

        // Lateral circle that closes onto the axis as assembly completes
        let orbit = (1.0 - eased) * ORBIT_RADIUS;
        let x = (ctx.elapsed * 0.6).cos() * orbit;
        let z = (ctx.elapsed * 0.6).sin() * orbit;

        let rotation = Vec3::new(
            0.0,
            ctx.elapsed * SPIN_RATE,
            (ctx.elapsed * 1.3).sin() * TILT_AMPLITUDE,
        );

        let pulse = 1.0 + PULSE_AMPLITUDE * (ctx.elapsed * 5.0).sin();
        let scale = lerp(self.base_scale * SCATTER_SCALE, self.base_scale, eased) * pulse;

        self.transform = Mat4::from_trs(Vec3::new(x, y, z), rotation, scale);
        self.dirty = true;
    }

    /// Current transform as one instanced-batch slot
    pub fn transform_data(&self) -> &[f32] {
        &self.transform.data
    }

    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_layout() -> TreeLayout {
        TreeLayout {
            height: 11.0,
            base_radius: 4.5,
            scatter_min_radius: 9.0,
            scatter_spread: 6.0,
        }
    }

    fn test_config() -> StarConfig {
        StarConfig {
            height_offset: 0.5,
            scatter_altitude: 9.5,
            base_scale: 0.8,
        }
    }

    #[test]
    fn test_assembled_star_sits_on_apex() {
        let mut star = StarMarker::new(&test_config(), &test_layout());
        star.update(&FrameContext::new(4.0, 0.016, 1.0, 1.0));

        let data = star.transform_data();
        assert!((data[12]).abs() < 1e-4, "x centered");
        assert!((data[14]).abs() < 1e-4, "z centered");
        assert!((data[13] - 6.0).abs() < 1e-4, "y at apex + offset");
    }

    #[test]
    fn test_scattered_star_circles_high() {
        let mut star = StarMarker::new(&test_config(), &test_layout());
        star.update(&FrameContext::new(2.0, 0.016, 1.0, 0.0));

        let data = star.transform_data();
        let lateral = (data[12] * data[12] + data[14] * data[14]).sqrt();
        assert!((lateral - ORBIT_RADIUS).abs() < 1e-3);
        assert!((data[13] - 9.5).abs() <= BOB_AMPLITUDE + 1e-3);
    }

    #[test]
    fn test_dirty_flag() {
        let mut star = StarMarker::new(&test_config(), &test_layout());
        assert!(!star.take_dirty());
        star.update(&FrameContext::new(0.0, 0.016, 1.0, 0.0));
        assert!(star.take_dirty());
        assert!(!star.take_dirty());
    }

    #[test]
    fn test_scale_grows_with_assembly() {
        let mut star = StarMarker::new(&test_config(), &test_layout());

        // Column length of the first basis vector is the uniform scale
        let scale_of = |data: &[f32]| -> f32 {
            (data[0] * data[0] + data[1] * data[1] + data[2] * data[2]).sqrt()
        };

        star.update(&FrameContext::new(1.0, 0.016, 1.0, 0.0));
        let scattered = scale_of(star.transform_data());
        star.update(&FrameContext::new(1.0, 0.016, 1.0, 1.0));
        let assembled = scale_of(star.transform_data());

        assert!(assembled > scattered);
        assert!((scattered / assembled - SCATTER_SCALE).abs() < 0.01);
    }

    #[test]
    #[should_panic]
    fn test_bad_scale_panics() {
        let mut config = test_config();
        config.base_scale = f32::INFINITY;
        StarMarker::new(&config, &test_layout());
    }
}
