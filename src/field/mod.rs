//! Animated element fields
//!
//! Each field owns its elements exclusively, generates their (scatter,
//! target) positions exactly once at construction, and maps the shared
//! morph progress plus time to batched per-frame output.

pub mod foliage;
pub mod ornaments;
pub mod star;

pub use foliage::{FoliageField, FLOATS_PER_PARTICLE};
pub use ornaments::{OrnamentField, FLOATS_PER_INSTANCE};
pub use star::StarMarker;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::MorphDriver;
    use crate::math::Vec3;
    use crate::scene::{FrameContext, Mode, OrnamentGroupConfig, OrnamentShape, StarConfig, TreeLayout};

    fn layout() -> TreeLayout {
        TreeLayout {
            height: 11.0,
            base_radius: 4.5,
            scatter_min_radius: 9.0,
            scatter_spread: 6.0,
        }
    }

    fn particle_position(field: &FoliageField, index: usize) -> Vec3 {
        let data = field.particle_data();
        let base = index * FLOATS_PER_PARTICLE;
        Vec3::new(data[base], data[base + 1], data[base + 2])
    }

    /// Flipping the mode mid-transition must not jump: the per-frame
    /// position step right after the flip stays in line with the steps
    /// right before it.
    #[test]
    fn test_mode_flip_keeps_positions_continuous() {
        let mut field = FoliageField::new(200, 9.0, &layout(), 4);
        let mut driver = MorphDriver::default();
        let mut mode = Mode::TreeShape;
        let dt = 1.0 / 60.0;

        let mut elapsed = 0.0;
        let mut prev = {
            field.update(&FrameContext::new(elapsed, dt, 1.0, driver.progress()));
            particle_position(&field, 0)
        };

        let mut max_step = 0.0f32;
        for _ in 0..40 {
            elapsed += dt;
            driver.tick(mode.target(), dt);
            field.update(&FrameContext::new(elapsed, dt, 1.0, driver.progress()));
            let pos = particle_position(&field, 0);
            max_step = max_step.max(pos.distance(&prev));
            prev = pos;
        }

        // Reverse mid-flight
        mode = mode.toggled();
        elapsed += dt;
        driver.tick(mode.target(), dt);
        field.update(&FrameContext::new(elapsed, dt, 1.0, driver.progress()));
        let after_flip = particle_position(&field, 0);

        let flip_step = after_flip.distance(&prev);
        assert!(
            flip_step <= max_step * 1.5 + 1e-3,
            "flip step {} vs max in-flight step {}",
            flip_step,
            max_step
        );
    }

    /// Whole-scene assembly through the driver: foliage, ornaments, and
    /// the star all land on their assembled configuration together.
    #[test]
    fn test_scene_assembles_through_driver() {
        let group = OrnamentGroupConfig {
            name: "globes".to_string(),
            shape: OrnamentShape::Sphere,
            count: 60,
            base_scale: 0.2,
            color: Vec3::new(0.9, 0.2, 0.2),
            emissive: false,
        };
        let star_config = StarConfig {
            height_offset: 0.5,
            scatter_altitude: 9.5,
            base_scale: 0.8,
        };

        let mut foliage = FoliageField::new(1_000, 9.0, &layout(), 42);
        let mut ornaments = OrnamentField::new(&group, &layout(), 7);
        let mut star = StarMarker::new(&star_config, &layout());
        let mut driver = MorphDriver::default();

        let dt = 1.0 / 60.0;
        let mut elapsed = 0.0;
        for _ in 0..900 {
            elapsed += dt;
            driver.tick(Mode::TreeShape.target(), dt);
            let ctx = FrameContext::new(elapsed, dt, 1.0, driver.progress());
            foliage.update(&ctx);
            ornaments.update(&ctx);
            star.update(&ctx);
        }

        assert!(driver.progress() > 0.999);

        // Ornament translations sit on the spiral within a whisker
        let data = ornaments.transform_data();
        for i in 0..ornaments.count() {
            let base = i * FLOATS_PER_INSTANCE;
            let pos = Vec3::new(data[base + 12], data[base + 13], data[base + 14]);
            let y_norm = (pos.y + 11.0 * 0.5) / 11.0;
            let radial = (pos.x * pos.x + pos.z * pos.z).sqrt();
            assert!(radial <= 4.5 * (1.0 - y_norm) + 0.05);
        }

        // Star is centered over the apex
        let star_data = star.transform_data();
        assert!(star_data[12].abs() < 0.01);
        assert!(star_data[14].abs() < 0.01);
        assert!((star_data[13] - 6.0).abs() < 0.01);
    }
}
