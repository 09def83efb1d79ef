//! Foliage particle field
//!
//! Thousands of point particles, each carrying a fixed (scatter, target)
//! position pair and a random seed. Every frame the whole field is packed
//! into one flat buffer: eased scatter-to-target interpolation, wind drift
//! while scattered, a gentle breathing offset once assembled, and a
//! per-particle sparkle.

use std::f32::consts::TAU;
use crate::animation::{ease, Easing};
use crate::math::Vec3;
use crate::sampling::{sample_scatter_shell, sample_tree_volume, SeededRng};
use crate::scene::{FrameContext, TreeLayout};

/// Upload layout: position(3) + size(1) + alpha(1) + color(3)
pub const FLOATS_PER_PARTICLE: usize = 8;

const WIND_AMPLITUDE: f32 = 0.35;
const BREATHE_AMPLITUDE: f32 = 0.06;

/// A single foliage point, immutable after construction
#[derive(Debug, Clone)]
struct Particle {
    target: Vec3,
    scatter: Vec3,
    seed: f32,
    color: Vec3,
}

/// Batched field of foliage particles
pub struct FoliageField {
    particles: Vec<Particle>,
    /// Packed per-frame output, `FLOATS_PER_PARTICLE` floats per particle
    data: Vec<f32>,
    base_size: f32,
}

impl FoliageField {
    /// Generate `count` particles for the given layout.
    ///
    /// Sampling runs only here; positions and seeds never change
    /// afterwards, so morphing back and forth always lands on the same
    /// configuration.
    pub fn new(count: usize, base_size: f32, layout: &TreeLayout, seed: u32) -> Self {
        assert!(
            base_size.is_finite() && base_size > 0.0,
            "foliage base size must be finite and positive, got {}",
            base_size
        );
        assert_layout(layout);

        let mut rng = SeededRng::new(seed);
        let mut particles = Vec::with_capacity(count);

        for _ in 0..count {
            let target = sample_tree_volume(&mut rng, layout.height, layout.base_radius);
            let scatter =
                sample_scatter_shell(&mut rng, layout.scatter_min_radius, layout.scatter_spread);
            let particle_seed = rng.next_f32();

            // Narrow green band, slightly brighter toward the outside
            let hue = 0.30 + rng.next_f32() * 0.08;
            let value = 0.7 + rng.next_f32() * 0.3;
            let color = hsv_to_rgb(hue, 0.65, value);

            particles.push(Particle {
                target,
                scatter,
                seed: particle_seed,
                color,
            });
        }

        Self {
            particles,
            data: vec![0.0; count * FLOATS_PER_PARTICLE],
            base_size,
        }
    }

    /// Recompute the packed buffer for this frame, all particles in one pass
    pub fn update(&mut self, ctx: &FrameContext) {
        let eased = ease(ctx.progress, Easing::Smoothstep);
        let drift = 1.0 - ctx.progress;
        let breathe = ctx.progress;

        for (i, p) in self.particles.iter().enumerate() {
            let phase = p.seed * TAU;
            let mut pos = p.scatter.lerp(&p.target, eased);

            // Scattered particles float on slow seeded sinusoids
            if drift > 0.0 {
                pos.x += (ctx.elapsed * (0.6 + p.seed * 0.5) + phase).sin()
                    * WIND_AMPLITUDE
                    * drift;
                pos.y += (ctx.elapsed * 0.45 + phase * 1.7).cos() * WIND_AMPLITUDE * 0.7 * drift;
                pos.z += (ctx.elapsed * (0.5 + p.seed * 0.4) + phase * 2.3).sin()
                    * WIND_AMPLITUDE
                    * drift;
            }

            // The assembled cone breathes outward from the trunk axis
            if breathe > 0.0 {
                let outward = p.target.radial_from_axis();
                let puff = (ctx.elapsed * 1.2 + phase).sin() * BREATHE_AMPLITUDE * breathe;
                pos = pos + outward.scale(puff);
            }

            // Perspective depth attenuation happens in the vertex shader
            let size = self.base_size * (0.6 + 0.8 * p.seed) * ctx.pixel_ratio;
            let sparkle = 0.55 + 0.45 * (ctx.elapsed * (1.5 + 2.5 * p.seed) + phase).sin();

            let base = i * FLOATS_PER_PARTICLE;
            self.data[base] = pos.x;
            self.data[base + 1] = pos.y;
            self.data[base + 2] = pos.z;
            self.data[base + 3] = size;
            self.data[base + 4] = sparkle;
            self.data[base + 5] = p.color.x;
            self.data[base + 6] = p.color.y;
            self.data[base + 7] = p.color.z;
        }
    }

    /// Packed buffer for GPU upload
    pub fn particle_data(&self) -> &[f32] {
        &self.data
    }

    pub fn count(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

fn assert_layout(layout: &TreeLayout) {
    assert!(
        layout.height.is_finite() && layout.height > 0.0,
        "tree height must be finite and positive, got {}",
        layout.height
    );
    assert!(
        layout.base_radius.is_finite() && layout.base_radius > 0.0,
        "tree base radius must be finite and positive, got {}",
        layout.base_radius
    );
    assert!(
        layout.scatter_min_radius.is_finite() && layout.scatter_min_radius > 0.0,
        "scatter radius must be finite and positive, got {}",
        layout.scatter_min_radius
    );
    assert!(
        layout.scatter_spread.is_finite() && layout.scatter_spread >= 0.0,
        "scatter spread must be finite and non-negative, got {}",
        layout.scatter_spread
    );
}

/// HSV to RGB conversion
fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Vec3 {
    let h = h * 6.0;
    let i = h.floor() as i32;
    let f = h - h.floor();
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    match i % 6 {
        0 => Vec3::new(v, t, p),
        1 => Vec3::new(q, v, p),
        2 => Vec3::new(p, v, t),
        3 => Vec3::new(p, q, v),
        4 => Vec3::new(t, p, v),
        _ => Vec3::new(v, p, q),
    }
}
