//! Morph progress driver
//!
//! A single scalar in [0, 1] relaxed toward a binary target with
//! exponential damping. Transition speed is independent of frame rate and
//! the curve decelerates continuously near the target with no overshoot,
//! so flipping the target mid-flight just re-aims the approach.

/// Damped scalar chasing the current mode target
#[derive(Debug, Clone)]
pub struct MorphDriver {
    progress: f32,
    /// Time constant in seconds; progress covers ~63% of the remaining
    /// distance per constant
    time_constant: f32,
}

impl Default for MorphDriver {
    fn default() -> Self {
        Self::new(0.8)
    }
}

impl MorphDriver {
    /// Create a driver starting fully scattered (progress 0)
    pub fn new(time_constant: f32) -> Self {
        assert!(
            time_constant.is_finite() && time_constant > 0.0,
            "morph time constant must be finite and positive, got {}",
            time_constant
        );
        Self {
            progress: 0.0,
            time_constant,
        }
    }

    /// Advance one frame toward `target`.
    ///
    /// `tick(target, 0.0)` leaves progress unchanged. Damping alone keeps
    /// progress inside [0, 1] for sane inputs; the clamp guards against
    /// pathological `dt` spikes.
    pub fn tick(&mut self, target: f32, dt: f32) {
        debug_assert!((0.0..=1.0).contains(&target));
        if dt <= 0.0 {
            return;
        }

        let blend = 1.0 - (-dt / self.time_constant).exp();
        self.progress += (target - self.progress) * blend;
        self.progress = self.progress.clamp(0.0, 1.0);
    }

    /// Jump straight to a target, skipping the transition
    pub fn snap(&mut self, target: f32) {
        self.progress = target.clamp(0.0, 1.0);
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_scattered() {
        let driver = MorphDriver::default();
        assert_eq!(driver.progress(), 0.0);
    }

    #[test]
    fn test_zero_dt_is_identity() {
        let mut driver = MorphDriver::default();
        driver.tick(1.0, 0.5);
        let before = driver.progress();
        driver.tick(1.0, 0.0);
        assert_eq!(driver.progress(), before);
    }

    #[test]
    fn test_monotonic_no_overshoot() {
        let mut driver = MorphDriver::default();
        let mut prev = driver.progress();

        // Irregular frame times, still monotonic and bounded by the target
        let steps = [0.016, 0.033, 0.008, 0.1, 0.25, 0.016, 0.5, 0.016];
        for _ in 0..50 {
            for &dt in &steps {
                driver.tick(1.0, dt);
                let p = driver.progress();
                assert!(p >= prev);
                assert!(p <= 1.0);
                prev = p;
            }
        }
        assert!(driver.progress() > 0.999);
    }

    #[test]
    fn test_frame_rate_independence() {
        // Same wall-clock time in different step sizes lands close together
        let mut coarse = MorphDriver::new(0.8);
        let mut fine = MorphDriver::new(0.8);

        for _ in 0..10 {
            coarse.tick(1.0, 0.1);
        }
        for _ in 0..100 {
            fine.tick(1.0, 0.01);
        }

        assert!((coarse.progress() - fine.progress()).abs() < 0.01);
    }

    #[test]
    fn test_reversal_is_continuous() {
        let mut driver = MorphDriver::default();
        for _ in 0..30 {
            driver.tick(1.0, 0.016);
        }
        let at_flip = driver.progress();
        assert!(at_flip > 0.0 && at_flip < 1.0);

        // One tiny frame after flipping the target, progress has barely
        // moved: no discontinuity at the flip instant.
        driver.tick(0.0, 0.001);
        assert!((driver.progress() - at_flip).abs() < 0.01);

        // And it now heads back down
        let mut prev = driver.progress();
        for _ in 0..200 {
            driver.tick(0.0, 0.016);
            assert!(driver.progress() <= prev + 1e-6);
            prev = driver.progress();
        }
        assert!(driver.progress() < 0.01);
    }

    #[test]
    fn test_snap() {
        let mut driver = MorphDriver::default();
        driver.snap(1.0);
        assert_eq!(driver.progress(), 1.0);
        driver.snap(-2.0);
        assert_eq!(driver.progress(), 0.0);
    }

    #[test]
    fn test_pathological_dt_stays_bounded() {
        let mut driver = MorphDriver::default();
        driver.tick(1.0, 1e6);
        assert!(driver.progress() <= 1.0);
        driver.tick(0.0, 1e6);
        assert!(driver.progress() >= 0.0);
    }

    #[test]
    #[should_panic]
    fn test_invalid_time_constant_panics() {
        MorphDriver::new(0.0);
    }
}
