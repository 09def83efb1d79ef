//! Scene-level state shared with every field each frame

pub mod config;

pub use config::{SceneConfig, TreeLayout, FoliageConfig, OrnamentGroupConfig, StarConfig, OrnamentShape};

/// User-facing mode toggle: where the morph is heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Elements rest on the scatter shell
    #[default]
    Scattered,
    /// Elements assemble into the tree
    TreeShape,
}

impl Mode {
    /// Morph target this mode drives toward
    pub fn target(&self) -> f32 {
        match self {
            Mode::Scattered => 0.0,
            Mode::TreeShape => 1.0,
        }
    }

    pub fn toggled(&self) -> Mode {
        match self {
            Mode::Scattered => Mode::TreeShape,
            Mode::TreeShape => Mode::Scattered,
        }
    }
}

/// Per-frame inputs handed to each field's update.
///
/// Progress is written once by the morph driver before any field reads it,
/// so within a frame every field sees the same value.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    /// Seconds since scene start
    pub elapsed: f32,
    /// Seconds since the previous frame
    pub dt: f32,
    /// Device pixel ratio for point-size scaling
    pub pixel_ratio: f32,
    /// Morph progress in [0, 1]: 0 scattered, 1 assembled
    pub progress: f32,
}

impl FrameContext {
    pub fn new(elapsed: f32, dt: f32, pixel_ratio: f32, progress: f32) -> Self {
        Self {
            elapsed,
            dt,
            pixel_ratio,
            progress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_targets() {
        assert_eq!(Mode::Scattered.target(), 0.0);
        assert_eq!(Mode::TreeShape.target(), 1.0);
    }

    #[test]
    fn test_mode_toggle_round_trip() {
        let mode = Mode::Scattered;
        assert_eq!(mode.toggled(), Mode::TreeShape);
        assert_eq!(mode.toggled().toggled(), Mode::Scattered);
    }
}
