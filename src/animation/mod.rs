//! Animation module for the scatter/assemble morph
//!
//! The damped morph scalar and the per-element easing curves layered on
//! top of it.

mod morph;
mod easing;

pub use morph::MorphDriver;
pub use easing::{Easing, ease};
