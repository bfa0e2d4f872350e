//! Time-driven animation
//!
//! - [`KeyFrameAnimation`]: interpolates a node transform between authored
//!   keyframes
//! - [`SpriteAnimation`]: steps through the cells of a sprite sheet

mod keyframe;
mod keyframe_animation;
mod sprite;

pub use keyframe::{KeyFrame, Pose};
pub use keyframe_animation::KeyFrameAnimation;
pub use sprite::{SpriteSheet, SpriteAnimation};

use crate::render::TransformStack;

/// Something that advances with time and contributes a transform
pub trait Animation {
    /// Advance to the frame timestamp `time_ms`
    fn update(&mut self, time_ms: f64);

    /// Multiply the current pipeline transform by the animation's transform.
    /// Does not advance time.
    fn apply<S: TransformStack + ?Sized>(&self, stack: &mut S);
}
