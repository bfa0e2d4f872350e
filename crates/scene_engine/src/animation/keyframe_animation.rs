//! Keyframe interpolation state machine
//!
//! An animation moves through three states: not started, between keyframe
//! `i` and `i + 1`, and settled at the final keyframe. Time is latched on the
//! first [`Animation::update`] call, so every instant is relative to it.
//!
//! The current keyframe index advances by at most one per update. A frame
//! that jumps across several keyframe boundaries catches up one segment per
//! call and interpolates against the stale segment in between.

use crate::foundation::math::{utils, Mat4};
use crate::render::TransformStack;
use super::{Animation, KeyFrame, Pose};

/// Sequence of keyframes with strictly increasing instants, plus the running
/// interpolation state
#[derive(Debug, Clone)]
pub struct KeyFrameAnimation {
    id: String,
    keyframes: Vec<KeyFrame>,
    start_time: Option<f64>,
    current_time: f64,
    current_keyframe: usize,
    running: bool,
    started_moving: bool,
    transform: Mat4,
}

impl KeyFrameAnimation {
    /// Create an animation with no keyframes
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            keyframes: Vec::new(),
            start_time: None,
            current_time: 0.0,
            current_keyframe: 0,
            running: false,
            started_moving: false,
            transform: Mat4::identity(),
        }
    }

    /// Descriptor id of the animation
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Append a keyframe.
    ///
    /// The keyframe is kept only if its instant is finite and either the
    /// list is empty or the instant is strictly after the last one; otherwise
    /// it is dropped and `false` is returned.
    pub fn add_key_frame(&mut self, keyframe: KeyFrame) -> bool {
        let instant = keyframe.instant_ms();
        let accepted = instant.is_finite()
            && self.keyframes.last().map_or(true, |last| instant > last.instant_ms());
        if accepted {
            self.keyframes.push(keyframe);
        }
        accepted
    }

    /// Builder form of [`Self::add_key_frame`]
    pub fn with_key_frame(mut self, keyframe: KeyFrame) -> Self {
        self.add_key_frame(keyframe);
        self
    }

    /// Linear interpolation between two pose components
    pub fn interpolate(from: f32, to: f32, percentage: f32) -> f32 {
        utils::lerp(from, to, percentage)
    }

    /// Stored keyframes, ordered by instant
    pub fn keyframes(&self) -> &[KeyFrame] {
        &self.keyframes
    }

    /// Index of the keyframe the current segment starts at
    pub fn current_keyframe(&self) -> usize {
        self.current_keyframe
    }

    /// Milliseconds elapsed since the first update
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Timestamp latched by the first update
    pub fn start_time(&self) -> Option<f64> {
        self.start_time
    }

    /// Whether elapsed time has reached the first keyframe instant.
    ///
    /// Nodes driven by this animation are hidden until it has.
    pub fn started_moving(&self) -> bool {
        self.started_moving
    }

    /// Whether the animation is between its first update and the final
    /// keyframe
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether the animation has settled on its final keyframe
    pub fn is_finished(&self) -> bool {
        self.start_time.is_some()
            && !self.keyframes.is_empty()
            && self.current_keyframe == self.keyframes.len() - 1
    }

    /// Transform computed by the last update
    pub fn transform(&self) -> &Mat4 {
        &self.transform
    }

    /// Return to the not-started state; keyframes are kept
    pub fn reset(&mut self) {
        self.start_time = None;
        self.current_time = 0.0;
        self.current_keyframe = 0;
        self.running = false;
        self.started_moving = false;
        self.transform = Mat4::identity();
    }
}

impl Animation for KeyFrameAnimation {
    fn update(&mut self, time_ms: f64) {
        let start = *self.start_time.get_or_insert(time_ms);
        self.current_time = time_ms - start;

        let Some(first) = self.keyframes.first() else {
            return;
        };
        if self.current_time >= first.instant_ms() {
            self.started_moving = true;
        }

        let last = self.keyframes.len() - 1;
        if self.current_keyframe < last
            && self.current_time >= self.keyframes[self.current_keyframe + 1].instant_ms()
        {
            self.current_keyframe += 1;
        }

        if self.current_keyframe == last {
            self.transform = self.keyframes[last].pose().to_matrix();
            self.running = false;
            return;
        }
        self.running = true;

        let from = &self.keyframes[self.current_keyframe];
        let to = &self.keyframes[self.current_keyframe + 1];
        let percentage = ((self.current_time - from.instant_ms()) / (to.instant_ms() - from.instant_ms())) as f32;

        self.transform = Pose::interpolate(from.pose(), to.pose(), percentage).to_matrix();
    }

    fn apply<S: TransformStack + ?Sized>(&self, stack: &mut S) {
        stack.multiply_matrix(&self.transform);
    }
}
