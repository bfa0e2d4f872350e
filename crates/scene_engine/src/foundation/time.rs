//! Frame time source for the external frame loop
//!
//! Animations consume millisecond timestamps. `FrameClock` produces them
//! either from the wall clock or from a fixed simulated step, which keeps
//! headless runs deterministic.

use std::time::Instant;

/// Millisecond timestamp source, advanced once per frame
#[derive(Debug, Clone)]
pub struct FrameClock {
    origin: Instant,
    fixed_step_ms: Option<f64>,
    now_ms: f64,
    delta_ms: f64,
    frame_count: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Create a clock driven by the wall clock
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            fixed_step_ms: None,
            now_ms: 0.0,
            delta_ms: 0.0,
            frame_count: 0,
        }
    }

    /// Create a clock that advances by exactly `step_ms` per tick
    pub fn fixed_step(step_ms: f64) -> Self {
        Self {
            fixed_step_ms: Some(step_ms),
            ..Self::new()
        }
    }

    /// Advance to the next frame and return its timestamp in milliseconds
    pub fn tick(&mut self) -> f64 {
        let next = match self.fixed_step_ms {
            // The first frame is stamped at zero
            Some(_) if self.frame_count == 0 => 0.0,
            Some(step) => self.now_ms + step,
            None => self.origin.elapsed().as_secs_f64() * 1000.0,
        };
        self.delta_ms = next - self.now_ms;
        self.now_ms = next;
        self.frame_count += 1;
        self.now_ms
    }

    /// Timestamp of the current frame in milliseconds
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Time between the last two ticks in milliseconds
    pub fn delta_ms(&self) -> f64 {
        self.delta_ms
    }

    /// Number of ticks so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Whether the clock runs on a simulated fixed step
    pub fn is_fixed_step(&self) -> bool {
        self.fixed_step_ms.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_step_clock_is_deterministic() {
        let mut clock = FrameClock::fixed_step(16.0);
        assert_eq!(clock.tick(), 0.0);
        assert_eq!(clock.tick(), 16.0);
        assert_eq!(clock.tick(), 32.0);
        assert_eq!(clock.delta_ms(), 16.0);
        assert_eq!(clock.frame_count(), 3);
    }

    #[test]
    fn test_wall_clock_is_monotonic() {
        let mut clock = FrameClock::new();
        let first = clock.tick();
        let second = clock.tick();
        assert!(second >= first);
        assert!(!clock.is_fixed_step());
    }
}
