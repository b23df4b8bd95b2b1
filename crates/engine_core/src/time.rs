//! Frame clock for the render loop.
//!
//! Scene motion is advanced per frame, not per second, so the wall-clock
//! delta here only feeds diagnostics (frame rate logging).

use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct Time {
    started: Instant,
    previous: Instant,
    /// Wall-clock length of the most recent frame.
    frame_duration: Duration,
    frames: u64,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            previous: now,
            frame_duration: Duration::ZERO,
            frames: 0,
        }
    }

    /// Mark the start of a frame.
    pub fn update(&mut self) {
        let now = Instant::now();
        self.frame_duration = now.duration_since(self.previous);
        self.previous = now;
        self.frames += 1;
    }

    pub fn delta_seconds(&self) -> f32 {
        self.frame_duration.as_secs_f32()
    }

    /// Seconds from construction to the latest `update`.
    pub fn elapsed_seconds(&self) -> f32 {
        self.previous.duration_since(self.started).as_secs_f32()
    }

    /// Frames started so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Instantaneous rate from the last frame; 0 before the first one.
    pub fn fps(&self) -> f32 {
        let seconds = self.delta_seconds();
        if seconds > 0.0 {
            seconds.recip()
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_counts_frames() {
        let mut time = Time::new();
        assert_eq!(time.frame_count(), 0);
        time.update();
        time.update();
        assert_eq!(time.frame_count(), 2);
        assert!(time.elapsed_seconds() >= time.delta_seconds());
    }

    #[test]
    fn fps_is_zero_before_first_frame() {
        let time = Time::new();
        assert_eq!(time.fps(), 0.0);
    }
}
