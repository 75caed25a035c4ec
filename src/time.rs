//! Frame clock.
//!
//! Produces the per-frame delta fed to the particle updater and the scroll
//! damping, plus a frame-rate sample every half second for the debug log.
//!
//! # Example
//!
//! ```ignore
//! use driftfield::time::Time;
//!
//! let mut time = Time::new();
//!
//! // Once per redraw:
//! let delta = time.update();
//! if let Some(fps) = time.take_fps_sample() {
//!     log::debug!("frame {}: {:.1} fps", time.frame(), fps);
//! }
//! ```

use std::time::{Duration, Instant};

/// Time tracking for the frame loop.
#[derive(Debug)]
pub struct Time {
    last_frame: Instant,
    delta_secs: f32,
    frame_count: u64,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
    /// Frame rate measured over the last interval, until taken.
    fps_sample: Option<f32>,
}

impl Time {
    /// Create a new clock starting from now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            delta_secs: 0.0,
            frame_count: 0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            fps_sample: None,
        }
    }

    /// Advance one frame and return the delta in seconds.
    pub fn update(&mut self) -> f32 {
        let now = Instant::now();

        self.delta_secs = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps_sample = Some(frames_since as f32 / fps_elapsed.as_secs_f32());
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        self.delta_secs
    }

    /// Time since last frame in seconds.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// The frame rate measured since the previous sample, once per interval.
    pub fn take_fps_sample(&mut self) -> Option<f32> {
        self.fps_sample.take()
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_time_new() {
        let mut time = Time::new();
        assert_eq!(time.frame(), 0);
        assert_eq!(time.delta(), 0.0);
        assert_eq!(time.take_fps_sample(), None);
    }

    #[test]
    fn test_time_update() {
        let mut time = Time::new();
        thread::sleep(Duration::from_millis(10));
        let delta = time.update();

        assert!(delta >= 0.01);
        assert_eq!(time.delta(), delta);
        assert_eq!(time.frame(), 1);
    }

    #[test]
    fn test_fps_sampled_once_per_interval() {
        let mut time = Time::new();
        time.fps_update_interval = Duration::from_millis(20);

        time.update();
        assert_eq!(time.take_fps_sample(), None);

        thread::sleep(Duration::from_millis(25));
        time.update();
        let fps = time.take_fps_sample().unwrap();
        // Two frames in at least 25ms.
        assert!(fps > 0.0 && fps <= 80.0);
        assert_eq!(time.take_fps_sample(), None);

        time.update();
        assert_eq!(time.take_fps_sample(), None);
    }
}
