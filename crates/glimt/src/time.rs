//! Frame clock.
//!
//! [`Time`] is ticked once at the top of each frame by the sandbox. Systems
//! read the previous frame's delta from it; the smoothed FPS estimate is
//! what a debug overlay would display.

use std::time::{Duration, Instant};

/// Per-frame timing: delta, total elapsed, frame counter, smoothed FPS.
#[derive(Debug, Clone, Copy)]
pub struct Time {
    startup: Instant,
    last_tick: Instant,
    delta: Duration,
    frames: u64,
    fps_smoothed: f32,
}

impl Time {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            startup: now,
            last_tick: now,
            delta: Duration::ZERO,
            frames: 0,
            fps_smoothed: 0.0,
        }
    }

    /// Advance the clock. Call exactly once per frame, before anything that
    /// reads [`delta_secs`](Self::delta_secs).
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.delta = now - self.last_tick;
        self.last_tick = now;
        self.frames += 1;

        let dt = self.delta.as_secs_f32();
        if dt > 0.0 {
            let instant_fps = 1.0 / dt;
            // Exponential moving average keeps the readout legible.
            self.fps_smoothed = if self.frames == 1 {
                instant_fps
            } else {
                self.fps_smoothed + (instant_fps - self.fps_smoothed) * 0.1
            };
        }
    }

    /// Duration of the previous frame in seconds.
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Seconds since the clock was created.
    pub fn elapsed_secs(&self) -> f32 {
        (self.last_tick - self.startup).as_secs_f32()
    }

    /// Frames ticked so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Smoothed frames-per-second estimate.
    pub fn fps(&self) -> f32 {
        self.fps_smoothed
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

    #[test]
    fn tick_advances_frame_counter_and_delta() {
        let mut time = Time::new();
        assert_eq!(time.frames(), 0);
        assert_eq!(time.delta_secs(), 0.0);

        std::thread::sleep(Duration::from_millis(2));
        time.tick();

        assert_eq!(time.frames(), 1);
        assert!(time.delta_secs() > 0.0);
        assert!(time.elapsed_secs() >= time.delta_secs());
    }
}
