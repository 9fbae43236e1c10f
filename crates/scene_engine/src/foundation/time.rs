//! Frame timing utilities

use std::time::Instant;

/// Largest delta handed to systems; longer stalls (debugger, window drag) are clamped
pub const MAX_FRAME_DELTA: f32 = 0.25;

/// Frame timer producing the `delta_time` fed to `World::update`
#[derive(Debug, Clone)]
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Advance from the wall clock (call once per frame)
    pub fn update(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.advance(elapsed)
    }

    /// Advance by a fixed step, for headless or deterministic stepping
    pub fn tick_fixed(&mut self, step: f32) -> f32 {
        self.last_frame = Instant::now();
        self.advance(step)
    }

    fn advance(&mut self, elapsed: f32) -> f32 {
        self.delta_time = elapsed.clamp(0.0, MAX_FRAME_DELTA);
        self.total_time += self.delta_time;
        self.frame_count += 1;
        self.delta_time
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total simulated time since timer creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the average FPS since timer creation
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_ticks_accumulate() {
        let mut timer = Timer::new();
        for _ in 0..60 {
            timer.tick_fixed(1.0 / 60.0);
        }
        assert_eq!(timer.frame_count(), 60);
        assert!((timer.total_time() - 1.0).abs() < 1e-4);
        assert!((timer.average_fps() - 60.0).abs() < 0.1);
    }

    #[test]
    fn test_large_delta_is_clamped() {
        let mut timer = Timer::new();
        assert_eq!(timer.tick_fixed(3.0), MAX_FRAME_DELTA);
        assert_eq!(timer.tick_fixed(-1.0), 0.0);
    }
}
