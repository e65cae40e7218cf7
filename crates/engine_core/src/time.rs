//! Fixed-step simulation clock.

use std::time::Duration;

/// Clock stepped at a fixed rate. Sessions never read the wall clock, so a
/// script replays identically.
#[derive(Debug, Clone)]
pub struct Time {
    step: Duration,
    elapsed: Duration,
    frame_count: u64,
}

impl Default for Time {
    fn default() -> Self {
        Self::fixed(60.0)
    }
}

impl Time {
    /// A clock ticking `hz` times per second. `hz` must be positive.
    pub fn fixed(hz: f64) -> Self {
        Self {
            step: Duration::from_secs_f64(1.0 / hz),
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Advance one step; returns its length in seconds.
    pub fn tick(&mut self) -> f32 {
        self.elapsed += self.step;
        self.frame_count += 1;
        self.step.as_secs_f32()
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    pub fn step_seconds(&self) -> f32 {
        self.step.as_secs_f32()
    }

    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_ticks_accumulate_without_drift() {
        let mut time = Time::fixed(4.0);
        for _ in 0..8 {
            assert_eq!(time.tick(), 0.25);
        }
        assert_eq!(time.elapsed_seconds(), 2.0);
        assert_eq!(time.frame_count(), 8);
    }

    #[test]
    fn time_default_runs_at_sixty_hertz() {
        let time = Time::default();
        assert_eq!(time.step(), Duration::from_secs_f64(1.0 / 60.0));
        assert_eq!(time.frame_count(), 0);
    }
}
