use std::time::{Duration, Instant};

use super::integrator::clamp_delta;

/// Frame counter and clamped frame delta.
#[derive(Debug, Clone)]
pub struct FrameClock {
    frame: u64,
    delta_time: f32,
    max_delta_time: f32,
    last_instant: Option<Instant>,
    frame_started: Option<Instant>,
}

impl FrameClock {
    pub fn new(max_delta_time: f32) -> Self {
        Self {
            frame: 0,
            delta_time: 0.0,
            max_delta_time,
            last_instant: None,
            frame_started: None,
        }
    }

    /// Starts a new frame with a host-supplied delta (seconds).
    pub fn advance(&mut self, dt: f32) -> f32 {
        self.frame += 1;
        self.delta_time = clamp_delta(dt, self.max_delta_time);
        self.frame_started = Some(Instant::now());
        self.delta_time
    }

    /// Starts a new frame using wall-clock time since the previous call.
    /// The first call yields a zero delta.
    pub fn advance_from(&mut self, now: Instant) -> f32 {
        let dt = self
            .last_instant
            .map(|last| now.saturating_duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        self.last_instant = Some(now);
        self.advance(dt)
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Time spent since the current frame started.
    pub fn frame_elapsed(&self) -> Duration {
        self.frame_started
            .map(|start| start.elapsed())
            .unwrap_or_default()
    }
}
