use std::time::Instant;

/// Time for one frame: seconds since the clock started and since the last tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    pub now: f64,
    pub dt: f32,
}

pub trait FrameClock {
    /// Advance to the next frame.
    fn tick(&mut self) -> FrameTime;
}

/// Monotonic wall clock. The first tick has a zero delta.
pub struct SystemClock {
    start: Instant,
    last: Option<Instant>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            last: None,
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for SystemClock {
    fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = self
            .last
            .map_or(0.0, |last| now.duration_since(last).as_secs_f32());
        self.last = Some(now);
        FrameTime {
            now: now.duration_since(self.start).as_secs_f64(),
            dt,
        }
    }
}

/// Fixed-step clock for tests and offline playback.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: f64,
    step: f32,
}

impl ManualClock {
    pub fn new(step: f32) -> Self {
        Self { now: 0.0, step }
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn set_step(&mut self, step: f32) {
        self.step = step;
    }

    /// Advance by an arbitrary delta instead of the fixed step.
    pub fn advance(&mut self, dt: f32) -> FrameTime {
        self.now += f64::from(dt);
        FrameTime { now: self.now, dt }
    }
}

impl FrameClock for ManualClock {
    fn tick(&mut self) -> FrameTime {
        self.advance(self.step)
    }
}
