/// Frame-rate estimate over a rolling window.
#[derive(Debug, Clone)]
pub struct FpsSampler {
    window_secs: f32,
    elapsed: f32,
    frames: u32,
}

impl FpsSampler {
    pub fn new(window_secs: f32) -> Self {
        Self {
            window_secs: window_secs.max(f32::EPSILON),
            elapsed: 0.0,
            frames: 0,
        }
    }

    /// Count one frame. Returns the average FPS each time a window closes.
    pub fn sample(&mut self, dt: f32) -> Option<f32> {
        self.frames += 1;
        self.elapsed += dt;
        if self.elapsed < self.window_secs {
            return None;
        }
        let fps = self.frames as f32 / self.elapsed;
        self.frames = 0;
        self.elapsed = 0.0;
        Some(fps)
    }
}

impl Default for FpsSampler {
    fn default() -> Self {
        Self::new(1.0)
    }
}
