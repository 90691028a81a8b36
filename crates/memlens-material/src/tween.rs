use glam::Vec2;
use memlens_story::KenBurnsParams;

/// Linear Ken Burns move from a start zoom/pan to an end zoom/pan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KenBurnsTween {
    start_scale: f32,
    end_scale: f32,
    from_pan: Vec2,
    to_pan: Vec2,
    duration: f32,
    elapsed: f32,
}

impl KenBurnsTween {
    pub fn new(params: &KenBurnsParams, from_pan: Vec2) -> Self {
        Self {
            start_scale: params.start_scale,
            end_scale: params.end_scale,
            from_pan,
            to_pan: params.pan,
            duration: params.duration_secs,
            elapsed: 0.0,
        }
    }

    /// Advance by `dt` seconds and return the new (scale, pan).
    pub fn advance(&mut self, dt: f32) -> (f32, Vec2) {
        self.elapsed = (self.elapsed + dt).min(self.duration.max(0.0));
        self.sample()
    }

    pub fn sample(&self) -> (f32, Vec2) {
        let t = self.progress();
        (
            self.start_scale + (self.end_scale - self.start_scale) * t,
            self.from_pan.lerp(self.to_pan, t),
        )
    }

    /// 0.0 at the start, 1.0 once `duration` has elapsed. Zero-length moves are complete.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }
}
