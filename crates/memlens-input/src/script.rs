use crate::{GazeSample, GestureSource, HandSample};
use glam::Vec3;
use std::time::Instant;

/// Palm speed a scripted swipe reports, in m/s.
const SCRIPT_SWIPE_SPEED: f32 = 1.2;

/// What a scripted cue shows while it is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptGesture {
    Pinch,
    SwipeLeft,
    SwipeRight,
    AirTap,
    /// Hand out of view, gaze resting on the target.
    GazeDwell,
}

/// A gesture held from `at_secs` for `hold_secs`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptCue {
    pub at_secs: f64,
    pub hold_secs: f64,
    pub gesture: ScriptGesture,
}

impl ScriptCue {
    pub fn new(at_secs: f64, hold_secs: f64, gesture: ScriptGesture) -> Self {
        Self {
            at_secs,
            hold_secs,
            gesture,
        }
    }

    fn active_at(&self, t: f64) -> bool {
        t >= self.at_secs && t < self.at_secs + self.hold_secs
    }
}

/// Simulated tracking that replays a timeline of cues.
///
/// Outside any cue the hand is visible and idle. The timeline repeats every
/// `period_secs` when one is set. Time comes from an injectable clock so the
/// timeline can be stepped deterministically.
pub struct ScriptedGestureSource {
    cues: Vec<ScriptCue>,
    period_secs: Option<f64>,
    clock: Box<dyn FnMut() -> f64>,
}

impl ScriptedGestureSource {
    /// Timeline driven by wall-clock time since construction.
    pub fn new(cues: Vec<ScriptCue>) -> Self {
        let start = Instant::now();
        Self::with_clock(cues, move || start.elapsed().as_secs_f64())
    }

    pub fn with_clock(cues: Vec<ScriptCue>, clock: impl FnMut() -> f64 + 'static) -> Self {
        Self {
            cues,
            period_secs: None,
            clock: Box::new(clock),
        }
    }

    pub fn looping(mut self, period_secs: f64) -> Self {
        self.period_secs = (period_secs > 0.0).then_some(period_secs);
        self
    }

    /// A short tour: pause, resume, swipe forward and back, air tap, then a
    /// gaze dwell with the hand dropped. Repeats every 20 s.
    pub fn demo() -> Self {
        Self::new(vec![
            ScriptCue::new(3.0, 0.4, ScriptGesture::Pinch),
            ScriptCue::new(5.0, 0.4, ScriptGesture::Pinch),
            ScriptCue::new(7.0, 0.1, ScriptGesture::SwipeRight),
            ScriptCue::new(9.0, 0.1, ScriptGesture::SwipeLeft),
            ScriptCue::new(11.0, 0.2, ScriptGesture::AirTap),
            ScriptCue::new(13.0, 3.0, ScriptGesture::GazeDwell),
        ])
        .looping(20.0)
    }

    fn active(&mut self) -> Option<ScriptGesture> {
        let mut t = (self.clock)();
        if let Some(period) = self.period_secs {
            t = t.rem_euclid(period);
        }
        self.cues.iter().find(|c| c.active_at(t)).map(|c| c.gesture)
    }
}

impl GestureSource for ScriptedGestureSource {
    fn poll_hand(&mut self) -> Option<HandSample> {
        let idle = HandSample::default();
        match self.active() {
            None => Some(idle),
            Some(ScriptGesture::Pinch) => Some(HandSample {
                pinched: true,
                ..idle
            }),
            Some(ScriptGesture::AirTap) => Some(HandSample {
                air_tap: true,
                ..idle
            }),
            Some(ScriptGesture::SwipeLeft) => Some(HandSample {
                palm_velocity: Vec3::new(-SCRIPT_SWIPE_SPEED, 0.0, 0.0),
                ..idle
            }),
            Some(ScriptGesture::SwipeRight) => Some(HandSample {
                palm_velocity: Vec3::new(SCRIPT_SWIPE_SPEED, 0.0, 0.0),
                ..idle
            }),
            Some(ScriptGesture::GazeDwell) => None,
        }
    }

    fn poll_gaze(&mut self) -> Option<GazeSample> {
        Some(GazeSample {
            on_target: self.active() == Some(ScriptGesture::GazeDwell),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn stepped(cues: Vec<ScriptCue>) -> (ScriptedGestureSource, Rc<Cell<f64>>) {
        let now = Rc::new(Cell::new(0.0));
        let clock = Rc::clone(&now);
        (ScriptedGestureSource::with_clock(cues, move || clock.get()), now)
    }

    #[test]
    fn idle_hand_outside_cues() {
        let (mut source, _) = stepped(vec![ScriptCue::new(1.0, 0.5, ScriptGesture::Pinch)]);
        assert_eq!(source.poll_hand(), Some(HandSample::default()));
        assert_eq!(source.poll_gaze(), Some(GazeSample { on_target: false }));
    }

    #[test]
    fn cue_is_active_for_its_hold() {
        let (mut source, now) = stepped(vec![ScriptCue::new(1.0, 0.5, ScriptGesture::Pinch)]);
        now.set(1.2);
        assert!(source.poll_hand().unwrap().pinched);
        now.set(1.5);
        assert!(!source.poll_hand().unwrap().pinched);
    }

    #[test]
    fn gaze_cue_drops_the_hand() {
        let (mut source, now) =
            stepped(vec![ScriptCue::new(0.0, 2.0, ScriptGesture::GazeDwell)]);
        now.set(1.0);
        assert_eq!(source.poll_hand(), None);
        assert_eq!(source.poll_gaze(), Some(GazeSample { on_target: true }));
    }

    #[test]
    fn looping_timeline_repeats() {
        let (source, now) = stepped(vec![ScriptCue::new(1.0, 0.5, ScriptGesture::SwipeLeft)]);
        let mut source = source.looping(4.0);
        now.set(9.2);
        assert!(source.poll_hand().unwrap().palm_velocity.x < 0.0);
    }
}
