use crate::{GazeSample, GestureEvent, GestureKind, GestureSource, HandSample, SwipeDirection};
use memlens_config::GestureConfig;
use tracing::{debug, trace};

/// Turns polled hand/gaze samples into debounced [`GestureEvent`]s.
///
/// Every gesture kind shares one cooldown: while it runs, the detectors are
/// skipped entirely. Pinch and air tap fire on the rising edge only; air tap
/// additionally keeps its own minimum spacing. When the hand is not tracked,
/// a gaze dwell stands in.
///
/// Events are queued and handed out by [`drain_events`](Self::drain_events);
/// nothing here navigates panels.
pub struct HandControls {
    config: GestureConfig,
    source: Option<Box<dyn GestureSource>>,
    last_gesture_time: Option<f64>,
    last_air_tap_time: Option<f64>,
    was_pinched: bool,
    was_tapping: bool,
    dwell_elapsed: f32,
    dwell_fired: bool,
    events: Vec<GestureEvent>,
}

impl HandControls {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            source: None,
            last_gesture_time: None,
            last_air_tap_time: None,
            was_pinched: false,
            was_tapping: false,
            dwell_elapsed: 0.0,
            dwell_fired: false,
            events: Vec::new(),
        }
    }

    pub fn set_source(&mut self, source: Box<dyn GestureSource>) {
        self.source = Some(source);
    }

    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Take all gestures recognised since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<GestureEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn set_gesture_enabled(&mut self, kind: GestureKind, enabled: bool) {
        match kind {
            GestureKind::Pinch => self.config.pinch_enabled = enabled,
            GestureKind::Swipe => self.config.swipe_enabled = enabled,
            GestureKind::AirTap => self.config.air_tap_enabled = enabled,
            GestureKind::Gaze => {
                self.config.gaze_enabled = enabled;
                self.reset_dwell();
            }
        }
        debug!(%kind, enabled, "Gesture toggled");
    }

    pub fn is_gesture_enabled(&self, kind: GestureKind) -> bool {
        match kind {
            GestureKind::Pinch => self.config.pinch_enabled,
            GestureKind::Swipe => self.config.swipe_enabled,
            GestureKind::AirTap => self.config.air_tap_enabled,
            GestureKind::Gaze => self.config.gaze_enabled,
        }
    }

    pub fn set_cooldown(&mut self, secs: f32) {
        self.config.cooldown_secs = secs.max(0.0);
    }

    pub fn set_swipe_threshold(&mut self, threshold: f32) {
        self.config.swipe_threshold = threshold.max(0.0);
    }

    pub fn set_dwell_time(&mut self, secs: f32) {
        self.config.dwell_secs = secs.max(0.0);
    }

    pub fn set_air_tap_spacing(&mut self, secs: f32) {
        self.config.air_tap_spacing_secs = secs.max(0.0);
    }

    /// Poll the source once and queue any gesture it shows.
    pub fn update(&mut self, now: f64, dt: f32) {
        if self.cooling_down(now) {
            trace!(now, "Gesture cooldown active");
            return;
        }

        let hand_enabled = self.config.pinch_enabled
            || self.config.swipe_enabled
            || self.config.air_tap_enabled;
        let gaze_enabled = self.config.gaze_enabled;

        let Some(source) = self.source.as_mut() else {
            return;
        };
        let hand = if hand_enabled { source.poll_hand() } else { None };
        let gaze = if hand.is_none() && gaze_enabled {
            source.poll_gaze()
        } else {
            None
        };

        match hand {
            Some(sample) => {
                self.reset_dwell();
                self.detect_hand(sample, now);
            }
            None => {
                self.was_pinched = false;
                self.was_tapping = false;
                if gaze_enabled {
                    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
                    self.detect_gaze(gaze, now, dt);
                }
            }
        }
    }

    /// Inject a gesture as if a detector had seen it. Goes through the same
    /// enable, cooldown and air-tap spacing checks; returns whether it fired.
    /// Swipes without a direction count as right swipes.
    pub fn trigger_gesture(
        &mut self,
        kind: GestureKind,
        direction: Option<SwipeDirection>,
        now: f64,
    ) -> bool {
        if !self.is_gesture_enabled(kind) {
            debug!(%kind, "Ignoring trigger for disabled gesture");
            return false;
        }
        if self.cooling_down(now) {
            trace!(%kind, now, "Trigger dropped by cooldown");
            return false;
        }
        let event = match kind {
            GestureKind::Swipe => GestureEvent::swipe(direction.unwrap_or(SwipeDirection::Right)),
            GestureKind::AirTap => {
                if !self.air_tap_spaced(now) {
                    trace!(now, "Air tap dropped by spacing");
                    return false;
                }
                self.last_air_tap_time = Some(now);
                GestureEvent::new(kind)
            }
            _ => GestureEvent::new(kind),
        };
        self.accept(event, now);
        true
    }

    fn detect_hand(&mut self, sample: HandSample, now: f64) {
        let pinch_rising = sample.pinched && !self.was_pinched;
        let tap_rising = sample.air_tap && !self.was_tapping;
        self.was_pinched = sample.pinched;
        self.was_tapping = sample.air_tap;

        if pinch_rising && self.config.pinch_enabled && !self.cooling_down(now) {
            self.accept(GestureEvent::new(GestureKind::Pinch), now);
        }

        let vx = sample.palm_velocity.x;
        if self.config.swipe_enabled
            && vx.is_finite()
            && vx.abs() > self.config.swipe_threshold
            && !self.cooling_down(now)
        {
            let direction = if vx > 0.0 {
                SwipeDirection::Right
            } else {
                SwipeDirection::Left
            };
            self.accept(GestureEvent::swipe(direction), now);
        }

        if tap_rising
            && self.config.air_tap_enabled
            && !self.cooling_down(now)
            && self.air_tap_spaced(now)
        {
            self.last_air_tap_time = Some(now);
            self.accept(GestureEvent::new(GestureKind::AirTap), now);
        }
    }

    fn detect_gaze(&mut self, gaze: Option<GazeSample>, now: f64, dt: f32) {
        match gaze {
            Some(GazeSample { on_target: true }) => {
                if self.dwell_fired {
                    return;
                }
                self.dwell_elapsed += dt;
                if self.dwell_elapsed >= self.config.dwell_secs {
                    self.dwell_elapsed = 0.0;
                    self.dwell_fired = true;
                    self.accept(GestureEvent::new(GestureKind::Gaze), now);
                }
            }
            _ => self.reset_dwell(),
        }
    }

    fn reset_dwell(&mut self) {
        self.dwell_elapsed = 0.0;
        self.dwell_fired = false;
    }

    fn cooling_down(&self, now: f64) -> bool {
        self.last_gesture_time
            .is_some_and(|last| now - last < f64::from(self.config.cooldown_secs))
    }

    fn air_tap_spaced(&self, now: f64) -> bool {
        self.last_air_tap_time
            .map_or(true, |last| now - last >= f64::from(self.config.air_tap_spacing_secs))
    }

    fn accept(&mut self, event: GestureEvent, now: f64) {
        self.last_gesture_time = Some(now);
        debug!(kind = %event.kind, direction = ?event.direction, now, "Gesture detected");
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Source whose next samples the test sets directly.
    #[derive(Clone, Default)]
    struct Puppet(Rc<RefCell<(Option<HandSample>, Option<GazeSample>)>>);

    impl Puppet {
        fn hand(&self, sample: HandSample) {
            self.0.borrow_mut().0 = Some(sample);
        }
        fn lose_hand(&self, on_target: bool) {
            *self.0.borrow_mut() = (None, Some(GazeSample { on_target }));
        }
    }

    impl GestureSource for Puppet {
        fn poll_hand(&mut self) -> Option<HandSample> {
            self.0.borrow().0
        }
        fn poll_gaze(&mut self) -> Option<GazeSample> {
            self.0.borrow().1
        }
    }

    fn controls() -> (HandControls, Puppet) {
        let puppet = Puppet::default();
        let mut controls = HandControls::new(GestureConfig::default());
        controls.set_source(Box::new(puppet.clone()));
        (controls, puppet)
    }

    fn pinched() -> HandSample {
        HandSample {
            pinched: true,
            ..HandSample::default()
        }
    }

    #[test]
    fn triggers_inside_cooldown_are_dropped() {
        let (mut c, _) = controls();
        assert!(c.trigger_gesture(GestureKind::Pinch, None, 0.0));
        assert!(!c.trigger_gesture(GestureKind::Pinch, None, 0.3));
        assert_eq!(c.drain_events().len(), 1);
    }

    #[test]
    fn triggers_past_cooldown_both_fire() {
        let (mut c, _) = controls();
        assert!(c.trigger_gesture(GestureKind::Pinch, None, 0.0));
        assert!(c.trigger_gesture(GestureKind::Swipe, Some(SwipeDirection::Left), 0.6));
        let events = c.drain_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], GestureEvent::swipe(SwipeDirection::Left));
    }

    #[test]
    fn held_pinch_fires_once() {
        let (mut c, puppet) = controls();
        puppet.hand(HandSample::default());
        c.update(0.0, 0.016);
        puppet.hand(pinched());
        for frame in 1..200 {
            c.update(frame as f64 * 0.016, 0.016);
        }
        let events = c.drain_events();
        assert_eq!(events, vec![GestureEvent::new(GestureKind::Pinch)]);
    }

    #[test]
    fn pinch_refires_after_release() {
        let (mut c, puppet) = controls();
        puppet.hand(pinched());
        c.update(0.0, 0.016);
        puppet.hand(HandSample::default());
        c.update(1.0, 0.016);
        puppet.hand(pinched());
        c.update(2.0, 0.016);
        assert_eq!(c.drain_events().len(), 2);
    }

    #[test]
    fn swipe_direction_follows_velocity_sign() {
        let (mut c, puppet) = controls();
        puppet.hand(HandSample {
            palm_velocity: Vec3::new(-0.9, 0.0, 0.0),
            ..HandSample::default()
        });
        c.update(0.0, 0.016);
        puppet.hand(HandSample {
            palm_velocity: Vec3::new(0.9, 0.0, 0.0),
            ..HandSample::default()
        });
        c.update(0.1, 0.016);
        c.update(1.0, 0.016);

        let events = c.drain_events();
        assert_eq!(
            events,
            vec![
                GestureEvent::swipe(SwipeDirection::Left),
                GestureEvent::swipe(SwipeDirection::Right),
            ]
        );
    }

    #[test]
    fn slow_hand_is_not_a_swipe() {
        let (mut c, puppet) = controls();
        puppet.hand(HandSample {
            palm_velocity: Vec3::new(0.3, 2.0, 2.0),
            ..HandSample::default()
        });
        c.update(0.0, 0.016);
        assert!(c.drain_events().is_empty());
    }

    #[test]
    fn air_tap_keeps_its_own_spacing() {
        let (mut c, _) = controls();
        c.set_cooldown(0.2);
        assert!(c.trigger_gesture(GestureKind::AirTap, None, 0.0));
        // Past the shared cooldown but inside the one-second spacing.
        assert!(!c.trigger_gesture(GestureKind::AirTap, None, 0.5));
        assert!(c.trigger_gesture(GestureKind::Pinch, None, 0.5));
        assert!(c.trigger_gesture(GestureKind::AirTap, None, 1.1));
    }

    #[test]
    fn air_tap_detector_is_edge_triggered() {
        let (mut c, puppet) = controls();
        puppet.hand(HandSample {
            air_tap: true,
            ..HandSample::default()
        });
        c.update(0.0, 0.016);
        c.update(2.0, 0.016);
        assert_eq!(c.drain_events(), vec![GestureEvent::new(GestureKind::AirTap)]);
    }

    #[test]
    fn gaze_dwell_fires_once_per_acquisition() {
        let (mut c, puppet) = controls();
        c.set_dwell_time(1.0);
        puppet.lose_hand(true);

        let mut t = 0.0;
        for _ in 0..40 {
            c.update(t, 0.1);
            t += 0.1;
        }
        assert_eq!(c.drain_events(), vec![GestureEvent::new(GestureKind::Gaze)]);

        puppet.lose_hand(false);
        c.update(t, 0.1);
        puppet.lose_hand(true);
        for _ in 0..11 {
            t += 0.1;
            c.update(t, 0.1);
        }
        assert_eq!(c.drain_events().len(), 1);
    }

    #[test]
    fn lost_tracking_without_gaze_does_nothing() {
        let (mut c, puppet) = controls();
        c.set_gesture_enabled(GestureKind::Gaze, false);
        puppet.lose_hand(true);
        for frame in 0..100 {
            c.update(frame as f64 * 0.1, 0.1);
        }
        assert!(c.drain_events().is_empty());
    }

    #[test]
    fn disabled_gestures_do_not_fire() {
        let (mut c, puppet) = controls();
        c.set_gesture_enabled(GestureKind::Pinch, false);
        assert!(!c.is_gesture_enabled(GestureKind::Pinch));
        assert!(!c.trigger_gesture(GestureKind::Pinch, None, 0.0));
        puppet.hand(pinched());
        c.update(0.0, 0.016);
        assert!(c.drain_events().is_empty());
    }

    #[test]
    fn no_source_is_inert() {
        let mut c = HandControls::new(GestureConfig::default());
        c.update(0.0, 0.016);
        assert!(!c.has_source());
        assert!(c.drain_events().is_empty());
    }
}
