//! Gesture input: polled hand/gaze samples in, debounced gesture events out.

pub mod hand;
pub mod script;

pub use hand::HandControls;
pub use script::{ScriptCue, ScriptGesture, ScriptedGestureSource};

use glam::Vec3;
use std::fmt;

/// Kinds of gesture [`HandControls`] can recognise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureKind {
    Pinch,
    Swipe,
    AirTap,
    /// Gaze held on the target for the dwell time.
    Gaze,
}

impl fmt::Display for GestureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pinch => "pinch",
            Self::Swipe => "swipe",
            Self::AirTap => "air_tap",
            Self::Gaze => "gaze",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    Left,
    Right,
}

/// A recognised gesture. Only swipes carry a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureEvent {
    pub kind: GestureKind,
    pub direction: Option<SwipeDirection>,
}

impl GestureEvent {
    pub fn new(kind: GestureKind) -> Self {
        Self {
            kind,
            direction: None,
        }
    }

    pub fn swipe(direction: SwipeDirection) -> Self {
        Self {
            kind: GestureKind::Swipe,
            direction: Some(direction),
        }
    }
}

/// One frame of hand tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HandSample {
    pub pinched: bool,
    pub air_tap: bool,
    /// Palm velocity in m/s; +x is the wearer's right.
    pub palm_velocity: Vec3,
}

/// One frame of gaze tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GazeSample {
    pub on_target: bool,
}

/// Hand and gaze tracking, polled once per frame.
///
/// `None` from `poll_hand` means tracking is lost or unsupported, which is
/// not an error.
pub trait GestureSource {
    fn poll_hand(&mut self) -> Option<HandSample>;
    fn poll_gaze(&mut self) -> Option<GazeSample>;
}
