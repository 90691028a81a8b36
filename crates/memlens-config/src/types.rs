use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where the story comes from.
    pub story: StoryConfig,
    /// Panel timing and frame pacing.
    pub playback: PlaybackConfig,
    /// Gesture thresholds and per-gesture switches.
    pub gestures: GestureConfig,
    /// Initial parallax material uniforms.
    pub material: MaterialConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoryConfig {
    /// Path of a JSON story document. `None` shows the built-in placeholder story.
    pub source: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Advance to the next panel automatically.
    pub auto_advance: bool,
    /// Seconds a panel stays on screen before auto-advance.
    pub auto_advance_delay_secs: f32,
    /// Wrap from the last panel back to the first.
    pub loop_panels: bool,
    /// Frame rate the loop is paced at, and the floor for the performance monitor.
    pub target_fps: f32,
    /// Halve animation speed once if the measured frame rate drops below target.
    pub performance_monitoring: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            auto_advance: true,
            auto_advance_delay_secs: 8.0,
            loop_panels: true,
            target_fps: 30.0,
            performance_monitoring: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Global debounce shared by every gesture kind.
    pub cooldown_secs: f32,
    /// Horizontal palm speed (m/s) above which a swipe fires.
    pub swipe_threshold: f32,
    /// Continuous gaze time needed to fire a dwell.
    pub dwell_secs: f32,
    /// Extra minimum spacing between two air taps, on top of the cooldown.
    pub air_tap_spacing_secs: f32,
    pub pinch_enabled: bool,
    pub swipe_enabled: bool,
    pub air_tap_enabled: bool,
    /// Gaze dwell fallback when hand tracking is unavailable.
    pub gaze_enabled: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: 0.5,
            swipe_threshold: 0.5,
            dwell_secs: 2.0,
            air_tap_spacing_secs: 1.0,
            pinch_enabled: true,
            swipe_enabled: true,
            air_tap_enabled: true,
            gaze_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConfig {
    /// Depth texture displacement scale.
    pub depth_scale: f32,
    /// Amplitude multiplier for the parallax sway terms.
    pub parallax_strength: f32,
    /// Multiplier applied to frame time before it reaches the animation clock.
    pub animation_speed: f32,
    pub zoom_level: f32,
    /// UV pan added to the (0.5, 0.5) base, as `[x, y]`.
    pub pan_offset: [f32; 2],
    pub rotation_degrees: f32,
    pub ken_burns_enabled: bool,
    pub depth_parallax_enabled: bool,
    pub mask_parallax_enabled: bool,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            depth_scale: 0.1,
            parallax_strength: 0.5,
            animation_speed: 1.0,
            zoom_level: 1.0,
            pan_offset: [0.0, 0.0],
            rotation_degrees: 0.0,
            ken_burns_enabled: true,
            depth_parallax_enabled: true,
            mask_parallax_enabled: false,
        }
    }
}
