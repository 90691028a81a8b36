use crate::tween::KenBurnsTween;
use crate::{MaterialUniforms, RenderSurface};
use glam::Vec2;
use memlens_config::MaterialConfig;
use memlens_story::{KenBurnsParams, ParallaxParams};
use tracing::{debug, warn};

/// UV centre every offset is measured from.
const BASE_UV: Vec2 = Vec2::new(0.5, 0.5);

// Slow drift: frequencies in rad/s of animation time, amplitudes in UV units.
const KEN_BURNS_FREQ: Vec2 = Vec2::new(0.1, 0.15);
const KEN_BURNS_AMPLITUDE: Vec2 = Vec2::new(0.02, 0.015);
const KEN_BURNS_ZOOM_FREQ: f32 = 0.05;
const KEN_BURNS_ZOOM_AMPLITUDE: f32 = 0.02;
const DEPTH_SWAY_FREQ: Vec2 = Vec2::new(0.2, 0.25);
const DEPTH_SWAY_AMPLITUDE: f32 = 0.01;
const MASK_SWAY_FREQ: Vec2 = Vec2::new(0.18, 0.12);
const MASK_SWAY_AMPLITUDE: f32 = 0.005;

/// Per-surface animation state. Only [`ParallaxMaterial`] writes it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    pub uv_offset: Vec2,
    pub scale: f32,
    /// Radians.
    pub rotation: f32,
    pub time: f32,
    pub is_playing: bool,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            uv_offset: BASE_UV,
            scale: 1.0,
            rotation: 0.0,
            time: 0.0,
            is_playing: false,
        }
    }
}

/// Independent visual effects; enabled terms add into one UV offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Effects {
    pub ken_burns: bool,
    pub depth_parallax: bool,
    pub mask_parallax: bool,
}

/// Animated uniforms for one image surface.
///
/// Setters clamp to sane ranges and ignore non-finite input, so the
/// published offset and scale stay finite for any call sequence.
pub struct ParallaxMaterial {
    state: AnimationState,
    depth_scale: f32,
    parallax_strength: f32,
    animation_speed: f32,
    zoom_level: f32,
    pan_offset: Vec2,
    rotation_angle: f32,
    effects: Effects,
    tween: Option<KenBurnsTween>,
    surface: Option<Box<dyn RenderSurface>>,
}

impl ParallaxMaterial {
    pub fn new() -> Self {
        Self::from_config(&MaterialConfig::default())
    }

    pub fn from_config(config: &MaterialConfig) -> Self {
        let mut material = Self {
            state: AnimationState::default(),
            depth_scale: 0.1,
            parallax_strength: 0.5,
            animation_speed: 1.0,
            zoom_level: 1.0,
            pan_offset: Vec2::ZERO,
            rotation_angle: 0.0,
            effects: Effects {
                ken_burns: config.ken_burns_enabled,
                depth_parallax: config.depth_parallax_enabled,
                mask_parallax: config.mask_parallax_enabled,
            },
            tween: None,
            surface: None,
        };
        material.depth_scale = clamp_finite(config.depth_scale, 0.0, 10.0, material.depth_scale);
        material.parallax_strength =
            clamp_finite(config.parallax_strength, 0.0, 10.0, material.parallax_strength);
        material.animation_speed =
            clamp_finite(config.animation_speed, 0.0, 10.0, material.animation_speed);
        material.zoom_level = clamp_finite(config.zoom_level, 0.1, 10.0, material.zoom_level);
        let [x, y] = config.pan_offset;
        material.pan_offset = Vec2::new(
            clamp_finite(x, -1.0, 1.0, 0.0),
            clamp_finite(y, -1.0, 1.0, 0.0),
        );
        material.rotation_angle = clamp_finite(config.rotation_degrees, -360.0, 360.0, 0.0).to_radians();
        material.recompute();
        material
    }

    /// Attach the surface uniforms are pushed to, and push the current set.
    pub fn set_surface(&mut self, surface: Box<dyn RenderSurface>) {
        self.surface = Some(surface);
        self.push();
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn effects(&self) -> Effects {
        self.effects
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    pub fn animation_speed(&self) -> f32 {
        self.animation_speed
    }

    pub fn zoom_level(&self) -> f32 {
        self.zoom_level
    }

    pub fn pan_offset(&self) -> Vec2 {
        self.pan_offset
    }

    pub fn parallax_strength(&self) -> f32 {
        self.parallax_strength
    }

    pub fn uniforms(&self) -> MaterialUniforms {
        MaterialUniforms {
            uv_offset: self.state.uv_offset,
            scale: self.state.scale,
            rotation: self.state.rotation,
            depth_scale: self.depth_scale,
            parallax_strength: self.parallax_strength,
            time: self.state.time,
        }
    }

    pub fn start_animation(&mut self) {
        self.state.is_playing = true;
    }

    /// Stop and rewind. Calling it on a stopped material is a no-op.
    pub fn stop_animation(&mut self) {
        if !self.state.is_playing && self.state.time == 0.0 && self.tween.is_none() {
            return;
        }
        self.state.is_playing = false;
        self.state.time = 0.0;
        self.tween = None;
        self.recompute();
        self.push();
    }

    pub fn pause_animation(&mut self) {
        self.state.is_playing = false;
    }

    pub fn resume_animation(&mut self) {
        self.state.is_playing = true;
    }

    pub fn set_depth_scale(&mut self, value: f32) {
        if let Some(v) = checked("depth_scale", value, 0.0, 10.0) {
            self.depth_scale = v;
            self.push();
        }
    }

    pub fn set_parallax_strength(&mut self, value: f32) {
        if let Some(v) = checked("parallax_strength", value, 0.0, 10.0) {
            self.parallax_strength = v;
            self.recompute();
            self.push();
        }
    }

    pub fn set_animation_speed(&mut self, value: f32) {
        if let Some(v) = checked("animation_speed", value, 0.0, 10.0) {
            self.animation_speed = v;
        }
    }

    pub fn set_zoom_level(&mut self, value: f32) {
        if let Some(v) = checked("zoom_level", value, 0.1, 10.0) {
            self.zoom_level = v;
            self.recompute();
            self.push();
        }
    }

    pub fn set_pan_offset(&mut self, pan: Vec2) {
        let x = checked("pan_offset.x", pan.x, -1.0, 1.0);
        let y = checked("pan_offset.y", pan.y, -1.0, 1.0);
        if let (Some(x), Some(y)) = (x, y) {
            self.pan_offset = Vec2::new(x, y);
            self.recompute();
            self.push();
        }
    }

    pub fn set_rotation_angle(&mut self, degrees: f32) {
        if let Some(v) = checked("rotation_angle", degrees, -360.0, 360.0) {
            self.rotation_angle = v.to_radians();
            self.recompute();
            self.push();
        }
    }

    pub fn set_ken_burns_enabled(&mut self, enabled: bool) {
        self.effects.ken_burns = enabled;
        self.recompute();
        self.push();
    }

    pub fn set_depth_parallax_enabled(&mut self, enabled: bool) {
        self.effects.depth_parallax = enabled;
        self.recompute();
        self.push();
    }

    pub fn set_mask_parallax_enabled(&mut self, enabled: bool) {
        self.effects.mask_parallax = enabled;
        self.recompute();
        self.push();
    }

    /// Zoom from `start_scale` to `end_scale` while panning toward `pan`,
    /// linearly over `duration_secs` of animation time.
    pub fn apply_ken_burns(&mut self, params: &KenBurnsParams) {
        let finite = [params.start_scale, params.end_scale, params.pan.x, params.pan.y]
            .iter()
            .all(|v| v.is_finite());
        if !finite || !params.duration_secs.is_finite() {
            warn!(?params, "Ignoring Ken Burns parameters with non-finite values");
            return;
        }

        let params = KenBurnsParams {
            start_scale: params.start_scale.clamp(0.1, 10.0),
            end_scale: params.end_scale.clamp(0.1, 10.0),
            pan: params.pan.clamp(Vec2::splat(-1.0), Vec2::splat(1.0)),
            duration_secs: params.duration_secs,
        };
        let tween = KenBurnsTween::new(&params, self.pan_offset);
        let (scale, pan) = tween.sample();
        self.zoom_level = scale;
        self.pan_offset = pan;
        self.tween = if tween.is_finished() { None } else { Some(tween) };
        self.effects.ken_burns = true;
        debug!(
            start = params.start_scale,
            end = params.end_scale,
            duration = params.duration_secs,
            "Ken Burns applied"
        );
        self.recompute();
        self.push();
    }

    /// Hold zoom/pan and sway by depth; mask sway only when a mask exists.
    pub fn apply_parallax(&mut self, params: &ParallaxParams, has_mask: bool) {
        self.tween = None;
        self.effects.ken_burns = false;
        self.effects.depth_parallax = true;
        self.effects.mask_parallax = has_mask;
        self.set_zoom_level(params.zoom);
        self.set_pan_offset(params.pan);
        self.set_parallax_strength(params.strength);
        debug!(zoom = self.zoom_level, strength = self.parallax_strength, has_mask, "Parallax applied");
    }

    pub fn update(&mut self, dt: f32) {
        if !self.state.is_playing {
            return;
        }
        if !dt.is_finite() || dt < 0.0 {
            warn!(dt, "Ignoring invalid frame delta");
            return;
        }

        let step = dt * self.animation_speed;
        self.state.time += step;

        if let Some(tween) = &mut self.tween {
            let (scale, pan) = tween.advance(step);
            self.zoom_level = scale;
            self.pan_offset = pan;
            if tween.is_finished() {
                self.tween = None;
            }
        }

        self.recompute();
        self.push();
    }

    fn recompute(&mut self) {
        let t = self.state.time;
        let mut offset = BASE_UV + self.pan_offset;
        let mut scale = self.zoom_level;

        if self.effects.ken_burns {
            offset += Vec2::new(
                (t * KEN_BURNS_FREQ.x).sin(),
                (t * KEN_BURNS_FREQ.y).cos(),
            ) * KEN_BURNS_AMPLITUDE;
            scale *= 1.0 + (t * KEN_BURNS_ZOOM_FREQ).sin() * KEN_BURNS_ZOOM_AMPLITUDE;
        }
        if self.effects.depth_parallax {
            offset += Vec2::new(
                (t * DEPTH_SWAY_FREQ.x).sin(),
                (t * DEPTH_SWAY_FREQ.y).cos(),
            ) * (DEPTH_SWAY_AMPLITUDE * self.parallax_strength);
        }
        if self.effects.mask_parallax {
            offset += Vec2::new(
                (t * MASK_SWAY_FREQ.x).sin(),
                (t * MASK_SWAY_FREQ.y).cos(),
            ) * (MASK_SWAY_AMPLITUDE * self.parallax_strength);
        }

        self.state.uv_offset = offset;
        self.state.scale = scale;
        self.state.rotation = self.rotation_angle;
    }

    fn push(&mut self) {
        let uniforms = self.uniforms();
        if let Some(surface) = &mut self.surface {
            surface.apply(&uniforms);
        }
    }
}

impl Default for ParallaxMaterial {
    fn default() -> Self {
        Self::new()
    }
}

fn checked(field: &str, value: f32, min: f32, max: f32) -> Option<f32> {
    if value.is_finite() {
        Some(value.clamp(min, max))
    } else {
        warn!(field, value, "Ignoring non-finite material value");
        None
    }
}

fn clamp_finite(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<MaterialUniforms>>>);

    impl RenderSurface for Recorder {
        fn apply(&mut self, uniforms: &MaterialUniforms) {
            self.0.borrow_mut().push(*uniforms);
        }
    }

    fn still_material() -> ParallaxMaterial {
        let mut m = ParallaxMaterial::new();
        m.set_ken_burns_enabled(false);
        m.set_depth_parallax_enabled(false);
        m.set_mask_parallax_enabled(false);
        m
    }

    #[test]
    fn update_is_inert_until_started() {
        let mut m = ParallaxMaterial::new();
        m.update(1.0);
        assert_eq!(m.state().time, 0.0);

        m.start_animation();
        m.update(0.5);
        assert!((m.state().time - 0.5).abs() < 1e-6);
    }

    #[test]
    fn animation_speed_scales_time() {
        let mut m = ParallaxMaterial::new();
        m.set_animation_speed(2.0);
        m.start_animation();
        m.update(0.25);
        assert!((m.state().time - 0.5).abs() < 1e-6);
    }

    #[test]
    fn stop_rewinds_and_is_idempotent() {
        let mut m = ParallaxMaterial::new();
        m.start_animation();
        m.update(3.0);
        m.stop_animation();
        assert_eq!(m.state().time, 0.0);
        assert!(!m.is_playing());
        m.stop_animation();
        assert_eq!(m.state().time, 0.0);
    }

    #[test]
    fn pause_keeps_time() {
        let mut m = ParallaxMaterial::new();
        m.start_animation();
        m.update(1.0);
        m.pause_animation();
        m.update(1.0);
        assert!((m.state().time - 1.0).abs() < 1e-6);
        m.resume_animation();
        m.update(1.0);
        assert!((m.state().time - 2.0).abs() < 1e-6);
    }

    #[test]
    fn without_effects_offset_is_base_plus_pan() {
        let mut m = still_material();
        m.set_pan_offset(Vec2::new(0.1, -0.05));
        m.start_animation();
        m.update(7.0);
        assert!((m.state().uv_offset - Vec2::new(0.6, 0.45)).length() < 1e-6);
        assert_eq!(m.state().scale, 1.0);
    }

    #[test]
    fn setters_push_to_surface() {
        let recorder = Recorder::default();
        let mut m = ParallaxMaterial::new();
        m.set_surface(Box::new(recorder.clone()));
        m.set_zoom_level(1.4);
        m.set_depth_scale(0.3);

        let pushed = recorder.0.borrow();
        let last = pushed.last().unwrap();
        assert_eq!(last.depth_scale, 0.3);
        assert!(pushed.iter().any(|u| (u.scale - 1.4).abs() < 0.05));
    }

    #[test]
    fn non_finite_setters_are_ignored() {
        let mut m = ParallaxMaterial::new();
        m.set_zoom_level(f32::NAN);
        m.set_parallax_strength(f32::INFINITY);
        m.set_pan_offset(Vec2::new(f32::NEG_INFINITY, 0.0));
        assert_eq!(m.zoom_level(), 1.0);
        assert_eq!(m.parallax_strength(), 0.5);
        assert_eq!(m.pan_offset(), Vec2::ZERO);
    }

    #[test]
    fn ken_burns_interpolates_over_duration() {
        let mut m = still_material();
        m.apply_ken_burns(&KenBurnsParams {
            start_scale: 1.0,
            end_scale: 1.2,
            pan: Vec2::new(0.1, 0.0),
            duration_secs: 4.0,
        });
        assert_eq!(m.zoom_level(), 1.0);
        assert!(m.effects().ken_burns);

        m.start_animation();
        m.update(2.0);
        assert!((m.zoom_level() - 1.1).abs() < 1e-5);
        assert!((m.pan_offset().x - 0.05).abs() < 1e-5);

        m.update(5.0);
        assert_eq!(m.zoom_level(), 1.2);
        assert_eq!(m.pan_offset(), Vec2::new(0.1, 0.0));
    }

    #[test]
    fn parallax_enables_mask_only_with_mask() {
        let mut m = ParallaxMaterial::new();
        m.apply_parallax(&ParallaxParams::default(), false);
        assert!(m.effects().depth_parallax);
        assert!(!m.effects().mask_parallax);
        assert!(!m.effects().ken_burns);

        m.apply_parallax(&ParallaxParams::default(), true);
        assert!(m.effects().mask_parallax);
    }

    #[test]
    fn uniforms_stay_finite_under_arbitrary_input() {
        let mut m = ParallaxMaterial::new();
        m.set_mask_parallax_enabled(true);
        m.start_animation();

        let values = [0.0, -1e30, 1e30, 3.5, f32::NAN, f32::INFINITY, -0.25, 1e-20];
        for (i, v) in values.iter().cycle().take(400).enumerate() {
            match i % 6 {
                0 => m.set_zoom_level(*v),
                1 => m.set_pan_offset(Vec2::new(*v, -*v)),
                2 => m.set_parallax_strength(*v),
                3 => m.set_animation_speed(*v),
                4 => m.set_rotation_angle(*v),
                _ => m.set_depth_scale(*v),
            }
            m.update(0.016 * (i as f32 + 1.0));
            let u = m.uniforms();
            assert!(u.uv_offset.is_finite(), "offset {:?} at step {i}", u.uv_offset);
            assert!(u.scale.is_finite());
            assert!(u.rotation.is_finite());
        }
    }
}
