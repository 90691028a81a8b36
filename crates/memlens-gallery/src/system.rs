use crate::clock::FrameClock;
use crate::error::GalleryError;
use crate::loader::{LoaderEvent, PanelLoader};
use crate::perf::FpsSampler;
use memlens_config::{AppConfig, PlaybackConfig};
use memlens_input::{GestureEvent, GestureKind, HandControls, SwipeDirection};
use memlens_material::ParallaxMaterial;
use memlens_story::{placeholder_story, AnimationKind, Panel, PanelAnimation, StoryError, StorySource};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Frames between heartbeat log lines.
const HEARTBEAT_FRAMES: u64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemState {
    Uninitialized,
    Ready,
}

#[derive(Debug)]
pub enum SystemEvent {
    Ready { panel_count: usize },
    PanelChanged { index: usize, panel: Arc<Panel> },
    AnimationStarted { index: usize, kind: AnimationKind },
    AnimationComplete { index: usize },
    Gesture(GestureEvent),
    /// Measured frame rate fell below target; animation speed was halved.
    PerformanceMitigated { fps: f32 },
    Error(GalleryError),
}

/// Composition root: drives the panel loader from timers and gestures and
/// picks the material animation for each panel.
///
/// Gestures only reach navigation through here. Per frame, in order: the
/// auto-advance and frame-rate timers, the loader's animation timer, then
/// gesture polling and dispatch.
pub struct AnimationSystem {
    loader: PanelLoader,
    controls: HandControls,
    playback: PlaybackConfig,
    state: SystemState,
    auto_advance_elapsed: f32,
    fps: FpsSampler,
    mitigated: bool,
    frame_count: u64,
    events: Vec<SystemEvent>,
}

impl AnimationSystem {
    pub fn new(mut loader: PanelLoader, controls: HandControls, playback: PlaybackConfig) -> Self {
        loader.set_looping(playback.loop_panels);
        Self {
            loader,
            controls,
            playback,
            state: SystemState::Uninitialized,
            auto_advance_elapsed: 0.0,
            fps: FpsSampler::default(),
            mitigated: false,
            frame_count: 0,
            events: Vec::new(),
        }
    }

    /// Build every component from config. Renderer and gesture source are
    /// still to be attached.
    pub fn from_config(config: &AppConfig) -> Self {
        let loader = PanelLoader::new(ParallaxMaterial::from_config(&config.material));
        let controls = HandControls::new(config.gestures.clone());
        Self::new(loader, controls, config.playback.clone())
    }

    pub fn state(&self) -> SystemState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == SystemState::Ready
    }

    pub fn loader(&self) -> &PanelLoader {
        &self.loader
    }

    pub fn loader_mut(&mut self) -> &mut PanelLoader {
        &mut self.loader
    }

    pub fn controls(&self) -> &HandControls {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut HandControls {
        &mut self.controls
    }

    pub fn drain_events(&mut self) -> Vec<SystemEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn set_auto_advance(&mut self, enabled: bool) {
        self.playback.auto_advance = enabled;
        self.auto_advance_elapsed = 0.0;
        debug!(enabled, "Auto-advance toggled");
    }

    pub fn auto_advance_enabled(&self) -> bool {
        self.playback.auto_advance
    }

    pub fn set_auto_advance_delay(&mut self, secs: f32) {
        self.playback.auto_advance_delay_secs = secs.max(0.0);
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.playback.loop_panels = looping;
        self.loader.set_looping(looping);
    }

    /// Load the story at `location` (or the placeholder when `None`) and go `Ready`.
    pub fn initialize(&mut self, source: &dyn StorySource, location: Option<&str>) {
        let fetched = match location {
            Some(location) => source.fetch_story(location),
            None => Ok(placeholder_story()),
        };
        self.initialize_with(fetched);
    }

    /// Like [`initialize`](Self::initialize) for a fetch that already happened.
    pub fn initialize_with(&mut self, fetched: Result<Vec<Panel>, StoryError>) {
        if !self.loader.has_renderer() {
            warn!("Animation system has no renderer, staying uninitialized");
            self.events
                .push(SystemEvent::Error(GalleryError::MissingRenderer));
            return;
        }

        self.loader.load_fetched(fetched);
        self.process_loader_events();

        let panel_count = self.loader.get_panel_count();
        if panel_count > 0 && self.state == SystemState::Uninitialized {
            self.state = SystemState::Ready;
            self.auto_advance_elapsed = 0.0;
            info!(panel_count, "Animation system ready");
            self.events.push(SystemEvent::Ready { panel_count });
        }
    }

    pub fn tick(&mut self, clock: &mut dyn FrameClock) {
        let frame = clock.tick();
        self.update(frame.now, frame.dt);
    }

    pub fn update(&mut self, now: f64, dt: f32) {
        if self.state != SystemState::Ready {
            return;
        }
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            warn!(dt, "Ignoring invalid frame delta");
            0.0
        };

        self.frame_count += 1;
        if self.frame_count % HEARTBEAT_FRAMES == 0 {
            debug!(
                frames = self.frame_count,
                index = self.loader.get_current_index(),
                "Gallery heartbeat"
            );
        }

        self.update_auto_advance(dt);
        self.update_performance(dt);
        self.process_loader_events();

        self.loader.update(dt);
        self.process_loader_events();

        self.controls.update(now, dt);
        for gesture in self.controls.drain_events() {
            self.events.push(SystemEvent::Gesture(gesture));
            self.dispatch_gesture(gesture);
        }
        self.process_loader_events();
    }

    fn update_auto_advance(&mut self, dt: f32) {
        // A paused panel holds the timer where it is.
        if !self.playback.auto_advance || self.loader.is_paused() {
            return;
        }
        self.auto_advance_elapsed += dt;
        if self.auto_advance_elapsed < self.playback.auto_advance_delay_secs {
            return;
        }
        self.auto_advance_elapsed = 0.0;

        let next_wraps =
            self.loader.get_current_index() + 1 >= self.loader.get_panel_count();
        if self.loader.is_looping() || !next_wraps {
            debug!("Auto-advancing");
            self.loader.next_panel();
        }
    }

    fn update_performance(&mut self, dt: f32) {
        if !self.playback.performance_monitoring {
            return;
        }
        let Some(fps) = self.fps.sample(dt) else {
            return;
        };
        if self.mitigated || fps >= self.playback.target_fps {
            return;
        }
        let material = self.loader.material_mut();
        let speed = material.animation_speed() * 0.5;
        material.set_animation_speed(speed);
        self.mitigated = true;
        warn!(fps, target = self.playback.target_fps, speed, "Frame rate low, animation speed halved");
        self.events.push(SystemEvent::PerformanceMitigated { fps });
    }

    fn dispatch_gesture(&mut self, gesture: GestureEvent) {
        match (gesture.kind, gesture.direction) {
            (GestureKind::Pinch, _) => self.loader.toggle_animation(),
            (GestureKind::Swipe, Some(SwipeDirection::Left)) => self.loader.prev_panel(),
            (GestureKind::Swipe, _) => self.loader.next_panel(),
            (GestureKind::AirTap, _) | (GestureKind::Gaze, _) => self.loader.next_panel(),
        }
    }

    fn process_loader_events(&mut self) {
        for event in self.loader.drain_events() {
            match event {
                LoaderEvent::StoryLoaded { panel_count } => {
                    debug!(panel_count, "Story loaded into gallery");
                }
                LoaderEvent::PanelChanged { index, panel } => {
                    self.auto_advance_elapsed = 0.0;
                    self.events.push(SystemEvent::PanelChanged {
                        index,
                        panel: Arc::clone(&panel),
                    });
                    self.select_animation(index, &panel);
                }
                LoaderEvent::AnimationComplete { index } => {
                    self.events.push(SystemEvent::AnimationComplete { index });
                }
                LoaderEvent::Error(error) => {
                    self.events.push(SystemEvent::Error(error));
                }
            }
        }
    }

    /// Configure the material for the panel's animation and start it.
    fn select_animation(&mut self, index: usize, panel: &Panel) {
        let material = self.loader.material_mut();
        match &panel.animation {
            PanelAnimation::KenBurns(params) => {
                material.apply_ken_burns(params);
                material.start_animation();
            }
            PanelAnimation::Parallax(params) => {
                material.apply_parallax(params, panel.has_mask());
                material.start_animation();
            }
            PanelAnimation::Video(_) | PanelAnimation::None => {
                material.stop_animation();
                material.set_ken_burns_enabled(false);
            }
        }

        let kind = panel.animation.kind();
        info!(index, %kind, "Animation started");
        self.events.push(SystemEvent::AnimationStarted { index, kind });
    }
}
