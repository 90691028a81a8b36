use crate::error::GalleryError;
use crate::renderer::PanelRenderer;
use memlens_material::ParallaxMaterial;
use memlens_story::{
    placeholder_story, AnimationKind, Media, Panel, PanelSequence, StoryError, StorySource,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What the loader is doing with the current panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelPhase {
    /// Nothing shown yet, or the panel's animation has run its course.
    Idle,
    /// Media is up; the panel has no animation to run.
    Displaying,
    /// The panel's animation timer is running (possibly paused).
    Animating,
}

#[derive(Debug)]
pub enum LoaderEvent {
    StoryLoaded { panel_count: usize },
    PanelChanged { index: usize, panel: Arc<Panel> },
    AnimationComplete { index: usize },
    Error(GalleryError),
}

/// Owns the story's panels and the on-screen state.
///
/// Navigation on an empty story is a silent no-op, and the read accessors
/// return `0`/`false` until a story is loaded.
pub struct PanelLoader {
    sequence: PanelSequence,
    renderer: Option<Box<dyn PanelRenderer>>,
    material: ParallaxMaterial,
    phase: PanelPhase,
    paused: bool,
    animation_elapsed: f32,
    looping: bool,
    events: Vec<LoaderEvent>,
}

impl PanelLoader {
    pub fn new(material: ParallaxMaterial) -> Self {
        Self {
            sequence: PanelSequence::default(),
            renderer: None,
            material,
            phase: PanelPhase::Idle,
            paused: false,
            animation_elapsed: 0.0,
            looping: true,
            events: Vec::new(),
        }
    }

    pub fn set_renderer(&mut self, renderer: Box<dyn PanelRenderer>) {
        self.renderer = Some(renderer);
    }

    pub fn has_renderer(&self) -> bool {
        self.renderer.is_some()
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn material(&self) -> &ParallaxMaterial {
        &self.material
    }

    pub fn material_mut(&mut self) -> &mut ParallaxMaterial {
        &mut self.material
    }

    pub fn drain_events(&mut self) -> Vec<LoaderEvent> {
        std::mem::take(&mut self.events)
    }

    /// Replace the story and show its first panel.
    ///
    /// An empty list is refused with [`GalleryError::EmptyStory`] and the
    /// current story stays up.
    pub fn load_story(&mut self, panels: Vec<Panel>) {
        match PanelSequence::new(panels) {
            Ok(sequence) => {
                self.stop_current_animation();
                self.sequence = sequence;
                self.phase = PanelPhase::Idle;
                info!(panels = self.sequence.len(), "Story loaded");
                self.events.push(LoaderEvent::StoryLoaded {
                    panel_count: self.sequence.len(),
                });
                self.show_panel(0);
            }
            Err(_) => {
                warn!("Ignoring story with no panels");
                self.events.push(LoaderEvent::Error(GalleryError::EmptyStory));
            }
        }
    }

    /// Load the outcome of a story fetch. Failures, and stories without
    /// panels, fall back to the placeholder story.
    pub fn load_fetched(&mut self, fetched: Result<Vec<Panel>, StoryError>) {
        let error = match fetched {
            Ok(panels) if !panels.is_empty() => return self.load_story(panels),
            Ok(_) => StoryError::Empty,
            Err(e) => e,
        };
        warn!(error = %error, "Story unavailable, loading placeholder");
        self.events
            .push(LoaderEvent::Error(GalleryError::RemoteFetch(error)));
        self.load_story(placeholder_story());
    }

    pub fn load_from_source(&mut self, source: &dyn StorySource, location: &str) {
        self.load_fetched(source.fetch_story(location));
    }

    /// Show the panel at `index`, wrapped into range. Pre-empts whatever
    /// animation is in flight.
    pub fn show_panel(&mut self, index: i64) {
        if self.sequence.is_empty() {
            return;
        }
        if self.renderer.is_none() {
            warn!(index, "Cannot show panel without a renderer");
            self.events
                .push(LoaderEvent::Error(GalleryError::MissingRenderer));
            return;
        }

        if self.phase == PanelPhase::Animating {
            debug!(index = self.sequence.current_index(), "Animation interrupted");
        }
        self.stop_current_animation();

        let Some((index, panel)) = self.sequence.select(index) else {
            return;
        };

        if let Some(renderer) = self.renderer.as_mut() {
            match &panel.media {
                Media::Image(media) => renderer.display_image(&panel, media),
                Media::Video(media) => {
                    renderer.display_video(&media.video_url, panel.animation.duration_secs())
                }
            }
        }

        self.phase = PanelPhase::Displaying;
        if panel.animation.kind() != AnimationKind::None {
            self.phase = PanelPhase::Animating;
            self.animation_elapsed = 0.0;
            self.paused = false;
        }

        info!(index, title = %panel.title, kind = %panel.animation.kind(), "Panel shown");
        self.events.push(LoaderEvent::PanelChanged { index, panel });
    }

    /// Step forward. At the last panel this wraps only when looping.
    pub fn next_panel(&mut self) {
        if let Some(index) = self.sequence.next_index(self.looping) {
            self.show_panel(index as i64);
        }
    }

    /// Step back. At the first panel this wraps only when looping.
    pub fn prev_panel(&mut self) {
        if let Some(index) = self.sequence.prev_index(self.looping) {
            self.show_panel(index as i64);
        }
    }

    pub fn toggle_animation(&mut self) {
        if self.is_currently_animating() {
            self.pause_animation();
        } else {
            self.resume_animation();
        }
    }

    pub fn pause_animation(&mut self) {
        if self.phase == PanelPhase::Animating && !self.paused {
            self.paused = true;
            if self.material_driven() {
                self.material.pause_animation();
            }
            debug!(index = self.sequence.current_index(), "Animation paused");
        }
    }

    /// Resume a paused animation. If the current panel's animation already
    /// finished, show the panel again so it replays from the start.
    pub fn resume_animation(&mut self) {
        match self.phase {
            PanelPhase::Animating if self.paused => {
                self.paused = false;
                if self.material_driven() {
                    self.material.resume_animation();
                }
                debug!(index = self.sequence.current_index(), "Animation resumed");
            }
            PanelPhase::Idle if !self.sequence.is_empty() => {
                debug!(index = self.sequence.current_index(), "Replaying animation");
                self.show_panel(self.sequence.current_index() as i64);
            }
            _ => {}
        }
    }

    /// Cancel the in-flight animation. Safe to call when nothing runs.
    pub fn stop_current_animation(&mut self) {
        if self.phase == PanelPhase::Animating {
            self.phase = PanelPhase::Displaying;
        }
        self.paused = false;
        self.animation_elapsed = 0.0;
        self.material.stop_animation();
    }

    /// Advance the animation timer and the material by one frame.
    pub fn update(&mut self, dt: f32) {
        self.material.update(dt);

        if self.phase != PanelPhase::Animating || self.paused {
            return;
        }
        let Some(duration) = self.sequence.current().map(|p| p.animation.duration_secs()) else {
            return;
        };
        // Material animations run on the material's scaled clock; video plays in real time.
        let step = if self.material_driven() {
            dt * self.material.animation_speed()
        } else {
            dt
        };
        self.animation_elapsed += step;

        if self.animation_elapsed >= duration {
            let index = self.sequence.current_index();
            self.phase = PanelPhase::Idle;
            self.material.pause_animation();
            debug!(index, "Animation complete");
            self.events.push(LoaderEvent::AnimationComplete { index });
        }
    }

    pub fn get_current_index(&self) -> usize {
        self.sequence.current_index()
    }

    pub fn get_panel_count(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_currently_animating(&self) -> bool {
        self.phase == PanelPhase::Animating && !self.paused
    }

    pub fn phase(&self) -> PanelPhase {
        self.phase
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn current_panel(&self) -> Option<&Arc<Panel>> {
        self.sequence.current()
    }

    /// Whether the current panel's animation is played by the material.
    fn material_driven(&self) -> bool {
        self.sequence.current().is_some_and(|panel| {
            matches!(
                panel.animation.kind(),
                AnimationKind::KenBurns | AnimationKind::Parallax
            )
        })
    }
}

impl Default for PanelLoader {
    fn default() -> Self {
        Self::new(ParallaxMaterial::new())
    }
}
