use anyhow::Result;
use memlens_config::AppConfig;
use memlens_gallery::{AnimationSystem, SystemClock, SystemEvent, TracingRenderer};
use memlens_input::ScriptedGestureSource;
use memlens_story::{FileStorySource, Panel, StoryError, StorySource};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Fetch the story off the async runtime. `None` means play the placeholder.
async fn fetch_story(location: Option<String>) -> Option<Result<Vec<Panel>, StoryError>> {
    let location = location?;
    let fetched = tokio::task::spawn_blocking(move || FileStorySource::new().fetch_story(&location)).await;
    match fetched {
        Ok(result) => Some(result),
        Err(e) => {
            error!(?e, "Story loader task failed");
            None
        }
    }
}

fn log_event(event: &SystemEvent) {
    match event {
        SystemEvent::Ready { panel_count } => info!(panel_count, "Gallery ready"),
        SystemEvent::PanelChanged { index, panel } => {
            info!(index, title = %panel.title, "Showing panel")
        }
        SystemEvent::AnimationStarted { index, kind } => debug!(index, %kind, "Animation started"),
        SystemEvent::AnimationComplete { index } => debug!(index, "Animation complete"),
        SystemEvent::Gesture(gesture) => {
            info!(kind = %gesture.kind, direction = ?gesture.direction, "Gesture")
        }
        SystemEvent::PerformanceMitigated { fps } => warn!(fps, "Animation slowed for frame rate"),
        SystemEvent::Error(e) => match e.severity() {
            memlens_gallery::Severity::Warning => warn!(error = %e, "Gallery warning"),
            memlens_gallery::Severity::Error => error!(error = %e, "Gallery error"),
        },
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "memory_lens=info,memlens_gallery=info,memlens_input=info,memlens_story=info".into()
            }),
        )
        .init();

    info!("Memory Lens starting");

    let config = memlens_config::load_config().unwrap_or_else(|e| {
        warn!(?e, "Failed to load config, using defaults");
        AppConfig::default()
    });
    let story_source = std::env::args().nth(1).or_else(|| config.story.source.clone());
    info!(
        source = story_source.as_deref().unwrap_or("<placeholder>"),
        fps = config.playback.target_fps,
        "Config loaded"
    );

    let renderer = TracingRenderer::default();
    let mut system = AnimationSystem::from_config(&config);
    system.loader_mut().set_renderer(Box::new(renderer.clone()));
    system
        .loader_mut()
        .material_mut()
        .set_surface(Box::new(renderer));
    system
        .controls_mut()
        .set_source(Box::new(ScriptedGestureSource::demo()));

    match fetch_story(story_source).await {
        Some(fetched) => system.initialize_with(fetched),
        None => system.initialize_with(Ok(memlens_story::placeholder_story())),
    }
    for event in system.drain_events() {
        log_event(&event);
    }
    if !system.is_ready() {
        anyhow::bail!("gallery failed to start");
    }

    let fps = f64::from(config.playback.target_fps.max(1.0));
    let mut interval = tokio::time::interval(Duration::from_secs_f64(1.0 / fps));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut clock = SystemClock::new();
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                system.tick(&mut clock);
                for event in system.drain_events() {
                    log_event(&event);
                }
            }
            _ = &mut shutdown => {
                info!("Shutting down");
                break;
            }
        }
    }

    if let Err(e) = memlens_config::save_config(&config) {
        error!(?e, "Failed to save config");
    }
    Ok(())
}
