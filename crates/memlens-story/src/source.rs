use crate::{
    ImageMedia, KenBurnsParams, Media, Panel, PanelAnimation, ParallaxParams, StoryError,
};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

/// Anything that can produce a story's panels from a location string.
pub trait StorySource {
    fn fetch_story(&self, location: &str) -> Result<Vec<Panel>, StoryError>;
}

/// On-disk story document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryDocument {
    #[serde(default)]
    pub title: Option<String>,
    pub panels: Vec<Panel>,
}

pub fn parse_story(json: &str) -> Result<StoryDocument, serde_json::Error> {
    serde_json::from_str(json)
}

/// Reads JSON story documents from disk, relative to an optional base directory.
#[derive(Debug, Clone, Default)]
pub struct FileStorySource {
    base_dir: Option<PathBuf>,
}

impl FileStorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    fn resolve(&self, location: &str) -> PathBuf {
        match &self.base_dir {
            Some(base) => base.join(location),
            None => PathBuf::from(location),
        }
    }
}

impl StorySource for FileStorySource {
    fn fetch_story(&self, location: &str) -> Result<Vec<Panel>, StoryError> {
        let path = self.resolve(location);
        if !path.exists() {
            return Err(StoryError::NotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(&path).map_err(|source| StoryError::Io {
            path: path.clone(),
            source,
        })?;
        let document = parse_story(&contents).map_err(|source| StoryError::Parse {
            path: path.clone(),
            source,
        })?;

        if document.panels.is_empty() {
            return Err(StoryError::Empty);
        }
        info!(
            ?path,
            title = document.title.as_deref().unwrap_or("untitled"),
            panels = document.panels.len(),
            "Story read"
        );
        Ok(document.panels)
    }
}

/// In-memory source that hands out the same panels for every location.
#[derive(Debug, Clone, Default)]
pub struct StaticStorySource {
    panels: Vec<Panel>,
}

impl StaticStorySource {
    pub fn new(panels: Vec<Panel>) -> Self {
        Self { panels }
    }
}

impl StorySource for StaticStorySource {
    fn fetch_story(&self, location: &str) -> Result<Vec<Panel>, StoryError> {
        debug!(location, panels = self.panels.len(), "Static story fetched");
        if self.panels.is_empty() {
            return Err(StoryError::Empty);
        }
        Ok(self.panels.clone())
    }
}

/// Built-in story shown when nothing else can be loaded.
pub fn placeholder_story() -> Vec<Panel> {
    vec![
        Panel::image("A Summer Afternoon", "placeholder/summer.jpg")
            .with_description("Sunlight through the kitchen window.")
            .with_animation(PanelAnimation::KenBurns(KenBurnsParams {
                start_scale: 1.0,
                end_scale: 1.15,
                pan: Vec2::new(0.04, 0.02),
                duration_secs: 8.0,
            })),
        Panel {
            title: "The Garden".into(),
            description: "Grandmother's roses, always in bloom.".into(),
            media: Media::Image(ImageMedia {
                image_url: "placeholder/garden.jpg".into(),
                depth_url: Some("placeholder/garden_depth.png".into()),
                mask_url: Some("placeholder/garden_mask.png".into()),
            }),
            animation: PanelAnimation::Parallax(ParallaxParams {
                zoom: 1.05,
                pan: Vec2::ZERO,
                strength: 0.6,
                duration_secs: 8.0,
            }),
        },
        Panel::video("By the Lake", "placeholder/lake.mp4", 10.0)
            .with_description("Ripples at dusk."),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AnimationKind;

    const STORY: &str = r#"{
        "title": "Lake House",
        "panels": [
            {
                "title": "Arrival",
                "description": "The long driveway.",
                "media": { "type": "image", "image_url": "arrival.jpg", "depth_url": "arrival_depth.png" },
                "animation": { "kind": "parallax", "zoom": 1.1, "pan": [0.02, 0.0], "strength": 0.4, "duration_secs": 6.0 }
            },
            {
                "title": "Swim",
                "media": { "type": "video", "video_url": "swim.mp4" },
                "animation": { "kind": "video", "duration_secs": 12.0 }
            }
        ]
    }"#;

    #[test]
    fn parses_tagged_media_and_animation() {
        let doc = parse_story(STORY).unwrap();
        assert_eq!(doc.title.as_deref(), Some("Lake House"));
        assert_eq!(doc.panels.len(), 2);
        assert_eq!(doc.panels[0].animation.kind(), AnimationKind::Parallax);
        assert_eq!(doc.panels[0].animation.pan(), Vec2::new(0.02, 0.0));
        assert!(doc.panels[1].is_video());
        assert_eq!(doc.panels[1].animation.duration_secs(), 12.0);
    }

    #[test]
    fn file_source_reads_relative_to_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("lake.json"), STORY).unwrap();

        let source = FileStorySource::with_base_dir(dir.path());
        let panels = source.fetch_story("lake.json").unwrap();
        assert_eq!(panels[0].title, "Arrival");
    }

    #[test]
    fn file_source_reports_missing_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.json"), "{ \"panels\": [").unwrap();
        std::fs::write(dir.path().join("empty.json"), "{ \"panels\": [] }").unwrap();

        let source = FileStorySource::with_base_dir(dir.path());
        assert!(matches!(source.fetch_story("nope.json"), Err(StoryError::NotFound(_))));
        assert!(matches!(source.fetch_story("broken.json"), Err(StoryError::Parse { .. })));
        assert!(matches!(source.fetch_story("empty.json"), Err(StoryError::Empty)));
    }

    #[test]
    fn placeholder_covers_every_media_path() {
        let panels = placeholder_story();
        assert_eq!(panels.len(), 3);
        assert_eq!(panels[0].animation.kind(), AnimationKind::KenBurns);
        assert!(panels[1].has_mask());
        assert!(panels[2].is_video());
    }

    #[test]
    fn static_source_rejects_empty_story() {
        assert!(matches!(
            StaticStorySource::default().fetch_story("any"),
            Err(StoryError::Empty)
        ));
    }
}
