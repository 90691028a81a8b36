use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One story beat: text, the media it shows, and how that media moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub media: Media,
    #[serde(default)]
    pub animation: PanelAnimation,
}

impl Panel {
    /// Still image panel with a gentle Ken Burns move.
    pub fn image(title: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            media: Media::Image(ImageMedia {
                image_url: image_url.into(),
                depth_url: None,
                mask_url: None,
            }),
            animation: PanelAnimation::KenBurns(KenBurnsParams::default()),
        }
    }

    /// Video panel that plays for `duration_secs`.
    pub fn video(title: impl Into<String>, video_url: impl Into<String>, duration_secs: f32) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            media: Media::Video(VideoMedia {
                video_url: video_url.into(),
            }),
            animation: PanelAnimation::Video(VideoParams { duration_secs }),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_animation(mut self, animation: PanelAnimation) -> Self {
        self.animation = animation;
        self
    }

    pub fn is_video(&self) -> bool {
        matches!(self.media, Media::Video(_))
    }

    /// Whether the image carries a foreground mask for mask-based parallax.
    pub fn has_mask(&self) -> bool {
        matches!(&self.media, Media::Image(ImageMedia { mask_url: Some(_), .. }))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Media {
    Image(ImageMedia),
    Video(VideoMedia),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageMedia {
    pub image_url: String,
    /// Greyscale depth map driving depth-based parallax.
    #[serde(default)]
    pub depth_url: Option<String>,
    /// Foreground mask driving mask-based parallax.
    #[serde(default)]
    pub mask_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMedia {
    pub video_url: String,
}

/// How a panel animates once it is on screen.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PanelAnimation {
    KenBurns(KenBurnsParams),
    Parallax(ParallaxParams),
    Video(VideoParams),
    #[default]
    None,
}

impl PanelAnimation {
    pub fn kind(&self) -> AnimationKind {
        match self {
            Self::KenBurns(_) => AnimationKind::KenBurns,
            Self::Parallax(_) => AnimationKind::Parallax,
            Self::Video(_) => AnimationKind::Video,
            Self::None => AnimationKind::None,
        }
    }

    /// Seconds until the animation counts as complete. Zero for `None`.
    pub fn duration_secs(&self) -> f32 {
        match self {
            Self::KenBurns(p) => p.duration_secs,
            Self::Parallax(p) => p.duration_secs,
            Self::Video(p) => p.duration_secs,
            Self::None => 0.0,
        }
    }

    /// Target zoom the animation settles on.
    pub fn zoom(&self) -> f32 {
        match self {
            Self::KenBurns(p) => p.end_scale,
            Self::Parallax(p) => p.zoom,
            Self::Video(_) | Self::None => 1.0,
        }
    }

    /// Target UV pan the animation settles on.
    pub fn pan(&self) -> Vec2 {
        match self {
            Self::KenBurns(p) => p.pan,
            Self::Parallax(p) => p.pan,
            Self::Video(_) | Self::None => Vec2::ZERO,
        }
    }
}

/// Discriminant of [`PanelAnimation`], for events and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationKind {
    KenBurns,
    Parallax,
    Video,
    None,
}

impl fmt::Display for AnimationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::KenBurns => "ken_burns",
            Self::Parallax => "parallax",
            Self::Video => "video",
            Self::None => "none",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KenBurnsParams {
    pub start_scale: f32,
    pub end_scale: f32,
    /// UV pan reached at the end of the move.
    #[serde(with = "vec2_serde")]
    pub pan: Vec2,
    pub duration_secs: f32,
}

impl Default for KenBurnsParams {
    fn default() -> Self {
        Self {
            start_scale: 1.0,
            end_scale: 1.2,
            pan: Vec2::new(0.05, 0.03),
            duration_secs: 8.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallaxParams {
    pub zoom: f32,
    #[serde(with = "vec2_serde")]
    pub pan: Vec2,
    /// Sway amplitude multiplier.
    pub strength: f32,
    pub duration_secs: f32,
}

impl Default for ParallaxParams {
    fn default() -> Self {
        Self {
            zoom: 1.05,
            pan: Vec2::ZERO,
            strength: 0.5,
            duration_secs: 8.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoParams {
    pub duration_secs: f32,
}

impl Default for VideoParams {
    fn default() -> Self {
        Self { duration_secs: 10.0 }
    }
}

// Story documents write pans as `[x, y]` arrays.
mod vec2_serde {
    use glam::Vec2;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(v: &Vec2, s: S) -> Result<S::Ok, S::Error> {
        [v.x, v.y].serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec2, D::Error> {
        let [x, y] = <[f32; 2]>::deserialize(d)?;
        Ok(Vec2::new(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn animation_accessors_follow_variant() {
        let kb = PanelAnimation::KenBurns(KenBurnsParams {
            start_scale: 1.0,
            end_scale: 1.3,
            pan: Vec2::new(0.1, 0.0),
            duration_secs: 5.0,
        });
        assert_eq!(kb.kind(), AnimationKind::KenBurns);
        assert_eq!(kb.duration_secs(), 5.0);
        assert_eq!(kb.zoom(), 1.3);
        assert_eq!(kb.pan(), Vec2::new(0.1, 0.0));

        assert_eq!(PanelAnimation::None.duration_secs(), 0.0);
        assert_eq!(PanelAnimation::None.zoom(), 1.0);
    }

    #[test]
    fn media_kind_helpers() {
        let image = Panel::image("Beach", "beach.jpg");
        assert!(!image.is_video());
        assert!(!image.has_mask());

        let video = Panel::video("Waves", "waves.mp4", 6.0);
        assert!(video.is_video());
        assert_eq!(video.animation.kind(), AnimationKind::Video);
    }

    #[test]
    fn missing_animation_defaults_to_none() {
        let panel: Panel = serde_json::from_str(
            r#"{ "title": "Porch", "media": { "type": "image", "image_url": "porch.jpg" } }"#,
        )
        .unwrap();
        assert_eq!(panel.animation, PanelAnimation::None);
        assert_eq!(panel.description, "");
    }

    #[test]
    fn animation_parameters_fall_back_to_defaults() {
        let anim: PanelAnimation =
            serde_json::from_str(r#"{ "kind": "ken_burns", "end_scale": 1.4 }"#).unwrap();
        match anim {
            PanelAnimation::KenBurns(p) => {
                assert_eq!(p.end_scale, 1.4);
                assert_eq!(p.start_scale, 1.0);
                assert_eq!(p.duration_secs, 8.0);
            }
            other => panic!("unexpected animation {other:?}"),
        }
    }
}
