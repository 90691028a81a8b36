use memlens_story::StoryError;
use thiserror::Error;

/// Diagnostics the gallery reports through its event queues.
///
/// None of these stop the gallery; the worst case is an empty screen.
#[derive(Debug, Error)]
pub enum GalleryError {
    /// A required collaborator was never assigned; the operation was skipped.
    #[error("No renderer assigned to the panel loader")]
    MissingRenderer,
    #[error("Refusing to load a story with no panels")]
    EmptyStory,
    /// The story could not be fetched; the placeholder story is shown instead.
    #[error("Story fetch failed, showing placeholder story")]
    RemoteFetch(#[source] StoryError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl GalleryError {
    pub fn severity(&self) -> Severity {
        match self {
            Self::MissingRenderer => Severity::Error,
            Self::EmptyStory | Self::RemoteFetch(_) => Severity::Warning,
        }
    }
}
