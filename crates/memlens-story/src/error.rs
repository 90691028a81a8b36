use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoryError {
    #[error("Story has no panels")]
    Empty,
    #[error("Story not found: {0}")]
    NotFound(String),
    #[error("Failed to read story {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse story {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
