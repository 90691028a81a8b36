//! Story data: the panels a memory gallery shows, the ordered sequence they
//! are navigated in, and the sources they are fetched from.

mod error;
mod panel;
mod sequence;
mod source;

pub use error::StoryError;
pub use panel::*;
pub use sequence::PanelSequence;
pub use source::{
    parse_story, placeholder_story, FileStorySource, StaticStorySource, StoryDocument,
    StorySource,
};
