//! Panel sequencing and orchestration for the memory gallery.
//!
//! [`PanelLoader`] owns the story and what is on screen, [`AnimationSystem`]
//! wires it to gesture input and runs the per-frame timers. Everything is
//! single-threaded and driven by one `update` call per frame; components
//! queue events that the next layer up drains within the same frame.

pub mod clock;
pub mod error;
pub mod loader;
pub mod perf;
pub mod renderer;
pub mod system;

pub use clock::{FrameClock, FrameTime, ManualClock, SystemClock};
pub use error::{GalleryError, Severity};
pub use loader::{LoaderEvent, PanelLoader, PanelPhase};
pub use perf::FpsSampler;
pub use renderer::{PanelRenderer, TracingRenderer};
pub use system::{AnimationSystem, SystemEvent, SystemState};
