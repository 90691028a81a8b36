use memlens_material::{MaterialUniforms, RenderSurface};
use memlens_story::{ImageMedia, Panel};
use tracing::{info, trace};

/// Puts a panel's media on screen. Calls return immediately; any loading
/// happens on the renderer's side.
pub trait PanelRenderer {
    fn display_image(&mut self, panel: &Panel, media: &ImageMedia);
    fn display_video(&mut self, url: &str, duration_secs: f32);
}

/// Stand-in display that logs what would be shown.
///
/// Implements both render ports so one headless binary can run the whole
/// gallery without a GPU or headset.
#[derive(Debug, Clone, Default)]
pub struct TracingRenderer {
    uniform_pushes: u64,
}

impl PanelRenderer for TracingRenderer {
    fn display_image(&mut self, panel: &Panel, media: &ImageMedia) {
        info!(
            title = %panel.title,
            image = %media.image_url,
            depth = media.depth_url.as_deref().unwrap_or("-"),
            mask = media.mask_url.as_deref().unwrap_or("-"),
            "Display image"
        );
    }

    fn display_video(&mut self, url: &str, duration_secs: f32) {
        info!(url, duration_secs, "Display video");
    }
}

impl RenderSurface for TracingRenderer {
    fn apply(&mut self, uniforms: &MaterialUniforms) {
        self.uniform_pushes += 1;
        if self.uniform_pushes % 120 == 0 {
            trace!(
                uv_x = uniforms.uv_offset.x,
                uv_y = uniforms.uv_offset.y,
                scale = uniforms.scale,
                time = uniforms.time,
                "Material uniforms"
            );
        }
    }
}
