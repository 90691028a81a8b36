pub mod material;
pub mod tween;

pub use material::{AnimationState, Effects, ParallaxMaterial};

use glam::Vec2;

/// Uniform block pushed to a render surface whenever the material changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialUniforms {
    pub uv_offset: Vec2,
    pub scale: f32,
    /// Radians.
    pub rotation: f32,
    pub depth_scale: f32,
    pub parallax_strength: f32,
    /// Animation clock in seconds, already scaled by animation speed.
    pub time: f32,
}

/// Where a material publishes its uniforms (a shader, a log, a test recorder).
pub trait RenderSurface {
    fn apply(&mut self, uniforms: &MaterialUniforms);
}
