//! Per-draw render context.
//!
//! A [`RenderContext`] is a short-lived value built fresh each frame from
//! the camera and light list, then re-derived per object with
//! [`with_model`](RenderContext::with_model). It carries everything a draw
//! needs and nothing with identity beyond the call.

use std::rc::Rc;

use glam::{Mat4, Vec3};

use crate::gpu::RenderMode;
use crate::render::shader::Shader;
use crate::scene::light::Light;

/// Everything a single draw needs from the outside world.
#[derive(Clone)]
pub struct RenderContext<'a> {
    /// Object-to-world matrix (`uModel`).
    pub model: Mat4,
    /// World-to-view matrix from the camera (`uView`).
    pub view: Mat4,
    /// View-to-clip matrix (`uProjection`).
    pub projection: Mat4,
    /// Camera world position, for specular terms.
    pub camera_position: Vec3,
    /// Scene lights, uploaded per draw.
    pub lights: &'a [Light],
    /// When set, drawn with this shader instead of each material's own.
    pub shader_override: Option<Rc<Shader>>,
    /// Primitive topology for the draw.
    pub render_mode: RenderMode,
}

impl<'a> RenderContext<'a> {
    /// Context for a frame: identity model matrix, no override, triangles.
    pub fn new(view: Mat4, projection: Mat4, camera_position: Vec3, lights: &'a [Light]) -> Self {
        Self {
            model: Mat4::IDENTITY,
            view,
            projection,
            camera_position,
            lights,
            shader_override: None,
            render_mode: RenderMode::default(),
        }
    }

    /// The same context with a different model matrix.
    pub fn with_model(&self, model: Mat4) -> Self {
        Self {
            model,
            ..self.clone()
        }
    }

    /// The same context with every draw forced through `shader`.
    pub fn with_shader_override(&self, shader: Rc<Shader>) -> Self {
        Self {
            shader_override: Some(shader),
            ..self.clone()
        }
    }

    /// The same context with a different primitive topology.
    pub fn with_render_mode(&self, render_mode: RenderMode) -> Self {
        Self {
            render_mode,
            ..self.clone()
        }
    }
}
