//! One-stop import for sandbox code: `use glimt::prelude::*;`

pub use crate::camera::Camera;
pub use crate::gpu::trace::TraceBackend;
pub use crate::gpu::{GpuBackend, RenderMode, UniformValue};
pub use crate::input::{InputState, KeyCode, MouseButton};
pub use crate::math::{Mat4, Quat, Vec2, Vec3, Vec4};
pub use crate::render::{
    Axis, FloorGrid, Material, Mesh, Model, RenderContext, Renderable, Shader, ShaderCache,
    Texture, TextureCache, Vertex,
};
pub use crate::sandbox::Sandbox;
pub use crate::scene::{Attenuation, Light, LightKind, SceneObject, TransformArena, TransformId};
pub use crate::time::Time;

#[cfg(feature = "gl")]
pub use crate::gpu::gl::GlowBackend;

#[cfg(feature = "gltf-assets")]
pub use crate::asset::load_model;
