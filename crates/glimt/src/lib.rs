//! # Glimt — Minimal 3D Rendering Sandbox
//!
//! A scene-graph-lite renderer: a transform hierarchy with lazily cached
//! world matrices, and a Model/Material/Shader render pass that resolves
//! per-draw GPU state from a [`RenderContext`](render::RenderContext).
//!
//! Draw commands go through the [`GpuBackend`](gpu::GpuBackend) trait — the
//! [`gl`](gpu::gl) backend drives a real OpenGL 3.3 context, while
//! [`trace`](gpu::trace) records calls for headless runs and tests.
//!
//! Start with `use glimt::prelude::*` and build a [`Sandbox`](sandbox::Sandbox).

pub mod camera;
pub mod config;
pub mod gpu;
pub mod input;
pub mod math;
pub mod prelude;
pub mod render;
pub mod sandbox;
pub mod scene;
pub mod time;

#[cfg(feature = "gltf-assets")]
pub mod asset;

/// Initialize env_logger with a sensible default filter.
///
/// Call once at startup from the host binary. Safe to call twice (the
/// second call is a no-op).
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
