//! Build-time configuration constants.
//!
//! Shader lookup paths, default clear color, and camera tuning values live
//! here so the sandbox and the loaders agree on conventions.

use glam::Vec3;

/// Directory the [`ShaderCache`](crate::render::ShaderCache) resolves shader
/// names against, unless overridden with
/// [`set_dir`](crate::render::ShaderCache::set_dir).
pub const SHADER_DIR: &str = "resources/shaders";

/// Shader assigned to materials that don't pick their own.
pub const DEFAULT_SHADER: &str = "standard";

/// Shader used by the floor grid decoration.
pub const GRID_SHADER: &str = "grid";

/// Shader used by the axis gizmo.
pub const AXIS_SHADER: &str = "axis";

/// Framebuffer clear color (linear RGBA).
pub const CLEAR_COLOR: [f32; 4] = [0.1, 0.1, 0.1, 1.0];

/// Viewport size assumed until the host reports a real one.
pub const DEFAULT_VIEWPORT: (u32, u32) = (1280, 720);

/// Where the fly camera starts; `reset()` returns here, facing the origin.
pub const CAMERA_START: Vec3 = Vec3::new(0.0, 3.0, 6.0);

/// Base fly speed in units per second.
pub const CAMERA_SPEED: f32 = 2.5;

/// Speed multiplier while the boost key (left shift) is held.
pub const CAMERA_BOOST: f32 = 3.0;

/// Mouse-look sensitivity, radians per pixel per second.
pub const CAMERA_SENSITIVITY: f32 = 0.4;
