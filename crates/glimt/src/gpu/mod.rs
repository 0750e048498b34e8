//! # GPU backend seam
//!
//! Everything the renderer asks of the GPU goes through the [`GpuBackend`]
//! trait: program compilation and named-uniform writes, vertex array/buffer
//! setup, texture upload and unit binding, draws, and the handful of render
//! state toggles the scene decorations need.
//!
//! The trait is deliberately GL-shaped — named uniform locations resolved
//! per program, fixed texture units, one global "current program" — because
//! that is the contract the material/shader layer is written against. Two
//! implementations ship:
//!
//! - [`gl::GlowBackend`] drives a real OpenGL 3.3 context (feature `gl`).
//! - [`trace::TraceBackend`] records every call for headless runs and tests.
//!
//! Handles are plain indices into backend-private tables, so renderer code
//! can hold and compare them without referencing any native GPU type.

use glam::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};

#[cfg(feature = "gl")]
pub mod gl;
pub mod trace;

// ── Handles ──────────────────────────────────────────────────────────────

/// Handle to a compiled and linked shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(pub u32);

/// Handle to a vertex or index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub u32);

/// Handle to a vertex array (attribute layout + bound buffers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexArrayId(pub u32);

/// Handle to a 2D texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Resolved location of a named uniform within a program.
///
/// Lookups that fail return `None` from
/// [`uniform_location`](GpuBackend::uniform_location) — the classic `-1`
/// sentinel. Writes to a missing uniform are simply never issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u32);

// ── Value types ──────────────────────────────────────────────────────────

/// A typed uniform value, covering every upload the render pass performs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat2(Mat2),
    Mat3(Mat3),
    Mat4(Mat4),
}

macro_rules! uniform_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(impl From<$ty> for UniformValue {
            fn from(value: $ty) -> Self {
                UniformValue::$variant(value)
            }
        })*
    };
}

uniform_from! {
    bool => Bool,
    i32 => Int,
    f32 => Float,
    Vec2 => Vec2,
    Vec3 => Vec3,
    Vec4 => Vec4,
    Mat2 => Mat2,
    Mat3 => Mat3,
    Mat4 => Mat4,
}

/// Primitive topology for a draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    Points,
    Lines,
    LineStrip,
    #[default]
    Triangles,
    TriangleStrip,
}

/// Target slot for buffer binds and uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferTarget {
    /// Per-vertex attribute data.
    Vertex,
    /// Element indices.
    Index,
}

/// Pixel layout of uploaded texture data, one byte per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFormat {
    Red,
    Rgb,
    Rgba,
}

impl TextureFormat {
    /// Bytes per pixel.
    pub fn channels(self) -> u32 {
        match self {
            TextureFormat::Red => 1,
            TextureFormat::Rgb => 3,
            TextureFormat::Rgba => 4,
        }
    }
}

// ── Errors ───────────────────────────────────────────────────────────────

/// Which stage of a program failed to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn as_str(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }
}

/// Program build failure, carrying the driver's info log.
///
/// This error is logged by the shader layer and then swallowed: a shader
/// that fails to build stays constructible but inert (draws with it produce
/// wrong pixels, never a crash).
#[derive(Debug, Clone)]
pub enum ShaderError {
    Compile { stage: ShaderStage, log: String },
    Link { log: String },
}

impl std::fmt::Display for ShaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderError::Compile { stage, log } => {
                write!(f, "{} shader compilation failed: {}", stage.as_str(), log)
            }
            ShaderError::Link { log } => write!(f, "program linking failed: {}", log),
        }
    }
}

impl std::error::Error for ShaderError {}

// ── The backend trait ────────────────────────────────────────────────────

/// The command surface the renderer needs from a GPU.
///
/// All calls are synchronous from the caller's point of view and must be
/// issued from the single thread that owns the graphics context. Binding
/// state (current program, current vertex array, active texture unit) is
/// global and mutable, exactly as in the underlying API.
pub trait GpuBackend {
    // ── Programs and uniforms ────────────────────────────────────────────

    /// Compile a vertex + fragment source pair and link a program.
    fn create_program(
        &mut self,
        label: &str,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<ProgramId, ShaderError>;

    fn delete_program(&mut self, program: ProgramId);

    /// Make the program the current one. Must precede any uniform write
    /// targeting it.
    fn use_program(&mut self, program: ProgramId);

    /// Resolve a uniform name. `None` means the uniform does not exist in
    /// the linked program (it may have been optimized out).
    fn uniform_location(&mut self, program: ProgramId, name: &str) -> Option<UniformLocation>;

    /// Upload a uniform value to the current program.
    fn set_uniform(&mut self, location: UniformLocation, value: &UniformValue);

    // ── Geometry ─────────────────────────────────────────────────────────

    fn create_vertex_array(&mut self) -> VertexArrayId;
    fn bind_vertex_array(&mut self, vao: Option<VertexArrayId>);
    fn delete_vertex_array(&mut self, vao: VertexArrayId);

    fn create_buffer(&mut self) -> BufferId;
    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<BufferId>);
    /// Upload the full contents of the buffer currently bound to `target`.
    fn buffer_data(&mut self, target: BufferTarget, data: &[u8]);
    fn delete_buffer(&mut self, buffer: BufferId);

    /// Describe one float attribute of the currently bound vertex array:
    /// `components` floats at byte `offset` within a vertex of byte `stride`.
    fn vertex_attribute(&mut self, slot: u32, components: i32, stride: i32, offset: i32);

    // ── Textures ─────────────────────────────────────────────────────────

    /// Create a 2D texture, upload `pixels`, and generate mipmaps.
    fn create_texture(
        &mut self,
        label: &str,
        width: u32,
        height: u32,
        format: TextureFormat,
        pixels: &[u8],
    ) -> TextureId;

    fn delete_texture(&mut self, texture: TextureId);

    /// Select the active texture unit for the next bind.
    fn active_texture_unit(&mut self, unit: u32);

    /// Bind a texture to the active unit (or unbind with `None`).
    fn bind_texture(&mut self, texture: Option<TextureId>);

    // ── Draws ────────────────────────────────────────────────────────────

    /// Draw `index_count` indices from the currently bound vertex array.
    fn draw_indexed(&mut self, mode: RenderMode, index_count: i32);

    /// Draw `vertex_count` consecutive vertices starting at `first`.
    fn draw_arrays(&mut self, mode: RenderMode, first: i32, vertex_count: i32);

    // ── Render state ─────────────────────────────────────────────────────

    /// Clear color and depth.
    fn clear(&mut self, color: [f32; 4]);

    fn set_viewport(&mut self, width: u32, height: u32);
    fn set_depth_mask(&mut self, enabled: bool);
    fn set_cull_face(&mut self, enabled: bool);
    fn set_line_width(&mut self, width: f32);
}
