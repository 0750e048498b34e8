//! Recording backend for headless runs and tests.
//!
//! [`TraceBackend`] implements [`GpuBackend`] by appending every call to an
//! inspectable [`TraceCall`] list instead of touching a driver. Handles are
//! handed out from monotonic counters, and uniform lookups succeed unless a
//! name is registered as missing — which is how the tests exercise the
//! "uniform not present, silently ignored" path.

use std::collections::{HashMap, HashSet};

use super::{
    BufferId, BufferTarget, GpuBackend, ProgramId, RenderMode, ShaderError, ShaderStage,
    TextureFormat, TextureId, UniformLocation, UniformValue, VertexArrayId,
};

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceCall {
    CreateProgram { program: ProgramId, label: String },
    DeleteProgram(ProgramId),
    UseProgram(ProgramId),
    UniformLocation { program: ProgramId, name: String },
    SetUniform { location: UniformLocation, value: UniformValue },
    CreateVertexArray(VertexArrayId),
    BindVertexArray(Option<VertexArrayId>),
    DeleteVertexArray(VertexArrayId),
    CreateBuffer(BufferId),
    BindBuffer { target: BufferTarget, buffer: Option<BufferId> },
    BufferData { target: BufferTarget, len: usize },
    DeleteBuffer(BufferId),
    VertexAttribute { slot: u32, components: i32, stride: i32, offset: i32 },
    CreateTexture { texture: TextureId, label: String, width: u32, height: u32, format: TextureFormat },
    DeleteTexture(TextureId),
    ActiveTextureUnit(u32),
    BindTexture(Option<TextureId>),
    DrawIndexed { mode: RenderMode, index_count: i32 },
    DrawArrays { mode: RenderMode, first: i32, vertex_count: i32 },
    Clear([f32; 4]),
    SetViewport(u32, u32),
    SetDepthMask(bool),
    SetCullFace(bool),
    SetLineWidth(f32),
}

/// A [`GpuBackend`] that records instead of rendering.
#[derive(Debug, Default)]
pub struct TraceBackend {
    /// Every call, in issue order.
    pub calls: Vec<TraceCall>,
    next_program: u32,
    next_buffer: u32,
    next_vertex_array: u32,
    next_texture: u32,
    next_location: u32,
    locations: HashMap<(ProgramId, String), UniformLocation>,
    missing_uniforms: HashSet<String>,
    fail_compile: bool,
}

impl TraceBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make lookups for `name` return `None`, as if the linked program did
    /// not contain that uniform.
    pub fn mark_uniform_missing(&mut self, name: &str) {
        self.missing_uniforms.insert(name.to_owned());
    }

    /// Make every subsequent `create_program` fail with a compile error.
    pub fn fail_program_creation(&mut self, fail: bool) {
        self.fail_compile = fail;
    }

    /// Number of draw calls (indexed and array) recorded so far.
    pub fn draw_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, TraceCall::DrawIndexed { .. } | TraceCall::DrawArrays { .. }))
            .count()
    }

    /// Number of `uniform_location` queries recorded for `name`.
    pub fn location_query_count(&self, name: &str) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, TraceCall::UniformLocation { name: n, .. } if n == name))
            .count()
    }

    /// The last value uploaded to the uniform called `name`, if any.
    pub fn uniform(&self, name: &str) -> Option<UniformValue> {
        let location = self
            .locations
            .iter()
            .find(|((_, n), _)| n == name)
            .map(|(_, &loc)| loc)?;
        self.calls.iter().rev().find_map(|c| match c {
            TraceCall::SetUniform { location: l, value } if *l == location => Some(*value),
            _ => None,
        })
    }

    /// Index within the trace of the first call matching `predicate`.
    pub fn position(&self, predicate: impl Fn(&TraceCall) -> bool) -> Option<usize> {
        self.calls.iter().position(predicate)
    }
}

impl GpuBackend for TraceBackend {
    fn create_program(
        &mut self,
        label: &str,
        _vertex_src: &str,
        _fragment_src: &str,
    ) -> Result<ProgramId, ShaderError> {
        if self.fail_compile {
            return Err(ShaderError::Compile {
                stage: ShaderStage::Vertex,
                log: "trace backend configured to fail".to_owned(),
            });
        }
        let program = ProgramId(self.next_program);
        self.next_program += 1;
        self.calls.push(TraceCall::CreateProgram {
            program,
            label: label.to_owned(),
        });
        Ok(program)
    }

    fn delete_program(&mut self, program: ProgramId) {
        self.calls.push(TraceCall::DeleteProgram(program));
    }

    fn use_program(&mut self, program: ProgramId) {
        self.calls.push(TraceCall::UseProgram(program));
    }

    fn uniform_location(&mut self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        self.calls.push(TraceCall::UniformLocation {
            program,
            name: name.to_owned(),
        });
        if self.missing_uniforms.contains(name) {
            return None;
        }
        let key = (program, name.to_owned());
        if let Some(&location) = self.locations.get(&key) {
            return Some(location);
        }
        let location = UniformLocation(self.next_location);
        self.next_location += 1;
        self.locations.insert(key, location);
        Some(location)
    }

    fn set_uniform(&mut self, location: UniformLocation, value: &UniformValue) {
        self.calls.push(TraceCall::SetUniform {
            location,
            value: *value,
        });
    }

    fn create_vertex_array(&mut self) -> VertexArrayId {
        let vao = VertexArrayId(self.next_vertex_array);
        self.next_vertex_array += 1;
        self.calls.push(TraceCall::CreateVertexArray(vao));
        vao
    }

    fn bind_vertex_array(&mut self, vao: Option<VertexArrayId>) {
        self.calls.push(TraceCall::BindVertexArray(vao));
    }

    fn delete_vertex_array(&mut self, vao: VertexArrayId) {
        self.calls.push(TraceCall::DeleteVertexArray(vao));
    }

    fn create_buffer(&mut self) -> BufferId {
        let buffer = BufferId(self.next_buffer);
        self.next_buffer += 1;
        self.calls.push(TraceCall::CreateBuffer(buffer));
        buffer
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<BufferId>) {
        self.calls.push(TraceCall::BindBuffer { target, buffer });
    }

    fn buffer_data(&mut self, target: BufferTarget, data: &[u8]) {
        self.calls.push(TraceCall::BufferData {
            target,
            len: data.len(),
        });
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        self.calls.push(TraceCall::DeleteBuffer(buffer));
    }

    fn vertex_attribute(&mut self, slot: u32, components: i32, stride: i32, offset: i32) {
        self.calls.push(TraceCall::VertexAttribute {
            slot,
            components,
            stride,
            offset,
        });
    }

    fn create_texture(
        &mut self,
        label: &str,
        width: u32,
        height: u32,
        format: TextureFormat,
        _pixels: &[u8],
    ) -> TextureId {
        let texture = TextureId(self.next_texture);
        self.next_texture += 1;
        self.calls.push(TraceCall::CreateTexture {
            texture,
            label: label.to_owned(),
            width,
            height,
            format,
        });
        texture
    }

    fn delete_texture(&mut self, texture: TextureId) {
        self.calls.push(TraceCall::DeleteTexture(texture));
    }

    fn active_texture_unit(&mut self, unit: u32) {
        self.calls.push(TraceCall::ActiveTextureUnit(unit));
    }

    fn bind_texture(&mut self, texture: Option<TextureId>) {
        self.calls.push(TraceCall::BindTexture(texture));
    }

    fn draw_indexed(&mut self, mode: RenderMode, index_count: i32) {
        self.calls.push(TraceCall::DrawIndexed { mode, index_count });
    }

    fn draw_arrays(&mut self, mode: RenderMode, first: i32, vertex_count: i32) {
        self.calls.push(TraceCall::DrawArrays {
            mode,
            first,
            vertex_count,
        });
    }

    fn clear(&mut self, color: [f32; 4]) {
        self.calls.push(TraceCall::Clear(color));
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.calls.push(TraceCall::SetViewport(width, height));
    }

    fn set_depth_mask(&mut self, enabled: bool) {
        self.calls.push(TraceCall::SetDepthMask(enabled));
    }

    fn set_cull_face(&mut self, enabled: bool) {
        self.calls.push(TraceCall::SetCullFace(enabled));
    }

    fn set_line_width(&mut self, width: f32) {
        self.calls.push(TraceCall::SetLineWidth(width));
    }
}
