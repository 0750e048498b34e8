//! OpenGL 3.3 backend over [glow](https://docs.rs/glow).
//!
//! The host creates a window and makes a GL context current (that plumbing
//! lives outside this crate), then hands the [`glow::Context`] to
//! [`GlowBackend::new`]. From there every renderer call maps onto one or two
//! GL calls.
//!
//! Native GL object handles never leak out: each `create_*` stores the glow
//! handle in a private table and returns its index, so the rest of the crate
//! only ever sees the plain ids from [`gpu`](crate::gpu).

use glow::HasContext;

use super::{
    BufferId, BufferTarget, GpuBackend, ProgramId, RenderMode, ShaderError, ShaderStage,
    TextureFormat, TextureId, UniformLocation, UniformValue, VertexArrayId,
};

/// [`GpuBackend`] implementation over a live OpenGL 3.3 context.
pub struct GlowBackend {
    gl: glow::Context,
    programs: Vec<Option<glow::Program>>,
    buffers: Vec<Option<glow::Buffer>>,
    vertex_arrays: Vec<Option<glow::VertexArray>>,
    textures: Vec<Option<glow::Texture>>,
    locations: Vec<glow::UniformLocation>,
}

impl GlowBackend {
    /// Wrap an already-current GL context and set the fixed pipeline state
    /// the renderer assumes (depth test, backface culling, tight unpack).
    pub fn new(gl: glow::Context) -> Self {
        unsafe {
            gl.enable(glow::DEPTH_TEST);
            gl.enable(glow::CULL_FACE);
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
        }
        Self {
            gl,
            programs: Vec::new(),
            buffers: Vec::new(),
            vertex_arrays: Vec::new(),
            textures: Vec::new(),
            locations: Vec::new(),
        }
    }

    /// Access the underlying glow context, for host-side plumbing that sits
    /// outside the backend contract (swap-interval tweaks and the like).
    pub fn raw(&self) -> &glow::Context {
        &self.gl
    }

    fn program(&self, id: ProgramId) -> Option<glow::Program> {
        self.programs.get(id.0 as usize).copied().flatten()
    }

    fn compile_stage(
        &self,
        stage: ShaderStage,
        source: &str,
    ) -> Result<glow::Shader, ShaderError> {
        let kind = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        };
        unsafe {
            let shader = self
                .gl
                .create_shader(kind)
                .map_err(|log| ShaderError::Compile { stage, log })?;
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
            if !self.gl.get_shader_compile_status(shader) {
                let log = self.gl.get_shader_info_log(shader);
                self.gl.delete_shader(shader);
                return Err(ShaderError::Compile { stage, log });
            }
            Ok(shader)
        }
    }
}

fn gl_mode(mode: RenderMode) -> u32 {
    match mode {
        RenderMode::Points => glow::POINTS,
        RenderMode::Lines => glow::LINES,
        RenderMode::LineStrip => glow::LINE_STRIP,
        RenderMode::Triangles => glow::TRIANGLES,
        RenderMode::TriangleStrip => glow::TRIANGLE_STRIP,
    }
}

fn gl_buffer_target(target: BufferTarget) -> u32 {
    match target {
        BufferTarget::Vertex => glow::ARRAY_BUFFER,
        BufferTarget::Index => glow::ELEMENT_ARRAY_BUFFER,
    }
}

fn gl_format(format: TextureFormat) -> u32 {
    match format {
        TextureFormat::Red => glow::RED,
        TextureFormat::Rgb => glow::RGB,
        TextureFormat::Rgba => glow::RGBA,
    }
}

impl GpuBackend for GlowBackend {
    fn create_program(
        &mut self,
        label: &str,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<ProgramId, ShaderError> {
        let vertex = self.compile_stage(ShaderStage::Vertex, vertex_src)?;
        let fragment = match self.compile_stage(ShaderStage::Fragment, fragment_src) {
            Ok(shader) => shader,
            Err(err) => {
                unsafe { self.gl.delete_shader(vertex) };
                return Err(err);
            }
        };

        unsafe {
            let program = match self.gl.create_program() {
                Ok(program) => program,
                Err(log) => {
                    self.gl.delete_shader(vertex);
                    self.gl.delete_shader(fragment);
                    return Err(ShaderError::Link { log });
                }
            };
            self.gl.attach_shader(program, vertex);
            self.gl.attach_shader(program, fragment);
            self.gl.link_program(program);

            // The stage objects are owned by the program after linking.
            self.gl.detach_shader(program, vertex);
            self.gl.detach_shader(program, fragment);
            self.gl.delete_shader(vertex);
            self.gl.delete_shader(fragment);

            if !self.gl.get_program_link_status(program) {
                let log = self.gl.get_program_info_log(program);
                self.gl.delete_program(program);
                return Err(ShaderError::Link { log });
            }

            log::debug!("linked shader program '{label}'");
            let id = ProgramId(self.programs.len() as u32);
            self.programs.push(Some(program));
            Ok(id)
        }
    }

    fn delete_program(&mut self, program: ProgramId) {
        if let Some(slot) = self.programs.get_mut(program.0 as usize) {
            if let Some(native) = slot.take() {
                unsafe { self.gl.delete_program(native) };
            }
        }
    }

    fn use_program(&mut self, program: ProgramId) {
        unsafe { self.gl.use_program(self.program(program)) };
    }

    fn uniform_location(&mut self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        let native = self.program(program)?;
        let location = unsafe { self.gl.get_uniform_location(native, name)? };
        let id = UniformLocation(self.locations.len() as u32);
        self.locations.push(location);
        Some(id)
    }

    fn set_uniform(&mut self, location: UniformLocation, value: &UniformValue) {
        let Some(native) = self.locations.get(location.0 as usize) else {
            return;
        };
        let loc = Some(native);
        unsafe {
            match value {
                UniformValue::Bool(v) => self.gl.uniform_1_i32(loc, *v as i32),
                UniformValue::Int(v) => self.gl.uniform_1_i32(loc, *v),
                UniformValue::Float(v) => self.gl.uniform_1_f32(loc, *v),
                UniformValue::Vec2(v) => self.gl.uniform_2_f32(loc, v.x, v.y),
                UniformValue::Vec3(v) => self.gl.uniform_3_f32(loc, v.x, v.y, v.z),
                UniformValue::Vec4(v) => self.gl.uniform_4_f32(loc, v.x, v.y, v.z, v.w),
                UniformValue::Mat2(m) => {
                    self.gl
                        .uniform_matrix_2_f32_slice(loc, false, &m.to_cols_array())
                }
                UniformValue::Mat3(m) => {
                    self.gl
                        .uniform_matrix_3_f32_slice(loc, false, &m.to_cols_array())
                }
                UniformValue::Mat4(m) => {
                    self.gl
                        .uniform_matrix_4_f32_slice(loc, false, &m.to_cols_array())
                }
            }
        }
    }

    fn create_vertex_array(&mut self) -> VertexArrayId {
        let vao = unsafe { self.gl.create_vertex_array().ok() };
        let id = VertexArrayId(self.vertex_arrays.len() as u32);
        self.vertex_arrays.push(vao);
        id
    }

    fn bind_vertex_array(&mut self, vao: Option<VertexArrayId>) {
        let native = vao.and_then(|v| self.vertex_arrays.get(v.0 as usize).copied().flatten());
        unsafe { self.gl.bind_vertex_array(native) };
    }

    fn delete_vertex_array(&mut self, vao: VertexArrayId) {
        if let Some(slot) = self.vertex_arrays.get_mut(vao.0 as usize) {
            if let Some(native) = slot.take() {
                unsafe { self.gl.delete_vertex_array(native) };
            }
        }
    }

    fn create_buffer(&mut self) -> BufferId {
        let buffer = unsafe { self.gl.create_buffer().ok() };
        let id = BufferId(self.buffers.len() as u32);
        self.buffers.push(buffer);
        id
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<BufferId>) {
        let native = buffer.and_then(|b| self.buffers.get(b.0 as usize).copied().flatten());
        unsafe { self.gl.bind_buffer(gl_buffer_target(target), native) };
    }

    fn buffer_data(&mut self, target: BufferTarget, data: &[u8]) {
        unsafe {
            self.gl
                .buffer_data_u8_slice(gl_buffer_target(target), data, glow::STATIC_DRAW)
        };
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        if let Some(slot) = self.buffers.get_mut(buffer.0 as usize) {
            if let Some(native) = slot.take() {
                unsafe { self.gl.delete_buffer(native) };
            }
        }
    }

    fn vertex_attribute(&mut self, slot: u32, components: i32, stride: i32, offset: i32) {
        unsafe {
            self.gl.enable_vertex_attrib_array(slot);
            self.gl
                .vertex_attrib_pointer_f32(slot, components, glow::FLOAT, false, stride, offset);
        }
    }

    fn create_texture(
        &mut self,
        label: &str,
        width: u32,
        height: u32,
        format: TextureFormat,
        pixels: &[u8],
    ) -> TextureId {
        let format_gl = gl_format(format);
        let texture = unsafe {
            match self.gl.create_texture() {
                Ok(texture) => {
                    self.gl.bind_texture(glow::TEXTURE_2D, Some(texture));
                    self.gl.tex_parameter_i32(
                        glow::TEXTURE_2D,
                        glow::TEXTURE_WRAP_S,
                        glow::REPEAT as i32,
                    );
                    self.gl.tex_parameter_i32(
                        glow::TEXTURE_2D,
                        glow::TEXTURE_WRAP_T,
                        glow::REPEAT as i32,
                    );
                    self.gl.tex_parameter_i32(
                        glow::TEXTURE_2D,
                        glow::TEXTURE_MIN_FILTER,
                        glow::LINEAR_MIPMAP_LINEAR as i32,
                    );
                    self.gl.tex_parameter_i32(
                        glow::TEXTURE_2D,
                        glow::TEXTURE_MAG_FILTER,
                        glow::LINEAR as i32,
                    );
                    self.gl.tex_image_2d(
                        glow::TEXTURE_2D,
                        0,
                        format_gl as i32,
                        width as i32,
                        height as i32,
                        0,
                        format_gl,
                        glow::UNSIGNED_BYTE,
                        glow::PixelUnpackData::Slice(Some(pixels)),
                    );
                    self.gl.generate_mipmap(glow::TEXTURE_2D);
                    self.gl.bind_texture(glow::TEXTURE_2D, None);
                    Some(texture)
                }
                Err(log) => {
                    log::error!("failed to create texture '{label}': {log}");
                    None
                }
            }
        };
        let id = TextureId(self.textures.len() as u32);
        self.textures.push(texture);
        id
    }

    fn delete_texture(&mut self, texture: TextureId) {
        if let Some(slot) = self.textures.get_mut(texture.0 as usize) {
            if let Some(native) = slot.take() {
                unsafe { self.gl.delete_texture(native) };
            }
        }
    }

    fn active_texture_unit(&mut self, unit: u32) {
        unsafe { self.gl.active_texture(glow::TEXTURE0 + unit) };
    }

    fn bind_texture(&mut self, texture: Option<TextureId>) {
        let native = texture.and_then(|t| self.textures.get(t.0 as usize).copied().flatten());
        unsafe { self.gl.bind_texture(glow::TEXTURE_2D, native) };
    }

    fn draw_indexed(&mut self, mode: RenderMode, index_count: i32) {
        unsafe {
            self.gl
                .draw_elements(gl_mode(mode), index_count, glow::UNSIGNED_INT, 0)
        };
    }

    fn draw_arrays(&mut self, mode: RenderMode, first: i32, vertex_count: i32) {
        unsafe { self.gl.draw_arrays(gl_mode(mode), first, vertex_count) };
    }

    fn clear(&mut self, color: [f32; 4]) {
        unsafe {
            self.gl.clear_color(color[0], color[1], color[2], color[3]);
            self.gl
                .clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        unsafe { self.gl.viewport(0, 0, width as i32, height as i32) };
    }

    fn set_depth_mask(&mut self, enabled: bool) {
        unsafe { self.gl.depth_mask(enabled) };
    }

    fn set_cull_face(&mut self, enabled: bool) {
        unsafe {
            if enabled {
                self.gl.enable(glow::CULL_FACE);
            } else {
                self.gl.disable(glow::CULL_FACE);
            }
        }
    }

    fn set_line_width(&mut self, width: f32) {
        unsafe { self.gl.line_width(width) };
    }
}
