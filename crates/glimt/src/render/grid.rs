//! Floor grid decoration.
//!
//! A fullscreen quad in clip space; the grid shader unprojects each fragment
//! onto the y=0 plane and draws the lines there. The quad must not write
//! depth (it would occlude everything) and must not be culled, so both
//! states are toggled around its draw and restored afterwards.

use std::cell::OnceCell;
use std::rc::Rc;

use bytemuck::cast_slice;

use crate::config;
use crate::gpu::{BufferId, BufferTarget, GpuBackend, RenderMode, VertexArrayId};
use crate::render::context::RenderContext;
use crate::render::model::Renderable;
use crate::render::shader::{Shader, ShaderCache};

// Two clip-space triangles covering the viewport, z = 0.
#[rustfmt::skip]
const QUAD_VERTICES: [f32; 18] = [
    -1.0,  1.0, 0.0,
    -1.0, -1.0, 0.0,
     1.0,  1.0, 0.0,

     1.0,  1.0, 0.0,
    -1.0, -1.0, 0.0,
     1.0, -1.0, 0.0,
];

struct GridGpu {
    vao: VertexArrayId,
    vbo: BufferId,
}

/// Infinite-looking floor grid on the y=0 plane.
pub struct FloorGrid {
    shader: Rc<Shader>,
    gpu: OnceCell<GridGpu>,
}

impl FloorGrid {
    pub fn new(gpu: &mut dyn GpuBackend, shaders: &mut ShaderCache) -> Self {
        Self {
            shader: shaders.get(gpu, config::GRID_SHADER),
            gpu: OnceCell::new(),
        }
    }
}

impl Renderable for FloorGrid {
    fn setup(&self, gpu: &mut dyn GpuBackend) {
        self.gpu.get_or_init(|| {
            let vao = gpu.create_vertex_array();
            let vbo = gpu.create_buffer();
            gpu.bind_vertex_array(Some(vao));
            gpu.bind_buffer(BufferTarget::Vertex, Some(vbo));
            gpu.buffer_data(BufferTarget::Vertex, cast_slice(&QUAD_VERTICES));
            gpu.vertex_attribute(0, 3, 3 * 4, 0);
            gpu.bind_vertex_array(None);
            GridGpu { vao, vbo }
        });
    }

    fn render(&self, gpu: &mut dyn GpuBackend, ctx: &RenderContext<'_>) {
        let Some(handles) = self.gpu.get() else {
            log::warn!("floor grid rendered before setup(), skipping");
            return;
        };

        self.shader.bind(gpu);
        self.shader.set(gpu, "uView", ctx.view);
        self.shader.set(gpu, "uProjection", ctx.projection);

        gpu.set_depth_mask(false);
        gpu.set_cull_face(false);

        gpu.bind_vertex_array(Some(handles.vao));
        gpu.draw_arrays(RenderMode::Triangles, 0, 6);
        gpu.bind_vertex_array(None);

        gpu.set_depth_mask(true);
        gpu.set_cull_face(true);
    }
}
