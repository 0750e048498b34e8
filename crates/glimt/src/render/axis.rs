//! Coordinate axis gizmo.
//!
//! Three colored line segments from the origin: X red, Y green, Z blue.
//! Vertices are nudged slightly off the origin so the lines don't z-fight
//! with geometry sitting exactly on the axes.

use std::cell::OnceCell;
use std::rc::Rc;

use bytemuck::cast_slice;

use crate::config;
use crate::gpu::{BufferId, BufferTarget, GpuBackend, RenderMode, VertexArrayId};
use crate::render::context::RenderContext;
use crate::render::model::Renderable;
use crate::render::shader::{Shader, ShaderCache};

const OFFSET: f32 = 0.005;

// Interleaved position (3) + color (3) per vertex, two vertices per axis.
#[rustfmt::skip]
const AXIS_VERTICES: [f32; 36] = [
    OFFSET,       0.0, OFFSET,       1.0, 0.0, 0.0, // X
    1.0 + OFFSET, 0.0, OFFSET,       1.0, 0.0, 0.0,

    OFFSET, 0.0, OFFSET,             0.0, 1.0, 0.0, // Y
    OFFSET, 1.0, OFFSET,             0.0, 1.0, 0.0,

    OFFSET, 0.0, OFFSET,             0.0, 0.0, 1.0, // Z
    OFFSET, 0.0, 1.0 + OFFSET,       0.0, 0.0, 1.0,
];

const LINE_WIDTH: f32 = 3.0;

struct AxisGpu {
    vao: VertexArrayId,
    vbo: BufferId,
}

/// World-origin axis gizmo.
pub struct Axis {
    shader: Rc<Shader>,
    gpu: OnceCell<AxisGpu>,
}

impl Axis {
    pub fn new(gpu: &mut dyn GpuBackend, shaders: &mut ShaderCache) -> Self {
        Self {
            shader: shaders.get(gpu, config::AXIS_SHADER),
            gpu: OnceCell::new(),
        }
    }
}

impl Renderable for Axis {
    fn setup(&self, gpu: &mut dyn GpuBackend) {
        self.gpu.get_or_init(|| {
            let vao = gpu.create_vertex_array();
            let vbo = gpu.create_buffer();
            gpu.bind_vertex_array(Some(vao));
            gpu.bind_buffer(BufferTarget::Vertex, Some(vbo));
            gpu.buffer_data(BufferTarget::Vertex, cast_slice(&AXIS_VERTICES));
            gpu.vertex_attribute(0, 3, 6 * 4, 0);
            gpu.vertex_attribute(1, 3, 6 * 4, 3 * 4);
            gpu.bind_vertex_array(None);
            AxisGpu { vao, vbo }
        });
    }

    fn render(&self, gpu: &mut dyn GpuBackend, ctx: &RenderContext<'_>) {
        let Some(handles) = self.gpu.get() else {
            log::warn!("axis gizmo rendered before setup(), skipping");
            return;
        };

        self.shader.bind(gpu);
        self.shader.set(gpu, "uModel", ctx.model);
        self.shader.set(gpu, "uView", ctx.view);
        self.shader.set(gpu, "uProjection", ctx.projection);

        gpu.set_line_width(LINE_WIDTH);
        gpu.bind_vertex_array(Some(handles.vao));
        gpu.draw_arrays(RenderMode::Lines, 0, 6);
        gpu.bind_vertex_array(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::trace::{TraceBackend, TraceCall};
    use glam::{Mat4, Vec3};

    #[test]
    fn draws_six_line_vertices() {
        let mut gpu = TraceBackend::new();
        let mut shaders = ShaderCache::new();
        shaders.insert_source(&mut gpu, config::AXIS_SHADER, "v", "f");

        let axis = Axis::new(&mut gpu, &mut shaders);
        axis.setup(&mut gpu);

        let lights = [];
        let ctx = RenderContext::new(Mat4::IDENTITY, Mat4::IDENTITY, Vec3::ZERO, &lights);
        axis.render(&mut gpu, &ctx);

        assert!(gpu.calls.contains(&TraceCall::SetLineWidth(LINE_WIDTH)));
        assert!(gpu.calls.contains(&TraceCall::DrawArrays {
            mode: RenderMode::Lines,
            first: 0,
            vertex_count: 6,
        }));
    }

    #[test]
    fn setup_twice_allocates_once() {
        let mut gpu = TraceBackend::new();
        let mut shaders = ShaderCache::new();
        shaders.insert_source(&mut gpu, config::AXIS_SHADER, "v", "f");

        let axis = Axis::new(&mut gpu, &mut shaders);
        axis.setup(&mut gpu);
        axis.setup(&mut gpu);

        let vaos = gpu
            .calls
            .iter()
            .filter(|c| matches!(c, TraceCall::CreateVertexArray(_)))
            .count();
        assert_eq!(vaos, 1);
    }
}
