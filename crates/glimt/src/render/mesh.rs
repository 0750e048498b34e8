//! Vertex format and GPU meshes.
//!
//! [`Vertex`] is the one layout every shader in the crate consumes: six
//! float attributes at fixed slots. [`Mesh`] owns immutable vertex/index
//! data on the CPU and creates its GPU buffers lazily on the first
//! [`setup`](Mesh::setup) — a second call is a no-op, so meshes shared
//! across models can be set up blindly.

use std::cell::OnceCell;
use std::mem::{offset_of, size_of};

use bytemuck::{Pod, Zeroable};

use crate::gpu::{BufferId, BufferTarget, GpuBackend, RenderMode, VertexArrayId};

/// One vertex: 18 floats, 72 bytes, no padding.
///
/// | Slot | Attribute | Components |
/// |------|-----------|------------|
/// | 0    | position  | 3          |
/// | 1    | color     | 4          |
/// | 2    | normal    | 3          |
/// | 3    | uv        | 2          |
/// | 4    | tangent   | 3          |
/// | 5    | bitangent | 3          |
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub tangent: [f32; 3],
    pub bitangent: [f32; 3],
}

impl Vertex {
    /// `(slot, components, byte offset)` for each attribute, in slot order.
    pub const ATTRIBUTES: [(u32, i32, i32); 6] = [
        (0, 3, offset_of!(Vertex, position) as i32),
        (1, 4, offset_of!(Vertex, color) as i32),
        (2, 3, offset_of!(Vertex, normal) as i32),
        (3, 2, offset_of!(Vertex, uv) as i32),
        (4, 3, offset_of!(Vertex, tangent) as i32),
        (5, 3, offset_of!(Vertex, bitangent) as i32),
    ];

    pub const STRIDE: i32 = size_of::<Vertex>() as i32;
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            color: [1.0, 1.0, 1.0, 1.0],
            normal: [0.0, 1.0, 0.0],
            uv: [0.0; 2],
            tangent: [1.0, 0.0, 0.0],
            bitangent: [0.0, 0.0, 1.0],
        }
    }
}

struct MeshGpu {
    vao: VertexArrayId,
    vbo: BufferId,
    ebo: BufferId,
}

/// Immutable geometry plus lazily created GPU buffers.
pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    gpu: OnceCell<MeshGpu>,
}

impl Mesh {
    /// Take ownership of vertex/index data. Nothing touches the GPU until
    /// [`setup`](Mesh::setup).
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self {
            vertices,
            indices,
            gpu: OnceCell::new(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Create the vertex array, upload both buffers, and describe the six
    /// attributes. Idempotent: if the handles already exist this returns
    /// immediately without allocating a second set.
    ///
    /// Must run on the thread owning the GPU context, before the first
    /// [`render`](Mesh::render).
    pub fn setup(&self, gpu: &mut dyn GpuBackend) {
        self.gpu.get_or_init(|| {
            let vao = gpu.create_vertex_array();
            let vbo = gpu.create_buffer();
            let ebo = gpu.create_buffer();

            gpu.bind_vertex_array(Some(vao));

            gpu.bind_buffer(BufferTarget::Vertex, Some(vbo));
            gpu.buffer_data(BufferTarget::Vertex, bytemuck::cast_slice(&self.vertices));

            gpu.bind_buffer(BufferTarget::Index, Some(ebo));
            gpu.buffer_data(BufferTarget::Index, bytemuck::cast_slice(&self.indices));

            for (slot, components, offset) in Vertex::ATTRIBUTES {
                gpu.vertex_attribute(slot, components, Vertex::STRIDE, offset);
            }

            gpu.bind_vertex_array(None);

            MeshGpu { vao, vbo, ebo }
        });
    }

    /// Bind the vertex array and issue one indexed draw over all indices.
    ///
    /// Rendering before [`setup`](Mesh::setup) is a warning and a no-op.
    pub fn render(&self, gpu: &mut dyn GpuBackend, mode: RenderMode) {
        let Some(handles) = self.gpu.get() else {
            log::warn!("mesh rendered before setup(), skipping draw");
            return;
        };
        gpu.bind_vertex_array(Some(handles.vao));
        gpu.draw_indexed(mode, self.indices.len() as i32);
    }

    /// Release the GPU buffers. The mesh can be set up again afterwards.
    pub fn dispose(&mut self, gpu: &mut dyn GpuBackend) {
        if let Some(handles) = self.gpu.take() {
            gpu.delete_vertex_array(handles.vao);
            gpu.delete_buffer(handles.vbo);
            gpu.delete_buffer(handles.ebo);
        }
    }
}
