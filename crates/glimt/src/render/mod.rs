//! The render pass: shaders, textures, materials, meshes, and the model
//! orchestrator, plus the grid/axis scene decorations.

pub mod axis;
pub mod context;
pub mod grid;
pub mod material;
pub mod mesh;
pub mod model;
pub mod shader;
pub mod shapes;
pub mod texture;

pub use axis::Axis;
pub use context::RenderContext;
pub use grid::FloorGrid;
pub use material::Material;
pub use mesh::{Mesh, Vertex};
pub use model::{Model, Renderable, MAX_LIGHTS};
pub use shader::{Shader, ShaderCache};
pub use texture::{Texture, TextureCache};
