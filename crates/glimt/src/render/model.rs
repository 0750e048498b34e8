//! # Model — the render orchestrator
//!
//! A [`Model`] is an ordered list of mesh groups, each pairing a mesh with a
//! material. Order is draw order. Rendering one group runs the full state
//! resolution for a draw:
//!
//! ```text
//!   resolve shader (context override, else the material's own)
//!     │
//!     ├─ bind program                       ── must precede all uniforms
//!     ├─ scene uniforms                     ── projection, view, model,
//!     │                                        camera position, light array
//!     ├─ material.apply_uniforms()          ── the material's own bag
//!     ├─ material.bind_textures()           ── fixed units 0/1/2
//!     └─ mesh.render(context.render_mode)   ── one indexed draw
//! ```
//!
//! Groups missing a mesh, a material, or any shader to draw with are logged
//! and skipped; a frame always runs to completion.

use std::rc::Rc;

use crate::gpu::GpuBackend;
use crate::render::context::RenderContext;
use crate::render::material::Material;
use crate::render::mesh::Mesh;
use crate::render::shader::Shader;
use crate::scene::light::Light;

/// Most lights uploaded per draw; extras are dropped.
pub const MAX_LIGHTS: usize = 8;

/// Anything the scene can set up once and draw every frame: models, the
/// floor grid, the axis gizmo.
pub trait Renderable {
    /// Create GPU resources. Idempotent.
    fn setup(&self, gpu: &mut dyn GpuBackend);

    /// Draw with the state in `ctx`.
    fn render(&self, gpu: &mut dyn GpuBackend, ctx: &RenderContext<'_>);
}

struct MeshGroup {
    mesh: Option<Rc<Mesh>>,
    material: Option<Rc<Material>>,
}

/// An ordered sequence of (mesh, material) pairs.
#[derive(Default)]
pub struct Model {
    groups: Vec<MeshGroup>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a mesh group. Either half may be absent — loaders produce
    /// incomplete groups for broken assets, and render tolerates them.
    pub fn add_mesh_group(&mut self, mesh: Option<Rc<Mesh>>, material: Option<Rc<Material>>) {
        self.groups.push(MeshGroup { mesh, material });
    }

    /// Append a complete mesh group.
    pub fn add_group(&mut self, mesh: Rc<Mesh>, material: Rc<Material>) {
        self.add_mesh_group(Some(mesh), Some(material));
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

impl Renderable for Model {
    fn setup(&self, gpu: &mut dyn GpuBackend) {
        for group in &self.groups {
            if let Some(mesh) = &group.mesh {
                // Mesh::setup is idempotent, so shared meshes are fine.
                mesh.setup(gpu);
            }
        }
    }

    fn render(&self, gpu: &mut dyn GpuBackend, ctx: &RenderContext<'_>) {
        for (index, group) in self.groups.iter().enumerate() {
            let (Some(mesh), Some(material)) = (&group.mesh, &group.material) else {
                log::warn!("mesh group {index}: empty mesh or material, skipping");
                continue;
            };

            let Some(shader) = ctx.shader_override.as_ref().or(material.shader()) else {
                log::warn!("mesh group {index}: no shader to draw with, skipping");
                continue;
            };
            let shader = Rc::clone(shader);

            shader.bind(gpu);

            // Scene uniforms first, then the material's, then textures. The
            // only hard ordering constraint is that the bind above precedes
            // every write.
            shader.set(gpu, "uProjection", ctx.projection);
            shader.set(gpu, "uView", ctx.view);
            shader.set(gpu, "uModel", ctx.model);
            shader.set(gpu, "uWorld.viewPosition", ctx.camera_position);
            push_lights(gpu, &shader, ctx.lights);

            material.apply_uniforms(gpu, &shader);
            material.bind_textures(gpu, &shader);

            mesh.render(gpu, ctx.render_mode);
        }
    }
}

/// Upload the light array as indexed struct fields plus a count, so the
/// shader can bound its loop. Lights beyond [`MAX_LIGHTS`] are dropped.
fn push_lights(gpu: &mut dyn GpuBackend, shader: &Shader, lights: &[Light]) {
    let count = lights.len().min(MAX_LIGHTS);
    shader.set(gpu, "uWorld.lightCount", count as i32);

    for (i, light) in lights.iter().take(MAX_LIGHTS).enumerate() {
        let attenuation = light.attenuation();
        let (inner_cutoff, outer_cutoff) = light.cutoffs();

        shader.set(gpu, &format!("uWorld.lights[{i}].kind"), light.kind() as i32);
        shader.set(gpu, &format!("uWorld.lights[{i}].color"), light.color());
        shader.set(
            gpu,
            &format!("uWorld.lights[{i}].intensity"),
            light.intensity(),
        );
        shader.set(
            gpu,
            &format!("uWorld.lights[{i}].position"),
            light.position(),
        );
        shader.set(
            gpu,
            &format!("uWorld.lights[{i}].direction"),
            light.direction(),
        );
        shader.set(
            gpu,
            &format!("uWorld.lights[{i}].constant"),
            attenuation.constant,
        );
        shader.set(
            gpu,
            &format!("uWorld.lights[{i}].linear"),
            attenuation.linear,
        );
        shader.set(
            gpu,
            &format!("uWorld.lights[{i}].quadratic"),
            attenuation.quadratic,
        );
        shader.set(
            gpu,
            &format!("uWorld.lights[{i}].innerCutoff"),
            inner_cutoff,
        );
        shader.set(
            gpu,
            &format!("uWorld.lights[{i}].outerCutoff"),
            outer_cutoff,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::trace::{TraceBackend, TraceCall};
    use crate::gpu::{RenderMode, UniformValue};
    use crate::render::material::DIFFUSE_COLOR_UNIFORM;
    use crate::render::mesh::Vertex;
    use glam::{Mat4, Vec3, Vec4};

    fn triangle() -> Rc<Mesh> {
        let vertices = vec![Vertex::default(), Vertex::default(), Vertex::default()];
        Rc::new(Mesh::new(vertices, vec![0, 1, 2]))
    }

    fn material_with_shader(gpu: &mut TraceBackend) -> Rc<Material> {
        let shader = Rc::new(Shader::from_source(gpu, "model-test", "v", "f"));
        let mut material = Material::new();
        material.set_shader(shader);
        material.set_uniform(DIFFUSE_COLOR_UNIFORM, Vec4::ONE);
        Rc::new(material)
    }

    fn context(lights: &[Light]) -> RenderContext<'_> {
        RenderContext::new(Mat4::IDENTITY, Mat4::IDENTITY, Vec3::new(0.0, 2.0, 5.0), lights)
    }

    #[test]
    fn group_with_missing_material_is_skipped_without_drawing() {
        let mut gpu = TraceBackend::new();
        let mut model = Model::new();
        model.add_mesh_group(Some(triangle()), None);
        model.setup(&mut gpu);

        model.render(&mut gpu, &context(&[]));

        assert_eq!(gpu.draw_count(), 0);
        // No shader was ever bound either.
        assert!(!gpu.calls.iter().any(|c| matches!(c, TraceCall::UseProgram(_))));
    }

    #[test]
    fn bad_group_does_not_stop_later_groups() {
        let mut gpu = TraceBackend::new();
        let material = material_with_shader(&mut gpu);
        let mut model = Model::new();
        model.add_mesh_group(None, Some(Rc::clone(&material)));
        model.add_group(triangle(), material);
        model.setup(&mut gpu);

        model.render(&mut gpu, &context(&[]));

        assert_eq!(gpu.draw_count(), 1);
    }

    #[test]
    fn material_without_shader_is_skipped() {
        let mut gpu = TraceBackend::new();
        let mut model = Model::new();
        model.add_group(triangle(), Rc::new(Material::new()));
        model.setup(&mut gpu);

        model.render(&mut gpu, &context(&[]));

        assert_eq!(gpu.draw_count(), 0);
    }

    #[test]
    fn program_binds_before_uniforms_before_texture_binds_before_draw() {
        let mut gpu = TraceBackend::new();
        let material = material_with_shader(&mut gpu);
        let mut model = Model::new();
        model.add_group(triangle(), material);
        model.setup(&mut gpu);

        let start = gpu.calls.len();
        model.render(&mut gpu, &context(&[]));
        let trace = &gpu.calls[start..];

        let bind = trace
            .iter()
            .position(|c| matches!(c, TraceCall::UseProgram(_)))
            .expect("program bound");
        let first_uniform = trace
            .iter()
            .position(|c| matches!(c, TraceCall::SetUniform { .. }))
            .expect("uniforms written");
        let draw = trace
            .iter()
            .position(|c| matches!(c, TraceCall::DrawIndexed { .. }))
            .expect("draw issued");

        assert!(bind < first_uniform);
        assert!(first_uniform < draw);
    }

    #[test]
    fn scene_uniforms_carry_context_values() {
        let mut gpu = TraceBackend::new();
        let material = material_with_shader(&mut gpu);
        let mut model = Model::new();
        model.add_group(triangle(), material);
        model.setup(&mut gpu);

        let model_matrix = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let ctx = context(&[]).with_model(model_matrix);
        model.render(&mut gpu, &ctx);

        assert_eq!(gpu.uniform("uModel"), Some(UniformValue::Mat4(model_matrix)));
        assert_eq!(
            gpu.uniform("uWorld.viewPosition"),
            Some(UniformValue::Vec3(Vec3::new(0.0, 2.0, 5.0)))
        );
        assert_eq!(gpu.uniform("uWorld.lightCount"), Some(UniformValue::Int(0)));
    }

    #[test]
    fn lights_upload_indexed_fields_and_count() {
        let mut gpu = TraceBackend::new();
        let material = material_with_shader(&mut gpu);
        let mut model = Model::new();
        model.add_group(triangle(), material);
        model.setup(&mut gpu);

        let lights = [
            Light::directional(Vec3::NEG_Y).with_intensity(0.8),
            Light::point(Vec3::new(1.0, 2.0, 3.0)),
        ];
        model.render(&mut gpu, &context(&lights));

        assert_eq!(gpu.uniform("uWorld.lightCount"), Some(UniformValue::Int(2)));
        assert_eq!(
            gpu.uniform("uWorld.lights[0].kind"),
            Some(UniformValue::Int(0))
        );
        assert_eq!(
            gpu.uniform("uWorld.lights[0].intensity"),
            Some(UniformValue::Float(0.8))
        );
        assert_eq!(
            gpu.uniform("uWorld.lights[1].position"),
            Some(UniformValue::Vec3(Vec3::new(1.0, 2.0, 3.0)))
        );
        assert_eq!(
            gpu.uniform("uWorld.lights[1].kind"),
            Some(UniformValue::Int(1))
        );
    }

    #[test]
    fn light_overflow_is_truncated_to_the_cap() {
        let mut gpu = TraceBackend::new();
        let material = material_with_shader(&mut gpu);
        let mut model = Model::new();
        model.add_group(triangle(), material);
        model.setup(&mut gpu);

        let lights: Vec<Light> = (0..12).map(|i| Light::point(Vec3::splat(i as f32))).collect();
        model.render(&mut gpu, &context(&lights));

        assert_eq!(
            gpu.uniform("uWorld.lightCount"),
            Some(UniformValue::Int(MAX_LIGHTS as i32))
        );
        assert_eq!(gpu.uniform("uWorld.lights[8].kind"), None);
    }

    #[test]
    fn shader_override_wins_over_material_shader() {
        let mut gpu = TraceBackend::new();
        let material = material_with_shader(&mut gpu);
        let override_shader = Rc::new(Shader::from_source(&mut gpu, "override", "v", "f"));

        let mut model = Model::new();
        model.add_group(triangle(), material);
        model.setup(&mut gpu);

        let lights = [];
        let ctx = context(&lights).with_shader_override(Rc::clone(&override_shader));
        let start = gpu.calls.len();
        model.render(&mut gpu, &ctx);

        // The second program created ("override") is the one bound.
        let bound = gpu.calls[start..].iter().find_map(|c| match c {
            TraceCall::UseProgram(p) => Some(*p),
            _ => None,
        });
        assert_eq!(bound, Some(crate::gpu::ProgramId(1)));
        assert_eq!(gpu.draw_count(), 1);
    }
}
