//! Scene objects: a transform plus something to draw.
//!
//! The glue between the hierarchy and the render pass. Each object holds a
//! [`TransformId`] and an optional shared [`Renderable`]; at render time it
//! re-derives the context's model matrix from its transform and forwards
//! the draw.

use std::rc::Rc;

use crate::gpu::GpuBackend;
use crate::render::context::RenderContext;
use crate::render::model::Renderable;
use crate::scene::transform::{TransformArena, TransformId};

/// One entry in the scene: a transform handle and an optional drawable.
pub struct SceneObject {
    transform: TransformId,
    renderable: Option<Rc<dyn Renderable>>,
}

impl SceneObject {
    pub fn new(transform: TransformId, renderable: Rc<dyn Renderable>) -> Self {
        Self {
            transform,
            renderable: Some(renderable),
        }
    }

    /// An object with nothing attached yet. Rendering it warns and skips.
    pub fn empty(transform: TransformId) -> Self {
        Self {
            transform,
            renderable: None,
        }
    }

    pub fn transform(&self) -> TransformId {
        self.transform
    }

    pub fn renderable(&self) -> Option<&Rc<dyn Renderable>> {
        self.renderable.as_ref()
    }

    pub fn set_renderable(&mut self, renderable: Rc<dyn Renderable>) {
        self.renderable = Some(renderable);
    }

    /// Create GPU resources for the attached renderable, if any.
    pub fn setup(&self, gpu: &mut dyn GpuBackend) {
        if let Some(renderable) = &self.renderable {
            renderable.setup(gpu);
        }
    }

    /// Draw with this object's world matrix swapped into the context.
    pub fn render(
        &self,
        transforms: &mut TransformArena,
        gpu: &mut dyn GpuBackend,
        ctx: &RenderContext<'_>,
    ) {
        let Some(renderable) = &self.renderable else {
            log::warn!("scene object has no renderable attached, skipping");
            return;
        };
        let object_ctx = ctx.with_model(transforms.model_matrix(self.transform));
        renderable.render(gpu, &object_ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::trace::TraceBackend;
    use crate::gpu::UniformValue;
    use crate::render::material::Material;
    use crate::render::mesh::{Mesh, Vertex};
    use crate::render::model::Model;
    use crate::render::shader::Shader;
    use glam::{Mat4, Vec3};

    fn one_group_model(gpu: &mut TraceBackend) -> Rc<Model> {
        let shader = Rc::new(Shader::from_source(gpu, "object-test", "v", "f"));
        let mut material = Material::new();
        material.set_shader(shader);
        let mesh = Rc::new(Mesh::new(
            vec![Vertex::default(), Vertex::default(), Vertex::default()],
            vec![0, 1, 2],
        ));
        let mut model = Model::new();
        model.add_group(mesh, Rc::new(material));
        Rc::new(model)
    }

    #[test]
    fn render_uses_the_objects_world_matrix() {
        let mut gpu = TraceBackend::new();
        let mut transforms = TransformArena::new();
        let model = one_group_model(&mut gpu);

        let id = transforms.create();
        transforms.set_local_position(id, Vec3::new(4.0, 0.0, 0.0));
        let object = SceneObject::new(id, model);
        object.setup(&mut gpu);

        let lights = [];
        let ctx = RenderContext::new(Mat4::IDENTITY, Mat4::IDENTITY, Vec3::ZERO, &lights);
        object.render(&mut transforms, &mut gpu, &ctx);

        assert_eq!(
            gpu.uniform("uModel"),
            Some(UniformValue::Mat4(Mat4::from_translation(Vec3::new(
                4.0, 0.0, 0.0
            ))))
        );
        assert_eq!(gpu.draw_count(), 1);
    }

    #[test]
    fn object_without_renderable_skips_quietly() {
        let mut gpu = TraceBackend::new();
        let mut transforms = TransformArena::new();
        let object = SceneObject::empty(transforms.create());

        let lights = [];
        let ctx = RenderContext::new(Mat4::IDENTITY, Mat4::IDENTITY, Vec3::ZERO, &lights);
        object.render(&mut transforms, &mut gpu, &ctx);

        assert_eq!(gpu.draw_count(), 0);
    }
}
