//! The sandbox registry and frame loop.
//!
//! [`Sandbox`] owns everything with scene lifetime — the transform arena,
//! the shader and texture caches, the camera, the clock, the light list,
//! and the scene objects — and is passed by reference wherever it's needed.
//! There are no global singletons behind it.
//!
//! Per frame: tick the clock, update the camera from input, build one
//! [`RenderContext`], clear, and render every object in insertion order.

use std::rc::Rc;

use crate::camera::Camera;
use crate::config;
use crate::gpu::GpuBackend;
use crate::input::InputState;
use crate::render::context::RenderContext;
use crate::render::model::{Renderable, MAX_LIGHTS};
use crate::render::shader::ShaderCache;
use crate::render::texture::TextureCache;
use crate::scene::light::Light;
use crate::scene::object::SceneObject;
use crate::scene::transform::{TransformArena, TransformId};
use crate::time::Time;

/// Everything with scene lifetime, bundled in one place.
pub struct Sandbox {
    pub transforms: TransformArena,
    pub shaders: ShaderCache,
    pub textures: TextureCache,
    pub camera: Camera,
    pub clock: Time,
    pub lights: Vec<Light>,
    objects: Vec<SceneObject>,
    viewport: (u32, u32),
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            transforms: TransformArena::new(),
            shaders: ShaderCache::new(),
            textures: TextureCache::new(),
            camera: Camera::new(config::CAMERA_START),
            clock: Time::new(),
            lights: Vec::new(),
            objects: Vec::new(),
            viewport: config::DEFAULT_VIEWPORT,
        }
    }

    /// Add a drawable with a fresh root transform; returns the transform
    /// handle for positioning and parenting.
    pub fn spawn(&mut self, renderable: Rc<dyn Renderable>) -> TransformId {
        let transform = self.transforms.create();
        self.objects.push(SceneObject::new(transform, renderable));
        transform
    }

    /// Add an object with nothing to draw yet.
    pub fn spawn_empty(&mut self) -> TransformId {
        let transform = self.transforms.create();
        self.objects.push(SceneObject::empty(transform));
        transform
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut [SceneObject] {
        &mut self.objects
    }

    /// Tell the sandbox the framebuffer size, for the projection aspect and
    /// the viewport. Call on host resize events.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.viewport = (width, height);
        }
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Create GPU resources for every object. Idempotent, like the
    /// underlying `Renderable::setup` implementations.
    pub fn setup(&mut self, gpu: &mut dyn GpuBackend) {
        for object in &self.objects {
            object.setup(gpu);
        }
    }

    /// Run one frame: clock → camera → context → clear → draw everything.
    ///
    /// Never fails; broken objects log and skip themselves.
    pub fn frame(&mut self, gpu: &mut dyn GpuBackend, input: &InputState) {
        self.clock.tick();
        self.camera.update(input, self.clock.delta_secs());

        if self.lights.len() > MAX_LIGHTS {
            log::warn!(
                "{} lights in scene, uploading only the first {MAX_LIGHTS}",
                self.lights.len()
            );
        }

        let (width, height) = self.viewport;
        gpu.set_viewport(width, height);
        gpu.clear(config::CLEAR_COLOR);

        let aspect = width as f32 / height.max(1) as f32;
        let ctx = RenderContext::new(
            self.camera.view_matrix(),
            self.camera.projection_matrix(aspect),
            self.camera.position(),
            &self.lights,
        );

        for object in &self.objects {
            object.render(&mut self.transforms, gpu, &ctx);
        }
    }
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::new()
    }
}
