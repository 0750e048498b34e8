//! Materials: a shader, up to three textures, and a bag of uniforms.
//!
//! A material does not own GPU state of its own — applying one is just a
//! series of uniform writes and texture binds against the shader that is
//! currently bound. The texture units are fixed (diffuse=0, specular=1,
//! normal=2) so every material sharing a shader agrees on the sampler
//! bindings.

use std::collections::HashMap;
use std::rc::Rc;

use crate::gpu::{GpuBackend, UniformValue};
use crate::render::shader::Shader;
use crate::render::texture::Texture;

// Color uniforms (vec4).
pub const DIFFUSE_COLOR_UNIFORM: &str = "uMaterial.diffuseColor";
pub const AMBIENT_COLOR_UNIFORM: &str = "uMaterial.ambientColor";
pub const SPECULAR_COLOR_UNIFORM: &str = "uMaterial.specularColor";
pub const EMISSIVE_COLOR_UNIFORM: &str = "uMaterial.emissiveColor";

// Scalar uniforms.
/// 0.0 (transparent) to 1.0 (opaque).
pub const OPACITY_UNIFORM: &str = "uMaterial.opacity";
/// Specular exponent: how tight the highlight is.
pub const SHININESS_UNIFORM: &str = "uMaterial.shininess";
/// Multiplier on the specular color.
pub const SHININESS_STRENGTH_UNIFORM: &str = "uMaterial.shininessStrength";

// Sampler uniforms, paired with the fixed units below.
pub const DIFFUSE_TEXTURE_UNIFORM: &str = "uMaterial.diffuseTexture";
pub const SPECULAR_TEXTURE_UNIFORM: &str = "uMaterial.specularTexture";
pub const NORMAL_TEXTURE_UNIFORM: &str = "uMaterial.normalTexture";

pub const DIFFUSE_TEXTURE_UNIT: u32 = 0;
pub const SPECULAR_TEXTURE_UNIT: u32 = 1;
pub const NORMAL_TEXTURE_UNIT: u32 = 2;

/// A named bag of uniform values plus up to three texture bindings.
#[derive(Default)]
pub struct Material {
    shader: Option<Rc<Shader>>,
    diffuse: Option<Rc<Texture>>,
    specular: Option<Rc<Texture>>,
    normal: Option<Rc<Texture>>,
    uniforms: HashMap<String, UniformValue>,
}

impl Material {
    /// An empty material: no shader, no textures, no uniforms.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shader(&self) -> Option<&Rc<Shader>> {
        self.shader.as_ref()
    }

    pub fn set_shader(&mut self, shader: Rc<Shader>) {
        self.shader = Some(shader);
    }

    /// Store a uniform value. Names are unique: setting an existing name
    /// overwrites, regardless of the value's type.
    pub fn set_uniform(&mut self, name: impl Into<String>, value: impl Into<UniformValue>) {
        self.uniforms.insert(name.into(), value.into());
    }

    pub fn uniform(&self, name: &str) -> Option<&UniformValue> {
        self.uniforms.get(name)
    }

    pub fn set_diffuse_tex(&mut self, texture: Rc<Texture>) {
        self.diffuse = Some(texture);
    }

    pub fn set_specular_tex(&mut self, texture: Rc<Texture>) {
        self.specular = Some(texture);
    }

    pub fn set_normal_tex(&mut self, texture: Rc<Texture>) {
        self.normal = Some(texture);
    }

    /// Push every stored uniform through `shader` (the one resolved for the
    /// draw — the material's own, or the context override). Order across
    /// entries is insignificant; no two entries share a name.
    pub fn apply_uniforms(&self, gpu: &mut dyn GpuBackend, shader: &Shader) {
        for (name, value) in &self.uniforms {
            shader.set(gpu, name, *value);
        }
    }

    /// For each present texture slot: activate its fixed unit, point the
    /// sampler uniform at that unit, and bind the texture. Absent slots are
    /// skipped entirely.
    pub fn bind_textures(&self, gpu: &mut dyn GpuBackend, shader: &Shader) {
        let slots: [(&Option<Rc<Texture>>, u32, &str); 3] = [
            (&self.diffuse, DIFFUSE_TEXTURE_UNIT, DIFFUSE_TEXTURE_UNIFORM),
            (
                &self.specular,
                SPECULAR_TEXTURE_UNIT,
                SPECULAR_TEXTURE_UNIFORM,
            ),
            (&self.normal, NORMAL_TEXTURE_UNIT, NORMAL_TEXTURE_UNIFORM),
        ];
        for (texture, unit, sampler) in slots {
            if let Some(texture) = texture {
                gpu.active_texture_unit(unit);
                shader.set(gpu, sampler, unit as i32);
                texture.bind(gpu);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::trace::{TraceBackend, TraceCall};
    use crate::gpu::TextureFormat;
    use glam::{Vec3, Vec4};

    fn shader(gpu: &mut TraceBackend) -> Shader {
        Shader::from_source(gpu, "material-test", "v", "f")
    }

    fn white(gpu: &mut TraceBackend) -> Rc<Texture> {
        Rc::new(Texture::from_pixels(
            gpu,
            "white",
            1,
            1,
            TextureFormat::Rgba,
            &[255; 4],
        ))
    }

    #[test]
    fn setting_an_existing_name_overwrites() {
        let mut material = Material::new();
        material.set_uniform(SHININESS_UNIFORM, 16.0_f32);
        material.set_uniform(SHININESS_UNIFORM, 64.0_f32);

        assert_eq!(
            material.uniform(SHININESS_UNIFORM),
            Some(&UniformValue::Float(64.0))
        );
    }

    #[test]
    fn apply_uniforms_pushes_every_entry() {
        let mut gpu = TraceBackend::new();
        let shader = shader(&mut gpu);

        let mut material = Material::new();
        material.set_uniform(DIFFUSE_COLOR_UNIFORM, Vec4::new(1.0, 0.0, 0.0, 1.0));
        material.set_uniform(SHININESS_UNIFORM, 32.0_f32);
        material.set_uniform("uCustom", Vec3::ONE);

        material.apply_uniforms(&mut gpu, &shader);

        assert_eq!(
            gpu.uniform(DIFFUSE_COLOR_UNIFORM),
            Some(UniformValue::Vec4(Vec4::new(1.0, 0.0, 0.0, 1.0)))
        );
        assert_eq!(gpu.uniform(SHININESS_UNIFORM), Some(UniformValue::Float(32.0)));
        assert_eq!(gpu.uniform("uCustom"), Some(UniformValue::Vec3(Vec3::ONE)));
    }

    #[test]
    fn bind_textures_uses_fixed_units_and_sampler_indices() {
        let mut gpu = TraceBackend::new();
        let shader = shader(&mut gpu);

        let mut material = Material::new();
        material.set_diffuse_tex(white(&mut gpu));
        material.set_normal_tex(white(&mut gpu));
        // No specular: unit 1 must not be touched.

        material.bind_textures(&mut gpu, &shader);

        assert!(gpu.calls.contains(&TraceCall::ActiveTextureUnit(0)));
        assert!(!gpu.calls.contains(&TraceCall::ActiveTextureUnit(1)));
        assert!(gpu.calls.contains(&TraceCall::ActiveTextureUnit(2)));

        assert_eq!(gpu.uniform(DIFFUSE_TEXTURE_UNIFORM), Some(UniformValue::Int(0)));
        assert_eq!(gpu.uniform(SPECULAR_TEXTURE_UNIFORM), None);
        assert_eq!(gpu.uniform(NORMAL_TEXTURE_UNIFORM), Some(UniformValue::Int(2)));

        let binds = gpu
            .calls
            .iter()
            .filter(|c| matches!(c, TraceCall::BindTexture(Some(_))))
            .count();
        assert_eq!(binds, 2);
    }

    #[test]
    fn empty_material_binds_nothing() {
        let mut gpu = TraceBackend::new();
        let shader = shader(&mut gpu);
        let material = Material::new();

        material.apply_uniforms(&mut gpu, &shader);
        material.bind_textures(&mut gpu, &shader);

        assert!(
            !gpu.calls.iter().any(|c| matches!(
                c,
                TraceCall::SetUniform { .. } | TraceCall::BindTexture(_)
            ))
        );
    }
}
