//! glTF model loading.
//!
//! Flattens every mesh primitive in a `.gltf`/`.glb` file into one
//! (mesh, material) group on a [`Model`]. Scene hierarchy, animation, and
//! skinning in the file are ignored — the caller positions the model with
//! its own transform.
//!
//! Material translation is intentionally shallow: PBR factors land in the
//! `uMaterial.*` uniform bag, the base color texture fills the diffuse
//! slot, and the normal map fills the normal slot. Every material gets the
//! default cached shader.
//!
//! Failures follow the asset error rule: log and return `None`, never panic.

use std::rc::Rc;

use glam::{Vec3, Vec4};

use crate::config;
use crate::gpu::{GpuBackend, TextureFormat};
use crate::render::material::{
    Material, DIFFUSE_COLOR_UNIFORM, EMISSIVE_COLOR_UNIFORM, OPACITY_UNIFORM,
};
use crate::render::mesh::{Mesh, Vertex};
use crate::render::model::{Model, Renderable};
use crate::render::shader::ShaderCache;
use crate::render::texture::Texture;

/// Load a glTF file into a ready-to-render [`Model`] (GPU buffers included).
pub fn load_model(
    gpu: &mut dyn GpuBackend,
    shaders: &mut ShaderCache,
    path: &str,
) -> Option<Model> {
    let (document, buffers, images) = match gltf::import(path) {
        Ok(loaded) => loaded,
        Err(err) => {
            log::error!("failed to load model '{path}': {err}");
            return None;
        }
    };

    let shader = shaders.get(gpu, config::DEFAULT_SHADER);
    let mut model = Model::new();
    // Images referenced by several primitives are uploaded once.
    let mut texture_cache: Vec<Option<Rc<Texture>>> = vec![None; images.len()];

    for gltf_mesh in document.meshes() {
        for primitive in gltf_mesh.primitives() {
            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

            let Some(positions) = reader.read_positions() else {
                log::warn!("'{path}': primitive without positions, skipping");
                continue;
            };
            let positions: Vec<[f32; 3]> = positions.collect();

            let normals: Vec<[f32; 3]> = reader
                .read_normals()
                .map(|iter| iter.collect())
                .unwrap_or_else(|| vec![[0.0, 1.0, 0.0]; positions.len()]);

            let uvs: Vec<[f32; 2]> = reader
                .read_tex_coords(0)
                .map(|iter| iter.into_f32().collect())
                .unwrap_or_else(|| vec![[0.0, 0.0]; positions.len()]);

            let colors: Vec<[f32; 4]> = reader
                .read_colors(0)
                .map(|iter| iter.into_rgba_f32().collect())
                .unwrap_or_else(|| vec![[1.0, 1.0, 1.0, 1.0]; positions.len()]);

            // Tangents carry handedness in w; bitangent = (n × t) * w.
            let tangents: Vec<[f32; 4]> = reader
                .read_tangents()
                .map(|iter| iter.collect())
                .unwrap_or_else(|| vec![[1.0, 0.0, 0.0, 1.0]; positions.len()]);

            let vertices: Vec<Vertex> = positions
                .iter()
                .enumerate()
                .map(|(i, position)| {
                    let normal = Vec3::from_array(normals[i]);
                    let tangent = Vec4::from_array(tangents[i]);
                    let bitangent = normal.cross(tangent.truncate()) * tangent.w;
                    Vertex {
                        position: *position,
                        color: colors[i],
                        normal: normal.to_array(),
                        uv: uvs[i],
                        tangent: tangent.truncate().to_array(),
                        bitangent: bitangent.to_array(),
                    }
                })
                .collect();

            let indices: Vec<u32> = reader
                .read_indices()
                .map(|iter| iter.into_u32().collect())
                .unwrap_or_else(|| (0..vertices.len() as u32).collect());

            let material = load_material(
                gpu,
                path,
                &primitive.material(),
                &images,
                &mut texture_cache,
                Rc::clone(&shader),
            );

            model.add_mesh_group(
                Some(Rc::new(Mesh::new(vertices, indices))),
                Some(Rc::new(material)),
            );
        }
    }

    if model.group_count() == 0 {
        log::warn!("'{path}': no drawable primitives found");
    }

    model.setup(gpu);
    Some(model)
}

fn load_material(
    gpu: &mut dyn GpuBackend,
    path: &str,
    gltf_material: &gltf::Material<'_>,
    images: &[gltf::image::Data],
    texture_cache: &mut [Option<Rc<Texture>>],
    shader: Rc<crate::render::shader::Shader>,
) -> Material {
    let mut material = Material::new();
    material.set_shader(shader);

    let pbr = gltf_material.pbr_metallic_roughness();
    let base_color = pbr.base_color_factor();
    material.set_uniform(DIFFUSE_COLOR_UNIFORM, Vec4::from_array(base_color));
    material.set_uniform(OPACITY_UNIFORM, base_color[3]);

    let emissive = gltf_material.emissive_factor();
    material.set_uniform(
        EMISSIVE_COLOR_UNIFORM,
        Vec4::new(emissive[0], emissive[1], emissive[2], 1.0),
    );

    if let Some(info) = pbr.base_color_texture() {
        if let Some(texture) =
            upload_image(gpu, path, info.texture().source().index(), images, texture_cache)
        {
            material.set_diffuse_tex(texture);
        }
    }

    if let Some(normal) = gltf_material.normal_texture() {
        if let Some(texture) =
            upload_image(gpu, path, normal.texture().source().index(), images, texture_cache)
        {
            material.set_normal_tex(texture);
        }
    }

    material
}

fn upload_image(
    gpu: &mut dyn GpuBackend,
    path: &str,
    index: usize,
    images: &[gltf::image::Data],
    texture_cache: &mut [Option<Rc<Texture>>],
) -> Option<Rc<Texture>> {
    if let Some(texture) = texture_cache.get(index)?.as_ref() {
        return Some(Rc::clone(texture));
    }

    let image = images.get(index)?;
    let format = match image.format {
        gltf::image::Format::R8 => TextureFormat::Red,
        gltf::image::Format::R8G8B8 => TextureFormat::Rgb,
        gltf::image::Format::R8G8B8A8 => TextureFormat::Rgba,
        other => {
            log::warn!("'{path}': unsupported image format {other:?}, skipping texture");
            return None;
        }
    };

    let label = format!("{path}#{index}");
    let texture = Rc::new(Texture::from_pixels(
        gpu,
        &label,
        image.width,
        image.height,
        format,
        &image.pixels,
    ));
    texture_cache[index] = Some(Rc::clone(&texture));
    Some(texture)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::trace::TraceBackend;

    #[test]
    fn missing_file_yields_none() {
        let mut gpu = TraceBackend::new();
        let mut shaders = ShaderCache::new();
        assert!(load_model(&mut gpu, &mut shaders, "/no/such/model.glb").is_none());
    }
}
