//! Textures and the texture cache.
//!
//! Decoding goes through the [image](https://docs.rs/image) crate; a decode
//! failure is logged and surfaces as `None`, so callers end up with an
//! absent texture slot rather than an error path. [`TextureCache`]
//! deduplicates by file path.

use std::collections::HashMap;
use std::rc::Rc;

use crate::gpu::{GpuBackend, TextureFormat, TextureId};

/// A GPU-resident 2D texture.
pub struct Texture {
    id: TextureId,
    label: String,
    width: u32,
    height: u32,
}

impl Texture {
    /// Decode an image file and upload it. Returns `None` (after logging)
    /// when the file is missing or undecodable.
    pub fn load(gpu: &mut dyn GpuBackend, path: &str) -> Option<Self> {
        let img = match image::open(path) {
            Ok(img) => img,
            Err(err) => {
                log::error!("failed to load texture '{path}': {err}");
                return None;
            }
        };

        // Grayscale and RGB survive as-is; everything else is flattened
        // to RGBA8.
        let (format, width, height, pixels) = match img {
            image::DynamicImage::ImageLuma8(img) => {
                let (w, h) = img.dimensions();
                (TextureFormat::Red, w, h, img.into_raw())
            }
            image::DynamicImage::ImageRgb8(img) => {
                let (w, h) = img.dimensions();
                (TextureFormat::Rgb, w, h, img.into_raw())
            }
            other => {
                let img = other.to_rgba8();
                let (w, h) = img.dimensions();
                (TextureFormat::Rgba, w, h, img.into_raw())
            }
        };

        let texture = Self::from_pixels(gpu, path, width, height, format, &pixels);
        log::debug!(
            "texture loaded: {path} ({width}x{height}, {} channels)",
            format.channels()
        );
        Some(texture)
    }

    /// Upload raw pixel data directly (used by the asset loader for images
    /// embedded in model files).
    pub fn from_pixels(
        gpu: &mut dyn GpuBackend,
        label: &str,
        width: u32,
        height: u32,
        format: TextureFormat,
        pixels: &[u8],
    ) -> Self {
        let id = gpu.create_texture(label, width, height, format, pixels);
        Self {
            id,
            label: label.to_owned(),
            width,
            height,
        }
    }

    /// Bind to the currently active texture unit.
    pub fn bind(&self, gpu: &mut dyn GpuBackend) {
        gpu.bind_texture(Some(self.id));
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Release the GPU texture.
    pub fn dispose(&self, gpu: &mut dyn GpuBackend) {
        gpu.delete_texture(self.id);
    }
}

/// Path-keyed texture store: each file is decoded and uploaded at most once.
/// Failures are not cached, so a path can succeed on a later attempt.
#[derive(Default)]
pub struct TextureCache {
    textures: HashMap<String, Rc<Texture>>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the texture at `path`, loading it on the first request.
    pub fn get(&mut self, gpu: &mut dyn GpuBackend, path: &str) -> Option<Rc<Texture>> {
        if let Some(texture) = self.textures.get(path) {
            return Some(Rc::clone(texture));
        }
        let texture = Rc::new(Texture::load(gpu, path)?);
        self.textures.insert(path.to_owned(), Rc::clone(&texture));
        Some(texture)
    }
}
