//! Shader programs and the shader cache.
//!
//! A [`Shader`] owns one compiled GPU program and a lazily filled map from
//! uniform name to resolved location. Construction is best-effort: compile
//! and link errors are logged, and the resulting shader simply refuses to
//! bind or upload anything — draws with it render wrong, never crash.
//!
//! [`ShaderCache`] deduplicates programs by name so each distinct
//! vertex/fragment source pair is compiled at most once per process.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

use crate::config;
use crate::gpu::{GpuBackend, ProgramId, UniformValue};

/// A compiled (or failed-to-compile) shader program.
pub struct Shader {
    name: String,
    program: Option<ProgramId>,
    // Location lookups go through the driver once per name; the result is
    // cached here, including the "not present" outcome.
    locations: RefCell<HashMap<String, Option<crate::gpu::UniformLocation>>>,
}

impl Shader {
    /// Compile a program from inline sources. On failure the error is logged
    /// and the shader is constructed anyway, permanently inert.
    pub fn from_source(
        gpu: &mut dyn GpuBackend,
        name: &str,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Self {
        let program = match gpu.create_program(name, vertex_src, fragment_src) {
            Ok(program) => Some(program),
            Err(err) => {
                log::error!("shader '{name}': {err}");
                None
            }
        };
        Self {
            name: name.to_owned(),
            program,
            locations: RefCell::new(HashMap::new()),
        }
    }

    /// Load `<dir>/<name>.vert` and `<dir>/<name>.frag` and compile them.
    ///
    /// A missing or unreadable file is an asset error: logged, and the
    /// shader comes back inert instead of failing the caller.
    pub fn load(gpu: &mut dyn GpuBackend, dir: &std::path::Path, name: &str) -> Self {
        let vertex_path = dir.join(format!("{name}.vert"));
        let fragment_path = dir.join(format!("{name}.frag"));

        let vertex_src = read_source(&vertex_path);
        let fragment_src = read_source(&fragment_path);

        match (vertex_src, fragment_src) {
            (Some(vertex), Some(fragment)) => Self::from_source(gpu, name, &vertex, &fragment),
            _ => Self {
                name: name.to_owned(),
                program: None,
                locations: RefCell::new(HashMap::new()),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Did construction produce a usable program?
    pub fn is_valid(&self) -> bool {
        self.program.is_some()
    }

    /// Make this the current program. No-op for inert shaders.
    pub fn bind(&self, gpu: &mut dyn GpuBackend) {
        if let Some(program) = self.program {
            gpu.use_program(program);
        }
    }

    /// Upload a named uniform to this program (which must be bound).
    ///
    /// Unknown names are remembered and silently skipped from then on;
    /// shader variants legitimately omit uniforms, so this is reported at
    /// debug level only.
    pub fn set(&self, gpu: &mut dyn GpuBackend, name: &str, value: impl Into<UniformValue>) {
        let Some(program) = self.program else {
            return;
        };

        let cached = self.locations.borrow().get(name).copied();
        let location = match cached {
            Some(location) => location,
            None => {
                let location = gpu.uniform_location(program, name);
                if location.is_none() {
                    log::debug!("shader '{}': uniform '{name}' not found", self.name);
                }
                self.locations
                    .borrow_mut()
                    .insert(name.to_owned(), location);
                location
            }
        };

        if let Some(location) = location {
            gpu.set_uniform(location, &value.into());
        }
    }

    /// Release the GPU program. The shader is inert afterwards.
    pub fn dispose(&mut self, gpu: &mut dyn GpuBackend) {
        if let Some(program) = self.program.take() {
            gpu.delete_program(program);
        }
        self.locations.borrow_mut().clear();
    }
}

fn read_source(path: &std::path::Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(source) => Some(source),
        Err(err) => {
            log::error!("failed to read shader source {}: {err}", path.display());
            None
        }
    }
}

/// Name-keyed shader store: at most one compiled program per distinct name
/// for the lifetime of the cache.
pub struct ShaderCache {
    dir: PathBuf,
    shaders: HashMap<String, Rc<Shader>>,
}

impl ShaderCache {
    /// Cache resolving names against [`config::SHADER_DIR`].
    pub fn new() -> Self {
        Self {
            dir: PathBuf::from(config::SHADER_DIR),
            shaders: HashMap::new(),
        }
    }

    /// Override the directory shader names resolve against.
    pub fn set_dir(&mut self, dir: impl Into<PathBuf>) {
        self.dir = dir.into();
    }

    /// Fetch the shader called `name`, loading and compiling it on the
    /// first request. Later requests return the same instance.
    pub fn get(&mut self, gpu: &mut dyn GpuBackend, name: &str) -> Rc<Shader> {
        if let Some(shader) = self.shaders.get(name) {
            return Rc::clone(shader);
        }
        let shader = Rc::new(Shader::load(gpu, &self.dir, name));
        self.shaders.insert(name.to_owned(), Rc::clone(&shader));
        shader
    }

    /// Register a shader compiled from inline sources under `name`.
    /// Overwrites any cached entry with that name.
    pub fn insert_source(
        &mut self,
        gpu: &mut dyn GpuBackend,
        name: &str,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Rc<Shader> {
        let shader = Rc::new(Shader::from_source(gpu, name, vertex_src, fragment_src));
        self.shaders.insert(name.to_owned(), Rc::clone(&shader));
        shader
    }
}

impl Default for ShaderCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::trace::{TraceBackend, TraceCall};

    fn test_shader(gpu: &mut TraceBackend) -> Shader {
        Shader::from_source(gpu, "test", "void main() {}", "void main() {}")
    }

    #[test]
    fn uniform_location_is_queried_once_per_name() {
        let mut gpu = TraceBackend::new();
        let shader = test_shader(&mut gpu);

        shader.set(&mut gpu, "uModel", glam::Mat4::IDENTITY);
        shader.set(&mut gpu, "uModel", glam::Mat4::IDENTITY);
        shader.set(&mut gpu, "uModel", glam::Mat4::IDENTITY);

        assert_eq!(gpu.location_query_count("uModel"), 1);
        let uploads = gpu
            .calls
            .iter()
            .filter(|c| matches!(c, TraceCall::SetUniform { .. }))
            .count();
        assert_eq!(uploads, 3);
    }

    #[test]
    fn missing_uniform_is_a_silent_noop() {
        let mut gpu = TraceBackend::new();
        gpu.mark_uniform_missing("uNope");
        let shader = test_shader(&mut gpu);

        shader.set(&mut gpu, "uNope", 1.0_f32);
        shader.set(&mut gpu, "uNope", 2.0_f32);

        // One probe, no uploads, and the miss is cached.
        assert_eq!(gpu.location_query_count("uNope"), 1);
        assert!(
            !gpu.calls
                .iter()
                .any(|c| matches!(c, TraceCall::SetUniform { .. }))
        );
    }

    #[test]
    fn failed_compilation_yields_an_inert_shader() {
        let mut gpu = TraceBackend::new();
        gpu.fail_program_creation(true);
        let shader = test_shader(&mut gpu);

        assert!(!shader.is_valid());

        // Binding and uniform writes do nothing rather than crash.
        shader.bind(&mut gpu);
        shader.set(&mut gpu, "uModel", glam::Mat4::IDENTITY);
        assert!(
            !gpu.calls
                .iter()
                .any(|c| matches!(c, TraceCall::UseProgram(_) | TraceCall::SetUniform { .. }))
        );
    }

    #[test]
    fn cache_returns_the_same_instance_per_name() {
        let mut gpu = TraceBackend::new();
        let mut cache = ShaderCache::new();

        let a = cache.insert_source(&mut gpu, "a", "v", "f");
        let b = cache.insert_source(&mut gpu, "b", "v", "f");

        let a_again = cache.get(&mut gpu, "a");
        assert!(Rc::ptr_eq(&a, &a_again));
        assert!(!Rc::ptr_eq(&a, &b));

        let programs = gpu
            .calls
            .iter()
            .filter(|c| matches!(c, TraceCall::CreateProgram { .. }))
            .count();
        assert_eq!(programs, 2);
    }
}
