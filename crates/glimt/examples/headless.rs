//! Build a small scene and render a few frames against the trace backend.
//!
//! No window, no GL context — every draw lands in the recorded call list,
//! and the summary printed at the end shows what a real backend would have
//! been asked to do.

use std::path::PathBuf;
use std::rc::Rc;

use glimt::prelude::*;
use glimt::render::shapes;

fn main() {
    glimt::init_logging();

    let mut gpu = TraceBackend::new();
    let mut sandbox = Sandbox::new();

    // Resolve shaders relative to the crate, not the invocation directory.
    let shader_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("resources/shaders");
    sandbox.shaders.set_dir(shader_dir);

    // Decorations.
    let grid = Rc::new(FloorGrid::new(&mut gpu, &mut sandbox.shaders));
    let axis = Rc::new(Axis::new(&mut gpu, &mut sandbox.shaders));
    sandbox.spawn(grid);
    sandbox.spawn(axis);

    // A parent cube with a smaller child cube orbit-parented to it.
    let shader = sandbox.shaders.get(&mut gpu, glimt::config::DEFAULT_SHADER);
    let (vertices, indices) = shapes::cube();
    let cube = Rc::new(Mesh::new(vertices, indices));

    let mut red = Material::new();
    red.set_shader(Rc::clone(&shader));
    red.set_uniform(
        glimt::render::material::DIFFUSE_COLOR_UNIFORM,
        Vec4::new(0.8, 0.2, 0.2, 1.0),
    );
    let mut blue = Material::new();
    blue.set_shader(shader);
    blue.set_uniform(
        glimt::render::material::DIFFUSE_COLOR_UNIFORM,
        Vec4::new(0.2, 0.3, 0.9, 1.0),
    );

    let mut parent_model = Model::new();
    parent_model.add_group(Rc::clone(&cube), Rc::new(red));
    let mut child_model = Model::new();
    child_model.add_group(cube, Rc::new(blue));

    let parent = sandbox.spawn(Rc::new(parent_model));
    let child = sandbox.spawn(Rc::new(child_model));
    sandbox.transforms.set_local_position(parent, Vec3::new(0.0, 0.5, 0.0));
    sandbox.transforms.set_parent(child, Some(parent), false);
    sandbox.transforms.set_local_position(child, Vec3::new(1.5, 0.5, 0.0));
    sandbox.transforms.set_local_scale(child, Vec3::splat(0.5));

    // Lights.
    sandbox.lights.push(Light::directional(Vec3::new(-0.4, -1.0, -0.3)));
    sandbox
        .lights
        .push(Light::point(Vec3::new(2.0, 2.0, 2.0)).with_intensity(0.6));

    sandbox.setup(&mut gpu);

    let mut input = InputState::new();
    for frame in 0..3 {
        // Spin the parent; the child follows through the hierarchy.
        sandbox
            .transforms
            .rotate_axis(parent, Vec3::Y, 0.02 * (frame + 1) as f32);
        sandbox.frame(&mut gpu, &input);
        input.end_frame();
    }

    let child_world = sandbox.transforms.position(child);
    println!(
        "rendered {} frames: {} backend calls, {} draws, child at {child_world}",
        sandbox.clock.frames(),
        gpu.calls.len(),
        gpu.draw_count(),
    );
}
