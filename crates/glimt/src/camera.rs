//! Free-fly camera.
//!
//! Yaw/pitch mouse look (while the right button is held) plus WASD flight,
//! Space/Q for vertical movement and left shift as a speed boost. Produces
//! the view and projection matrices for the frame's render context.
//!
//! Angles are radians. Yaw of -π/2 with zero pitch looks down -Z, the
//! crate's forward convention.

use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec3};

use crate::config;
use crate::input::{InputState, KeyCode, MouseButton};

const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.0175; // just shy of ±90°

/// A fly camera driven by the per-frame input snapshot.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    initial_position: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
    world_up: Vec3,
    yaw: f32,
    pitch: f32,
    base_speed: f32,
    boost_multiplier: f32,
    sensitivity: f32,
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    active: bool,
}

impl Camera {
    /// Camera at `position`, facing the world origin.
    pub fn new(position: Vec3) -> Self {
        let mut camera = Self {
            position,
            initial_position: position,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
            world_up: Vec3::Y,
            yaw: -FRAC_PI_2,
            pitch: 0.0,
            base_speed: config::CAMERA_SPEED,
            boost_multiplier: config::CAMERA_BOOST,
            sensitivity: config::CAMERA_SENSITIVITY,
            fov_y: 45.0,
            near: 0.1,
            far: 1000.0,
            active: true,
        };
        camera.reset();
        camera
    }

    /// Move back to the initial position, facing the origin again.
    pub fn reset(&mut self) {
        self.position = self.initial_position;
        self.look_at_origin();
        self.update_vectors();
    }

    /// While inactive the camera ignores input (e.g. when a UI overlay has
    /// focus).
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    /// World-to-view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Perspective projection for the given viewport aspect ratio.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y.to_radians(), aspect.max(f32::EPSILON), self.near, self.far)
    }

    /// Consume one frame of input: mouse look while the right button is
    /// held, then keyboard flight scaled by `dt`.
    pub fn update(&mut self, input: &InputState, dt: f32) {
        if !self.active {
            return;
        }

        if input.mouse_pressed(MouseButton::Right) {
            let delta = input.mouse_delta();
            self.yaw += delta.x * self.sensitivity * dt;
            self.pitch -= delta.y * self.sensitivity * dt;
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
            self.update_vectors();
        }

        let boost = if input.key_pressed(KeyCode::ShiftLeft) {
            self.boost_multiplier
        } else {
            1.0
        };
        let step = self.base_speed * boost * dt;

        if input.key_pressed(KeyCode::KeyW) {
            self.position += self.front * step;
        }
        if input.key_pressed(KeyCode::KeyS) {
            self.position -= self.front * step;
        }
        if input.key_pressed(KeyCode::KeyA) {
            self.position -= self.right * step;
        }
        if input.key_pressed(KeyCode::KeyD) {
            self.position += self.right * step;
        }
        if input.key_pressed(KeyCode::Space) {
            self.position += self.up * step;
        }
        if input.key_pressed(KeyCode::KeyQ) {
            self.position -= self.up * step;
        }
    }

    fn look_at_origin(&mut self) {
        if self.position != Vec3::ZERO {
            let dir = (-self.position).normalize();
            self.yaw = dir.z.atan2(dir.x);
            self.pitch = dir.y.asin().clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }
    }

    fn update_vectors(&mut self) {
        self.front = Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
        .normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}
