//! Per-frame input snapshot.
//!
//! The crate does not own a window or an event loop — the host drains its
//! platform events once per frame and mirrors them into an [`InputState`]
//! via the `press_*`/`release_*`/`add_mouse_delta` methods, then calls
//! [`end_frame`](InputState::end_frame) after the frame has been rendered.
//! The camera and any game code only ever read from the snapshot.

use std::collections::HashSet;

use glam::Vec2;
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;

/// Snapshot of keyboard and mouse state for one frame.
///
/// - *pressed*: currently held down
/// - *just pressed / just released*: edge-triggered, valid for one frame
/// - *mouse delta*: relative motion accumulated since the last `end_frame`
#[derive(Debug, Default)]
pub struct InputState {
    keys_down: HashSet<KeyCode>,
    keys_just_pressed: HashSet<KeyCode>,
    keys_just_released: HashSet<KeyCode>,
    buttons_down: HashSet<MouseButton>,
    buttons_just_pressed: HashSet<MouseButton>,
    buttons_just_released: HashSet<MouseButton>,
    cursor: Vec2,
    mouse_delta: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Reading ──────────────────────────────────────────────────────────

    /// Is the key currently held down?
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Was the key pressed this frame?
    pub fn key_just_pressed(&self, key: KeyCode) -> bool {
        self.keys_just_pressed.contains(&key)
    }

    /// Was the key released this frame?
    pub fn key_just_released(&self, key: KeyCode) -> bool {
        self.keys_just_released.contains(&key)
    }

    /// Is the mouse button currently held down?
    pub fn mouse_pressed(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    /// Was the mouse button pressed this frame?
    pub fn mouse_just_pressed(&self, button: MouseButton) -> bool {
        self.buttons_just_pressed.contains(&button)
    }

    /// Was the mouse button released this frame?
    pub fn mouse_just_released(&self, button: MouseButton) -> bool {
        self.buttons_just_released.contains(&button)
    }

    /// Cursor position in window coordinates.
    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    /// Relative mouse motion accumulated this frame, in pixels.
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    // ── Feeding (host window layer) ──────────────────────────────────────

    pub fn press_key(&mut self, key: KeyCode) {
        if self.keys_down.insert(key) {
            self.keys_just_pressed.insert(key);
        }
    }

    pub fn release_key(&mut self, key: KeyCode) {
        if self.keys_down.remove(&key) {
            self.keys_just_released.insert(key);
        }
    }

    pub fn press_button(&mut self, button: MouseButton) {
        if self.buttons_down.insert(button) {
            self.buttons_just_pressed.insert(button);
        }
    }

    pub fn release_button(&mut self, button: MouseButton) {
        if self.buttons_down.remove(&button) {
            self.buttons_just_released.insert(button);
        }
    }

    pub fn set_cursor(&mut self, x: f32, y: f32) {
        self.cursor = Vec2::new(x, y);
    }

    pub fn add_mouse_delta(&mut self, dx: f32, dy: f32) {
        self.mouse_delta += Vec2::new(dx, dy);
    }

    /// Clear edge-triggered state and the mouse delta. Call after the frame.
    pub fn end_frame(&mut self) {
        self.keys_just_pressed.clear();
        self.keys_just_released.clear();
        self.buttons_just_pressed.clear();
        self.buttons_just_released.clear();
        self.mouse_delta = Vec2::ZERO;
    }
}
