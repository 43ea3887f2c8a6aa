//! Keyboard and mouse state driving the board camera
//!
//! The camera only orbits while the rotate key is held and the mouse moves
//! with no button pressed. Half a degree per pixel on both axes.

use glam::Vec2;

use super::BoardCamera;

/// Degrees of orbit per pixel of mouse travel
pub const ORBIT_SENSITIVITY: f32 = 0.5;

/// Held keys and last known cursor position
#[derive(Debug, Clone)]
pub struct InputState {
    /// Keys currently held, in press order, no duplicates
    held: Vec<char>,
    /// Last cursor position in window pixels (origin top-left)
    pub mouse: Vec2,
    /// Key that enables orbiting
    pub rotate_key: char,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new('a')
    }
}

impl InputState {
    pub fn new(rotate_key: char) -> Self {
        Self {
            held: Vec::new(),
            mouse: Vec2::ZERO,
            rotate_key,
        }
    }

    pub fn key_down(&mut self, key: char, mouse: Vec2) {
        if !self.held.contains(&key) {
            self.held.push(key);
        }
        self.mouse = mouse;
    }

    pub fn key_up(&mut self, key: char, mouse: Vec2) {
        self.held.retain(|&k| k != key);
        self.mouse = mouse;
    }

    pub fn is_held(&self, key: char) -> bool {
        self.held.contains(&key)
    }

    pub fn held_keys(&self) -> &[char] {
        &self.held
    }

    /// Cursor moved with no button pressed.
    ///
    /// Orbits `camera` when the rotate key is held and returns whether it
    /// changed. The last mouse position is always updated.
    pub fn passive_motion(&mut self, mouse: Vec2, camera: &mut BoardCamera) -> bool {
        let delta = mouse - self.mouse;
        self.mouse = mouse;

        if !self.is_held(self.rotate_key) {
            return false;
        }
        camera.orbit(delta.x * ORBIT_SENSITIVITY, delta.y * ORBIT_SENSITIVITY);
        true
    }
}
