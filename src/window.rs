//! Window management using winit

use crate::engine::Engine;
use crate::resources::MeshLibrary;
use crate::scene::{ChessBoard, MouseButton};
use crate::{ViewerConfig, ViewerError};
use glam::Vec2;
use std::sync::Arc;
use winit::{
    dpi::PhysicalSize,
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    keyboard::Key,
    window::{Window as WinitWindow, WindowBuilder},
};

/// Wrapper around winit window with the input state the board needs
pub struct Window {
    window: Arc<WinitWindow>,
    cursor: Vec2,
    buttons_held: Vec<winit::event::MouseButton>,
}

impl Window {
    /// Create a new window with the given title and dimensions
    pub fn new(
        event_loop: &EventLoop<()>,
        title: &str,
        width: u32,
        height: u32,
    ) -> Result<Self, ViewerError> {
        let window = WindowBuilder::new()
            .with_title(title)
            .with_inner_size(PhysicalSize::new(width, height))
            .build(event_loop)?;

        Ok(Self {
            window: Arc::new(window),
            cursor: Vec2::ZERO,
            buttons_held: Vec::new(),
        })
    }

    /// Get arc reference to window
    pub fn window_arc(&self) -> Arc<WinitWindow> {
        Arc::clone(&self.window)
    }

    /// Last cursor position in window pixels (origin top-left)
    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    /// Request a redraw
    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }

    /// Forward an input event to the board. Returns whether a redraw is needed.
    fn handle_input(&mut self, board: &mut ChessBoard, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(board, event),
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Vec2::new(position.x as f32, position.y as f32);
                if self.buttons_held.is_empty() {
                    board.passive_motion(self.cursor.x, self.cursor.y)
                } else {
                    board.motion(self.cursor.x, self.cursor.y)
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let pressed = *state == ElementState::Pressed;
                if pressed {
                    if !self.buttons_held.contains(button) {
                        self.buttons_held.push(*button);
                    }
                } else {
                    self.buttons_held.retain(|b| b != button);
                }
                board.mouse_button(map_button(*button), pressed, self.cursor.x, self.cursor.y)
            }
            _ => false,
        }
    }

    fn handle_key(&self, board: &mut ChessBoard, event: &KeyEvent) -> bool {
        if event.repeat {
            return false;
        }
        let Some(key) = key_char(&event.logical_key) else {
            return false;
        };
        match event.state {
            ElementState::Pressed => board.key_down(key, self.cursor.x, self.cursor.y),
            ElementState::Released => board.key_up(key, self.cursor.x, self.cursor.y),
        }
    }
}

/// Lower-case character produced by a key, if any
fn key_char(key: &Key) -> Option<char> {
    match key {
        Key::Character(text) => text.chars().next().map(|c| c.to_ascii_lowercase()),
        _ => None,
    }
}

fn map_button(button: winit::event::MouseButton) -> MouseButton {
    match button {
        winit::event::MouseButton::Left => MouseButton::Left,
        winit::event::MouseButton::Right => MouseButton::Right,
        winit::event::MouseButton::Middle => MouseButton::Middle,
        _ => MouseButton::Other,
    }
}

/// Open the viewer window and run until it is closed
pub fn run(config: ViewerConfig, meshes: MeshLibrary) -> Result<(), ViewerError> {
    let event_loop = EventLoop::new()?;
    let mut window = Window::new(&event_loop, &config.title, config.width, config.height)?;

    let board = ChessBoard::new(meshes, &config);
    let mut engine = Engine::new(window.window_arc(), board, &config)?;
    log::info!("Viewer ready, hold '{}' and move the mouse to orbit", config.rotate_key);
    window.request_redraw();

    event_loop.run(move |event, elwt: &EventLoopWindowTarget<()>| {
        elwt.set_control_flow(ControlFlow::Wait);

        let Event::WindowEvent { event, .. } = event else {
            return;
        };
        match event {
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::Resized(size) => {
                engine.resize(size.width, size.height);
                window.request_redraw();
            }
            WindowEvent::RedrawRequested => match engine.render() {
                Ok(()) => {}
                Err(err @ crate::backend::BackendError::OutOfMemory) => {
                    log::error!("{err}");
                    elwt.exit();
                }
                Err(err) => log::warn!("Frame skipped: {err}"),
            },
            event => {
                if window.handle_input(engine.board_mut(), &event) {
                    window.request_redraw();
                }
            }
        }
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_char_is_lower_case() {
        assert_eq!(key_char(&Key::Character("A".into())), Some('a'));
        assert_eq!(key_char(&Key::Character("q".into())), Some('q'));
        assert_eq!(
            key_char(&Key::Named(winit::keyboard::NamedKey::Shift)),
            None
        );
    }

    #[test]
    fn test_map_button() {
        assert_eq!(map_button(winit::event::MouseButton::Left), MouseButton::Left);
        assert_eq!(map_button(winit::event::MouseButton::Back), MouseButton::Other);
    }
}
