//! Translates winit window events into scene-level actions.
//!
//! Pointer positions stay in raw window pixels here; the driver converts them to
//! frame coordinates with [`Camera::pointer_to_frame`](crate::Camera::pointer_to_frame)
//! since only it knows the surface size.

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Pixels per wheel "line" for touchpads reporting pixel deltas.
const PIXELS_PER_LINE: f32 = 120.0;

/// What a window event asks the scene to do.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputAction {
    /// Primary button went down at this pixel position.
    BeginDrag(Vec2),
    /// The cursor moved while the primary button was held.
    DragTo(Vec2),
    /// Primary button released.
    EndDrag,
    /// The cursor re-entered the window at its last known position.
    PointerEnter(Vec2),
    /// Start or stop the gait animation.
    SetAnimating(bool),
}

/// Pointer, wheel and key state between frames.
#[derive(Debug, Default)]
pub struct Input {
    primary_down: bool,
    cursor: Vec2,
    scroll_lines: f32,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a window event, returning the action it maps to, if any.
    ///
    /// Wheel motion produces no action; it accumulates until
    /// [`take_zoom_delta`](Self::take_zoom_delta).
    pub fn handle_event(&mut self, event: &WindowEvent) -> Option<InputAction> {
        match event {
            WindowEvent::MouseInput { state, button, .. } => self.mouse_button(*button, *state),
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(Vec2::new(position.x as f32, position.y as f32))
            }
            WindowEvent::CursorEntered { .. } => Some(InputAction::PointerEnter(self.cursor)),
            WindowEvent::MouseWheel { delta, .. } => {
                self.wheel(*delta);
                None
            }
            WindowEvent::KeyboardInput { event, .. } if !event.repeat => {
                match event.physical_key {
                    PhysicalKey::Code(key) => self.key(key, event.state),
                    PhysicalKey::Unidentified(_) => None,
                }
            }
            _ => None,
        }
    }

    pub fn mouse_button(&mut self, button: MouseButton, state: ElementState) -> Option<InputAction> {
        if button != MouseButton::Left {
            return None;
        }
        match state {
            ElementState::Pressed => {
                self.primary_down = true;
                Some(InputAction::BeginDrag(self.cursor))
            }
            ElementState::Released => {
                let was_down = std::mem::replace(&mut self.primary_down, false);
                was_down.then_some(InputAction::EndDrag)
            }
        }
    }

    pub fn cursor_moved(&mut self, position: Vec2) -> Option<InputAction> {
        self.cursor = position;
        self.primary_down.then_some(InputAction::DragTo(position))
    }

    pub fn wheel(&mut self, delta: MouseScrollDelta) {
        self.scroll_lines += match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
        };
    }

    /// `A` starts the animation, `S` stops it.
    pub fn key(&mut self, key: KeyCode, state: ElementState) -> Option<InputAction> {
        if state != ElementState::Pressed {
            return None;
        }
        match key {
            KeyCode::KeyA => Some(InputAction::SetAnimating(true)),
            KeyCode::KeyS => Some(InputAction::SetAnimating(false)),
            _ => None,
        }
    }

    /// Multiplicative zoom for the wheel motion since the last call, then resets it.
    ///
    /// Scrolling up zooms in. Returns exactly 1.0 when the wheel did not move.
    pub fn take_zoom_delta(&mut self, sensitivity: f32) -> f32 {
        let lines = std::mem::take(&mut self.scroll_lines);
        if lines == 0.0 {
            return 1.0;
        }
        (1.0 + lines * sensitivity).max(0.1)
    }

    /// Whether unconsumed wheel motion is pending.
    pub fn has_scroll(&self) -> bool {
        self.scroll_lines != 0.0
    }

    /// Last cursor position in window pixels.
    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    pub fn is_dragging(&self) -> bool {
        self.primary_down
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn press_move_release_is_one_drag() {
        let mut input = Input::new();
        assert_eq!(input.cursor_moved(Vec2::new(10.0, 20.0)), None);

        assert_eq!(
            input.mouse_button(MouseButton::Left, ElementState::Pressed),
            Some(InputAction::BeginDrag(Vec2::new(10.0, 20.0)))
        );
        assert_eq!(
            input.cursor_moved(Vec2::new(15.0, 20.0)),
            Some(InputAction::DragTo(Vec2::new(15.0, 20.0)))
        );
        assert_eq!(
            input.mouse_button(MouseButton::Left, ElementState::Released),
            Some(InputAction::EndDrag)
        );
        assert_eq!(input.cursor_moved(Vec2::new(30.0, 20.0)), None);
    }

    #[test]
    fn other_buttons_are_ignored() {
        let mut input = Input::new();
        assert_eq!(
            input.mouse_button(MouseButton::Right, ElementState::Pressed),
            None
        );
        assert!(!input.is_dragging());
        assert_eq!(
            input.mouse_button(MouseButton::Left, ElementState::Released),
            None
        );
    }

    #[test]
    fn wheel_accumulates_until_taken() {
        let mut input = Input::new();
        assert_eq!(input.take_zoom_delta(0.1), 1.0);

        input.wheel(MouseScrollDelta::LineDelta(0.0, 1.0));
        input.wheel(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 120.0)));
        assert!(input.has_scroll());
        assert!((input.take_zoom_delta(0.1) - 1.2).abs() < 1e-6);

        assert!(!input.has_scroll());
        assert_eq!(input.take_zoom_delta(0.1), 1.0);
    }

    #[test]
    fn large_scroll_out_stays_positive() {
        let mut input = Input::new();
        input.wheel(MouseScrollDelta::LineDelta(0.0, -50.0));
        assert_eq!(input.take_zoom_delta(0.1), 0.1);
    }

    #[test]
    fn keys_toggle_animation() {
        let mut input = Input::new();
        assert_eq!(
            input.key(KeyCode::KeyA, ElementState::Pressed),
            Some(InputAction::SetAnimating(true))
        );
        assert_eq!(
            input.key(KeyCode::KeyS, ElementState::Pressed),
            Some(InputAction::SetAnimating(false))
        );
        assert_eq!(input.key(KeyCode::KeyA, ElementState::Released), None);
        assert_eq!(input.key(KeyCode::KeyD, ElementState::Pressed), None);
    }
}
