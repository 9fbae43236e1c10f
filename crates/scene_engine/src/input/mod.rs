//! Input management system
//!
//! The platform layer owns the window and forwards its events here; systems
//! read the resulting state once per frame through a `SharedInput` handle.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

/// Input state shared between the platform layer and the controller systems
pub type SharedInput = Rc<RefCell<InputManager>>;

/// Input manager
#[derive(Debug, Clone)]
pub struct InputManager {
    pressed_keys: HashSet<KeyCode>,
    pressed_buttons: HashSet<MouseButton>,
    cursor_position: (f64, f64),
    scroll_delta: f32,
    window_size: (u32, u32),
}

impl InputManager {
    /// Create a new input manager
    pub fn new() -> Self {
        Self {
            pressed_keys: HashSet::new(),
            pressed_buttons: HashSet::new(),
            cursor_position: (0.0, 0.0),
            scroll_delta: 0.0,
            window_size: (1280, 720),
        }
    }

    /// Wrap a new manager in a shared handle
    pub fn shared() -> SharedInput {
        Rc::new(RefCell::new(Self::new()))
    }

    /// End-of-frame housekeeping: per-frame deltas reset
    pub fn update(&mut self) {
        self.scroll_delta = 0.0;
    }

    /// Handle key input
    pub fn handle_key_input(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.pressed_keys.insert(key);
        } else {
            self.pressed_keys.remove(&key);
        }
    }

    /// Handle mouse button input
    pub fn handle_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            self.pressed_buttons.insert(button);
        } else {
            self.pressed_buttons.remove(&button);
        }
    }

    /// Handle mouse movement
    pub fn handle_mouse_move(&mut self, x: f64, y: f64) {
        self.cursor_position = (x, y);
    }

    /// Accumulate scroll wheel movement for this frame
    pub fn handle_scroll(&mut self, delta: f32) {
        self.scroll_delta += delta;
    }

    /// Record the framebuffer size
    pub fn handle_resize(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
    }

    /// Whether a key is held
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.pressed_keys.contains(&key)
    }

    /// Whether a mouse button is held
    pub fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }

    /// Cursor position in window pixels
    pub fn cursor_position(&self) -> (f64, f64) {
        self.cursor_position
    }

    /// Scroll accumulated since the last `update`
    pub fn scroll_delta(&self) -> f32 {
        self.scroll_delta
    }

    /// Window size in pixels
    pub fn window_size(&self) -> (u32, u32) {
        self.window_size
    }

    /// Width over height, or 1.0 for a zero-height window
    pub fn aspect_ratio(&self) -> f32 {
        let (width, height) = self.window_size;
        if height == 0 {
            1.0
        } else {
            width as f32 / height as f32
        }
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A key
    A,
    /// B key
    B,
    /// C key
    C,
    /// D key
    D,
    /// E key
    E,
    /// F key
    F,
    /// G key
    G,
    /// H key
    H,
    /// I key
    I,
    /// J key
    J,
    /// K key
    K,
    /// L key
    L,
    /// M key
    M,
    /// N key
    N,
    /// O key
    O,
    /// P key
    P,
    /// Q key
    Q,
    /// R key
    R,
    /// S key
    S,
    /// T key
    T,
    /// U key
    U,
    /// V key
    V,
    /// W key
    W,
    /// X key
    X,
    /// Y key
    Y,
    /// Z key
    Z,
    /// Space key
    Space,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_and_button_state() {
        let mut input = InputManager::new();
        input.handle_key_input(KeyCode::W, true);
        input.handle_mouse_button(MouseButton::Left, true);
        assert!(input.is_key_pressed(KeyCode::W));
        assert!(input.is_mouse_button_pressed(MouseButton::Left));

        input.handle_key_input(KeyCode::W, false);
        input.handle_mouse_button(MouseButton::Left, false);
        assert!(!input.is_key_pressed(KeyCode::W));
        assert!(!input.is_mouse_button_pressed(MouseButton::Left));
    }

    #[test]
    fn test_scroll_resets_on_update() {
        let mut input = InputManager::new();
        input.handle_scroll(1.0);
        input.handle_scroll(0.5);
        assert_eq!(input.scroll_delta(), 1.5);
        input.update();
        assert_eq!(input.scroll_delta(), 0.0);
    }

    #[test]
    fn test_aspect_ratio() {
        let mut input = InputManager::new();
        input.handle_resize(800, 400);
        assert_eq!(input.window_size(), (800, 400));
        assert_eq!(input.aspect_ratio(), 2.0);
        input.handle_resize(800, 0);
        assert_eq!(input.aspect_ratio(), 1.0);
    }
}
