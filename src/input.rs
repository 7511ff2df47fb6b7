use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Camera navigation key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    KeyW,
    KeyA,
    KeyS,
    KeyD,
    KeyQ,
    KeyE,
    Space,
    Shift,
}

/// Input change worth forwarding to the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Button { button: Button, pressed: bool },
    /// Cursor moved, in normalized device coordinates
    PointerMoved { ndc_x: f32, ndc_y: f32 },
    /// Left button pressed over the viewport
    PointerDown { ndc_x: f32, ndc_y: f32 },
    /// Left button released over the viewport
    PointerUp { ndc_x: f32, ndc_y: f32 },
    /// Cursor left the window
    PointerLeft,
}

/// Adapter that turns Winit events into navigation keys and pointer events
/// in normalized device coordinates
#[derive(Debug, Clone)]
pub struct WinitController {
    /// Cursor position in physical pixels
    mouse_position: Option<(f32, f32)>,
    viewport: (u32, u32),
}

impl WinitController {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            mouse_position: None,
            viewport: (width, height),
        }
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    pub fn mouse_position(&self) -> Option<(f32, f32)> {
        self.mouse_position
    }

    /// Convert a pixel position to NDC; y points up
    pub fn to_ndc(&self, x: f32, y: f32) -> Option<(f32, f32)> {
        let (w, h) = self.viewport;
        if w == 0 || h == 0 {
            return None;
        }
        Some((2.0 * x / w as f32 - 1.0, 1.0 - 2.0 * y / h as f32))
    }

    /// Process a Winit WindowEvent and report what changed
    pub fn process_event(&mut self, event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(keycode) = event.physical_key else {
                    return None;
                };
                let button = Self::keycode_to_button(keycode)?;
                let pressed = event.state == ElementState::Pressed;
                Some(InputEvent::Button { button, pressed })
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let (x, y) = self.mouse_position?;
                let (ndc_x, ndc_y) = self.to_ndc(x, y)?;
                Some(match state {
                    ElementState::Pressed => InputEvent::PointerDown { ndc_x, ndc_y },
                    ElementState::Released => InputEvent::PointerUp { ndc_x, ndc_y },
                })
            }
            WindowEvent::CursorMoved { position, .. } => {
                let pos = (position.x as f32, position.y as f32);
                self.mouse_position = Some(pos);
                let (ndc_x, ndc_y) = self.to_ndc(pos.0, pos.1)?;
                Some(InputEvent::PointerMoved { ndc_x, ndc_y })
            }
            WindowEvent::CursorLeft { .. } => {
                self.mouse_position = None;
                Some(InputEvent::PointerLeft)
            }
            _ => None,
        }
    }

    /// Map Winit KeyCode to Button
    fn keycode_to_button(keycode: KeyCode) -> Option<Button> {
        match keycode {
            KeyCode::KeyW => Some(Button::KeyW),
            KeyCode::KeyA => Some(Button::KeyA),
            KeyCode::KeyS => Some(Button::KeyS),
            KeyCode::KeyD => Some(Button::KeyD),
            KeyCode::KeyQ => Some(Button::KeyQ),
            KeyCode::KeyE => Some(Button::KeyE),
            KeyCode::Space => Some(Button::Space),
            KeyCode::ShiftLeft | KeyCode::ShiftRight => Some(Button::Shift),
            _ => None,
        }
    }
}
