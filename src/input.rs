use euclid::default::Point2D;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Key {
    Left,
    Right,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    Other(u8),
}

#[derive(Copy, Clone, Debug)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    MouseDown(MouseButton),
    MouseUp(MouseButton),
    MouseMove(Point2D<f32>),
}

/// Held input state as seen by a single game tick.
#[derive(Copy, Clone, Default, Debug)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub cursor: Point2D<f32>,
    pub primary_pressed: bool,
}

impl InputSnapshot {
    pub fn apply(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyDown(Key::Left) => {
                self.left = true;
            }
            InputEvent::KeyUp(Key::Left) => {
                self.left = false;
            }
            InputEvent::KeyDown(Key::Right) => {
                self.right = true;
            }
            InputEvent::KeyUp(Key::Right) => {
                self.right = false;
            }
            InputEvent::MouseDown(MouseButton::Left) => {
                self.primary_pressed = true;
            }
            InputEvent::MouseUp(MouseButton::Left) => {
                self.primary_pressed = false;
            }
            InputEvent::MouseMove(position) => {
                self.cursor = *position;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use euclid::point2;

    #[test]
    fn key_state_is_held_until_released() {
        let mut input = InputSnapshot::default();
        input.apply(&InputEvent::KeyDown(Key::Left));
        input.apply(&InputEvent::KeyDown(Key::Right));
        assert!(input.left);
        assert!(input.right);

        input.apply(&InputEvent::KeyUp(Key::Left));
        assert!(!input.left);
        assert!(input.right);
    }

    #[test]
    fn only_left_button_counts_as_primary() {
        let mut input = InputSnapshot::default();
        input.apply(&InputEvent::MouseDown(MouseButton::Right));
        assert!(!input.primary_pressed);

        input.apply(&InputEvent::MouseDown(MouseButton::Left));
        assert!(input.primary_pressed);

        input.apply(&InputEvent::MouseUp(MouseButton::Left));
        assert!(!input.primary_pressed);
    }

    #[test]
    fn cursor_tracks_last_move() {
        let mut input = InputSnapshot::default();
        input.apply(&InputEvent::MouseMove(point2(10., 20.)));
        input.apply(&InputEvent::MouseMove(point2(300., 260.)));
        assert_eq!(input.cursor, point2(300., 260.));
    }
}
