use std::collections::HashSet;

use super::types::{InputEvent, Key, Modifiers, MouseButton};

/// Polled input state for a window.
///
/// Holds "is down" sets plus the transitions recorded since the last
/// [`end_frame`](Self::end_frame); the runtime applies events and clears
/// transitions once per frame, so `key_pressed` answers "went down this
/// frame".
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,
    pub focused: bool,

    // Window coordinates: logical pixels, top-left origin, +Y down.
    pointer_pos: Option<(f32, f32)>,
    wheel: (f32, f32),

    keys_down: HashSet<Key>,
    keys_pressed: HashSet<Key>,
    keys_released: HashSet<Key>,

    buttons_down: HashSet<MouseButton>,
    buttons_pressed: HashSet<MouseButton>,
    buttons_released: HashSet<MouseButton>,
}

impl InputState {
    /// Folds one event into the state.
    pub(crate) fn apply(&mut self, ev: InputEvent) {
        match ev {
            InputEvent::ModifiersChanged(m) => self.modifiers = m,

            InputEvent::Focused(focused) => {
                self.focused = focused;
                if !focused {
                    // Avoid stuck keys/buttons when focus changes mid-press.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved { x, y } => self.pointer_pos = Some((x, y)),
            InputEvent::PointerLeft => self.pointer_pos = None,

            InputEvent::Key { key, pressed, repeat } => {
                if pressed {
                    if self.keys_down.insert(key) && !repeat {
                        self.keys_pressed.insert(key);
                    }
                } else if self.keys_down.remove(&key) {
                    self.keys_released.insert(key);
                }
            }

            InputEvent::PointerButton {
                button,
                pressed,
                x,
                y,
            } => {
                self.pointer_pos = Some((x, y));
                if pressed {
                    if self.buttons_down.insert(button) {
                        self.buttons_pressed.insert(button);
                    }
                } else if self.buttons_down.remove(&button) {
                    self.buttons_released.insert(button);
                }
            }

            InputEvent::Wheel { x, y } => {
                self.wheel.0 += x;
                self.wheel.1 += y;
            }
        }
    }

    /// Clears the per-frame transition sets and wheel accumulation. Called
    /// by the runtime after the frame callback has consumed them.
    pub(crate) fn end_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.wheel = (0.0, 0.0);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    /// True when the key went down this frame.
    pub fn key_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// True when the key went up this frame.
    pub fn key_released(&self, key: Key) -> bool {
        self.keys_released.contains(&key)
    }

    pub fn button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    pub fn button_pressed(&self, button: MouseButton) -> bool {
        self.buttons_pressed.contains(&button)
    }

    pub fn button_released(&self, button: MouseButton) -> bool {
        self.buttons_released.contains(&button)
    }

    /// Pointer position in window coordinates, if the pointer is inside.
    pub fn pointer_pos(&self) -> Option<(f32, f32)> {
        self.pointer_pos
    }

    /// Wheel delta accumulated this frame.
    pub fn wheel(&self) -> (f32, f32) {
        self.wheel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_sets_down_and_pressed_until_end_frame() {
        let mut state = InputState::default();
        state.apply(InputEvent::Key {
            key: Key::Space,
            pressed: true,
            repeat: false,
        });

        assert!(state.key_down(Key::Space));
        assert!(state.key_pressed(Key::Space));

        state.end_frame();
        assert!(state.key_down(Key::Space));
        assert!(!state.key_pressed(Key::Space));
    }

    #[test]
    fn repeats_do_not_retrigger_pressed() {
        let mut state = InputState::default();
        state.apply(InputEvent::Key {
            key: Key::A,
            pressed: true,
            repeat: false,
        });
        state.end_frame();

        state.apply(InputEvent::Key {
            key: Key::A,
            pressed: true,
            repeat: true,
        });
        assert!(state.key_down(Key::A));
        assert!(!state.key_pressed(Key::A));
    }

    #[test]
    fn release_records_a_transition() {
        let mut state = InputState::default();
        state.apply(InputEvent::Key {
            key: Key::W,
            pressed: true,
            repeat: false,
        });
        state.end_frame();

        state.apply(InputEvent::Key {
            key: Key::W,
            pressed: false,
            repeat: false,
        });
        assert!(!state.key_down(Key::W));
        assert!(state.key_released(Key::W));
    }

    #[test]
    fn focus_loss_clears_held_state() {
        let mut state = InputState::default();
        state.apply(InputEvent::Key {
            key: Key::A,
            pressed: true,
            repeat: false,
        });
        state.apply(InputEvent::PointerButton {
            button: MouseButton::Left,
            pressed: true,
            x: 1.0,
            y: 2.0,
        });

        state.apply(InputEvent::Focused(false));
        assert!(!state.key_down(Key::A));
        assert!(!state.button_down(MouseButton::Left));
    }

    #[test]
    fn wheel_accumulates_within_a_frame() {
        let mut state = InputState::default();
        state.apply(InputEvent::Wheel { x: 0.0, y: 1.0 });
        state.apply(InputEvent::Wheel { x: 0.0, y: 2.0 });
        assert_eq!(state.wheel(), (0.0, 3.0));

        state.end_frame();
        assert_eq!(state.wheel(), (0.0, 0.0));
    }
}
