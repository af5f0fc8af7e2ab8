//! Per-frame keyboard and mouse input resource.
//!
//! [`InputState`] is the process-wide polling snapshot read by components
//! during a frame. It is written exactly once per frame, by
//! [`update_input_state`](crate::systems::input::update_input_state), from a
//! [`RawInput`] sample (the set of keys and buttons physically held). Edge
//! states are derived by comparing the sample with the previous frame:
//!
//! | previous | current | state      |
//! |----------|---------|------------|
//! | up       | up      | `Up`       |
//! | up       | down    | `Pressed`  |
//! | down     | down    | `Down`     |
//! | down     | up      | `Released` |
//!
//! Keys and buttons that were never seen report `Up` / `false`.
use bevy_ecs::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

/// Keyboard keys the engine tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    W,
    A,
    S,
    D,
    Up,
    Down,
    Left,
    Right,
    Space,
    Enter,
    Escape,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    F10,
    F11,
    F12,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Polling state of a single key or button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    /// Not held, and not released this frame.
    #[default]
    Up,
    /// Held for at least two consecutive frames.
    Down,
    /// Became held this frame.
    Pressed,
    /// Stopped being held this frame.
    Released,
}

impl ButtonState {
    /// Derive the new state from whether the input was held last frame and
    /// whether it is held now.
    pub fn transition(was_down: bool, is_down: bool) -> Self {
        match (was_down, is_down) {
            (false, false) => ButtonState::Up,
            (false, true) => ButtonState::Pressed,
            (true, true) => ButtonState::Down,
            (true, false) => ButtonState::Released,
        }
    }

    /// True for `Pressed` and `Down`.
    pub fn is_held(self) -> bool {
        matches!(self, ButtonState::Pressed | ButtonState::Down)
    }
}

/// One raw sample from an input backend: everything physically held.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInput {
    pub keys_down: FxHashSet<Key>,
    pub mouse_down: FxHashSet<MouseButton>,
}

impl RawInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper marking a key as held.
    pub fn with_key(mut self, key: Key) -> Self {
        self.keys_down.insert(key);
        self
    }

    /// Builder-style helper marking a mouse button as held.
    pub fn with_mouse(mut self, button: MouseButton) -> Self {
        self.mouse_down.insert(button);
        self
    }
}

/// Resource holding the current frame's input snapshot.
#[derive(Resource, Debug, Clone, Default)]
pub struct InputState {
    keys: FxHashMap<Key, ButtonState>,
    mouse_buttons: FxHashMap<MouseButton, ButtonState>,
    /// Number of snapshots applied so far.
    frame: u64,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot with a new raw sample, deriving edge states.
    ///
    /// This is the only mutation point; call it once per frame before the
    /// scene updates.
    pub fn apply_snapshot(&mut self, raw: &RawInput) {
        advance(&mut self.keys, &raw.keys_down);
        advance(&mut self.mouse_buttons, &raw.mouse_down);
        self.frame += 1;
    }

    /// State of `key` this frame. Untracked keys are `Up`.
    pub fn key_state(&self, key: Key) -> ButtonState {
        self.keys.get(&key).copied().unwrap_or_default()
    }

    /// True when `key` is `Pressed` or `Down`.
    pub fn is_key_down(&self, key: Key) -> bool {
        self.key_state(key).is_held()
    }

    pub fn mouse_button_state(&self, button: MouseButton) -> ButtonState {
        self.mouse_buttons.get(&button).copied().unwrap_or_default()
    }

    /// True when `button` is `Pressed` or `Down`.
    pub fn is_mouse_button_down(&self, button: MouseButton) -> bool {
        self.mouse_button_state(button).is_held()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}

fn advance<T: Copy + Eq + std::hash::Hash>(
    states: &mut FxHashMap<T, ButtonState>,
    held: &FxHashSet<T>,
) {
    for (input, state) in states.iter_mut() {
        *state = ButtonState::transition(state.is_held(), held.contains(input));
    }
    for input in held {
        states.entry(*input).or_insert(ButtonState::Pressed);
    }
    states.retain(|_, state| *state != ButtonState::Up);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_everything_up() {
        let input = InputState::default();
        assert_eq!(input.key_state(Key::W), ButtonState::Up);
        assert_eq!(input.mouse_button_state(MouseButton::Left), ButtonState::Up);
        assert!(!input.is_key_down(Key::Escape));
        assert!(!input.is_mouse_button_down(MouseButton::Right));
        assert_eq!(input.frame(), 0);
    }

    #[test]
    fn test_transition_table() {
        assert_eq!(ButtonState::transition(false, false), ButtonState::Up);
        assert_eq!(ButtonState::transition(false, true), ButtonState::Pressed);
        assert_eq!(ButtonState::transition(true, true), ButtonState::Down);
        assert_eq!(ButtonState::transition(true, false), ButtonState::Released);
    }

    #[test]
    fn test_key_press_hold_release_cycle() {
        let mut input = InputState::new();
        let held = RawInput::new().with_key(Key::W);
        let none = RawInput::new();

        input.apply_snapshot(&held);
        assert_eq!(input.key_state(Key::W), ButtonState::Pressed);
        assert!(input.is_key_down(Key::W));

        input.apply_snapshot(&held);
        assert_eq!(input.key_state(Key::W), ButtonState::Down);

        input.apply_snapshot(&none);
        assert_eq!(input.key_state(Key::W), ButtonState::Released);
        assert!(!input.is_key_down(Key::W));

        input.apply_snapshot(&none);
        assert_eq!(input.key_state(Key::W), ButtonState::Up);
        assert_eq!(input.frame(), 4);
    }

    #[test]
    fn test_tap_within_one_frame_is_pressed_then_released() {
        let mut input = InputState::new();
        input.apply_snapshot(&RawInput::new().with_mouse(MouseButton::Left));
        input.apply_snapshot(&RawInput::new());
        assert_eq!(
            input.mouse_button_state(MouseButton::Left),
            ButtonState::Released
        );
    }

    #[test]
    fn test_keys_are_independent() {
        let mut input = InputState::new();
        input.apply_snapshot(&RawInput::new().with_key(Key::A));
        input.apply_snapshot(&RawInput::new().with_key(Key::A).with_key(Key::D));
        assert_eq!(input.key_state(Key::A), ButtonState::Down);
        assert_eq!(input.key_state(Key::D), ButtonState::Pressed);
        assert_eq!(input.key_state(Key::S), ButtonState::Up);
    }
}
