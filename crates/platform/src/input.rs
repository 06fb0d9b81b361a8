//! Keyboard mapping: discrete actions on key press, held keys for movement.

use std::collections::HashSet;

use corelib::{camera::MoveInput, light::LightKind};
use winit::keyboard::KeyCode;

/// One-shot command triggered by a key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Exit,
    /// Number row `0`..`9`.
    Digit(u32),
    Increase,
    Decrease,
    ToggleLight,
    SetLight(LightKind),
}

pub fn action_for_key(code: KeyCode) -> Option<Action> {
    let action = match code {
        KeyCode::Escape => Action::Exit,
        KeyCode::Digit0 => Action::Digit(0),
        KeyCode::Digit1 => Action::Digit(1),
        KeyCode::Digit2 => Action::Digit(2),
        KeyCode::Digit3 => Action::Digit(3),
        KeyCode::Digit4 => Action::Digit(4),
        KeyCode::Digit5 => Action::Digit(5),
        KeyCode::Digit6 => Action::Digit(6),
        KeyCode::Digit7 => Action::Digit(7),
        KeyCode::Digit8 => Action::Digit(8),
        KeyCode::Digit9 => Action::Digit(9),
        KeyCode::ArrowUp => Action::Increase,
        KeyCode::ArrowDown => Action::Decrease,
        KeyCode::KeyF => Action::ToggleLight,
        KeyCode::KeyI => Action::SetLight(LightKind::Directional),
        KeyCode::KeyO => Action::SetLight(LightKind::Point),
        KeyCode::KeyP => Action::SetLight(LightKind::Spotlight),
        _ => return None,
    };
    Some(action)
}

/// Keys currently held down.
#[derive(Debug, Default)]
pub struct HeldKeys {
    keys: HashSet<KeyCode>,
}

impl HeldKeys {
    pub fn press(&mut self, code: KeyCode) {
        self.keys.insert(code);
    }

    pub fn release(&mut self, code: KeyCode) {
        self.keys.remove(&code);
    }

    /// Focus loss drops every held key so the camera does not keep drifting.
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn move_input(&self) -> MoveInput {
        let held = |code| self.keys.contains(&code);
        MoveInput {
            forward: held(KeyCode::KeyW),
            back: held(KeyCode::KeyS),
            left: held(KeyCode::KeyA),
            right: held(KeyCode::KeyD),
            turn_left: held(KeyCode::KeyQ),
            turn_right: held(KeyCode::KeyE),
        }
    }
}
