use crate::events::KeyState;
use evdev::KeyCode;

/// Состояние клавиш, влияющих на регистр букв
#[derive(Debug, Default)]
pub struct ModifierState {
    left_shift: bool,
    right_shift: bool,
    caps_lock: bool,
}

impl ModifierState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Начальное состояние Caps Lock берётся из светодиода устройства
    pub fn with_caps_lock(caps_lock: bool) -> Self {
        Self {
            caps_lock,
            ..Self::default()
        }
    }

    pub fn shift(&self) -> bool {
        self.left_shift || self.right_shift
    }

    pub fn caps_lock(&self) -> bool {
        self.caps_lock
    }

    /// Буквы печатаются заглавными
    pub fn uppercase(&self) -> bool {
        self.shift() != self.caps_lock
    }

    pub fn update_key(&mut self, key: KeyCode, state: KeyState) {
        match key {
            KeyCode::KEY_LEFTSHIFT => self.left_shift = state.is_key_down(),
            KeyCode::KEY_RIGHTSHIFT => self.right_shift = state.is_key_down(),
            KeyCode::KEY_CAPSLOCK if state == KeyState::Pressed => self.caps_lock = !self.caps_lock,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_and_caps_lock_cancel_out() {
        let mut state = ModifierState::new();
        assert!(!state.uppercase());

        state.update_key(KeyCode::KEY_LEFTSHIFT, KeyState::Pressed);
        assert!(state.uppercase());

        state.update_key(KeyCode::KEY_CAPSLOCK, KeyState::Pressed);
        assert!(!state.uppercase());

        state.update_key(KeyCode::KEY_LEFTSHIFT, KeyState::Released);
        assert!(state.uppercase());
    }

    #[test]
    fn test_caps_lock_ignores_repeat_and_release() {
        let mut state = ModifierState::with_caps_lock(true);

        state.update_key(KeyCode::KEY_CAPSLOCK, KeyState::Repeat);
        state.update_key(KeyCode::KEY_CAPSLOCK, KeyState::Released);

        assert!(state.caps_lock());
    }
}
