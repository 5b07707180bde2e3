use evdev::KeyCode;
use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::modifier_state::ModifierState;

// Сокращения для ручного ввода в dry-run режиме
static KEY_ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut map = HashMap::new();

    map.insert("up", "ArrowUp");
    map.insert("↑", "ArrowUp");
    map.insert("down", "ArrowDown");
    map.insert("↓", "ArrowDown");
    map.insert("left", "ArrowLeft");
    map.insert("←", "ArrowLeft");
    map.insert("right", "ArrowRight");
    map.insert("→", "ArrowRight");
    map.insert("enter", "Enter");
    map.insert("return", "Enter");
    map.insert("space", " ");
    map.insert("esc", "Escape");
    map.insert("escape", "Escape");
    map.insert("tab", "Tab");

    map
});

/// `KeyboardEvent.key` для клавиш, у которых нет своего имени
pub const UNIDENTIFIED_KEY: &str = "Unidentified";

/// Трансляция клавиш в идентификаторы DOM (`KeyboardEvent.key`)
pub struct KeyMapper;

impl KeyMapper {
    /// Идентификатор DOM для evdev-кода с учётом Shift и Caps Lock
    pub fn dom_key(key: KeyCode, modifiers: &ModifierState) -> Option<String> {
        if let Some(letter) = Self::letter(key) {
            let letter = if modifiers.uppercase() {
                letter.to_ascii_uppercase()
            } else {
                letter
            };
            return Some(letter.to_string());
        }

        let name = match key {
            KeyCode::KEY_1 => "1",
            KeyCode::KEY_2 => "2",
            KeyCode::KEY_3 => "3",
            KeyCode::KEY_4 => "4",
            KeyCode::KEY_5 => "5",
            KeyCode::KEY_6 => "6",
            KeyCode::KEY_7 => "7",
            KeyCode::KEY_8 => "8",
            KeyCode::KEY_9 => "9",
            KeyCode::KEY_0 => "0",

            KeyCode::KEY_UP => "ArrowUp",
            KeyCode::KEY_DOWN => "ArrowDown",
            KeyCode::KEY_LEFT => "ArrowLeft",
            KeyCode::KEY_RIGHT => "ArrowRight",

            KeyCode::KEY_ENTER | KeyCode::KEY_KPENTER => "Enter",
            KeyCode::KEY_SPACE => " ",
            KeyCode::KEY_ESC => "Escape",
            KeyCode::KEY_TAB => "Tab",
            KeyCode::KEY_BACKSPACE => "Backspace",

            KeyCode::KEY_LEFTSHIFT | KeyCode::KEY_RIGHTSHIFT => "Shift",
            KeyCode::KEY_LEFTCTRL | KeyCode::KEY_RIGHTCTRL => "Control",
            KeyCode::KEY_LEFTALT | KeyCode::KEY_RIGHTALT => "Alt",
            KeyCode::KEY_LEFTMETA | KeyCode::KEY_RIGHTMETA => "Meta",
            KeyCode::KEY_CAPSLOCK => "CapsLock",
            _ => return None,
        };

        Some(name.to_string())
    }

    fn letter(key: KeyCode) -> Option<char> {
        let letter = match key {
            KeyCode::KEY_A => 'a',
            KeyCode::KEY_B => 'b',
            KeyCode::KEY_C => 'c',
            KeyCode::KEY_D => 'd',
            KeyCode::KEY_E => 'e',
            KeyCode::KEY_F => 'f',
            KeyCode::KEY_G => 'g',
            KeyCode::KEY_H => 'h',
            KeyCode::KEY_I => 'i',
            KeyCode::KEY_J => 'j',
            KeyCode::KEY_K => 'k',
            KeyCode::KEY_L => 'l',
            KeyCode::KEY_M => 'm',
            KeyCode::KEY_N => 'n',
            KeyCode::KEY_O => 'o',
            KeyCode::KEY_P => 'p',
            KeyCode::KEY_Q => 'q',
            KeyCode::KEY_R => 'r',
            KeyCode::KEY_S => 's',
            KeyCode::KEY_T => 't',
            KeyCode::KEY_U => 'u',
            KeyCode::KEY_V => 'v',
            KeyCode::KEY_W => 'w',
            KeyCode::KEY_X => 'x',
            KeyCode::KEY_Y => 'y',
            KeyCode::KEY_Z => 'z',
            _ => return None,
        };
        Some(letter)
    }

    /// Токен из stdin -> идентификатор DOM. Неизвестные токены передаются как есть.
    pub fn parse_token(token: &str) -> String {
        KEY_ALIASES
            .get(token.to_lowercase().as_str())
            .map(|key| key.to_string())
            .unwrap_or_else(|| token.to_string())
    }
}
