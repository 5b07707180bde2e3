use crate::dom::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Состояние клавиши
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyState {
    Pressed,
    Released,
    Repeat,
}

impl KeyState {
    /// Порождает ли это состояние событие `keydown` (автоповтор тоже порождает)
    pub fn is_key_down(&self) -> bool {
        matches!(self, KeyState::Pressed | KeyState::Repeat)
    }
}

/// Событие клавиатуры в терминах DOM: идентификатор клавиши (`key`) и узел,
/// который получил нажатие.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: String,
    pub state: KeyState,
    pub target: NodeId,
    pub timestamp: std::time::Instant,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, state: KeyState, target: NodeId) -> Self {
        Self {
            key: key.into(),
            state,
            target,
            timestamp: std::time::Instant::now(),
        }
    }

    pub fn key_down(key: impl Into<String>, target: NodeId) -> Self {
        Self::new(key, KeyState::Pressed, target)
    }

    pub fn key_up(key: impl Into<String>, target: NodeId) -> Self {
        Self::new(key, KeyState::Released, target)
    }

    pub fn is_key_down(&self) -> bool {
        self.state.is_key_down()
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] {:?} ({})",
            self.key,
            self.target,
            self.state,
            self.timestamp.elapsed().as_millis()
        )
    }
}
