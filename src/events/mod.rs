pub mod keyboard;
pub mod notification;

pub use keyboard::{KeyEvent, KeyState};
pub use notification::{CustomEvent, CustomEventInit, KONAMI_CODE_EVENT};
