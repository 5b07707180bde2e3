mod dry_keyboard_listener;
mod keyboard_listener;
mod modifier_state;
mod key_mapping;
mod r#trait;

pub use self::key_mapping::{KeyMapper, UNIDENTIFIED_KEY};
pub use self::modifier_state::ModifierState;
pub use self::r#trait::{KeyboardListenerTrait, create_keyboard_listener};
