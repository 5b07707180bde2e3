pub mod keyboard_listener;
pub mod notifier;

pub use keyboard_listener::create_keyboard_listener;
pub use notifier::KonamiNotifier;
