use crate::config::Config;
use crate::dom::Document;
use crate::error::Result;
use std::sync::Arc;

/// Источник нажатий, который рассылает их в документ
#[async_trait::async_trait]
pub trait KeyboardListenerTrait {
    /// Работает, пока ввод не закончится или не вернёт ошибку
    async fn run(self: Box<Self>) -> Result<()>;
}

/// Создаёт слушатель клавиатуры: evdev или stdin в режиме dry-run
pub fn create_keyboard_listener(
    config: Arc<Config>,
    document: Arc<Document>,
    dry_run: bool,
) -> Result<Box<dyn KeyboardListenerTrait + Send>> {
    if dry_run {
        Ok(Box::new(super::dry_keyboard_listener::DryRunKeyboardListener::new(
            document,
        )?))
    } else {
        Ok(Box::new(super::keyboard_listener::RealKeyboardListener::new(
            config, document,
        )?))
    }
}
