use crate::dom::{Document, NodeId};
use crate::error::Result;
use crate::events::KeyEvent;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use super::key_mapping::KeyMapper;
use super::r#trait::KeyboardListenerTrait;

/// Эмуляция клавиатуры: клавиши читаются из stdin, по одному токену
/// (`up up down down left right left right b a`).
pub struct DryRunKeyboardListener {
    document: Arc<Document>,
    target: NodeId,
}

impl DryRunKeyboardListener {
    pub fn new(document: Arc<Document>) -> Result<Self> {
        info!("Инициализация DryRunKeyboardListener");
        let target = document.create_element("stdin", document.body())?;
        Ok(Self { document, target })
    }

    /// Нажатие и отпускание одной клавиши
    pub fn perform_key_press(&self, token: &str) {
        let key = KeyMapper::parse_token(token);
        self.document.dispatch_key_event(&KeyEvent::key_down(key.clone(), self.target));
        self.document.dispatch_key_event(&KeyEvent::key_up(key, self.target));
    }

    async fn run_impl(self) -> Result<()> {
        info!("Dry-run режим - клавиши читаются из stdin");
        info!("Пример: up up down down left right left right b a");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        while let Some(line) = lines.next_line().await? {
            for token in line.split_whitespace() {
                self.perform_key_press(token);
            }
        }

        info!("stdin закрыт - ввод dry-run завершён");
        Ok(())
    }
}

#[async_trait::async_trait]
impl KeyboardListenerTrait for DryRunKeyboardListener {
    async fn run(self: Box<Self>) -> Result<()> {
        (*self).run_impl().await
    }
}
