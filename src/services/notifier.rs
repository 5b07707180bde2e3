use crate::config::Config;
use crate::dom::{Document, ListenerId};
use crate::error::Result;
use crate::events::{CustomEvent, KONAMI_CODE_EVENT};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::process::Command;
use tokio::runtime::Handle;
use tracing::{error, info, warn};

/// Слушает `konamicode` на уровне документа (событие всплывает), пишет в лог
/// и при необходимости запускает команду из `notify.command`.
pub struct KonamiNotifier {
    document: Weak<Document>,
    listener_id: ListenerId,
    detections: Arc<AtomicU64>,
}

impl KonamiNotifier {
    pub fn attach(config: &Config, document: &Arc<Document>) -> Result<Self> {
        let command = config.notify.command.clone();
        let runtime = match (&command, Handle::try_current()) {
            (Some(_), Ok(handle)) => Some(handle),
            (Some(_), Err(_)) => {
                warn!("Нет рантайма tokio - notify.command запускаться не будет");
                None
            }
            (None, _) => None,
        };

        let detections = Arc::new(AtomicU64::new(0));
        let weak_document = Arc::downgrade(document);

        let counter = Arc::clone(&detections);
        let listener_id = document.add_event_listener(
            document.root(),
            KONAMI_CODE_EVENT,
            Arc::new(move |event: &mut CustomEvent| {
                let count = counter.fetch_add(1, Ordering::Relaxed) + 1;
                let origin = event
                    .target()
                    .and_then(|target| weak_document.upgrade().and_then(|d| d.tag_name(target)))
                    .unwrap_or_else(|| "unknown".to_string());

                info!("🎮 Konami Code #{} введён (источник: {}). 30 дополнительных жизней!", count, origin);

                if let (Some(command), Some(runtime)) = (&command, &runtime) {
                    Self::spawn_command(runtime, command.clone(), origin);
                }
            }),
        )?;

        info!("KonamiNotifier подписан на событие {}", KONAMI_CODE_EVENT);

        Ok(Self {
            document: Arc::downgrade(document),
            listener_id,
            detections,
        })
    }

    pub fn detections(&self) -> u64 {
        self.detections.load(Ordering::Relaxed)
    }

    pub fn detach(&self) {
        if let Some(document) = self.document.upgrade() {
            document.remove_event_listener(document.root(), self.listener_id);
        }
    }

    fn spawn_command(runtime: &Handle, command: String, origin: String) {
        runtime.spawn(async move {
            info!("Запуск команды уведомления: {}", command);

            match Command::new("sh")
                .arg("-c")
                .arg(&command)
                .env("KOCO_ORIGIN", &origin)
                .status()
                .await
            {
                Ok(status) if status.success() => {}
                Ok(status) => warn!("Команда '{}' завершилась с кодом {}", command, status),
                Err(e) => error!("Не удалось запустить команду '{}': {}", command, e),
            }
        });
    }
}
