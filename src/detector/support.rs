use crate::dom::{Document, ListenerId};
use crate::events::KeyEvent;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, info};

use super::konami::SequenceDetector;

/// Параметры распознавания Konami Code
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DetectionOptions {
    /// Требовать Enter после `B A`
    pub require_confirm_key: bool,
    /// Максимальная пауза между верными клавишами, мс. 0 - ждать сколько угодно.
    pub max_interval_ms: u64,
}

/// Включить поддержку Konami Code: все узлы документа начинают рассылать
/// событие `konamicode`, когда пользователь вводит `↑ ↑ ↓ ↓ ← → ← → B A`.
///
/// Событие всплывает и может быть отменено, поэтому его достаточно слушать
/// на документе:
///
/// ```
/// use koco::detector::{add_support_for_the_konami_code, DetectionOptions};
/// use koco::dom::Document;
/// use koco::events::{CustomEvent, KONAMI_CODE_EVENT};
/// use std::sync::Arc;
///
/// let document = Arc::new(Document::new());
/// let support = add_support_for_the_konami_code(&document, DetectionOptions::default());
///
/// document
///     .add_event_listener(
///         document.root(),
///         KONAMI_CODE_EVENT,
///         Arc::new(|_: &mut CustomEvent| println!("30 дополнительных жизней!")),
///     )
///     .unwrap();
///
/// support.remove();
/// ```
///
/// Возвращает [`SupportRemover`], который отключает поддержку.
pub fn add_support_for_the_konami_code(
    document: &Arc<Document>,
    options: DetectionOptions,
) -> SupportRemover {
    let detector = Arc::new(SequenceDetector::new(document, &options));

    let listener_detector = Arc::clone(&detector);
    let listener_id = document.add_key_down_listener(Arc::new(move |event: &KeyEvent| {
        listener_detector.handle_key_down(event);
    }));

    info!(
        "Поддержка Konami Code включена (Enter: {}, пауза: {})",
        options.require_confirm_key,
        match options.max_interval_ms {
            0 => "без ограничений".to_string(),
            ms => format!("{}мс", ms),
        }
    );

    SupportRemover {
        document: Arc::downgrade(document),
        listener_id,
        detector,
        removed: AtomicBool::new(false),
    }
}

/// Отключает поддержку Konami Code.
///
/// Повторный вызов [`SupportRemover::remove`] ничего не делает. Уничтожение
/// значения без вызова `remove` поддержку НЕ отключает.
pub struct SupportRemover {
    document: Weak<Document>,
    listener_id: ListenerId,
    detector: Arc<SequenceDetector>,
    removed: AtomicBool,
}

impl SupportRemover {
    pub fn remove(&self) {
        if self.removed.swap(true, Ordering::AcqRel) {
            debug!("Поддержка Konami Code уже отключена");
            return;
        }

        if let Some(document) = self.document.upgrade() {
            document.remove_key_down_listener(self.listener_id);
        }
        self.detector.deactivate();

        info!("Поддержка Konami Code отключена");
    }

    pub fn is_removed(&self) -> bool {
        self.removed.load(Ordering::Acquire)
    }

    pub fn detector(&self) -> &SequenceDetector {
        &self.detector
    }
}
