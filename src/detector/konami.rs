use crate::debug_if_enabled;
use crate::dom::{Document, NodeId};
use crate::events::{CustomEvent, CustomEventInit, KeyEvent, KONAMI_CODE_EVENT};
use parking_lot::{Mutex, ReentrantMutex};
use std::sync::{Arc, Weak};
use tokio::runtime::Handle;
use tokio::time::{sleep, Duration};
use tracing::{debug, info, warn};

use super::sequence::{normalize_key, TargetSequence};
use super::session::{Advance, InactivityTimer, Session};
use super::support::DetectionOptions;

/// Автомат распознавания последовательности, привязанный к одному документу.
///
/// Каждый экземпляр владеет своей последовательностью и своим состоянием,
/// поэтому несколько активаций работают независимо.
///
/// `dispatch_gate` удерживается всё время обработки нажатия, включая рассылку
/// `konamicode`. Деактивация из другого потока ждёт её завершения, а из
/// слушателя в том же потоке проходит сразу (мьютекс реентерабельный).
pub struct SequenceDetector {
    sequence: TargetSequence,
    max_interval: Option<Duration>,
    runtime: Option<Handle>,
    session: Arc<Mutex<Session>>,
    document: Weak<Document>,
    dispatch_gate: ReentrantMutex<()>,
}

impl SequenceDetector {
    pub fn new(document: &Arc<Document>, options: &DetectionOptions) -> Self {
        let sequence = TargetSequence::konami_code(options.require_confirm_key);

        let mut max_interval = match options.max_interval_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        };

        // Таймер бездействия - это задача tokio; без рантайма ограничение не действует
        let runtime = if max_interval.is_some() {
            match Handle::try_current() {
                Ok(handle) => Some(handle),
                Err(_) => {
                    warn!(
                        "Нет рантайма tokio - ограничение {}мс между клавишами отключено",
                        options.max_interval_ms
                    );
                    max_interval = None;
                    None
                }
            }
        } else {
            None
        };

        Self {
            sequence,
            max_interval,
            runtime,
            session: Arc::new(Mutex::new(Session::new())),
            document: Arc::downgrade(document),
            dispatch_gate: ReentrantMutex::new(()),
        }
    }

    pub fn sequence(&self) -> &TargetSequence {
        &self.sequence
    }

    pub fn max_interval(&self) -> Option<Duration> {
        self.max_interval
    }

    pub fn progress(&self) -> usize {
        self.session.lock().progress()
    }

    pub fn has_pending_timer(&self) -> bool {
        self.session.lock().has_pending_timer()
    }

    pub fn is_active(&self) -> bool {
        !self.session.lock().is_deactivated()
    }

    /// Обработка одного `keydown`
    pub fn handle_key_down(&self, event: &KeyEvent) {
        let _gate = self.dispatch_gate.lock();

        let key = normalize_key(&event.key);

        // Флаг деактивации проверяется внутри `advance`, под той же блокировкой
        let (advance, progress) = {
            let mut session = self.session.lock();
            let advance = session.advance(&self.sequence, &key);
            if advance == Advance::Progressed {
                self.schedule_reset(&mut session);
            }
            (advance, session.progress())
        };

        match advance {
            Advance::Inactive => {}
            Advance::Reset => {
                debug_if_enabled!("Клавиша '{}' не совпала - прогресс сброшен", event.key);
            }
            Advance::Progressed => {
                debug_if_enabled!(
                    "Клавиша '{}' совпала, прогресс {}/{}",
                    event.key,
                    progress,
                    self.sequence.len()
                );
            }
            Advance::Completed => {
                info!("Konami Code введён (узел {})", event.target);
                self.trigger_event(event.target);
            }
        }
    }

    /// Сброс прогресса, если следующая клавиша не придёт за `max_interval`
    fn schedule_reset(&self, session: &mut Session) {
        let (Some(interval), Some(runtime)) = (self.max_interval, &self.runtime) else {
            return;
        };

        let generation = session.next_generation();
        let session_ref = Arc::downgrade(&self.session);

        let handle = runtime.spawn(async move {
            sleep(interval).await;

            if let Some(session) = session_ref.upgrade() {
                if session.lock().expire(generation) {
                    debug!("Превышено время между клавишами - прогресс сброшен");
                }
            }
        });

        session.arm_timer(InactivityTimer::new(generation, handle));
    }

    fn trigger_event(&self, target: NodeId) {
        let Some(document) = self.document.upgrade() else {
            debug!("Документ уже уничтожен - событие {} не отправлено", KONAMI_CODE_EVENT);
            return;
        };

        let mut event = if document.supports_custom_event_constructor() {
            CustomEvent::new(
                KONAMI_CODE_EVENT,
                CustomEventInit {
                    bubbles: true,
                    cancelable: true,
                },
            )
        } else {
            // Инициализация по-старому
            let mut event = document.create_custom_event();
            event.init_custom_event(KONAMI_CODE_EVENT, true, true);
            event
        };

        if !document.dispatch_event(target, &mut event) {
            debug!("Событие {} отменено слушателем", KONAMI_CODE_EVENT);
        }
    }

    /// Остановить детектор навсегда: дальше никаких изменений состояния и событий
    pub fn deactivate(&self) {
        let _gate = self.dispatch_gate.lock();
        self.session.lock().deactivate();
    }
}

impl Drop for SequenceDetector {
    fn drop(&mut self) {
        self.session.lock().cancel_timer();
    }
}
