#![allow(dead_code)]

use koco::dom::{Document, ListenerId, NodeId};
use koco::events::{CustomEvent, KeyEvent, KONAMI_CODE_EVENT};
use parking_lot::Mutex;
use std::sync::Arc;

pub const KONAMI_CODE: [&str; 10] = [
    "ArrowUp",
    "ArrowUp",
    "ArrowDown",
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
    "ArrowLeft",
    "ArrowRight",
    "b",
    "a",
];

/// `keydown` + `keyup` от имени узла `target`
pub fn perform_key_press_on(document: &Document, key: &str, target: NodeId) {
    document.dispatch_key_event(&KeyEvent::key_down(key, target));
    document.dispatch_key_event(&KeyEvent::key_up(key, target));
}

pub fn perform_key_press(document: &Document, key: &str) {
    perform_key_press_on(document, key, document.root());
}

pub fn perform_key_presses(document: &Document, keys: &[&str]) {
    for key in keys {
        perform_key_press(document, key);
    }
}

/// Собирает все `konamicode`, всплывшие до документа
pub struct KonamiCodeEventCapturer {
    document: Arc<Document>,
    listener: Option<ListenerId>,
    events: Arc<Mutex<Vec<CustomEvent>>>,
}

impl KonamiCodeEventCapturer {
    pub fn start(document: &Arc<Document>) -> Self {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);

        let listener = document
            .add_event_listener(
                document.root(),
                KONAMI_CODE_EVENT,
                Arc::new(move |event: &mut CustomEvent| sink.lock().push(event.clone())),
            )
            .expect("document root always exists");

        Self {
            document: Arc::clone(document),
            listener: Some(listener),
            events,
        }
    }

    pub fn stop(&mut self) {
        if let Some(listener) = self.listener.take() {
            self.document.remove_event_listener(self.document.root(), listener);
        }
    }

    pub fn reset(&self) {
        self.events.lock().clear();
    }

    pub fn count(&self) -> usize {
        self.events.lock().len()
    }

    pub fn events(&self) -> Vec<CustomEvent> {
        self.events.lock().clone()
    }

    pub fn has_captured_event(&self, dispatched_by: NodeId) {
        let events = self.events.lock();
        assert!(
            events.iter().any(|event| {
                event.event_type() == KONAMI_CODE_EVENT
                    && event.bubbles()
                    && event.cancelable()
                    && event.target() == Some(dispatched_by)
            }),
            "expected a konamicode event dispatched by {}, captured: {:?}",
            dispatched_by,
            *events
        );
    }

    pub fn has_not_captured_event(&self) {
        let events = self.events.lock();
        assert!(events.is_empty(), "unexpected konamicode events: {:?}", *events);
    }
}

impl Drop for KonamiCodeEventCapturer {
    fn drop(&mut self) {
        self.stop();
    }
}
