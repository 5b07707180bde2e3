use crate::dom::NodeId;
use std::fmt;

/// Тип события, которое рассылается после ввода Konami Code
pub const KONAMI_CODE_EVENT: &str = "konamicode";

/// Пользовательское событие без полезной нагрузки (аналог DOM `CustomEvent`).
///
/// Создаётся либо конструктором [`CustomEvent::new`], либо "по-старому":
/// [`CustomEvent::uninitialized`] + [`CustomEvent::init_custom_event`].
/// Наблюдаемые свойства в обоих случаях одинаковые.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomEvent {
    event_type: String,
    bubbles: bool,
    cancelable: bool,
    initialized: bool,
    target: Option<NodeId>,
    current_target: Option<NodeId>,
    default_prevented: bool,
    propagation_stopped: bool,
}

/// Параметры конструктора события
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CustomEventInit {
    pub bubbles: bool,
    pub cancelable: bool,
}

impl CustomEvent {
    pub fn new(event_type: impl Into<String>, init: CustomEventInit) -> Self {
        let mut event = Self::uninitialized();
        event.init_custom_event(event_type, init.bubbles, init.cancelable);
        event
    }

    /// Пустое событие, как после `document.createEvent('CustomEvent')`
    pub fn uninitialized() -> Self {
        Self {
            event_type: String::new(),
            bubbles: false,
            cancelable: false,
            initialized: false,
            target: None,
            current_target: None,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Инициализация старым способом. Не действует на уже разосланное событие.
    pub fn init_custom_event(&mut self, event_type: impl Into<String>, bubbles: bool, cancelable: bool) {
        if self.target.is_some() {
            return;
        }
        self.event_type = event_type.into();
        self.bubbles = bubbles;
        self.cancelable = cancelable;
        self.initialized = true;
        self.default_prevented = false;
        self.propagation_stopped = false;
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    pub fn cancelable(&self) -> bool {
        self.cancelable
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    pub fn current_target(&self) -> Option<NodeId> {
        self.current_target
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub(crate) fn set_target(&mut self, target: NodeId) {
        self.target = Some(target);
    }

    pub(crate) fn set_current_target(&mut self, current_target: Option<NodeId>) {
        self.current_target = current_target;
    }
}

impl fmt::Display for CustomEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.event_type)?;
        if let Some(target) = self.target {
            write!(f, "@{}", target)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor_and_legacy_init_are_equivalent() {
        let modern = CustomEvent::new(
            KONAMI_CODE_EVENT,
            CustomEventInit {
                bubbles: true,
                cancelable: true,
            },
        );

        let mut legacy = CustomEvent::uninitialized();
        assert!(!legacy.is_initialized());
        legacy.init_custom_event(KONAMI_CODE_EVENT, true, true);

        assert_eq!(modern, legacy);
    }

    #[test]
    fn test_prevent_default_requires_cancelable() {
        let mut event = CustomEvent::new("x", CustomEventInit::default());
        event.prevent_default();
        assert!(!event.default_prevented());

        let mut event = CustomEvent::new(
            "x",
            CustomEventInit {
                bubbles: false,
                cancelable: true,
            },
        );
        event.prevent_default();
        assert!(event.default_prevented());
    }

    #[test]
    fn test_init_ignored_after_dispatch() {
        let mut event = CustomEvent::new(KONAMI_CODE_EVENT, CustomEventInit::default());
        event.set_target(NodeId::DOCUMENT);
        event.init_custom_event("other", true, true);

        assert_eq!(event.event_type(), KONAMI_CODE_EVENT);
        assert!(!event.bubbles());
    }
}
