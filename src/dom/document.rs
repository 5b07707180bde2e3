use crate::debug_if_enabled;
use crate::error::{KocoError, Result};
use crate::events::{CustomEvent, KeyEvent};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

use super::node::{ListenerId, NodeId};

/// Слушатель глобального потока `keydown` (фаза перехвата на уровне документа)
pub type KeyDownListener = Arc<dyn Fn(&KeyEvent) + Send + Sync>;

/// Слушатель пользовательских событий на узле
pub type EventListener = Arc<dyn Fn(&mut CustomEvent) + Send + Sync>;

struct EventListenerEntry {
    id: ListenerId,
    event_type: String,
    callback: EventListener,
}

struct Node {
    tag: String,
    parent: Option<NodeId>,
    listeners: Vec<EventListenerEntry>,
}

/// Минимальная среда событий: дерево узлов, глобальный поток нажатий и
/// рассылка пользовательских событий с всплытием.
///
/// Ни одна блокировка не удерживается во время вызова слушателей, поэтому
/// слушатели могут сами добавлять и снимать слушателей.
pub struct Document {
    nodes: RwLock<Vec<Node>>,
    body: NodeId,
    key_down_listeners: DashMap<ListenerId, KeyDownListener>,
    next_listener_id: AtomicU64,
    custom_event_constructor: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self::with_capabilities(true)
    }

    /// Документ без современного конструктора событий: события создаются
    /// через `create_custom_event` + `init_custom_event`.
    pub fn without_custom_event_constructor() -> Self {
        Self::with_capabilities(false)
    }

    fn with_capabilities(custom_event_constructor: bool) -> Self {
        let nodes = vec![
            Node {
                tag: "#document".to_string(),
                parent: None,
                listeners: Vec::new(),
            },
            Node {
                tag: "body".to_string(),
                parent: Some(NodeId::DOCUMENT),
                listeners: Vec::new(),
            },
        ];

        Self {
            nodes: RwLock::new(nodes),
            body: NodeId(1),
            key_down_listeners: DashMap::new(),
            next_listener_id: AtomicU64::new(1),
            custom_event_constructor,
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::DOCUMENT
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn supports_custom_event_constructor(&self) -> bool {
        self.custom_event_constructor
    }

    /// Аналог `document.createEvent('CustomEvent')`
    pub fn create_custom_event(&self) -> CustomEvent {
        CustomEvent::uninitialized()
    }

    pub fn create_element(&self, tag: impl Into<String>, parent: NodeId) -> Result<NodeId> {
        let mut nodes = self.nodes.write();
        if parent.0 >= nodes.len() {
            return Err(KocoError::NodeNotFound(parent.0));
        }

        let id = NodeId(nodes.len());
        nodes.push(Node {
            tag: tag.into(),
            parent: Some(parent),
            listeners: Vec::new(),
        });
        Ok(id)
    }

    pub fn tag_name(&self, node: NodeId) -> Option<String> {
        self.nodes.read().get(node.0).map(|n| n.tag.clone())
    }

    pub fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.read().get(node.0).and_then(|n| n.parent)
    }

    fn next_listener_id(&self) -> ListenerId {
        ListenerId(self.next_listener_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Подписка на все `keydown` документа (фаза перехвата)
    pub fn add_key_down_listener(&self, listener: KeyDownListener) -> ListenerId {
        let id = self.next_listener_id();
        self.key_down_listeners.insert(id, listener);
        debug!("Добавлен слушатель keydown {}", id);
        id
    }

    pub fn remove_key_down_listener(&self, id: ListenerId) -> bool {
        let removed = self.key_down_listeners.remove(&id).is_some();
        if removed {
            debug!("Удалён слушатель keydown {}", id);
        }
        removed
    }

    pub fn key_down_listener_count(&self) -> usize {
        self.key_down_listeners.len()
    }

    /// Разослать событие клавиатуры. Слушатели `keydown` получают только
    /// нажатия и автоповторы, в порядке регистрации.
    pub fn dispatch_key_event(&self, event: &KeyEvent) {
        debug_if_enabled!("Рассылка события клавиатуры: {}", event);

        if !event.is_key_down() {
            return;
        }

        let mut listeners: Vec<(ListenerId, KeyDownListener)> = self
            .key_down_listeners
            .iter()
            .map(|entry| (*entry.key(), Arc::clone(entry.value())))
            .collect();
        listeners.sort_by_key(|(id, _)| *id);

        for (_, listener) in listeners {
            listener(event);
        }
    }

    pub fn add_event_listener(
        &self,
        node: NodeId,
        event_type: impl Into<String>,
        listener: EventListener,
    ) -> Result<ListenerId> {
        let id = self.next_listener_id();
        let mut nodes = self.nodes.write();
        let target = nodes.get_mut(node.0).ok_or(KocoError::NodeNotFound(node.0))?;
        target.listeners.push(EventListenerEntry {
            id,
            event_type: event_type.into(),
            callback: listener,
        });
        Ok(id)
    }

    pub fn remove_event_listener(&self, node: NodeId, id: ListenerId) -> bool {
        let mut nodes = self.nodes.write();
        match nodes.get_mut(node.0) {
            Some(target) => {
                let before = target.listeners.len();
                target.listeners.retain(|entry| entry.id != id);
                before != target.listeners.len()
            }
            None => false,
        }
    }

    /// Разослать событие с узла `target`. Возвращает `false`, если один из
    /// слушателей отменил событие.
    pub fn dispatch_event(&self, target: NodeId, event: &mut CustomEvent) -> bool {
        event.set_target(target);

        let path = self.propagation_path(target, event.bubbles());
        if path.is_empty() {
            debug!("Событие {} отправлено несуществующему узлу {}", event.event_type(), target);
        }

        for node in path {
            let listeners = self.listeners_for(node, event.event_type());
            event.set_current_target(Some(node));

            for listener in listeners {
                listener(event);
            }

            if event.is_propagation_stopped() {
                break;
            }
        }

        event.set_current_target(None);
        !event.default_prevented()
    }

    fn propagation_path(&self, target: NodeId, bubbles: bool) -> Vec<NodeId> {
        let nodes = self.nodes.read();
        let mut path = Vec::new();
        let mut current = nodes.get(target.0).map(|_| target);

        while let Some(id) = current {
            path.push(id);
            if !bubbles {
                break;
            }
            current = nodes.get(id.0).and_then(|n| n.parent);
        }

        path
    }

    fn listeners_for(&self, node: NodeId, event_type: &str) -> Vec<EventListener> {
        self.nodes
            .read()
            .get(node.0)
            .map(|n| {
                n.listeners
                    .iter()
                    .filter(|entry| entry.event_type == event_type)
                    .map(|entry| Arc::clone(&entry.callback))
                    .collect()
            })
            .unwrap_or_default()
    }
}
