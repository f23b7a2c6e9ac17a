//! In-memory container and attribute context.

use super::{
    AttributeEvent, AttributeEventKind, AttributeListener, AttributeValue, Container,
    ContainerContext, ListenerId,
};
use crate::loader::LoaderRef;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, trace};

/// Attribute context backed by a concurrent map.
///
/// Listeners are notified after the map has been updated, outside of any lock,
/// on the thread that performed the change.
pub struct InMemoryContext {
    attributes: DashMap<String, AttributeValue>,
    loader: Option<LoaderRef>,
    listeners: RwLock<Vec<(ListenerId, Arc<dyn AttributeListener>)>>,
}

impl InMemoryContext {
    pub fn new(loader: Option<LoaderRef>) -> Self {
        Self {
            attributes: DashMap::new(),
            loader,
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Store `value` under `key`, firing *added* or *replaced*
    pub fn set_attribute(&self, key: impl Into<String>, value: AttributeValue) {
        let key = key.into();
        let previous = self.attributes.insert(key.clone(), value.clone());
        let kind = if previous.is_some() {
            AttributeEventKind::Replaced
        } else {
            AttributeEventKind::Added
        };
        debug!(key = %key, kind = %kind, value_type = value.type_name(), "Attribute changed");
        self.notify(AttributeEvent::new(kind, key, Some(value)));
    }

    /// Remove `key`, firing *removed* if a value was present
    pub fn remove_attribute(&self, key: &str) -> Option<AttributeValue> {
        let (key, previous) = self.attributes.remove(key)?;
        debug!(key = %key, "Attribute removed");
        self.notify(AttributeEvent::new(
            AttributeEventKind::Removed,
            key,
            Some(previous.clone()),
        ));
        Some(previous)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    fn notify(&self, event: AttributeEvent) {
        let listeners: Vec<Arc<dyn AttributeListener>> = self
            .listeners
            .read()
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        trace!(key = %event.key, listeners = listeners.len(), "Dispatching attribute event");
        for listener in listeners {
            event.dispatch(listener.as_ref());
        }
    }
}

impl Default for InMemoryContext {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ContainerContext for InMemoryContext {
    fn attribute(&self, key: &str) -> Option<AttributeValue> {
        self.attributes.get(key).map(|entry| entry.value().clone())
    }

    fn loader(&self) -> Option<LoaderRef> {
        self.loader.clone()
    }

    fn add_attribute_listener(&self, listener: Arc<dyn AttributeListener>) -> ListenerId {
        let id = ListenerId::new();
        self.listeners.write().push((id, listener));
        id
    }

    fn remove_attribute_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }
}

/// Named container with an optional context
pub struct InMemoryContainer {
    name: String,
    context: Option<Arc<dyn ContainerContext>>,
}

impl InMemoryContainer {
    pub fn new(name: impl Into<String>, context: Option<Arc<dyn ContainerContext>>) -> Self {
        Self {
            name: name.into(),
            context,
        }
    }
}

impl Container for InMemoryContainer {
    fn name(&self) -> &str {
        &self.name
    }

    fn context(&self) -> Option<Arc<dyn ContainerContext>> {
        self.context.clone()
    }
}
