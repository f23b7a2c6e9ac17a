//! # Container Context Boundary
//!
//! Traits describing the host container and its attribute store, the slot where
//! the module system publishes its context object.
//!
//! ## Overview
//!
//! ```text
//! ReplicationHost ──container()──▶ Container ──context()──▶ ContainerContext
//!                                                            ├── attribute(key)
//!                                                            ├── loader()
//!                                                            └── attribute listeners
//! ```
//!
//! The resolver only reads from these objects; it never mutates the store or the
//! values in it. [`InMemoryContext`] is a ready-made store for embedding and tests.

pub mod in_memory;

pub use in_memory::InMemoryContext;

use crate::loader::{DynObjectRef, IndirectLoader, LoaderRef};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Shared container handle
pub type ContainerHandle = Arc<dyn Container>;

/// Host container that may or may not provide an attribute context
pub trait Container: Send + Sync {
    fn name(&self) -> &str;

    /// The attachable context, or `None` when this container has none
    fn context(&self) -> Option<Arc<dyn ContainerContext>>;
}

/// Attribute store plus the container's own loader
pub trait ContainerContext: Send + Sync {
    /// Current value under `key`
    fn attribute(&self, key: &str) -> Option<AttributeValue>;

    /// The container's own loader
    fn loader(&self) -> Option<LoaderRef>;

    /// Register for attribute change notifications
    fn add_attribute_listener(&self, listener: Arc<dyn AttributeListener>) -> ListenerId;

    /// Unregister a listener; `false` when the id is unknown
    fn remove_attribute_listener(&self, id: ListenerId) -> bool;
}

/// Receiver of attribute change notifications
pub trait AttributeListener: Send + Sync {
    fn attribute_added(&self, event: &AttributeEvent);
    fn attribute_removed(&self, event: &AttributeEvent);
    fn attribute_replaced(&self, event: &AttributeEvent);
}

/// Registration handle returned by [`ContainerContext::add_attribute_listener`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListenerId(Uuid);

impl ListenerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ListenerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of attribute change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeEventKind {
    Added,
    Removed,
    Replaced,
}

impl fmt::Display for AttributeEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added => write!(f, "added"),
            Self::Removed => write!(f, "removed"),
            Self::Replaced => write!(f, "replaced"),
        }
    }
}

/// Attribute change notification.
///
/// `value` is the new value for added/replaced and the old value for removed.
#[derive(Debug, Clone)]
pub struct AttributeEvent {
    pub kind: AttributeEventKind,
    pub key: String,
    pub value: Option<AttributeValue>,
}

impl AttributeEvent {
    pub fn new(kind: AttributeEventKind, key: impl Into<String>, value: Option<AttributeValue>) -> Self {
        Self {
            kind,
            key: key.into(),
            value,
        }
    }

    /// Dispatch to the matching listener callback
    pub fn dispatch(&self, listener: &dyn AttributeListener) {
        match self.kind {
            AttributeEventKind::Added => listener.attribute_added(self),
            AttributeEventKind::Removed => listener.attribute_removed(self),
            AttributeEventKind::Replaced => listener.attribute_replaced(self),
        }
    }
}

/// Type-erased attribute value tagged with its concrete type name
#[derive(Clone)]
pub struct AttributeValue {
    type_name: &'static str,
    value: Arc<dyn Any + Send + Sync>,
}

impl AttributeValue {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            value: Arc::new(value),
        }
    }

    /// A native loader
    pub fn loader(loader: LoaderRef) -> Self {
        Self::new(loader)
    }

    /// A non-owning reference to `loader`
    pub fn indirect(loader: &LoaderRef) -> Self {
        Self::new(IndirectLoader::new(loader))
    }

    /// A dynamically described object, e.g. a module context
    pub fn object(object: DynObjectRef) -> Self {
        Self::new(object)
    }

    /// Concrete type name captured at construction
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Whether both values are the same stored instance
    pub fn same_instance(&self, other: &AttributeValue) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeValue")
            .field("type_name", &self.type_name)
            .finish()
    }
}
