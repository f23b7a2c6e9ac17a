//! # Attribute Change Listener
//!
//! Bridges attribute store notifications to the resolver and to the host's
//! initialization hook.
//!
//! ## State Machine
//!
//! ```text
//!               added / replaced (watched key)
//! Uninitialized ──────────────────────────────▶ Initialized
//!       │                                            │
//!       └── removed: invalidate only                 └── any change: invalidate only
//! ```
//!
//! Every add, remove or replace of the watched key invalidates the resolver
//! cache. The first add or replace while uninitialized also fires
//! [`InitializationHook::on_initialized`], exactly once. Other keys are ignored.

use crate::constants::operations;
use crate::context::{AttributeEvent, AttributeListener};
use crate::logging::log_manager_transition;
use crate::resolver::LoaderResolver;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// Listener states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListenerState {
    /// Replication traffic is held back until the watched attribute appears
    Uninitialized,
    /// Fully operational
    Initialized,
}

impl ListenerState {
    pub fn is_initialized(&self) -> bool {
        matches!(self, Self::Initialized)
    }
}

impl fmt::Display for ListenerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Initialized => write!(f, "initialized"),
        }
    }
}

/// Host callback fired on the transition to [`ListenerState::Initialized`]
pub trait InitializationHook: Send + Sync {
    fn on_initialized(&self);
}

/// Watches one attribute key and drives resolver invalidation and initialization
pub struct AttributeChangeListener {
    attribute_name: String,
    resolver: Arc<LoaderResolver>,
    hook: Arc<dyn InitializationHook>,
    initialized: AtomicBool,
}

impl AttributeChangeListener {
    pub fn new(
        resolver: Arc<LoaderResolver>,
        hook: Arc<dyn InitializationHook>,
        initial: ListenerState,
    ) -> Self {
        Self {
            attribute_name: resolver.attribute_name().to_string(),
            resolver,
            hook,
            initialized: AtomicBool::new(initial.is_initialized()),
        }
    }

    pub fn attribute_name(&self) -> &str {
        &self.attribute_name
    }

    pub fn state(&self) -> ListenerState {
        if self.initialized.load(Ordering::Acquire) {
            ListenerState::Initialized
        } else {
            ListenerState::Uninitialized
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.state().is_initialized()
    }

    /// Transition to [`ListenerState::Initialized`] and fire the hook.
    /// Returns `false` when already initialized.
    pub fn initialize(&self) -> bool {
        if self
            .initialized
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }

        log_manager_transition(
            None,
            operations::INITIALIZE,
            Some(&format!("attribute={}", self.attribute_name)),
        );
        self.hook.on_initialized();
        true
    }

    fn on_attribute(&self, event: &AttributeEvent, initialize: bool) {
        if event.key != self.attribute_name {
            trace!(key = %event.key, "Ignoring change to unrelated attribute");
            return;
        }

        debug!(key = %event.key, kind = %event.kind, "Watched attribute changed");
        self.resolver.invalidate();

        if initialize {
            self.initialize();
        }
    }
}

impl AttributeListener for AttributeChangeListener {
    fn attribute_added(&self, event: &AttributeEvent) {
        self.on_attribute(event, true);
    }

    fn attribute_removed(&self, event: &AttributeEvent) {
        self.on_attribute(event, false);
    }

    fn attribute_replaced(&self, event: &AttributeEvent) {
        self.on_attribute(event, true);
    }
}

impl fmt::Debug for AttributeChangeListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeChangeListener")
            .field("attribute_name", &self.attribute_name)
            .field("state", &self.state())
            .finish()
    }
}
