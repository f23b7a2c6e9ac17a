//! # Replication Manager
//!
//! Host-facing wrapper that owns one [`LoaderResolver`] and one
//! [`AttributeChangeListener`] and gates replication traffic on the listener state.
//!
//! ## Overview
//!
//! While uninitialized, incoming cluster messages are dropped and full-sync
//! requests are ignored: the loader needed to deserialize them may not exist yet.
//! Once the watched attribute appears, the listener initializes and the manager
//! requests a one-time full session sync from the host to catch up.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let manager = ReplicationManager::new(host, ReplicationConfig::default().with_initialized(false));
//! manager.start()?;
//!
//! // Later, from the transport layer
//! manager.message_data_received(message);
//!
//! // Before deserializing replicated session data
//! let loaders = manager.class_loaders();
//! ```

use crate::config::ReplicationConfig;
use crate::context::{ContainerContext, ListenerId};
use crate::error::{ManagerError, Result};
use crate::host::{ClusterMessage, ReplicationHost};
use crate::listener::{AttributeChangeListener, InitializationHook, ListenerState};
use crate::loader::LoaderSet;
use crate::logging::log_manager_transition;
use crate::resolver::LoaderResolver;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Requests a full session sync from the host once initialized
struct FullSyncHook {
    host: Arc<dyn ReplicationHost>,
}

impl InitializationHook for FullSyncHook {
    fn on_initialized(&self) {
        self.host.request_full_sync();
    }
}

/// Listener registration held while started
struct Registration {
    container: String,
    context: Arc<dyn ContainerContext>,
    id: ListenerId,
}

/// Replication manager for one container
pub struct ReplicationManager {
    host: Arc<dyn ReplicationHost>,
    config: ReplicationConfig,
    resolver: Arc<LoaderResolver>,
    listener: Arc<AttributeChangeListener>,
    registration: Mutex<Option<Registration>>,
}

impl ReplicationManager {
    pub fn new(host: Arc<dyn ReplicationHost>, config: ReplicationConfig) -> Self {
        let resolver = Arc::new(LoaderResolver::new(host.clone(), config.attribute_name.clone()));
        let initial = if config.initialized {
            ListenerState::Initialized
        } else {
            ListenerState::Uninitialized
        };
        let hook = Arc::new(FullSyncHook { host: host.clone() });
        let listener = Arc::new(AttributeChangeListener::new(resolver.clone(), hook, initial));

        Self {
            host,
            config,
            resolver,
            listener,
            registration: Mutex::new(None),
        }
    }

    /// Attach the attribute listener to the container context.
    ///
    /// Initializes immediately when processing was deferred but the watched
    /// attribute is already present.
    pub fn start(&self) -> Result<()> {
        let context = {
            let mut registration = self.registration.lock();
            if registration.is_some() {
                return Err(ManagerError::AlreadyStarted);
            }

            let container = self.host.container().ok_or(ManagerError::MissingContainer)?;
            let context = container
                .context()
                .ok_or_else(|| ManagerError::MissingContext {
                    container: container.name().to_string(),
                })?;

            let id = context.add_attribute_listener(self.listener.clone());
            *registration = Some(Registration {
                container: container.name().to_string(),
                context: context.clone(),
                id,
            });
            log_manager_transition(Some(container.name()), "start", Some(&format!("listener={id}")));
            context
        };

        if !self.listener.is_initialized()
            && context.attribute(&self.config.attribute_name).is_some()
        {
            self.listener.initialize();
        }

        Ok(())
    }

    /// Detach the listener and drop the cached loaders. Idempotent.
    pub fn stop(&self) {
        let Some(registration) = self.registration.lock().take() else {
            return;
        };

        registration
            .context
            .remove_attribute_listener(registration.id);
        self.resolver.invalidate();
        log_manager_transition(Some(&registration.container), "stop", None);
    }

    pub fn is_started(&self) -> bool {
        self.registration.lock().is_some()
    }

    pub fn is_initialized(&self) -> bool {
        self.listener.is_initialized()
    }

    pub fn state(&self) -> ListenerState {
        self.listener.state()
    }

    /// Forward `message` to the host, or drop it while uninitialized.
    /// Returns whether the message was delivered.
    pub fn message_data_received(&self, message: ClusterMessage) -> bool {
        if !self.is_initialized() {
            debug!(
                kind = %message.kind,
                session_id = message.session_id.as_deref(),
                "Dropping cluster message until initialized"
            );
            return false;
        }
        self.host.deliver(message);
        true
    }

    /// Request a full session sync, unless still uninitialized.
    /// Returns whether the request was forwarded.
    pub fn get_all_cluster_sessions(&self) -> bool {
        if !self.is_initialized() {
            debug!("Skipping full session sync until initialized");
            return false;
        }
        self.host.request_full_sync();
        true
    }

    /// Loaders for deserializing replicated data
    pub fn class_loaders(&self) -> LoaderSet {
        self.resolver.get_loaders()
    }

    /// New, unstarted manager for the same host with a copy of this
    /// configuration and the current initialization state.
    pub fn clone_from_template(&self) -> ReplicationManager {
        let config = self
            .config
            .clone()
            .with_initialized(self.is_initialized());
        ReplicationManager::new(self.host.clone(), config)
    }

    pub fn config(&self) -> &ReplicationConfig {
        &self.config
    }

    pub fn resolver(&self) -> &Arc<LoaderResolver> {
        &self.resolver
    }

    pub fn listener(&self) -> &Arc<AttributeChangeListener> {
        &self.listener
    }
}

impl fmt::Debug for ReplicationManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplicationManager")
            .field("attribute_name", &self.config.attribute_name)
            .field("state", &self.state())
            .field("started", &self.is_started())
            .finish()
    }
}
