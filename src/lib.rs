#![allow(clippy::doc_markdown)] // Allow technical terms in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Replica Loader
//!
//! Loader-set resolution and cache invalidation for session replication across
//! dynamically loaded modules.
//!
//! ## Overview
//!
//! A session-replication layer needs, at arbitrary times, an up-to-date list of
//! loaders able to resolve the symbol names found in incoming replicated data.
//! One of those loaders is published indirectly by a module system into the
//! container's attribute store; it may not exist yet, may be replaced, or may
//! disappear.
//!
//! ## Architecture
//!
//! ```text
//! attribute store change
//!        │
//!        ▼
//! AttributeChangeListener ──invalidate()──▶ LoaderResolver ──▶ LoaderCache
//!        │                                        ▲
//!        └── first add: initialize ──▶ host      │ get_loaders()
//!                                                 │
//!                                      ReplicationManager / host
//! ```
//!
//! - [`loader`] - Uniform loader abstraction, loader sets and handle adaptation
//! - [`cache`] - Single-slot loader cache with a population guard
//! - [`resolver`] - Double-checked resolution of the merged loader set
//! - [`listener`] - Attribute change listener and initialization state machine
//! - [`manager`] - Host-facing replication manager
//! - [`context`] - Container and attribute store boundary, with an in-memory store
//! - [`host`] - Host replication component boundary
//! - [`config`] - Configuration loading and validation
//! - [`logging`] - Structured logging setup
//!
//! ## Quick Start
//!
//! ```rust
//! use replica_loader::context::in_memory::InMemoryContainer;
//! use replica_loader::context::{AttributeValue, ContainerHandle, InMemoryContext};
//! use replica_loader::host::{ClusterMessage, ReplicationHost};
//! use replica_loader::loader::{LoaderRef, NamedLoader};
//! use replica_loader::{ReplicationConfig, ReplicationManager};
//! use std::sync::Arc;
//!
//! struct Host {
//!     container: ContainerHandle,
//! }
//!
//! impl ReplicationHost for Host {
//!     fn container(&self) -> Option<ContainerHandle> {
//!         Some(self.container.clone())
//!     }
//!     fn static_loaders(&self, _container: Option<&ContainerHandle>) -> Vec<LoaderRef> {
//!         Vec::new()
//!     }
//!     fn deliver(&self, _message: ClusterMessage) {}
//!     fn request_full_sync(&self) {}
//! }
//!
//! let context = Arc::new(InMemoryContext::new(Some(NamedLoader::shared("webapp", ["app.Cart"]))));
//! let container: ContainerHandle = Arc::new(InMemoryContainer::new("/shop", Some(context.clone())));
//! let manager = ReplicationManager::new(Arc::new(Host { container }), ReplicationConfig::default());
//! manager.start().unwrap();
//!
//! let plugin = NamedLoader::shared("plugin", ["plugin.Widget"]);
//! context.set_attribute(manager.config().attribute_name.clone(), AttributeValue::loader(plugin));
//!
//! let loaders = manager.class_loaders();
//! assert_eq!(loaders.resolve_symbol("plugin.Widget").unwrap().origin, "plugin");
//! ```

pub mod cache;
pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod host;
pub mod listener;
pub mod loader;
pub mod logging;
pub mod manager;
pub mod resolver;

pub use cache::{CacheStats, LoaderCache};
pub use config::{ConfigManager, ReplicationConfig};
pub use error::{AdaptError, InvocationError, ManagerError, Result, SymbolNotFound};
pub use listener::{AttributeChangeListener, InitializationHook, ListenerState};
pub use loader::{LoaderRef, LoaderSet, Symbol, SymbolLoader};
pub use manager::ReplicationManager;
pub use resolver::LoaderResolver;
