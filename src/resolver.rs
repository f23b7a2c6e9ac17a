//! # Loader Resolver
//!
//! Produces the merged [`LoaderSet`] used to deserialize replicated data and
//! keeps it cached until the watched attribute changes.
//!
//! ## Overview
//!
//! ```text
//! get_loaders()
//! ├── no container / no context ──▶ static loaders only (warning)
//! ├── cache hit ──────────────────▶ cached set
//! └── cache miss ─▶ population guard
//!                   ├── re-check cache
//!                   ├── static loaders        (host)
//!                   ├── adapted attribute     (context, may be absent)
//!                   ├── container loader      (context)
//!                   └── dedupe, store, return
//! ```
//!
//! Resolution never fails. Adaptation problems and a missing container are
//! logged and the best available set is returned.

use crate::cache::{CacheStats, LoaderCache};
use crate::constants::operations;
use crate::context::ContainerContext;
use crate::error::AdaptError;
use crate::host::ReplicationHost;
use crate::loader::{adapt, LoaderRef, LoaderSet};
use crate::logging::log_resolver_operation;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Resolver for one replication manager instance
pub struct LoaderResolver {
    host: Arc<dyn ReplicationHost>,
    attribute_name: String,
    cache: LoaderCache,
}

impl LoaderResolver {
    pub fn new(host: Arc<dyn ReplicationHost>, attribute_name: impl Into<String>) -> Self {
        Self {
            host,
            attribute_name: attribute_name.into(),
            cache: LoaderCache::new(),
        }
    }

    /// Name of the watched attribute
    pub fn attribute_name(&self) -> &str {
        &self.attribute_name
    }

    /// Current merged loader set
    pub fn get_loaders(&self) -> LoaderSet {
        let container = self.host.container();

        let Some(container) = container else {
            warn!("Replication manager does not have a container");
            return LoaderSet::from_loaders(self.host.static_loaders(None));
        };

        let Some(context) = container.context() else {
            warn!(container = %container.name(), "Container context is not set");
            return LoaderSet::from_loaders(self.host.static_loaders(Some(&container)));
        };

        if let Some(cached) = self.cache.read() {
            return cached;
        }

        let guard = self.cache.lock();
        if let Some(cached) = guard.read() {
            debug!("Loader set populated while waiting for the guard");
            return cached;
        }

        guard.record_computation();
        let static_loaders = self.host.static_loaders(Some(&container));
        let dynamic = self.attribute_loader(context.as_ref());
        let has_dynamic = dynamic.is_some();
        let merged = LoaderSet::merge(static_loaders, [dynamic, context.loader()]);

        let stored = guard.write(merged.clone());
        drop(guard);

        log_resolver_operation(
            operations::GET_LOADERS,
            &self.attribute_name,
            if stored { "recomputed" } else { "recomputed_uncached" },
            Some(&format!("loaders={:?} dynamic={has_dynamic}", merged.names())),
        );
        merged
    }

    /// Drop the cached set; the next [`get_loaders`](Self::get_loaders) recomputes.
    pub fn invalidate(&self) {
        self.cache.invalidate();
        log_resolver_operation(operations::INVALIDATE, &self.attribute_name, "cleared", None);
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn attribute_loader(&self, context: &dyn ContainerContext) -> Option<LoaderRef> {
        let value = context.attribute(&self.attribute_name)?;

        match adapt(&value) {
            Ok(loader) => Some(loader),
            Err(AdaptError::Reclaimed) => {
                debug!(
                    attribute = %self.attribute_name,
                    "Indirect loader reference has been reclaimed"
                );
                None
            }
            Err(e) => {
                warn!(
                    attribute = %self.attribute_name,
                    operation = operations::ADAPT,
                    error = %e,
                    "Ignoring attribute that cannot be used as a loader"
                );
                None
            }
        }
    }
}

impl fmt::Debug for LoaderResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderResolver")
            .field("attribute_name", &self.attribute_name)
            .field("cache", &self.cache.stats())
            .finish()
    }
}
