//! Possibly-expired loader handle.

use super::{LoaderRef, SymbolLoader};
use std::fmt;
use std::sync::{Arc, Weak};

/// Non-owning reference to a loader that may have been reclaimed.
///
/// Publishing an `IndirectLoader` instead of the loader itself lets the owner
/// of the loader drop it without the attribute store keeping it alive.
#[derive(Clone)]
pub struct IndirectLoader {
    target: Weak<dyn SymbolLoader>,
}

impl IndirectLoader {
    pub fn new(loader: &LoaderRef) -> Self {
        Self {
            target: Arc::downgrade(loader),
        }
    }

    /// Whether the referent is still alive
    pub fn is_alive(&self) -> bool {
        self.target.strong_count() > 0
    }

    /// The referent, if it has not been reclaimed
    pub fn get(&self) -> Option<LoaderRef> {
        self.target.upgrade()
    }
}

impl fmt::Debug for IndirectLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndirectLoader")
            .field("alive", &self.is_alive())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::NamedLoader;

    #[test]
    fn test_reference_expires_with_owner() {
        let loader = NamedLoader::shared("plugin", ["a.B"]);
        let reference = IndirectLoader::new(&loader);
        assert!(reference.is_alive());
        assert!(Arc::ptr_eq(&reference.get().unwrap(), &loader));

        drop(loader);
        assert!(!reference.is_alive());
        assert!(reference.get().is_none());
    }
}
