//! # Loader Abstraction
//!
//! Uniform symbol-loading capability shared by every loader the resolver hands
//! out, regardless of where it came from.
//!
//! ## Overview
//!
//! A [`SymbolLoader`] resolves a symbol name (for example a type name carried in
//! replicated session data) to a [`Symbol`]. The resolver collects loaders from
//! three places and exposes them as one ordered [`LoaderSet`]:
//!
//! ```text
//! LoaderSet
//! ├── static loaders          (supplied by the host)
//! ├── adapted dynamic loader  (from the watched attribute, if any)
//! └── container loader        (the context's own loader)
//! ```
//!
//! Raw attribute values are turned into loaders by [`adapt`], which recognizes
//! native loaders, [`IndirectLoader`] references and module-context objects
//! reached through the [`DynamicObject`] facility.

pub mod adapt;
pub mod dynamic;
pub mod indirect;
pub mod module;
pub mod set;

pub use adapt::adapt;
pub use dynamic::{
    transitive_interfaces, DynObjectRef, DynValue, DynamicObject, InterfaceDescriptor,
    MethodSignature,
};
pub use indirect::IndirectLoader;
pub use module::ModuleLoaderAdapter;
pub use set::LoaderSet;

use crate::error::SymbolNotFound;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Resolved code handle returned by a loader
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    pub name: String,
    /// Name of the loader that defined the symbol
    pub origin: String,
}

impl Symbol {
    pub fn new(name: impl Into<String>, origin: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            origin: origin.into(),
        }
    }
}

/// Capability to resolve a symbol name to code
pub trait SymbolLoader: Send + Sync {
    /// Resolve `name`, or report that this loader does not know it
    fn resolve_symbol(&self, name: &str) -> Result<Symbol, SymbolNotFound>;

    /// Human-readable name used in logs
    fn loader_name(&self) -> &str {
        "unnamed_loader"
    }
}

impl fmt::Debug for dyn SymbolLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SymbolLoader").field(&self.loader_name()).finish()
    }
}

/// Shared loader handle. Identity is the address of the shared allocation.
pub type LoaderRef = Arc<dyn SymbolLoader>;

/// Identity key of a loader, used for dedupe
pub(crate) fn identity(loader: &LoaderRef) -> *const () {
    Arc::as_ptr(loader) as *const ()
}

/// Loader backed by a fixed set of symbol names
pub struct NamedLoader {
    name: String,
    symbols: HashSet<String>,
}

impl NamedLoader {
    pub fn new<I, S>(name: impl Into<String>, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            symbols: symbols.into_iter().map(Into::into).collect(),
        }
    }

    /// Convenience constructor returning a shared [`LoaderRef`]
    pub fn shared<I, S>(name: impl Into<String>, symbols: I) -> LoaderRef
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Arc::new(Self::new(name, symbols))
    }
}

impl SymbolLoader for NamedLoader {
    fn resolve_symbol(&self, name: &str) -> Result<Symbol, SymbolNotFound> {
        if self.symbols.contains(name) {
            Ok(Symbol::new(name, self.name.clone()))
        } else {
            Err(SymbolNotFound::new(name))
        }
    }

    fn loader_name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for NamedLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedLoader")
            .field("name", &self.name)
            .field("symbols", &self.symbols.len())
            .finish()
    }
}
