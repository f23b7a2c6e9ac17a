//! # Module-System Shape Constants
//!
//! The resolver has no compile-time dependency on the module system. It only
//! knows the shape below: one interface name and two method names, matched at
//! the moment an attribute value is observed.

/// Fully-qualified name of the interface that marks a module context object
pub const MODULE_CONTEXT_INTERFACE: &str = "org.osgi.framework.BundleContext";

/// Default attribute key under which the module context is published
pub const DEFAULT_ATTRIBUTE_NAME: &str = MODULE_CONTEXT_INTERFACE;

/// Zero-argument accessor on the context object returning the module object
pub const MODULE_ACCESSOR: &str = "getBundle";

/// One-argument, name-based symbol loading method on the module object
pub const SYMBOL_LOADER_METHOD: &str = "loadClass";

/// Operation names used in structured resolver logs
pub mod operations {
    pub const GET_LOADERS: &str = "get_loaders";
    pub const INVALIDATE: &str = "invalidate";
    pub const ADAPT: &str = "adapt";
    pub const INITIALIZE: &str = "initialize";
}
