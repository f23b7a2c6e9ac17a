//! # Error Types
//!
//! Errors raised along the loader-resolution path. None of these ever escape
//! [`LoaderResolver::get_loaders`](crate::resolver::LoaderResolver::get_loaders);
//! they are logged at the adaptation boundary and the handle is treated as absent.

use thiserror::Error;

pub use crate::config::ConfigurationError;

/// Failure to turn a raw attribute value into a [`SymbolLoader`](crate::loader::SymbolLoader)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdaptError {
    /// The value is none of the recognized handle shapes
    #[error("expected a module context, an indirect loader reference or a loader instance, but was {type_name}")]
    Unrecognized { type_name: String },

    /// An indirect reference whose referent has already been dropped
    #[error("indirect loader reference has been reclaimed")]
    Reclaimed,

    /// A method required by the module-context shape is not exposed
    #[error("{type_name} does not expose {method}/{arity}")]
    MethodNotFound {
        type_name: String,
        method: String,
        arity: usize,
    },

    /// The dynamic call itself failed or returned an unexpected value
    #[error("dynamic invocation failed: {0}")]
    Invocation(#[from] InvocationError),
}

/// Error raised by [`DynamicObject::invoke`](crate::loader::DynamicObject::invoke)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvocationError {
    #[error("no method {method} on {type_name}")]
    NoSuchMethod { type_name: String, method: String },

    #[error("{method} expects {expected} argument(s), got {actual}")]
    ArityMismatch {
        method: String,
        expected: usize,
        actual: usize,
    },

    #[error("{method} returned an unexpected value: {found}")]
    UnexpectedReturn { method: String, found: String },

    #[error("{method} raised: {message}")]
    Raised { method: String, message: String },
}

/// A loader could not resolve the requested symbol
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("symbol '{name}' not found{}", cause.as_ref().map(|c| format!(": {c}")).unwrap_or_default())]
pub struct SymbolNotFound {
    pub name: String,
    pub cause: Option<String>,
}

impl SymbolNotFound {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cause: None,
        }
    }

    pub fn with_cause(name: impl Into<String>, cause: impl ToString) -> Self {
        Self {
            name: name.into(),
            cause: Some(cause.to_string()),
        }
    }
}

/// Lifecycle errors of the [`ReplicationManager`](crate::manager::ReplicationManager)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManagerError {
    #[error("replication manager is already started")]
    AlreadyStarted,

    #[error("replication manager has no container")]
    MissingContainer,

    #[error("container '{container}' does not provide an attribute context")]
    MissingContext { container: String },
}

pub type Result<T> = std::result::Result<T, ManagerError>;
