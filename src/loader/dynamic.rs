//! # Dynamic Invocation Facility
//!
//! Name-based view of foreign objects. Module-system objects are published into
//! the attribute store without this crate knowing their types; they describe
//! themselves through [`DynamicObject`] and are matched purely by shape: which
//! interfaces they implement and which methods they expose.

use super::Symbol;
use crate::error::InvocationError;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Shared handle to a dynamically described object
pub type DynObjectRef = Arc<dyn DynamicObject>;

/// Interface node. `extends` lists the directly inherited interfaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDescriptor {
    pub name: String,
    pub extends: Vec<Arc<InterfaceDescriptor>>,
}

impl InterfaceDescriptor {
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            extends: Vec::new(),
        })
    }

    pub fn extending(name: impl Into<String>, extends: Vec<Arc<InterfaceDescriptor>>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            extends,
        })
    }
}

/// Method exposed for dynamic invocation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSignature {
    pub name: String,
    pub arity: usize,
}

impl MethodSignature {
    pub fn new(name: impl Into<String>, arity: usize) -> Self {
        Self {
            name: name.into(),
            arity,
        }
    }
}

/// Value passed to or returned from a dynamic call
#[derive(Clone)]
pub enum DynValue {
    Null,
    Str(String),
    Object(DynObjectRef),
    Symbol(Symbol),
}

impl DynValue {
    /// Short description used in error messages
    pub fn describe(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Str(s) => format!("string {s:?}"),
            Self::Object(obj) => format!("object of type {}", obj.type_name()),
            Self::Symbol(sym) => format!("symbol {}", sym.name),
        }
    }
}

impl fmt::Debug for DynValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Object reachable only by name-based introspection and invocation
pub trait DynamicObject: Send + Sync {
    /// Fully-qualified runtime type name
    fn type_name(&self) -> &str;

    /// Directly implemented interfaces
    fn interfaces(&self) -> Vec<Arc<InterfaceDescriptor>>;

    /// Methods available to [`invoke`](Self::invoke)
    fn methods(&self) -> Vec<MethodSignature>;

    /// Invoke `method` with `args`
    fn invoke(&self, method: &str, args: Vec<DynValue>) -> Result<DynValue, InvocationError>;

    /// Locate a method by name and arity
    fn find_method(&self, name: &str, arity: usize) -> Option<MethodSignature> {
        self.methods()
            .into_iter()
            .find(|m| m.name == name && m.arity == arity)
    }
}

/// Every interface name reachable from `object`, directly or through
/// inheritance, preceded by the object's own type name. Each name appears once.
pub fn transitive_interfaces(object: &dyn DynamicObject) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = vec![object.type_name().to_string()];
    seen.insert(object.type_name().to_string());

    let mut pending: Vec<Arc<InterfaceDescriptor>> = object.interfaces();
    pending.reverse();
    while let Some(iface) = pending.pop() {
        if !seen.insert(iface.name.clone()) {
            continue;
        }
        names.push(iface.name.clone());
        pending.extend(iface.extends.iter().rev().cloned());
    }

    names
}

/// Whether `object` implements `interface` anywhere in its hierarchy
pub fn implements(object: &dyn DynamicObject, interface: &str) -> bool {
    transitive_interfaces(object).iter().any(|n| n == interface)
}
