//! # Module Loader Adapter
//!
//! The only place that performs dynamic invocation. A module-context object is
//! asked for its module through the accessor named [`MODULE_ACCESSOR`]; the
//! returned module must expose [`SYMBOL_LOADER_METHOD`] taking one argument.
//! Symbol resolution then delegates to that method by name.

use super::dynamic::{DynObjectRef, DynValue};
use super::{Symbol, SymbolLoader};
use crate::constants::{MODULE_ACCESSOR, SYMBOL_LOADER_METHOD};
use crate::error::{AdaptError, InvocationError, SymbolNotFound};
use std::fmt;
use tracing::debug;

/// [`SymbolLoader`] that forwards to a module's name-based loading method
pub struct ModuleLoaderAdapter {
    module: DynObjectRef,
    name: String,
}

impl ModuleLoaderAdapter {
    /// Obtain the module from `context` and verify it can load symbols.
    pub fn from_context(context: &DynObjectRef) -> Result<Self, AdaptError> {
        if context.find_method(MODULE_ACCESSOR, 0).is_none() {
            return Err(AdaptError::MethodNotFound {
                type_name: context.type_name().to_string(),
                method: MODULE_ACCESSOR.to_string(),
                arity: 0,
            });
        }

        let module = match context.invoke(MODULE_ACCESSOR, Vec::new())? {
            DynValue::Object(module) => module,
            other => {
                return Err(InvocationError::UnexpectedReturn {
                    method: MODULE_ACCESSOR.to_string(),
                    found: other.describe(),
                }
                .into())
            }
        };

        Self::from_module(module)
    }

    /// Wrap a module object directly.
    pub fn from_module(module: DynObjectRef) -> Result<Self, AdaptError> {
        if module.find_method(SYMBOL_LOADER_METHOD, 1).is_none() {
            return Err(AdaptError::MethodNotFound {
                type_name: module.type_name().to_string(),
                method: SYMBOL_LOADER_METHOD.to_string(),
                arity: 1,
            });
        }

        let name = format!("module:{}", module.type_name());
        debug!(module = %module.type_name(), "Adapted module object into loader");
        Ok(Self { module, name })
    }
}

impl SymbolLoader for ModuleLoaderAdapter {
    fn resolve_symbol(&self, name: &str) -> Result<Symbol, SymbolNotFound> {
        match self
            .module
            .invoke(SYMBOL_LOADER_METHOD, vec![DynValue::Str(name.to_string())])
        {
            Ok(DynValue::Symbol(symbol)) => Ok(symbol),
            Ok(other) => Err(SymbolNotFound::with_cause(
                name,
                InvocationError::UnexpectedReturn {
                    method: SYMBOL_LOADER_METHOD.to_string(),
                    found: other.describe(),
                },
            )),
            Err(e) => Err(SymbolNotFound::with_cause(name, e)),
        }
    }

    fn loader_name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for ModuleLoaderAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleLoaderAdapter")
            .field("module", &self.module.type_name())
            .finish()
    }
}
