//! Raw attribute value → [`LoaderRef`].
//!
//! Shapes are tried in order:
//! 1. a native loader (`LoaderRef`)
//! 2. an [`IndirectLoader`] whose referent is still alive
//! 3. a [`DynamicObject`](super::DynamicObject) implementing
//!    [`MODULE_CONTEXT_INTERFACE`] somewhere in its interface hierarchy
//!
//! Anything else is [`AdaptError::Unrecognized`].

use super::dynamic::{implements, DynObjectRef};
use super::{IndirectLoader, LoaderRef, ModuleLoaderAdapter};
use crate::constants::MODULE_CONTEXT_INTERFACE;
use crate::context::AttributeValue;
use crate::error::AdaptError;
use std::sync::Arc;

pub fn adapt(value: &AttributeValue) -> Result<LoaderRef, AdaptError> {
    if let Some(loader) = value.downcast_ref::<LoaderRef>() {
        return Ok(loader.clone());
    }

    if let Some(reference) = value.downcast_ref::<IndirectLoader>() {
        return reference.get().ok_or(AdaptError::Reclaimed);
    }

    if let Some(object) = value.downcast_ref::<DynObjectRef>() {
        if implements(object.as_ref(), MODULE_CONTEXT_INTERFACE) {
            let adapter = ModuleLoaderAdapter::from_context(object)?;
            return Ok(Arc::new(adapter));
        }
        return Err(AdaptError::Unrecognized {
            type_name: object.type_name().to_string(),
        });
    }

    Err(AdaptError::Unrecognized {
        type_name: value.type_name().to_string(),
    })
}
