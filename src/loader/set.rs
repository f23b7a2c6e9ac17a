//! Ordered, duplicate-free loader sequence.

use super::{identity, LoaderRef, Symbol};
use crate::error::SymbolNotFound;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Ordered set of loaders, unique by identity, first occurrence wins.
///
/// Cloning is cheap; clones share the same backing slice.
#[derive(Clone)]
pub struct LoaderSet {
    loaders: Arc<[LoaderRef]>,
}

impl LoaderSet {
    /// Empty set
    pub fn empty() -> Self {
        Self {
            loaders: Arc::from(Vec::new()),
        }
    }

    /// Merge `base` followed by every present entry of `extras`, dropping
    /// repeated identities.
    pub fn merge<I>(base: Vec<LoaderRef>, extras: I) -> Self
    where
        I: IntoIterator<Item = Option<LoaderRef>>,
    {
        let mut seen = HashSet::new();
        let mut merged = Vec::with_capacity(base.len() + 2);

        for loader in base.into_iter().map(Some).chain(extras).flatten() {
            if seen.insert(identity(&loader)) {
                merged.push(loader);
            }
        }

        Self {
            loaders: Arc::from(merged),
        }
    }

    /// Dedupe an already-ordered list
    pub fn from_loaders(loaders: Vec<LoaderRef>) -> Self {
        Self::merge(loaders, std::iter::empty::<Option<LoaderRef>>())
    }

    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LoaderRef> {
        self.loaders.iter()
    }

    pub fn get(&self, index: usize) -> Option<&LoaderRef> {
        self.loaders.get(index)
    }

    /// Whether `loader` (by identity) is a member
    pub fn contains(&self, loader: &LoaderRef) -> bool {
        let id = identity(loader);
        self.loaders.iter().any(|l| identity(l) == id)
    }

    /// Same members in the same order
    pub fn same_members(&self, other: &LoaderSet) -> bool {
        self.len() == other.len()
            && self
                .loaders
                .iter()
                .zip(other.loaders.iter())
                .all(|(a, b)| identity(a) == identity(b))
    }

    /// Whether both values share one backing allocation, i.e. one came from
    /// cloning the other.
    pub fn ptr_eq(&self, other: &LoaderSet) -> bool {
        Arc::ptr_eq(&self.loaders, &other.loaders)
    }

    /// Resolve `name` through the loaders in order; the first hit wins.
    pub fn resolve_symbol(&self, name: &str) -> Result<Symbol, SymbolNotFound> {
        self.loaders
            .iter()
            .find_map(|loader| loader.resolve_symbol(name).ok())
            .ok_or_else(|| SymbolNotFound::new(name))
    }

    /// Loader names in order, for logging
    pub fn names(&self) -> Vec<String> {
        self.loaders
            .iter()
            .map(|l| l.loader_name().to_string())
            .collect()
    }
}

impl Default for LoaderSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for LoaderSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl<'a> IntoIterator for &'a LoaderSet {
    type Item = &'a LoaderRef;
    type IntoIter = std::slice::Iter<'a, LoaderRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.loaders.iter()
    }
}
