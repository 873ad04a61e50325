//! Type arena and alias map
//!
//! Discovered types live in an append-only arena and are addressed by
//! `TypeIndex` keys. Cross-references between types are plain name strings
//! resolved through the alias map after the whole dump has been scanned,
//! so forward references cost nothing.

use crate::naming::normalise_type_name;
use indexmap::IndexMap;
use structgen_core::{TypeIndex, TypeInfo};
use tracing::debug;

/// Append-only arena of discovered types, in discovery order.
#[derive(Debug, Default)]
pub struct TypeArena {
    types: Vec<TypeInfo>,
}

impl TypeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, info: TypeInfo) -> TypeIndex {
        let idx = TypeIndex(self.types.len());
        self.types.push(info);
        idx
    }

    pub fn get(&self, idx: TypeIndex) -> &TypeInfo {
        &self.types[idx.as_usize()]
    }

    pub fn get_mut(&mut self, idx: TypeIndex) -> &mut TypeInfo {
        &mut self.types[idx.as_usize()]
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn indices(&self) -> impl Iterator<Item = TypeIndex> {
        (0..self.types.len()).map(TypeIndex)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeIndex, &TypeInfo)> {
        self.types.iter().enumerate().map(|(i, t)| (TypeIndex(i), t))
    }
}

/// Outcome of an alias lookup slot.
///
/// `Ambiguous` is an explicit sentinel: the alias was claimed by two
/// distinct types and must never resolve, which is not the same thing as
/// an alias that was never seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Bound(TypeIndex),
    Ambiguous,
}

/// Maps fully qualified and short type names to arena keys.
#[derive(Debug, Default)]
pub struct AliasMap {
    bindings: IndexMap<String, Binding>,
}

impl AliasMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an alias for a type. A second distinct type claiming an
    /// already-bound alias demotes it to `Ambiguous` instead of silently
    /// overwriting the first binding.
    pub fn add(&mut self, alias: &str, target: TypeIndex) {
        let alias = normalise_type_name(alias);
        match self.bindings.get(&alias) {
            None => {
                self.bindings.insert(alias, Binding::Bound(target));
            }
            Some(Binding::Bound(existing)) if *existing == target => {}
            Some(Binding::Ambiguous) => {}
            Some(Binding::Bound(_)) => {
                debug!("alias {alias} claimed by two types, marking ambiguous");
                self.bindings.insert(alias, Binding::Ambiguous);
            }
        }
    }

    /// Resolve a name to an arena key: exact qualified spelling first,
    /// then the last `.`-segment. Ambiguous slots never resolve.
    pub fn resolve(&self, name: &str) -> Option<TypeIndex> {
        let name = normalise_type_name(name);
        if let Some(Binding::Bound(idx)) = self.bindings.get(&name) {
            return Some(*idx);
        }
        let short = name.rsplit('.').next().unwrap_or(name.as_str());
        match self.bindings.get(short) {
            Some(Binding::Bound(idx)) => Some(*idx),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
