//! Name-keyed type registry backed by an arena.
//!
//! The registry owns the canonical node for every registered name. Other
//! parts of the IR refer to those nodes by [`TypeId`] or by name and never
//! hold them directly.

use crate::types::Type;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Stable index of a registry slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct TypeId(u32);

impl TypeId {
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn to_raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Debug for TypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeRegistry {
    nodes: Vec<Type>,
    by_name: HashMap<String, TypeId>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `ty` under `name`. Re-registering a name replaces the node in
    /// its existing slot, so ids already handed out stay valid.
    pub fn register(&mut self, name: &str, ty: Type) -> TypeId {
        if let Some(&id) = self.by_name.get(name) {
            self.nodes[id.0 as usize] = ty;
            return id;
        }
        let id = TypeId(self.nodes.len() as u32);
        self.nodes.push(ty);
        self.by_name.insert(name.to_string(), id);
        id
    }

    pub fn id_of(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    pub fn find(&self, name: &str) -> Option<&Type> {
        self.id_of(name).and_then(|id| self.get(id))
    }

    pub fn get(&self, id: TypeId) -> Option<&Type> {
        self.nodes.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Registered nodes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &Type)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, t)| (TypeId(i as u32), t))
    }
}
