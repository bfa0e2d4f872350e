//! Specialized collection types
//!
//! Shared scene resources (materials, textures, animations) live in slot map
//! arenas and are referenced by small copyable keys. Each arena also keeps
//! the descriptor id it was registered under so loaders can resolve string
//! references.

use std::collections::HashMap;

pub use slotmap::{Key, SlotMap};

slotmap::new_key_type! {
    /// Handle to a material registered with a scene graph
    pub struct MaterialKey;

    /// Handle to a texture registered with a scene graph
    pub struct TextureKey;

    /// Handle to a keyframe animation registered with a scene graph
    pub struct AnimationKey;
}

/// Id-keyed arena of shared resources
#[derive(Debug, Clone)]
pub struct ResourceTable<K: Key, T> {
    items: SlotMap<K, T>,
    ids: HashMap<String, K>,
}

impl<K: Key, T> ResourceTable<K, T> {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            items: SlotMap::with_key(),
            ids: HashMap::new(),
        }
    }

    /// Register a resource under a descriptor id.
    ///
    /// Returns `None` (and leaves the table untouched) if the id is taken.
    pub fn try_insert(&mut self, id: impl Into<String>, value: T) -> Option<K> {
        let id = id.into();
        if self.ids.contains_key(&id) {
            return None;
        }
        let key = self.items.insert(value);
        self.ids.insert(id, key);
        Some(key)
    }

    /// Register a resource that has no descriptor id (e.g. a fallback)
    pub fn insert_anonymous(&mut self, value: T) -> K {
        self.items.insert(value)
    }

    /// Look up the key registered for a descriptor id
    pub fn key_of(&self, id: &str) -> Option<K> {
        self.ids.get(id).copied()
    }

    /// Get a resource by key
    pub fn get(&self, key: K) -> Option<&T> {
        self.items.get(key)
    }

    /// Get a mutable resource by key
    pub fn get_mut(&mut self, key: K) -> Option<&mut T> {
        self.items.get_mut(key)
    }

    /// Get a resource by descriptor id
    pub fn get_by_id(&self, id: &str) -> Option<&T> {
        self.key_of(id).and_then(|key| self.items.get(key))
    }

    /// Iterate mutably over all resources
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.values_mut()
    }

    /// Number of registered resources, anonymous ones included
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<K: Key, T> Default for ResourceTable<K, T> {
    fn default() -> Self {
        Self::new()
    }
}
