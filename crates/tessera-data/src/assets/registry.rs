// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The strong-owning, type-erased store of loaded resources.

use ahash::AHashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tessera_core::asset::{AnyResource, AssetHandle, AssetId, Resource};

/// Keeps loaded resources alive, keyed by id.
///
/// The registry is the single long-term owner of every loaded resource.
/// Removing an entry drops the engine's hold on it; consumers that still hold
/// an [`AssetHandle`] keep their instance.
///
/// All operations take the internal lock for their whole duration and may be
/// called from any thread.
#[derive(Default)]
pub struct ResourceRegistry {
    entries: RwLock<AHashMap<AssetId, AnyResource>>,
}

impl ResourceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `resource` under `id`. The last write wins; the previous entry,
    /// if any, is returned.
    pub fn register_resource(&self, id: AssetId, resource: AnyResource) -> Option<AnyResource> {
        self.write().insert(id, resource)
    }

    /// Typed convenience over [`register_resource`](Self::register_resource).
    pub fn register<T: Resource>(&self, id: AssetId, handle: AssetHandle<T>) {
        self.register_resource(id, T::into_any(handle));
    }

    /// Returns the resource stored under `id`.
    pub fn get(&self, id: &AssetId) -> Option<AnyResource> {
        self.read().get(id).cloned()
    }

    /// Returns the resource stored under `id` if it is a `T`.
    pub fn get_typed<T: Resource>(&self, id: &AssetId) -> Option<AssetHandle<T>> {
        self.read().get(id).and_then(T::from_any)
    }

    /// Returns `true` if `id` is registered.
    pub fn contains(&self, id: &AssetId) -> bool {
        self.read().contains_key(id)
    }

    /// Drops the entry for `id`. Returns `true` if one was present.
    pub fn unregister(&self, id: &AssetId) -> bool {
        self.write().remove(id).is_some()
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Number of registered resources.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> RwLockReadGuard<'_, AHashMap<AssetId, AnyResource>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, AHashMap<AssetId, AnyResource>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::asset::{Script, World};

    #[test]
    fn test_register_overwrites() {
        let registry = ResourceRegistry::new();
        let id = AssetId::new("Worlds/main.lworld");
        let first = AssetHandle::new(World::new("{}", "a"));
        let second = AssetHandle::new(World::new("{\"v\":2}", "b"));

        registry.register(id, first.clone());
        registry.register(id, second.clone());

        assert_eq!(registry.len(), 1);
        let stored = registry.get_typed::<World>(&id).unwrap();
        assert!(AssetHandle::ptr_eq(&stored, &second));
        assert_eq!(AssetHandle::strong_count(&first), 1);
    }

    #[test]
    fn test_get_typed_rejects_other_kind() {
        let registry = ResourceRegistry::new();
        let id = AssetId::new("Scripts/a.lua");
        registry.register(id, AssetHandle::new(Script::new("", "a")));

        assert!(registry.get_typed::<World>(&id).is_none());
        assert!(registry.get_typed::<Script>(&id).is_some());
    }

    #[test]
    fn test_unregister_keeps_external_handle() {
        let registry = ResourceRegistry::new();
        let id = AssetId::new("Scripts/a.lua");
        let handle = AssetHandle::new(Script::new("print(1)", "a"));
        registry.register(id, handle.clone());

        assert!(registry.unregister(&id));
        assert!(!registry.unregister(&id));
        assert!(registry.is_empty());
        assert_eq!(handle.source, "print(1)");
    }
}
