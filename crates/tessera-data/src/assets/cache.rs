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

//! A typed, weak-reference cache of live resource instances.

use ahash::AHashMap;
use log::trace;
use std::sync::{PoisonError, RwLock};
use tessera_core::asset::{
    AssetHandle, AssetId, Material, Mesh, Resource, Script, Shader, Texture, WeakAssetHandle,
    World,
};

/// Maps an [`AssetId`] to a weak view of a live instance of `T`.
///
/// The cache never extends the lifetime of what it stores. An entry whose
/// referent has been dropped is "expired": [`find`](Self::find) treats it as
/// absent, but it stays in the map until [`remove_unused`](Self::remove_unused)
/// or [`clear`](Self::clear) runs.
///
/// Every operation is individually thread-safe.
pub struct ResourceCache<T: Resource> {
    entries: RwLock<AHashMap<AssetId, WeakAssetHandle<T>>>,
}

impl<T: Resource> Default for ResourceCache<T> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(AHashMap::new()),
        }
    }
}

impl<T: Resource> ResourceCache<T> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves the entry for `id`, if present and still alive.
    pub fn find(&self, id: &AssetId) -> Option<AssetHandle<T>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let handle = entries.get(id)?.upgrade();
        if handle.is_none() {
            trace!("Cache entry {} is expired", id);
        }
        handle
    }

    /// Stores a weak view of `handle` under `id`, replacing any previous entry.
    pub fn put(&self, id: AssetId, handle: &AssetHandle<T>) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, handle.downgrade());
    }

    /// Forgets the entry for `id`. Returns `true` if one was present.
    pub fn remove(&self, id: &AssetId) -> bool {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
            .is_some()
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn remove_unused(&self) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|_, weak| !weak.is_expired());
        before - entries.len()
    }

    /// Forgets every entry. Live instances are not affected.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if the cache has no entries at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One [`ResourceCache`] per resource kind.
#[derive(Default)]
pub struct ResourceCaches {
    materials: ResourceCache<Material>,
    meshes: ResourceCache<Mesh>,
    textures: ResourceCache<Texture>,
    shaders: ResourceCache<Shader>,
    scripts: ResourceCache<Script>,
    worlds: ResourceCache<World>,
}

impl ResourceCaches {
    /// Creates a set of empty caches.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cache for resources of type `T`.
    pub fn get<T: CachedResource>(&self) -> &ResourceCache<T> {
        T::cache(self)
    }

    /// Forgets `id` in every cache.
    pub fn remove_everywhere(&self, id: &AssetId) {
        self.materials.remove(id);
        self.meshes.remove(id);
        self.textures.remove(id);
        self.shaders.remove(id);
        self.scripts.remove(id);
        self.worlds.remove(id);
    }

    /// Drops expired entries from every cache. Returns the total removed.
    pub fn remove_unused(&self) -> usize {
        self.materials.remove_unused()
            + self.meshes.remove_unused()
            + self.textures.remove_unused()
            + self.shaders.remove_unused()
            + self.scripts.remove_unused()
            + self.worlds.remove_unused()
    }

    /// Clears every cache.
    pub fn clear(&self) {
        self.materials.clear();
        self.meshes.clear();
        self.textures.clear();
        self.shaders.clear();
        self.scripts.clear();
        self.worlds.clear();
    }
}

/// A [`Resource`] that has a dedicated cache in [`ResourceCaches`].
pub trait CachedResource: Resource {
    /// Selects this type's cache.
    fn cache(caches: &ResourceCaches) -> &ResourceCache<Self>;
}

macro_rules! cached_resource {
    ($($ty:ty => $field:ident),* $(,)?) => {
        $(
            impl CachedResource for $ty {
                fn cache(caches: &ResourceCaches) -> &ResourceCache<Self> {
                    &caches.$field
                }
            }
        )*
    };
}

cached_resource! {
    Material => materials,
    Mesh => meshes,
    Texture => textures,
    Shader => shaders,
    Script => scripts,
    World => worlds,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(src: &str) -> AssetHandle<Script> {
        AssetHandle::new(Script::new(src, "a.luabin"))
    }

    #[test]
    fn test_find_resolves_live_entry() {
        let cache = ResourceCache::<Script>::new();
        let id = AssetId::new("Scripts/a.lua");
        let handle = script("x");

        cache.put(id, &handle);
        let found = cache.find(&id).unwrap();
        assert!(AssetHandle::ptr_eq(&handle, &found));
        assert!(cache.find(&AssetId::new("Scripts/other.lua")).is_none());
    }

    #[test]
    fn test_expired_entry_is_absent_until_removed() {
        let cache = ResourceCache::<Script>::new();
        let id = AssetId::new("Scripts/a.lua");
        let handle = script("x");
        cache.put(id, &handle);

        drop(handle);
        assert!(cache.find(&id).is_none());
        assert_eq!(cache.len(), 1);

        assert_eq!(cache.remove_unused(), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear_does_not_destroy_referents() {
        let cache = ResourceCache::<Script>::new();
        let id = AssetId::new("Scripts/a.lua");
        let handle = script("keep");
        cache.put(id, &handle);

        cache.clear();
        assert!(cache.find(&id).is_none());
        assert_eq!(handle.source, "keep");
    }

    #[test]
    fn test_caches_are_separate_per_type() {
        let caches = ResourceCaches::new();
        let id = AssetId::new("shared");
        let handle = script("x");
        caches.get::<Script>().put(id, &handle);

        assert!(caches.get::<Script>().find(&id).is_some());
        assert!(caches.get::<World>().find(&id).is_none());

        caches.remove_everywhere(&id);
        assert!(caches.get::<Script>().find(&id).is_none());
    }
}
