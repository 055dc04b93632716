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

//! The runtime façade: typed, deduplicated loading of imported resources.

use crate::artifact::ArtifactLoad;
use crate::config::ResourceConfig;
use crate::database::AssetDatabase;
use crate::error::WriteError;
use crate::fs::{extension_of, generic_string, relative_to, FileStamp};
use crate::pak::PakReader;
use crate::writer::{AssetWriter, WriterContext, WriterHub};
use ahash::AHashMap;
use log::{debug, error, info, trace, warn};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tessera_core::asset::{
    AnyResource, AssetHandle, AssetId, AssetInfo, AssetOrigin, AssetType, Resource,
};
use tessera_data::assets::{CachedResource, ResourceCaches, ResourceRegistry};

/// Options for [`ResourceManager::save`], [`ResourceManager::save_as`] and
/// [`ResourceManager::save_resource_as`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveParams {
    /// Write here instead of the record's imported path. Relative paths are
    /// taken under the project resource root.
    pub target_path_override: Option<PathBuf>,
    /// Record this as the source path instead of the derived one.
    pub source_path_override: Option<String>,
    /// Id of the new record for `save_as`. A random id is used otherwise.
    pub explicit_guid: Option<AssetId>,
    /// Origin of the written record.
    pub origin_override: Option<AssetOrigin>,
    /// Refresh the database record after writing.
    pub update_database: bool,
    /// Create missing parent directories of the target.
    pub create_directories: bool,
}

impl Default for SaveParams {
    fn default() -> Self {
        Self {
            target_path_override: None,
            source_path_override: None,
            explicit_guid: None,
            origin_override: None,
            update_database: true,
            create_directories: true,
        }
    }
}

/// Loads resources by id or source path, sharing live instances.
///
/// The manager combines the three pieces of the resource runtime: the
/// [`AssetDatabase`] says where an artifact is, the [`ResourceRegistry`] owns
/// every loaded instance, and the per-type [`ResourceCaches`] deduplicate
/// lookups without owning anything.
///
/// Concurrent loads of the same id construct the resource once: the miss path
/// is serialized per id and re-checks the cache after acquiring it.
///
/// With a pak mounted, artifacts packed in it are read from the archive and
/// everything else from the cache directory. The database record is needed
/// either way.
pub struct ResourceManager {
    database: Arc<AssetDatabase>,
    engine_resources_root: PathBuf,
    project_resources_root: PathBuf,
    cache_root: PathBuf,
    caches: ResourceCaches,
    registry: ResourceRegistry,
    in_flight: Mutex<AHashMap<AssetId, Arc<Mutex<()>>>>,
    writers: WriterHub,
    pak: RwLock<Option<Arc<PakReader>>>,
}

impl ResourceManager {
    /// Creates a manager reading `database`, resolving artifacts with the
    /// roots of `config`, and saving through the built-in writers.
    pub fn new(database: Arc<AssetDatabase>, config: &ResourceConfig) -> Self {
        Self {
            database,
            engine_resources_root: config.engine_resources_root.clone(),
            project_resources_root: config.project_resources_root.clone(),
            cache_root: config.cache_root.clone(),
            caches: ResourceCaches::new(),
            registry: ResourceRegistry::new(),
            in_flight: Mutex::new(AHashMap::new()),
            writers: WriterHub::with_defaults(),
            pak: RwLock::new(None),
        }
    }

    /// Replaces the writers used by [`save`](Self::save) and
    /// [`save_as`](Self::save_as).
    pub fn set_writers(&mut self, writers: WriterHub) {
        self.writers = writers;
    }

    /// The database resources are resolved through.
    pub fn database(&self) -> &Arc<AssetDatabase> {
        &self.database
    }

    /// The owning registry.
    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// The per-type weak caches.
    pub fn caches(&self) -> &ResourceCaches {
        &self.caches
    }

    /// Opens the pak at `path` and reads packed artifacts from it from now on,
    /// replacing any pak mounted before.
    ///
    /// On failure nothing stays mounted and `false` is returned.
    pub fn mount_pak(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        let mounted = match PakReader::open(path) {
            Ok(pak) => {
                info!("Mounted pak '{}' ({} entries)", path.display(), pak.len());
                Some(Arc::new(pak))
            }
            Err(e) => {
                warn!("Cannot mount pak '{}': {}", path.display(), e);
                None
            }
        };
        let ok = mounted.is_some();
        *self.pak.write().unwrap_or_else(PoisonError::into_inner) = mounted;
        ok
    }

    /// Stops reading from the mounted pak, if any.
    pub fn unmount_pak(&self) {
        if self.pak.write().unwrap_or_else(PoisonError::into_inner).take().is_some() {
            info!("Unmounted pak");
        }
    }

    /// Returns `true` if a pak is mounted.
    pub fn is_pak_mounted(&self) -> bool {
        self.mounted_pak().is_some()
    }

    fn mounted_pak(&self) -> Option<Arc<PakReader>> {
        self.pak.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Loads the resource `id` as a `T`.
    ///
    /// Returns `None` for the empty id, for an id unknown to the database,
    /// for a record of another kind, or if the artifact cannot be decoded.
    pub fn load<T>(&self, id: AssetId) -> Option<AssetHandle<T>>
    where
        T: CachedResource + ArtifactLoad,
    {
        if id.is_empty() {
            return None;
        }

        let cache = self.caches.get::<T>();
        if let Some(handle) = cache.find(&id) {
            trace!("Cache hit for {}", id);
            return Some(handle);
        }

        let slot = self.acquire_slot(id);
        let result = {
            let _guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
            match cache.find(&id) {
                Some(handle) => Some(handle),
                None => self.construct::<T>(id),
            }
        };
        self.release_slot(id, slot);
        result
    }

    /// Loads the resource whose source path is `source` as a `T`.
    pub fn load_by_source<T>(&self, source: &str) -> Option<AssetHandle<T>>
    where
        T: CachedResource + ArtifactLoad,
    {
        match self.database.find_by_source(source) {
            Some(info) => self.load(info.guid),
            None => {
                warn!("No asset record for source '{}'", source);
                None
            }
        }
    }

    /// The currently loaded resource for `id`, of any kind.
    pub fn get_loaded(&self, id: &AssetId) -> Option<AnyResource> {
        self.registry.get(id)
    }

    /// Number of loaded resources.
    pub fn loaded_count(&self) -> usize {
        self.registry.len()
    }

    /// Releases the engine's hold on `id`.
    ///
    /// Handles held elsewhere stay valid, but the next [`load`](Self::load)
    /// constructs a new instance. Returns `true` if `id` was loaded.
    pub fn unload(&self, id: &AssetId) -> bool {
        let was_loaded = self.registry.unregister(id);
        self.caches.remove_everywhere(id);
        if was_loaded {
            debug!("Unloaded {}", id);
        }
        was_loaded
    }

    /// Drops every loaded resource and forgets every cache entry.
    ///
    /// Handles still held by callers outlive this call, so they should be
    /// dropped first.
    pub fn clear_all(&self) {
        self.registry.clear();
        self.caches.remove_unused();
        self.caches.clear();
        info!("Cleared all loaded resources");
    }

    /// Drops expired entries from every cache. Returns how many were removed.
    pub fn cleanup_expired_cache_entries(&self) -> usize {
        let removed = self.caches.remove_unused();
        if removed > 0 {
            debug!("Removed {} expired cache entries", removed);
        }
        removed
    }

    /// Writes the loaded resource `id` back to its imported path, or to
    /// `params.target_path_override`, and refreshes its record.
    pub fn save(&self, id: &AssetId, params: &SaveParams) -> bool {
        let result = self.try_save(id, params);
        if let Err(e) = &result {
            error!("Failed to save {}: {}", id, e);
        }
        result.is_ok()
    }

    /// Writes the loaded resource `id` to `target` as a new asset and returns
    /// the new record's id.
    ///
    /// A relative `target` is taken under the project resource root.
    pub fn save_as(
        &self,
        id: &AssetId,
        target: impl AsRef<Path>,
        params: &SaveParams,
    ) -> Option<AssetId> {
        let target = target.as_ref();
        let result = self
            .registry
            .get(id)
            .ok_or(WriteError::NotLoaded(*id))
            .and_then(|resource| self.try_save_as(&resource, target, params));
        match result {
            Ok(new_id) => Some(new_id),
            Err(e) => {
                error!("Failed to save {} as '{}': {}", id, target.display(), e);
                None
            }
        }
    }

    /// Writes `resource` to `target` as a new asset and returns the new
    /// record's id. The resource need not be loaded through this manager.
    pub fn save_resource_as(
        &self,
        resource: &AnyResource,
        target: impl AsRef<Path>,
        params: &SaveParams,
    ) -> Option<AssetId> {
        let target = target.as_ref();
        match self.try_save_as(resource, target, params) {
            Ok(new_id) => Some(new_id),
            Err(e) => {
                error!(
                    "Failed to save {:?} resource as '{}': {}",
                    resource.asset_type(),
                    target.display(),
                    e
                );
                None
            }
        }
    }

    fn construct<T>(&self, id: AssetId) -> Option<AssetHandle<T>>
    where
        T: CachedResource + ArtifactLoad,
    {
        let Some(info) = self.database.get(&id) else {
            warn!("No asset record for {}", id);
            return None;
        };
        if info.asset_type != T::ASSET_TYPE && info.asset_type != AssetType::Unknown {
            warn!(
                "Asset {} is a {:?}, not a {:?}",
                id,
                info.asset_type,
                T::ASSET_TYPE
            );
            return None;
        }

        let (resource, from) = match self.mounted_pak().filter(|pak| pak.contains(&id)) {
            Some(pak) => Self::decode_packed::<T>(&pak, &id)?,
            None => self.decode_cached::<T>(&info)?,
        };
        if !resource.is_valid() {
            warn!("Loaded {} from {} but it is not valid", id, from);
        }
        let handle = AssetHandle::new(resource);
        self.registry.register(id, handle.clone());
        self.caches.get::<T>().put(id, &handle);
        info!("Loaded {:?} {} from {}", T::ASSET_TYPE, id, from);
        Some(handle)
    }

    fn decode_cached<T: ArtifactLoad>(&self, info: &AssetInfo) -> Option<(T, String)> {
        let Some(path) = self.resolve_imported(info) else {
            warn!("Asset {} has no imported artifact", info.guid);
            return None;
        };
        match T::load_artifact(&path) {
            Ok(resource) => Some((resource, format!("'{}'", path.display()))),
            Err(e) => {
                error!("Failed to load {}: {}", info.guid, e);
                None
            }
        }
    }

    fn decode_packed<T: ArtifactLoad>(pak: &PakReader, id: &AssetId) -> Option<(T, String)> {
        let entry = pak.entry(id)?;
        let bytes = match pak.read(id) {
            Ok(bytes) if !bytes.is_empty() => bytes,
            Ok(_) => {
                error!("Failed to load {}: empty entry in '{}'", id, pak.path().display());
                return None;
            }
            Err(e) => {
                error!("Failed to load {}: {}", id, e);
                return None;
            }
        };
        match T::decode_artifact(&bytes, Path::new(&entry.path)) {
            Ok(resource) => Some((
                resource,
                format!("'{}' in pak '{}'", entry.path, pak.path().display()),
            )),
            Err(e) => {
                error!("Failed to load {}: {}", id, e);
                None
            }
        }
    }

    /// Resolves a record's imported path: absolute paths as-is, relative ones
    /// against the cache root, then the resource root of the record's origin,
    /// then the other resource root.
    fn resolve_imported(&self, info: &AssetInfo) -> Option<PathBuf> {
        if info.imported_path.is_empty() {
            return None;
        }
        let imported = Path::new(&info.imported_path);
        if imported.is_absolute() {
            return Some(imported.to_path_buf());
        }

        let (own, other) = match info.origin {
            AssetOrigin::Project => (&self.project_resources_root, &self.engine_resources_root),
            AssetOrigin::Engine => (&self.engine_resources_root, &self.project_resources_root),
        };
        let candidates = [&self.cache_root, own, other].map(|root| root.join(imported));
        let fallback = candidates[0].clone();
        Some(
            candidates
                .into_iter()
                .find(|candidate| candidate.exists())
                .unwrap_or(fallback),
        )
    }

    fn acquire_slot(&self, id: AssetId) -> Arc<Mutex<()>> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(in_flight.entry(id).or_default())
    }

    fn release_slot(&self, id: AssetId, slot: Arc<Mutex<()>>) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        // Only the map and this caller hold the slot: nobody else is waiting.
        if Arc::strong_count(&slot) == 2 {
            in_flight.remove(&id);
        }
    }

    fn writer_for(
        &self,
        resource: &AnyResource,
        target: &Path,
    ) -> Result<&Arc<dyn AssetWriter>, WriteError> {
        let asset_type = resource.asset_type();
        extension_of(target)
            .and_then(|ext| self.writers.find_by_extension(&ext))
            .filter(|w| w.asset_type() == asset_type)
            .or_else(|| self.writers.find_by_type(asset_type))
            .ok_or(WriteError::NoWriter(asset_type))
    }

    fn writer_context(&self, params: &SaveParams) -> WriterContext {
        WriterContext {
            engine_resources_root: self.engine_resources_root.clone(),
            project_resources_root: self.project_resources_root.clone(),
            cache_root: self.cache_root.clone(),
            create_directories: params.create_directories,
        }
    }

    fn try_save(&self, id: &AssetId, params: &SaveParams) -> Result<(), WriteError> {
        let resource = self.registry.get(id).ok_or(WriteError::NotLoaded(*id))?;
        let record = self.database.get(id);

        let ctx = self.writer_context(params);
        let target = match (&params.target_path_override, &record) {
            (Some(target), _) => ctx.resolve(target),
            (None, Some(info)) => self
                .resolve_imported(info)
                .ok_or(WriteError::InvalidResource("record has no imported path"))?,
            (None, None) => return Err(WriteError::NotLoaded(*id)),
        };

        self.writer_for(&resource, &target)?
            .write(&resource, &target, &ctx)?;
        info!("Saved {} to '{}'", id, target.display());

        if params.update_database {
            let base = record.unwrap_or_else(|| AssetInfo {
                guid: *id,
                asset_type: resource.asset_type(),
                ..Default::default()
            });
            self.refresh_record(base, &target, params);
        }
        Ok(())
    }

    fn try_save_as(
        &self,
        resource: &AnyResource,
        target: &Path,
        params: &SaveParams,
    ) -> Result<AssetId, WriteError> {
        let ctx = self.writer_context(params);
        let written = ctx.resolve(target);
        self.writer_for(resource, &written)?
            .write(resource, &written, &ctx)?;

        let new_id = params.explicit_guid.unwrap_or_else(AssetId::random);
        info!("Saved {} at '{}'", new_id, written.display());

        if params.update_database {
            let (source_path, origin) = self.classify(&written);
            let base = AssetInfo {
                guid: new_id,
                asset_type: resource.asset_type(),
                origin,
                source_path,
                ..Default::default()
            };
            self.refresh_record(base, &written, params);
        }
        Ok(new_id)
    }

    fn refresh_record(&self, mut info: AssetInfo, written: &Path, params: &SaveParams) {
        info.imported_path = relative_to(written, &self.cache_root)
            .unwrap_or_else(|| generic_string(written));
        if let Ok(stamp) = FileStamp::of(written) {
            info.imported_timestamp = stamp.modified;
            info.imported_file_size = stamp.size;
        }
        if let Some(source) = &params.source_path_override {
            info.source_path = source.clone();
        }
        if let Some(origin) = params.origin_override {
            info.origin = origin;
        }
        if info.source_path.is_empty() {
            info.source_path = generic_string(written);
        }
        self.database.upsert(info);
    }

    fn classify(&self, written: &Path) -> (String, AssetOrigin) {
        if let Some(rel) = relative_to(written, &self.project_resources_root) {
            (rel, AssetOrigin::Project)
        } else if let Some(rel) = relative_to(written, &self.engine_resources_root) {
            (rel, AssetOrigin::Engine)
        } else {
            (generic_string(written), AssetOrigin::Project)
        }
    }
}
