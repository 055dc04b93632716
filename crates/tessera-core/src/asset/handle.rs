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

use super::Asset;
use std::{
    fmt,
    ops::Deref,
    sync::{Arc, Weak},
};

/// A thread-safe, reference-counted handle to a loaded asset.
///
/// This acts as a smart pointer, providing shared ownership of an asset's data.
/// Cloning a handle is cheap, as it only increments the reference count
/// and does not duplicate the underlying asset data.
///
/// The asset data is automatically deallocated when the last handle is dropped.
/// Caches keep a [`WeakAssetHandle`] instead so they never extend that lifetime.
#[derive(Debug)]
pub struct AssetHandle<T: Asset>(Arc<T>);

impl<T: Asset> AssetHandle<T> {
    /// Creates a new `AssetHandle` that takes ownership of the asset data.
    pub fn new(asset: T) -> Self {
        Self(Arc::new(asset))
    }

    /// Creates a non-owning handle to the same instance.
    pub fn downgrade(&self) -> WeakAssetHandle<T> {
        WeakAssetHandle(Arc::downgrade(&self.0))
    }

    /// Returns `true` if both handles point at the same instance.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    /// Number of strong handles currently alive for this instance.
    pub fn strong_count(this: &Self) -> usize {
        Arc::strong_count(&this.0)
    }
}

impl<T: Asset> Clone for AssetHandle<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: Asset> Deref for AssetHandle<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A non-owning reference to an asset held by an [`AssetHandle`].
///
/// Upgrading fails once every strong handle has been dropped.
pub struct WeakAssetHandle<T: Asset>(Weak<T>);

impl<T: Asset> WeakAssetHandle<T> {
    /// Attempts to obtain a strong handle to the asset.
    pub fn upgrade(&self) -> Option<AssetHandle<T>> {
        self.0.upgrade().map(AssetHandle)
    }

    /// Returns `true` once no strong handle to the asset remains.
    pub fn is_expired(&self) -> bool {
        self.0.strong_count() == 0
    }
}

impl<T: Asset> Clone for WeakAssetHandle<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: Asset> fmt::Debug for WeakAssetHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakAssetHandle")
            .field("expired", &self.is_expired())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Blob(u32);
    impl Asset for Blob {}

    #[test]
    fn test_clone_shares_instance() {
        let a = AssetHandle::new(Blob(7));
        let b = a.clone();
        assert!(AssetHandle::ptr_eq(&a, &b));
        assert_eq!((*b).0, 7);
        assert_eq!(AssetHandle::strong_count(&a), 2);
    }

    #[test]
    fn test_weak_expires_with_last_strong() {
        let a = AssetHandle::new(Blob(1));
        let weak = a.downgrade();
        assert!(!weak.is_expired());
        assert!(weak.upgrade().is_some());

        drop(a);
        assert!(weak.is_expired());
        assert!(weak.upgrade().is_none());
    }
}
