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

//! Concrete loadable resource types and the closed set that type-erases them.
//!
//! Every resource is built from a cached artifact and remembers the path it
//! was built from (its "origin"). The [`Resource`] trait is the capability
//! interface the caching layer works against; [`AnyResource`] is the tagged
//! form stored by the strong-owning registry.

/// Implements [`Asset`] and [`Resource`] for a concrete type whose
/// artifact path is stored in an `origin` field.
macro_rules! impl_resource {
    ($ty:ident, $variant:ident, $asset_type:expr, |$this:ident| $valid:expr) => {
        impl $crate::asset::Asset for $ty {}

        impl $crate::asset::Resource for $ty {
            const ASSET_TYPE: $crate::asset::AssetType = $asset_type;

            fn origin(&self) -> &::std::path::Path {
                &self.origin
            }

            fn is_valid(&self) -> bool {
                let $this = self;
                $valid
            }

            fn into_any(
                handle: $crate::asset::AssetHandle<Self>,
            ) -> $crate::asset::AnyResource {
                $crate::asset::AnyResource::$variant(handle)
            }

            fn from_any(
                any: &$crate::asset::AnyResource,
            ) -> Option<$crate::asset::AssetHandle<Self>> {
                match any {
                    $crate::asset::AnyResource::$variant(h) => Some(h.clone()),
                    _ => None,
                }
            }
        }
    };
}
pub(crate) use impl_resource;

mod material;
mod mesh;
mod script;
mod shader;
mod texture;
mod world;

pub use material::*;
pub use mesh::*;
pub use script::*;
pub use shader::*;
pub use texture::*;
pub use world::*;

use super::{Asset, AssetHandle, AssetType};
use std::path::Path;

/// A loadable, cacheable resource.
///
/// Implementors are the concrete types in this module. The associated
/// [`ASSET_TYPE`](Resource::ASSET_TYPE) is what dispatch uses in place of
/// runtime downcasting.
pub trait Resource: Asset + Sized {
    /// The asset kind this resource is loaded from.
    const ASSET_TYPE: AssetType;

    /// The artifact path this instance was constructed from.
    fn origin(&self) -> &Path;

    /// Whether construction produced usable data.
    fn is_valid(&self) -> bool;

    /// Wraps a typed handle into the closed sum type.
    fn into_any(handle: AssetHandle<Self>) -> AnyResource;

    /// Recovers a typed handle, or `None` if `any` holds a different kind.
    fn from_any(any: &AnyResource) -> Option<AssetHandle<Self>>;
}

/// A strong handle to a resource of any kind.
#[derive(Debug, Clone)]
pub enum AnyResource {
    /// A [`Material`].
    Material(AssetHandle<Material>),
    /// A [`Mesh`].
    Mesh(AssetHandle<Mesh>),
    /// A [`Texture`].
    Texture(AssetHandle<Texture>),
    /// A [`Shader`].
    Shader(AssetHandle<Shader>),
    /// A [`Script`].
    Script(AssetHandle<Script>),
    /// A [`World`].
    World(AssetHandle<World>),
}

impl AnyResource {
    /// The kind of resource held.
    pub fn asset_type(&self) -> AssetType {
        match self {
            AnyResource::Material(_) => AssetType::Material,
            AnyResource::Mesh(_) => AssetType::Mesh,
            AnyResource::Texture(_) => AssetType::Texture,
            AnyResource::Shader(_) => AssetType::Shader,
            AnyResource::Script(_) => AssetType::Script,
            AnyResource::World(_) => AssetType::World,
        }
    }

    /// The artifact path the held resource was built from.
    pub fn origin(&self) -> &Path {
        match self {
            AnyResource::Material(r) => r.origin(),
            AnyResource::Mesh(r) => r.origin(),
            AnyResource::Texture(r) => r.origin(),
            AnyResource::Shader(r) => r.origin(),
            AnyResource::Script(r) => r.origin(),
            AnyResource::World(r) => r.origin(),
        }
    }

    /// Whether the held resource is usable.
    pub fn is_valid(&self) -> bool {
        match self {
            AnyResource::Material(r) => r.is_valid(),
            AnyResource::Mesh(r) => r.is_valid(),
            AnyResource::Texture(r) => r.is_valid(),
            AnyResource::Shader(r) => r.is_valid(),
            AnyResource::Script(r) => r.is_valid(),
            AnyResource::World(r) => r.is_valid(),
        }
    }

    /// Returns a typed handle if this holds a `T`.
    pub fn downcast<T: Resource>(&self) -> Option<AssetHandle<T>> {
        T::from_any(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_resource_dispatch() {
        let script = AssetHandle::new(Script::new("print(1)", "cache/Scripts/a.luabin"));
        let any = Script::into_any(script.clone());

        assert_eq!(any.asset_type(), AssetType::Script);
        assert_eq!(any.origin(), Path::new("cache/Scripts/a.luabin"));
        assert!(any.is_valid());

        let back = any.downcast::<Script>().unwrap();
        assert!(AssetHandle::ptr_eq(&script, &back));
        assert!(any.downcast::<Material>().is_none());
    }
}
