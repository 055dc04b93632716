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

//! Provides the foundational traits and primitive types for Tessera's asset system.
//!
//! This module defines the "common language" for all asset-related operations in the
//! engine. It contains the core contracts that other crates implement or use,
//! but it has no knowledge of how assets are imported, cached or stored.
//!
//! The key components are:
//! - The [`Asset`] trait: A marker for all types that can be treated as assets.
//! - [`AssetId`]: the stable, deterministic identifier of a source asset.
//! - [`AssetInfo`]: the persisted metadata record of one imported asset.
//! - [`AssetHandle`] / [`WeakAssetHandle`]: the owning and non-owning views of a
//!   loaded resource.
//! - The [`Resource`] capability trait and the closed [`AnyResource`] sum type
//!   over every loadable resource kind.

mod handle;
mod id;
mod metadata;
mod resources;

pub use handle::*;
pub use id::*;
pub use metadata::*;
pub use resources::*;

/// A marker trait for types that can be managed by the asset system.
///
/// The supertraits enforce critical safety guarantees:
/// - `Send` + `Sync`: The asset type can be safely shared and sent between threads.
/// - `'static`: The asset type does not contain any non-static references, ensuring
///   it can be stored for the lifetime of the application.
///
/// # Examples
///
/// ```
/// use tessera_core::asset::Asset;
///
/// struct Palette {
///     colors: Vec<[u8; 4]>,
/// }
///
/// impl Asset for Palette {}
/// ```
pub trait Asset: Send + Sync + 'static {}
