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

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use uuid::Uuid;

/// Namespace used to derive path-based identifiers (UUID version 5).
///
/// Changing this value changes every derived [`AssetId`] and therefore
/// invalidates every persisted asset database.
pub const ASSET_NAMESPACE: Uuid = Uuid::from_u128(0x123e4567_e89b_12d3_a456_426655440000);

/// A stable, 128-bit identifier for a logical asset.
///
/// An `AssetId` is either a literal UUID or a UUID derived deterministically
/// (SHA-1, version 5) from a normalized source path. Equal normalized paths
/// always produce equal identifiers, across runs and across machines sharing
/// the same filesystem case rules.
///
/// The all-zero UUID is the "empty" identifier and is what [`Default`]
/// returns.
///
/// # Examples
///
/// ```
/// use tessera_core::asset::AssetId;
///
/// let a = AssetId::new("Materials/brick.lmat");
/// let b = AssetId::new("Materials\\brick.lmat");
/// assert_eq!(a, b);
/// assert!(!a.is_empty());
/// assert!(AssetId::default().is_empty());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(Uuid);

impl AssetId {
    /// The empty identifier.
    pub const EMPTY: AssetId = AssetId(Uuid::nil());

    /// Builds an identifier from a string.
    ///
    /// A canonical hyphenated UUID is stored verbatim. Any other non-empty
    /// string is treated as a path and hashed with [`AssetId::from_path`].
    /// An empty string yields the empty identifier.
    pub fn new(value: &str) -> Self {
        if value.is_empty() {
            return Self::EMPTY;
        }

        if looks_like_uuid(value) {
            if let Ok(uuid) = Uuid::parse_str(value) {
                return Self(uuid);
            }
        }

        Self::from_path(value)
    }

    /// Derives an identifier from a path, after normalization.
    ///
    /// See [`normalize_path`] for the normalization rules.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let normalized = normalize_path(&path.as_ref().to_string_lossy());
        if normalized.is_empty() {
            return Self::EMPTY;
        }
        Self(Uuid::new_v5(&ASSET_NAMESPACE, normalized.as_bytes()))
    }

    /// Wraps an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Creates a new, random (version 4) identifier.
    ///
    /// Random identifiers are only used for assets that have no source path
    /// to derive from, such as resources saved under a fresh name.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns `true` if this is the all-zero identifier.
    pub fn is_empty(&self) -> bool {
        self.0.is_nil()
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Returns the canonical lowercase hyphenated form (36 characters).
    pub fn str(&self) -> String {
        self.0.hyphenated().to_string()
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl From<&str> for AssetId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<Uuid> for AssetId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

/// Normalizes a path string for hashing and for source-path lookups.
///
/// Backslashes become forward slashes on every platform. On Windows, whose
/// filesystem is case-insensitive, the path is also lowercased.
pub fn normalize_path(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    if cfg!(windows) {
        normalized.to_lowercase()
    } else {
        normalized
    }
}

fn looks_like_uuid(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 36
        && bytes[8] == b'-'
        && bytes[13] == b'-'
        && bytes[18] == b'-'
        && bytes[23] == b'-'
}
