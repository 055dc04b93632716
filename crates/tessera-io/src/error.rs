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

//! Error types for the import, artifact, writer, pak, cook and configuration
//! layers.
//!
//! The database and the resource manager never surface these: they report
//! failures as `bool`/`Option` and log the cause. These errors only travel
//! across the importer, writer and artifact-decoding boundaries.

use std::io;
use std::path::PathBuf;
use tessera_core::asset::{AssetId, AssetType};
use thiserror::Error;

/// A failure while turning a source file into a cached artifact.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The source file does not exist or is not a regular file.
    #[error("source file '{0}' does not exist")]
    SourceNotFound(PathBuf),

    /// No registered importer handles the file's extension.
    #[error("no importer registered for '{0}'")]
    UnsupportedExtension(PathBuf),

    /// Reading the source or writing the artifact failed.
    #[error("I/O error on '{path}': {source}")]
    Io {
        /// The file being read or written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A structured JSON source could not be parsed.
    #[error("malformed JSON in '{path}': {source}")]
    Json {
        /// The offending source file.
        path: PathBuf,
        /// The parser error.
        #[source]
        source: serde_json::Error,
    },

    /// An image could not be decoded.
    #[error("failed to decode image '{path}': {source}")]
    Image {
        /// The offending source file.
        path: PathBuf,
        /// The decoder error.
        #[source]
        source: image::ImageError,
    },

    /// An OBJ file could not be parsed.
    #[error("failed to parse OBJ '{path}': {source}")]
    Obj {
        /// The offending source file.
        path: PathBuf,
        /// The parser error.
        #[source]
        source: tobj::LoadError,
    },

    /// The source parsed but holds nothing usable.
    #[error("'{path}' contains no usable data: {reason}")]
    Empty {
        /// The offending source file.
        path: PathBuf,
        /// What was missing.
        reason: &'static str,
    },

    /// The source exceeds a format limit.
    #[error("'{path}' exceeds the {what} limit")]
    TooLarge {
        /// The offending source file.
        path: PathBuf,
        /// The limit that was hit.
        what: &'static str,
    },
}

impl ImportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ImportError::Io {
            path: path.into(),
            source,
        }
    }
}

/// A failure while decoding a cached artifact into a resource.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// The artifact could not be read.
    #[error("I/O error on '{path}': {source}")]
    Io {
        /// The artifact path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The artifact ended before all declared data was read.
    #[error("'{path}' is truncated: needed {needed} more bytes, {available} available")]
    Truncated {
        /// The artifact path.
        path: PathBuf,
        /// Bytes required by the header.
        needed: usize,
        /// Bytes left in the file.
        available: usize,
    },

    /// A header field is out of range.
    #[error("'{path}' is corrupted: {reason}")]
    Corrupted {
        /// The artifact path.
        path: PathBuf,
        /// Which check failed.
        reason: String,
    },

    /// A text payload is not valid UTF-8.
    #[error("'{path}' does not contain valid UTF-8 text")]
    InvalidUtf8 {
        /// The artifact path.
        path: PathBuf,
    },

    /// A JSON artifact could not be parsed.
    #[error("malformed JSON in '{path}': {source}")]
    Json {
        /// The artifact path.
        path: PathBuf,
        /// The parser error.
        #[source]
        source: serde_json::Error,
    },

    /// Neither stage of a shader pair exists next to the artifact.
    #[error("no shader stage found next to '{0}'")]
    MissingShaderStages(PathBuf),
}

impl ArtifactError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ArtifactError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn corrupted(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ArtifactError::Corrupted {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// A failure while serializing a resource back to disk.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The writer was handed a resource of another kind.
    #[error("writer for {expected:?} cannot write a {found:?} resource")]
    TypeMismatch {
        /// The kind this writer handles.
        expected: AssetType,
        /// The kind it received.
        found: AssetType,
    },

    /// The resource's in-memory state cannot be serialized.
    #[error("resource is not writable: {0}")]
    InvalidResource(&'static str),

    /// The payload exceeds the writer's size limit.
    #[error("payload of {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge {
        /// Payload size.
        size: usize,
        /// Maximum accepted size.
        limit: usize,
    },

    /// No writer handles this kind of resource.
    #[error("no writer registered for {0:?}")]
    NoWriter(AssetType),

    /// The resource is not currently loaded.
    #[error("resource {0} is not loaded")]
    NotLoaded(AssetId),

    /// Serialization failed.
    #[error("failed to serialize: {0}")]
    Json(#[from] serde_json::Error),

    /// The target could not be written.
    #[error("I/O error on '{path}': {source}")]
    Io {
        /// The file being written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl WriteError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        WriteError::Io {
            path: path.into(),
            source,
        }
    }
}

/// A failure while loading the resource configuration manifest.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The manifest exists but could not be read.
    #[error("failed to read '{path}': {source}")]
    Io {
        /// The manifest path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The manifest is not valid TOML for this schema.
    #[error("failed to parse '{path}': {source}")]
    Parse {
        /// The manifest path.
        path: PathBuf,
        /// The parser error.
        #[source]
        source: toml::de::Error,
    },
}

/// A failure while building or reading a pak archive.
#[derive(Debug, Error)]
pub enum PakError {
    /// The archive could not be read or written.
    #[error("I/O error on '{path}': {source}")]
    Io {
        /// The archive path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The file does not start with the pak magic.
    #[error("'{0}' is not a pak archive")]
    BadMagic(PathBuf),

    /// The archive was written by an incompatible format version.
    #[error("'{path}' has unsupported pak version {version}")]
    UnsupportedVersion {
        /// The archive path.
        path: PathBuf,
        /// The version found in the header.
        version: u32,
    },

    /// The header or index points outside the archive.
    #[error("pak '{path}' is corrupted: {reason}")]
    Corrupted {
        /// The archive path.
        path: PathBuf,
        /// Which check failed.
        reason: String,
    },

    /// The index is not valid JSON.
    #[error("malformed pak index in '{path}': {source}")]
    Index {
        /// The archive path.
        path: PathBuf,
        /// The parser or serializer error.
        #[source]
        source: serde_json::Error,
    },

    /// The archive holds no entry for the id.
    #[error("asset {0} is not in the pak")]
    NotFound(AssetId),
}

impl PakError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        PakError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn corrupted(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        PakError::Corrupted {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// A failure while cooking the content directory of a shipped build.
#[derive(Debug, Error)]
pub enum CookError {
    /// A content file could not be written.
    #[error("I/O error on '{path}': {source}")]
    Io {
        /// The file being written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Building the pak failed.
    #[error(transparent)]
    Pak(#[from] PakError),

    /// A JSON document could not be serialized.
    #[error("failed to serialize '{path}': {source}")]
    Json {
        /// The document being written.
        path: PathBuf,
        /// The serializer error.
        #[source]
        source: serde_json::Error,
    },
}

impl CookError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CookError::Io {
            path: path.into(),
            source,
        }
    }
}
