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

//! Pak archives: every cached artifact of a build in one file, addressed by
//! asset id.
//!
//! ```text
//! +--------------------+ 0
//! | PakHeader (24 B)   |   magic "TPAK", version, index offset, index size
//! +--------------------+
//! | artifact bytes ... |   one run per entry, back to back
//! +--------------------+ index offset
//! | JSON index         |   { "<guid>": { offset, size, type, path }, ... }
//! +--------------------+
//! ```
//!
//! Header fields use native byte order, like the artifacts themselves.

use crate::database::AssetDatabase;
use crate::error::PakError;
use crate::fs::{resolve_under, tmp_path};
use ahash::AHashMap;
use bytemuck::{Pod, Zeroable};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Read, Seek, SeekFrom, Write};
use std::mem::size_of;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tessera_core::asset::{AssetId, AssetInfo, AssetOrigin, AssetType};

/// First four bytes of every pak.
pub const PAK_MAGIC: [u8; 4] = *b"TPAK";
/// Current format version.
pub const PAK_VERSION: u32 = 1;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
struct PakHeader {
    magic: [u8; 4],
    version: u32,
    index_offset: u64,
    index_size: u64,
}

const HEADER_LEN: u64 = size_of::<PakHeader>() as u64;

/// Where one artifact lives inside a pak.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PakEntry {
    /// Byte offset from the start of the archive.
    pub offset: u64,
    /// Length in bytes.
    pub size: u64,
    /// Kind of the packed asset.
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    /// The recorded artifact path. Its extension selects the decoder.
    pub path: String,
}

/// Writes pak archives from the records of an [`AssetDatabase`].
#[derive(Debug, Clone)]
pub struct PakBuilder {
    cache_root: PathBuf,
    include_engine_assets: bool,
}

impl PakBuilder {
    /// A builder resolving relative artifact paths under `cache_root`.
    pub fn new(cache_root: impl Into<PathBuf>) -> Self {
        Self {
            cache_root: cache_root.into(),
            include_engine_assets: true,
        }
    }

    /// Whether records of engine origin are packed. Defaults to `true`.
    pub fn include_engine_assets(mut self, include: bool) -> Self {
        self.include_engine_assets = include;
        self
    }

    /// Returns `true` if `info` would be packed, artifact presence aside.
    pub fn accepts(&self, info: &AssetInfo) -> bool {
        !info.imported_path.is_empty()
            && (self.include_engine_assets || info.origin != AssetOrigin::Engine)
    }

    /// Packs the artifact of every accepted record into `out`, replacing it.
    ///
    /// Records whose artifact is missing are skipped with a warning. Returns
    /// the number of packed entries.
    pub fn build(&self, database: &AssetDatabase, out: &Path) -> Result<usize, PakError> {
        info!("Building pak '{}'", out.display());
        let tmp = tmp_path(out);
        let result = self.write_archive(database, &tmp).and_then(|count| {
            fs::rename(&tmp, out)
                .map(|()| count)
                .map_err(|e| PakError::io(out, e))
        });
        if result.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        let count = result?;
        info!("Built pak '{}' with {} entr(ies)", out.display(), count);
        Ok(count)
    }

    fn write_archive(&self, database: &AssetDatabase, path: &Path) -> Result<usize, PakError> {
        let io = |e| PakError::io(path, e);
        let mut writer = BufWriter::new(File::create(path).map_err(io)?);
        writer
            .write_all(bytemuck::bytes_of(&PakHeader::zeroed()))
            .map_err(io)?;

        let mut index = BTreeMap::new();
        let mut offset = HEADER_LEN;
        for info in database.all() {
            if !self.accepts(&info) {
                continue;
            }
            let artifact = resolve_under(&self.cache_root, &info.imported_path);
            let bytes = match fs::read(&artifact) {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(
                        "Skipping {}: cannot read artifact '{}': {}",
                        info.guid,
                        artifact.display(),
                        e
                    );
                    continue;
                }
            };
            writer.write_all(&bytes).map_err(io)?;

            let size = bytes.len() as u64;
            debug!("Packed {} ({} bytes) at {}", info.guid, size, offset);
            index.insert(
                info.guid,
                PakEntry {
                    offset,
                    size,
                    asset_type: info.asset_type,
                    path: info.imported_path,
                },
            );
            offset += size;
        }

        let index_bytes = serde_json::to_vec(&index).map_err(|source| PakError::Index {
            path: path.to_path_buf(),
            source,
        })?;
        writer.write_all(&index_bytes).map_err(io)?;

        let header = PakHeader {
            magic: PAK_MAGIC,
            version: PAK_VERSION,
            index_offset: offset,
            index_size: index_bytes.len() as u64,
        };
        writer.seek(SeekFrom::Start(0)).map_err(io)?;
        writer.write_all(bytemuck::bytes_of(&header)).map_err(io)?;
        writer.flush().map_err(io)?;
        Ok(index.len())
    }
}

/// Random access to the entries of a pak archive.
///
/// The index is read and validated once, on [`open`](Self::open). Reads
/// share one file handle behind a mutex.
#[derive(Debug)]
pub struct PakReader {
    path: PathBuf,
    file: Mutex<File>,
    index: AHashMap<AssetId, PakEntry>,
}

impl PakReader {
    /// Opens `path` and loads its index.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PakError> {
        let path = path.as_ref();
        let io = |e| PakError::io(path, e);
        let mut file = File::open(path).map_err(io)?;
        let file_len = file.metadata().map_err(io)?.len();
        if file_len < HEADER_LEN {
            return Err(PakError::BadMagic(path.to_path_buf()));
        }

        let mut raw = [0u8; size_of::<PakHeader>()];
        file.read_exact(&mut raw).map_err(io)?;
        let header: PakHeader = bytemuck::pod_read_unaligned(&raw);
        if header.magic != PAK_MAGIC {
            return Err(PakError::BadMagic(path.to_path_buf()));
        }
        if header.version != PAK_VERSION {
            return Err(PakError::UnsupportedVersion {
                path: path.to_path_buf(),
                version: header.version,
            });
        }

        let index_fits = header.index_offset >= HEADER_LEN
            && header
                .index_offset
                .checked_add(header.index_size)
                .is_some_and(|end| end <= file_len);
        if !index_fits {
            return Err(PakError::corrupted(path, "index lies outside the archive"));
        }

        let mut index_bytes = vec![0u8; to_len(header.index_size, path)?];
        file.seek(SeekFrom::Start(header.index_offset)).map_err(io)?;
        file.read_exact(&mut index_bytes).map_err(io)?;
        let entries: BTreeMap<AssetId, PakEntry> =
            serde_json::from_slice(&index_bytes).map_err(|source| PakError::Index {
                path: path.to_path_buf(),
                source,
            })?;

        for (id, entry) in &entries {
            let in_bounds = entry.offset >= HEADER_LEN
                && entry
                    .offset
                    .checked_add(entry.size)
                    .is_some_and(|end| end <= header.index_offset);
            if !in_bounds {
                return Err(PakError::corrupted(
                    path,
                    format!("entry {id} lies outside the data section"),
                ));
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
            index: entries.into_iter().collect(),
        })
    }

    /// The archive path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if the archive holds an entry for `id`.
    pub fn contains(&self, id: &AssetId) -> bool {
        self.index.contains_key(id)
    }

    /// The index entry for `id`.
    pub fn entry(&self, id: &AssetId) -> Option<&PakEntry> {
        self.index.get(id)
    }

    /// Every packed id, sorted.
    pub fn ids(&self) -> Vec<AssetId> {
        let mut ids: Vec<AssetId> = self.index.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if the archive has no entries.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Reads the bytes packed for `id`.
    pub fn read(&self, id: &AssetId) -> Result<Vec<u8>, PakError> {
        let entry = self.index.get(id).ok_or(PakError::NotFound(*id))?;
        let io = |e| PakError::io(&self.path, e);

        let mut bytes = vec![0u8; to_len(entry.size, &self.path)?];
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        file.seek(SeekFrom::Start(entry.offset)).map_err(io)?;
        file.read_exact(&mut bytes).map_err(io)?;
        Ok(bytes)
    }
}

fn to_len(size: u64, path: &Path) -> Result<usize, PakError> {
    usize::try_from(size).map_err(|_| PakError::corrupted(path, "entry too large for this platform"))
}
