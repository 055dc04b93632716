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

//! Small file-system helpers shared by importers, writers and the scanner.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

/// Modification time and size of a file, as stored in `AssetInfo`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct FileStamp {
    /// Nanoseconds since the Unix epoch.
    pub modified: u64,
    /// Size in bytes.
    pub size: u64,
}

impl FileStamp {
    pub fn of(path: &Path) -> io::Result<Self> {
        let meta = fs::metadata(path)?;
        let modified = meta
            .modified()?
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
            .unwrap_or(0);
        Ok(Self {
            modified,
            size: meta.len(),
        })
    }
}

/// Lowercased extension without the leading dot.
pub(crate) fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Normalizes a user-supplied extension (`".PNG"`, `"png"`) to `"png"`.
pub(crate) fn normalize_extension(ext: &str) -> String {
    ext.trim_start_matches('.').to_ascii_lowercase()
}

/// Writes `bytes` to `<path>.tmp` and renames it over `path`, so readers never
/// observe a partially written file.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let tmp = tmp_path(path);
    if let Err(e) = fs::write(&tmp, bytes) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    fs::rename(&tmp, path).inspect_err(|_| {
        let _ = fs::remove_file(&tmp);
    })
}

/// Creates the parent directory of `path` if it has one.
pub(crate) fn ensure_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// `path` relative to `root`, with forward slashes, if it lies under `root`.
pub(crate) fn relative_to(path: &Path, root: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    Some(generic_string(rel))
}

/// A recorded artifact path: absolute paths as-is, relative ones under
/// `root`.
pub(crate) fn resolve_under(root: &Path, recorded: &str) -> PathBuf {
    let path = Path::new(recorded);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// The path as a string with forward-slash separators.
pub(crate) fn generic_string(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_normalization() {
        assert_eq!(extension_of(Path::new("a/B.PNG")).as_deref(), Some("png"));
        assert_eq!(extension_of(Path::new("noext")), None);
        assert_eq!(normalize_extension(".LMat"), "lmat");
        assert_eq!(normalize_extension("obj"), "obj");
    }

    #[test]
    fn test_relative_to_root() {
        let root = Path::new("res/project");
        let file = root.join("Materials").join("a.lmat");
        assert_eq!(relative_to(&file, root).as_deref(), Some("Materials/a.lmat"));
        assert_eq!(relative_to(Path::new("elsewhere/a.lmat"), root), None);
    }

    #[test]
    fn test_write_atomic_leaves_no_tmp() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.bin");
        write_atomic(&target, b"abc").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"abc");
        assert!(!tmp_path(&target).exists());
    }
}
