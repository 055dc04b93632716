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

use super::{artifact_path, begin_import, finish_import, AssetImporter};
use crate::artifact::{encode_texture, MAX_TEXTURE_DIMENSION};
use crate::error::ImportError;
use std::path::Path;
use tessera_core::asset::{AssetInfo, AssetType};

/// Decodes PNG and JPEG images into RGBA8 `.texbin` artifacts.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextureImporter;

impl AssetImporter for TextureImporter {
    fn extensions(&self) -> &'static [&'static str] {
        &["png", "jpg", "jpeg"]
    }

    fn asset_type(&self) -> AssetType {
        AssetType::Texture
    }

    fn import(&self, source: &Path, cache_root: &Path) -> Result<AssetInfo, ImportError> {
        let info = begin_import(source, AssetType::Texture)?;

        let img = image::open(source).map_err(|e| ImportError::Image {
            path: source.to_path_buf(),
            source: e,
        })?;
        let channels = u32::from(img.color().channel_count());

        // Convert to RGBA8 whatever the source layout
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        if width > MAX_TEXTURE_DIMENSION || height > MAX_TEXTURE_DIMENSION {
            return Err(ImportError::TooLarge {
                path: source.to_path_buf(),
                what: "texture dimension",
            });
        }

        let artifact = artifact_path(cache_root, "Textures", info.guid, "texbin");
        let bytes = encode_texture(width, height, channels, rgba.as_raw());
        finish_import(info, &artifact, &bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::decode_texture;
    use std::fs;

    #[test]
    fn test_grayscale_png_is_expanded_to_rgba() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("gray.png");
        image::GrayImage::from_pixel(3, 2, image::Luma([200u8]))
            .save(&source)
            .unwrap();

        let info = TextureImporter.import(&source, dir.path()).unwrap();
        let texture = decode_texture(
            &fs::read(&info.imported_path).unwrap(),
            Path::new(&info.imported_path),
        )
        .unwrap();

        assert_eq!((texture.width, texture.height), (3, 2));
        assert_eq!(texture.channels, 1);
        assert_eq!(texture.pixels.len(), 3 * 2 * 4);
        assert_eq!(&texture.pixels[..4], &[200, 200, 200, 255]);
    }

    #[test]
    fn test_corrupt_image_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("bad.png");
        fs::write(&source, b"not a png").unwrap();

        assert!(matches!(
            TextureImporter.import(&source, dir.path()),
            Err(ImportError::Image { .. })
        ));
    }
}
