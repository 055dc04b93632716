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

use super::impl_resource;
use crate::asset::AssetType;
use std::path::PathBuf;

/// Decoded image data loaded from a `.texbin` artifact.
///
/// Pixels are always RGBA8 (`width * height * 4` bytes); `channels` records
/// how many channels the source image had.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Texture {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Channel count of the source image.
    pub channels: u32,
    /// RGBA8 pixel rows, top to bottom.
    pub pixels: Vec<u8>,
    /// Path of the artifact this texture was read from.
    pub origin: PathBuf,
}

impl Texture {
    /// Expected pixel buffer length for the given dimensions.
    pub fn rgba_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * 4
    }
}

impl_resource!(Texture, Texture, AssetType::Texture, |t| t.width > 0
    && t.height > 0
    && t.pixels.len() == Texture::rgba_len(t.width, t.height));
