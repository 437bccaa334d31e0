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

use super::AssetKind;
use serde::{Deserialize, Serialize};

/// What a pipeline reports back after loading one asset.
///
/// This is a summary, not the payload: decoded data stays with the pipeline
/// (or the host engine behind it). It is what the loading report lists once a
/// session is complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadedAsset {
    /// The key of the request that produced this asset.
    pub key: String,
    /// The asset category.
    pub kind: AssetKind,
    /// The source location that was actually used. Differs from the primary
    /// source when a fallback won.
    pub source: String,
    /// Size of the loaded payload, in bytes.
    pub byte_len: u64,
    /// Pixel dimensions, for texture kinds.
    pub dimensions: Option<(u32, u32)>,
    /// Number of frames, for spritesheets and atlases.
    pub frames: Option<u32>,
}

impl LoadedAsset {
    /// Creates a summary with no size or shape information.
    pub fn new(key: impl Into<String>, kind: AssetKind, source: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind,
            source: source.into(),
            byte_len: 0,
            dimensions: None,
            frames: None,
        }
    }

    /// Sets the payload size.
    pub fn with_byte_len(mut self, byte_len: u64) -> Self {
        self.byte_len = byte_len;
        self
    }

    /// Sets the pixel dimensions.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.dimensions = Some((width, height));
        self
    }

    /// Sets the frame count.
    pub fn with_frames(mut self, frames: u32) -> Self {
        self.frames = Some(frames);
        self
    }
}
