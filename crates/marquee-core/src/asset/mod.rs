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

//! Provides the declarative vocabulary for asset loading.
//!
//! This module describes *what* should be loaded, never *how*. It contains:
//! - [`AssetKind`]: the closed set of asset categories a manifest may request.
//! - [`AssetRequest`]: one keyed request with its source locations and
//!   kind-specific options.
//! - [`Manifest`]: an ordered, key-unique collection of requests.
//! - [`LoadedAsset`]: the summary a pipeline produces for a successful load.
//!
//! The actual I/O happens behind the [`AssetPipeline`](crate::loading::AssetPipeline)
//! contract, implemented in other crates.

mod loaded;
mod manifest;
mod request;

pub use loaded::*;
pub use manifest::*;
pub use request::*;

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of an asset request.
///
/// The kind decides how many source locations a request carries and which
/// option record applies to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKind {
    /// A single static image.
    Image,
    /// An image subdivided into fixed-size animation frames.
    Spritesheet,
    /// An image plus a data file describing its named sub-regions.
    Atlas,
    /// A sound clip, with optional fallback encodings.
    Audio,
    /// A video clip, with an optional fallback encoding.
    Video,
}

impl AssetKind {
    /// All kinds, in declaration order.
    pub const ALL: [AssetKind; 5] = [
        AssetKind::Image,
        AssetKind::Spritesheet,
        AssetKind::Atlas,
        AssetKind::Audio,
        AssetKind::Video,
    ];

    /// A short lowercase name, used in logs and listings.
    pub fn name(self) -> &'static str {
        match self {
            AssetKind::Image => "image",
            AssetKind::Spritesheet => "spritesheet",
            AssetKind::Atlas => "atlas",
            AssetKind::Audio => "audio",
            AssetKind::Video => "video",
        }
    }

    /// Returns `true` for kinds whose payload is a decodable picture.
    pub fn is_texture(self) -> bool {
        matches!(
            self,
            AssetKind::Image | AssetKind::Spritesheet | AssetKind::Atlas
        )
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
