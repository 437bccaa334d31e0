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

//! Manifests declared in RON files.
//!
//! ```ron
//! (
//!     base_path: Some("assets"),
//!     assets: [
//!         Image(key: "fastboy", url: "fastboy.png"),
//!         Spritesheet(key: "pinkhover", url: "pinkhover.png",
//!             frame: (frame_width: 100, frame_height: 100, end_frame: Some(7))),
//!         Atlas(key: "fruitandveg", texture: "fruitandveg.png", data: "fruitandveg.json"),
//!         Audio(key: "rail", url: "railonnines.mp3"),
//!         Video(key: "hypnotic", url: "hypnotic.mp4", options: (no_audio: true)),
//!     ],
//! )
//! ```

use marquee_core::asset::{AssetRequest, DuplicateKeyError, Manifest, SpritesheetOptions, VideoOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while reading a manifest file.
#[derive(Debug, Error)]
pub enum ManifestFileError {
    /// The file could not be read.
    #[error("failed to read manifest '{}': {source}", .path.display())]
    Io {
        /// The manifest file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not a valid manifest document.
    #[error("failed to parse manifest '{}': {source}", .path.display())]
    Parse {
        /// The manifest file.
        path: PathBuf,
        /// The RON error, with its position.
        #[source]
        source: ron::error::SpannedError,
    },
    /// A manifest document given as a string is malformed.
    #[error("invalid manifest document: {0}")]
    Syntax(#[from] ron::error::SpannedError),
    /// Two entries share a key.
    #[error(transparent)]
    Duplicate(#[from] DuplicateKeyError),
}

/// One asset declaration in a manifest file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetEntry {
    /// A single image.
    Image {
        /// The asset key.
        key: String,
        /// The image location.
        url: String,
    },
    /// An image sliced into fixed-size frames.
    Spritesheet {
        /// The asset key.
        key: String,
        /// The image location.
        url: String,
        /// How the image is sliced.
        frame: SpritesheetOptions,
    },
    /// A texture with a JSON frame description.
    Atlas {
        /// The asset key.
        key: String,
        /// The texture location.
        texture: String,
        /// The frame data location.
        data: String,
    },
    /// A sound, with alternative encodings tried in order.
    Audio {
        /// The asset key.
        key: String,
        /// The preferred location.
        url: String,
        /// Alternative locations.
        #[serde(default)]
        fallbacks: Vec<String>,
    },
    /// A video clip.
    Video {
        /// The asset key.
        key: String,
        /// The preferred location.
        url: String,
        /// An alternative encoding.
        #[serde(default)]
        fallback: Option<String>,
        /// Decoding hints.
        #[serde(default)]
        options: VideoOptions,
    },
}

impl AssetEntry {
    /// The key this entry declares.
    pub fn key(&self) -> &str {
        match self {
            AssetEntry::Image { key, .. }
            | AssetEntry::Spritesheet { key, .. }
            | AssetEntry::Atlas { key, .. }
            | AssetEntry::Audio { key, .. }
            | AssetEntry::Video { key, .. } => key,
        }
    }
}

impl From<AssetEntry> for AssetRequest {
    fn from(entry: AssetEntry) -> Self {
        match entry {
            AssetEntry::Image { key, url } => AssetRequest::image(key, url),
            AssetEntry::Spritesheet { key, url, frame } => AssetRequest::spritesheet(key, url, frame),
            AssetEntry::Atlas { key, texture, data } => AssetRequest::atlas(key, texture, data),
            AssetEntry::Audio {
                key,
                url,
                fallbacks,
            } => AssetRequest::audio_with_fallbacks(key, url, fallbacks),
            AssetEntry::Video {
                key,
                url,
                fallback: Some(fallback),
                options,
            } => AssetRequest::video_with_fallback(key, url, fallback, options),
            AssetEntry::Video {
                key,
                url,
                fallback: None,
                options,
            } => AssetRequest::video(key, url, options),
        }
    }
}

/// The on-disk form of a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ManifestFile {
    /// The directory sources are relative to. A relative path is resolved
    /// against the manifest file's own directory; `None` means that directory.
    #[serde(default)]
    pub base_path: Option<PathBuf>,
    /// The declared assets, in order.
    pub assets: Vec<AssetEntry>,
}

/// A manifest file read from disk, with its base path resolved.
#[derive(Debug, Clone)]
pub struct ResolvedManifest {
    /// The requests, in declaration order.
    pub manifest: Manifest,
    /// The directory the request sources are relative to.
    pub base_path: PathBuf,
}

impl ManifestFile {
    /// Parses a manifest document.
    pub fn from_ron_str(document: &str) -> Result<Self, ManifestFileError> {
        Ok(ron::from_str(document)?)
    }

    /// Reads and validates the manifest file at `path`.
    ///
    /// # Errors
    /// Fails if the file cannot be read or parsed, or if two entries share a
    /// key.
    pub fn load(path: impl AsRef<Path>) -> Result<ResolvedManifest, ManifestFileError> {
        let path = path.as_ref();
        let document = fs::read_to_string(path).map_err(|source| ManifestFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ManifestFile =
            ron::from_str(&document).map_err(|source| ManifestFileError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let base_path = resolve_base_path(path, file.base_path.as_deref());

        let manifest = file.into_manifest()?;
        log::info!(
            "ManifestFile: Read {} asset(s) from '{}', base path '{}'.",
            manifest.len(),
            path.display(),
            base_path.display()
        );
        Ok(ResolvedManifest {
            manifest,
            base_path,
        })
    }

    /// Builds a [`Manifest`] from the declared entries, in order.
    pub fn into_manifest(self) -> Result<Manifest, DuplicateKeyError> {
        let mut manifest = Manifest::new();
        for entry in self.assets {
            manifest.add(entry.into())?;
        }
        Ok(manifest)
    }
}

/// Resolves a declared base path against the directory of the manifest file.
fn resolve_base_path(manifest: &Path, declared: Option<&Path>) -> PathBuf {
    // A bare file name has an empty parent, which is not a usable directory.
    let directory = match manifest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    match declared {
        Some(base) if base.is_absolute() => base.to_path_buf(),
        Some(base) => directory.join(base),
        None => directory.to_path_buf(),
    }
}
