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

//! Builds a manifest from the files found under a directory.

use marquee_core::asset::{AssetRequest, DuplicateKeyError, Manifest, VideoOptions};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Errors raised while scanning an asset directory.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The directory does not exist.
    #[error("asset directory '{}' does not exist", .0.display())]
    MissingRoot(PathBuf),
    /// An entry could not be read while walking the tree.
    #[error("failed to walk asset directory: {0}")]
    Walk(#[from] walkdir::Error),
    /// Two files share a stem.
    #[error(transparent)]
    Duplicate(#[from] DuplicateKeyError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileCategory {
    Texture,
    AtlasData,
    Audio,
    Video,
}

fn categorize(path: &Path) -> Option<FileCategory> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "png" | "jpg" | "jpeg" | "gif" | "bmp" | "webp" => Some(FileCategory::Texture),
        "json" => Some(FileCategory::AtlasData),
        "wav" | "mp3" | "ogg" | "flac" | "m4a" => Some(FileCategory::Audio),
        "mp4" | "webm" | "ogv" | "mov" => Some(FileCategory::Video),
        _ => None,
    }
}

/// The location of `path` relative to `root`, with `/` separators.
fn relative_source(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Walks `root` and declares one request per asset file, keyed by file stem.
///
/// Files are visited in name order, so the manifest is deterministic. An
/// image with a `.json` file of the same stem beside it becomes an atlas;
/// other JSON files and unknown extensions are skipped. Sources are relative
/// to `root`.
///
/// # Errors
/// Fails if `root` is missing, if the walk hits an unreadable entry, or if two
/// asset files share a stem.
pub fn scan_directory(root: impl AsRef<Path>) -> Result<Manifest, ScanError> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(ScanError::MissingRoot(root.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    let atlas_data: HashSet<&PathBuf> = files
        .iter()
        .filter(|path| categorize(path) == Some(FileCategory::AtlasData))
        .collect();

    let mut manifest = Manifest::new();
    for path in &files {
        let Some(category) = categorize(path) else {
            log::trace!("scan: Skipping '{}'.", path.display());
            continue;
        };
        let Some(key) = path.file_stem().and_then(|stem| stem.to_str()) else {
            log::warn!("scan: Skipping '{}', its name is not UTF-8.", path.display());
            continue;
        };
        let source = relative_source(root, path);

        let request = match category {
            FileCategory::Texture => {
                let data = path.with_extension("json");
                if atlas_data.contains(&data) {
                    AssetRequest::atlas(key, source, relative_source(root, &data))
                } else {
                    AssetRequest::image(key, source)
                }
            }
            FileCategory::Audio => AssetRequest::audio(key, source),
            FileCategory::Video => AssetRequest::video(key, source, VideoOptions::default()),
            FileCategory::AtlasData => continue,
        };
        manifest.add(request)?;
    }

    log::info!(
        "scan: Found {} asset(s) under '{}'.",
        manifest.len(),
        root.display()
    );
    Ok(manifest)
}
