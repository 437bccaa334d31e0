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

//! Lightweight checks run on raw asset bytes.
//!
//! These read just enough of a file to validate it and describe it (image
//! dimensions, atlas frame counts). Full decoding belongs to the host engine.

use super::fs::FsLoadError;
use image::ImageReader;
use serde_json::Value;
use std::io::Cursor;
use std::path::Path;

/// Reads the pixel dimensions from an encoded image header.
pub(crate) fn image_dimensions(path: &Path, bytes: &[u8]) -> Result<(u32, u32), FsLoadError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|source| FsLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    reader.into_dimensions().map_err(|source| FsLoadError::Image {
        path: path.to_path_buf(),
        source,
    })
}

/// Counts the frames declared by an atlas data file.
///
/// Understands the three common JSON layouts: a `frames` object keyed by frame
/// name, a `frames` array of entries, and a multi-texture `textures` array
/// whose entries each carry a `frames` array.
pub(crate) fn atlas_frame_count(path: &Path, bytes: &[u8]) -> Result<u32, FsLoadError> {
    let document: Value = serde_json::from_slice(bytes).map_err(|source| FsLoadError::AtlasData {
        path: path.to_path_buf(),
        source,
    })?;

    let count = match (&document["frames"], &document["textures"]) {
        (Value::Object(frames), _) => frames.len(),
        (Value::Array(frames), _) => frames.len(),
        (_, Value::Array(textures)) => textures
            .iter()
            .filter_map(|texture| texture["frames"].as_array())
            .map(Vec::len)
            .sum(),
        _ => 0,
    };

    if count == 0 {
        return Err(FsLoadError::AtlasFormat(path.to_path_buf()));
    }
    Ok(count as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_hash_and_array_layouts() {
        let path = Path::new("atlas.json");
        let hash = br#"{"frames": {"grapes": {}, "tomato": {}, "leek": {}}}"#;
        let array = br#"{"frames": [{"filename": "grapes"}, {"filename": "tomato"}]}"#;
        let multi = br#"{"textures": [{"frames": [{}, {}]}, {"frames": [{}]}]}"#;

        assert_eq!(atlas_frame_count(path, hash).unwrap(), 3);
        assert_eq!(atlas_frame_count(path, array).unwrap(), 2);
        assert_eq!(atlas_frame_count(path, multi).unwrap(), 3);
    }

    #[test]
    fn rejects_atlas_without_frames() {
        let path = Path::new("atlas.json");
        assert!(matches!(
            atlas_frame_count(path, br#"{"meta": {}}"#),
            Err(FsLoadError::AtlasFormat(_))
        ));
        assert!(matches!(
            atlas_frame_count(path, b"not json"),
            Err(FsLoadError::AtlasData { .. })
        ));
    }

    #[test]
    fn rejects_bytes_that_are_not_an_image() {
        let result = image_dimensions(Path::new("broken.png"), b"definitely not a png");
        assert!(matches!(result, Err(FsLoadError::Image { .. })));
    }
}
