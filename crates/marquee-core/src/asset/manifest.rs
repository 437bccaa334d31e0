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

//! The ordered, key-unique list of asset requests a loading session works through.

use super::AssetRequest;
use std::collections::HashSet;
use std::fmt;

/// Returned when a manifest already holds a request with the same key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKeyError {
    /// The key that was declared twice.
    pub key: String,
}

impl fmt::Display for DuplicateKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Asset key '{}' is already declared in the manifest", self.key)
    }
}

impl std::error::Error for DuplicateKeyError {}

/// A declarative list of asset requests.
///
/// Order is insertion order. It only makes iteration deterministic: requests
/// are submitted in this order, but they may finish in any order.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    entries: Vec<AssetRequest>,
    keys: HashSet<String>,
}

impl Manifest {
    /// Creates an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a request.
    ///
    /// # Errors
    /// Returns a [`DuplicateKeyError`] if a request with the same key is already
    /// present. The manifest is left unchanged in that case.
    pub fn add(&mut self, request: AssetRequest) -> Result<(), DuplicateKeyError> {
        if self.keys.contains(request.key()) {
            return Err(DuplicateKeyError {
                key: request.key().to_string(),
            });
        }

        self.keys.insert(request.key().to_string());
        self.entries.push(request);
        Ok(())
    }

    /// Builder form of [`Manifest::add`].
    pub fn with(mut self, request: AssetRequest) -> Result<Self, DuplicateKeyError> {
        self.add(request)?;
        Ok(self)
    }

    /// A read-only view of every request, in insertion order.
    pub fn entries(&self) -> &[AssetRequest] {
        &self.entries
    }

    /// Looks a request up by key.
    pub fn get(&self, key: &str) -> Option<&AssetRequest> {
        if !self.keys.contains(key) {
            return None;
        }
        self.entries.iter().find(|request| request.key() == key)
    }

    /// Checks whether a request with this key is declared.
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Iterates over the declared keys, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(AssetRequest::key)
    }

    /// Iterates over the requests, in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, AssetRequest> {
        self.entries.iter()
    }

    /// The number of requests.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no request is declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for Manifest {
    type Item = AssetRequest;
    type IntoIter = std::vec::IntoIter<AssetRequest>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a AssetRequest;
    type IntoIter = std::slice::Iter<'a, AssetRequest>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_preserves_insertion_order() {
        let mut manifest = Manifest::new();
        manifest.add(AssetRequest::image("fastboy", "fastboy.png")).unwrap();
        manifest.add(AssetRequest::audio("jumpSFX", "jumpSFX.wav")).unwrap();
        manifest
            .add(AssetRequest::image("colorsquare", "colorsquare.png"))
            .unwrap();

        let keys: Vec<&str> = manifest.keys().collect();
        assert_eq!(keys, ["fastboy", "jumpSFX", "colorsquare"]);
        assert_eq!(manifest.len(), 3);
    }

    #[test]
    fn duplicate_key_is_rejected_and_manifest_unchanged() {
        let mut manifest = Manifest::new();
        manifest.add(AssetRequest::image("sky", "sky.png")).unwrap();

        let err = manifest
            .add(AssetRequest::audio("sky", "sky.wav"))
            .unwrap_err();
        assert_eq!(err.key, "sky");
        assert_eq!(manifest.len(), 1);
        assert_eq!(
            manifest.get("sky").map(AssetRequest::primary_source),
            Some("sky.png")
        );
    }

    #[test]
    fn builder_form_propagates_duplicates() {
        let result = Manifest::new()
            .with(AssetRequest::image("a", "a.png"))
            .and_then(|m| m.with(AssetRequest::image("a", "b.png")));
        assert_eq!(result.unwrap_err().to_string(), "Asset key 'a' is already declared in the manifest");
    }

    #[test]
    fn lookup_by_key() {
        let manifest = Manifest::new()
            .with(AssetRequest::atlas("fruit", "fruit.png", "fruit.json"))
            .unwrap();
        assert!(manifest.contains("fruit"));
        assert!(!manifest.contains("veg"));
        assert!(manifest.get("veg").is_none());
        assert!(!manifest.is_empty());
    }
}
