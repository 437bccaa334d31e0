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

//! # Marquee IO
//!
//! The loader coordinator and the concrete asset pipelines it drives, plus the
//! two ways of declaring a manifest outside code: RON manifest files and
//! directory scanning.

#![warn(missing_docs)]

pub mod coordinator;
pub mod manifest_file;
pub mod pipeline;
pub mod scan;

pub use coordinator::{LoadReport, LoadSession, LoaderCoordinator};
pub use manifest_file::{AssetEntry, ManifestFile, ManifestFileError, ResolvedManifest};
pub use pipeline::{CallbackPipeline, FsLoadError, FsPipeline};
pub use scan::{scan_directory, ScanError};
