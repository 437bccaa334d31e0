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

//! # Marquee Core
//!
//! Foundational crate containing the asset request types, the loading contracts,
//! and the event primitives shared by every other Marquee crate.
//!
//! Nothing in here performs I/O. Concrete pipelines and the loader coordinator
//! live in `marquee-io`; the progress presenter lives in `marquee-ui`.

#![warn(missing_docs)]

pub mod asset;
pub mod event;
pub mod loading;

pub use asset::{AssetKind, AssetRequest, DuplicateKeyError, LoadedAsset, Manifest};
pub use loading::{
    AssetLoadError, AssetPipeline, CompletionSender, LoadEvent, LoadObserver, LoaderState,
    Progress, SessionAlreadyActiveError, SessionId,
};
