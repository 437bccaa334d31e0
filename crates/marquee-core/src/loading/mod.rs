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

//! The contracts of a loading session.
//!
//! A session works through a [`Manifest`](crate::asset::Manifest) by handing
//! every request to an [`AssetPipeline`]. The pipeline reports back through a
//! [`CompletionSender`]; the session turns those reports into [`LoadEvent`]s
//! for its [`LoadObserver`]s:
//!
//! ```text
//!  Manifest ──submit──▶ AssetPipeline ──Completion──▶ session ──LoadEvent──▶ observers
//! ```
//!
//! The session itself lives in `marquee-io`; this module only holds the
//! shared vocabulary.

mod error;
mod events;
mod pipeline;
mod progress;

pub use error::*;
pub use events::*;
pub use pipeline::*;
pub use progress::*;

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A unique identifier for one loading session.
///
/// Every event carries the id of the session that produced it, so observers
/// can ignore stragglers from a session they no longer care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Creates a new, random (version 4) `SessionId`.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a loader is in its lifecycle.
///
/// ```text
/// Idle ──start──▶ Loading ──last completion──▶ Complete
///                    │
///                    └──fatal pipeline error──▶ Aborted
/// ```
///
/// `Complete` and `Aborted` are terminal for a session; a new session may be
/// started from `Idle`, `Complete`, or `Aborted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoaderState {
    /// No session has run, or the last one was abandoned.
    #[default]
    Idle,
    /// A session is waiting on completions.
    Loading,
    /// The last session settled every request.
    Complete,
    /// The last session stopped on a fatal pipeline error.
    Aborted,
}

impl LoaderState {
    /// Returns `true` if a new session may be started from this state.
    pub fn accepts_new_session(self) -> bool {
        !matches!(self, LoaderState::Loading)
    }

    /// Returns `true` for `Complete` and `Aborted`.
    pub fn is_terminal(self) -> bool {
        matches!(self, LoaderState::Complete | LoaderState::Aborted)
    }
}
