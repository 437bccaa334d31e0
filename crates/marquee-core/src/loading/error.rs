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

//! Defines the error types raised while a loading session runs.

use super::SessionId;
use std::fmt;

/// Returned by the coordinator when a session is started while another one is
/// still loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionAlreadyActiveError {
    /// The session that is still running.
    pub active: SessionId,
}

impl fmt::Display for SessionAlreadyActiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Loading session {} is still active; wait for it to settle before starting another",
            self.active
        )
    }
}

impl std::error::Error for SessionAlreadyActiveError {}

/// A single asset that failed to load.
///
/// These failures are not fatal to the session: they are reported as they
/// happen and collected for inspection once the session settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLoadError {
    /// The key of the failed request.
    pub key: String,
    /// A human-readable description of what went wrong.
    pub cause: String,
}

impl AssetLoadError {
    /// Creates a new per-asset failure.
    pub fn new(key: impl Into<String>, cause: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            cause: cause.into(),
        }
    }
}

impl fmt::Display for AssetLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to load asset '{}': {}", self.key, self.cause)
    }
}

impl std::error::Error for AssetLoadError {}
