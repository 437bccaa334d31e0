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

use marquee_core::asset::{AssetRequest, LoadedAsset};
use marquee_core::loading::{AssetPipeline, CompletionSender};
use std::collections::{HashMap, VecDeque};

/// A pipeline serviced by a host engine through callbacks.
///
/// Submitted requests queue up until the host collects them with
/// [`CallbackPipeline::take_pending`]. The host loads them however it likes
/// and reports each one back with [`CallbackPipeline::resolve_loaded`] or
/// [`CallbackPipeline::resolve_failed`].
#[derive(Debug, Default)]
pub struct CallbackPipeline {
    pending: VecDeque<AssetRequest>,
    in_flight: HashMap<String, CompletionSender>,
}

impl CallbackPipeline {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands every queued request to the host, in submission order.
    pub fn take_pending(&mut self) -> Vec<AssetRequest> {
        self.pending.drain(..).collect()
    }

    /// How many requests were submitted but not yet resolved.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Returns `true` if `key` was submitted and is not resolved yet.
    pub fn is_in_flight(&self, key: &str) -> bool {
        self.in_flight.contains_key(key)
    }

    /// Reports that the host loaded `asset`.
    ///
    /// Returns `false` if no request with that key is in flight.
    pub fn resolve_loaded(&mut self, asset: LoadedAsset) -> bool {
        match self.in_flight.remove(&asset.key) {
            Some(completions) => completions.loaded(asset),
            None => {
                log::warn!(
                    "CallbackPipeline: '{}' resolved but was never submitted.",
                    asset.key
                );
                false
            }
        }
    }

    /// Reports that the host failed to load `key`.
    ///
    /// Returns `false` if no request with that key is in flight.
    pub fn resolve_failed(&mut self, key: &str, cause: impl Into<String>) -> bool {
        match self.in_flight.remove(key) {
            Some(completions) => completions.failed(key, cause),
            None => {
                log::warn!("CallbackPipeline: '{key}' failed but was never submitted.");
                false
            }
        }
    }

    /// Reports a fatal condition to every session with requests in flight,
    /// then forgets them.
    pub fn fail_fatally(&mut self, cause: impl Into<String>) {
        let cause = cause.into();
        let mut notified = Vec::new();
        for (_, completions) in self.in_flight.drain() {
            if !notified.contains(&completions.session()) {
                notified.push(completions.session());
                completions.fatal(cause.clone());
            }
        }
        self.pending.clear();
    }
}

impl AssetPipeline for CallbackPipeline {
    fn submit(&mut self, request: AssetRequest, completions: CompletionSender) {
        if let Some(previous) = self.in_flight.insert(request.key().to_string(), completions) {
            log::debug!(
                "CallbackPipeline: '{}' resubmitted; dropping the request from session {}.",
                request.key(),
                previous.session()
            );
            self.pending.retain(|queued| queued.key() != request.key());
        }
        self.pending.push_back(request);
    }
}
