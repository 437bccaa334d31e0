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

use super::{AssetLoadError, Progress, SessionId};
use crate::asset::LoadedAsset;
use crate::event::EventBus;

/// A notification raised by a loading session.
///
/// For every settled request a session emits either [`LoadEvent::ItemLoaded`]
/// or [`LoadEvent::ItemFailed`], immediately followed by
/// [`LoadEvent::Progress`]. After the last request it emits exactly one
/// [`LoadEvent::Complete`]. A session the pipeline gives up on ends with
/// [`LoadEvent::Aborted`] instead.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadEvent {
    /// One request finished successfully.
    ItemLoaded {
        /// The session the request belongs to.
        session: SessionId,
        /// What the pipeline reported.
        asset: LoadedAsset,
    },
    /// One request failed. The session carries on.
    ItemFailed {
        /// The session the request belongs to.
        session: SessionId,
        /// The failure.
        error: AssetLoadError,
    },
    /// The overall progress changed. Values never decrease within a session.
    Progress {
        /// The session that progressed.
        session: SessionId,
        /// The new progress value.
        progress: Progress,
    },
    /// Every request settled. Raised once per session, after its last
    /// progress event.
    Complete {
        /// The session that finished.
        session: SessionId,
        /// How many requests succeeded.
        loaded: usize,
        /// How many requests failed.
        failed: usize,
    },
    /// The pipeline reported a fatal condition; the session stopped early.
    Aborted {
        /// The session that stopped.
        session: SessionId,
        /// Why it stopped.
        cause: String,
    },
}

impl LoadEvent {
    /// The session this event belongs to.
    pub fn session(&self) -> SessionId {
        match self {
            LoadEvent::ItemLoaded { session, .. }
            | LoadEvent::ItemFailed { session, .. }
            | LoadEvent::Progress { session, .. }
            | LoadEvent::Complete { session, .. }
            | LoadEvent::Aborted { session, .. } => *session,
        }
    }

    /// Returns `true` for the events that end a session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoadEvent::Complete { .. } | LoadEvent::Aborted { .. })
    }
}

/// Receives the notifications of a loading session.
///
/// Observers are called on the thread that pumps the session, in the order
/// the session observed the completions.
pub trait LoadObserver {
    /// Handles one notification.
    fn on_event(&mut self, event: &LoadEvent);
}

impl<O: LoadObserver + ?Sized> LoadObserver for &mut O {
    fn on_event(&mut self, event: &LoadEvent) {
        (**self).on_event(event);
    }
}

impl<O: LoadObserver + ?Sized> LoadObserver for Box<O> {
    fn on_event(&mut self, event: &LoadEvent) {
        (**self).on_event(event);
    }
}

/// Fans every notification out to each observer, in order.
impl LoadObserver for Vec<Box<dyn LoadObserver>> {
    fn on_event(&mut self, event: &LoadEvent) {
        for observer in self.iter_mut() {
            observer.on_event(event);
        }
    }
}

/// Forwards notifications to whoever holds the bus's receiver.
impl LoadObserver for EventBus<LoadEvent> {
    fn on_event(&mut self, event: &LoadEvent) {
        self.publish(event.clone());
    }
}

/// An observer that simply records what it sees.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<LoadEvent>,
}

impl EventLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded event, oldest first.
    pub fn events(&self) -> &[LoadEvent] {
        &self.events
    }

    /// The recorded progress values, oldest first.
    pub fn progress_values(&self) -> Vec<f32> {
        self.events
            .iter()
            .filter_map(|event| match event {
                LoadEvent::Progress { progress, .. } => Some(progress.value()),
                _ => None,
            })
            .collect()
    }

    /// How many `Complete` events were recorded.
    pub fn completions(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, LoadEvent::Complete { .. }))
            .count()
    }

    /// Clears the log.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl LoadObserver for EventLog {
    fn on_event(&mut self, event: &LoadEvent) {
        self.events.push(event.clone());
    }
}
