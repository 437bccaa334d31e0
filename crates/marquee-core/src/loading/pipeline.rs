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

use super::SessionId;
use crate::asset::{AssetRequest, LoadedAsset};

/// The outcome of one request, as reported by a pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// A request settled, successfully or not.
    Item {
        /// The key of the request.
        key: String,
        /// The loaded asset, or a description of the failure.
        outcome: Result<LoadedAsset, String>,
    },
    /// The pipeline cannot make progress on anything anymore.
    Fatal {
        /// What went wrong.
        cause: String,
    },
}

/// The receiving half of a session's completion channel.
pub type CompletionReceiver = flume::Receiver<Completion>;

/// The handle a pipeline uses to report completions back to a session.
///
/// It is cheap to clone and can be moved to any thread. Reporting never
/// blocks; if the session has already been dropped, the report is discarded.
#[derive(Debug, Clone)]
pub struct CompletionSender {
    session: SessionId,
    sender: flume::Sender<Completion>,
}

impl CompletionSender {
    /// The session these completions belong to.
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Returns `true` once the session stopped listening, so pending work for
    /// it can be skipped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_disconnected()
    }

    /// Reports a successful load.
    pub fn loaded(&self, asset: LoadedAsset) -> bool {
        self.send(Completion::Item {
            key: asset.key.clone(),
            outcome: Ok(asset),
        })
    }

    /// Reports a failed load for `key`.
    pub fn failed(&self, key: impl Into<String>, cause: impl Into<String>) -> bool {
        self.send(Completion::Item {
            key: key.into(),
            outcome: Err(cause.into()),
        })
    }

    /// Reports a condition that stops the whole session.
    pub fn fatal(&self, cause: impl Into<String>) -> bool {
        self.send(Completion::Fatal {
            cause: cause.into(),
        })
    }

    /// Sends a completion. Returns `false` if the session is gone.
    pub fn send(&self, completion: Completion) -> bool {
        match self.sender.send(completion) {
            Ok(()) => true,
            Err(_) => {
                log::debug!(
                    "Completion for session {} discarded: session no longer listening.",
                    self.session
                );
                false
            }
        }
    }
}

/// Creates the completion channel for a new session.
pub fn completion_channel(session: SessionId) -> (CompletionSender, CompletionReceiver) {
    let (sender, receiver) = flume::unbounded();
    (CompletionSender { session, sender }, receiver)
}

/// The external asset pipeline a loader coordinator drives.
///
/// This is the seam between the coordinator and whatever actually performs
/// I/O and decoding (a host engine, a worker pool, a network client). The
/// coordinator hands over each request together with a [`CompletionSender`];
/// the pipeline must eventually report exactly one completion per request,
/// from any thread, in any order.
///
/// `submit` must not block on the load itself.
pub trait AssetPipeline {
    /// Queues one request for loading.
    fn submit(&mut self, request: AssetRequest, completions: CompletionSender);
}

impl<P: AssetPipeline + ?Sized> AssetPipeline for Box<P> {
    fn submit(&mut self, request: AssetRequest, completions: CompletionSender) {
        (**self).submit(request, completions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetKind;

    #[test]
    fn sender_reports_reach_the_receiver() {
        let session = SessionId::new();
        let (sender, receiver) = completion_channel(session);
        assert_eq!(sender.session(), session);

        assert!(sender.loaded(LoadedAsset::new("a", AssetKind::Image, "a.png")));
        assert!(sender.failed("b", "not found"));
        assert!(sender.fatal("disk gone"));

        let received: Vec<Completion> = receiver.try_iter().collect();
        assert_eq!(received.len(), 3);
        assert!(matches!(&received[0], Completion::Item { key, outcome: Ok(_) } if key == "a"));
        assert_eq!(
            received[1],
            Completion::Item {
                key: "b".to_string(),
                outcome: Err("not found".to_string()),
            }
        );
        assert!(matches!(&received[2], Completion::Fatal { cause } if cause == "disk gone"));
    }

    #[test]
    fn reports_after_session_drop_are_discarded() {
        let (sender, receiver) = completion_channel(SessionId::new());
        assert!(!sender.is_closed());
        drop(receiver);
        assert!(sender.is_closed());
        assert!(!sender.failed("late", "too late"));
    }
}
