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

//! The loader coordinator drives an [`AssetPipeline`] through a [`Manifest`]
//! and turns the pipeline's completions into progress notifications.
//!
//! The coordinator hands out a [`LoadSession`] that the caller owns. The caller
//! pumps it (typically once per frame) on its own thread; completions that the
//! pipeline reported in the meantime are settled there, and the supplied
//! [`LoadObserver`] is notified in the order they were observed.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use flume::TryRecvError;
use marquee_core::asset::{LoadedAsset, Manifest};
use marquee_core::loading::{
    completion_channel, AssetLoadError, AssetPipeline, Completion, CompletionReceiver, LoadEvent,
    LoadObserver, LoaderState, Progress, SessionAlreadyActiveError, SessionId,
};

#[derive(Debug, Default)]
struct SlotInner {
    state: LoaderState,
    session: Option<SessionId>,
}

/// The lifecycle state shared between a coordinator and the session it started.
#[derive(Debug, Clone, Default)]
struct StateSlot(Arc<Mutex<SlotInner>>);

impl StateSlot {
    fn lock(&self) -> MutexGuard<'_, SlotInner> {
        // The slot only holds plain values, a poisoned lock is still consistent.
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn state(&self) -> LoaderState {
        self.lock().state
    }

    /// Moves to `Loading` for `session`, unless a session is already loading.
    fn claim(&self, session: SessionId) -> Result<(), SessionAlreadyActiveError> {
        let mut inner = self.lock();
        if let (LoaderState::Loading, Some(active)) = (inner.state, inner.session) {
            return Err(SessionAlreadyActiveError { active });
        }
        inner.state = LoaderState::Loading;
        inner.session = Some(session);
        Ok(())
    }

    /// Records the outcome of `session`, if it still owns the slot.
    fn release(&self, session: SessionId, state: LoaderState) {
        let mut inner = self.lock();
        if inner.session == Some(session) {
            inner.state = state;
        }
    }
}

/// Drives an external asset pipeline, one session at a time.
///
/// # Examples
///
/// ```
/// use marquee_core::asset::{AssetRequest, LoadedAsset, Manifest};
/// use marquee_core::loading::{EventLog, LoaderState};
/// use marquee_io::{CallbackPipeline, LoaderCoordinator};
///
/// let manifest = Manifest::new()
///     .with(AssetRequest::image("fastboy", "fastboy.png"))
///     .unwrap();
///
/// let mut coordinator = LoaderCoordinator::new(CallbackPipeline::new());
/// let mut session = coordinator.start(manifest).unwrap();
///
/// // The host engine services the queued request...
/// let pending = coordinator.pipeline_mut().take_pending();
/// for request in pending {
///     let asset = LoadedAsset::new(request.key(), request.kind(), request.primary_source());
///     coordinator.pipeline_mut().resolve_loaded(asset);
/// }
///
/// // ...and the next frame settles it.
/// let mut log = EventLog::new();
/// session.pump(&mut log);
/// assert_eq!(log.progress_values(), vec![1.0]);
/// assert_eq!(coordinator.state(), LoaderState::Complete);
/// ```
pub struct LoaderCoordinator<P: AssetPipeline> {
    pipeline: P,
    slot: StateSlot,
}

impl<P: AssetPipeline> LoaderCoordinator<P> {
    /// Creates an idle coordinator around `pipeline`.
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            slot: StateSlot::default(),
        }
    }

    /// Begins a new session over `manifest`.
    ///
    /// Every request is submitted to the pipeline, in manifest order, before
    /// this returns. Nothing is settled until the session is pumped.
    ///
    /// # Errors
    /// Returns [`SessionAlreadyActiveError`] if the previous session is still
    /// loading. No request is submitted in that case.
    pub fn start(&mut self, manifest: Manifest) -> Result<LoadSession, SessionAlreadyActiveError> {
        let id = SessionId::new();
        self.slot.claim(id).inspect_err(|e| {
            log::warn!("LoaderCoordinator: Rejected new session: {e}");
        })?;

        log::info!(
            "LoaderCoordinator: Starting session {} with {} request(s).",
            id,
            manifest.len()
        );

        let (sender, completions) = completion_channel(id);
        for request in manifest.iter() {
            log::debug!(
                "LoaderCoordinator: Submitting {} '{}' from '{}'.",
                request.kind(),
                request.key(),
                request.primary_source()
            );
            self.pipeline.submit(request.clone(), sender.clone());
        }

        Ok(LoadSession {
            id,
            pending: manifest.keys().map(str::to_string).collect(),
            manifest,
            completed: 0,
            progress: Progress::ZERO,
            state: LoaderState::Loading,
            loaded: Vec::new(),
            failures: Vec::new(),
            abort_cause: None,
            completions,
            slot: self.slot.clone(),
        })
    }

    /// The state of the most recent session.
    pub fn state(&self) -> LoaderState {
        self.slot.state()
    }

    /// Returns `true` while a session is loading.
    pub fn is_loading(&self) -> bool {
        self.state() == LoaderState::Loading
    }

    /// The pipeline this coordinator drives.
    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    /// Mutable access to the pipeline, for hosts that service it directly.
    pub fn pipeline_mut(&mut self) -> &mut P {
        &mut self.pipeline
    }

    /// Consumes the coordinator and returns its pipeline.
    pub fn into_pipeline(self) -> P {
        self.pipeline
    }
}

/// One run of loading a manifest to completion.
///
/// Created by [`LoaderCoordinator::start`] and owned by the caller. The
/// completion counters only ever change inside [`LoadSession::pump`].
///
/// Dropping a session that is still loading abandons it: the coordinator goes
/// back to [`LoaderState::Idle`] and late completions are discarded.
pub struct LoadSession {
    id: SessionId,
    manifest: Manifest,
    pending: HashSet<String>,
    completed: usize,
    progress: Progress,
    state: LoaderState,
    loaded: Vec<LoadedAsset>,
    failures: Vec<AssetLoadError>,
    abort_cause: Option<String>,
    completions: CompletionReceiver,
    slot: StateSlot,
}

impl LoadSession {
    /// Settles every completion that has arrived since the last call.
    ///
    /// Never blocks. For each settled request the observer receives
    /// `ItemLoaded` or `ItemFailed`, then `Progress`; once the last request is
    /// settled it receives a single `Complete`. Returns the number of requests
    /// settled by this call.
    ///
    /// Does nothing once the session is complete or aborted.
    pub fn pump<O: LoadObserver + ?Sized>(&mut self, observer: &mut O) -> usize {
        if self.state != LoaderState::Loading {
            return 0;
        }

        if self.requested() == 0 {
            self.progress = Progress::COMPLETE;
            observer.on_event(&LoadEvent::Progress {
                session: self.id,
                progress: self.progress,
            });
            self.finish(observer);
            return 0;
        }

        let mut settled = 0;
        while self.state == LoaderState::Loading {
            match self.completions.try_recv() {
                Ok(Completion::Item { key, outcome }) => {
                    if self.settle(key, outcome, observer) {
                        settled += 1;
                    }
                }
                Ok(Completion::Fatal { cause }) => self.abort(cause, observer),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    let cause = format!(
                        "asset pipeline disconnected with {} request(s) outstanding",
                        self.pending.len()
                    );
                    self.abort(cause, observer);
                }
            }
        }
        settled
    }

    fn settle<O: LoadObserver + ?Sized>(
        &mut self,
        key: String,
        outcome: Result<LoadedAsset, String>,
        observer: &mut O,
    ) -> bool {
        if !self.pending.remove(&key) {
            if self.manifest.contains(&key) {
                log::warn!(
                    "LoadSession {}: Ignoring repeated completion for '{}'.",
                    self.id,
                    key
                );
            } else {
                log::warn!(
                    "LoadSession {}: Ignoring completion for unknown key '{}'.",
                    self.id,
                    key
                );
            }
            return false;
        }

        self.completed += 1;
        match outcome {
            Ok(asset) => {
                log::debug!(
                    "LoadSession {}: Loaded {} '{}' ({} bytes).",
                    self.id,
                    asset.kind,
                    asset.key,
                    asset.byte_len
                );
                observer.on_event(&LoadEvent::ItemLoaded {
                    session: self.id,
                    asset: asset.clone(),
                });
                self.loaded.push(asset);
            }
            Err(cause) => {
                let error = AssetLoadError::new(key, cause);
                log::warn!("LoadSession {}: {}", self.id, error);
                observer.on_event(&LoadEvent::ItemFailed {
                    session: self.id,
                    error: error.clone(),
                });
                self.failures.push(error);
            }
        }

        self.progress = Progress::from_counts(self.completed, self.requested());
        observer.on_event(&LoadEvent::Progress {
            session: self.id,
            progress: self.progress,
        });

        if self.completed == self.requested() {
            self.finish(observer);
        }
        true
    }

    fn finish<O: LoadObserver + ?Sized>(&mut self, observer: &mut O) {
        self.state = LoaderState::Complete;
        self.slot.release(self.id, LoaderState::Complete);

        log::info!(
            "LoadSession {}: Complete. {} loaded, {} failed.",
            self.id,
            self.loaded.len(),
            self.failures.len()
        );
        observer.on_event(&LoadEvent::Complete {
            session: self.id,
            loaded: self.loaded.len(),
            failed: self.failures.len(),
        });
    }

    fn abort<O: LoadObserver + ?Sized>(&mut self, cause: String, observer: &mut O) {
        self.state = LoaderState::Aborted;
        self.slot.release(self.id, LoaderState::Aborted);

        log::error!(
            "LoadSession {}: Aborted after {}/{} request(s): {}",
            self.id,
            self.completed,
            self.requested(),
            cause
        );
        observer.on_event(&LoadEvent::Aborted {
            session: self.id,
            cause: cause.clone(),
        });
        self.abort_cause = Some(cause);
    }

    /// The session's unique id.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// `Loading` until the session settles, then `Complete` or `Aborted`.
    pub fn state(&self) -> LoaderState {
        self.state
    }

    /// Returns `true` while completions are still expected.
    pub fn is_loading(&self) -> bool {
        self.state == LoaderState::Loading
    }

    /// Returns `true` once the session is complete or aborted.
    pub fn is_settled(&self) -> bool {
        self.state.is_terminal()
    }

    /// The latest published progress value.
    pub fn progress(&self) -> Progress {
        self.progress
    }

    /// How many requests the session submitted.
    pub fn requested(&self) -> usize {
        self.manifest.len()
    }

    /// How many requests have settled so far.
    pub fn completed(&self) -> usize {
        self.completed
    }

    /// The manifest this session works through.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// The assets loaded so far, in completion order.
    pub fn loaded(&self) -> &[LoadedAsset] {
        &self.loaded
    }

    /// The per-asset failures recorded so far, in completion order.
    pub fn failures(&self) -> &[AssetLoadError] {
        &self.failures
    }

    /// Why the session stopped early, if it did.
    pub fn abort_cause(&self) -> Option<&str> {
        self.abort_cause.as_deref()
    }

    /// A snapshot of the session's outcome so far.
    pub fn report(&self) -> LoadReport {
        LoadReport {
            session: self.id,
            state: self.state,
            requested: self.requested(),
            loaded: self.loaded.clone(),
            failures: self.failures.clone(),
            abort_cause: self.abort_cause.clone(),
        }
    }

    /// Consumes the session and returns its outcome.
    pub fn into_report(mut self) -> LoadReport {
        LoadReport {
            session: self.id,
            state: self.state,
            requested: self.requested(),
            loaded: std::mem::take(&mut self.loaded),
            failures: std::mem::take(&mut self.failures),
            abort_cause: self.abort_cause.take(),
        }
    }
}

impl Drop for LoadSession {
    fn drop(&mut self) {
        if self.state == LoaderState::Loading {
            log::warn!(
                "LoadSession {}: Abandoned with {}/{} request(s) settled.",
                self.id,
                self.completed,
                self.requested()
            );
            self.slot.release(self.id, LoaderState::Idle);
        }
    }
}

impl fmt::Debug for LoadSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadSession")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("requested", &self.requested())
            .field("completed", &self.completed)
            .field("progress", &self.progress)
            .finish()
    }
}

/// The outcome of a loading session.
///
/// Its `Display` form is a listing of every loaded asset followed by the
/// failures, for logs and terminal output.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    /// The session this report describes.
    pub session: SessionId,
    /// The session's state when the report was taken.
    pub state: LoaderState,
    /// How many requests the session submitted.
    pub requested: usize,
    /// The loaded assets, in completion order.
    pub loaded: Vec<LoadedAsset>,
    /// The per-asset failures, in completion order.
    pub failures: Vec<AssetLoadError>,
    /// Why the session stopped early, if it did.
    pub abort_cause: Option<String>,
}

impl LoadReport {
    /// Returns `true` if the session completed without a single failure.
    pub fn is_clean(&self) -> bool {
        self.state == LoaderState::Complete && self.failures.is_empty()
    }

    /// The failure recorded for `key`, if any.
    pub fn failure(&self, key: &str) -> Option<&AssetLoadError> {
        self.failures.iter().find(|failure| failure.key == key)
    }

    /// The loaded asset registered under `key`, if any.
    pub fn asset(&self, key: &str) -> Option<&LoadedAsset> {
        self.loaded.iter().find(|asset| asset.key == key)
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Session {} ({:?}): {}/{} loaded",
            self.session,
            self.state,
            self.loaded.len(),
            self.requested
        )?;

        for asset in &self.loaded {
            write!(f, "  {:<12} {:<20} {}", asset.kind.name(), asset.key, asset.source)?;
            if let Some((width, height)) = asset.dimensions {
                write!(f, " {width}x{height}")?;
            }
            if let Some(frames) = asset.frames {
                write!(f, " [{frames} frames]")?;
            }
            writeln!(f, " ({} bytes)", asset.byte_len)?;
        }
        for failure in &self.failures {
            writeln!(f, "  FAILED       {:<20} {}", failure.key, failure.cause)?;
        }
        if let Some(cause) = &self.abort_cause {
            writeln!(f, "  ABORTED: {cause}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_core::asset::{AssetKind, AssetRequest};
    use marquee_core::loading::{CompletionSender, EventLog};

    /// Keeps every submission so the test decides when and how it completes.
    #[derive(Default)]
    struct HeldPipeline {
        held: Vec<(AssetRequest, CompletionSender)>,
    }

    impl AssetPipeline for HeldPipeline {
        fn submit(&mut self, request: AssetRequest, completions: CompletionSender) {
            self.held.push((request, completions));
        }
    }

    fn images(keys: &[&str]) -> Manifest {
        let mut manifest = Manifest::new();
        for key in keys {
            manifest
                .add(AssetRequest::image(*key, format!("{key}.png")))
                .unwrap();
        }
        manifest
    }

    fn succeed(pipeline: &HeldPipeline, index: usize) {
        let (request, sender) = &pipeline.held[index];
        sender.loaded(LoadedAsset::new(
            request.key(),
            request.kind(),
            request.primary_source(),
        ));
    }

    #[test]
    fn start_submits_in_manifest_order() {
        let mut coordinator = LoaderCoordinator::new(HeldPipeline::default());
        let session = coordinator.start(images(&["c", "a", "b"])).unwrap();

        let keys: Vec<&str> = coordinator
            .pipeline()
            .held
            .iter()
            .map(|(request, _)| request.key())
            .collect();
        assert_eq!(keys, ["c", "a", "b"]);
        assert_eq!(session.requested(), 3);
        assert_eq!(session.completed(), 0);
        assert!(coordinator.is_loading());
    }

    #[test]
    fn pump_without_completions_is_a_no_op() {
        let mut coordinator = LoaderCoordinator::new(HeldPipeline::default());
        let mut session = coordinator.start(images(&["a"])).unwrap();
        let mut log = EventLog::new();

        assert_eq!(session.pump(&mut log), 0);
        assert!(log.events().is_empty());
        assert!(session.is_loading());
    }

    #[test]
    fn repeated_and_unknown_completions_are_ignored() {
        let mut coordinator = LoaderCoordinator::new(HeldPipeline::default());
        let mut session = coordinator.start(images(&["a", "b"])).unwrap();
        let mut log = EventLog::new();

        succeed(coordinator.pipeline(), 0);
        succeed(coordinator.pipeline(), 0);
        coordinator.pipeline().held[0].1.failed("ghost", "never requested");

        assert_eq!(session.pump(&mut log), 1);
        assert_eq!(session.completed(), 1);
        assert_eq!(log.progress_values(), vec![0.5]);
        assert!(session.failures().is_empty());
    }

    #[test]
    fn dropping_a_loading_session_returns_to_idle() {
        let mut coordinator = LoaderCoordinator::new(HeldPipeline::default());
        let session = coordinator.start(images(&["a"])).unwrap();
        drop(session);

        assert_eq!(coordinator.state(), LoaderState::Idle);
        assert!(coordinator.start(images(&["b"])).is_ok());
    }

    #[test]
    fn report_listing_names_every_asset() {
        let mut coordinator = LoaderCoordinator::new(HeldPipeline::default());
        let mut session = coordinator.start(images(&["sky", "trees"])).unwrap();

        let (request, sender) = &coordinator.pipeline().held[0];
        sender.loaded(
            LoadedAsset::new(request.key(), AssetKind::Image, request.primary_source())
                .with_dimensions(800, 100)
                .with_byte_len(2048),
        );
        coordinator.pipeline().held[1].1.failed("trees", "file not found");
        session.pump(&mut EventLog::new());

        let listing = session.into_report().to_string();
        assert!(listing.contains("1/2 loaded"));
        assert!(listing.contains("sky.png 800x100 (2048 bytes)"));
        assert!(listing.contains("FAILED"));
        assert!(listing.contains("file not found"));
    }
}
