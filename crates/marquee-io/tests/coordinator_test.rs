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

use anyhow::Result;
use approx::assert_relative_eq;
use marquee_core::asset::{AssetKind, AssetRequest, LoadedAsset, Manifest};
use marquee_core::event::EventBus;
use marquee_core::loading::{AssetPipeline, CompletionSender, EventLog, LoadEvent, LoaderState};
use marquee_io::{CallbackPipeline, LoaderCoordinator};

fn images(keys: &[&str]) -> Result<Manifest> {
    let mut manifest = Manifest::new();
    for key in keys {
        manifest.add(AssetRequest::image(*key, format!("{key}.png")))?;
    }
    Ok(manifest)
}

/// Resolves `key` as loaded, the way a host engine would.
fn load(coordinator: &mut LoaderCoordinator<CallbackPipeline>, key: &str) {
    let asset = LoadedAsset::new(key, AssetKind::Image, format!("{key}.png"));
    assert!(coordinator.pipeline_mut().resolve_loaded(asset));
}

#[test]
fn four_images_report_quarter_steps_then_complete_once() -> Result<()> {
    // --- 1. Setup ---
    let mut coordinator = LoaderCoordinator::new(CallbackPipeline::new());
    let mut session = coordinator.start(images(&["a", "b", "c", "d"])?)?;
    let mut log = EventLog::new();

    // --- 2. Settle one completion per frame ---
    for key in ["a", "b", "c", "d"] {
        load(&mut coordinator, key);
        assert_eq!(session.pump(&mut log), 1);
    }

    // --- 3. Assert ---
    let progress = log.progress_values();
    assert_eq!(progress.len(), 4);
    for (value, expected) in progress.iter().zip([0.25_f32, 0.5, 0.75, 1.0]) {
        assert_relative_eq!(*value, expected);
    }
    assert_eq!(log.completions(), 1);
    assert!(matches!(
        log.events().last(),
        Some(LoadEvent::Complete {
            loaded: 4,
            failed: 0,
            ..
        })
    ));
    assert_eq!(session.state(), LoaderState::Complete);
    assert_eq!(coordinator.state(), LoaderState::Complete);

    // Further pumps stay silent.
    assert_eq!(session.pump(&mut log), 0);
    assert_eq!(log.events().len(), 4 * 2 + 1);
    Ok(())
}

#[test]
fn a_failed_item_is_recorded_and_the_session_still_completes() -> Result<()> {
    let mut coordinator = LoaderCoordinator::new(CallbackPipeline::new());
    let mut session = coordinator.start(images(&["sky", "trees"])?)?;
    let mut log = EventLog::new();

    coordinator
        .pipeline_mut()
        .resolve_failed("trees", "404 Not Found");
    session.pump(&mut log);
    load(&mut coordinator, "sky");
    session.pump(&mut log);

    assert_eq!(log.progress_values(), vec![0.5, 1.0]);
    assert_eq!(log.completions(), 1);
    assert!(matches!(log.events()[0], LoadEvent::ItemFailed { .. }));

    let report = session.into_report();
    assert!(!report.is_clean());
    assert_eq!(report.state, LoaderState::Complete);
    let failure = report.failure("trees").expect("failure is recorded");
    assert_eq!(failure.cause, "404 Not Found");
    assert!(report.asset("sky").is_some());
    Ok(())
}

#[test]
fn completions_settle_in_the_order_they_arrive() -> Result<()> {
    let mut coordinator = LoaderCoordinator::new(CallbackPipeline::new());
    let mut session = coordinator.start(images(&["first", "second", "third"])?)?;
    let mut log = EventLog::new();

    load(&mut coordinator, "third");
    load(&mut coordinator, "first");
    load(&mut coordinator, "second");
    assert_eq!(session.pump(&mut log), 3);

    let keys: Vec<&str> = session.loaded().iter().map(|asset| asset.key.as_str()).collect();
    assert_eq!(keys, ["third", "first", "second"]);
    let progress = log.progress_values();
    assert!(progress.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(log.completions(), 1);
    Ok(())
}

#[test]
fn starting_while_loading_is_rejected_without_submitting() -> Result<()> {
    let mut coordinator = LoaderCoordinator::new(CallbackPipeline::new());
    let session = coordinator.start(images(&["a"])?)?;
    assert_eq!(coordinator.pipeline_mut().take_pending().len(), 1);

    let err = coordinator.start(images(&["b"])?).unwrap_err();
    assert_eq!(err.active, session.id());
    assert!(coordinator.pipeline_mut().take_pending().is_empty());
    assert_eq!(coordinator.state(), LoaderState::Loading);
    Ok(())
}

#[test]
fn a_completed_coordinator_accepts_a_new_session() -> Result<()> {
    let mut coordinator = LoaderCoordinator::new(CallbackPipeline::new());
    let mut first = coordinator.start(images(&["a"])?)?;
    load(&mut coordinator, "a");
    first.pump(&mut EventLog::new());
    assert!(first.is_settled());

    let second = coordinator.start(images(&["a"])?)?;
    assert_ne!(first.id(), second.id());
    assert_eq!(coordinator.state(), LoaderState::Loading);
    Ok(())
}

#[test]
fn an_empty_manifest_completes_on_the_first_pump() -> Result<()> {
    let mut coordinator = LoaderCoordinator::new(CallbackPipeline::new());
    let mut session = coordinator.start(Manifest::new())?;
    let mut log = EventLog::new();

    session.pump(&mut log);
    session.pump(&mut log);

    assert_eq!(log.progress_values(), vec![1.0]);
    assert_eq!(log.completions(), 1);
    assert_eq!(coordinator.state(), LoaderState::Complete);
    Ok(())
}

#[test]
fn a_fatal_condition_aborts_and_allows_a_restart() -> Result<()> {
    let mut coordinator = LoaderCoordinator::new(CallbackPipeline::new());
    let mut session = coordinator.start(images(&["a", "b"])?)?;
    let mut log = EventLog::new();

    load(&mut coordinator, "a");
    coordinator.pipeline_mut().fail_fatally("disk unplugged");
    session.pump(&mut log);

    assert_eq!(log.progress_values(), vec![0.5]);
    assert_eq!(log.completions(), 0);
    assert!(matches!(
        log.events().last(),
        Some(LoadEvent::Aborted { cause, .. }) if cause == "disk unplugged"
    ));
    assert_eq!(session.state(), LoaderState::Aborted);
    assert_eq!(session.abort_cause(), Some("disk unplugged"));
    assert_eq!(coordinator.state(), LoaderState::Aborted);

    assert!(coordinator.start(images(&["a", "b"])?).is_ok());
    Ok(())
}

/// A pipeline that accepts requests and immediately forgets them.
struct ForgetfulPipeline;

impl AssetPipeline for ForgetfulPipeline {
    fn submit(&mut self, _request: AssetRequest, _completions: CompletionSender) {}
}

#[test]
fn a_pipeline_that_drops_every_sender_aborts_the_session() -> Result<()> {
    let mut coordinator = LoaderCoordinator::new(ForgetfulPipeline);
    let mut session = coordinator.start(images(&["a", "b"])?)?;
    let mut log = EventLog::new();

    session.pump(&mut log);

    assert_eq!(session.state(), LoaderState::Aborted);
    assert!(log.progress_values().is_empty());
    assert!(matches!(log.events(), [LoadEvent::Aborted { .. }]));
    Ok(())
}

#[test]
fn events_can_be_forwarded_over_a_bus() -> Result<()> {
    let mut coordinator = LoaderCoordinator::new(CallbackPipeline::new());
    let mut session = coordinator.start(images(&["a"])?)?;
    let mut bus = EventBus::<LoadEvent>::new();

    load(&mut coordinator, "a");
    session.pump(&mut bus);

    let events = bus.drain();
    assert_eq!(events.len(), 3);
    assert!(events.iter().all(|event| event.session() == session.id()));
    assert!(events[2].is_terminal());
    Ok(())
}
