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

use anyhow::{bail, Result};
use image::RgbaImage;
use marquee_core::asset::{AssetKind, AssetRequest, Manifest, SpritesheetOptions, VideoOptions};
use marquee_core::loading::{completion_channel, AssetPipeline, EventLog, LoaderState, SessionId};
use marquee_io::{FsLoadError, FsPipeline, LoadSession, LoaderCoordinator};
use std::fs;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::tempdir;

/// Pumps `session` until it settles, failing after a few seconds.
fn pump_until_settled(session: &mut LoadSession, log: &mut EventLog) -> Result<()> {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !session.is_settled() {
        session.pump(log);
        if Instant::now() > deadline {
            bail!("session did not settle: {session:?}");
        }
        thread::sleep(Duration::from_millis(2));
    }
    Ok(())
}

fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> Result<()> {
    RgbaImage::new(width, height).save(dir.join(name))?;
    Ok(())
}

#[test]
fn loads_every_kind_from_disk() -> Result<()> {
    // --- 1. Setup: a small asset directory ---
    let dir = tempdir()?;
    write_png(dir.path(), "fastboy.png", 64, 32)?;
    write_png(dir.path(), "pinkhover.png", 400, 200)?;
    write_png(dir.path(), "fruitandveg.png", 128, 128)?;
    fs::write(
        dir.path().join("fruitandveg.json"),
        r#"{"frames": {"grapes": {}, "tomato": {}, "leek": {}}, "meta": {}}"#,
    )?;
    fs::write(dir.path().join("jumpSFX.wav"), b"RIFF....WAVE")?;
    fs::write(dir.path().join("hypnotic.mp4"), b"....ftypisom")?;

    let manifest = Manifest::new()
        .with(AssetRequest::image("fastboy", "fastboy.png"))?
        .with(AssetRequest::spritesheet(
            "pinkhover",
            "pinkhover.png",
            SpritesheetOptions::new(100, 100).with_end_frame(7),
        ))?
        .with(AssetRequest::atlas(
            "fruitandveg",
            "fruitandveg.png",
            "fruitandveg.json",
        ))?
        .with(AssetRequest::audio("jump", "jumpSFX.wav"))?
        .with(AssetRequest::video(
            "hypnotic",
            "hypnotic.mp4",
            VideoOptions::default(),
        ))?;

    // --- 2. Load ---
    let mut coordinator = LoaderCoordinator::new(FsPipeline::with_workers(dir.path(), 2)?);
    let mut session = coordinator.start(manifest)?;
    let mut log = EventLog::new();
    pump_until_settled(&mut session, &mut log)?;

    // --- 3. Assert ---
    let report = session.into_report();
    assert!(report.is_clean(), "{report}");
    assert_eq!(log.completions(), 1);

    let fastboy = report.asset("fastboy").expect("fastboy loaded");
    assert_eq!(fastboy.dimensions, Some((64, 32)));

    let sheet = report.asset("pinkhover").expect("pinkhover loaded");
    assert_eq!(sheet.kind, AssetKind::Spritesheet);
    assert_eq!(sheet.frames, Some(8));

    let atlas = report.asset("fruitandveg").expect("atlas loaded");
    assert_eq!(atlas.frames, Some(3));

    assert_eq!(report.asset("jump").map(|a| a.byte_len), Some(12));
    assert_eq!(report.asset("hypnotic").map(|a| a.kind), Some(AssetKind::Video));
    Ok(())
}

#[test]
fn missing_files_fail_per_item_and_fallbacks_are_tried() -> Result<()> {
    let dir = tempdir()?;
    write_png(dir.path(), "sky.png", 8, 8)?;
    fs::write(dir.path().join("rail.ogg"), b"OggS")?;

    let manifest = Manifest::new()
        .with(AssetRequest::image("sky", "sky.png"))?
        .with(AssetRequest::image("mountains", "mountains.png"))?
        .with(AssetRequest::audio_with_fallbacks(
            "rail",
            "railonnines.mp3",
            ["rail.ogg"],
        ))?;

    let mut coordinator = LoaderCoordinator::new(FsPipeline::new(dir.path())?);
    let mut session = coordinator.start(manifest)?;
    let mut log = EventLog::new();
    pump_until_settled(&mut session, &mut log)?;

    assert_eq!(session.state(), LoaderState::Complete);
    assert_eq!(log.progress_values().last().copied(), Some(1.0));

    let report = session.report();
    assert_eq!(report.loaded.len(), 2);
    assert!(report.failure("mountains").is_some());
    assert_eq!(report.asset("rail").map(|a| a.source.as_str()), Some("rail.ogg"));
    Ok(())
}

#[test]
fn undersized_spritesheets_are_rejected() -> Result<()> {
    let dir = tempdir()?;
    write_png(dir.path(), "pinkhover.png", 200, 100)?;

    let request = AssetRequest::spritesheet(
        "pinkhover",
        "pinkhover.png",
        SpritesheetOptions::new(100, 100).with_end_frame(7),
    );
    let result = marquee_io::pipeline::load_request(dir.path(), &request);

    assert!(matches!(
        result,
        Err(FsLoadError::NotEnoughFrames {
            available: 2,
            requested: 8,
            ..
        })
    ));
    Ok(())
}

#[test]
fn a_missing_root_is_rejected_up_front() {
    let dir = tempdir().unwrap();
    let result = FsPipeline::new(dir.path().join("assets"));
    assert!(matches!(result, Err(FsLoadError::MissingRoot(_))));
}

#[test]
fn a_vanished_root_aborts_the_session() -> Result<()> {
    let dir = tempdir()?;
    let root = dir.path().join("assets");
    fs::create_dir(&root)?;
    write_png(&root, "sky.png", 8, 8)?;

    let mut coordinator = LoaderCoordinator::new(FsPipeline::with_workers(&root, 1)?);
    fs::remove_dir_all(&root)?;

    let manifest = Manifest::new().with(AssetRequest::image("sky", "sky.png"))?;
    let mut session = coordinator.start(manifest)?;
    let mut log = EventLog::new();
    pump_until_settled(&mut session, &mut log)?;

    assert_eq!(session.state(), LoaderState::Aborted);
    assert_eq!(log.completions(), 0);
    assert_eq!(coordinator.state(), LoaderState::Aborted);
    Ok(())
}

#[cfg(unix)]
#[test]
fn dropping_the_pipeline_does_not_wait_for_a_blocked_read() -> Result<()> {
    // --- 1. Setup ---
    // Opening a FIFO with no writer blocks the worker that reads it.
    let dir = tempdir()?;
    let status = std::process::Command::new("mkfifo")
        .arg(dir.path().join("stream.ogg"))
        .status()?;
    if !status.success() {
        bail!("mkfifo failed: {status}");
    }

    let mut pipeline = FsPipeline::with_workers(dir.path(), 1)?;
    let (sender, receiver) = completion_channel(SessionId::new());
    pipeline.submit(AssetRequest::audio("stream", "stream.ogg"), sender);
    thread::sleep(Duration::from_millis(20));

    // --- 2. Abandon the session and drop the pipeline ---
    drop(receiver);
    let started = Instant::now();
    drop(pipeline);

    // --- 3. Verification ---
    assert!(started.elapsed() < Duration::from_secs(2));
    Ok(())
}
