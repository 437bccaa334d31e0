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

// Marquee sandbox
// Preloads a scene's assets from disk behind a terminal progress bar, then
// prints what was loaded.

mod scene;

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use marquee_core::asset::Manifest;
use marquee_core::loading::LoaderState;
use marquee_io::{scan_directory, FsPipeline, LoaderCoordinator, ManifestFile};
use marquee_ui::{BarStyle, ProgressPresenter, TerminalSurface};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Load the assets declared in this RON manifest file.
    #[arg(short, long, conflicts_with = "scan")]
    manifest: Option<PathBuf>,

    /// Load every asset found under this directory.
    #[arg(short, long)]
    scan: Option<PathBuf>,

    /// Asset directory for the built-in demo scene.
    #[arg(long, default_value = scene::DEFAULT_ASSET_DIR)]
    assets: PathBuf,

    /// Number of loader threads.
    #[arg(short, long, default_value_t = FsPipeline::DEFAULT_WORKERS)]
    workers: usize,

    /// Give up on the session after this many seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Milliseconds between two pumps of the session.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
}

/// Picks the manifest to load and the directory its sources are relative to.
fn resolve_manifest(args: &Args) -> Result<(Manifest, PathBuf)> {
    if let Some(path) = &args.manifest {
        let resolved = ManifestFile::load(path)
            .with_context(|| format!("Failed to load manifest '{}'", path.display()))?;
        return Ok((resolved.manifest, resolved.base_path));
    }

    if let Some(dir) = &args.scan {
        let manifest = scan_directory(dir)
            .with_context(|| format!("Failed to scan '{}'", dir.display()))?;
        return Ok((manifest, dir.clone()));
    }

    let manifest = scene::scene_manifest().context("Failed to build the demo scene")?;
    Ok((manifest, args.assets.clone()))
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let (manifest, base_path) = resolve_manifest(&args)?;
    let pipeline = FsPipeline::with_workers(&base_path, args.workers).with_context(|| {
        format!("Failed to open asset directory '{}'", base_path.display())
    })?;

    let mut coordinator = LoaderCoordinator::new(pipeline);
    let mut session = coordinator.start(manifest)?;

    let style = BarStyle::default();
    let surface = TerminalSurface::new(style.full_width).with_message("Loading");
    let mut presenter = ProgressPresenter::with_style(surface, style);

    let frame = Duration::from_millis(args.frame_ms);
    let timeout = args.timeout_secs.map(Duration::from_secs);
    let started = Instant::now();
    loop {
        session.pump(&mut presenter);
        if session.is_settled() {
            break;
        }
        if timeout.is_some_and(|limit| started.elapsed() > limit) {
            log::error!(
                "Sandbox: Timed out with {}/{} asset(s) settled.",
                session.completed(),
                session.requested()
            );
            break;
        }
        thread::sleep(frame);
    }

    let report = session.into_report();
    println!("{report}");
    log::info!("Sandbox: Finished in {:.2?}.", started.elapsed());

    match report.state {
        LoaderState::Complete if report.is_clean() => Ok(()),
        LoaderState::Complete => {
            log::warn!("Sandbox: {} asset(s) failed to load.", report.failures.len());
            Ok(())
        }
        LoaderState::Aborted => bail!(
            "Loading aborted: {}",
            report.abort_cause.as_deref().unwrap_or("unknown cause")
        ),
        LoaderState::Idle | LoaderState::Loading => bail!("Loading did not finish in time"),
    }
}
