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

use super::probe;
use marquee_core::asset::{AssetKind, AssetRequest, LoadedAsset};
use marquee_core::loading::{AssetPipeline, CompletionSender};
use std::io;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors raised while loading assets from the filesystem.
#[derive(Debug, Error)]
pub enum FsLoadError {
    /// The asset root does not exist or is not a directory.
    #[error("asset root '{}' is not a directory", .0.display())]
    MissingRoot(PathBuf),
    /// A source file could not be read.
    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        /// The file being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A source file exists but holds no data.
    #[error("'{}' is empty", .0.display())]
    Empty(PathBuf),
    /// A texture's header could not be decoded.
    #[error("failed to decode image '{}': {source}", .path.display())]
    Image {
        /// The texture file.
        path: PathBuf,
        /// The decoder error.
        #[source]
        source: image::ImageError,
    },
    /// The spritesheet image is too small for the frames it should provide.
    #[error("spritesheet {width}x{height} provides {available} frame(s), {requested} requested")]
    NotEnoughFrames {
        /// Image width in pixels.
        width: u32,
        /// Image height in pixels.
        height: u32,
        /// Frames that fit in the image.
        available: u32,
        /// Frames the request selected.
        requested: u32,
    },
    /// An atlas data file is not valid JSON.
    #[error("failed to parse atlas data '{}': {source}", .path.display())]
    AtlasData {
        /// The data file.
        path: PathBuf,
        /// The parser error.
        #[source]
        source: serde_json::Error,
    },
    /// An atlas data file is valid JSON but declares no frames.
    #[error("atlas data '{}' declares no frames", .0.display())]
    AtlasFormat(PathBuf),
    /// Every source of a request with fallbacks failed.
    #[error("no readable source among [{}]; last error: {last}", .tried.join(", "))]
    NoSource {
        /// The locations that were tried, in order.
        tried: Vec<String>,
        /// The error from the last location.
        last: Box<FsLoadError>,
    },
    /// A worker thread could not be spawned.
    #[error("failed to spawn loader worker: {0}")]
    Spawn(#[source] io::Error),
}

struct Job {
    request: AssetRequest,
    completions: CompletionSender,
}

/// A pipeline that loads assets from disk on a pool of worker threads.
///
/// Source locations are resolved against the asset root. Texture kinds have
/// their headers probed (and spritesheets and atlases checked for frames),
/// audio and video fall back through their alternative sources in order.
///
/// A missing file is a per-asset failure. An asset root that disappears, or a
/// worker pool that is gone, is fatal for the session.
///
/// Dropping the pipeline waits up to [`FsPipeline::SHUTDOWN_GRACE`] for the
/// workers to exit. A worker still blocked on a read after that is detached
/// and exits once the read returns.
pub struct FsPipeline {
    root: PathBuf,
    jobs: Option<flume::Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl FsPipeline {
    /// The number of workers used by [`FsPipeline::new`].
    pub const DEFAULT_WORKERS: usize = 4;

    /// How long dropping the pipeline waits for busy workers.
    pub const SHUTDOWN_GRACE: Duration = Duration::from_millis(100);

    /// Creates a pipeline rooted at `root` with the default number of workers.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, FsLoadError> {
        Self::with_workers(root, Self::DEFAULT_WORKERS)
    }

    /// Creates a pipeline rooted at `root` with `workers` threads (at least one).
    ///
    /// # Errors
    /// Returns [`FsLoadError::MissingRoot`] if `root` is not a directory, or
    /// [`FsLoadError::Spawn`] if a worker thread cannot be started.
    pub fn with_workers(root: impl Into<PathBuf>, workers: usize) -> Result<Self, FsLoadError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(FsLoadError::MissingRoot(root));
        }

        let (jobs, queue) = flume::unbounded::<Job>();
        let mut handles = Vec::with_capacity(workers.max(1));
        for index in 0..workers.max(1) {
            let queue = queue.clone();
            let root = root.clone();
            let handle = thread::Builder::new()
                .name(format!("marquee-io-{index}"))
                .spawn(move || run_worker(&root, queue))
                .map_err(FsLoadError::Spawn)?;
            handles.push(handle);
        }

        log::info!(
            "FsPipeline: {} worker(s) loading from '{}'.",
            handles.len(),
            root.display()
        );

        Ok(Self {
            root,
            jobs: Some(jobs),
            workers: handles,
        })
    }

    /// The directory sources are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The number of worker threads.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }
}

impl AssetPipeline for FsPipeline {
    fn submit(&mut self, request: AssetRequest, completions: CompletionSender) {
        let Some(jobs) = &self.jobs else {
            completions.fatal("filesystem pipeline is shut down");
            return;
        };

        if let Err(flume::SendError(job)) = jobs.send(Job {
            request,
            completions,
        }) {
            job.completions.fatal("filesystem pipeline workers have stopped");
        }
    }
}

impl Drop for FsPipeline {
    fn drop(&mut self) {
        // Closing the queue lets every worker finish its current job and exit.
        self.jobs.take();
        let deadline = Instant::now() + Self::SHUTDOWN_GRACE;
        for handle in self.workers.drain(..) {
            while !handle.is_finished() && Instant::now() < deadline {
                thread::sleep(Duration::from_millis(1));
            }
            if !handle.is_finished() {
                let name = handle.thread().name().unwrap_or("unnamed").to_string();
                log::debug!("FsPipeline: Detaching busy worker '{name}'.");
                continue;
            }
            if handle.join().is_err() {
                log::error!("FsPipeline: A worker thread panicked.");
            }
        }
    }
}

fn run_worker(root: &Path, queue: flume::Receiver<Job>) {
    for Job {
        request,
        completions,
    } in queue.iter()
    {
        if completions.is_closed() {
            log::trace!(
                "FsPipeline: Skipping '{}', session {} is gone.",
                request.key(),
                completions.session()
            );
            continue;
        }
        if !root.is_dir() {
            completions.fatal(FsLoadError::MissingRoot(root.to_path_buf()).to_string());
            continue;
        }

        match load_request(root, &request) {
            Ok(asset) => {
                completions.loaded(asset);
            }
            Err(e) => {
                completions.failed(request.key(), e.to_string());
            }
        }
    }
    log::trace!("FsPipeline: Worker exiting.");
}

/// Loads one request from disk, synchronously.
pub fn load_request(root: &Path, request: &AssetRequest) -> Result<LoadedAsset, FsLoadError> {
    let key = request.key();
    match request.kind() {
        AssetKind::Image => {
            let (source, bytes) = read_source(root, request.primary_source())?;
            let (width, height) = probe::image_dimensions(&root.join(&source), &bytes)?;
            Ok(LoadedAsset::new(key, AssetKind::Image, source)
                .with_byte_len(bytes.len() as u64)
                .with_dimensions(width, height))
        }
        AssetKind::Spritesheet => {
            let (source, bytes) = read_source(root, request.primary_source())?;
            let (width, height) = probe::image_dimensions(&root.join(&source), &bytes)?;

            let available = request
                .spritesheet_options()
                .map_or(0, |options| options.frames_in(width, height));
            let requested = request
                .spritesheet_options()
                .and_then(|options| options.frame_count())
                .unwrap_or(available);
            if requested == 0 || requested > available {
                return Err(FsLoadError::NotEnoughFrames {
                    width,
                    height,
                    available,
                    requested,
                });
            }

            Ok(LoadedAsset::new(key, AssetKind::Spritesheet, source)
                .with_byte_len(bytes.len() as u64)
                .with_dimensions(width, height)
                .with_frames(requested))
        }
        AssetKind::Atlas => {
            let (source, texture) = read_source(root, request.primary_source())?;
            let (width, height) = probe::image_dimensions(&root.join(&source), &texture)?;

            let data_source = request.atlas_data_source().unwrap_or_default();
            let (data_source, data) = read_source(root, data_source)?;
            let frames = probe::atlas_frame_count(&root.join(&data_source), &data)?;

            Ok(LoadedAsset::new(key, AssetKind::Atlas, source)
                .with_byte_len((texture.len() + data.len()) as u64)
                .with_dimensions(width, height)
                .with_frames(frames))
        }
        AssetKind::Audio | AssetKind::Video => {
            let (source, bytes) = read_first_available(root, request.sources())?;
            Ok(LoadedAsset::new(key, request.kind(), source).with_byte_len(bytes.len() as u64))
        }
    }
}

fn read_source(root: &Path, source: &str) -> Result<(String, Vec<u8>), FsLoadError> {
    let path = root.join(source);
    let bytes = std::fs::read(&path).map_err(|e| FsLoadError::Io {
        path: path.clone(),
        source: e,
    })?;
    if bytes.is_empty() {
        return Err(FsLoadError::Empty(path));
    }
    Ok((source.to_string(), bytes))
}

fn read_first_available(root: &Path, sources: &[String]) -> Result<(String, Vec<u8>), FsLoadError> {
    let mut last = None;
    for source in sources {
        match read_source(root, source) {
            Ok(found) => return Ok(found),
            Err(e) => {
                log::debug!("FsPipeline: Source '{source}' unavailable ({e}), trying next.");
                last = Some(e);
            }
        }
    }

    match (sources.len(), last) {
        (1, Some(e)) => Err(e),
        (_, Some(e)) => Err(FsLoadError::NoSource {
            tried: sources.to_vec(),
            last: Box::new(e),
        }),
        (_, None) => Err(FsLoadError::NoSource {
            tried: Vec::new(),
            last: Box::new(FsLoadError::Empty(root.to_path_buf())),
        }),
    }
}
