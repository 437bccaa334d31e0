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

use super::AssetKind;
use serde::{Deserialize, Serialize};

/// Slicing parameters for a spritesheet image.
///
/// Frames are laid out left to right, top to bottom. `margin` is the padding
/// around the whole sheet and `spacing` the gap between neighbouring frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpritesheetOptions {
    /// Width of one frame, in pixels.
    pub frame_width: u32,
    /// Height of one frame, in pixels.
    pub frame_height: u32,
    /// Index of the first frame to keep.
    #[serde(default)]
    pub start_frame: u32,
    /// Index of the last frame to keep (inclusive). `None` keeps every frame
    /// that fits in the image.
    #[serde(default)]
    pub end_frame: Option<u32>,
    /// Padding around the sheet, in pixels.
    #[serde(default)]
    pub margin: u32,
    /// Gap between frames, in pixels.
    #[serde(default)]
    pub spacing: u32,
}

impl SpritesheetOptions {
    /// Creates options for frames of the given size, keeping every frame.
    pub fn new(frame_width: u32, frame_height: u32) -> Self {
        Self {
            frame_width,
            frame_height,
            start_frame: 0,
            end_frame: None,
            margin: 0,
            spacing: 0,
        }
    }

    /// Keeps frames up to and including `end_frame`.
    pub fn with_end_frame(mut self, end_frame: u32) -> Self {
        self.end_frame = Some(end_frame);
        self
    }

    /// Skips every frame before `start_frame`.
    pub fn with_start_frame(mut self, start_frame: u32) -> Self {
        self.start_frame = start_frame;
        self
    }

    /// Sets the padding around the sheet.
    pub fn with_margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    /// Sets the gap between frames.
    pub fn with_spacing(mut self, spacing: u32) -> Self {
        self.spacing = spacing;
        self
    }

    /// The number of frames explicitly selected, or `None` when the sheet keeps
    /// every frame that fits.
    ///
    /// An `end_frame` before `start_frame` selects nothing.
    pub fn frame_count(&self) -> Option<u32> {
        self.end_frame.map(|end| {
            if end < self.start_frame {
                0
            } else {
                (end - self.start_frame).saturating_add(1)
            }
        })
    }

    /// How many frames an image of `width` x `height` pixels provides, counted
    /// from `start_frame`.
    pub fn frames_in(&self, width: u32, height: u32) -> u32 {
        if self.frame_width == 0 || self.frame_height == 0 {
            return 0;
        }

        let columns = width
            .saturating_sub(self.margin)
            .saturating_add(self.spacing)
            / self.frame_width.saturating_add(self.spacing);
        let rows = height
            .saturating_sub(self.margin)
            .saturating_add(self.spacing)
            / self.frame_height.saturating_add(self.spacing);

        columns.saturating_mul(rows).saturating_sub(self.start_frame)
    }
}

/// The media event after which a video counts as loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VideoLoadEvent {
    /// The first frame is available.
    #[default]
    LoadedData,
    /// Enough data is buffered to start playback.
    CanPlay,
    /// Enough data is buffered to play to the end without stalling.
    CanPlayThrough,
}

/// Decoding hints for a video request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VideoOptions {
    /// Optional mime type or codec hint, e.g. `video/mp4; codecs="avc1"`.
    #[serde(default)]
    pub mime: Option<String>,
    /// The event that marks the video as loaded.
    #[serde(default)]
    pub load_event: VideoLoadEvent,
    /// Load the whole file into memory instead of streaming it.
    #[serde(default)]
    pub as_blob: bool,
    /// Skip the audio track.
    #[serde(default)]
    pub no_audio: bool,
}

/// Kind-specific configuration attached to an [`AssetRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetOptions {
    /// The kind takes no options.
    None,
    /// Frame slicing for a spritesheet.
    Spritesheet(SpritesheetOptions),
    /// Hints for a video.
    Video(VideoOptions),
}

/// A single keyed request to load one asset.
///
/// Requests are built through one constructor per [`AssetKind`], which fixes
/// how many source locations the request carries:
///
/// | kind        | sources                          |
/// |-------------|----------------------------------|
/// | image       | 1                                |
/// | spritesheet | 1                                |
/// | atlas       | 2 (texture, then frame data)     |
/// | audio       | 1, plus optional fallbacks       |
/// | video       | 1, plus an optional fallback     |
///
/// Source locations are opaque strings; resolving them is the pipeline's job.
///
/// # Examples
///
/// ```
/// use marquee_core::asset::{AssetKind, AssetRequest, SpritesheetOptions};
///
/// let sheet = AssetRequest::spritesheet(
///     "pinkhover",
///     "pinkhover.png",
///     SpritesheetOptions::new(100, 100).with_end_frame(7),
/// );
/// assert_eq!(sheet.kind(), AssetKind::Spritesheet);
/// assert_eq!(sheet.primary_source(), "pinkhover.png");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRequest {
    key: String,
    kind: AssetKind,
    sources: Vec<String>,
    options: AssetOptions,
}

impl AssetRequest {
    fn new(key: String, kind: AssetKind, sources: Vec<String>, options: AssetOptions) -> Self {
        Self {
            key,
            kind,
            sources,
            options,
        }
    }

    /// Requests a static image.
    pub fn image(key: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(key.into(), AssetKind::Image, vec![url.into()], AssetOptions::None)
    }

    /// Requests a spritesheet sliced according to `options`.
    pub fn spritesheet(
        key: impl Into<String>,
        url: impl Into<String>,
        options: SpritesheetOptions,
    ) -> Self {
        Self::new(
            key.into(),
            AssetKind::Spritesheet,
            vec![url.into()],
            AssetOptions::Spritesheet(options),
        )
    }

    /// Requests a texture atlas: the packed texture and its frame data file.
    pub fn atlas(
        key: impl Into<String>,
        texture_url: impl Into<String>,
        data_url: impl Into<String>,
    ) -> Self {
        Self::new(
            key.into(),
            AssetKind::Atlas,
            vec![texture_url.into(), data_url.into()],
            AssetOptions::None,
        )
    }

    /// Requests a sound clip.
    pub fn audio(key: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(key.into(), AssetKind::Audio, vec![url.into()], AssetOptions::None)
    }

    /// Requests a sound clip with alternative encodings, tried in order when
    /// `url` cannot be loaded.
    pub fn audio_with_fallbacks<I, S>(key: impl Into<String>, url: impl Into<String>, fallbacks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut sources = vec![url.into()];
        sources.extend(fallbacks.into_iter().map(Into::into));
        Self::new(key.into(), AssetKind::Audio, sources, AssetOptions::None)
    }

    /// Requests a video clip.
    pub fn video(key: impl Into<String>, url: impl Into<String>, options: VideoOptions) -> Self {
        Self::new(
            key.into(),
            AssetKind::Video,
            vec![url.into()],
            AssetOptions::Video(options),
        )
    }

    /// Requests a video clip with one alternative encoding.
    pub fn video_with_fallback(
        key: impl Into<String>,
        url: impl Into<String>,
        fallback: impl Into<String>,
        options: VideoOptions,
    ) -> Self {
        Self::new(
            key.into(),
            AssetKind::Video,
            vec![url.into(), fallback.into()],
            AssetOptions::Video(options),
        )
    }

    /// The key this asset is registered under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The asset category.
    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    /// Every source location, in declaration order.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// The first source location. For an atlas this is the texture.
    pub fn primary_source(&self) -> &str {
        &self.sources[0]
    }

    /// Alternative locations for the same payload, in the order they should be
    /// tried. Only audio and video requests have fallbacks.
    pub fn fallback_sources(&self) -> &[String] {
        match self.kind {
            AssetKind::Audio | AssetKind::Video => &self.sources[1..],
            _ => &[],
        }
    }

    /// The frame data location of an atlas request.
    pub fn atlas_data_source(&self) -> Option<&str> {
        match self.kind {
            AssetKind::Atlas => self.sources.get(1).map(String::as_str),
            _ => None,
        }
    }

    /// The kind-specific options.
    pub fn options(&self) -> &AssetOptions {
        &self.options
    }

    /// The slicing options, if this is a spritesheet request.
    pub fn spritesheet_options(&self) -> Option<&SpritesheetOptions> {
        match &self.options {
            AssetOptions::Spritesheet(options) => Some(options),
            _ => None,
        }
    }

    /// The video hints, if this is a video request.
    pub fn video_options(&self) -> Option<&VideoOptions> {
        match &self.options {
            AssetOptions::Video(options) => Some(options),
            _ => None,
        }
    }
}
