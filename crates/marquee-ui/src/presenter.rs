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

//! Draws the progress of one loading session as a horizontal bar.

use crate::surface::BarSurface;
use marquee_core::loading::{LoadEvent, LoadObserver, Progress, SessionId};
use serde::{Deserialize, Serialize};

/// Where and how the progress bar is drawn.
///
/// The default places a 700x15 bar at (100, 300), filled with `0xFACADE` at
/// full opacity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarStyle {
    /// Left edge of the bar.
    pub x: f32,
    /// Top edge of the bar.
    pub y: f32,
    /// Width of the bar at 100%.
    pub full_width: f32,
    /// Height of the bar.
    pub height: f32,
    /// Fill colour, `0xRRGGBB`.
    pub color: u32,
    /// Fill opacity, in [0, 1].
    pub alpha: f32,
}

impl Default for BarStyle {
    fn default() -> Self {
        Self {
            x: 100.0,
            y: 300.0,
            full_width: 700.0,
            height: 15.0,
            color: 0xFACADE,
            alpha: 1.0,
        }
    }
}

impl BarStyle {
    /// The filled width for `progress`.
    pub fn fill_width(&self, progress: Progress) -> f32 {
        self.full_width * progress.value()
    }
}

/// A [`LoadObserver`] that renders a progress bar.
///
/// The presenter binds to the first session it hears from and ignores every
/// other session. Each progress event redraws the bar from scratch, so a
/// repeated value draws the same bar again. On `Complete` or `Aborted` the
/// surface is destroyed and dropped; nothing is drawn after that.
#[derive(Debug)]
pub struct ProgressPresenter<S: BarSurface> {
    style: BarStyle,
    surface: Option<S>,
    session: Option<SessionId>,
    progress: Progress,
}

impl<S: BarSurface> ProgressPresenter<S> {
    /// Creates a presenter drawing on `surface` with the default style.
    pub fn new(surface: S) -> Self {
        Self::with_style(surface, BarStyle::default())
    }

    /// Creates a presenter drawing on `surface` with `style`.
    pub fn with_style(surface: S, style: BarStyle) -> Self {
        Self {
            style,
            surface: Some(surface),
            session: None,
            progress: Progress::ZERO,
        }
    }

    /// The bar's placement and colour.
    pub fn style(&self) -> &BarStyle {
        &self.style
    }

    /// The session this presenter is bound to, once it has seen one.
    pub fn session(&self) -> Option<SessionId> {
        self.session
    }

    /// The last progress value drawn.
    pub fn progress(&self) -> Progress {
        self.progress
    }

    /// The surface, until the session ends.
    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// Returns `true` while the presenter still holds its surface.
    pub fn is_active(&self) -> bool {
        self.surface.is_some()
    }

    fn render(&mut self, progress: Progress) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        // Progress never moves backwards within a session.
        if progress.value() > self.progress.value() {
            self.progress = progress;
        }

        let style = &self.style;
        surface.clear();
        surface.fill_style(style.color, style.alpha);
        surface.fill_rect(style.x, style.y, style.fill_width(self.progress), style.height);
    }

    fn release(&mut self) {
        if let Some(mut surface) = self.surface.take() {
            surface.destroy();
            log::debug!("ProgressPresenter: Released the bar surface.");
        }
    }
}

impl<S: BarSurface> LoadObserver for ProgressPresenter<S> {
    fn on_event(&mut self, event: &LoadEvent) {
        if self.surface.is_none() {
            return;
        }

        let session = event.session();
        match self.session {
            None => {
                log::debug!("ProgressPresenter: Bound to session {session}.");
                self.session = Some(session);
            }
            Some(bound) if bound != session => {
                log::trace!("ProgressPresenter: Ignoring event from session {session}.");
                return;
            }
            Some(_) => {}
        }

        match event {
            LoadEvent::Progress { progress, .. } => self.render(*progress),
            LoadEvent::Complete { .. } | LoadEvent::Aborted { .. } => self.release(),
            LoadEvent::ItemLoaded { .. } | LoadEvent::ItemFailed { .. } => {}
        }
    }
}
