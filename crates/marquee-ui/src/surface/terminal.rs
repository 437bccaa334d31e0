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

use super::BarSurface;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// A terminal progress bar.
///
/// Only the filled width matters here: it is mapped onto a bar of
/// [`TerminalSurface::STEPS`] steps, relative to the full width the surface
/// was created with. The fill colour picks the nearest 256-colour entry.
#[derive(Debug)]
pub struct TerminalSurface {
    bar: ProgressBar,
    full_width: f32,
    color: Option<u32>,
}

impl TerminalSurface {
    /// The resolution of the terminal bar.
    pub const STEPS: u64 = 1000;

    /// Creates a bar drawn on stderr, for a presenter whose full bar width is
    /// `full_width`.
    pub fn new(full_width: f32) -> Self {
        Self::with_target(full_width, ProgressDrawTarget::stderr())
    }

    /// Creates a bar that tracks its position without drawing anything.
    pub fn hidden(full_width: f32) -> Self {
        Self::with_target(full_width, ProgressDrawTarget::hidden())
    }

    fn with_target(full_width: f32, target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(Some(Self::STEPS), target);
        bar.set_style(bar_style(None));
        Self {
            bar,
            full_width: full_width.max(f32::EPSILON),
            color: None,
        }
    }

    /// Sets the label shown before the bar.
    pub fn with_message(self, message: impl Into<String>) -> Self {
        self.bar.set_message(message.into());
        self
    }

    /// The current bar position, out of [`TerminalSurface::STEPS`].
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Returns `true` once the surface was destroyed.
    pub fn is_finished(&self) -> bool {
        self.bar.is_finished()
    }
}

/// Maps `0xRRGGBB` onto the 6x6x6 cube of the 256-colour palette.
fn ansi_256(color: u32) -> u8 {
    let level = |shift: u32| (((color >> shift) & 0xFF) * 5 + 127) / 255;
    (16 + 36 * level(16) + 6 * level(8) + level(0)) as u8
}

fn bar_style(color: Option<u32>) -> ProgressStyle {
    let fill = color.map_or_else(|| "white".to_string(), |c| ansi_256(c).to_string());
    let template = format!("{{msg}} [{{bar:40.{fill}}}] {{percent:>3}}%");
    match ProgressStyle::with_template(&template) {
        Ok(style) => style.progress_chars("#>."),
        Err(e) => {
            log::warn!("TerminalSurface: Invalid bar template ({e}), using the default.");
            ProgressStyle::default_bar()
        }
    }
}

impl BarSurface for TerminalSurface {
    fn clear(&mut self) {
        // The bar redraws in place.
    }

    fn fill_style(&mut self, color: u32, _alpha: f32) {
        if self.color != Some(color) {
            self.color = Some(color);
            self.bar.set_style(bar_style(self.color));
        }
    }

    fn fill_rect(&mut self, _x: f32, _y: f32, width: f32, _height: f32) {
        let fraction = (width / self.full_width).clamp(0.0, 1.0);
        self.bar
            .set_position((fraction * Self::STEPS as f32).round() as u64);
    }

    fn destroy(&mut self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_width_maps_onto_the_bar_position() {
        let mut surface = TerminalSurface::hidden(700.0);
        surface.fill_rect(100.0, 300.0, 350.0, 15.0);
        assert_eq!(surface.position(), 500);

        surface.fill_rect(100.0, 300.0, 700.0, 15.0);
        assert_eq!(surface.position(), TerminalSurface::STEPS);

        surface.destroy();
        assert!(surface.is_finished());
    }

    #[test]
    fn colors_map_to_the_palette_cube() {
        assert_eq!(ansi_256(0x000000), 16);
        assert_eq!(ansi_256(0xFFFFFF), 231);
        assert_eq!(ansi_256(0xFACADE), 224);
    }
}
