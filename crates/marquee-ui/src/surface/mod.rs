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

//! The drawing seam between the presenter and the host's renderer.

mod recording;
mod terminal;

pub use recording::{DrawCommand, DrawLog, RecordingSurface};
pub use terminal::TerminalSurface;

/// A place a progress bar can be drawn.
///
/// Coordinates and sizes are in the host's units, usually pixels. Colours are
/// `0xRRGGBB`.
pub trait BarSurface {
    /// Erases whatever the surface drew before.
    fn clear(&mut self);

    /// Sets the colour and opacity of the following fills.
    fn fill_style(&mut self, color: u32, alpha: f32);

    /// Fills a rectangle with the current fill style.
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32);

    /// Releases the surface. Nothing is drawn on it afterwards.
    fn destroy(&mut self);
}

impl<S: BarSurface + ?Sized> BarSurface for Box<S> {
    fn clear(&mut self) {
        (**self).clear();
    }

    fn fill_style(&mut self, color: u32, alpha: f32) {
        (**self).fill_style(color, alpha);
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        (**self).fill_rect(x, y, width, height);
    }

    fn destroy(&mut self) {
        (**self).destroy();
    }
}
