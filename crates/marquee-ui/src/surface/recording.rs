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
use std::sync::{Arc, Mutex, MutexGuard};

/// One call made on a [`RecordingSurface`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    /// [`BarSurface::clear`].
    Clear,
    /// [`BarSurface::fill_style`].
    FillStyle {
        /// The fill colour, `0xRRGGBB`.
        color: u32,
        /// The fill opacity.
        alpha: f32,
    },
    /// [`BarSurface::fill_rect`].
    FillRect {
        /// Left edge.
        x: f32,
        /// Top edge.
        y: f32,
        /// Width.
        width: f32,
        /// Height.
        height: f32,
    },
    /// [`BarSurface::destroy`].
    Destroy,
}

/// A shared record of draw calls.
///
/// Clones share the same record, so a host or a test can keep one while the
/// surface itself is handed to a presenter.
#[derive(Debug, Clone, Default)]
pub struct DrawLog(Arc<Mutex<Vec<DrawCommand>>>);

impl DrawLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<DrawCommand>> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn push(&self, command: DrawCommand) {
        self.lock().push(command);
    }

    /// Every recorded command, oldest first.
    pub fn commands(&self) -> Vec<DrawCommand> {
        self.lock().clone()
    }

    /// The widths of every filled rectangle, oldest first.
    pub fn fill_widths(&self) -> Vec<f32> {
        self.lock()
            .iter()
            .filter_map(|command| match command {
                DrawCommand::FillRect { width, .. } => Some(*width),
                _ => None,
            })
            .collect()
    }

    /// Returns `true` once the surface was destroyed.
    pub fn is_destroyed(&self) -> bool {
        self.lock().contains(&DrawCommand::Destroy)
    }

    /// How many commands were recorded.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// A surface that draws nothing and records every call into a [`DrawLog`].
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    log: DrawLog,
}

impl RecordingSurface {
    /// Creates a surface with a fresh log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a surface recording into `log`.
    pub fn with_log(log: DrawLog) -> Self {
        Self { log }
    }

    /// The log this surface records into.
    pub fn log(&self) -> &DrawLog {
        &self.log
    }
}

impl BarSurface for RecordingSurface {
    fn clear(&mut self) {
        self.log.push(DrawCommand::Clear);
    }

    fn fill_style(&mut self, color: u32, alpha: f32) {
        self.log.push(DrawCommand::FillStyle { color, alpha });
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.log.push(DrawCommand::FillRect {
            x,
            y,
            width,
            height,
        });
    }

    fn destroy(&mut self) {
        self.log.push(DrawCommand::Destroy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_of_a_log_share_the_record() {
        let log = DrawLog::new();
        let mut surface = RecordingSurface::with_log(log.clone());

        surface.clear();
        surface.fill_rect(0.0, 0.0, 10.0, 1.0);
        drop(surface);

        assert_eq!(log.len(), 2);
        assert_eq!(log.fill_widths(), vec![10.0]);
        assert!(!log.is_destroyed());
    }
}
