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

//! # Marquee UI
//!
//! Shows the progress of a loading session as a horizontal bar.
//!
//! The [`ProgressPresenter`] is a [`LoadObserver`](marquee_core::loading::LoadObserver)
//! that turns progress events into draw calls on a [`BarSurface`]. The surface
//! is whatever the host draws with; [`RecordingSurface`] and
//! [`TerminalSurface`] are provided.

#![warn(missing_docs)]

pub mod presenter;
pub mod surface;

pub use presenter::{BarStyle, ProgressPresenter};
pub use surface::{BarSurface, DrawCommand, DrawLog, RecordingSurface, TerminalSurface};
