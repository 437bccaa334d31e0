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

use serde::{Deserialize, Serialize};
use std::fmt;

/// The fraction of a session's requests that have settled, in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Progress(f32);

impl Progress {
    /// Nothing settled yet.
    pub const ZERO: Progress = Progress(0.0);
    /// Every request settled.
    pub const COMPLETE: Progress = Progress(1.0);

    /// Wraps a raw ratio, clamping it into `[0.0, 1.0]`. `NaN` becomes zero.
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Computes `completed / requested`.
    ///
    /// An empty request set counts as complete.
    pub fn from_counts(completed: usize, requested: usize) -> Self {
        if requested == 0 {
            return Self::COMPLETE;
        }
        Self::new(completed as f32 / requested as f32)
    }

    /// The raw ratio.
    pub fn value(self) -> f32 {
        self.0
    }

    /// The ratio as a whole percentage, rounded to nearest.
    pub fn percent(self) -> u32 {
        (self.0 * 100.0).round() as u32
    }

    /// Returns `true` once the ratio reaches `1.0`.
    pub fn is_complete(self) -> bool {
        self.0 >= 1.0
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ratio_from_counts() {
        assert_relative_eq!(Progress::from_counts(1, 4).value(), 0.25);
        assert_relative_eq!(Progress::from_counts(3, 4).value(), 0.75);
        assert_relative_eq!(Progress::from_counts(1, 3).value(), 1.0 / 3.0);
        assert!(Progress::from_counts(4, 4).is_complete());
    }

    #[test]
    fn empty_request_set_is_complete() {
        assert_eq!(Progress::from_counts(0, 0), Progress::COMPLETE);
    }

    #[test]
    fn new_clamps_out_of_range_values() {
        assert_eq!(Progress::new(-0.5), Progress::ZERO);
        assert_eq!(Progress::new(1.5), Progress::COMPLETE);
        assert_eq!(Progress::new(f32::NAN), Progress::ZERO);
    }

    #[test]
    fn display_as_percentage() {
        assert_eq!(Progress::new(0.5).to_string(), "50%");
        assert_eq!(Progress::from_counts(2, 3).to_string(), "67%");
        assert_eq!(Progress::COMPLETE.percent(), 100);
    }
}
