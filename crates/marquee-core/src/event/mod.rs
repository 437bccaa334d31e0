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

//! Provides foundational primitives for event-driven communication.
//!
//! The [`EventBus`] is a generic, thread-safe channel. Loading sessions
//! can publish their notifications into one (it implements
//! [`LoadObserver`](crate::loading::LoadObserver) for
//! [`LoadEvent`](crate::loading::LoadEvent)) so that a consumer on another
//! thread sees the same sequence the session produced.

mod bus;

pub use self::bus::EventBus;
