// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations: media decoding, frame sources, settings and label results.

pub mod frame_source;
pub mod media;
pub mod playback;
pub mod serialization;
pub mod store;

pub use frame_source::{Frame, FrameSource};
pub use playback::{Playback, PlaybackEvent};
pub use store::{DirectoryStore, LabelStore};
