// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Thread-shared frame source with skip-stepping.
//!
//! A `FrameSource` is shared (through an `Arc`) between the background
//! playback thread, which fetches frames, and the foreground, which seeks and
//! reads position and metadata. Every access goes through one reader/writer
//! lock: metadata reads share it, anything that touches the capture handle
//! or the position takes it exclusively. The lock is only held for the
//! duration of a single call.

use super::media::{open_backend, FrameBackend, MediaProperties};
use crate::error::MediaError;
use image::RgbImage;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Everything guarded by the source lock.
struct Capture {
    /// Reached only through the write guard with `Mutex::get_mut`, which
    /// never blocks; the mutex makes the handle `Sync`.
    backend: Option<Mutex<Box<dyn FrameBackend>>>,
    path: Option<PathBuf>,
    properties: MediaProperties,
    /// Index of the frame most recently positioned on
    position: usize,
    skip_step: usize,
    saved_skip_step: usize,
    in_minimum_window: bool,
}

impl Capture {
    fn last_index(&self) -> usize {
        self.properties.frame_count.saturating_sub(1)
    }

    fn decode(&mut self, index: usize) -> Option<RgbImage> {
        let backend = self.backend.as_mut()?;
        let backend = backend.get_mut().unwrap_or_else(PoisonError::into_inner);
        match backend.decode(index) {
            Ok(frame) => Some(frame),
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        }
    }
}

/// A decoded frame and its index in the stream.
#[derive(Clone)]
pub struct Frame {
    pub index: usize,
    pub image: RgbImage,
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("index", &self.index)
            .field("size", &self.image.dimensions())
            .finish()
    }
}

/// A seekable source of frames with a configurable skip step.
pub struct FrameSource {
    capture: RwLock<Capture>,
}

impl Default for FrameSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource {
    /// Create a source with nothing open.
    pub fn new() -> Self {
        Self {
            capture: RwLock::new(Capture {
                backend: None,
                path: None,
                properties: MediaProperties::default(),
                position: 0,
                skip_step: 1,
                saved_skip_step: 1,
                in_minimum_window: false,
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Capture> {
        self.capture.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Capture> {
        self.capture.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open the media at `path`, releasing whatever was open before.
    pub fn open(&self, path: &Path) -> Result<(), MediaError> {
        self.release();
        let backend = open_backend(path)?;
        self.install(backend, Some(path.to_path_buf()))
    }

    /// Open an already constructed backend, releasing whatever was open.
    pub fn open_backend(&self, backend: Box<dyn FrameBackend>) -> Result<(), MediaError> {
        self.release();
        self.install(backend, None)
    }

    fn install(&self, backend: Box<dyn FrameBackend>, path: Option<PathBuf>) -> Result<(), MediaError> {
        let properties = backend.properties();
        if properties.frame_count == 0 {
            return Err(MediaError::Empty(path.unwrap_or_default()));
        }

        let mut capture = self.write();
        capture.backend = Some(Mutex::new(backend));
        capture.path = path;
        capture.properties = properties;
        capture.position = 0;
        Ok(())
    }

    /// Close the media handle. Skip-step settings are kept.
    pub fn release(&self) {
        let mut capture = self.write();
        if capture.backend.take().is_some() {
            log::info!("Released media source");
        }
        capture.path = None;
        capture.properties = MediaProperties::default();
        capture.position = 0;
    }

    pub fn is_open(&self) -> bool {
        self.read().backend.is_some()
    }

    /// Advance by the skip step and decode that frame.
    ///
    /// Returns `None` at the end of the stream or when the frame fails to
    /// decode; the position is left unchanged in both cases.
    pub fn fetch(&self) -> Option<Frame> {
        let mut capture = self.write();
        capture.backend.as_ref()?;
        let target = capture.position + capture.skip_step;
        if target > capture.last_index() {
            log::debug!("End of stream at frame {}", capture.position);
            return None;
        }
        let image = capture.decode(target)?;
        capture.position = target;
        Some(Frame {
            index: target,
            image,
        })
    }

    /// Seek to `index` (clamped) and decode the frame there.
    pub fn fetch_at(&self, index: usize) -> Option<Frame> {
        let mut capture = self.write();
        capture.backend.as_ref()?;
        let index = index.min(capture.last_index());
        capture.position = index;
        let image = capture.decode(index)?;
        Some(Frame { index, image })
    }

    /// Reposition without decoding. Returns the clamped position.
    pub fn seek(&self, index: usize) -> usize {
        let mut capture = self.write();
        capture.position = index.min(capture.last_index());
        capture.position
    }

    /// Index the source is currently positioned on.
    pub fn position(&self) -> usize {
        self.read().position
    }

    pub fn skip_step(&self) -> usize {
        self.read().skip_step
    }

    /// The user's step, preserved while the minimum-step window is active.
    pub fn saved_skip_step(&self) -> usize {
        let capture = self.read();
        if capture.in_minimum_window {
            capture.saved_skip_step
        } else {
            capture.skip_step
        }
    }

    /// Set the user's skip step, clamped to at least 1.
    ///
    /// Inside the minimum-step window the value is stored as the saved step
    /// and takes effect when the window is left.
    pub fn set_skip_step(&self, step: usize) {
        let step = step.max(1);
        let mut capture = self.write();
        if capture.in_minimum_window {
            capture.saved_skip_step = step;
        } else {
            capture.skip_step = step;
        }
    }

    pub fn in_minimum_step_window(&self) -> bool {
        self.read().in_minimum_window
    }

    /// Save the current step and switch to single-frame stepping.
    ///
    /// Entering again while inside the window does nothing, so the saved
    /// step is never overwritten with 1.
    pub fn enter_minimum_step_window(&self) {
        let mut capture = self.write();
        if capture.in_minimum_window {
            return;
        }
        capture.saved_skip_step = capture.skip_step;
        capture.skip_step = 1;
        capture.in_minimum_window = true;
    }

    /// Leave the minimum-step window, restoring the saved step.
    pub fn exit_minimum_step_window(&self) {
        let mut capture = self.write();
        if !capture.in_minimum_window {
            return;
        }
        capture.skip_step = capture.saved_skip_step.max(1);
        capture.in_minimum_window = false;
    }

    /// Alias of `exit_minimum_step_window`.
    pub fn restore_skip_step(&self) {
        self.exit_minimum_step_window();
    }

    pub fn properties(&self) -> MediaProperties {
        self.read().properties
    }

    pub fn fps(&self) -> f64 {
        self.read().properties.fps
    }

    pub fn frame_count(&self) -> usize {
        self.read().properties.frame_count
    }

    pub fn width(&self) -> u32 {
        self.read().properties.width
    }

    pub fn height(&self) -> u32 {
        self.read().properties.height
    }

    pub fn path(&self) -> Option<PathBuf> {
        self.read().path.clone()
    }

    /// Position as a fraction of the stream, for progress display.
    pub fn progress(&self) -> f64 {
        let capture = self.read();
        let last = capture.last_index();
        if last == 0 {
            0.0
        } else {
            capture.position as f64 / last as f64
        }
    }

    /// Timestamp of the current position in milliseconds, 0.0 without timing.
    pub fn position_msec(&self) -> f64 {
        let capture = self.read();
        if capture.properties.fps > 0.0 {
            capture.position as f64 * 1000.0 / capture.properties.fps
        } else {
            0.0
        }
    }
}
