// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The editable binding between the engine and one frame.

use crate::io::LabelStore;
use crate::models::{LabelSet, Stroke};
use crate::util::raster::rasterize_strokes;
use anyhow::Result;
use image::RgbImage;

/// Strokes accumulated for a single frame.
///
/// A session is bound to its frame for its whole life. It only reaches the
/// store when `commit` is called; dropping it discards the strokes.
#[derive(Debug)]
pub struct LabelingSession {
    frame_index: usize,
    frame_size: (u32, u32),
    strokes: Vec<Stroke>,
    auto_load_prior_result: bool,
}

impl LabelingSession {
    /// Open a session for `frame_index`, loading the saved result first when
    /// `auto_load_prior_result` is set.
    pub fn open(
        frame_index: usize,
        frame_size: (u32, u32),
        auto_load_prior_result: bool,
        store: &dyn LabelStore,
    ) -> Self {
        let mut session = Self {
            frame_index,
            frame_size,
            strokes: Vec::new(),
            auto_load_prior_result,
        };
        if auto_load_prior_result {
            session.load_prior_result(store);
        }
        session
    }

    fn load_prior_result(&mut self, store: &dyn LabelStore) {
        match store.load(self.frame_index) {
            Ok(Some(strokes)) => {
                log::info!(
                    "Loaded {} saved strokes for frame {}",
                    strokes.len(),
                    self.frame_index
                );
                self.strokes = strokes;
            }
            Ok(None) => {}
            Err(e) => log::warn!("Could not load result of frame {}: {:#}", self.frame_index, e),
        }
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn frame_size(&self) -> (u32, u32) {
        self.frame_size
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn auto_load_prior_result(&self) -> bool {
        self.auto_load_prior_result
    }

    /// Turning auto-load on while nothing is drawn yet loads the saved
    /// result right away.
    pub fn set_auto_load_prior_result(&mut self, enabled: bool, store: &dyn LabelStore) {
        let was = std::mem::replace(&mut self.auto_load_prior_result, enabled);
        if enabled && !was && self.strokes.is_empty() {
            self.load_prior_result(store);
        }
    }

    pub fn add_stroke(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
    }

    /// Drop every stroke of this frame.
    pub fn clear(&mut self) {
        self.strokes.clear();
    }

    /// Label mask of the strokes so far, sized like the frame.
    pub fn label_mask(&self) -> RgbImage {
        rasterize_strokes(self.frame_size.0, self.frame_size.1, &self.strokes)
    }

    /// Save the strokes. Each call writes exactly once.
    pub fn commit(&self, store: &mut dyn LabelStore, labels: &LabelSet) -> Result<()> {
        store.save(self.frame_index, self.frame_size, &self.strokes, labels)
    }
}
