// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Scroll viewport hosting the canvas.
//!
//! The canvas has no scroll state of its own. When it zooms it reports a
//! `ViewportShift`, and the viewport moves its offset so the content under
//! the pointer stays under the pointer.

use super::canvas::ViewportShift;

/// Scroll offset of the canvas inside a smaller view.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollViewport {
    pub offset: [f64; 2],
    pub content_size: [f64; 2],
    pub view_size: [f64; 2],
}

impl ScrollViewport {
    /// Largest valid offset on each axis.
    pub fn max_offset(&self) -> [f64; 2] {
        [
            (self.content_size[0] - self.view_size[0]).max(0.0),
            (self.content_size[1] - self.view_size[1]).max(0.0),
        ]
    }

    /// Keep the point under the anchor fixed across a zoom.
    ///
    /// `content_size` must already be the size after the zoom.
    pub fn shift_by(&mut self, shift: &ViewportShift) {
        let anchor = [shift.anchor.x, shift.anchor.y];
        let max = self.max_offset();
        for axis in 0..2 {
            let before = anchor[axis] / shift.old_ratio;
            let after = anchor[axis] / shift.new_ratio;
            let diff = (after - before) * shift.new_ratio;
            self.offset[axis] = (self.offset[axis] - diff).clamp(0.0, max[axis]);
        }
        log::debug!(
            "Viewport shifted to ({:.1}, {:.1}) for zoom {:.3} -> {:.3}",
            self.offset[0],
            self.offset[1],
            shift.old_ratio,
            shift.new_ratio
        );
    }
}
