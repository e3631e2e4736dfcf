// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Zoom model and coordinate transformations.
//!
//! The canvas shows the frame scaled by a ratio derived from an integer zoom
//! rank. Pointer positions arrive in screen space and are divided by the
//! ratio before they are stored, which keeps strokes independent of the
//! zoom level they were drawn at.

use crate::error::PreconditionError;
use crate::models::Point;

/// Zoom factor per rank step when zooming in.
pub const ZOOM_IN_FACTOR: f64 = 1.25;
/// Zoom factor per rank step when zooming out.
pub const ZOOM_OUT_FACTOR: f64 = 0.8;

pub const DEFAULT_MIN_RANK: i32 = -10;
pub const DEFAULT_MAX_RANK: i32 = 10;
pub const DEFAULT_MIN_RATIO: f64 = 0.05;
pub const DEFAULT_MAX_RATIO: f64 = 20.0;

/// Ratio for a zoom rank, before any ratio clamping.
pub fn ratio_for_rank(rank: i32) -> f64 {
    if rank > 0 {
        ZOOM_IN_FACTOR.powi(rank)
    } else if rank < 0 {
        ZOOM_OUT_FACTOR.powi(-rank)
    } else {
        1.0
    }
}

/// Where a point lands after the scale changes from `old_ratio` to
/// `new_ratio`.
pub fn remap_after_zoom(point: Point, old_ratio: f64, new_ratio: f64) -> Point {
    Point::new(
        point.x / old_ratio * new_ratio,
        point.y / old_ratio * new_ratio,
    )
}

/// Integer zoom rank and the scale ratio derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleModel {
    rank: i32,
    ratio: f64,
    min_rank: i32,
    max_rank: i32,
    min_ratio: f64,
    max_ratio: f64,
}

impl Default for ScaleModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ScaleModel {
    /// Model at rank 0 (ratio 1.0) with the default limits.
    pub fn new() -> Self {
        Self::with_limits(
            DEFAULT_MIN_RANK,
            DEFAULT_MAX_RANK,
            DEFAULT_MIN_RATIO,
            DEFAULT_MAX_RATIO,
        )
    }

    /// Model at rank 0 with custom rank and ratio limits.
    pub fn with_limits(min_rank: i32, max_rank: i32, min_ratio: f64, max_ratio: f64) -> Self {
        Self {
            rank: 0,
            ratio: 1.0,
            min_rank: min_rank.min(max_rank),
            max_rank: max_rank.max(min_rank),
            min_ratio,
            max_ratio,
        }
    }

    pub fn rank(&self) -> i32 {
        self.rank
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn rank_limits(&self) -> (i32, i32) {
        (self.min_rank, self.max_rank)
    }

    /// Clamp `rank` into the rank limits and recompute the ratio.
    pub fn set_rank(&mut self, rank: i32) {
        self.rank = rank.clamp(self.min_rank, self.max_rank);
        self.apply_rank();
    }

    /// Recompute the ratio from the current rank.
    ///
    /// Used to go back to the zoomed view after `show_normal`.
    pub fn apply_rank(&mut self) {
        let ratio = ratio_for_rank(self.rank);
        // Always positive, so this cannot fail.
        let _ = self.set_ratio_direct(ratio, self.max_ratio, self.min_ratio);
    }

    /// Set the ratio directly, clamped into `[minimum, maximum]`.
    ///
    /// A zero or negative ratio leaves the model untouched.
    pub fn set_ratio_direct(
        &mut self,
        ratio: f64,
        maximum: f64,
        minimum: f64,
    ) -> Result<(), PreconditionError> {
        if ratio.is_nan() || ratio <= 0.0 {
            log::warn!("Rejected scale ratio {}", ratio);
            return Err(PreconditionError::NonPositiveRatio(ratio));
        }
        self.ratio = ratio.min(maximum).max(minimum);
        log::debug!("Scale ratio: {}", self.ratio);
        Ok(())
    }

    /// Show the image at 100% without touching the rank.
    pub fn show_normal(&mut self) {
        let _ = self.set_ratio_direct(1.0, self.max_ratio, self.min_ratio);
    }

    pub fn to_image_space(&self, screen: Point) -> Point {
        Point::new(screen.x / self.ratio, screen.y / self.ratio)
    }

    pub fn to_screen_space(&self, image: Point) -> Point {
        Point::new(image.x * self.ratio, image.y * self.ratio)
    }

    /// Size of a `width` x `height` image at the current ratio, never below 1x1.
    pub fn scaled_size(&self, width: u32, height: u32) -> (u32, u32) {
        let w = (width as f64 * self.ratio) as u32;
        let h = (height as f64 * self.ratio) as u32;
        (w.max(1), h.max(1))
    }
}

/// Integer rectangle in screen pixels, used to describe areas that need
/// repainting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl DirtyRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width: width.max(0),
            height: height.max(0),
        }
    }

    /// Normalized rectangle spanning two points.
    pub fn spanning(a: Point, b: Point) -> Self {
        let x0 = a.x.min(b.x).floor() as i32;
        let y0 = a.y.min(b.y).floor() as i32;
        let x1 = a.x.max(b.x).ceil() as i32;
        let y1 = a.y.max(b.y).ceil() as i32;
        Self::new(x0, y0, x1 - x0 + 1, y1 - y0 + 1)
    }

    /// Square of side `2 * radius + 1` centered on `center`.
    pub fn around(center: Point, radius: i32) -> Self {
        Self::spanning(center, center).grow(radius)
    }

    /// Grow by `amount` on every side.
    pub fn grow(self, amount: i32) -> Self {
        Self::new(
            self.x - amount,
            self.y - amount,
            self.width + 2 * amount,
            self.height + 2 * amount,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Smallest rectangle containing both.
    pub fn union(self, other: Self) -> Self {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Self::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }

    /// Intersection with `[0, width) x [0, height)`.
    pub fn clamp_to(self, width: u32, height: u32) -> Self {
        let x0 = self.x.clamp(0, width as i32);
        let y0 = self.y.clamp(0, height as i32);
        let x1 = self.right().clamp(0, width as i32);
        let y1 = self.bottom().clamp(0, height as i32);
        Self::new(x0, y0, x1 - x0, y1 - y0)
    }
}
