// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Freehand stroke data structures.
//!
//! Strokes are stored in image space, so a stroke drawn at 200% zoom and one
//! drawn at 50% describe the same pixels of the frame.

use serde::{Deserialize, Serialize};

/// A 2D point. Whether it is in screen or image space depends on context.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One continuous freehand gesture, finished and ready to be labeled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Class the stroke belongs to
    pub label: String,
    /// Pen color at the time the stroke was finished
    pub color: [u8; 3],
    /// Full pen width in image pixels
    pub width: f64,
    /// Polyline vertices in image space
    pub points: Vec<Point>,
}

impl Stroke {
    /// Axis-aligned bounds of the stroke including half the pen width,
    /// as `(min, max)`. `None` for a stroke without points.
    pub fn bounds(&self) -> Option<(Point, Point)> {
        let first = self.points.first()?;
        let half = self.width / 2.0;
        let (mut min, mut max) = (*first, *first);
        for p in &self.points[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Some((
            Point::new(min.x - half, min.y - half),
            Point::new(max.x + half, max.y + half),
        ))
    }
}

/// Stroke buffer that grows while the pointer button is held.
///
/// Only `finish` turns it into a `Stroke`, which cannot be appended to.
#[derive(Debug, Default)]
pub struct StrokeBuilder {
    points: Vec<Point>,
    width: f64,
}

impl StrokeBuilder {
    /// Start a buffer for a pen of the given image-space width.
    pub fn new(width: f64) -> Self {
        Self {
            points: Vec::new(),
            width,
        }
    }

    /// Append a vertex. A repeat of the last vertex is skipped.
    pub fn push(&mut self, point: Point) {
        if self.points.last() != Some(&point) {
            self.points.push(point);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Seal the buffer into an immutable stroke.
    pub fn finish(self, label: impl Into<String>, color: [u8; 3]) -> Stroke {
        Stroke {
            label: label.into(),
            color,
            width: self.width,
            points: self.points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_skips_repeats() {
        let mut builder = StrokeBuilder::new(3.0);
        builder.push(Point::new(0.0, 0.0));
        builder.push(Point::new(1.0, 0.0));
        builder.push(Point::new(1.0, 0.0));
        builder.push(Point::new(2.0, 1.0));
        let stroke = builder.finish("road", [1, 2, 3]);

        assert_eq!(stroke.points.len(), 3);
        assert_eq!(stroke.width, 3.0);
        assert_eq!(stroke.label, "road");
    }

    #[test]
    fn test_bounds_include_pen() {
        let stroke = Stroke {
            label: "a".into(),
            color: [0, 0, 0],
            width: 4.0,
            points: vec![Point::new(10.0, 20.0), Point::new(30.0, 5.0)],
        };
        let (min, max) = stroke.bounds().unwrap();
        assert_eq!(min, Point::new(8.0, 3.0));
        assert_eq!(max, Point::new(32.0, 22.0));
    }

    #[test]
    fn test_bounds_empty() {
        let stroke = StrokeBuilder::new(1.0).finish("a", [0, 0, 0]);
        assert!(stroke.bounds().is_none());
    }
}
