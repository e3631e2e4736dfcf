// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Pixel-level helpers: weighted blending and stroke rasterization.

use crate::error::PreconditionError;
use crate::models::{Point, Stroke};
use image::{Rgb, RgbImage};
use rayon::prelude::*;

/// Weighted per-channel blend: `a * weight_a + b * weight_b`, rounded and
/// saturated to `u8`.
///
/// Both images must have the same dimensions. Rows are processed in
/// parallel.
pub fn blend(
    a: &RgbImage,
    weight_a: f64,
    b: &RgbImage,
    weight_b: f64,
) -> Result<RgbImage, PreconditionError> {
    if a.dimensions() != b.dimensions() {
        return Err(PreconditionError::SizeMismatch {
            left: a.dimensions(),
            right: b.dimensions(),
        });
    }

    let (width, height) = a.dimensions();
    let mut out = RgbImage::new(width, height);
    if width == 0 || height == 0 {
        return Ok(out);
    }

    let row_bytes = width as usize * 3;
    let dst: &mut [u8] = &mut out;
    dst.par_chunks_exact_mut(row_bytes)
        .zip(a.as_raw().par_chunks_exact(row_bytes))
        .zip(b.as_raw().par_chunks_exact(row_bytes))
        .for_each(|((dst_row, a_row), b_row)| {
            for ((d, &pa), &pb) in dst_row.iter_mut().zip(a_row).zip(b_row) {
                let value = pa as f64 * weight_a + pb as f64 * weight_b;
                *d = value.round().clamp(0.0, 255.0) as u8;
            }
        });

    Ok(out)
}

/// Fill every pixel within `radius` of the segment `a`-`b`.
fn fill_capsule(img: &mut RgbImage, a: Point, b: Point, radius: f64, color: Rgb<u8>) {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return;
    }
    let x0 = (a.x.min(b.x) - radius).floor().max(0.0) as i64;
    let y0 = (a.y.min(b.y) - radius).floor().max(0.0) as i64;
    let x1 = (a.x.max(b.x) + radius).ceil().min(width as f64 - 1.0) as i64;
    let y1 = (a.y.max(b.y) + radius).ceil().min(height as f64 - 1.0) as i64;

    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    let r_sq = radius * radius;

    for y in y0..=y1 {
        for x in x0..=x1 {
            let (px, py) = (x as f64, y as f64);
            let t = if len_sq > 0.0 {
                (((px - a.x) * dx + (py - a.y) * dy) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let cx = a.x + t * dx - px;
            let cy = a.y + t * dy - py;
            if cx * cx + cy * cy <= r_sq {
                img.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

/// Draw a polyline with round caps and joins.
///
/// `width` is the full pen width; a single point draws a dot.
pub fn draw_polyline(img: &mut RgbImage, points: &[Point], width: f64, color: [u8; 3]) {
    let radius = (width / 2.0).max(0.5);
    let color = Rgb(color);
    match points {
        [] => {}
        [only] => fill_capsule(img, *only, *only, radius, color),
        _ => {
            for pair in points.windows(2) {
                fill_capsule(img, pair[0], pair[1], radius, color);
            }
        }
    }
}

/// Draw the brush cursor: a ring of the pen radius with a diagonal
/// cross-hatch inside.
pub fn draw_cursor(img: &mut RgbImage, center: Point, radius: f64, edge: f64, color: [u8; 3]) {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return;
    }
    let outer = radius + edge / 2.0;
    let x0 = (center.x - outer).floor().max(0.0) as i64;
    let y0 = (center.y - outer).floor().max(0.0) as i64;
    let x1 = (center.x + outer).ceil().min(width as f64 - 1.0) as i64;
    let y1 = (center.y + outer).ceil().min(height as f64 - 1.0) as i64;
    let color = Rgb(color);

    for y in y0..=y1 {
        for x in x0..=x1 {
            let d = ((x as f64 - center.x).powi(2) + (y as f64 - center.y).powi(2)).sqrt();
            let on_ring = (d - radius).abs() <= edge / 2.0;
            let hatch = d < radius && ((x + y).rem_euclid(6) == 0 || (x - y).rem_euclid(6) == 0);
            if on_ring || hatch {
                img.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

/// Draw strokes stored in image space onto a raster shown at `ratio`.
pub fn draw_strokes(img: &mut RgbImage, strokes: &[Stroke], ratio: f64) {
    for stroke in strokes {
        let scaled: Vec<Point> = stroke
            .points
            .iter()
            .map(|p| Point::new(p.x * ratio, p.y * ratio))
            .collect();
        draw_polyline(img, &scaled, stroke.width * ratio, stroke.color);
    }
}

/// Rasterize strokes into a label mask: black background, each stroke in
/// its class color, later strokes on top.
pub fn rasterize_strokes(width: u32, height: u32, strokes: &[Stroke]) -> RgbImage {
    let mut mask = RgbImage::new(width, height);
    draw_strokes(&mut mask, strokes, 1.0);
    mask
}
