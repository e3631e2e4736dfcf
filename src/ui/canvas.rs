// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for frame display and freehand annotation.
//!
//! `AnnotationCanvas` holds the displayed frame, captures strokes while
//! editable and renders the cursor and stroke overlays into an RGB raster.
//! It knows nothing about scrolling: zooming returns a `ViewportShift` for
//! the hosting viewport to apply. `show` puts the canvas on screen with
//! egui and turns pointer input into canvas calls.

use crate::error::PreconditionError;
use crate::models::{ClassProvider, Point, Stroke, StrokeBuilder};
use crate::util::geometry::{remap_after_zoom, DirtyRect, ScaleModel};
use crate::util::raster::{blend, draw_cursor, draw_polyline};
use image::imageops::{self, FilterType};
use image::RgbImage;
use std::sync::Arc;

/// Pen radius in screen pixels when the canvas is created.
pub const DEFAULT_PEN_RADIUS: i32 = 10;
/// Width of the cursor ring.
const CURSOR_EDGE: i32 = 2;
/// Extra pixels repainted around every dirty area.
const REDRAW_MARGIN: i32 = 3;

/// Result of canvas interaction.
#[derive(Debug)]
pub enum CanvasAction {
    None,
    /// A stroke was released and should go to the labeling session
    StrokeFinished(Stroke),
    /// The zoom changed; the viewport should shift to keep the anchor fixed
    Zoomed(ViewportShift),
}

/// Zoom notification for the hosting viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportShift {
    /// Pointer position on the canvas before the zoom
    pub anchor: Point,
    pub old_ratio: f64,
    pub new_ratio: f64,
    /// Where the content under the anchor sits after the zoom
    pub anchor_after: Point,
}

/// Which picture the canvas shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// The frame at the zoom rank's ratio
    Scaled,
    /// The frame at 100%, rank untouched
    Normal,
    /// The frame blended with the reference image
    Reference,
}

/// What the host needs to re-upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repaint {
    None,
    Full,
    Region(DirtyRect),
}

/// The pen a stroke is drawn with.
#[derive(Debug, Clone, PartialEq)]
struct Pen {
    label: String,
    color: [u8; 3],
}

/// Frame display plus freehand stroke capture.
pub struct AnnotationCanvas {
    /// The frame as supplied by the controller; never drawn on
    original: Option<Arc<RgbImage>>,
    /// Scaled copy that overlays are composited on
    display: RgbImage,
    reference: Option<RgbImage>,
    /// Strokes already handed to the session, in image space
    committed: Vec<Stroke>,
    scale: ScaleModel,
    view: ViewMode,
    editable: bool,
    pen: Pen,
    pen_radius: i32,
    cursor: Option<Point>,
    cursor_visible: bool,
    hovered: bool,
    /// In-progress stroke, image space
    stroke: Option<StrokeBuilder>,
    /// In-progress stroke, screen space; only for rendering
    screen_path: Vec<Point>,
    last_point: Point,
    dirty: Option<DirtyRect>,
    full_repaint: bool,
}

impl Default for AnnotationCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnotationCanvas {
    pub fn new() -> Self {
        Self {
            original: None,
            display: RgbImage::new(0, 0),
            reference: None,
            committed: Vec::new(),
            scale: ScaleModel::new(),
            view: ViewMode::Scaled,
            editable: false,
            pen: Pen {
                label: String::new(),
                color: [0, 0, 0],
            },
            pen_radius: DEFAULT_PEN_RADIUS,
            cursor: None,
            cursor_visible: false,
            hovered: false,
            stroke: None,
            screen_path: Vec::new(),
            last_point: Point::default(),
            dirty: None,
            full_repaint: true,
        }
    }

    /// Show a new frame. Any stroke in progress is dropped.
    pub fn set_image(&mut self, image: Arc<RgbImage>) {
        self.original = Some(image);
        self.cancel_stroke();
        self.rebuild_display();
    }

    pub fn has_image(&self) -> bool {
        self.original.is_some()
    }

    pub fn image(&self) -> Option<&RgbImage> {
        self.original.as_deref()
    }

    /// Size of the rendered canvas in screen pixels.
    pub fn display_size(&self) -> (u32, u32) {
        self.display.dimensions()
    }

    pub fn scale(&self) -> &ScaleModel {
        &self.scale
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    /// Toggle stroke capture and the brush cursor.
    ///
    /// Both directions rebuild the working copy from the original frame.
    pub fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
        self.cursor_visible = editable && self.hovered;
        self.cancel_stroke();
        self.rebuild_display();
    }

    /// Switch the pen class. Only honored while editable.
    pub fn change_class(&mut self, label: &str, color: [u8; 3]) {
        if !self.editable {
            return;
        }
        log::debug!("Canvas class changed to {} {:?}", label, color);
        self.pen = Pen {
            label: label.to_string(),
            color,
        };
        self.invalidate_cursor();
    }

    pub fn pen_radius(&self) -> i32 {
        self.pen_radius
    }

    /// Grow or shrink the pen by two pixels per step, never below zero.
    pub fn adjust_pen_radius(&mut self, steps: i32) {
        if !self.editable {
            return;
        }
        self.invalidate_cursor();
        self.pen_radius = (self.pen_radius + steps * 2).max(0);
        self.invalidate_cursor();
        log::debug!("Pen radius {}", self.pen_radius);
    }

    /// Full pen width in screen pixels.
    fn pen_width(&self) -> f64 {
        (self.pen_radius * 2 + 1) as f64
    }

    /// Replace the session strokes drawn on top of the frame.
    pub fn set_strokes(&mut self, strokes: Vec<Stroke>) {
        self.committed = strokes;
        self.full_repaint = true;
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.committed
    }

    /// Image blended in by the reference view.
    pub fn set_reference(&mut self, reference: Option<RgbImage>) {
        self.reference = reference;
        if self.view == ViewMode::Reference {
            self.rebuild_display();
        }
    }

    /// Show at 100% until `show_scaled`.
    pub fn show_normal(&mut self) {
        self.view = ViewMode::Normal;
        self.scale.show_normal();
        self.rebuild_display();
    }

    /// Show at the zoom rank's ratio.
    pub fn show_scaled(&mut self) {
        self.view = ViewMode::Scaled;
        self.scale.apply_rank();
        self.rebuild_display();
    }

    /// Show the frame blended half and half with the reference image.
    ///
    /// Without a reference the canvas goes blank.
    pub fn show_reference(&mut self) {
        self.view = ViewMode::Reference;
        self.rebuild_display();
    }

    /// Leave the reference view.
    pub fn show_internal(&mut self) {
        self.show_scaled();
    }

    /// Change the zoom rank by `steps` around `anchor` (screen space).
    pub fn zoom(&mut self, steps: i32, anchor: Point) -> ViewportShift {
        let old_ratio = self.scale.ratio();
        self.scale.set_rank(self.scale.rank() + steps);
        let new_ratio = self.scale.ratio();
        let anchor_after = remap_after_zoom(anchor, old_ratio, new_ratio);
        self.rebuild_display();
        ViewportShift {
            anchor,
            old_ratio,
            new_ratio,
            anchor_after,
        }
    }

    /// Set the zoom ratio directly, e.g. to fit the frame to a window.
    pub fn set_ratio(&mut self, ratio: f64, maximum: f64, minimum: f64) -> Result<(), PreconditionError> {
        self.scale.set_ratio_direct(ratio, maximum, minimum)?;
        self.rebuild_display();
        Ok(())
    }

    pub fn is_drawing(&self) -> bool {
        self.stroke.is_some()
    }

    pub fn cursor(&self) -> Option<Point> {
        self.cursor
    }

    pub fn is_cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    /// Begin a stroke at `point`. Ignored unless editable.
    ///
    /// The pen takes the provider's current class.
    pub fn on_press_start(&mut self, point: Point, classes: &dyn ClassProvider) -> bool {
        if !self.editable || self.original.is_none() {
            return false;
        }
        let (label, color) = classes.current_class();
        self.pen = Pen {
            label: label.to_string(),
            color,
        };

        let mut builder = StrokeBuilder::new(self.pen_width() / self.scale.ratio());
        builder.push(self.scale.to_image_space(point));
        self.stroke = Some(builder);
        self.screen_path = vec![point];
        self.last_point = point;
        self.mark_dirty(DirtyRect::around(point, self.pen_radius + REDRAW_MARGIN));
        true
    }

    /// Pointer moved to `point`: extend the stroke if one is in progress and
    /// move the cursor.
    pub fn on_drag(&mut self, point: Point) {
        if !self.editable {
            return;
        }
        if let Some(builder) = self.stroke.as_mut() {
            builder.push(self.scale.to_image_space(point));
            self.screen_path.push(point);
            let segment = DirtyRect::spanning(self.last_point, point);
            self.mark_dirty(segment.grow(self.pen_radius + REDRAW_MARGIN));
            self.last_point = point;
        }

        self.invalidate_cursor();
        self.cursor = Some(point);
        self.invalidate_cursor();
    }

    /// Finish the stroke in progress. The pen color at this moment is the
    /// one stored.
    pub fn on_release(&mut self) -> Option<Stroke> {
        let builder = self.stroke.take()?;
        if let Some(bounds) = self.screen_path_bounds() {
            self.mark_dirty(bounds.grow(self.pen_radius + REDRAW_MARGIN));
        }
        self.screen_path.clear();
        if !self.editable || builder.is_empty() {
            return None;
        }
        Some(builder.finish(self.pen.label.clone(), self.pen.color))
    }

    /// Pointer entered or left the canvas.
    pub fn set_hovered(&mut self, hovered: bool) {
        if hovered == self.hovered {
            return;
        }
        self.hovered = hovered;
        if self.editable {
            self.invalidate_cursor();
            self.cursor_visible = hovered;
        }
    }

    /// Take what changed since the last call.
    pub fn take_repaint(&mut self) -> Repaint {
        let dirty = self.dirty.take();
        if std::mem::take(&mut self.full_repaint) {
            return Repaint::Full;
        }
        match dirty {
            Some(rect) => {
                let (w, h) = self.display_size();
                let rect = rect.clamp_to(w, h);
                if rect.is_empty() {
                    Repaint::None
                } else {
                    Repaint::Region(rect)
                }
            }
            None => Repaint::None,
        }
    }

    /// Render the whole canvas.
    pub fn render(&self) -> RgbImage {
        let (w, h) = self.display_size();
        self.render_region(DirtyRect::new(0, 0, w as i32, h as i32))
    }

    /// Render one area of the canvas, clamped to its bounds.
    pub fn render_region(&self, rect: DirtyRect) -> RgbImage {
        let (w, h) = self.display_size();
        let rect = rect.clamp_to(w, h);
        if rect.is_empty() {
            return RgbImage::new(0, 0);
        }
        let mut out = imageops::crop_imm(
            &self.display,
            rect.x as u32,
            rect.y as u32,
            rect.width as u32,
            rect.height as u32,
        )
        .to_image();
        let origin = Point::new(rect.x as f64, rect.y as f64);
        let shift = |p: Point| Point::new(p.x - origin.x, p.y - origin.y);

        if self.view != ViewMode::Reference {
            let ratio = self.scale.ratio();
            for stroke in &self.committed {
                let points: Vec<Point> = stroke
                    .points
                    .iter()
                    .map(|p| shift(self.scale.to_screen_space(*p)))
                    .collect();
                draw_polyline(&mut out, &points, stroke.width * ratio, stroke.color);
            }
        }

        if self.editable {
            if self.stroke.is_some() {
                let points: Vec<Point> = self.screen_path.iter().map(|p| shift(*p)).collect();
                draw_polyline(&mut out, &points, self.pen_width(), self.pen.color);
            }
            if let (true, Some(cursor)) = (self.cursor_visible, self.cursor) {
                draw_cursor(
                    &mut out,
                    shift(cursor),
                    self.pen_radius as f64,
                    CURSOR_EDGE as f64,
                    self.pen.color,
                );
            }
        }
        out
    }

    fn cancel_stroke(&mut self) {
        self.stroke = None;
        self.screen_path.clear();
    }

    fn screen_path_bounds(&self) -> Option<DirtyRect> {
        let first = *self.screen_path.first()?;
        Some(
            self.screen_path
                .iter()
                .fold(DirtyRect::spanning(first, first), |acc, p| {
                    acc.union(DirtyRect::spanning(*p, *p))
                }),
        )
    }

    fn invalidate_cursor(&mut self) {
        if let Some(cursor) = self.cursor {
            self.mark_dirty(DirtyRect::around(
                cursor,
                self.pen_radius + CURSOR_EDGE + REDRAW_MARGIN,
            ));
        }
    }

    fn mark_dirty(&mut self, rect: DirtyRect) {
        self.dirty = Some(match self.dirty {
            Some(existing) => existing.union(rect),
            None => rect,
        });
    }

    /// Recreate the working copy from the original for the current view.
    fn rebuild_display(&mut self) {
        self.full_repaint = true;
        let Some(original) = self.original.clone() else {
            self.display = RgbImage::new(0, 0);
            return;
        };

        self.display = match self.view {
            ViewMode::Reference => match &self.reference {
                Some(reference) => match blend(&original, 0.5, reference, 0.5) {
                    Ok(blended) => self.scaled(&blended),
                    Err(e) => {
                        log::error!("Reference overlay unavailable: {}", e);
                        self.blank()
                    }
                },
                None => self.blank(),
            },
            ViewMode::Scaled | ViewMode::Normal => self.scaled(&original),
        };
    }

    fn scaled(&self, image: &RgbImage) -> RgbImage {
        let (w, h) = self.scale.scaled_size(image.width(), image.height());
        if (w, h) == image.dimensions() {
            image.clone()
        } else {
            imageops::resize(image, w, h, FilterType::Triangle)
        }
    }

    fn blank(&self) -> RgbImage {
        match &self.original {
            Some(original) => {
                let (w, h) = self.scale.scaled_size(original.width(), original.height());
                RgbImage::new(w, h)
            }
            None => RgbImage::new(0, 0),
        }
    }
}

const TEXTURE_OPTIONS: egui::TextureOptions = egui::TextureOptions::NEAREST;

fn to_color_image(image: &RgbImage) -> egui::ColorImage {
    let size = [image.width() as usize, image.height() as usize];
    egui::ColorImage::from_rgb(size, image.as_raw())
}

/// Upload what changed to the texture, partially when possible.
fn sync_texture(ctx: &egui::Context, canvas: &mut AnnotationCanvas, texture: &mut Option<egui::TextureHandle>) {
    let (w, h) = canvas.display_size();
    let repaint = canvas.take_repaint();
    let reusable = texture
        .as_ref()
        .map(|handle| handle.size() == [w as usize, h as usize])
        .unwrap_or(false);

    if !reusable {
        *texture = Some(ctx.load_texture(
            "annotation_canvas",
            to_color_image(&canvas.render()),
            TEXTURE_OPTIONS,
        ));
        return;
    }

    if let Some(handle) = texture.as_mut() {
        match repaint {
            Repaint::None => {}
            Repaint::Full => handle.set(to_color_image(&canvas.render()), TEXTURE_OPTIONS),
            Repaint::Region(rect) => {
                let region = canvas.render_region(rect);
                handle.set_partial(
                    [rect.x as usize, rect.y as usize],
                    to_color_image(&region),
                    TEXTURE_OPTIONS,
                );
            }
        }
    }
}

/// Display the canvas and handle mouse interactions.
pub fn show(
    ui: &mut egui::Ui,
    canvas: &mut AnnotationCanvas,
    texture: &mut Option<egui::TextureHandle>,
    classes: &dyn ClassProvider,
) -> CanvasAction {
    let mut action = CanvasAction::None;

    if !canvas.has_image() {
        ui.centered_and_justified(|ui| {
            ui.label(
                egui::RichText::new("No frame loaded")
                    .color(egui::Color32::from_gray(180)),
            );
        });
        return action;
    }

    sync_texture(ui.ctx(), canvas, texture);
    let (w, h) = canvas.display_size();
    let (rect, response) =
        ui.allocate_exact_size(egui::vec2(w as f32, h as f32), egui::Sense::click_and_drag());
    if let Some(handle) = texture.as_ref() {
        ui.painter().image(
            handle.id(),
            rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );
    }

    let to_local = |pos: egui::Pos2| Point::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64);
    let (pointer, pressed, released, scroll, modifiers) = ui.input(|i| {
        (
            i.pointer.interact_pos(),
            i.pointer.primary_pressed(),
            i.pointer.primary_released(),
            i.raw_scroll_delta,
            i.modifiers,
        )
    });

    let hovered = response.hovered();
    canvas.set_hovered(hovered);

    if let Some(pos) = pointer {
        let local = to_local(pos);
        if pressed && hovered {
            canvas.on_press_start(local, classes);
        }
        if (hovered || canvas.is_drawing()) && canvas.cursor() != Some(local) {
            canvas.on_drag(local);
        }
    }
    if released {
        if let Some(stroke) = canvas.on_release() {
            action = CanvasAction::StrokeFinished(stroke);
        }
    }

    if hovered {
        let delta = if scroll.y != 0.0 { scroll.y } else { scroll.x };
        let steps = if delta > 0.0 {
            1
        } else if delta < 0.0 {
            -1
        } else {
            0
        };
        if steps != 0 {
            if modifiers.alt {
                if let Some(pos) = pointer {
                    action = CanvasAction::Zoomed(canvas.zoom(steps, to_local(pos)));
                }
            } else if modifiers.ctrl || modifiers.command {
                canvas.adjust_pen_radius(steps);
            }
        }
    }

    action
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    struct FixedClass(&'static str, [u8; 3]);

    impl ClassProvider for FixedClass {
        fn current_class(&self) -> (&str, [u8; 3]) {
            (self.0, self.1)
        }
    }

    fn canvas(width: u32, height: u32) -> AnnotationCanvas {
        let mut canvas = AnnotationCanvas::new();
        canvas.set_image(Arc::new(RgbImage::from_pixel(width, height, Rgb([50, 60, 70]))));
        canvas
    }

    #[test]
    fn test_press_ignored_when_not_editable() {
        let mut canvas = canvas(40, 30);
        assert!(!canvas.on_press_start(Point::new(5.0, 5.0), &FixedClass("car", [255, 0, 0])));
        canvas.on_drag(Point::new(10.0, 10.0));
        assert!(canvas.on_release().is_none());
    }

    #[test]
    fn test_stroke_stored_in_image_space() {
        let mut canvas = canvas(100, 100);
        canvas.set_editable(true);
        canvas.zoom(1, Point::new(0.0, 0.0));
        assert!((canvas.scale().ratio() - 1.25).abs() < 1e-9);

        let class = FixedClass("car", [255, 0, 0]);
        assert!(canvas.on_press_start(Point::new(25.0, 50.0), &class));
        canvas.on_drag(Point::new(50.0, 50.0));
        canvas.on_drag(Point::new(50.0, 75.0));
        let stroke = canvas.on_release().unwrap();

        assert_eq!(
            stroke.points,
            vec![Point::new(20.0, 40.0), Point::new(40.0, 40.0), Point::new(40.0, 60.0)]
        );
        assert!((stroke.width - 21.0 / 1.25).abs() < 1e-9);
        assert_eq!(stroke.label, "car");
        assert_eq!(stroke.color, [255, 0, 0]);
        assert!(!canvas.is_drawing());
        assert!(canvas.on_release().is_none());
    }

    #[test]
    fn test_color_at_release_is_kept() {
        let mut canvas = canvas(30, 30);
        canvas.set_editable(true);
        canvas.on_press_start(Point::new(1.0, 1.0), &FixedClass("car", [255, 0, 0]));
        canvas.on_drag(Point::new(9.0, 9.0));
        canvas.change_class("road", [0, 255, 0]);
        let stroke = canvas.on_release().unwrap();
        assert_eq!(stroke.label, "road");
        assert_eq!(stroke.color, [0, 255, 0]);
    }

    #[test]
    fn test_drag_requests_minimal_redraw() {
        let mut canvas = canvas(400, 400);
        canvas.set_editable(true);
        let _ = canvas.take_repaint();

        canvas.on_press_start(Point::new(100.0, 100.0), &FixedClass("a", [1, 1, 1]));
        let _ = canvas.take_repaint();
        canvas.on_drag(Point::new(110.0, 104.0));

        let margin = DEFAULT_PEN_RADIUS + CURSOR_EDGE + REDRAW_MARGIN;
        match canvas.take_repaint() {
            Repaint::Region(rect) => {
                assert!(rect.x >= 100 - margin && rect.right() <= 111 + margin);
                assert!(rect.width < 400 && rect.height < 400);
            }
            other => panic!("expected a region, got {:?}", other),
        }
        assert_eq!(canvas.take_repaint(), Repaint::None);
    }

    #[test]
    fn test_editing_never_touches_original() {
        let mut canvas = canvas(20, 20);
        let before = canvas.image().unwrap().clone();
        canvas.set_editable(true);
        canvas.on_press_start(Point::new(5.0, 5.0), &FixedClass("a", [255, 255, 255]));
        canvas.on_drag(Point::new(15.0, 15.0));
        let stroke = canvas.on_release().unwrap();
        canvas.set_strokes(vec![stroke]);

        let rendered = canvas.render();
        assert_eq!(rendered.get_pixel(10, 10).0, [255, 255, 255]);
        assert_eq!(canvas.image().unwrap(), &before);
    }

    #[test]
    fn test_zoom_sequence_and_shift() {
        let mut canvas = canvas(80, 40);
        let mut last = None;
        for step in [1, 1, -1] {
            last = Some(canvas.zoom(step, Point::new(40.0, 20.0)));
        }
        assert_eq!(canvas.scale().rank(), 1);
        assert!((canvas.scale().ratio() - 1.25).abs() < 1e-9);
        assert_eq!(canvas.display_size(), (100, 50));

        let shift = last.unwrap();
        assert!((shift.old_ratio - 1.5625).abs() < 1e-9);
        assert!((shift.new_ratio - 1.25).abs() < 1e-9);
        assert!((shift.anchor_after.x - 32.0).abs() < 1e-9);
    }

    #[test]
    fn test_reference_view_blends() {
        let mut canvas = canvas(10, 10);
        canvas.set_reference(Some(RgbImage::from_pixel(10, 10, Rgb([150, 160, 170]))));
        canvas.show_reference();
        assert_eq!(canvas.render().get_pixel(3, 3).0, [100, 110, 120]);

        canvas.show_internal();
        assert_eq!(canvas.render().get_pixel(3, 3).0, [50, 60, 70]);
    }

    #[test]
    fn test_reference_view_blank_without_reference() {
        let mut canvas = canvas(10, 10);
        canvas.show_reference();
        assert!(canvas.render().pixels().all(|p| p.0 == [0, 0, 0]));
        assert_eq!(canvas.display_size(), (10, 10));
    }

    #[test]
    fn test_show_normal_and_back() {
        let mut canvas = canvas(100, 100);
        canvas.zoom(2, Point::new(0.0, 0.0));
        canvas.show_normal();
        assert_eq!(canvas.display_size(), (100, 100));
        assert_eq!(canvas.scale().rank(), 2);
        canvas.show_scaled();
        assert_eq!(canvas.display_size(), (156, 156));
    }

    #[test]
    fn test_pen_radius_floor() {
        let mut canvas = canvas(10, 10);
        canvas.set_editable(true);
        canvas.adjust_pen_radius(-20);
        assert_eq!(canvas.pen_radius(), 0);
        canvas.adjust_pen_radius(3);
        assert_eq!(canvas.pen_radius(), 6);
    }

    #[test]
    fn test_cursor_follows_hover() {
        let mut canvas = canvas(50, 50);
        canvas.set_editable(true);
        canvas.set_hovered(true);
        canvas.on_drag(Point::new(25.0, 25.0));
        assert!(canvas.is_cursor_visible());
        canvas.set_hovered(false);
        assert!(!canvas.is_cursor_visible());
        canvas.set_editable(false);
        canvas.set_hovered(true);
        assert!(!canvas.is_cursor_visible());
    }

    #[test]
    fn test_rejected_ratio_keeps_display() {
        let mut canvas = canvas(20, 20);
        assert!(canvas.set_ratio(0.0, 10.0, 0.1).is_err());
        assert_eq!(canvas.display_size(), (20, 20));
    }
}
