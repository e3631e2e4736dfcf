// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! `LabelerApp` owns the session controller and the scroll viewport around
//! the canvas. Each frame it drains playback, turns widget and key input
//! into controller commands and keeps the viewport in step with zooming.

use crate::error::EngineError;
use crate::session::{Command, SessionController, SessionState};
use crate::ui::canvas::{self, CanvasAction};
use crate::ui::class_panel;
use crate::ui::input::{key_commands, InputTarget, KeyCommand};
use crate::ui::toolbar::{self, ToolbarStatus};
use crate::ui::viewport::ScrollViewport;
use std::time::Duration;

/// Repaint interval while playback is running.
const PLAYBACK_REPAINT: Duration = Duration::from_millis(15);

/// Main application state.
pub struct LabelerApp {
    controller: SessionController,

    /// Texture the canvas is uploaded to
    texture: Option<egui::TextureHandle>,

    /// Scroll state of the central area
    viewport: ScrollViewport,

    /// Offset to force on the scroll area next frame, after a zoom
    pending_scroll: Option<[f64; 2]>,

    /// Class panel pinned open from the View menu
    class_panel_pinned: bool,

    /// Last error, shown in the status bar
    message: Option<String>,
}

impl LabelerApp {
    /// Wrap a started controller.
    pub fn new(controller: SessionController) -> Self {
        Self {
            controller,
            texture: None,
            viewport: ScrollViewport::default(),
            pending_scroll: None,
            class_panel_pinned: false,
            message: None,
        }
    }

    fn run(&mut self, command: Command) {
        let result = self.controller.handle(command);
        self.report(result);
    }

    fn report(&mut self, result: Result<(), EngineError>) {
        match result {
            Ok(()) => {}
            Err(e) => {
                log::error!("{}", e);
                self.message = Some(e.to_string());
            }
        }
    }

    fn apply_key(&mut self, key: KeyCommand) {
        match key {
            KeyCommand::PreviousFrame => self.run(Command::Previous),
            KeyCommand::NextFrame => self.run(Command::Next),
            KeyCommand::ClearStrokes => self.run(Command::ClearStrokes),
            KeyCommand::ShowNormal => self.controller.canvas_mut().show_normal(),
            KeyCommand::ShowScaled => self.controller.canvas_mut().show_scaled(),
            KeyCommand::ShowReference => self.controller.canvas_mut().show_reference(),
            KeyCommand::ShowInternal => self.controller.canvas_mut().show_internal(),
        }
    }

    fn toolbar_status(&self) -> ToolbarStatus {
        let source = self.controller.source();
        ToolbarStatus {
            state: self.controller.state(),
            playing: self.controller.is_playing(),
            auto_load: self.controller.auto_load(),
            skip_step: source.map(|s| s.saved_skip_step()).unwrap_or(1),
            frame_index: self.controller.current_frame_index().unwrap_or(0),
            frame_count: source.map(|s| s.frame_count()).unwrap_or(0),
            progress: source.map(|s| s.progress()).unwrap_or(0.0),
        }
    }

    fn status_text(&self) -> String {
        let state = match self.controller.state() {
            SessionState::Idle => "Idle",
            SessionState::Browsing => "Browsing",
            SessionState::Editing => "Labeling",
        };
        let canvas = self.controller.canvas();
        let mut text = format!(
            "{} | zoom {:.0}% | pen {}",
            state,
            canvas.scale().ratio() * 100.0,
            canvas.pen_radius()
        );
        if let Some(source) = self.controller.source() {
            text.push_str(&format!(" | {:.1} s", source.position_msec() / 1000.0));
        }
        if let Some(session) = self.controller.session() {
            text.push_str(&format!(" | {} strokes", session.strokes().len()));
        }
        text
    }
}

impl eframe::App for LabelerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let polled = self.controller.poll();
        self.report(polled);
        if self.controller.is_playing() {
            ctx.request_repaint_after(PLAYBACK_REPAINT);
        }

        if ctx.input(|i| i.viewport().close_requested()) && !self.controller.is_torn_down() {
            self.run(Command::Quit);
        }
        if self.controller.is_torn_down() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    let editing = self.controller.state() == SessionState::Editing;
                    if ui.add_enabled(editing, egui::Button::new("Save Labels")).clicked() {
                        self.run(Command::Save);
                        ui.close_menu();
                    }
                    if ui
                        .add_enabled(editing, egui::Button::new("Open Output Folder"))
                        .clicked()
                    {
                        self.run(Command::OpenStorage);
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        self.run(Command::Quit);
                        ui.close_menu();
                    }
                });

                ui.menu_button("View", |ui| {
                    if ui.button("Actual Size").clicked() {
                        self.controller.canvas_mut().show_normal();
                        ui.close_menu();
                    }
                    if ui.button("Zoomed").clicked() {
                        self.controller.canvas_mut().show_scaled();
                        ui.close_menu();
                    }
                    ui.checkbox(&mut self.class_panel_pinned, "Class Panel");
                });
            });
        });

        // Toolbar
        let status = self.toolbar_status();
        let commands = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| toolbar::show(ui, &status))
            .inner;
        for command in commands {
            self.controller.post(command);
        }
        let processed = self.controller.process_pending();
        self.report(processed);

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(self.status_text());
                if let Some(message) = &self.message {
                    ui.separator();
                    ui.colored_label(egui::Color32::from_rgb(220, 80, 80), message);
                }
            });
        });

        // Keyboard
        let (events, modifiers) = ctx.input(|i| (i.events.clone(), i.modifiers));
        let target = if ctx.wants_keyboard_input() {
            InputTarget::TextField
        } else {
            InputTarget::Canvas
        };
        let editing = self.controller.state() == SessionState::Editing;
        for key in key_commands(&events, target, editing) {
            self.apply_key(key);
        }

        // Class panel, shown while Shift is held
        if self.class_panel_pinned || modifiers.shift {
            let picked = egui::SidePanel::left("classes")
                .default_width(180.0)
                .show(ctx, |ui| class_panel::show(ui, self.controller.classes()))
                .inner;
            if let Some(index) = picked {
                self.run(Command::SelectClass(index));
            }
        }

        // Main canvas (center)
        let zooming = modifiers.alt || modifiers.ctrl || modifiers.command;
        let pending_scroll = self.pending_scroll.take();
        let output = egui::CentralPanel::default()
            .show(ctx, |ui| {
                let mut area = egui::ScrollArea::both()
                    .auto_shrink([false, false])
                    .enable_scrolling(!zooming)
                    .drag_to_scroll(false);
                if let Some([x, y]) = pending_scroll {
                    area = area.scroll_offset(egui::vec2(x as f32, y as f32));
                }
                area.show(ui, |ui| {
                    let (canvas, classes) = self.controller.canvas_and_classes();
                    canvas::show(ui, canvas, &mut self.texture, classes)
                })
            })
            .inner;

        self.viewport.offset = [output.state.offset.x as f64, output.state.offset.y as f64];
        self.viewport.view_size = [
            output.inner_rect.width() as f64,
            output.inner_rect.height() as f64,
        ];

        match output.inner {
            CanvasAction::StrokeFinished(stroke) => self.run(Command::StrokeFinished(stroke)),
            CanvasAction::Zoomed(shift) => {
                let (w, h) = self.controller.canvas().display_size();
                self.viewport.content_size = [w as f64, h as f64];
                self.viewport.shift_by(&shift);
                self.pending_scroll = Some(self.viewport.offset);
                ctx.request_repaint();
            }
            CanvasAction::None => {}
        }
    }
}
