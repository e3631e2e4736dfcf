// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar with playback, labeling and navigation controls.
//!
//! The toolbar never changes the controller itself; it returns the
//! commands the user asked for.

use crate::session::{Command, SessionState};

/// What the toolbar displays.
#[derive(Debug, Clone, Copy)]
pub struct ToolbarStatus {
    pub state: SessionState,
    pub playing: bool,
    pub auto_load: bool,
    pub skip_step: usize,
    pub frame_index: usize,
    pub frame_count: usize,
    pub progress: f64,
}

/// Display the toolbar and collect the commands clicked this frame.
pub fn show(ui: &mut egui::Ui, status: &ToolbarStatus) -> Vec<Command> {
    let mut commands = Vec::new();
    let open = status.state != SessionState::Idle;
    let editing = status.state == SessionState::Editing;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        let can_play = status.state == SessionState::Browsing && !status.playing;
        if ui.add_enabled(can_play, egui::Button::new("▶ Play")).clicked() {
            commands.push(Command::Play);
        }
        if ui.add_enabled(status.playing, egui::Button::new("⏸ Pause")).clicked() {
            commands.push(Command::Pause);
        }
        if ui.add_enabled(open, egui::Button::new("⏹ Stop")).clicked() {
            commands.push(Command::Stop);
        }

        ui.separator();

        if ui.add_enabled(open, egui::SelectableLabel::new(editing, "✏ Label")).clicked() {
            commands.push(Command::ToggleEditing);
        }
        if ui.add_enabled(editing, egui::Button::new("💾 Save")).clicked() {
            commands.push(Command::Save);
        }
        if ui.add_enabled(editing, egui::Button::new("📂 Output")).clicked() {
            commands.push(Command::OpenStorage);
        }
        let mut auto_load = status.auto_load;
        if ui.checkbox(&mut auto_load, "Auto-load results").changed() {
            commands.push(Command::SetAutoLoad(auto_load));
        }

        ui.separator();

        ui.label("Step:");
        let mut step = status.skip_step;
        if ui
            .add_enabled(open, egui::DragValue::new(&mut step).clamp_range(1..=10_000))
            .changed()
        {
            commands.push(Command::SetSkipStep(step));
        }

        ui.label("Frame:");
        let last = status.frame_count.saturating_sub(1);
        let mut frame = status.frame_index;
        if ui
            .add_enabled(open, egui::DragValue::new(&mut frame).clamp_range(0..=last))
            .changed()
        {
            commands.push(Command::GoTo(frame));
        }
        ui.label(egui::RichText::new(format!("/ {}", last)).weak());

        ui.add(
            egui::ProgressBar::new(status.progress as f32)
                .desired_width(160.0)
                .show_percentage(),
        );
    });

    commands
}
