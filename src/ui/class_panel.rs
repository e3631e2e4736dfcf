// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Class list panel.
//!
//! Lists the label classes with their colors and reports which one the
//! user picked.

use crate::models::ClassSelection;

/// Display the class list. Returns the index clicked, if any.
pub fn show(ui: &mut egui::Ui, classes: &ClassSelection) -> Option<usize> {
    let mut picked = None;

    ui.heading("Classes");
    ui.separator();

    egui::ScrollArea::vertical().show(ui, |ui| {
        for (index, label) in classes.labels().iter().enumerate() {
            let [r, g, b] = label.color();
            ui.horizontal(|ui| {
                let (swatch, _) = ui.allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::hover());
                ui.painter()
                    .rect_filled(swatch, 2.0, egui::Color32::from_rgb(r, g, b));

                let selected = index == classes.current_index();
                if ui.selectable_label(selected, &label.name).clicked() {
                    picked = Some(index);
                }
            });
        }
    });

    picked
}
