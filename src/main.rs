// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame labeler desktop application.
//!
//! Reads a settings file naming the media, the output directory, the frame
//! interval and the label classes, then opens the labeling window.

use anyhow::{Context, Result};
use clap::Parser;
use framelabeler::io::serialization::{ensure_output_dir, load_settings};
use framelabeler::io::DirectoryStore;
use framelabeler::{LabelerApp, SessionController};
use std::path::{Path, PathBuf};

/// Label objects in video frames and images with freehand strokes.
#[derive(Parser, Debug)]
#[command(name = "framelabeler", version, about)]
struct Cli {
    /// Settings file (.yaml, .yml or .json)
    #[arg(value_name = "SETTINGS")]
    settings: PathBuf,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

/// Ask before creating a missing output directory.
fn confirm_create(path: &Path) -> bool {
    let answer = rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Info)
        .set_title("Output directory")
        .set_description(format!(
            "Output directory {} does not exist. Create it?",
            path.display()
        ))
        .set_buttons(rfd::MessageButtons::YesNo)
        .show();
    answer == rfd::MessageDialogResult::Yes
}

fn show_error(message: &str) {
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title("Frame labeler")
        .set_description(message)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}

/// Everything that has to succeed before a window opens.
fn prepare(cli: &Cli) -> Result<SessionController> {
    let settings = load_settings(&cli.settings)?;
    ensure_output_dir(&settings.output_dir, confirm_create)?;

    let store = DirectoryStore::new(&settings.output_dir, &settings.input_path);
    let mut controller = SessionController::new(settings, Box::new(store));
    controller.start().context("cannot open input")?;
    Ok(controller)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let controller = match prepare(&cli) {
        Ok(controller) => controller,
        Err(e) => {
            log::error!("{:#}", e);
            show_error(&format!("{:#}", e));
            return Err(e);
        }
    };

    let title = format!("Frame labeler - {}", controller.settings().input_path.display());
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title(title),
        ..Default::default()
    };

    eframe::run_native(
        "framelabeler",
        options,
        Box::new(move |_cc| Ok(Box::new(LabelerApp::new(controller)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
