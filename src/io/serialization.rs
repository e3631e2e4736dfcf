// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Settings and label result serialization.
//!
//! Settings files and frame results are read and written in YAML or JSON,
//! chosen by file extension.

use crate::error::ConfigError;
use crate::models::{LabelSet, Settings, Stroke};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Saved labeling result of one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameResult {
    pub frame_index: usize,
    pub frame_width: u32,
    pub frame_height: u32,
    pub labels: LabelSet,
    pub strokes: Vec<Stroke>,
}

/// Load and validate a settings file (`.yaml`/`.yml` or `.json`).
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let parse_error = |message: String| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    };
    let extension = path.extension().and_then(|s| s.to_str());
    let settings: Settings = match extension {
        Some("json") => serde_json::from_str(&text).map_err(|e| parse_error(e.to_string()))?,
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str(&text).map_err(|e| parse_error(e.to_string()))?
        }
        _ => return Err(parse_error(format!("unsupported settings extension {:?}", extension))),
    };
    settings.validate()?;

    log::info!(
        "Loaded settings: input {}, output {}, interval {}, {} labels",
        settings.input_path.display(),
        settings.output_dir.display(),
        settings.labeling_frame_interval,
        settings.labels.len()
    );
    Ok(settings)
}

/// Make sure the output directory exists.
///
/// A missing directory is created only if `confirm` agrees.
pub fn ensure_output_dir(path: &Path, confirm: impl FnOnce(&Path) -> bool) -> Result<(), ConfigError> {
    if path.is_dir() {
        return Ok(());
    }
    let invalid = |reason: &str| ConfigError::OutputDir {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };
    if path.exists() {
        return Err(invalid("not a directory"));
    }
    if !confirm(path) {
        return Err(invalid("creation declined"));
    }
    std::fs::create_dir_all(path).map_err(|e| invalid(&e.to_string()))?;
    log::info!("Created output directory {}", path.display());
    Ok(())
}

/// Export a frame result to JSON format.
pub fn export_json(data: &FrameResult, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Import a frame result from JSON format.
pub fn import_json(path: &Path) -> Result<FrameResult> {
    let json = std::fs::read_to_string(path)?;
    let data = serde_json::from_str(&json)?;
    Ok(data)
}
