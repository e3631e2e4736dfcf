// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Labeling job settings.
//!
//! The settings record names the media to label, where results go, how many
//! frames to advance per labeling step and which classes exist.

use super::label::LabelSet;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings of one labeling job, as read from the settings file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Video file, image file or directory of images
    #[serde(alias = "InputFilePath")]
    pub input_path: PathBuf,
    /// Directory receiving per-frame label results
    #[serde(alias = "OutputDir")]
    pub output_dir: PathBuf,
    /// Frames advanced per labeling step
    #[serde(alias = "Labeling_Frame_Interval")]
    pub labeling_frame_interval: i64,
    /// Available classes
    #[serde(alias = "LabelList")]
    pub labels: LabelSet,
    /// Load previously saved strokes when a frame is opened for editing
    #[serde(default)]
    pub auto_load_result: bool,
}

impl Settings {
    /// Check the preconditions the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingField("InputFilePath"));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::MissingField("OutputDir"));
        }
        if self.labeling_frame_interval <= 0 {
            return Err(ConfigError::InvalidInterval(self.labeling_frame_interval));
        }
        if self.labels.is_empty() {
            return Err(ConfigError::MissingField("LabelList"));
        }
        Ok(())
    }

    /// Frame interval as a step count. Only meaningful after `validate`.
    pub fn skip_step(&self) -> usize {
        self.labeling_frame_interval.max(1) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::label::Label;

    fn settings(interval: i64, labels: Vec<Label>) -> Settings {
        Settings {
            input_path: PathBuf::from("clip.avi"),
            output_dir: PathBuf::from("out"),
            labeling_frame_interval: interval,
            labels: LabelSet::new(labels).unwrap(),
            auto_load_result: false,
        }
    }

    #[test]
    fn test_valid_settings() {
        let s = settings(5, vec![Label::new("car", 255, 0, 0)]);
        assert!(s.validate().is_ok());
        assert_eq!(s.skip_step(), 5);
    }

    #[test]
    fn test_interval_must_be_positive() {
        let s = settings(0, vec![Label::new("car", 255, 0, 0)]);
        assert!(matches!(s.validate(), Err(ConfigError::InvalidInterval(0))));
    }

    #[test]
    fn test_labels_required() {
        let s = settings(1, vec![]);
        assert!(matches!(
            s.validate(),
            Err(ConfigError::MissingField("LabelList"))
        ));
    }

    #[test]
    fn test_empty_input_path() {
        let mut s = settings(1, vec![Label::new("car", 255, 0, 0)]);
        s.input_path = PathBuf::new();
        assert!(matches!(
            s.validate(),
            Err(ConfigError::MissingField("InputFilePath"))
        ));
    }
}
