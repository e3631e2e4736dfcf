// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Persistence of per-frame label results.
//!
//! The engine only talks to the `LabelStore` trait. `DirectoryStore` keeps
//! one JSON result and one label mask image per frame in the output
//! directory.

use super::serialization::{export_json, import_json, FrameResult};
use crate::models::{LabelSet, Stroke};
use crate::util::raster::rasterize_strokes;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Where labeling sessions save to and load from.
pub trait LabelStore {
    /// Persist the strokes of one frame.
    fn save(
        &mut self,
        frame_index: usize,
        frame_size: (u32, u32),
        strokes: &[Stroke],
        labels: &LabelSet,
    ) -> Result<()>;

    /// Strokes saved earlier for a frame, if any.
    fn load(&self, frame_index: usize) -> Result<Option<Vec<Stroke>>>;

    /// Show the storage location to the user.
    fn open_storage_location(&self) -> Result<()>;
}

/// Stores results as `<stem>_<index>.json` and `<stem>_<index>.png`.
pub struct DirectoryStore {
    dir: PathBuf,
    stem: String,
}

impl DirectoryStore {
    /// Store for media `input` inside `dir`. File names start with the
    /// input's file stem.
    pub fn new(dir: impl Into<PathBuf>, input: &Path) -> Self {
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("frame")
            .to_string();
        Self {
            dir: dir.into(),
            stem,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn result_path(&self, frame_index: usize) -> PathBuf {
        self.dir.join(format!("{}_{:06}.json", self.stem, frame_index))
    }

    pub fn mask_path(&self, frame_index: usize) -> PathBuf {
        self.dir.join(format!("{}_{:06}.png", self.stem, frame_index))
    }
}

impl LabelStore for DirectoryStore {
    fn save(
        &mut self,
        frame_index: usize,
        frame_size: (u32, u32),
        strokes: &[Stroke],
        labels: &LabelSet,
    ) -> Result<()> {
        let result = FrameResult {
            frame_index,
            frame_width: frame_size.0,
            frame_height: frame_size.1,
            labels: labels.clone(),
            strokes: strokes.to_vec(),
        };
        let json_path = self.result_path(frame_index);
        export_json(&result, &json_path)
            .with_context(|| format!("writing {}", json_path.display()))?;

        let mask = rasterize_strokes(frame_size.0, frame_size.1, strokes);
        let mask_path = self.mask_path(frame_index);
        mask.save(&mask_path)
            .with_context(|| format!("writing {}", mask_path.display()))?;

        log::info!(
            "Saved {} strokes for frame {} to {}",
            strokes.len(),
            frame_index,
            json_path.display()
        );
        Ok(())
    }

    fn load(&self, frame_index: usize) -> Result<Option<Vec<Stroke>>> {
        let path = self.result_path(frame_index);
        if !path.exists() {
            return Ok(None);
        }
        let result = import_json(&path).with_context(|| format!("reading {}", path.display()))?;
        Ok(Some(result.strokes))
    }

    fn open_storage_location(&self) -> Result<()> {
        #[cfg(target_os = "windows")]
        let opener = "explorer";
        #[cfg(target_os = "macos")]
        let opener = "open";
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        let opener = "xdg-open";

        std::process::Command::new(opener)
            .arg(&self.dir)
            .spawn()
            .with_context(|| format!("opening {}", self.dir.display()))?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Label, Point};

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = std::env::temp_dir().join(format!("framelabeler-store-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let mut store = DirectoryStore::new(&dir, Path::new("/videos/street.avi"));
        let labels = LabelSet::new(vec![Label::new("car", 255, 0, 0)]).unwrap();
        let strokes = vec![Stroke {
            label: "car".into(),
            color: [255, 0, 0],
            width: 3.0,
            points: vec![Point::new(1.0, 1.0), Point::new(6.0, 4.0)],
        }];

        assert!(store.load(15).unwrap().is_none());
        store.save(15, (10, 8), &strokes, &labels).unwrap();

        assert!(store.result_path(15).ends_with("street_000015.json"));
        assert!(store.mask_path(15).exists());
        let mask = image::open(store.mask_path(15)).unwrap().to_rgb8();
        assert_eq!(mask.get_pixel(1, 1).0, [255, 0, 0]);
        assert_eq!(store.load(15).unwrap(), Some(strokes));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
