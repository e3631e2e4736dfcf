// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Media file loading (images and videos).
//!
//! This module hides how frames are decoded behind the `FrameBackend` trait.
//! Still images and directories of images are decoded with the `image`
//! crate; video files need the `video-opencv` feature.

use crate::error::MediaError;
use image::RgbImage;
use std::path::{Path, PathBuf};

/// Extensions treated as still images.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

/// Cached properties of an opened media source.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MediaProperties {
    /// Frames per second, 0.0 when the source has no timing
    pub fps: f64,
    pub frame_count: usize,
    pub width: u32,
    pub height: u32,
}

/// A random-access frame decoder.
///
/// Implementations are moved behind the `FrameSource` lock, so they only
/// need to be `Send`.
pub trait FrameBackend: Send {
    /// Properties of the opened media.
    fn properties(&self) -> MediaProperties;

    /// Decode the frame at `index`.
    fn decode(&mut self, index: usize) -> Result<RgbImage, MediaError>;
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Open the right backend for `path`.
///
/// Directories become image sequences, image files single-frame sequences
/// and anything else is treated as a video file.
pub fn open_backend(path: &Path) -> Result<Box<dyn FrameBackend>, MediaError> {
    if !path.exists() {
        return Err(MediaError::NotFound(path.to_path_buf()));
    }
    if path.is_dir() || has_image_extension(path) {
        return Ok(Box::new(ImageSequence::open(path)?));
    }
    open_video(path)
}

#[cfg(feature = "video-opencv")]
fn open_video(path: &Path) -> Result<Box<dyn FrameBackend>, MediaError> {
    Ok(Box::new(opencv_video::OpenCvVideo::open(path)?))
}

#[cfg(not(feature = "video-opencv"))]
fn open_video(path: &Path) -> Result<Box<dyn FrameBackend>, MediaError> {
    log::error!(
        "{} looks like a video, but video support is not compiled in",
        path.display()
    );
    Err(MediaError::UnsupportedFormat(path.to_path_buf()))
}

/// A list of still images played back as frames.
pub struct ImageSequence {
    files: Vec<PathBuf>,
    width: u32,
    height: u32,
}

impl ImageSequence {
    /// Open a directory of images (sorted by file name) or a single image.
    pub fn open(path: &Path) -> Result<Self, MediaError> {
        let files = if path.is_dir() {
            let entries = std::fs::read_dir(path)
                .map_err(|_| MediaError::UnsupportedFormat(path.to_path_buf()))?;
            let mut files: Vec<PathBuf> = entries
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && has_image_extension(p))
                .collect();
            files.sort();
            files
        } else {
            vec![path.to_path_buf()]
        };

        let first = files
            .first()
            .ok_or_else(|| MediaError::Empty(path.to_path_buf()))?;
        let (width, height) = image::image_dimensions(first)
            .map_err(|_| MediaError::UnsupportedFormat(first.clone()))?;

        log::info!(
            "Opened image sequence {} ({} frames, {}x{})",
            path.display(),
            files.len(),
            width,
            height
        );

        Ok(Self {
            files,
            width,
            height,
        })
    }
}

impl FrameBackend for ImageSequence {
    fn properties(&self) -> MediaProperties {
        MediaProperties {
            fps: 0.0,
            frame_count: self.files.len(),
            width: self.width,
            height: self.height,
        }
    }

    fn decode(&mut self, index: usize) -> Result<RgbImage, MediaError> {
        let path = self.files.get(index).ok_or(MediaError::Decode {
            index,
            message: "past the last image".to_string(),
        })?;
        let img = image::open(path).map_err(|e| MediaError::Decode {
            index,
            message: e.to_string(),
        })?;
        Ok(img.to_rgb8())
    }
}

#[cfg(feature = "video-opencv")]
mod opencv_video {
    use super::{FrameBackend, MediaProperties};
    use crate::error::MediaError;
    use image::RgbImage;
    use opencv::core::Mat;
    use opencv::prelude::*;
    use opencv::{imgproc, videoio};
    use std::path::Path;

    /// Video file decoded through OpenCV's `VideoCapture`.
    pub struct OpenCvVideo {
        capture: videoio::VideoCapture,
        properties: MediaProperties,
        /// Index the capture will return on the next plain `read`
        next_index: usize,
    }

    fn decode_error(index: usize, err: opencv::Error) -> MediaError {
        MediaError::Decode {
            index,
            message: err.to_string(),
        }
    }

    impl OpenCvVideo {
        pub fn open(path: &Path) -> Result<Self, MediaError> {
            let unsupported = || MediaError::UnsupportedFormat(path.to_path_buf());
            let name = path.to_str().ok_or_else(unsupported)?;
            let capture =
                videoio::VideoCapture::from_file(name, videoio::CAP_ANY).map_err(|_| unsupported())?;
            if !capture.is_opened().unwrap_or(false) {
                return Err(unsupported());
            }

            let get = |prop| capture.get(prop).unwrap_or(0.0);
            let properties = MediaProperties {
                fps: get(videoio::CAP_PROP_FPS),
                frame_count: get(videoio::CAP_PROP_FRAME_COUNT).max(0.0) as usize,
                width: get(videoio::CAP_PROP_FRAME_WIDTH).max(0.0) as u32,
                height: get(videoio::CAP_PROP_FRAME_HEIGHT).max(0.0) as u32,
            };
            if properties.frame_count == 0 {
                return Err(MediaError::Empty(path.to_path_buf()));
            }

            log::info!(
                "Opened video {} ({} frames at {:.2} fps, {}x{})",
                path.display(),
                properties.frame_count,
                properties.fps,
                properties.width,
                properties.height
            );

            Ok(Self {
                capture,
                properties,
                next_index: 0,
            })
        }
    }

    impl FrameBackend for OpenCvVideo {
        fn properties(&self) -> MediaProperties {
            self.properties
        }

        fn decode(&mut self, index: usize) -> Result<RgbImage, MediaError> {
            if index != self.next_index {
                self.capture
                    .set(videoio::CAP_PROP_POS_FRAMES, index as f64)
                    .map_err(|e| decode_error(index, e))?;
            }

            let mut bgr = Mat::default();
            let ok = self.capture.read(&mut bgr).map_err(|e| decode_error(index, e))?;
            if !ok || bgr.empty() {
                // Force a seek on the next call; the stream position is unknown.
                self.next_index = usize::MAX;
                return Err(MediaError::Decode {
                    index,
                    message: "no frame returned".to_string(),
                });
            }
            self.next_index = index + 1;

            let mut rgb = Mat::default();
            imgproc::cvt_color(&bgr, &mut rgb, imgproc::COLOR_BGR2RGB, 0)
                .map_err(|e| decode_error(index, e))?;
            let width = rgb.cols() as u32;
            let height = rgb.rows() as u32;
            let bytes = rgb.data_bytes().map_err(|e| decode_error(index, e))?.to_vec();

            RgbImage::from_raw(width, height, bytes).ok_or(MediaError::Decode {
                index,
                message: "unexpected frame layout".to_string(),
            })
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use image::Rgb;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// In-memory clip whose frame `i` is a solid image with red = `i % 256`.
    pub struct SyntheticClip {
        pub frame_count: usize,
        pub width: u32,
        pub height: u32,
        /// Indices that fail to decode
        pub corrupt: Vec<usize>,
        /// Number of decode calls, shared with the test
        pub decodes: Arc<AtomicUsize>,
    }

    impl SyntheticClip {
        pub fn new(frame_count: usize) -> Self {
            Self {
                frame_count,
                width: 8,
                height: 6,
                corrupt: Vec::new(),
                decodes: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    pub fn frame_tag(img: &RgbImage) -> u8 {
        img.get_pixel(0, 0).0[0]
    }

    impl FrameBackend for SyntheticClip {
        fn properties(&self) -> MediaProperties {
            MediaProperties {
                fps: 25.0,
                frame_count: self.frame_count,
                width: self.width,
                height: self.height,
            }
        }

        fn decode(&mut self, index: usize) -> Result<RgbImage, MediaError> {
            self.decodes.fetch_add(1, Ordering::SeqCst);
            if index >= self.frame_count || self.corrupt.contains(&index) {
                return Err(MediaError::Decode {
                    index,
                    message: "synthetic failure".to_string(),
                });
            }
            Ok(RgbImage::from_pixel(
                self.width,
                self.height,
                Rgb([(index % 256) as u8, 0, 0]),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("framelabeler-media-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_missing_path() {
        let result = open_backend(Path::new("/definitely/not/here.avi"));
        assert!(matches!(result, Err(MediaError::NotFound(_))));
    }

    #[test]
    fn test_image_directory_sorted() {
        let dir = temp_dir("seq");
        for (name, red) in [("b.png", 2u8), ("a.png", 1), ("c.png", 3)] {
            RgbImage::from_pixel(4, 3, Rgb([red, 0, 0]))
                .save(dir.join(name))
                .unwrap();
        }
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let mut backend = open_backend(&dir).unwrap();
        let props = backend.properties();
        assert_eq!(props.frame_count, 3);
        assert_eq!((props.width, props.height), (4, 3));
        assert_eq!(backend.decode(0).unwrap().get_pixel(0, 0).0[0], 1);
        assert_eq!(backend.decode(2).unwrap().get_pixel(0, 0).0[0], 3);
        assert!(backend.decode(3).is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_empty_directory() {
        let dir = temp_dir("empty");
        assert!(matches!(open_backend(&dir), Err(MediaError::Empty(_))));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[cfg(not(feature = "video-opencv"))]
    #[test]
    fn test_video_without_backend() {
        let dir = temp_dir("video");
        let file = dir.join("clip.avi");
        std::fs::write(&file, b"not really a video").unwrap();
        assert!(matches!(
            open_backend(&file),
            Err(MediaError::UnsupportedFormat(_))
        ));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
