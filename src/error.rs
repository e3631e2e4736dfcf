// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for the labeling engine.
//!
//! Configuration, media and precondition failures are kept in separate
//! enums so callers can tell a bad settings file from an unreadable video
//! or a programming error. Running out of frames is not an error at all:
//! frame fetches return `None`.

use std::path::PathBuf;
use thiserror::Error;

/// Problems with the settings record or the paths it names.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The settings file could not be read
    #[error("cannot read settings file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file could not be parsed
    #[error("cannot parse settings file {path:?}: {message}")]
    Parse { path: PathBuf, message: String },

    /// A required field is empty or missing
    #[error("please specify <{0}>")]
    MissingField(&'static str),

    /// The frame interval must be a positive integer
    #[error("labeling frame interval must be a positive integer, got {0}")]
    InvalidInterval(i64),

    /// Two labels share a name
    #[error("duplicate label name '{0}'")]
    DuplicateLabel(String),

    /// The input file or directory does not exist
    #[error("input path does not exist: {0:?}")]
    InputNotFound(PathBuf),

    /// The output directory is missing and was not created
    #[error("output directory is not valid: {path:?} ({reason})")]
    OutputDir { path: PathBuf, reason: String },
}

/// Problems opening or decoding media.
#[derive(Error, Debug)]
pub enum MediaError {
    /// Nothing exists at the given path
    #[error("media not found: {0:?}")]
    NotFound(PathBuf),

    /// The path exists but no backend can decode it
    #[error("unsupported media format: {0:?}")]
    UnsupportedFormat(PathBuf),

    /// The source opened but holds no frames
    #[error("media contains no frames: {0:?}")]
    Empty(PathBuf),

    /// A single frame failed to decode
    #[error("failed to decode frame {index}: {message}")]
    Decode { index: usize, message: String },

    /// An operation needed an open source
    #[error("no media is open")]
    NotOpen,
}

/// Programming errors: calls that violate an operation's contract.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PreconditionError {
    /// Images passed to a blend differ in size
    #[error("cannot blend {left:?} with {right:?}: sizes differ")]
    SizeMismatch {
        left: (u32, u32),
        right: (u32, u32),
    },

    /// A scale ratio must stay strictly positive
    #[error("scale ratio must be positive, got {0}")]
    NonPositiveRatio(f64),
}

/// Any failure surfaced by the session controller.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("media error: {0}")]
    Media(#[from] MediaError),

    #[error("precondition violated: {0}")]
    Precondition(#[from] PreconditionError),

    /// The persistence service failed
    #[error("storage error: {0:#}")]
    Storage(anyhow::Error),
}

impl EngineError {
    /// True for errors that require fixing the settings file.
    pub fn is_config(&self) -> bool {
        matches!(self, EngineError::Config(_))
    }
}
