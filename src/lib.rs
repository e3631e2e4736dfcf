// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame labeler
//!
//! Step through the frames of a video or an image sequence, draw freehand
//! strokes over them and save a label result per frame.

pub mod app;
pub mod error;
pub mod io;
pub mod models;
pub mod session;
pub mod ui;
pub mod util;

pub use app::LabelerApp;
pub use error::{ConfigError, EngineError, MediaError, PreconditionError};
pub use session::{Command, SessionController, SessionState};
