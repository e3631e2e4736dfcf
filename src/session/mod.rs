// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Labeling sessions and the controller that drives them.

pub mod controller;
pub mod labeling;

pub use controller::{Command, SessionController, SessionState};
pub use labeling::LabelingSession;
