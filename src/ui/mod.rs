// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components of the frame labeler.

pub mod canvas;
pub mod class_panel;
pub mod input;
pub mod toolbar;
pub mod viewport;
