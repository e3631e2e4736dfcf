// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model shared by the engine and the front-end.

pub mod label;
pub mod settings;
pub mod stroke;

pub use label::{ClassProvider, ClassSelection, Label, LabelSet};
pub use settings::Settings;
pub use stroke::{Point, Stroke, StrokeBuilder};
