// SPDX-FileCopyrightText: 2026 Cropsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loading, model, and validation for Cropsight.
//!
//! Merges compiled defaults, TOML files in the XDG hierarchy, and
//! `CROPSIGHT_*` environment variables into a [`model::CropsightConfig`].

pub mod loader;
pub mod model;
pub mod validation;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::CropsightConfig;
pub use validation::{Frontend, validate_config};
