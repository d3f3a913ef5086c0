// SPDX-FileCopyrightText: 2026 Cropsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Cropsight crop-analysis pipeline.
//!
//! Provides the error taxonomy and the domain types shared by the
//! identification client, advisor, handoff store, and channel adapters.

pub mod error;
pub mod types;

pub use error::CropsightError;
pub use types::{AnalysisResult, ConfidenceBand, CropSuggestion, DiseaseSuggestion};
