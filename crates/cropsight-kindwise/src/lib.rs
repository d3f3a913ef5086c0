// SPDX-FileCopyrightText: 2026 Cropsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identification-service integration for Cropsight.
//!
//! [`client::IdentificationClient`] submits normalized images to the remote
//! vision service; [`parser::parse`] extracts a uniform
//! [`cropsight_core::AnalysisResult`] from its partially-optional response.

pub mod client;
pub mod parser;

pub use client::IdentificationClient;
pub use parser::parse;
