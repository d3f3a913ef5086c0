// SPDX-FileCopyrightText: 2026 Cropsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for Cropsight.
//!
//! Exposes the analysis pipeline over a small REST surface: image upload
//! and analysis, consultation handoff, health, and service info.

pub mod handlers;
pub mod server;

pub use server::{GatewayState, router, start_server};
