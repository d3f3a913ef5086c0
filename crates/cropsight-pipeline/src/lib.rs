// SPDX-FileCopyrightText: 2026 Cropsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Orchestration for the Cropsight analysis pipeline.
//!
//! Ties the normalizer, identification client, advisor, and handoff store
//! into one state machine ([`pipeline::AnalysisPipeline`]), and provides
//! the resilience pieces the channel adapters wrap around network hops:
//! tagged call outcomes with bounded retry ([`netcall`]) and per-user
//! session memory ([`session`]).

pub mod netcall;
pub mod pipeline;
pub mod session;
pub mod summary;

pub use netcall::{CallOutcome, RetryPolicy, call_with_retry};
pub use pipeline::{AnalysisPhase, AnalysisPipeline, ConversationalAnalysis};
pub use session::SessionMemory;
pub use summary::{build_summary, consultation_summary};
