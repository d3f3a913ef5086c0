// SPDX-FileCopyrightText: 2026 Cropsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bot conversation flows, separated from the transport so they can be
//! exercised with an injected downloader and mocked services.
//!
//! Each flow returns either the text to send on success or the single
//! user-facing failure reply. One inbound message produces at most one
//! failure reply, however many retries happened underneath.

use cropsight_advisor::TreatmentAdvisor;
use cropsight_core::CropsightError;
use cropsight_pipeline::{AnalysisPipeline, CallOutcome, RetryPolicy, SessionMemory, call_with_retry};
use tracing::warn;

use crate::replies;

/// Downloads photo bytes under the retry policy.
///
/// Transient failures are retried; exhaustion or a permanent failure yields
/// the reply text for the user.
pub async fn download_with_retry<D, Fut>(policy: RetryPolicy, download: D) -> Result<Vec<u8>, String>
where
    D: FnMut() -> Fut,
    Fut: Future<Output = Result<Vec<u8>, CropsightError>>,
{
    match call_with_retry(policy, download).await {
        CallOutcome::Success(bytes) => Ok(bytes),
        CallOutcome::TimedOut => Err(replies::DOWNLOAD_TIMED_OUT.to_string()),
        CallOutcome::NetworkError(_) => Err(replies::DOWNLOAD_NETWORK_ERROR.to_string()),
        CallOutcome::Failed(e) => {
            warn!(error = %e, "photo download failed permanently");
            Err(replies::unexpected_failure(&e))
        }
    }
}

/// Runs the conversational analysis and records the summary in session
/// memory. Memory is only updated on success, so a failed analysis never
/// becomes follow-up context.
pub async fn analyze_photo(
    pipeline: &AnalysisPipeline,
    sessions: &SessionMemory,
    user_id: i64,
    caption: Option<&str>,
    bytes: &[u8],
) -> Result<String, String> {
    match pipeline.analyze_conversational(bytes, caption).await {
        Ok(analysis) => {
            sessions.remember(user_id, analysis.summary);
            Ok(analysis.narrative)
        }
        Err(e) => {
            warn!(error = %e, user_id, "photo analysis failed");
            Err(replies::analysis_failure(&e))
        }
    }
}

/// Answers a free-text question, threading in the user's last analysis
/// summary when one exists.
pub async fn answer_question(
    advisor: &TreatmentAdvisor,
    sessions: &SessionMemory,
    user_id: i64,
    question: &str,
) -> String {
    let result = match sessions.recall(user_id) {
        Some(summary) => advisor.answer_followup(&summary, question).await,
        None => advisor.answer_standalone(question).await,
    };

    result.unwrap_or_else(|e| {
        warn!(error = %e, user_id, "consultation failed");
        replies::consultation_failure(&e)
    })
}
