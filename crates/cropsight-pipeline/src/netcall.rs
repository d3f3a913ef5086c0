// SPDX-FileCopyrightText: 2026 Cropsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tagged outcomes for network calls, and the bounded retry policy the
//! channel adapters apply to them.
//!
//! Rather than dispatching on raised error types, every network hop is
//! wrapped into a [`CallOutcome`] the adapter inspects to decide retry vs.
//! immediate failure. Only timeouts and connection-level errors are
//! transient; service statuses and malformed payloads are permanent.

use std::time::Duration;

use cropsight_core::CropsightError;
use tracing::{debug, warn};

/// The adapter-visible result of a network call.
#[derive(Debug)]
pub enum CallOutcome<T> {
    /// The call completed.
    Success(T),
    /// The call hit its deadline; retried while attempts remain.
    TimedOut,
    /// Connection-level failure; retried while attempts remain.
    NetworkError(String),
    /// Permanent failure, surfaced immediately.
    Failed(CropsightError),
}

impl<T> CallOutcome<T> {
    /// Classifies a call result into its retry category.
    pub fn from_result(result: Result<T, CropsightError>) -> Self {
        match result {
            Ok(value) => CallOutcome::Success(value),
            Err(CropsightError::Timeout { .. }) => CallOutcome::TimedOut,
            Err(CropsightError::Network { message, .. }) => CallOutcome::NetworkError(message),
            Err(e) => CallOutcome::Failed(e),
        }
    }
}

/// Bounded retry policy for transient failures.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Fixed delay between attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    /// The media-download policy: 3 attempts, 2 seconds apart.
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

/// Runs `op` under the policy, retrying only transient outcomes.
///
/// A permanent failure aborts immediately. On exhausting attempts the last
/// transient outcome is returned so the adapter can report exactly one
/// user-facing failure.
pub async fn call_with_retry<T, F, Fut>(policy: RetryPolicy, mut op: F) -> CallOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CropsightError>>,
{
    let mut last_transient: Option<CallOutcome<T>> = None;

    for attempt in 1..=policy.max_attempts {
        if attempt > 1 {
            debug!(attempt, "retrying after transient failure");
            tokio::time::sleep(policy.delay).await;
        }

        match CallOutcome::from_result(op().await) {
            CallOutcome::Success(value) => return CallOutcome::Success(value),
            CallOutcome::Failed(e) => {
                warn!(error = %e, attempt, "permanent failure, not retrying");
                return CallOutcome::Failed(e);
            }
            transient => {
                warn!(attempt, max = policy.max_attempts, "transient failure");
                last_transient = Some(transient);
            }
        }
    }

    last_transient.unwrap_or(CallOutcome::TimedOut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            delay: Duration::from_millis(0),
        }
    }

    fn timeout_err() -> CropsightError {
        CropsightError::Timeout {
            duration: Duration::from_secs(30),
        }
    }

    #[test]
    fn default_policy_matches_media_download() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay, Duration::from_secs(2));
    }

    #[tokio::test]
    async fn success_on_first_attempt() {
        let calls = AtomicU32::new(0);
        let outcome = call_with_retry(fast_policy(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, CropsightError>(42) }
        })
        .await;
        assert!(matches!(outcome, CallOutcome::Success(42)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn transient_failures_are_retried_until_success() {
        let calls = AtomicU32::new(0);
        let outcome = call_with_retry(fast_policy(), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(timeout_err())
                } else {
                    Ok("downloaded")
                }
            }
        })
        .await;
        assert!(matches!(outcome, CallOutcome::Success("downloaded")));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausted_timeouts_yield_single_timed_out_outcome() {
        let calls = AtomicU32::new(0);
        let outcome: CallOutcome<()> = call_with_retry(fast_policy(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(timeout_err()) }
        })
        .await;
        // Exactly three attempts, one terminal outcome.
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(matches!(outcome, CallOutcome::TimedOut));
    }

    #[tokio::test]
    async fn network_errors_are_retried_and_reported() {
        let calls = AtomicU32::new(0);
        let outcome: CallOutcome<()> = call_with_retry(fast_policy(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(CropsightError::Network {
                    message: "connection reset".into(),
                    source: None,
                })
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        match outcome {
            CallOutcome::NetworkError(msg) => assert!(msg.contains("connection reset")),
            other => panic!("expected NetworkError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn permanent_failure_aborts_without_retry() {
        let calls = AtomicU32::new(0);
        let outcome: CallOutcome<()> = call_with_retry(fast_policy(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(CropsightError::RemoteService {
                    status: 401,
                    detail: "bad key".into(),
                })
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(
            outcome,
            CallOutcome::Failed(CropsightError::RemoteService { status: 401, .. })
        ));
    }
}
