// SPDX-FileCopyrightText: 2026 Cropsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Cropsight analysis pipeline.

use thiserror::Error;

/// The primary error type used across all Cropsight crates.
#[derive(Debug, Error)]
pub enum CropsightError {
    /// Uploaded bytes could not be decoded as a raster image. User error,
    /// never retried.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// The identification or language service returned a non-success status.
    /// Carries the structured error body when the service sent one.
    #[error("remote service returned {status}: {detail}")]
    RemoteService { status: u16, detail: String },

    /// A network call did not complete within its deadline.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Connection-level failure reaching a remote service.
    #[error("network error: {message}")]
    Network {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The service returned a payload that is not decodable JSON.
    /// Permanent; surfaced, not retried.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Channel adapter errors (message delivery, media download, transport).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration errors (missing keys, invalid values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Handoff store errors (file write/read failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CropsightError {
    /// True for failures worth retrying at the adapter layer: timeouts and
    /// connection-level errors. Service-status and user errors are permanent.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CropsightError::Timeout { .. } | CropsightError::Network { .. }
        )
    }
}
