// SPDX-FileCopyrightText: 2026 Cropsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user conversational memory.
//!
//! Holds the most recent analysis summary per user so follow-up questions
//! can reference the last analysis. Owned by the adapter instance, not
//! module-global, so multiple adapters (tests, multi-tenant deployments) do
//! not interfere. Entries are overwritten, never appended, and live for the
//! process lifetime -- acceptable because each is a single small string.

use dashmap::DashMap;

/// Concurrency-safe map from user identifier to the latest analysis summary.
///
/// Concurrent writes for different users never corrupt each other; for the
/// same user the later write wins, which is the only ordering promised.
#[derive(Debug, Default)]
pub struct SessionMemory {
    entries: DashMap<i64, String>,
}

impl SessionMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the user's entry with the newest summary.
    pub fn remember(&self, user_id: i64, summary: String) {
        self.entries.insert(user_id, summary);
    }

    /// The user's last summary, if any analysis has completed.
    pub fn recall(&self, user_id: i64) -> Option<String> {
        self.entries.get(&user_id).map(|entry| entry.clone())
    }
}
