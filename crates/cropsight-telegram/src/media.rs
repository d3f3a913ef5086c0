// SPDX-FileCopyrightText: 2026 Cropsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Photo download from Telegram servers.
//!
//! Transport errors are classified here so the retry policy can tell
//! transient failures (timeout, connection) from permanent ones.

use std::time::Duration;

use cropsight_core::CropsightError;
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::FileMeta;
use tracing::debug;

/// Deadline reported for timed-out downloads.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Downloads a photo from Telegram servers by its file metadata.
///
/// Resolves the file path via `getFile`, then fetches the content as bytes.
pub async fn download_photo(bot: &Bot, file_meta: &FileMeta) -> Result<Vec<u8>, CropsightError> {
    let file = bot
        .get_file(file_meta.id.clone())
        .await
        .map_err(map_request_error)?;

    let mut buf = Vec::new();
    bot.download_file(&file.path, &mut buf)
        .await
        .map_err(map_download_error)?;

    debug!(file_id = %file_meta.id, size = buf.len(), "downloaded photo from Telegram");
    Ok(buf)
}

fn map_request_error(error: teloxide::RequestError) -> CropsightError {
    match error {
        teloxide::RequestError::Network(inner) if inner.is_timeout() => CropsightError::Timeout {
            duration: DOWNLOAD_TIMEOUT,
        },
        teloxide::RequestError::Network(inner) => CropsightError::Network {
            message: format!("telegram file lookup failed: {inner}"),
            source: Some(Box::new(inner)),
        },
        other => CropsightError::Channel {
            message: format!("telegram file lookup failed: {other}"),
            source: Some(Box::new(other)),
        },
    }
}

fn map_download_error(error: teloxide::DownloadError) -> CropsightError {
    match error {
        teloxide::DownloadError::Network(inner) if inner.is_timeout() => CropsightError::Timeout {
            duration: DOWNLOAD_TIMEOUT,
        },
        teloxide::DownloadError::Network(inner) => CropsightError::Network {
            message: format!("telegram download failed: {inner}"),
            source: Some(Box::new(inner)),
        },
        other => CropsightError::Channel {
            message: format!("telegram download failed: {other}"),
            source: Some(Box::new(other)),
        },
    }
}
