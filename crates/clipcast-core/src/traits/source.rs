// SPDX-FileCopyrightText: 2026 Clipcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Video source trait for media acquisition.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::ClipcastError;

/// Obtains a local media file from a remote video URL.
///
/// The URL has already passed the session's shape check; implementations do
/// not re-validate it. On success the returned path exists on local storage
/// at the moment of return -- an implementation must never report success
/// for a path it cannot observe on disk. Single attempt, no retries.
#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Downloads the video behind `url` and returns the local file path.
    async fn acquire(&self, url: &str) -> Result<PathBuf, ClipcastError>;
}
