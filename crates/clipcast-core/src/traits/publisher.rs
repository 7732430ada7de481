// SPDX-FileCopyrightText: 2026 Clipcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Publisher trait for posting media to the social platform.

use std::path::Path;

use async_trait::async_trait;

use crate::error::PublishError;
use crate::types::PostId;

/// Uploads a media file and creates a post referencing it.
///
/// Publication is two sequential provider steps (media upload, then post
/// creation); either step's failure surfaces as [`PublishError::Provider`].
/// Oversized files are rejected locally with [`PublishError::TooLarge`]
/// before any network call. No retries.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publishes the file at `path` with `caption`, returning the post ID.
    async fn publish(&self, path: &Path, caption: &str) -> Result<PostId, PublishError>;
}
