// SPDX-FileCopyrightText: 2026 Clipcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types shared across the Clipcast crates.

use thiserror::Error;

/// The primary error type used across Clipcast adapter traits and core operations.
#[derive(Debug, Error)]
pub enum ClipcastError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Messaging channel errors (connection failure, send failure, closed stream).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Video acquisition errors (download tool failure, missing output file).
    ///
    /// The cause is preserved for logging only; callers treat any acquisition
    /// error as a single opaque failure signal.
    #[error("acquisition error: {message}")]
    Acquire {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Activity log store errors (open, append, read failures).
    #[error("activity log error: {message}")]
    Log {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Errors from the publishing provider, classified at the seam.
///
/// `Duplicate` is a provider-defined error class (structured error codes in
/// the API response), surfaced separately so the caller can phrase a
/// different user message. With respect to file cleanup it is treated like
/// any other failure.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The provider rejected the post as duplicate content.
    #[error("duplicate content rejected by provider")]
    Duplicate,

    /// The media file exceeds the provider's size limit. Detected locally,
    /// before any network call.
    #[error("media file too large: {size} bytes (limit {limit})")]
    TooLarge { size: u64, limit: u64 },

    /// Any other provider or transport failure.
    #[error("publish failed: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PublishError {
    /// Whether this error is the duplicate-content class.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, PublishError::Duplicate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_is_classified() {
        assert!(PublishError::Duplicate.is_duplicate());
        assert!(
            !PublishError::Provider {
                message: "server error".into(),
                source: None,
            }
            .is_duplicate()
        );
    }

    #[test]
    fn too_large_display_includes_sizes() {
        let err = PublishError::TooLarge {
            size: 600,
            limit: 512,
        };
        let text = err.to_string();
        assert!(text.contains("600"));
        assert!(text.contains("512"));
    }
}
