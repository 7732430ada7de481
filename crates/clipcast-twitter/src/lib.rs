// SPDX-FileCopyrightText: 2026 Clipcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Twitter/X publishing adapter.
//!
//! Implements [`Publisher`]: a local size gate, then the two sequential
//! provider steps -- chunked media upload and tweet creation. Duplicate
//! content surfaces as [`PublishError::Duplicate`] so the session can word
//! its reply differently; everything else is an opaque publish failure.

pub mod client;
pub mod oauth;
pub mod types;

use std::path::Path;

use async_trait::async_trait;
use clipcast_config::model::TwitterConfig;
use clipcast_core::{ClipcastError, PostId, PublishError, Publisher};
use tracing::info;

use crate::client::TwitterClient;
use crate::oauth::OAuth1Credentials;

/// Provider limit for video uploads: 512 MiB.
pub const MAX_MEDIA_BYTES: u64 = 512 * 1024 * 1024;

/// Twitter/X publisher implementing [`Publisher`].
#[derive(Debug)]
pub struct TwitterPublisher {
    client: TwitterClient,
    max_media_bytes: u64,
}

impl TwitterPublisher {
    /// Creates a publisher from the Twitter section of the configuration.
    ///
    /// All four OAuth 1.0a credentials must be present; startup validation
    /// guarantees this on the serve path, so absence here is a config error.
    pub fn new(config: &TwitterConfig) -> Result<Self, ClipcastError> {
        let creds = OAuth1Credentials {
            consumer_key: require(&config.consumer_key, "twitter.consumer_key")?,
            consumer_secret: require(&config.consumer_secret, "twitter.consumer_secret")?,
            access_token: require(&config.access_token, "twitter.access_token")?,
            access_token_secret: require(
                &config.access_token_secret,
                "twitter.access_token_secret",
            )?,
        };
        let client = TwitterClient::new(creds).map_err(|e| {
            ClipcastError::Config(format!("failed to initialize Twitter client: {e}"))
        })?;
        Ok(Self {
            client,
            max_media_bytes: MAX_MEDIA_BYTES,
        })
    }

    /// Builds a publisher over an existing client (for testing).
    #[cfg(test)]
    fn with_client(client: TwitterClient, max_media_bytes: u64) -> Self {
        Self {
            client,
            max_media_bytes,
        }
    }
}

fn require(value: &Option<String>, key: &str) -> Result<String, ClipcastError> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
        .ok_or_else(|| ClipcastError::Config(format!("missing required credential `{key}`")))
}

#[async_trait]
impl Publisher for TwitterPublisher {
    async fn publish(&self, path: &Path, caption: &str) -> Result<PostId, PublishError> {
        let meta = tokio::fs::metadata(path)
            .await
            .map_err(|e| PublishError::Provider {
                message: format!("cannot stat {}", path.display()),
                source: Some(Box::new(e)),
            })?;
        let size = meta.len();
        if size > self.max_media_bytes {
            return Err(PublishError::TooLarge {
                size,
                limit: self.max_media_bytes,
            });
        }

        let media_id = self.client.upload_media(path, size).await?;
        info!(media_id, "media uploaded");

        let post_id = self.client.create_post(caption, &media_id).await?;
        info!(post_id = %post_id.0, "tweet posted");
        Ok(post_id)
    }
}
