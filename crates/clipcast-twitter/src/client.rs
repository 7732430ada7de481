// SPDX-FileCopyrightText: 2026 Clipcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Twitter/X API.
//!
//! Media goes through the v1.1 chunked upload flow (INIT, APPEND segments,
//! FINALIZE); the post is created via `POST /2/tweets`. Every request is
//! OAuth 1.0a signed. No retries -- a single pass per call.

use std::path::Path;
use std::time::Duration;

use clipcast_core::{PostId, PublishError};
use reqwest::header::AUTHORIZATION;
use tokio::io::AsyncReadExt;
use tracing::{debug, warn};

use crate::oauth::OAuth1Credentials;
use crate::types::{ApiErrorBody, MediaUploadResponse, TweetResponse};

/// Production chunked-upload endpoint.
pub const UPLOAD_URL: &str = "https://upload.twitter.com/1.1/media/upload.json";

/// Production tweet-creation endpoint.
pub const TWEETS_URL: &str = "https://api.twitter.com/2/tweets";

/// APPEND segment size. The provider caps segments at 5 MB.
const APPEND_CHUNK_BYTES: usize = 4 * 1024 * 1024;

/// OAuth 1.0a signed client for media upload and tweet creation.
#[derive(Debug)]
pub struct TwitterClient {
    http: reqwest::Client,
    creds: OAuth1Credentials,
    upload_url: String,
    tweets_url: String,
}

impl TwitterClient {
    /// Creates a client over the production endpoints.
    pub fn new(creds: OAuth1Credentials) -> Result<Self, PublishError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| PublishError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            http,
            creds,
            upload_url: UPLOAD_URL.to_string(),
            tweets_url: TWEETS_URL.to_string(),
        })
    }

    /// Overrides the endpoints (for testing with wiremock).
    #[cfg(test)]
    pub fn with_urls(mut self, upload_url: String, tweets_url: String) -> Self {
        self.upload_url = upload_url;
        self.tweets_url = tweets_url;
        self
    }

    /// Runs the full chunked upload for the file at `path`, returning the
    /// media ID to reference from the post.
    pub async fn upload_media(&self, path: &Path, total_bytes: u64) -> Result<String, PublishError> {
        let media_id = self.upload_init(total_bytes).await?;
        debug!(media_id, total_bytes, "media upload initialized");

        let mut file = tokio::fs::File::open(path)
            .await
            .map_err(|e| PublishError::Provider {
                message: format!("failed to open {}", path.display()),
                source: Some(Box::new(e)),
            })?;

        let mut buf = vec![0u8; APPEND_CHUNK_BYTES];
        let mut segment: u32 = 0;
        loop {
            let n = file.read(&mut buf).await.map_err(|e| PublishError::Provider {
                message: format!("failed to read {}", path.display()),
                source: Some(Box::new(e)),
            })?;
            if n == 0 {
                break;
            }
            self.upload_append(&media_id, segment, buf[..n].to_vec())
                .await?;
            segment += 1;
        }

        self.upload_finalize(&media_id).await
    }

    async fn upload_init(&self, total_bytes: u64) -> Result<String, PublishError> {
        let total = total_bytes.to_string();
        let params: [(&str, &str); 4] = [
            ("command", "INIT"),
            ("total_bytes", &total),
            ("media_type", "video/mp4"),
            ("media_category", "tweet_video"),
        ];
        let response = self.send_form(&params).await?;
        let body: MediaUploadResponse =
            response.json().await.map_err(|e| PublishError::Provider {
                message: format!("invalid INIT response: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(body.media_id_string)
    }

    async fn upload_append(
        &self,
        media_id: &str,
        segment: u32,
        data: Vec<u8>,
    ) -> Result<(), PublishError> {
        // Command parameters travel in the query string, where they are
        // signed; the binary segment rides in an unsigned multipart body.
        let segment_str = segment.to_string();
        let params: [(&str, &str); 3] = [
            ("command", "APPEND"),
            ("media_id", media_id),
            ("segment_index", &segment_str),
        ];
        let auth = self
            .creds
            .authorization_header("POST", &self.upload_url, &params);
        let url = format!(
            "{}?command=APPEND&media_id={media_id}&segment_index={segment_str}",
            self.upload_url
        );
        let form = reqwest::multipart::Form::new()
            .part("media", reqwest::multipart::Part::bytes(data));

        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, auth)
            .multipart(form)
            .send()
            .await
            .map_err(|e| PublishError::Provider {
                message: format!("APPEND segment {segment} failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        Ok(())
    }

    async fn upload_finalize(&self, media_id: &str) -> Result<String, PublishError> {
        let params: [(&str, &str); 2] = [("command", "FINALIZE"), ("media_id", media_id)];
        let response = self.send_form(&params).await?;
        let body: MediaUploadResponse =
            response.json().await.map_err(|e| PublishError::Provider {
                message: format!("invalid FINALIZE response: {e}"),
                source: Some(Box::new(e)),
            })?;

        // The provider may report asynchronous processing; a failed state
        // here is a hard failure. Pending states are left to the provider's
        // own completion handling.
        if let Some(info) = &body.processing_info
            && info.state == "failed"
        {
            let detail = info
                .error
                .as_ref()
                .and_then(|e| e.message.clone())
                .unwrap_or_else(|| "no details".to_string());
            return Err(PublishError::Provider {
                message: format!("media processing failed: {detail}"),
                source: None,
            });
        }

        Ok(body.media_id_string)
    }

    /// Creates the post referencing the uploaded media.
    pub async fn create_post(&self, caption: &str, media_id: &str) -> Result<PostId, PublishError> {
        // JSON bodies are excluded from the OAuth signature.
        let auth = self.creds.authorization_header("POST", &self.tweets_url, &[]);
        let body = serde_json::json!({
            "text": caption,
            "media": { "media_ids": [media_id] },
        });

        let response = self
            .http
            .post(&self.tweets_url)
            .header(AUTHORIZATION, auth)
            .json(&body)
            .send()
            .await
            .map_err(|e| PublishError::Provider {
                message: format!("tweet creation failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body: TweetResponse = response.json().await.map_err(|e| PublishError::Provider {
            message: format!("invalid tweet response: {e}"),
            source: Some(Box::new(e)),
        })?;
        Ok(PostId(body.data.id))
    }

    /// Sends a signed form-encoded POST to the upload endpoint.
    async fn send_form(&self, params: &[(&str, &str)]) -> Result<reqwest::Response, PublishError> {
        let auth = self
            .creds
            .authorization_header("POST", &self.upload_url, params);
        let response = self
            .http
            .post(&self.upload_url)
            .header(AUTHORIZATION, auth)
            .form(params)
            .send()
            .await
            .map_err(|e| PublishError::Provider {
                message: format!("upload request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        Ok(response)
    }

    /// Maps a non-success response to the publish error taxonomy.
    async fn error_from_response(response: reqwest::Response) -> PublishError {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let body: ApiErrorBody = serde_json::from_str(&text).unwrap_or_default();

        if body.is_duplicate() {
            warn!(%status, "provider rejected post as duplicate content");
            return PublishError::Duplicate;
        }

        PublishError::Provider {
            message: format!("{status}: {}", body.summary()),
            source: None,
        }
    }
}
