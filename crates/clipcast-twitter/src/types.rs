// SPDX-FileCopyrightText: 2026 Clipcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the media upload (v1.1) and tweet creation (v2) endpoints.

use serde::Deserialize;

/// v1.1 error code for a duplicate status.
pub const DUPLICATE_ERROR_CODE: i64 = 187;

/// Response from `media/upload` INIT and FINALIZE.
#[derive(Debug, Deserialize)]
pub struct MediaUploadResponse {
    pub media_id_string: String,
    #[serde(default)]
    pub processing_info: Option<ProcessingInfo>,
}

/// Asynchronous processing state reported by FINALIZE.
#[derive(Debug, Deserialize)]
pub struct ProcessingInfo {
    pub state: String,
    #[serde(default)]
    pub error: Option<ProcessingError>,
}

#[derive(Debug, Deserialize)]
pub struct ProcessingError {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response from `POST /2/tweets`.
#[derive(Debug, Deserialize)]
pub struct TweetResponse {
    pub data: TweetData,
}

#[derive(Debug, Deserialize)]
pub struct TweetData {
    pub id: String,
}

/// Error payload shape covering both the v1.1 (`errors[]` with numeric
/// codes) and v2 (problem-details) formats.
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub errors: Vec<ApiErrorItem>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorItem {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorBody {
    /// Classifies the duplicate-content error class.
    ///
    /// v1.1 defines numeric code 187 for duplicate statuses. v2 has no
    /// numeric class; its contract is a 403 problem-details response whose
    /// `detail` field names duplicate content. Both are structured fields,
    /// not free-text log scraping.
    pub fn is_duplicate(&self) -> bool {
        if self
            .errors
            .iter()
            .any(|e| e.code == Some(DUPLICATE_ERROR_CODE))
        {
            return true;
        }
        self.status == Some(403)
            && self
                .detail
                .as_deref()
                .is_some_and(|d| d.to_ascii_lowercase().contains("duplicate content"))
    }

    /// Short human-readable summary for error messages and logs.
    pub fn summary(&self) -> String {
        if let Some(item) = self.errors.first() {
            return format!(
                "code {}: {}",
                item.code.map_or_else(|| "?".into(), |c| c.to_string()),
                item.message.as_deref().unwrap_or("unknown error")
            );
        }
        match (&self.title, &self.detail) {
            (Some(title), Some(detail)) => format!("{title}: {detail}"),
            (Some(title), None) => title.clone(),
            (None, Some(detail)) => detail.clone(),
            (None, None) => "no error details".to_string(),
        }
    }
}
