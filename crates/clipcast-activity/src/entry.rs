// SPDX-FileCopyrightText: 2026 Clipcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Log entry and event types.
//!
//! The persisted format is one line per entry, tab-separated:
//! `timestamp \t LEVEL \t message`. User-scoped messages embed a
//! `USER=<id>` token followed by an event tag and `key=value` fields,
//! themselves tab-separated. The format is line-delimited and append-only
//! to support the chunked-retrieval contract.

use chrono::{DateTime, Utc};
use clipcast_core::UserId;
use strum::Display;

/// Severity of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum LogLevel {
    #[strum(serialize = "INFO")]
    Info,
    #[strum(serialize = "WARNING")]
    Warning,
    #[strum(serialize = "ERROR")]
    Error,
}

/// A single immutable activity log entry.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
}

impl LogEntry {
    /// Creates an entry stamped with the current time.
    pub fn now(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: message.into(),
        }
    }

    /// Renders the entry as a single log line (without trailing newline).
    pub fn to_line(&self) -> String {
        format!(
            "{}\t{}\t{}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.level,
            self.message
        )
    }
}

/// The `USER=<id>\t` token used to scope entries to a user.
///
/// The trailing tab keeps `USER=1` from matching entries for user 12.
pub fn user_token(user: &UserId) -> String {
    format!("USER={user}\t")
}

/// User-scoped pipeline events, each with a stable tag in the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityEvent {
    /// Video fetched from the source and stored locally.
    Downloaded { url: String, file: String },
    /// Acquisition failed; no file exists.
    DownloadFailed { url: String },
    /// Post created on the publishing platform.
    Tweeted { file: String, caption: String },
    /// Publication failed (includes the duplicate class).
    TweetFailed { file: String },
    /// Local file deleted after a successful post.
    Removed { file: String },
    /// Deletion failed after a successful post (non-fatal).
    RemoveFailed { file: String, error: String },
    /// Local file deleted after a failed post.
    RemovedAfterTweetFail { file: String },
    /// Deletion failed after a failed post (non-fatal).
    RemoveFailedAfterTweetFail { file: String, error: String },
}

impl ActivityEvent {
    /// The stable event tag embedded in the log line.
    pub fn tag(&self) -> &'static str {
        match self {
            ActivityEvent::Downloaded { .. } => "DOWNLOADED",
            ActivityEvent::DownloadFailed { .. } => "DOWNLOAD_FAILED",
            ActivityEvent::Tweeted { .. } => "TWEETED",
            ActivityEvent::TweetFailed { .. } => "TWEET_FAILED",
            ActivityEvent::Removed { .. } => "REMOVED",
            ActivityEvent::RemoveFailed { .. } => "REMOVE_FAILED",
            ActivityEvent::RemovedAfterTweetFail { .. } => "REMOVED_AFTER_TWEET_FAIL",
            ActivityEvent::RemoveFailedAfterTweetFail { .. } => "REMOVE_FAILED_AFTER_TWEET_FAIL",
        }
    }

    /// Severity of the event. Cleanup failures are warnings; everything
    /// else is informational, including pipeline failures (the failure is
    /// the recorded fact, not a process error).
    pub fn level(&self) -> LogLevel {
        match self {
            ActivityEvent::RemoveFailed { .. }
            | ActivityEvent::RemoveFailedAfterTweetFail { .. } => LogLevel::Warning,
            _ => LogLevel::Info,
        }
    }

    /// Renders the user-scoped message: `USER=<id>\tTAG\tkey=value...`.
    pub fn render(&self, user: &UserId) -> String {
        let fields = match self {
            ActivityEvent::Downloaded { url, file } => format!("URL={url}\tFILE={file}"),
            ActivityEvent::DownloadFailed { url } => format!("URL={url}"),
            ActivityEvent::Tweeted { file, caption } => {
                format!("FILE={file}\tCAPTION={caption}")
            }
            ActivityEvent::TweetFailed { file }
            | ActivityEvent::Removed { file }
            | ActivityEvent::RemovedAfterTweetFail { file } => format!("FILE={file}"),
            ActivityEvent::RemoveFailed { file, error }
            | ActivityEvent::RemoveFailedAfterTweetFail { file, error } => {
                format!("FILE={file}\tERROR={error}")
            }
        };
        format!("USER={user}\t{}\t{fields}", self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserId {
        UserId("12345".into())
    }

    #[test]
    fn line_is_tab_separated() {
        let entry = LogEntry::now(LogLevel::Info, "hello");
        let line = entry.to_line();
        let parts: Vec<&str> = line.splitn(3, '\t').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1], "INFO");
        assert_eq!(parts[2], "hello");
    }

    #[test]
    fn levels_render_uppercase() {
        assert_eq!(LogLevel::Info.to_string(), "INFO");
        assert_eq!(LogLevel::Warning.to_string(), "WARNING");
        assert_eq!(LogLevel::Error.to_string(), "ERROR");
    }

    #[test]
    fn user_token_has_trailing_tab() {
        assert_eq!(user_token(&user()), "USER=12345\t");
    }

    #[test]
    fn downloaded_event_renders_url_and_file() {
        let event = ActivityEvent::Downloaded {
            url: "https://tiktok.com/@a/video/1".into(),
            file: "videos/v.mp4".into(),
        };
        assert_eq!(
            event.render(&user()),
            "USER=12345\tDOWNLOADED\tURL=https://tiktok.com/@a/video/1\tFILE=videos/v.mp4"
        );
    }

    #[test]
    fn cleanup_failures_are_warnings() {
        let event = ActivityEvent::RemoveFailed {
            file: "v.mp4".into(),
            error: "permission denied".into(),
        };
        assert_eq!(event.level(), LogLevel::Warning);
        assert_eq!(event.tag(), "REMOVE_FAILED");

        let event = ActivityEvent::TweetFailed { file: "v.mp4".into() };
        assert_eq!(event.level(), LogLevel::Info);
    }

    #[test]
    fn every_event_message_starts_with_user_token() {
        let events = [
            ActivityEvent::Downloaded {
                url: "u".into(),
                file: "f".into(),
            },
            ActivityEvent::DownloadFailed { url: "u".into() },
            ActivityEvent::Tweeted {
                file: "f".into(),
                caption: "c".into(),
            },
            ActivityEvent::TweetFailed { file: "f".into() },
            ActivityEvent::Removed { file: "f".into() },
            ActivityEvent::RemoveFailed {
                file: "f".into(),
                error: "e".into(),
            },
            ActivityEvent::RemovedAfterTweetFail { file: "f".into() },
            ActivityEvent::RemoveFailedAfterTweetFail {
                file: "f".into(),
                error: "e".into(),
            },
        ];
        for event in events {
            let message = event.render(&user());
            assert!(message.starts_with("USER=12345\t"), "{message}");
            assert!(message.contains(event.tag()), "{message}");
        }
    }
}
