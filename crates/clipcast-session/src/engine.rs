// SPDX-FileCopyrightText: 2026 Clipcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session engine: drives one user's conversation and the download/publish
//! pipeline behind it.
//!
//! The engine owns no per-user state itself; the caller passes the mutable
//! [`SessionState`] in, which keeps the engine shareable across all user
//! workers behind an `Arc`. All side effects go through injected trait
//! objects, so every path here is testable with mocks.

use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use clipcast_activity::{ActivityEvent, ActivityStore, render_chunks};
use clipcast_core::{
    ChatRef, ClipcastError, InboundMessage, PublishError, Publisher, ReplySink, UserId,
    VideoSource,
};
use tracing::{error, info, warn};

use crate::fsm::{Command, SessionState, Transition, UrlMatcher, on_text};
use crate::reply;

/// Chunk budget for `/logs` delivery, below Telegram's 4096-char cap to
/// leave room for the transport's own framing.
pub const LOG_CHUNK_CHARS: usize = 4000;

/// Shared, stateless-per-user session engine.
pub struct SessionEngine {
    source: Arc<dyn VideoSource>,
    publisher: Arc<dyn Publisher>,
    store: Arc<dyn ActivityStore>,
    sink: Arc<dyn ReplySink>,
    matcher: UrlMatcher,
}

impl SessionEngine {
    pub fn new(
        source: Arc<dyn VideoSource>,
        publisher: Arc<dyn Publisher>,
        store: Arc<dyn ActivityStore>,
        sink: Arc<dyn ReplySink>,
        matcher: UrlMatcher,
    ) -> Self {
        Self {
            source,
            publisher,
            store,
            sink,
            matcher,
        }
    }

    /// Processes one inbound message against the user's session state.
    ///
    /// Errors returned here are channel or store failures; pipeline
    /// failures (download, publish) are reported to the user and recorded,
    /// never propagated.
    pub async fn process(
        &self,
        session: &mut SessionState,
        msg: &InboundMessage,
    ) -> Result<(), ClipcastError> {
        if let Some(command) = Command::parse(&msg.text) {
            return self.on_command(session, msg, command).await;
        }

        match on_text(session, &msg.text, &self.matcher) {
            Transition::Respond { replies, next } => {
                for text in &replies {
                    self.sink.reply(&msg.chat, text).await?;
                }
                *session = next;
                Ok(())
            }
            Transition::RunPipeline { url, caption } => {
                // The session resets before the pipeline runs; a failure
                // mid-pipeline must not leave the user stuck.
                *session = SessionState::Idle;
                self.run_pipeline(msg, &url, &caption).await
            }
        }
    }

    async fn on_command(
        &self,
        session: &mut SessionState,
        msg: &InboundMessage,
        command: Command,
    ) -> Result<(), ClipcastError> {
        match command {
            Command::Start => {
                *session = SessionState::AwaitingUrl;
                self.sink.reply(&msg.chat, reply::GREETING).await
            }
            Command::Cancel => {
                *session = SessionState::Idle;
                self.sink.reply(&msg.chat, reply::CANCELLED).await
            }
            Command::Help => self.sink.reply(&msg.chat, reply::HELP).await,
            Command::Logs => self.send_logs(msg).await,
            Command::Unknown => self.sink.reply(&msg.chat, reply::UNKNOWN_COMMAND).await,
        }
    }

    /// Download, publish, clean up. Every outcome is recorded in the
    /// activity store under the requesting user.
    ///
    /// Once a file is on disk, record and reply failures are logged and
    /// swallowed: nothing may skip the cleanup step, so the downloaded file
    /// never outlives the conversation pass.
    async fn run_pipeline(
        &self,
        msg: &InboundMessage,
        url: &str,
        caption: &str,
    ) -> Result<(), ClipcastError> {
        let user = &msg.user_id;
        self.sink.reply(&msg.chat, reply::DOWNLOADING).await?;

        let path = match self.source.acquire(url).await {
            Ok(path) => path,
            Err(e) => {
                warn!(user = %user, url, error = %e, "video acquisition failed");
                self.store
                    .record(user, ActivityEvent::DownloadFailed { url: url.into() })
                    .await?;
                return self.sink.reply(&msg.chat, reply::DOWNLOAD_FAILED).await;
            }
        };
        let file = path.display().to_string();
        info!(user = %user, url, file, "video acquired");

        self.reply_best_effort(&msg.chat, reply::UPLOADING).await;

        match self.publisher.publish(&path, caption).await {
            Ok(post_id) => {
                info!(user = %user, post_id = %post_id.0, "post published");
                self.record_best_effort(
                    user,
                    ActivityEvent::Downloaded {
                        url: url.into(),
                        file: file.clone(),
                    },
                )
                .await;
                self.record_best_effort(
                    user,
                    ActivityEvent::Tweeted {
                        file: file.clone(),
                        caption: caption.into(),
                    },
                )
                .await;
                self.reply_best_effort(&msg.chat, reply::SUCCESS).await;

                match remove_file(&path).await {
                    Ok(()) => {
                        self.record_best_effort(user, ActivityEvent::Removed { file })
                            .await;
                    }
                    Err(e) => {
                        warn!(user = %user, file, error = %e, "cleanup failed after publish");
                        self.record_best_effort(
                            user,
                            ActivityEvent::RemoveFailed {
                                file,
                                error: e.to_string(),
                            },
                        )
                        .await;
                    }
                }
            }
            Err(publish_err) => {
                warn!(user = %user, file, error = %publish_err, "publish failed");
                self.record_best_effort(user, ActivityEvent::TweetFailed { file: file.clone() })
                    .await;

                let text = match &publish_err {
                    PublishError::Duplicate => reply::TWEET_DUPLICATE,
                    PublishError::TooLarge { .. } => reply::VIDEO_TOO_LARGE,
                    PublishError::Provider { .. } => reply::TWEET_FAILED,
                };
                self.reply_best_effort(&msg.chat, text).await;

                match remove_file(&path).await {
                    Ok(()) => {
                        self.record_best_effort(user, ActivityEvent::RemovedAfterTweetFail { file })
                            .await;
                    }
                    Err(e) => {
                        warn!(user = %user, file, error = %e, "cleanup failed after failed publish");
                        self.record_best_effort(
                            user,
                            ActivityEvent::RemoveFailedAfterTweetFail {
                                file,
                                error: e.to_string(),
                            },
                        )
                        .await;
                    }
                }
            }
        }
        Ok(())
    }

    async fn record_best_effort(&self, user: &UserId, event: ActivityEvent) {
        if let Err(e) = self.store.record(user, event).await {
            error!(user = %user, error = %e, "failed to record activity event");
        }
    }

    async fn reply_best_effort(&self, chat: &ChatRef, text: &str) {
        if let Err(e) = self.sink.reply(chat, text).await {
            warn!(chat = %chat, error = %e, "failed to deliver reply");
        }
    }

    /// Delivers the user's activity history in fenced chunks. Store
    /// failures are reported to the user, not propagated.
    async fn send_logs(&self, msg: &InboundMessage) -> Result<(), ClipcastError> {
        let lines = match self.store.query(&msg.user_id).await {
            Ok(lines) => lines,
            Err(e) => {
                warn!(user = %msg.user_id, error = %e, "activity query failed");
                return self.sink.reply(&msg.chat, reply::LOGS_ERROR).await;
            }
        };

        if lines.is_empty() {
            return self.sink.reply(&msg.chat, reply::NO_LOGS).await;
        }

        for chunk in render_chunks(&lines, LOG_CHUNK_CHARS) {
            self.sink.reply_markdown(&msg.chat, &chunk).await?;
        }
        Ok(())
    }
}

/// Deletes the file, treating an already-missing file as success.
async fn remove_file(path: &Path) -> std::io::Result<()> {
    match tokio::fs::remove_file(path).await {
        Err(e) if e.kind() != ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}
