// SPDX-FileCopyrightText: 2026 Clipcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Activity store trait and implementations.
//!
//! The store is process-wide and shared by all sessions; it is injected as
//! an `Arc<dyn ActivityStore>`, never a singleton, so tests can substitute
//! the in-memory implementation.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use clipcast_core::{ClipcastError, UserId};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

use crate::entry::{ActivityEvent, LogEntry, LogLevel, user_token};

/// Append-only, durable record store with per-user filtered retrieval.
#[async_trait]
pub trait ActivityStore: Send + Sync {
    /// Appends one entry. Each entry is written as a single atomic line;
    /// concurrent appends from independent sessions never interleave.
    async fn append(&self, entry: LogEntry) -> Result<(), ClipcastError>;

    /// Returns all entry lines scoped to `user`, most recent first, without
    /// mutating the store. A missing store is equivalent to no history.
    async fn query(&self, user: &UserId) -> Result<Vec<String>, ClipcastError>;

    /// Records a user-scoped pipeline event.
    async fn record(&self, user: &UserId, event: ActivityEvent) -> Result<(), ClipcastError> {
        self.append(LogEntry::now(event.level(), event.render(user)))
            .await
    }

    /// Records a process-level informational note (not user-scoped).
    async fn note(&self, message: &str) -> Result<(), ClipcastError> {
        self.append(LogEntry::now(LogLevel::Info, message)).await
    }
}

/// File-backed store: one line per entry, appended under a mutex.
///
/// The mutex plus a single `write_all` per entry keeps individual entries
/// atomic with respect to other writers in this process.
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Creates a store over the given log file path. The file is created
    /// lazily on first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// The log file path.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl ActivityStore for FileStore {
    async fn append(&self, entry: LogEntry) -> Result<(), ClipcastError> {
        let line = format!("{}\n", entry.to_line());
        let _guard = self.write_lock.lock().await;

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| ClipcastError::Log {
                message: format!("failed to open {}", self.path.display()),
                source: Some(Box::new(e)),
            })?;

        file.write_all(line.as_bytes())
            .await
            .map_err(|e| ClipcastError::Log {
                message: "failed to append entry".to_string(),
                source: Some(Box::new(e)),
            })?;
        file.flush().await.map_err(|e| ClipcastError::Log {
            message: "failed to flush entry".to_string(),
            source: Some(Box::new(e)),
        })?;

        Ok(())
    }

    async fn query(&self, user: &UserId) -> Result<Vec<String>, ClipcastError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "activity log missing, treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(ClipcastError::Log {
                    message: format!("failed to read {}", self.path.display()),
                    source: Some(Box::new(e)),
                });
            }
        };

        let token = user_token(user);
        Ok(content
            .lines()
            .filter(|line| line_is_for(line, &token))
            .rev()
            .map(str::to_string)
            .collect())
    }
}

/// A line belongs to a user when its message field (after the timestamp and
/// level fields) starts with the user token. Tokens appearing deeper in the
/// message, say inside a logged caption, do not count.
fn line_is_for(line: &str, token: &str) -> bool {
    line.splitn(3, '\t')
        .nth(2)
        .is_some_and(|message| message.starts_with(token))
}

/// In-memory store for tests and tooling.
#[derive(Default)]
pub struct MemoryStore {
    lines: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All appended lines in append order.
    pub async fn lines(&self) -> Vec<String> {
        self.lines.lock().await.clone()
    }
}

#[async_trait]
impl ActivityStore for MemoryStore {
    async fn append(&self, entry: LogEntry) -> Result<(), ClipcastError> {
        self.lines.lock().await.push(entry.to_line());
        Ok(())
    }

    async fn query(&self, user: &UserId) -> Result<Vec<String>, ClipcastError> {
        let token = user_token(user);
        Ok(self
            .lines
            .lock()
            .await
            .iter()
            .filter(|line| line_is_for(line, &token))
            .rev()
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn user(id: &str) -> UserId {
        UserId(id.into())
    }

    #[tokio::test]
    async fn query_on_missing_file_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("absent.log"));
        let lines = store.query(&user("1")).await.unwrap();
        assert!(lines.is_empty());
    }

    #[tokio::test]
    async fn append_then_query_filters_by_user() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("activity.log"));

        store
            .record(&user("1"), ActivityEvent::DownloadFailed { url: "u1".into() })
            .await
            .unwrap();
        store
            .record(&user("2"), ActivityEvent::DownloadFailed { url: "u2".into() })
            .await
            .unwrap();
        store
            .record(
                &user("1"),
                ActivityEvent::Removed { file: "f1".into() },
            )
            .await
            .unwrap();

        let lines = store.query(&user("1")).await.unwrap();
        assert_eq!(lines.len(), 2);
        // Newest first.
        assert!(lines[0].contains("REMOVED"));
        assert!(lines[1].contains("DOWNLOAD_FAILED"));
        assert!(lines.iter().all(|l| l.contains("USER=1\t")));
    }

    #[tokio::test]
    async fn user_token_does_not_match_prefix_ids() {
        let store = MemoryStore::new();
        store
            .record(&user("12"), ActivityEvent::DownloadFailed { url: "u".into() })
            .await
            .unwrap();
        assert!(store.query(&user("1")).await.unwrap().is_empty());
        assert_eq!(store.query(&user("12")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn token_in_caption_does_not_leak_across_users() {
        let store = MemoryStore::new();
        // A caption may contain tabs, including text shaped like another
        // user's token.
        store
            .record(
                &user("7"),
                ActivityEvent::Tweeted {
                    file: "f.mp4".into(),
                    caption: "look\tUSER=2\tTWEETED\tFILE=x".into(),
                },
            )
            .await
            .unwrap();

        assert!(store.query(&user("2")).await.unwrap().is_empty());
        assert_eq!(store.query(&user("7")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn notes_are_not_user_scoped() {
        let store = MemoryStore::new();
        store.note("Bot starting...").await.unwrap();
        assert!(store.query(&user("1")).await.unwrap().is_empty());
        assert_eq!(store.lines().await.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_appends_keep_lines_intact() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileStore::new(dir.path().join("activity.log")));

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                for j in 0..25 {
                    store
                        .record(
                            &UserId(i.to_string()),
                            ActivityEvent::Removed {
                                file: format!("f{j}"),
                            },
                        )
                        .await
                        .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let content = std::fs::read_to_string(store.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 200);
        for line in lines {
            assert_eq!(line.splitn(3, '\t').count(), 3, "corrupt line: {line}");
            assert!(line.contains("REMOVED"));
        }
    }
}
