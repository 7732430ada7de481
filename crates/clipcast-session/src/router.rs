// SPDX-FileCopyrightText: 2026 Clipcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user message routing.
//!
//! Each user gets a dedicated worker task owning that user's
//! [`SessionState`], fed through a bounded channel. Messages from one user
//! are processed strictly in arrival order; different users proceed
//! concurrently. Workers whose session is idle are evicted after a quiet
//! period so the map does not grow with every user ever seen.

use std::sync::Arc;
use std::time::Duration;

use clipcast_core::{InboundMessage, UserId};
use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{error, warn};

use crate::engine::SessionEngine;
use crate::fsm::SessionState;

const WORKER_QUEUE_DEPTH: usize = 32;
const IDLE_EVICT_AFTER: Duration = Duration::from_secs(10 * 60);

/// Fans inbound messages out to per-user serial workers.
pub struct UserRouter {
    engine: Arc<SessionEngine>,
    workers: Arc<DashMap<UserId, mpsc::Sender<InboundMessage>>>,
    idle_evict_after: Duration,
}

impl UserRouter {
    pub fn new(engine: Arc<SessionEngine>) -> Self {
        Self::with_idle_eviction(engine, IDLE_EVICT_AFTER)
    }

    /// Router with a custom idle-eviction period.
    pub fn with_idle_eviction(engine: Arc<SessionEngine>, idle_evict_after: Duration) -> Self {
        Self {
            engine,
            workers: Arc::new(DashMap::new()),
            idle_evict_after,
        }
    }

    /// Routes a message to its user's worker, spawning the worker on first
    /// contact. A closed mailbox (worker evicted or dead between lookup and
    /// send) respawns the worker and redelivers; only a full queue drops the
    /// message, with a warning, rather than blocking other users.
    pub async fn dispatch(&self, msg: InboundMessage) {
        let sender = self.sender_for(&msg.user_id);

        match sender.try_send(msg) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(dropped)) => {
                warn!(user = %dropped.user_id, "worker queue full, dropping message");
            }
            Err(mpsc::error::TrySendError::Closed(dropped)) => {
                // Remove only if the map still points at the dead channel;
                // a fresh worker may already have taken the slot.
                self.workers
                    .remove_if(&dropped.user_id, |_, s| s.same_channel(&sender));
                let sender = self.sender_for(&dropped.user_id);
                if let Err(e) = sender.try_send(dropped) {
                    let lost = match e {
                        mpsc::error::TrySendError::Full(m)
                        | mpsc::error::TrySendError::Closed(m) => m,
                    };
                    warn!(user = %lost.user_id, "redelivery after respawn failed, dropping message");
                }
            }
        }
    }

    fn sender_for(&self, user: &UserId) -> mpsc::Sender<InboundMessage> {
        // Scope the map guard so it is not held across any await.
        let entry = self
            .workers
            .entry(user.clone())
            .or_insert_with(|| self.spawn_worker(user.clone()));
        entry.value().clone()
    }

    fn spawn_worker(&self, user: UserId) -> mpsc::Sender<InboundMessage> {
        let (tx, mut rx) = mpsc::channel::<InboundMessage>(WORKER_QUEUE_DEPTH);
        let engine = Arc::clone(&self.engine);
        let workers = Arc::clone(&self.workers);
        let evict_after = self.idle_evict_after;

        tokio::spawn(async move {
            let mut session = SessionState::default();
            loop {
                match tokio::time::timeout(evict_after, rx.recv()).await {
                    Ok(Some(msg)) => {
                        if let Err(e) = engine.process(&mut session, &msg).await {
                            // Channel or store trouble; the session survives.
                            error!(user = %user, error = %e, "failed to process message");
                        }
                    }
                    Ok(None) => break,
                    Err(_) => {
                        // Mid-conversation sessions are never evicted.
                        if session != SessionState::Idle {
                            continue;
                        }
                        // Unregister first so new messages spawn a fresh
                        // worker, then drain anything that raced in.
                        workers.remove(&user);
                        while let Ok(msg) = rx.try_recv() {
                            if let Err(e) = engine.process(&mut session, &msg).await {
                                error!(user = %user, error = %e, "failed to process message");
                            }
                        }
                        break;
                    }
                }
            }
        });

        tx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use clipcast_activity::{ActivityStore, MemoryStore};
    use clipcast_core::{
        ChatRef, ClipcastError, PostId, PublishError, Publisher, ReplySink, VideoSource,
    };
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use std::time::Duration;

    use crate::fsm::UrlMatcher;

    struct NoSource;

    #[async_trait]
    impl VideoSource for NoSource {
        async fn acquire(&self, _url: &str) -> Result<PathBuf, ClipcastError> {
            Err(ClipcastError::Acquire {
                message: "unused".into(),
                source: None,
            })
        }
    }

    struct NoPublisher;

    #[async_trait]
    impl Publisher for NoPublisher {
        async fn publish(&self, _path: &Path, _caption: &str) -> Result<PostId, PublishError> {
            Err(PublishError::Provider {
                message: "unused".into(),
                source: None,
            })
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        replies: Mutex<Vec<(ChatRef, String)>>,
    }

    #[async_trait]
    impl ReplySink for RecordingSink {
        async fn reply(&self, chat: &ChatRef, text: &str) -> Result<(), ClipcastError> {
            self.replies
                .lock()
                .unwrap()
                .push((chat.clone(), text.to_string()));
            Ok(())
        }

        async fn reply_markdown(&self, chat: &ChatRef, text: &str) -> Result<(), ClipcastError> {
            self.reply(chat, text).await
        }
    }

    fn router_with_sink() -> (UserRouter, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        let engine = SessionEngine::new(
            Arc::new(NoSource),
            Arc::new(NoPublisher),
            Arc::new(MemoryStore::new()) as Arc<dyn ActivityStore>,
            Arc::clone(&sink) as Arc<dyn ReplySink>,
            UrlMatcher::new("tiktok.com").unwrap(),
        );
        (UserRouter::new(Arc::new(engine)), sink)
    }

    fn msg(user: &str, text: &str) -> InboundMessage {
        InboundMessage {
            user_id: UserId(user.into()),
            chat: ChatRef(user.into()),
            text: text.to_string(),
            timestamp: "2026-01-01T00:00:00Z".into(),
        }
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn one_user_messages_processed_in_order() {
        let (router, sink) = router_with_sink();

        router.dispatch(msg("1", "/start")).await;
        router
            .dispatch(msg("1", "https://tiktok.com/@a/video/1"))
            .await;
        router.dispatch(msg("1", "/cancel")).await;
        settle().await;

        let replies = sink.replies.lock().unwrap();
        let texts: Vec<&str> = replies.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                crate::reply::GREETING,
                crate::reply::CAPTION_PROMPT,
                crate::reply::CANCELLED,
            ]
        );
    }

    #[tokio::test]
    async fn users_have_independent_sessions() {
        let (router, sink) = router_with_sink();

        router.dispatch(msg("1", "/start")).await;
        router
            .dispatch(msg("1", "https://tiktok.com/@a/video/1"))
            .await;
        // User 2 never started; a URL from them only gets the idle hint.
        router
            .dispatch(msg("2", "https://tiktok.com/@b/video/2"))
            .await;
        settle().await;

        let replies = sink.replies.lock().unwrap();
        let for_two: Vec<&str> = replies
            .iter()
            .filter(|(chat, _)| chat.0 == "2")
            .map(|(_, t)| t.as_str())
            .collect();
        assert_eq!(for_two, vec![crate::reply::IDLE_HINT]);
    }

    #[tokio::test]
    async fn worker_is_reused_across_messages() {
        let (router, _sink) = router_with_sink();
        router.dispatch(msg("1", "/help")).await;
        router.dispatch(msg("1", "/help")).await;
        settle().await;
        assert_eq!(router.workers.len(), 1);
    }

    #[tokio::test]
    async fn closed_worker_is_respawned_and_message_redelivered() {
        let (router, sink) = router_with_sink();

        // Plant a dead mailbox for user 1.
        let (tx, rx) = mpsc::channel::<InboundMessage>(1);
        drop(rx);
        router.workers.insert(UserId("1".into()), tx);

        router.dispatch(msg("1", "/help")).await;
        settle().await;

        let replies = sink.replies.lock().unwrap();
        assert_eq!(replies.len(), 1, "message must survive the dead worker");
        assert_eq!(replies[0].1, crate::reply::HELP);
    }

    #[tokio::test]
    async fn idle_worker_is_evicted_and_service_continues() {
        let sink = Arc::new(RecordingSink::default());
        let engine = SessionEngine::new(
            Arc::new(NoSource),
            Arc::new(NoPublisher),
            Arc::new(MemoryStore::new()) as Arc<dyn ActivityStore>,
            Arc::clone(&sink) as Arc<dyn ReplySink>,
            UrlMatcher::new("tiktok.com").unwrap(),
        );
        let router =
            UserRouter::with_idle_eviction(Arc::new(engine), Duration::from_millis(30));

        router.dispatch(msg("1", "/help")).await;
        settle().await;
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(router.workers.is_empty(), "idle worker must be evicted");

        // A later message just spawns a fresh worker.
        router.dispatch(msg("1", "/help")).await;
        settle().await;
        let replies = sink.replies.lock().unwrap();
        assert_eq!(replies.len(), 2);
    }

    #[tokio::test]
    async fn mid_conversation_worker_is_not_evicted() {
        let sink = Arc::new(RecordingSink::default());
        let engine = SessionEngine::new(
            Arc::new(NoSource),
            Arc::new(NoPublisher),
            Arc::new(MemoryStore::new()) as Arc<dyn ActivityStore>,
            Arc::clone(&sink) as Arc<dyn ReplySink>,
            UrlMatcher::new("tiktok.com").unwrap(),
        );
        let router =
            UserRouter::with_idle_eviction(Arc::new(engine), Duration::from_millis(30));

        router.dispatch(msg("1", "/start")).await;
        settle().await;
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(router.workers.len(), 1, "AwaitingUrl session must be kept");
    }
}
