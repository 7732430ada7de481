// SPDX-FileCopyrightText: 2026 Clipcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Messaging channel traits (Telegram in production, mocks in tests).

use async_trait::async_trait;

use crate::error::ClipcastError;
use crate::types::{ChatRef, InboundMessage, OutboundMessage};

/// Bidirectional messaging channel.
///
/// The channel delivers one inbound message at a time via [`receive`];
/// per-user ordering is preserved by the upstream platform. Outbound
/// delivery is fire-and-forget from the core's perspective.
///
/// [`receive`]: ChannelAdapter::receive
#[async_trait]
pub trait ChannelAdapter: Send + Sync {
    /// Establishes the connection and starts receiving updates.
    async fn connect(&mut self) -> Result<(), ClipcastError>;

    /// Sends a message through the channel.
    async fn send(&self, msg: OutboundMessage) -> Result<(), ClipcastError>;

    /// Receives the next inbound message from the channel.
    async fn receive(&self) -> Result<InboundMessage, ClipcastError>;
}

/// Narrow reply-only view of a channel, injected into the session core.
///
/// Keeps the state machine testable without a real transport: tests use a
/// sink that records replies into a `Vec`.
#[async_trait]
pub trait ReplySink: Send + Sync {
    /// Sends a plain-text reply to the given chat.
    async fn reply(&self, chat: &ChatRef, text: &str) -> Result<(), ClipcastError>;

    /// Sends a MarkdownV2 reply (used for fenced log chunks).
    async fn reply_markdown(&self, chat: &ChatRef, text: &str) -> Result<(), ClipcastError>;
}
