// SPDX-FileCopyrightText: 2026 Clipcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across the Clipcast crates.

use serde::{Deserialize, Serialize};

/// Opaque stable identifier of a chat participant.
///
/// For Telegram this is the numeric user ID rendered as a string, but the
/// core never relies on that -- it only compares and displays it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Channel-level address for delivering replies (a Telegram chat ID).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatRef(pub String);

impl std::fmt::Display for ChatRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Remote identifier of a published post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostId(pub String);

/// A text message received from the messaging channel.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Sender of the message.
    pub user_id: UserId,
    /// Chat to route replies back to.
    pub chat: ChatRef,
    /// Message text, trimmed. Commands arrive as `/start`-style text.
    pub text: String,
    /// RFC 3339 timestamp from the channel.
    pub timestamp: String,
}

/// A text message to be delivered through the messaging channel.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    /// Destination chat.
    pub chat: ChatRef,
    /// Message text.
    pub text: String,
    /// Request MarkdownV2 rendering; the channel falls back to plain text
    /// if the markup does not parse.
    pub markdown: bool,
}

impl OutboundMessage {
    /// Plain-text message to a chat.
    pub fn plain(chat: ChatRef, text: impl Into<String>) -> Self {
        Self {
            chat,
            text: text.into(),
            markdown: false,
        }
    }

    /// MarkdownV2 message to a chat.
    pub fn markdown(chat: ChatRef, text: impl Into<String>) -> Self {
        Self {
            chat,
            text: text.into(),
            markdown: true,
        }
    }
}
