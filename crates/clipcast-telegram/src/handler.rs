// SPDX-FileCopyrightText: 2026 Clipcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message filtering and conversion.
//!
//! Decides which incoming Telegram messages the bot handles (private chats,
//! allowed users) and converts them into the channel-agnostic
//! [`InboundMessage`].

use clipcast_core::{ChatRef, InboundMessage, UserId};
use teloxide::prelude::*;
use teloxide::types::ChatKind;

/// Checks whether the message sender is allowed to use the bot.
///
/// Entries match the sender's numeric user ID (as a string) or username,
/// with or without a leading `@`, case-insensitively. An empty list means
/// the bot is open to everyone. Messages without a sender are rejected.
pub fn is_authorized(msg: &Message, allowed_users: &[String]) -> bool {
    if allowed_users.is_empty() {
        return true;
    }

    let user = match msg.from.as_ref() {
        Some(u) => u,
        None => return false,
    };

    let user_id_str = user.id.0.to_string();

    for allowed in allowed_users {
        if *allowed == user_id_str {
            return true;
        }
        if let Some(ref username) = user.username {
            let allowed_clean = allowed.strip_prefix('@').unwrap_or(allowed);
            if username.eq_ignore_ascii_case(allowed_clean) {
                return true;
            }
        }
    }

    false
}

/// Checks whether the message is from a private (DM) chat.
///
/// Group, supergroup, and channel messages return `false`.
pub fn is_dm(msg: &Message) -> bool {
    matches!(msg.chat.kind, ChatKind::Private(_))
}

/// Converts a Telegram text message into an [`InboundMessage`].
///
/// Returns `None` for non-text messages (photos, stickers, etc.) and for
/// messages without a sender.
pub fn to_inbound_message(msg: &Message) -> Option<InboundMessage> {
    let text = msg.text()?.trim();
    if text.is_empty() {
        return None;
    }
    let user = msg.from.as_ref()?;

    Some(InboundMessage {
        user_id: UserId(user.id.0.to_string()),
        chat: ChatRef(msg.chat.id.0.to_string()),
        text: text.to_string(),
        timestamp: chrono::DateTime::to_rfc3339(&msg.date),
    })
}
