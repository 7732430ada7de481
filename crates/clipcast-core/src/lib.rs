// SPDX-FileCopyrightText: 2026 Clipcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core trait definitions, error types, and common types for Clipcast.
//!
//! Clipcast is a Telegram bot that downloads a short video from a link,
//! republishes it to Twitter/X with a user-supplied caption, and keeps an
//! append-only per-user activity log. This crate holds the seams between
//! the conversational core and its external collaborators: the video
//! source, the publisher, and the messaging channel.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{ClipcastError, PublishError};
pub use traits::{ChannelAdapter, Publisher, ReplySink, VideoSource};
pub use types::{ChatRef, InboundMessage, OutboundMessage, PostId, UserId};
