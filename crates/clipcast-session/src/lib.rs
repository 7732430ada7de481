// SPDX-FileCopyrightText: 2026 Clipcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation sessions: the per-user state machine, the download/publish
//! pipeline, and the router that keeps each user's messages serial.

pub mod engine;
pub mod fsm;
pub mod reply;
pub mod router;

pub use engine::{LOG_CHUNK_CHARS, SessionEngine};
pub use fsm::{CAPTION_LIMIT, Command, SessionState, Transition, UrlMatcher, on_text};
pub use router::UserRouter;
