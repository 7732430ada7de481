// SPDX-FileCopyrightText: 2026 Clipcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure conversation state machine.
//!
//! States: `Idle -> AwaitingUrl -> AwaitingCaption -> Idle`. The pending
//! URL lives inside the `AwaitingCaption` variant, so it exists exactly
//! when the state says it should. Transitions are pure functions over
//! `(state, text)`, testable without any transport.

use clipcast_core::ClipcastError;
use regex::Regex;

use crate::reply;

/// Caption limit enforced before publication (the platform's own limit).
pub const CAPTION_LIMIT: usize = 280;

/// Per-user conversation state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No conversation in progress; `/start` begins one.
    #[default]
    Idle,
    /// Greeted; waiting for a source video link.
    AwaitingUrl,
    /// Link accepted; waiting for the tweet caption.
    AwaitingCaption { url: String },
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::AwaitingUrl => write!(f, "awaiting_url"),
            SessionState::AwaitingCaption { .. } => write!(f, "awaiting_caption"),
        }
    }
}

/// Accept pattern for submitted links: `https?://.*<domain>.*`, anchored
/// at the start of the message.
pub struct UrlMatcher {
    pattern: Regex,
}

impl UrlMatcher {
    /// Builds a matcher for the configured source domain. The domain is
    /// escaped, so dots in it match literally.
    pub fn new(domain: &str) -> Result<Self, ClipcastError> {
        let pattern = Regex::new(&format!(r"^https?://.*{}.*", regex::escape(domain)))
            .map_err(|e| ClipcastError::Config(format!("invalid source domain pattern: {e}")))?;
        Ok(Self { pattern })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// Result of feeding one plain text message to the state machine.
#[derive(Debug, PartialEq, Eq)]
pub enum Transition {
    /// Send `replies` and move to `next`. No external calls.
    Respond {
        replies: Vec<String>,
        next: SessionState,
    },
    /// Caption accepted: run the download/publish pipeline, then the
    /// session returns to `Idle` unconditionally.
    RunPipeline { url: String, caption: String },
}

/// Advances the state machine with a non-command text message.
pub fn on_text(state: &SessionState, text: &str, matcher: &UrlMatcher) -> Transition {
    match state {
        SessionState::Idle => Transition::Respond {
            replies: vec![reply::IDLE_HINT.to_string()],
            next: SessionState::Idle,
        },
        SessionState::AwaitingUrl => {
            if matcher.is_match(text) {
                Transition::Respond {
                    replies: vec![reply::CAPTION_PROMPT.to_string()],
                    next: SessionState::AwaitingCaption {
                        url: text.to_string(),
                    },
                }
            } else {
                Transition::Respond {
                    replies: vec![reply::INVALID_URL.to_string()],
                    next: SessionState::AwaitingUrl,
                }
            }
        }
        SessionState::AwaitingCaption { url } => {
            let len = text.chars().count();
            if len > CAPTION_LIMIT {
                Transition::Respond {
                    replies: vec![reply::caption_too_long(len)],
                    next: SessionState::AwaitingCaption { url: url.clone() },
                }
            } else {
                Transition::RunPipeline {
                    url: url.clone(),
                    caption: text.to_string(),
                }
            }
        }
    }
}

/// Commands recognized from any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Cancel,
    Help,
    Logs,
    Unknown,
}

impl Command {
    /// Parses a leading `/command`, tolerating a `@botname` suffix.
    /// Returns `None` for plain text.
    pub fn parse(text: &str) -> Option<Command> {
        if !text.starts_with('/') {
            return None;
        }
        let word = text.split_whitespace().next().unwrap_or(text);
        let name = word.split('@').next().unwrap_or(word);
        Some(match name {
            "/start" => Command::Start,
            "/cancel" => Command::Cancel,
            "/help" => Command::Help,
            "/logs" => Command::Logs,
            _ => Command::Unknown,
        })
    }
}
