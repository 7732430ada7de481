// SPDX-FileCopyrightText: 2026 Clipcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-facing reply texts, collected in one place so wording changes do
//! not touch the state machine.

use crate::fsm::CAPTION_LIMIT;

pub const GREETING: &str = "👋 Hi! Send me a TikTok video link and I'll publish it to \
Twitter for you. Use /cancel to abandon a submission and /logs to see your history.";

pub const IDLE_HINT: &str = "Send /start to begin, or /help for the list of commands.";

pub const INVALID_URL: &str =
    "That doesn't look like a TikTok link. Please send a valid TikTok video URL.";

pub const CAPTION_PROMPT: &str =
    "Great! Now send me the caption for the tweet (max 280 characters).";

pub const DOWNLOADING: &str = "⬇️ Downloading video...";

pub const UPLOADING: &str = "⬆️ Uploading to Twitter...";

pub const SUCCESS: &str = "✅ Video downloaded and tweeted successfully!";

pub const DOWNLOAD_FAILED: &str =
    "❌ Failed to download the video. Please check the link and try again.";

pub const TWEET_FAILED: &str = "❌ Failed to post the tweet. Please try again later.";

pub const TWEET_DUPLICATE: &str =
    "❌ Twitter rejected the tweet as duplicate content. Try a different caption or video.";

pub const VIDEO_TOO_LARGE: &str = "❌ The video is too large to upload to Twitter.";

pub const CANCELLED: &str = "Operation cancelled.";

pub const NO_LOGS: &str = "No activity logs found for your account yet.";

pub const LOGS_ERROR: &str = "An error occurred while retrieving your logs.";

pub const UNKNOWN_COMMAND: &str = "Unknown command. Send /help for the list of commands.";

pub const HELP: &str = "Available commands:\n\
/start - begin a new video submission\n\
/cancel - abandon the current submission\n\
/logs - show your activity history\n\
/help - show this message";

/// Re-prompt shown when the caption exceeds the limit.
pub fn caption_too_long(len: usize) -> String {
    format!("Caption is too long: {len}/{CAPTION_LIMIT} characters. Please send a shorter one.")
}
