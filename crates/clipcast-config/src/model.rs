// SPDX-FileCopyrightText: 2026 Clipcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Clipcast bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Clipcast configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values; credentials default to `None` and are checked before serving.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClipcastConfig {
    /// Bot identity and logging settings.
    #[serde(default)]
    pub bot: BotConfig,

    /// Telegram transport settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Twitter/X API credentials.
    #[serde(default)]
    pub twitter: TwitterConfig,

    /// Video source settings.
    #[serde(default)]
    pub source: SourceConfig,

    /// Local storage settings (videos directory, activity log file).
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Bot identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Display name of the bot.
    #[serde(default = "default_bot_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_bot_name() -> String {
    "clipcast".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telegram transport configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. Required to serve.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// List of allowed Telegram user IDs or usernames.
    /// Empty means the bot serves everyone.
    #[serde(default)]
    pub allowed_users: Vec<String>,
}

/// Twitter/X API credentials (OAuth 1.0a user context).
///
/// All four values are required to serve; their absence is fatal at startup.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TwitterConfig {
    /// OAuth 1.0a consumer key.
    #[serde(default)]
    pub consumer_key: Option<String>,

    /// OAuth 1.0a consumer secret.
    #[serde(default)]
    pub consumer_secret: Option<String>,

    /// OAuth 1.0a access token.
    #[serde(default)]
    pub access_token: Option<String>,

    /// OAuth 1.0a access token secret.
    #[serde(default)]
    pub access_token_secret: Option<String>,
}

/// Video source configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    /// Domain a submitted link must contain to be accepted
    /// (`https?://.*<domain>.*`).
    #[serde(default = "default_source_domain")]
    pub domain: String,

    /// Path to the `yt-dlp` executable.
    #[serde(default = "default_ytdlp_bin")]
    pub ytdlp_bin: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            domain: default_source_domain(),
            ytdlp_bin: default_ytdlp_bin(),
        }
    }
}

fn default_source_domain() -> String {
    "tiktok.com".to_string()
}

fn default_ytdlp_bin() -> String {
    "yt-dlp".to_string()
}

/// Local storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory downloaded videos are written to (created at startup).
    #[serde(default = "default_videos_dir")]
    pub videos_dir: String,

    /// Path to the append-only activity log file.
    #[serde(default = "default_activity_log")]
    pub activity_log: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            videos_dir: default_videos_dir(),
            activity_log: default_activity_log(),
        }
    }
}

fn default_videos_dir() -> String {
    "videos".to_string()
}

fn default_activity_log() -> String {
    "download.log".to_string()
}
